use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rodio::source::SeekError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::{DeviceError, DeviceEvent, PlaybackDevice};
use crate::library::PlayableRef;

/// How often the tracked position is refreshed, in milliseconds of audio.
const POSITION_RESOLUTION_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    Empty,
    Paused,
    Playing,
    Ended,
}

/// Playback device backed by a rodio sink. Only the audio track of the
/// selected media is rendered.
pub struct RodioDevice {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sink: Sink,
    state: SinkState,
    source: Option<PlayableRef>,
    position_ms: Arc<AtomicU64>,
    duration: Option<Duration>,
    pending_seek: Option<Duration>,
    last_reported_ms: Option<u64>,
    events: Vec<DeviceEvent>,
}

impl RodioDevice {
    pub fn new() -> Result<Self, DeviceError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| DeviceError::Output(e.to_string()))?;
        let sink = Sink::try_new(&stream_handle).map_err(|e| DeviceError::Output(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink,
            state: SinkState::Empty,
            source: None,
            position_ms: Arc::new(AtomicU64::new(0)),
            duration: None,
            pending_seek: None,
            last_reported_ms: None,
            events: Vec::new(),
        })
    }

    fn reset_sink(&mut self) -> Result<(), DeviceError> {
        self.sink.stop();
        self.sink =
            Sink::try_new(&self.stream_handle).map_err(|e| DeviceError::Output(e.to_string()))?;
        self.position_ms.store(0, Ordering::SeqCst);
        self.last_reported_ms = None;
        Ok(())
    }

    /// Decode `path` into a fresh, paused sink.
    fn load(&mut self, path: &Path) -> Result<(), DeviceError> {
        let file = File::open(path)?;
        let decoder =
            Decoder::new(BufReader::new(file)).map_err(|e| DeviceError::Decode(e.to_string()))?;
        self.reset_sink()?;

        self.duration = decoder
            .total_duration()
            .or_else(|| probe_duration(path));

        let source = PositionTrackingSource::new(decoder, Arc::clone(&self.position_ms));
        self.sink.pause();
        self.sink.append(source);
        self.state = SinkState::Paused;
        Ok(())
    }

    fn seek(&mut self, position: Duration) {
        if let Err(e) = self.sink.try_seek(position) {
            warn!(error = %e, "seek failed");
        }
    }
}

impl PlaybackDevice for RodioDevice {
    fn set_source(&mut self, source: PlayableRef) -> Result<(), DeviceError> {
        // An undecodable file leaves the current source playing
        self.load(&source.path)?;
        self.pending_seek = None;

        debug!(path = %source.path.display(), duration = ?self.duration, "source loaded");
        self.source = Some(source);
        self.events.push(DeviceEvent::MetadataReady);
        Ok(())
    }

    fn source(&self) -> Option<&PlayableRef> {
        self.source.as_ref()
    }

    fn eject(&mut self) {
        self.sink.stop();
        self.source = None;
        self.duration = None;
        self.pending_seek = None;
        self.state = SinkState::Empty;
        self.position_ms.store(0, Ordering::SeqCst);
        self.last_reported_ms = None;
        self.events.clear();
    }

    fn current_time(&self) -> f64 {
        self.position_ms.load(Ordering::SeqCst) as f64 / 1000.0
    }

    fn set_current_time(&mut self, secs: f64) {
        if self.source.is_none() {
            return;
        }
        let position = seek_target(secs, self.duration);
        self.position_ms
            .store(position.as_millis() as u64, Ordering::SeqCst);

        if self.state == SinkState::Playing {
            self.seek(position);
        } else {
            self.pending_seek = Some(position);
        }
    }

    fn duration(&self) -> Option<f64> {
        self.duration.map(|d| d.as_secs_f64())
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        let Some(source) = self.source.clone() else {
            return Err(DeviceError::NoSource);
        };

        match self.state {
            SinkState::Playing => return Ok(()),
            SinkState::Ended | SinkState::Empty => self.load(&source.path)?,
            SinkState::Paused => {}
        }

        self.sink.play();
        self.state = SinkState::Playing;
        if let Some(position) = self.pending_seek.take() {
            self.seek(position);
        }
        Ok(())
    }

    fn pause(&mut self) {
        if self.state == SinkState::Playing {
            self.sink.pause();
            self.state = SinkState::Paused;
        }
    }

    fn is_paused(&self) -> bool {
        self.state != SinkState::Playing
    }

    fn poll_events(&mut self) -> Vec<DeviceEvent> {
        if self.state == SinkState::Playing {
            let position = self.position_ms.load(Ordering::SeqCst);
            if self.last_reported_ms != Some(position) {
                self.last_reported_ms = Some(position);
                self.events
                    .push(DeviceEvent::PositionUpdate(position as f64 / 1000.0));
            }

            if self.sink.empty() {
                self.state = SinkState::Ended;
                self.events.push(DeviceEvent::Ended);
            }
        }

        std::mem::take(&mut self.events)
    }
}

/// Clamp a requested position to what the source can seek to. Out of range
/// values fall back to the start.
fn seek_target(secs: f64, duration: Option<Duration>) -> Duration {
    let position = Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or_default();
    match duration {
        Some(duration) => position.min(duration),
        None => position,
    }
}

/// Read the container's duration without decoding it.
fn probe_duration(path: &Path) -> Option<Duration> {
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;

    let file = File::open(path).ok()?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .ok()?;

    let track = probed.format.default_track()?;
    let time_base = track.codec_params.time_base?;
    let n_frames = track.codec_params.n_frames?;

    let secs = (n_frames as f64 * time_base.numer as f64) / time_base.denom as f64;
    Duration::try_from_secs_f64(secs).ok()
}

// Wrapper that publishes how far into the source playback has got
struct PositionTrackingSource<S> {
    source: S,
    position_ms: Arc<AtomicU64>,
    samples_played: u64,
    sample_rate: u32,
    channels: u16,
}

impl<S: Source> PositionTrackingSource<S>
where
    S::Item: rodio::Sample,
{
    fn new(source: S, position_ms: Arc<AtomicU64>) -> Self {
        let sample_rate = source.sample_rate();
        let channels = source.channels();
        Self {
            source,
            position_ms,
            samples_played: 0,
            sample_rate,
            channels,
        }
    }

    fn samples_per_second(&self) -> u64 {
        (self.sample_rate as u64 * self.channels.max(1) as u64).max(1)
    }

    fn update_interval(&self) -> u64 {
        (self.samples_per_second() * POSITION_RESOLUTION_MS / 1000).max(1)
    }
}

impl<S: Source> Iterator for PositionTrackingSource<S>
where
    S::Item: rodio::Sample,
{
    type Item = S::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.source.next()?;
        self.samples_played += 1;

        if self.samples_played % self.update_interval() == 0 {
            let ms = self.samples_played * 1000 / self.samples_per_second();
            self.position_ms.store(ms, Ordering::SeqCst);
        }

        Some(sample)
    }
}

impl<S: Source> Source for PositionTrackingSource<S>
where
    S::Item: rodio::Sample,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.source.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.source.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.source.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        self.source.try_seek(pos)?;
        let ms = pos.as_millis() as u64;
        self.samples_played = ms * self.samples_per_second() / 1000;
        self.position_ms.store(ms, Ordering::SeqCst);
        Ok(())
    }
}
