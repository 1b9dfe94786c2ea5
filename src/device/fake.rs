use std::collections::VecDeque;

use super::{DeviceError, DeviceEvent, PlaybackDevice};
use crate::library::PlayableRef;

/// Scripted device for driving the player in tests.
#[derive(Debug, Default)]
pub struct FakeDevice {
    pub source: Option<PlayableRef>,
    pub loaded: Vec<PlayableRef>,
    pub time: f64,
    pub duration: Option<f64>,
    pub paused: bool,
    pub play_calls: usize,
    pub fail_sources: bool,
    pub queued: VecDeque<DeviceEvent>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self {
            paused: true,
            ..Self::default()
        }
    }

    pub fn emit(&mut self, event: DeviceEvent) {
        if let DeviceEvent::PositionUpdate(secs) = event {
            self.time = secs;
        }
        self.queued.push_back(event);
    }
}

impl PlaybackDevice for FakeDevice {
    fn set_source(&mut self, source: PlayableRef) -> Result<(), DeviceError> {
        if self.fail_sources {
            return Err(DeviceError::Decode(String::from("scripted failure")));
        }
        self.loaded.push(source.clone());
        self.source = Some(source);
        self.time = 0.0;
        self.paused = true;
        self.queued.push_back(DeviceEvent::MetadataReady);
        Ok(())
    }

    fn source(&self) -> Option<&PlayableRef> {
        self.source.as_ref()
    }

    fn eject(&mut self) {
        self.source = None;
        self.time = 0.0;
        self.duration = None;
        self.paused = true;
        self.queued.clear();
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, secs: f64) {
        if self.source.is_some() {
            self.time = secs;
        }
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        if self.source.is_none() {
            return Err(DeviceError::NoSource);
        }
        self.play_calls += 1;
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn poll_events(&mut self) -> Vec<DeviceEvent> {
        self.queued.drain(..).collect()
    }
}
