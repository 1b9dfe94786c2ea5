#[cfg(test)]
pub mod fake;
pub mod sink;

use thiserror::Error;

use crate::library::PlayableRef;

#[cfg(test)]
pub use fake::FakeDevice;
pub use sink::RodioDevice;

/// Notifications a playback device delivers to whoever drives it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceEvent {
    /// Playback position moved; carries the new position in seconds.
    PositionUpdate(f64),
    /// The source played through to its end.
    Ended,
    /// The source is loaded far enough to seek and start playing.
    MetadataReady,
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("cannot open media file: {0}")]
    Open(#[from] std::io::Error),
    #[error("cannot decode media: {0}")]
    Decode(String),
    #[error("audio output unavailable: {0}")]
    Output(String),
    #[error("no source loaded")]
    NoSource,
}

/// The opaque media engine the player drives.
///
/// Times are seconds as `f64`, matching what the position records persist.
pub trait PlaybackDevice {
    fn set_source(&mut self, source: PlayableRef) -> Result<(), DeviceError>;
    fn source(&self) -> Option<&PlayableRef>;
    /// Stop and forget the current source.
    fn eject(&mut self);

    fn has_source(&self) -> bool {
        self.source().is_some()
    }

    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, secs: f64);
    fn duration(&self) -> Option<f64>;
    fn play(&mut self) -> Result<(), DeviceError>;
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    /// Drain notifications produced since the last call, oldest first.
    fn poll_events(&mut self) -> Vec<DeviceEvent>;
}
