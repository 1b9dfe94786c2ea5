pub mod media;
pub mod playlist;
pub mod scanner;

pub use media::{ItemId, MediaFormat, MediaItem, PlayableRef};
pub use playlist::{Playlist, WatchedSet};
pub use scanner::{ScanEvent, Scanner};
