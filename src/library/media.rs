use std::path::{Path, PathBuf};

/// Identifier of an item within one selection batch: its display name.
pub type ItemId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Mp4,
    M4v,
    Mkv,
    Webm,
    Mov,
    Avi,
    Mp3,
    M4a,
    Flac,
    Wav,
    Ogg,
    Unknown,
}

impl MediaFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "mp4" => Self::Mp4,
            "m4v" => Self::M4v,
            "mkv" => Self::Mkv,
            "webm" => Self::Webm,
            "mov" => Self::Mov,
            "avi" => Self::Avi,
            "mp3" => Self::Mp3,
            "m4a" => Self::M4a,
            "flac" => Self::Flac,
            "wav" => Self::Wav,
            "ogg" | "oga" => Self::Ogg,
            _ => Self::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mp4 => "MP4",
            Self::M4v => "M4V",
            Self::Mkv => "MKV",
            Self::Webm => "WEBM",
            Self::Mov => "MOV",
            Self::Avi => "AVI",
            Self::Mp3 => "MP3",
            Self::M4a => "M4A",
            Self::Flac => "FLAC",
            Self::Wav => "WAV",
            Self::Ogg => "OGG",
            Self::Unknown => "?",
        }
    }

    pub fn is_supported(ext: &str) -> bool {
        !matches!(Self::from_extension(ext), Self::Unknown)
    }
}

/// Opaque handle to the bytes of a selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle {
    path: PathBuf,
}

impl MediaHandle {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mint a playable reference valid for the given selection batch.
    pub fn playable(&self, generation: u64) -> PlayableRef {
        PlayableRef {
            path: self.path.clone(),
            generation,
        }
    }
}

/// Transient reference the playback device reads from. It is only meaningful
/// while the batch it was minted in is still the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayableRef {
    pub path: PathBuf,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub name: ItemId,
    pub handle: MediaHandle,
    pub format: MediaFormat,
}

impl MediaItem {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("Unknown"));
        let format = MediaFormat::from_path(&path);

        Self {
            name,
            handle: MediaHandle::new(path),
            format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_the_file_name() {
        let item = MediaItem::from_path(PathBuf::from("/videos/season 1/E01.MKV"));
        assert_eq!(item.name, "E01.MKV");
        assert_eq!(item.format, MediaFormat::Mkv);
        assert_eq!(item.handle.path(), Path::new("/videos/season 1/E01.MKV"));
    }

    #[test]
    fn unsupported_extensions_are_rejected() {
        assert!(MediaFormat::is_supported("webm"));
        assert!(MediaFormat::is_supported("MP4"));
        assert!(!MediaFormat::is_supported("srt"));
        assert!(!MediaFormat::is_supported("txt"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_stay_distinct() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let first = MediaItem::from_path(PathBuf::from(OsStr::from_bytes(b"/v/one\xff.mp4")));
        let second = MediaItem::from_path(PathBuf::from(OsStr::from_bytes(b"/v/two\xfe.mp4")));
        assert_ne!(first.name, second.name);
        assert!(first.name.starts_with("one"));
        assert_eq!(first.format, MediaFormat::Mp4);
    }

    #[test]
    fn playable_refs_remember_their_batch() {
        let handle = MediaHandle::new(PathBuf::from("/tmp/a.mp4"));
        let r = handle.playable(3);
        assert_eq!(r.generation, 3);
        assert_eq!(r.path, PathBuf::from("/tmp/a.mp4"));
    }
}
