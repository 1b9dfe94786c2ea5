use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::media::{MediaFormat, MediaItem};

#[derive(Debug)]
pub enum ScanEvent {
    Complete { folder: String, items: Vec<MediaItem> },
    Error { path: String, error: String },
}

pub struct Scanner;

impl Scanner {
    /// Walk `path` for media files and send them as one batch, ordered by path.
    pub async fn scan_folder(path: &Path, sender: mpsc::Sender<ScanEvent>) -> Result<usize> {
        let folder_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut found = Vec::new();
        Self::scan_recursive(path, &sender, &mut found).await;
        found.sort();

        let items: Vec<MediaItem> = found.into_iter().map(MediaItem::from_path).collect();
        let count = items.len();
        info!(folder = %path.display(), count, "scan finished");

        let _ = sender
            .send(ScanEvent::Complete {
                folder: folder_name,
                items,
            })
            .await;

        Ok(count)
    }

    async fn scan_recursive(path: &Path, sender: &mpsc::Sender<ScanEvent>, found: &mut Vec<PathBuf>) {
        let entries = match std::fs::read_dir(path) {
            Ok(e) => e,
            Err(e) => {
                let _ = sender
                    .send(ScanEvent::Error {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    })
                    .await;
                return;
            }
        };

        for entry in entries.flatten() {
            let entry_path = entry.path();

            if entry_path.is_dir() {
                Box::pin(Self::scan_recursive(&entry_path, sender, found)).await;
            } else if let Some(ext) = entry_path.extension().and_then(|e| e.to_str()) {
                if MediaFormat::is_supported(ext) {
                    debug!(path = %entry_path.display(), "found media file");
                    found.push(entry_path);
                }
            }
        }
    }

    /// Keep only the paths that look like playable media, preserving order.
    pub fn select_files(paths: &[PathBuf]) -> Vec<MediaItem> {
        paths
            .iter()
            .filter(|p| p.is_file())
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(MediaFormat::is_supported)
            })
            .cloned()
            .map(MediaItem::from_path)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"").unwrap();
    }

    #[tokio::test]
    async fn scan_sends_sorted_media_batch() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.mp4"));
        touch(&dir.path().join("a.mkv"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("extras").join("c.webm"));

        let (tx, mut rx) = mpsc::channel(8);
        let count = Scanner::scan_folder(dir.path(), tx).await.unwrap();
        assert_eq!(count, 3);

        match rx.recv().await {
            Some(ScanEvent::Complete { items, .. }) => {
                let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
                assert_eq!(names, ["a.mkv", "b.mp4", "c.webm"]);
            }
            other => panic!("unexpected scan event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreadable_folder_reports_error_then_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let (tx, mut rx) = mpsc::channel(8);
        Scanner::scan_folder(&missing, tx).await.unwrap();

        assert!(matches!(rx.recv().await, Some(ScanEvent::Error { .. })));
        match rx.recv().await {
            Some(ScanEvent::Complete { items, .. }) => assert!(items.is_empty()),
            other => panic!("unexpected scan event: {:?}", other),
        }
    }

    #[test]
    fn select_files_keeps_pick_order() {
        let dir = tempfile::tempdir().unwrap();
        let b = dir.path().join("b.mp4");
        let a = dir.path().join("a.mp4");
        let txt = dir.path().join("readme.txt");
        touch(&b);
        touch(&a);
        touch(&txt);

        let items = Scanner::select_files(&[b, txt, a]);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["b.mp4", "a.mp4"]);
    }
}
