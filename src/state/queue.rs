use std::path::{Path, PathBuf};

/// How the photos in the queue were selected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum QueueMode {
    /// One photo picked directly; no auto-advance
    #[default]
    Single,
    /// The photos of a folder, walked in listing order
    Batch,
}

/// The photos selected for analysis and the position within them
///
/// Positions are 1-based; 0 means nothing has been loaded yet. The position
/// never exceeds the number of photos.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageQueue {
    mode: QueueMode,
    paths: Vec<PathBuf>,
    current: usize,
}

impl ImageQueue {
    /// A single photo, positioned on it
    pub fn single(path: PathBuf) -> Self {
        Self {
            mode: QueueMode::Single,
            paths: vec![path],
            current: 1,
        }
    }

    /// A folder's photos, not started yet
    pub fn batch(paths: Vec<PathBuf>) -> Self {
        Self {
            mode: QueueMode::Batch,
            paths,
            current: 0,
        }
    }

    pub fn is_batch(&self) -> bool {
        self.mode == QueueMode::Batch
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Path at a 1-based position
    pub fn path_at(&self, index: usize) -> Option<&Path> {
        index
            .checked_sub(1)
            .and_then(|i| self.paths.get(i))
            .map(PathBuf::as_path)
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.path_at(self.current)
    }

    /// Whether a batch has a photo after the current one
    pub fn has_next(&self) -> bool {
        self.is_batch() && self.current < self.paths.len()
    }

    /// Move to a 1-based position; out-of-range positions are refused
    pub fn seek(&mut self, index: usize) -> bool {
        if index > self.paths.len() {
            return false;
        }
        self.current = index;
        true
    }

    /// Step a batch forward; `None` when already on the last photo
    pub fn advance(&mut self) -> Option<usize> {
        if !self.has_next() {
            return None;
        }
        self.current += 1;
        Some(self.current)
    }

    /// Back to position 0, keeping the file list
    pub fn rewind(&mut self) {
        self.current = 0;
    }
}

/// Filename only, for display and export
pub fn image_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
