use anyhow::{Context, Result, anyhow};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @returns: Directory holding `path`, "." for bare file names
    pub fn parent_dir<P: AsRef<Path>>(path: P) -> PathBuf {
        match path.as_ref().parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Write content so that `path` is either untouched or fully written.
    ///
    /// The bytes go to a temporary file in the same directory, which then
    /// replaces `path`.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        let path = path.as_ref();
        let parent = Self::parent_dir(path);
        Self::ensure_dir(&parent)?;

        let mut temp = tempfile::NamedTempFile::new_in(&parent)
            .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
        temp.write_all(content)
            .with_context(|| format!("Failed to write temporary file for {}", path.display()))?;
        temp.flush()?;
        temp.persist(path)
            .map_err(|e| anyhow!("Failed to persist {}: {}", path.display(), e.error))?;

        Ok(())
    }

    // @generates: Subtitle path next to the video, or in `output_dir`
    pub fn subtitle_path_for<P: AsRef<Path>>(video: P, output_dir: Option<&Path>) -> PathBuf {
        let video = video.as_ref();
        let stem = video.file_stem().unwrap_or_default().to_string_lossy();
        let dir = output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| Self::parent_dir(video));
        dir.join(format!("{}.srt", stem))
    }

    // @generates: `<stem>.subtitled.<ext>` next to the video
    pub fn subtitled_video_path<P: AsRef<Path>>(video: P) -> PathBuf {
        let video = video.as_ref();
        let stem = video.file_stem().unwrap_or_default().to_string_lossy();
        let ext = video
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| "mp4".to_string());
        Self::parent_dir(video).join(format!("{}.subtitled.{}", stem, ext))
    }
}
