//! Scoped per-task temporary storage.
//!
//! Each run gets its own directory tree under the configured work root.
//! The backing directory is removed when the handle drops, so release is
//! guaranteed on success, failure, and panic alike. Nothing durable lives
//! here; the task store is the only persistent state.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Ephemeral storage scope for one task run.
#[derive(Debug)]
pub struct Workspace {
    task_id: String,
    root: TempDir,
    media_dir: PathBuf,
    mix_dir: PathBuf,
}

impl Workspace {
    /// Create a workspace under `work_root`.
    pub fn create(work_root: &Path, task_id: &str) -> io::Result<Self> {
        fs::create_dir_all(work_root)?;
        let root = tempfile::Builder::new()
            .prefix(&format!("task-{}-", sanitize(task_id)))
            .tempdir_in(work_root)?;

        let media_dir = root.path().join("media");
        let mix_dir = root.path().join("mix");
        fs::create_dir_all(&media_dir)?;
        fs::create_dir_all(&mix_dir)?;

        Ok(Self {
            task_id: task_id.to_string(),
            root,
            media_dir,
            mix_dir,
        })
    }

    /// The task this workspace belongs to.
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Root of the workspace tree.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Directory for downloaded source media.
    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Directory the mixer writes its output into.
    pub fn mix_dir(&self) -> &Path {
        &self.mix_dir
    }

    /// Write bytes into the media directory, returning the file path.
    pub fn write_media(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.media_dir.join(name);
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Keep task ids filesystem-safe for the directory prefix.
fn sanitize(task_id: &str) -> String {
    task_id
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
