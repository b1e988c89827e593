//! Filesystem infrastructure: implements the `LocalFs` port.

use std::io::{ErrorKind, Write as _};
use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::LocalFs;

/// Production filesystem implementation of `LocalFs`.
pub struct HostFs;

impl LocalFs for HostFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("creating directory {}", path.display()))
    }

    fn read_to_string(&self, path: &Path) -> Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading file {}", path.display())),
        }
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        std::fs::write(path, content).with_context(|| format!("writing file {}", path.display()))
    }

    fn write_private(&self, path: &Path, content: &str, mode: u32) -> Result<()> {
        let parent = path
            .parent()
            .with_context(|| format!("{} has no parent directory", path.display()))?;
        let name = path
            .file_name()
            .with_context(|| format!("{} has no file name", path.display()))?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;

        // Staged next to the target so the rename stays on one filesystem.
        let staging = parent.join(format!(".{}.piclaw-tmp", name.to_string_lossy()));
        match std::fs::remove_file(&staging) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| format!("removing stale {}", staging.display()));
            }
        }

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;

        let mut file = options
            .open(&staging)
            .with_context(|| format!("creating {}", staging.display()))?;
        file.write_all(content.as_bytes())
            .and_then(|()| file.sync_all())
            .with_context(|| format!("writing file {}", staging.display()))?;
        drop(file);
        std::fs::rename(&staging, path)
            .with_context(|| format!("replacing {}", path.display()))
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
                .with_context(|| format!("setting permissions on {}", path.display()))?;
        }
        #[cfg(not(unix))]
        let _ = (path, mode);
        Ok(())
    }
}
