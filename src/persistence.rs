// File: src/persistence.rs
use crate::config::{BloomConfig, OutputLayout};
use crate::core::bloom::BloomFilterImage;
use crate::core::hash::BloomKey;
use crate::core::lexicon::LexiconImage;
use crate::error::{BuildError, Result};
use log::{debug, warn};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempPath};

/// Writes `bytes` to `path` through a temporary file in the same directory,
/// then renames it into place. Readers never see a half-written file, and a
/// failure leaves any previous file untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    write_all_atomic(&[(path, bytes)])
}

fn parent_of(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

fn stage(path: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let parent_dir = parent_of(path);
    fs::create_dir_all(parent_dir).map_err(|e| BuildError::io(parent_dir, e))?;
    let mut temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| BuildError::io(parent_dir, e))?;
    temp_file.write_all(bytes).map_err(|e| BuildError::io(temp_file.path(), e))?;
    temp_file.as_file().sync_all().map_err(|e| BuildError::io(temp_file.path(), e))?;
    Ok(temp_file)
}

/// A target that has been replaced; `backup` holds the file it displaced.
struct Committed<'a> {
    path: &'a Path,
    backup: Option<TempPath>,
}

fn roll_back(committed: Vec<Committed<'_>>) {
    for entry in committed.into_iter().rev() {
        let restored = match entry.backup {
            Some(backup) => {
                let moved = fs::rename(&backup, entry.path);
                if moved.is_ok() {
                    // renamed away; nothing left for the guard to delete
                    let _ = backup.keep();
                }
                moved
            }
            None => fs::remove_file(entry.path),
        };
        if let Err(e) = restored {
            warn!("could not restore {}: {}", entry.path.display(), e);
        }
    }
}

fn commit<'a>(path: &'a Path, staged: NamedTempFile) -> Result<Committed<'a>> {
    let backup = if path.exists() {
        let backup = NamedTempFile::new_in(parent_of(path))
            .map_err(|e| BuildError::io(parent_of(path), e))?
            .into_temp_path();
        fs::rename(path, &backup).map_err(|e| BuildError::io(path, e))?;
        Some(backup)
    } else {
        None
    };
    match staged.persist(path) {
        Ok(_) => Ok(Committed { path, backup }),
        Err(e) => {
            if let Some(backup) = backup {
                if fs::rename(&backup, path).is_ok() {
                    let _ = backup.keep();
                }
            }
            Err(BuildError::io(path, e.error))
        }
    }
}

/// Writes a group of files that are only meaningful together, such as
/// `bloom.bin` and its `key.hex`.
///
/// Every file is staged and synced before any target is touched. Targets are
/// then swapped in one by one; if a swap fails, the ones already swapped are
/// put back, so the directory holds either the whole new set or the old one.
pub fn write_all_atomic(files: &[(&Path, &[u8])]) -> Result<()> {
    let mut staged = Vec::with_capacity(files.len());
    for &(path, bytes) in files {
        if path.is_dir() {
            return Err(BuildError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "target is a directory"),
            ));
        }
        staged.push((path, stage(path, bytes)?));
    }

    let mut committed = Vec::with_capacity(staged.len());
    for (path, temp_file) in staged {
        match commit(path, temp_file) {
            Ok(entry) => committed.push(entry),
            Err(e) => {
                roll_back(committed);
                return Err(e);
            }
        }
    }
    for (path, bytes) in files {
        debug!("wrote {} bytes to {}", bytes.len(), path.display());
    }
    Ok(())
}

fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => BuildError::InputNotFound { path: path.to_path_buf() },
        _ => BuildError::io(path, e),
    })
}

/// Loads `bloom.bin` + `key.hex` as the runtime would.
pub fn load_bloom(dir: &Path, layout: &OutputLayout, config: &BloomConfig) -> Result<BloomFilterImage> {
    let bits = read_artifact(&dir.join(&layout.bloom))?;
    let key_text = String::from_utf8(read_artifact(&dir.join(&layout.key))?)
        .map_err(|_| BuildError::MalformedArtifact("key file is not ASCII".into()))?;
    BloomFilterImage::from_parts(bits, BloomKey::from_hex(&key_text)?, config)
}

pub fn load_lexicon(path: &Path) -> Result<LexiconImage> {
    LexiconImage::from_bytes(read_artifact(path)?)
}
