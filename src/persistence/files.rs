use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the per-project data directory
pub const DATA_DIR_NAME: &str = ".taskpad";

/// Resolve the data directory.
///
/// An explicit directory (from `--data-dir` or `TASKPAD_DIR`) wins. Otherwise the
/// nearest local `.taskpad` walking up from the current directory, then `~/.taskpad`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_data_dir(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Find local .taskpad directory by walking up the directory tree
fn find_local_data_dir(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }

        current = current.parent()?;
    }
}

/// Ensure the data directory exists
pub fn ensure_data_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir.to_path_buf())
}

/// Initialize a local .taskpad directory inside `parent`
pub fn init_local_data_dir(parent: &Path) -> Result<PathBuf> {
    let dir = parent.join(DATA_DIR_NAME);

    if dir.exists() {
        anyhow::bail!("Taskpad directory already exists: {}", dir.display());
    }

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    Ok(dir)
}

/// Path of the key-value storage file
pub fn storage_file(data_dir: &Path) -> PathBuf {
    data_dir.join("storage.json")
}

/// Path of the settings file
pub fn settings_file(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}

/// Replace `path` with `content` in one step: write a sibling temp file, sync it,
/// then rename it over the target.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to stage a write in {}", dir.display()))?;
    staged
        .write_all(content.as_bytes())
        .and_then(|_| staged.as_file().sync_all())
        .context("Failed to write staged file")?;
    staged
        .persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}

/// Read a whole file. A missing file reads as empty.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}
