use std::{
    env, io,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};

/// Default application directory is the one containing the executable, so the data sits next to
/// the program like a portable install.
pub fn create_application_default_path() -> Result<PathBuf> {
    let exe = env::current_exe()?;
    let path = exe
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("Executable {exe:?} has no parent directory"))?;

    ensure_dir(path)
}

/// Resolves `--dir` or falls back to [create_application_default_path].
pub fn resolve_application_path(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => ensure_dir(dir),
        None => create_application_default_path(),
    }
}

/// Location of the day counter file inside application directory.
pub fn data_file_path(application_dir: &Path) -> PathBuf {
    application_dir.join("data").join("data.json")
}

/// Creates the directory and makes it absolute. The daemon changes its working directory after
/// detaching, so relative paths would point elsewhere.
fn ensure_dir(path: PathBuf) -> Result<PathBuf> {
    match std::fs::create_dir_all(&path) {
        Ok(_) => {}
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => {}
        Err(v) => return Err(v.into()),
    }
    Ok(path.canonicalize()?)
}
