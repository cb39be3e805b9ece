use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{self, AsyncWriteExt},
};

/// Returns `path` with `suffix` appended to the file name. `data.json` + `.lock` gives
/// `data.json.lock` in the same directory.
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or(OsStr::new("")).to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

/// Replaces the whole content of `path`. Data goes into a sibling temporary file first which is
/// then renamed over the target, so readers see either the old or the new content.
pub async fn replace_file(path: &Path, contents: &[u8]) -> Result<(), io::Error> {
    let temp_path = sibling_path(path, ".tmp");
    let mut file = File::create(&temp_path).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&temp_path, path).await
}

/// Advisory lock on a sidecar `.lock` file. Used to coordinate the daemon writing the data file
/// with the cli reading it.
pub struct FileLock {
    file: File,
}

impl FileLock {
    pub async fn shared(target: &Path) -> Result<Self, io::Error> {
        let file = Self::open(target).await?;
        file.lock_shared()?;
        Ok(Self { file })
    }

    pub async fn exclusive(target: &Path) -> Result<Self, io::Error> {
        let file = Self::open(target).await?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }

    pub async fn release(self) -> Result<(), io::Error> {
        self.file.unlock_async().await
    }

    async fn open(target: &Path) -> Result<File, io::Error> {
        File::options()
            .write(true)
            .create(true)
            .read(true)
            .truncate(false)
            .open(sibling_path(target, ".lock"))
            .await
    }
}
