use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create model directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Locates ONNX model files, downloading them on first use.
///
/// Lookup order: cache directory, then the optional bundled directory,
/// then a download into the cache directory.
pub struct ModelResolver {
    cache_dir: PathBuf,
    bundled_dir: Option<PathBuf>,
}

impl ModelResolver {
    pub fn new(cache_dir: PathBuf, bundled_dir: Option<PathBuf>) -> Self {
        Self {
            cache_dir,
            bundled_dir,
        }
    }

    /// Resolver rooted at the platform cache directory.
    pub fn with_default_cache(bundled_dir: Option<PathBuf>) -> Result<Self, ModelResolveError> {
        Ok(Self::new(default_cache_dir()?, bundled_dir))
    }

    pub fn resolve(
        &self,
        name: &str,
        url: &str,
        progress: Option<ProgressFn>,
    ) -> Result<PathBuf, ModelResolveError> {
        let cached_path = self.cache_dir.join(name);
        if cached_path.exists() {
            return Ok(cached_path);
        }

        if let Some(dir) = &self.bundled_dir {
            let bundled_path = dir.join(name);
            if bundled_path.exists() {
                return Ok(bundled_path);
            }
        }

        fs::create_dir_all(&self.cache_dir).map_err(ModelResolveError::CacheDir)?;
        log::info!("Downloading model {name} from {url}");
        download(url, &cached_path, progress)?;
        Ok(cached_path)
    }
}

/// Platform cache directory for models.
///
/// - macOS: `~/Library/Application Support/camwatch/models/`
/// - Linux: `$XDG_CACHE_HOME/camwatch/models/` or `~/.cache/camwatch/models/`
/// - Windows: `%LOCALAPPDATA%/camwatch/models/`
pub fn default_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "macos"))]
    let base = dirs::cache_dir();

    base.map(|d| d.join("camwatch").join("models"))
        .ok_or(ModelResolveError::NoCacheDir)
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let temp_path = dest.with_extension("part");
    let result = download_to(url, dest, &temp_path, progress);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn download_to(
    url: &str,
    dest: &Path,
    temp_path: &Path,
    progress: Option<ProgressFn>,
) -> Result<(), ModelResolveError> {
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ModelResolveError::Write { path, source }
    };

    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|source| ModelResolveError::Download {
            url: url.to_string(),
            source,
        })?;

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;
    let mut file = fs::File::create(temp_path).map_err(write_err(temp_path))?;

    // Models run to hundreds of MB; stream instead of buffering.
    let mut buf = vec![0u8; 1024 * 1024];
    loop {
        let n = response.read(&mut buf).map_err(write_err(temp_path))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(write_err(temp_path))?;
        downloaded += n as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }
    file.flush().map_err(write_err(temp_path))?;
    drop(file);

    fs::rename(temp_path, dest).map_err(write_err(dest))
}
