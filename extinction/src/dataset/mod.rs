//! Local survey datasets
//!
//! Every dust map reads its survey files from `<data_dir>/<identifier>/`.
//! This module answers whether those files are present and, when they are
//! not, performs a single blocking download from the configured source.
//! Downloads are never retried.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use thiserror::Error;

use crate::config::ExtinctionConfig;

/// Errors from fetching a dataset.
#[derive(Error, Debug)]
pub enum FetchError {
    /// No download URL is configured for this map.
    #[error("no download source configured for '{identifier}'")]
    NoSource { identifier: String },

    /// Automatic fetching is switched off in the configuration.
    #[error("automatic fetching is disabled")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("download failed with status {0}")]
    Status(u16),

    #[error("invalid gzip archive: {0}")]
    CorruptArchive(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Presence check and fetch trigger for survey datasets.
pub trait DatasetStore: Send + Sync {
    /// True when the dataset for `identifier` is installed locally
    fn is_present(&self, identifier: &str) -> bool;

    /// Try once to install the dataset, returning where it was placed
    fn fetch(&self, identifier: &str) -> Result<PathBuf, FetchError>;

    /// Directory the dataset is expected in
    fn location(&self, identifier: &str) -> PathBuf;

    /// Human-readable steps for installing the dataset by hand
    fn fetch_instructions(&self, identifier: &str) -> String {
        format!(
            "download the '{identifier}' survey files into {} \
             or configure a download source for '{identifier}' and enable auto_fetch",
            self.location(identifier).display()
        )
    }
}

/// Check if a directory exists and holds at least one entry
fn dir_exists_and_not_empty<P: AsRef<Path>>(path: P) -> bool {
    match fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_some(),
        Err(_) => false,
    }
}

/// Last path segment of a URL, without query string or fragment
fn file_name_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next()?;
    path.rsplit('/').next().filter(|name| !name.is_empty())
}

/// Download a file from URL to a local path
fn download_file<P: AsRef<Path>>(url: &str, path: P, timeout: Duration) -> Result<(), FetchError> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }

    // Write to a temporary file first to avoid partial downloads
    let temp_path = path.as_ref().with_extension("tmp");
    let result = stream_to_file(url, &temp_path, timeout);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
        return result;
    }

    fs::rename(temp_path, path)?;
    Ok(())
}

fn stream_to_file(url: &str, temp_path: &Path, timeout: Duration) -> Result<(), FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| FetchError::Http(format!("failed to create HTTP client: {e}")))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| FetchError::Http(format!("failed to download {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }

    let mut file = BufWriter::new(File::create(temp_path)?);
    let mut buffer = [0; 8192];
    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| FetchError::Http(format!("failed to read response: {e}")))?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])?;
    }
    file.flush()?;
    Ok(())
}

/// Decompress a gzipped file
fn decompress_gzip<P: AsRef<Path>, Q: AsRef<Path>>(gz_path: P, output_path: Q) -> Result<(), FetchError> {
    let mut file = File::open(&gz_path)?;

    // gzip streams start with the magic bytes 0x1F 0x8B
    let mut header = [0u8; 2];
    if file.read_exact(&mut header).is_err() || header != [0x1F, 0x8B] {
        return Err(FetchError::CorruptArchive(format!(
            "{} does not start with a gzip header",
            gz_path.as_ref().display()
        )));
    }

    let gz = BufReader::new(File::open(&gz_path)?);
    let mut decoder = flate2::read::GzDecoder::new(gz);
    let mut writer = BufWriter::new(File::create(&output_path)?);

    match io::copy(&mut decoder, &mut writer).and_then(|_| writer.flush()) {
        Ok(()) => Ok(()),
        Err(e) => {
            // Clean up partial files on error
            drop(writer);
            let _ = fs::remove_file(&output_path);
            Err(FetchError::CorruptArchive(e.to_string()))
        }
    }
}

/// Dataset store backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct LocalDataStore {
    data_dir: PathBuf,
    sources: BTreeMap<String, String>,
    auto_fetch: bool,
    timeout: Duration,
}

impl LocalDataStore {
    /// Store rooted at `data_dir` with fetching disabled
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            sources: BTreeMap::new(),
            auto_fetch: false,
            timeout: Duration::from_secs(ExtinctionConfig::DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }

    /// Store configured from settings
    pub fn from_config(config: &ExtinctionConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            sources: config.sources.clone(),
            auto_fetch: config.auto_fetch,
            timeout: Duration::from_secs(config.fetch_timeout_secs),
        }
    }

    /// Register a download URL for one map and enable fetching
    pub fn with_source(mut self, identifier: &str, url: &str) -> Self {
        self.sources.insert(identifier.to_string(), url.to_string());
        self.auto_fetch = true;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn download(&self, url: &str, dir: &Path, identifier: &str) -> Result<(), FetchError> {
        let file_name = file_name_from_url(url).unwrap_or(identifier);
        let target = dir.join(file_name);
        download_file(url, &target, self.timeout)?;

        if let Some(stem) = file_name.strip_suffix(".gz") {
            decompress_gzip(&target, dir.join(stem))?;
            fs::remove_file(&target)?;
        }
        Ok(())
    }
}

impl DatasetStore for LocalDataStore {
    fn is_present(&self, identifier: &str) -> bool {
        dir_exists_and_not_empty(self.location(identifier))
    }

    fn fetch(&self, identifier: &str) -> Result<PathBuf, FetchError> {
        if !self.auto_fetch {
            return Err(FetchError::Disabled);
        }
        let url = self
            .sources
            .get(identifier)
            .ok_or_else(|| FetchError::NoSource {
                identifier: identifier.to_string(),
            })?;

        let dir = self.location(identifier);
        info!("Downloading dustmaps.{identifier} from {url}");

        match self.download(url, &dir, identifier) {
            Ok(()) => Ok(dir),
            Err(e) => {
                warn!("Fetching dustmaps.{identifier} failed: {e}");
                // The dataset was absent before this fetch, so nothing of value is lost
                let _ = fs::remove_dir_all(&dir);
                Err(e)
            }
        }
    }

    fn location(&self, identifier: &str) -> PathBuf {
        self.data_dir.join(identifier)
    }
}
