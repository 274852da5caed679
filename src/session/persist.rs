//! Stroke file encoding and disk I/O.

use crate::config::{CompressionSetting, PersistenceConfig};
use crate::draw::StrokeCollection;
use chrono::Utc;
use flate2::{Compression, bufread::GzDecoder, write::GzEncoder};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CURRENT_VERSION: u32 = 1;

pub const DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES: u64 = 100 * 1024; // 100 KiB

pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024; // 10 MiB

/// Errors that can occur while saving or loading strokes.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to access {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid stroke data: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Compression error: {0}")]
    Compression(std::io::Error),

    #[error("Stroke data is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("Stroke {0} contains a non-finite coordinate or attribute")]
    NonFinite(usize),

    #[error("Unsupported stroke file version {0}")]
    UnsupportedVersion(u32),
}

/// Runtime options for stroke files, derived from `[persistence]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistOptions {
    pub compression: CompressionSetting,
    pub auto_compress_threshold_bytes: u64,
    pub max_file_size_bytes: u64,
}

impl Default for PersistOptions {
    fn default() -> Self {
        Self {
            compression: CompressionSetting::Auto,
            auto_compress_threshold_bytes: DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
        }
    }
}

impl PersistOptions {
    pub fn from_config(config: &PersistenceConfig) -> Self {
        Self {
            compression: config.compress,
            auto_compress_threshold_bytes: config
                .auto_compress_threshold_kb
                .saturating_mul(1024)
                .max(1),
            max_file_size_bytes: config.max_file_size_mb.saturating_mul(1024 * 1024).max(1),
        }
    }

    fn should_compress(&self, payload_len: u64) -> bool {
        match self.compression {
            CompressionSetting::Off => false,
            CompressionSetting::On => true,
            CompressionSetting::Auto => payload_len >= self.auto_compress_threshold_bytes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StrokeFile {
    version: u32,
    last_modified: String,
    #[serde(default)]
    strokes: StrokeCollection,
}

/// A decoded stroke file plus what was learned while reading it.
#[derive(Debug, Clone)]
pub struct DecodedStrokes {
    pub strokes: StrokeCollection,
    pub version: u32,
    pub last_modified: String,
    pub compressed: bool,
}

/// Summary of a stroke file on disk.
#[derive(Debug, Clone, Serialize)]
pub struct StrokeFileInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub compressed: bool,
    pub version: u32,
    pub last_modified: String,
    pub stroke_count: usize,
    pub point_count: usize,
}

/// Serialises `strokes` into the on-disk byte format.
///
/// Strokes holding NaN or infinite values are rejected, since JSON cannot
/// represent them.
pub fn serialize(strokes: &StrokeCollection, options: &PersistOptions) -> Result<Vec<u8>, PersistError> {
    if let Some(index) = strokes.iter().position(|stroke| !stroke.is_finite()) {
        return Err(PersistError::NonFinite(index));
    }

    let payload = StrokeFile {
        version: CURRENT_VERSION,
        last_modified: Utc::now().to_rfc3339(),
        strokes: strokes.clone(),
    };

    let json_bytes = serde_json::to_vec_pretty(&payload)?;
    if options.should_compress(json_bytes.len() as u64) {
        compress_bytes(&json_bytes)
    } else {
        Ok(json_bytes)
    }
}

/// Parses bytes produced by [`serialize`], plain or gzip-compressed.
pub fn deserialize(bytes: &[u8]) -> Result<DecodedStrokes, PersistError> {
    let compressed = is_gzip(bytes);
    let json_bytes = if compressed {
        let mut decoder = GzDecoder::new(bytes);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(PersistError::Compression)?;
        out
    } else {
        bytes.to_vec()
    };

    let file: StrokeFile = serde_json::from_slice(&json_bytes)?;
    if file.version > CURRENT_VERSION {
        return Err(PersistError::UnsupportedVersion(file.version));
    }

    Ok(DecodedStrokes {
        strokes: file.strokes,
        version: file.version,
        last_modified: file.last_modified,
        compressed,
    })
}

/// Writes `strokes` to `path` through a temporary file and a rename, so an
/// interrupted save never leaves a truncated file behind.
pub fn save_strokes(
    path: &Path,
    strokes: &StrokeCollection,
    options: &PersistOptions,
) -> Result<u64, PersistError> {
    let bytes = serialize(strokes, options)?;
    let size = bytes.len() as u64;
    if size > options.max_file_size_bytes {
        return Err(PersistError::TooLarge {
            size,
            limit: options.max_file_size_bytes,
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }

    let tmp_path = temp_path(path);
    write_temp_file(&tmp_path, &bytes)?;

    if let Err(source) = fs::rename(&tmp_path, path) {
        fs::remove_file(&tmp_path).ok();
        return Err(io_error(path, source));
    }

    info!(
        "Saved {} strokes to {} ({} bytes)",
        strokes.len(),
        path.display(),
        size
    );
    Ok(size)
}

/// Reads and decodes the stroke file at `path`.
pub fn load_strokes(path: &Path, options: &PersistOptions) -> Result<DecodedStrokes, PersistError> {
    let bytes = read_limited(path, options)?;
    let decoded = deserialize(&bytes)?;
    debug!(
        "Loaded {} strokes from {} (version {}, compressed={})",
        decoded.strokes.len(),
        path.display(),
        decoded.version,
        decoded.compressed
    );
    Ok(decoded)
}

/// Summarises the stroke file at `path` without touching any session.
pub fn inspect_file(path: &Path, options: &PersistOptions) -> Result<StrokeFileInfo, PersistError> {
    let bytes = read_limited(path, options)?;
    let size_bytes = bytes.len() as u64;
    let decoded = deserialize(&bytes)?;
    Ok(StrokeFileInfo {
        path: path.to_path_buf(),
        size_bytes,
        compressed: decoded.compressed,
        version: decoded.version,
        last_modified: decoded.last_modified,
        stroke_count: decoded.strokes.len(),
        point_count: decoded.strokes.point_count(),
    })
}

fn read_limited(path: &Path, options: &PersistOptions) -> Result<Vec<u8>, PersistError> {
    let metadata = fs::metadata(path).map_err(|source| io_error(path, source))?;
    if metadata.len() > options.max_file_size_bytes {
        return Err(PersistError::TooLarge {
            size: metadata.len(),
            limit: options.max_file_size_bytes,
        });
    }

    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut bytes))
        .map_err(|source| io_error(path, source))?;
    Ok(bytes)
}

fn write_temp_file(tmp_path: &Path, bytes: &[u8]) -> Result<(), PersistError> {
    let mut tmp_file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(tmp_path)
        .map_err(|source| io_error(tmp_path, source))?;
    let written = tmp_file.write_all(bytes).and_then(|_| tmp_file.sync_all());
    drop(tmp_file);
    discard_on_error(tmp_path, written)
}

/// Removes a partly written temporary file when writing it failed.
fn discard_on_error(tmp_path: &Path, written: std::io::Result<()>) -> Result<(), PersistError> {
    written.map_err(|source| {
        fs::remove_file(tmp_path).ok();
        io_error(tmp_path, source)
    })
}

fn io_error(path: &Path, source: std::io::Error) -> PersistError {
    PersistError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn compress_bytes(data: &[u8]) -> Result<Vec<u8>, PersistError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).map_err(PersistError::Compression)?;
    encoder.finish().map_err(PersistError::Compression)
}

fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

fn temp_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    let mut candidate = target.with_file_name(&name);
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        let mut numbered = name.clone();
        numbered.push(counter.to_string());
        candidate = target.with_file_name(numbered);
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawingAttributes, RED, Stroke};
    use kurbo::Point;

    fn sample(count: usize) -> StrokeCollection {
        (0..count)
            .map(|i| {
                Stroke::new(
                    vec![Point::new(i as f64, 0.0), Point::new(i as f64, 25.0)],
                    DrawingAttributes::pen(RED, 3.0),
                )
            })
            .collect()
    }

    fn options(compression: CompressionSetting) -> PersistOptions {
        PersistOptions {
            compression,
            ..PersistOptions::default()
        }
    }

    #[test]
    fn compression_setting_controls_gzip() {
        let strokes = sample(2);
        let plain = serialize(&strokes, &options(CompressionSetting::Off)).unwrap();
        assert!(!is_gzip(&plain));
        let gz = serialize(&strokes, &options(CompressionSetting::On)).unwrap();
        assert!(is_gzip(&gz));

        let decoded = deserialize(&gz).unwrap();
        assert!(decoded.compressed);
        assert_eq!(decoded.strokes, strokes);
    }

    #[test]
    fn auto_compression_uses_threshold() {
        let mut opts = options(CompressionSetting::Auto);
        opts.auto_compress_threshold_bytes = 1;
        assert!(is_gzip(&serialize(&sample(1), &opts).unwrap()));
        opts.auto_compress_threshold_bytes = u64::MAX;
        assert!(!is_gzip(&serialize(&sample(1), &opts).unwrap()));
    }

    #[test]
    fn envelope_carries_version_and_timestamp() {
        let bytes = serialize(&sample(1), &options(CompressionSetting::Off)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["version"], CURRENT_VERSION);
        assert!(value["last_modified"].as_str().is_some());
        assert_eq!(value["strokes"]["strokes"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn garbage_and_future_versions_are_rejected() {
        assert!(matches!(
            deserialize(b"not json"),
            Err(PersistError::Format(_))
        ));
        let future = br#"{"version": 99, "last_modified": "", "strokes": {"strokes": []}}"#;
        assert!(matches!(
            deserialize(future),
            Err(PersistError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn non_finite_strokes_are_refused() {
        let mut strokes = sample(2);
        strokes.strokes[1].points.push(Point::new(f64::NAN, 1.0));
        assert!(matches!(
            serialize(&strokes, &options(CompressionSetting::Off)),
            Err(PersistError::NonFinite(1))
        ));

        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ink.json");
        assert!(save_strokes(&path, &strokes, &PersistOptions::default()).is_err());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn save_is_atomic_and_leaves_no_temp_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("ink.json");
        let strokes = sample(3);
        save_strokes(&path, &strokes, &PersistOptions::default()).unwrap();

        let entries: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("ink.json")]);

        let loaded = load_strokes(&path, &PersistOptions::default()).unwrap();
        assert_eq!(loaded.strokes, strokes);
    }

    #[test]
    fn failed_temp_write_is_cleaned_up() {
        let temp = tempfile::tempdir().unwrap();
        let tmp_path = temp.path().join("ink.json.tmp");
        fs::write(&tmp_path, b"partial").unwrap();

        let result = discard_on_error(&tmp_path, Err(std::io::Error::other("disk full")));
        assert!(matches!(result, Err(PersistError::Io { .. })));
        assert!(!tmp_path.exists());

        fs::write(&tmp_path, b"complete").unwrap();
        assert!(discard_on_error(&tmp_path, Ok(())).is_ok());
        assert!(tmp_path.exists());
    }

    #[test]
    fn oversized_files_are_refused() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ink.json");
        let mut opts = options(CompressionSetting::Off);
        save_strokes(&path, &sample(5), &opts).unwrap();

        opts.max_file_size_bytes = 16;
        assert!(matches!(
            load_strokes(&path, &opts),
            Err(PersistError::TooLarge { limit: 16, .. })
        ));
        assert!(matches!(
            save_strokes(&path, &sample(5), &opts),
            Err(PersistError::TooLarge { .. })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("absent.json");
        let err = load_strokes(&path, &PersistOptions::default()).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn inspect_counts_strokes_and_points() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ink.json.gz");
        save_strokes(&path, &sample(4), &options(CompressionSetting::On)).unwrap();

        let info = inspect_file(&path, &PersistOptions::default()).unwrap();
        assert!(info.compressed);
        assert_eq!(info.stroke_count, 4);
        assert_eq!(info.point_count, 8);
        assert_eq!(info.version, CURRENT_VERSION);
    }

    #[test]
    fn options_from_config_convert_units() {
        let config = PersistenceConfig {
            compress: CompressionSetting::On,
            auto_compress_threshold_kb: 2,
            max_file_size_mb: 3,
        };
        let opts = PersistOptions::from_config(&config);
        assert_eq!(opts.compression, CompressionSetting::On);
        assert_eq!(opts.auto_compress_threshold_bytes, 2048);
        assert_eq!(opts.max_file_size_bytes, 3 * 1024 * 1024);
    }
}
