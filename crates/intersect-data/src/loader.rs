//! Format detection (RON/JSON/TOML), file discovery, and deserialization
//! helpers used by the scenario and controller loaders.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use intersect_core::error::ConfigError;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required scenario file is missing from the directory.
    #[error("no '{file}' file (ron, toml or json) in {dir}")]
    MissingRequired { file: DataFile, dir: PathBuf },

    /// The file extension is not ron, toml or json.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// The same scenario file exists in more than one encoding.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The controller timings cannot drive a cycle.
    #[error("invalid controller configuration in {file}: {source}")]
    InvalidConfig { file: PathBuf, source: ConfigError },

    /// The number of scripted lanes differs from the configured lane count.
    #[error("{file} scripts {scripted} lanes but the controller has {configured}")]
    LaneCountMismatch {
        file: PathBuf,
        scripted: usize,
        configured: usize,
    },

    /// A lane script has no readings to play back.
    #[error("lane '{lane}' in {file} has no readings")]
    EmptyLane { file: PathBuf, lane: String },

    /// A scripted reading repeats zero times or more than the loader allows.
    #[error("lane '{lane}' in {file} repeats a reading {repeat} times (allowed: 1..={max})")]
    InvalidRepeat {
        file: PathBuf,
        lane: String,
        repeat: u32,
        max: u32,
    },

    /// Two lane scripts share a name.
    #[error("duplicate lane name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Scenario files
// ===========================================================================

/// Encodings a scenario file may use, picked by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Ron, Format::Toml, Format::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }
}

/// The files a scenario directory is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFile {
    /// Scheduler timings. Optional.
    Controller,
    /// One reading script per lane. Required.
    Lanes,
}

impl DataFile {
    /// File name without extension.
    pub fn stem(self) -> &'static str {
        match self {
            DataFile::Controller => "controller",
            DataFile::Lanes => "lanes",
        }
    }
}

impl std::fmt::Display for DataFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.stem())
    }
}

pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    let ext = path.extension().and_then(|e| e.to_str());
    Format::ALL
        .into_iter()
        .find(|format| Some(format.extension()) == ext)
        .ok_or_else(|| DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        })
}

/// Locate `file` in `dir` under any supported extension. A scenario may
/// carry each file in one encoding only.
pub fn find_data_file(dir: &Path, file: DataFile) -> Result<Option<PathBuf>, DataLoadError> {
    let mut present = Format::ALL
        .into_iter()
        .map(|format| dir.join(format!("{}.{}", file.stem(), format.extension())))
        .filter(|candidate| candidate.exists());

    match (present.next(), present.next()) {
        (Some(a), Some(b)) => Err(DataLoadError::ConflictingFormats { a, b }),
        (found, _) => Ok(found),
    }
}

pub fn require_data_file(dir: &Path, file: DataFile) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, file)?.ok_or_else(|| DataLoadError::MissingRequired {
        file,
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Parse a whole file in the encoding its extension names.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Parse a file whose top level is a list. TOML has no top-level arrays, so
/// there the list lives under `toml_key` (`[[lanes]]` tables for a lanes
/// file).
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let table: toml::Value = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "intersect_loader_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn detect_known_formats() {
        assert_eq!(detect_format(Path::new("lanes.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("lanes.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("lanes.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        assert!(matches!(
            detect_format(Path::new("lanes.yaml")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            detect_format(Path::new("lanes")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn find_data_file_missing_is_none() {
        let dir = make_test_dir("find_missing");
        assert_eq!(find_data_file(&dir, DataFile::Lanes).unwrap(), None);
        cleanup(&dir);
    }

    #[test]
    fn find_data_file_picks_the_single_encoding() {
        let dir = make_test_dir("find_single");
        fs::write(dir.join("controller.toml"), "").unwrap();

        assert_eq!(
            find_data_file(&dir, DataFile::Controller).unwrap(),
            Some(dir.join("controller.toml"))
        );
        assert_eq!(find_data_file(&dir, DataFile::Lanes).unwrap(), None);
        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("lanes.ron"), "[]").unwrap();
        fs::write(dir.join("lanes.json"), "[]").unwrap();

        assert!(matches!(
            find_data_file(&dir, DataFile::Lanes),
            Err(DataLoadError::ConflictingFormats { .. })
        ));
        cleanup(&dir);
    }

    #[test]
    fn require_data_file_names_the_missing_file() {
        let dir = make_test_dir("require_missing");
        let err = require_data_file(&dir, DataFile::Lanes).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::MissingRequired {
                file: DataFile::Lanes,
                ..
            }
        ));
        assert!(err.to_string().contains("'lanes'"));
        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_toml_uses_key() {
        let dir = make_test_dir("toml_list");
        let path = dir.join("numbers.toml");
        fs::write(&path, "values = [1, 2, 3]\n").unwrap();

        let values: Vec<i64> = deserialize_list(&path, "values").unwrap();
        assert_eq!(values, vec![1, 2, 3]);

        let missing: Result<Vec<i64>, _> = deserialize_list(&path, "other");
        assert!(matches!(missing, Err(DataLoadError::Parse { .. })));
        cleanup(&dir);
    }

    #[test]
    fn parse_error_names_file() {
        let dir = make_test_dir("bad_json");
        let path = dir.join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = deserialize_file::<serde_json::Value>(&path).unwrap_err();
        assert!(format!("{err}").contains("broken.json"));
        cleanup(&dir);
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let data_err: DataLoadError = io_err.into();
        assert!(matches!(data_err, DataLoadError::Io(_)));
        assert!(format!("{data_err}").contains("file not found"));
    }
}
