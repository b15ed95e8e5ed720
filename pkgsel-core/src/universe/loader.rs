//! Snapshot file format and the async loader that turns it into a
//! [`Snapshot`].
//!
//! A snapshot file is a JSON object with a single `packages` array. Records
//! reference each other by `id`; the loader resolves those references into
//! dense [`PackageId`](super::PackageId)s and rejects files whose references
//! do not line up.

use super::snapshot::Snapshot;
use super::ModuleInfo;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level layout of a snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFile {
    /// Every package, variants included, in any order
    pub packages: Vec<PackageRecord>,
}

/// One package as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Unique identifier
    pub id: String,
    /// Import path
    pub path: String,
    /// Identifiers of directly imported packages
    #[serde(default)]
    pub imports: Vec<String>,
    /// Identifier of the non-variant counterpart, for verification variants
    #[serde(default)]
    pub variant_of: Option<String>,
    /// Owning module
    #[serde(default)]
    pub module: Option<ModuleInfo>,
    /// Owning repository root
    #[serde(default)]
    pub repository: Option<String>,
}

impl PackageRecord {
    /// Record with no imports, module or repository.
    #[must_use]
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            imports: Vec::new(),
            variant_of: None,
            module: None,
            repository: None,
        }
    }
}

/// Errors raised while reading or validating a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot file could not be read.
    #[error(
        "Failed to read snapshot '{path}'\n  Expected: Readable JSON snapshot file\n  Suggestion: Check the path or set snapshot.path in the configuration\n  Example: pkgsel --snapshot ./packages.json list acme.org/..."
    )]
    Io {
        /// File that failed to load
        path: PathBuf,
        #[source]
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The snapshot text is not valid snapshot JSON.
    #[error(
        "Snapshot '{origin}' is not valid JSON: {source}\n  Expected: {{\"packages\": [{{\"id\": ..., \"path\": ..., \"imports\": [...]}}]}}\n  Suggestion: Regenerate the snapshot with the exporter"
    )]
    Json {
        /// File path or other description of where the text came from
        origin: String,
        #[source]
        /// Underlying parse error
        source: serde_json::Error,
    },

    /// Two records share an identifier.
    #[error("Duplicate package id '{id}' in snapshot\n  Expected: Unique id per package record")]
    DuplicateId {
        /// Repeated identifier
        id: String,
    },

    /// Two non-variant records share an import path.
    #[error(
        "Packages '{first}' and '{second}' both claim path '{path}'\n  Expected: One non-variant package per import path\n  Suggestion: Mark one of them as a variant with \"variant_of\""
    )]
    DuplicatePath {
        /// Shared import path
        path: String,
        /// Identifier that claimed the path first
        first: String,
        /// Identifier that claimed it second
        second: String,
    },

    /// An import names an identifier that has no record.
    #[error("Package '{id}' imports unknown package '{import}'\n  Expected: Every import to have its own record")]
    UnknownImport {
        /// Importing package
        id: String,
        /// Missing identifier
        import: String,
    },

    /// A variant names a counterpart that has no record.
    #[error("Package '{id}' is a variant of unknown package '{target}'")]
    UnknownCounterpart {
        /// Variant package
        id: String,
        /// Missing counterpart identifier
        target: String,
    },

    /// A variant names another variant as its counterpart.
    #[error(
        "Package '{id}' is a variant of '{target}', which is itself a variant\n  Expected: variant_of to name a non-variant package"
    )]
    NestedVariant {
        /// Variant package
        id: String,
        /// Counterpart that is also a variant
        target: String,
    },

    /// More packages than identifiers can address.
    #[error("Snapshot holds {count} packages, more than can be indexed")]
    TooLarge {
        /// Number of records in the file
        count: usize,
    },
}

impl Snapshot {
    /// Parse and validate snapshot JSON held in memory.
    ///
    /// # Errors
    /// Returns `SnapshotError::Json` for malformed text and the integrity
    /// variants for dangling or duplicate references.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        parse_snapshot(text, "<inline>")
    }
}

fn parse_snapshot(text: &str, origin: &str) -> Result<Snapshot, SnapshotError> {
    let file: SnapshotFile = serde_json::from_str(text).map_err(|source| SnapshotError::Json {
        origin: origin.to_string(),
        source,
    })?;
    Snapshot::from_records(file.packages)
}

/// Load and validate a snapshot file.
///
/// This is the only suspending operation at the boundary of the query
/// engine; the result is complete and immutable.
///
/// # Errors
/// Returns `SnapshotError` when the file cannot be read, is not snapshot
/// JSON, or has inconsistent references.
pub async fn load_snapshot(path: impl AsRef<Path>) -> Result<Snapshot, SnapshotError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let snapshot = parse_snapshot(&text, &path.display().to_string())?;
    tracing::debug!(
        target: "pkgsel::loader",
        path = %path.display(),
        packages = snapshot.package_count(),
        "loaded snapshot"
    );
    Ok(snapshot)
}
