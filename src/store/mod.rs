//! Keyed JSON document storage.
//!
//! One directory per collection, one file per document, named after the
//! document's `$id`. Writes are change-detecting: semantically identical
//! content never touches the file, so version-control diffs stay quiet.
//! Set reconciliation compares a desired document set against the directory
//! and applies create/update/delete partitions.

pub mod docs;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub use docs::{
    ComponentDepDoc, Connector, GraphemeDoc, KanjiDoc, LearningOrderDoc, OrderData, OrderItem,
    PrerequisiteDepDoc, VariantGroupDoc,
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid document `{id}`: {reason}")]
    InvalidDocument { id: String, reason: String },

    #[error("json encode failed: {0}")]
    Encode(#[source] serde_json::Error),
}

/// What a change-detecting write did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Result of reconciling a desired document set against a directory.
#[derive(Clone, Debug, Default)]
pub struct ReconcileReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub deleted: Vec<String>,
}

impl ReconcileReport {
    pub fn touched(&self) -> usize {
        self.created.len() + self.updated.len() + self.deleted.len()
    }
}

/// A single collection directory of JSON documents.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Load every `*.json` document in the collection, in filename order.
    ///
    /// A missing directory is an empty collection. A document that fails to
    /// parse is a hard error: these files are written by this crate and a
    /// parse failure means corruption.
    pub fn load_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, StoreError> {
        let filenames = self.existing_filenames()?;

        let mut documents = Vec::new();
        for filename in filenames {
            let path = self.path_of(&filename);
            let contents = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let doc = serde_json::from_str(&contents).map_err(|source| StoreError::Json {
                path: path.display().to_string(),
                source,
            })?;
            documents.push(doc);
        }
        Ok(documents)
    }

    /// Names of every `*.json` file currently in the collection.
    pub fn existing_filenames(&self) -> Result<BTreeSet<String>, StoreError> {
        let mut filenames = BTreeSet::new();
        if !self.dir.exists() {
            return Ok(filenames);
        }
        let entries = fs::read_dir(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.display().to_string(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.dir.display().to_string(),
                source,
            })?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.ends_with(".json") {
                filenames.insert(name.to_string());
            }
        }
        Ok(filenames)
    }

    /// Write one document, skipping the write when the on-disk content is
    /// semantically identical. A corrupt existing file is overwritten.
    pub fn write<T: Serialize>(
        &self,
        filename: &str,
        doc: &T,
    ) -> Result<WriteOutcome, StoreError> {
        let value = serde_json::to_value(doc).map_err(StoreError::Encode)?;
        let path = self.path_of(filename);

        let existed = path.exists();
        if existed {
            if let Ok(contents) = fs::read_to_string(&path) {
                if let Ok(existing) = serde_json::from_str::<Value>(&contents) {
                    if existing == value {
                        return Ok(WriteOutcome::Unchanged);
                    }
                }
            }
        }

        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.display().to_string(),
            source,
        })?;
        let mut rendered =
            serde_json::to_string_pretty(&value).map_err(StoreError::Encode)?;
        rendered.push('\n');
        fs::write(&path, rendered).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Ok(if existed {
            WriteOutcome::Updated
        } else {
            WriteOutcome::Created
        })
    }

    pub fn delete(&self, filename: &str) -> Result<bool, StoreError> {
        let path = self.path_of(filename);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(true)
    }

    /// Bring the collection in line with `desired` (filename -> document):
    /// create what is new, rewrite what changed, delete what is stale.
    ///
    /// With `dry_run` the partition is computed (by filename, without
    /// content comparison) and nothing touches disk.
    pub fn reconcile<T: Serialize>(
        &self,
        desired: &BTreeMap<String, T>,
        dry_run: bool,
    ) -> Result<ReconcileReport, StoreError> {
        let existing = self.existing_filenames()?;
        let desired_names: BTreeSet<String> = desired.keys().cloned().collect();

        let mut report = ReconcileReport::default();

        if dry_run {
            report.created = desired_names.difference(&existing).cloned().collect();
            report.updated = desired_names.intersection(&existing).cloned().collect();
            report.deleted = existing.difference(&desired_names).cloned().collect();
            return Ok(report);
        }

        for (filename, doc) in desired {
            match self.write(filename, doc)? {
                WriteOutcome::Created => report.created.push(filename.clone()),
                WriteOutcome::Updated => report.updated.push(filename.clone()),
                WriteOutcome::Unchanged => report.unchanged.push(filename.clone()),
            }
        }

        for filename in existing.difference(&desired_names) {
            if self.delete(filename)? {
                report.deleted.push(filename.clone());
            } else {
                warn!(%filename, "stale document vanished before deletion");
            }
        }

        Ok(report)
    }
}
