//! Data-directory layout.
//!
//! Every collection lives in its own `documents` directory under the data
//! root; source tables live under `sources`. All generators resolve paths
//! through this module rather than hardcoding them.

use std::path::{Path, PathBuf};

/// Resolved directory layout rooted at one data directory.
#[derive(Clone, Debug)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn documents(&self, collection: &str) -> PathBuf {
        self.root.join(collection).join("documents")
    }

    pub fn grapheme_docs(&self) -> PathBuf {
        self.documents("grapheme")
    }

    pub fn grapheme_dep_docs(&self) -> PathBuf {
        self.documents("grapheme-dependency")
    }

    pub fn variant_group_docs(&self) -> PathBuf {
        self.documents("grapheme-variant-group")
    }

    pub fn kanji_docs(&self) -> PathBuf {
        self.documents("kanji")
    }

    pub fn kanji_dep_docs(&self) -> PathBuf {
        self.documents("kanji-dependency")
    }

    pub fn kanji_grapheme_dep_docs(&self) -> PathBuf {
        self.documents("kanji-grapheme-dependency")
    }

    pub fn learning_order_docs(&self) -> PathBuf {
        self.documents("learning-order")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    pub fn popularity_report(&self) -> PathBuf {
        self.reports_dir().join("component-popularity.json")
    }

    pub fn ids_table(&self) -> PathBuf {
        self.root.join("sources").join("ids.txt")
    }

    pub fn stroke_index(&self) -> PathBuf {
        self.root.join("sources").join("stroke-index.json")
    }

    pub fn dictionary(&self) -> PathBuf {
        self.root.join("sources").join("dictionary.json")
    }
}
