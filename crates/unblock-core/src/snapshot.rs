//! Offline snapshots: the input documents for one pull request saved as a
//! single JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::PrAnalysis;
use crate::analyzer::Analyzer;
use crate::error::Result;
use crate::types::{CheckRun, PullRequestDetails, Review, ReviewComment};

/// Everything the analyzer needs for one pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub details: PullRequestDetails,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub check_runs: Vec<CheckRun>,
    #[serde(default)]
    pub review_comments: Vec<ReviewComment>,
}

impl Snapshot {
    /// Read a snapshot from a JSON file.
    ///
    /// # Errors
    /// Returns error if the file can't be read or isn't a valid snapshot.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a snapshot from JSON text.
    ///
    /// # Errors
    /// Returns error if the text isn't a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn analyze(&self, analyzer: &Analyzer) -> PrAnalysis {
        analyzer.analyze_with_comments(
            &self.details,
            &self.reviews,
            &self.check_runs,
            &self.review_comments,
        )
    }
}
