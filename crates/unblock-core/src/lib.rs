//! # unblock-core
//!
//! Merge-blocker analysis for pull requests.
//!
//! The [`analyze`] function takes a pull request's details, its reviews and the
//! check runs on its head commit, and returns a [`PrAnalysis`] listing every
//! [`MergeBlocker`] in a fixed detection order. Inline review comments, when
//! supplied through [`Analyzer::analyze_with_comments`], feed the summary only.
//! It performs no I/O and never fails; fetching the inputs and rendering the
//! result are left to callers.

pub mod analysis;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod labels;
pub mod snapshot;
pub mod types;

pub use analysis::{
    BlockerKind, CiStatus, CommentsStatus, ConflictStatus, MergeBlocker, PrAnalysis, PrState,
    ReviewStatus, StatusSummary,
};
pub use analyzer::{AnalysisOptions, Analyzer, analyze};
pub use config::Config;
pub use error::{Error, Result};
pub use labels::{LabelStatus, ReviewLabel};
pub use snapshot::Snapshot;
pub use types::{
    CheckConclusion, CheckOutput, CheckRun, CheckStatus, Mergeable, MergeableState,
    PullRequestDetails, Review, ReviewComment, ReviewState,
};
