//! Analysis results: blockers, summaries and the per-PR analysis record.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::labels::ReviewLabel;

/// The kind of reason a pull request cannot be merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockerKind {
    /// A required check failed.
    FailingCheck,
    /// Checks are still running.
    PendingChecks,
    /// The branch conflicts with its base.
    MergeConflict,
    /// A reviewer requested changes.
    ChangesRequested,
    /// Branch protection wants an approval nobody has given.
    MissingApprovals,
    /// Blocked by a protection rule we cannot attribute.
    BranchProtection,
}

impl BlockerKind {
    /// Stable identifier, e.g. `FAILING_CHECK`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FailingCheck => "FAILING_CHECK",
            Self::PendingChecks => "PENDING_CHECKS",
            Self::MergeConflict => "MERGE_CONFLICT",
            Self::ChangesRequested => "CHANGES_REQUESTED",
            Self::MissingApprovals => "MISSING_APPROVALS",
            Self::BranchProtection => "BRANCH_PROTECTION",
        }
    }
}

impl fmt::Display for BlockerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reason a pull request cannot be merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeBlocker {
    kind: BlockerKind,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl MergeBlocker {
    pub(crate) fn new(kind: BlockerKind, description: impl Into<String>) -> Self {
        let description = description.into();
        debug_assert!(!description.is_empty(), "blocker description is empty");
        Self {
            kind,
            description,
            details: None,
        }
    }

    pub(crate) fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[must_use]
    pub const fn kind(&self) -> BlockerKind {
        self.kind
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl fmt::Display for MergeBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.description)?;
        if let Some(details) = &self.details {
            for line in details.lines() {
                write!(f, "\n  {line}")?;
            }
        }
        Ok(())
    }
}

/// Overall CI state after de-duplicating check runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CiStatus {
    Passing,
    Failing,
    Pending,
    Unknown,
}

/// Overall review state after reviewer reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Approved,
    ChangesRequested,
    /// Reviews exist but none approve or request changes.
    Pending,
    /// No reviews at all.
    None,
}

/// Whether the branch merges cleanly into its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStatus {
    Clean,
    Conflicts,
    Unknown,
}

/// Whether inline review comments still wait for an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentsStatus {
    /// Every top-level comment has at least one reply.
    Resolved,
    Unresolved,
    /// No review comments, or none were fetched.
    None,
}

/// Informational per-area status. Never contributes blockers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub ci: CiStatus,
    pub review: ReviewStatus,
    pub conflicts: ConflictStatus,
    pub comments: CommentsStatus,
    pub failed_checks: usize,
    pub pending_checks: usize,
    pub unresolved_comments: usize,
}

/// Lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrState {
    Open,
    Draft,
    /// Open, but the title marks it as work in progress.
    Wip,
    Closed,
    Merged,
}

impl PrState {
    /// Derive the state from the raw fields. Merged wins over everything else.
    #[must_use]
    pub fn detect(state: &str, draft: bool, merged: bool, title: &str) -> Self {
        if merged {
            Self::Merged
        } else if state.eq_ignore_ascii_case("closed") {
            Self::Closed
        } else if draft {
            Self::Draft
        } else if is_wip_title(title) {
            Self::Wip
        } else {
            Self::Open
        }
    }
}

fn is_wip_title(title: &str) -> bool {
    let lower = title.trim_start().to_ascii_lowercase();
    ["wip:", "[wip]", "wip "]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

/// Result of analyzing a single pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrAnalysis {
    pub repo: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    /// Blockers in detection order.
    pub blockers: Vec<MergeBlocker>,
    pub summary: StatusSummary,
    pub pr_state: PrState,
    pub review_labels: Vec<ReviewLabel>,
    /// Links to top-level review comments nobody has replied to.
    pub unresolved_comment_urls: Vec<String>,
}

impl PrAnalysis {
    /// True iff nothing blocks the merge.
    #[must_use]
    pub fn is_mergeable(&self) -> bool {
        self.blockers.is_empty()
    }

    /// Blockers of the given kind, in detection order.
    pub fn blockers_of(&self, kind: BlockerKind) -> impl Iterator<Item = &MergeBlocker> {
        self.blockers.iter().filter(move |b| b.kind == kind)
    }

    /// Whether any blocker of the given kind was detected.
    #[must_use]
    pub fn has_blocker(&self, kind: BlockerKind) -> bool {
        self.blockers_of(kind).next().is_some()
    }
}

impl Serialize for PrAnalysis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr<'a> {
            repo: &'a str,
            number: u64,
            title: &'a str,
            url: &'a str,
            is_mergeable: bool,
            state: PrState,
            blockers: &'a [MergeBlocker],
            summary: StatusSummary,
            review_labels: &'a [ReviewLabel],
            unresolved_comment_urls: &'a [String],
        }

        Repr {
            repo: &self.repo,
            number: self.number,
            title: &self.title,
            url: &self.url,
            is_mergeable: self.is_mergeable(),
            state: self.pr_state,
            blockers: &self.blockers,
            summary: self.summary,
            review_labels: &self.review_labels,
            unresolved_comment_urls: &self.unresolved_comment_urls,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blocker_display_without_details() {
        let blocker = MergeBlocker::new(BlockerKind::MergeConflict, "PR has merge conflicts");
        assert_eq!(blocker.to_string(), "MERGE_CONFLICT: PR has merge conflicts");
    }

    #[test]
    fn test_blocker_display_indents_details() {
        let blocker = MergeBlocker::new(BlockerKind::FailingCheck, "Check 'tests' failed")
            .with_details("assertion failed\nexit code 1");
        assert_eq!(
            blocker.to_string(),
            "FAILING_CHECK: Check 'tests' failed\n  assertion failed\n  exit code 1"
        );
    }

    #[test]
    fn test_blocker_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&BlockerKind::MissingApprovals).unwrap(),
            "\"MISSING_APPROVALS\""
        );
        assert_eq!(
            serde_json::to_string(&BlockerKind::BranchProtection).unwrap(),
            format!("\"{}\"", BlockerKind::BranchProtection)
        );
    }

    #[test]
    fn test_pr_state_merged_takes_priority() {
        assert_eq!(PrState::detect("closed", true, true, "WIP: x"), PrState::Merged);
        assert_eq!(PrState::detect("closed", true, false, "x"), PrState::Closed);
        assert_eq!(PrState::detect("open", true, false, "WIP: x"), PrState::Draft);
    }

    #[test]
    fn test_pr_state_wip_prefixes() {
        assert_eq!(PrState::detect("open", false, false, "WIP: thing"), PrState::Wip);
        assert_eq!(PrState::detect("open", false, false, "[WIP] thing"), PrState::Wip);
        assert_eq!(PrState::detect("open", false, false, "wip some changes"), PrState::Wip);
        assert_eq!(PrState::detect("open", false, false, "Wipe cache"), PrState::Open);
    }
}
