//! Input documents consumed by the analyzer.
//!
//! These mirror the semantic content of GitHub's REST responses for a pull
//! request, its reviews and the check runs on its head commit. Every
//! enumeration coming from the platform is a closed set with an `Other`
//! fallback that keeps the raw string, so an unfamiliar value never fails
//! deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generates `as_str`, `From<&str>`, `From<String>`, `From<Self> for String`
/// and `Display` for a platform string enum with an `Other(String)` fallback.
macro_rules! platform_enum {
    ($name:ident { $($variant:ident => $raw:literal),+ $(,)? }) => {
        impl $name {
            /// The raw string the platform uses for this value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $raw,)+
                    Self::Other(raw) => raw,
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                match raw {
                    $($raw => Self::$variant,)+
                    other => Self::Other(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($raw => Self::$variant,)+
                    _ => Self::Other(raw),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Whether GitHub considers the pull request mergeable.
///
/// GitHub reports `null` while it is still computing the answer; that case is
/// [`Mergeable::Unknown`] rather than a nullable boolean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Mergeable {
    /// Mergeable.
    Yes,
    /// Not mergeable.
    No,
    /// Still being computed.
    #[default]
    Unknown,
}

impl From<Option<bool>> for Mergeable {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Yes,
            Some(false) => Self::No,
            None => Self::Unknown,
        }
    }
}

impl From<Mergeable> for Option<bool> {
    fn from(value: Mergeable) -> Self {
        match value {
            Mergeable::Yes => Some(true),
            Mergeable::No => Some(false),
            Mergeable::Unknown => None,
        }
    }
}

/// GitHub's summary of whether (and why not) a pull request can merge now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MergeableState {
    /// No conflicts and all requirements met.
    Clean,
    /// Merge conflicts with the base branch.
    Dirty,
    /// Blocked by a branch protection rule.
    Blocked,
    /// Mergeable, but non-required checks are failing.
    Unstable,
    /// Not computed yet.
    #[default]
    Unknown,
    /// Head branch is behind the base branch.
    Behind,
    /// Mergeable with passing pre-receive hooks.
    HasHooks,
    /// Pull request is a draft.
    Draft,
    /// A value GitHub did not document at the time of writing.
    Other(String),
}

platform_enum!(MergeableState {
    Clean => "clean",
    Dirty => "dirty",
    Blocked => "blocked",
    Unstable => "unstable",
    Unknown => "unknown",
    Behind => "behind",
    HasHooks => "has_hooks",
    Draft => "draft",
});

/// Details of a single pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDetails {
    /// Repository full name, `owner/name`.
    pub repo: String,

    /// Pull request number.
    pub number: u64,

    /// Pull request title.
    pub title: String,

    /// Web URL of the pull request.
    pub url: String,

    /// SHA of the head commit.
    pub head_sha: String,

    /// Whether GitHub considers the pull request mergeable.
    #[serde(default)]
    pub mergeable: Mergeable,

    /// GitHub's mergeable state.
    #[serde(default)]
    pub mergeable_state: MergeableState,

    /// Raw `state` field, `open` or `closed`.
    #[serde(default = "default_state")]
    pub state: String,

    /// Whether the pull request is a draft.
    #[serde(default)]
    pub draft: bool,

    /// Whether the pull request has been merged.
    #[serde(default)]
    pub merged: bool,

    /// Label names attached to the pull request.
    #[serde(default)]
    pub labels: Vec<String>,
}

fn default_state() -> String {
    "open".into()
}

/// State of a submitted review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReviewState {
    /// Reviewer approved.
    Approved,
    /// Reviewer requested changes.
    ChangesRequested,
    /// Reviewer only left comments.
    Commented,
    /// The review was dismissed.
    Dismissed,
    /// Any other state, e.g. `PENDING`.
    Other(String),
}

platform_enum!(ReviewState {
    Approved => "APPROVED",
    ChangesRequested => "CHANGES_REQUESTED",
    Commented => "COMMENTED",
    Dismissed => "DISMISSED",
});

/// A review submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Login of the reviewer.
    pub login: String,

    /// Review state.
    pub state: ReviewState,

    /// When the review was submitted, if it has been.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Create a review without a submission time.
    #[must_use]
    pub fn new(login: impl Into<String>, state: impl Into<ReviewState>) -> Self {
        Self {
            login: login.into(),
            state: state.into(),
            submitted_at: None,
        }
    }
}

/// An inline review comment on the diff.
///
/// Replies carry the id of the top-level comment they answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    pub id: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to_id: Option<u64>,

    /// Link to the comment on GitHub, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ReviewComment {
    /// A top-level comment without a link.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self {
            id,
            in_reply_to_id: None,
            url: None,
        }
    }

    /// Mark this comment as a reply to `parent`.
    #[must_use]
    pub fn reply_to(mut self, parent: u64) -> Self {
        self.in_reply_to_id = Some(parent);
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        self.in_reply_to_id.is_none()
    }
}

/// Lifecycle status of a check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CheckStatus {
    /// Waiting to start.
    Queued,
    /// Running.
    InProgress,
    /// Finished; see the conclusion.
    Completed,
    /// Any other status, e.g. `waiting` or `requested`.
    Other(String),
}

platform_enum!(CheckStatus {
    Queued => "queued",
    InProgress => "in_progress",
    Completed => "completed",
});

/// Final outcome of a completed check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CheckConclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    TimedOut,
    ActionRequired,
    Stale,
    Skipped,
    /// A conclusion GitHub did not document at the time of writing.
    Other(String),
}

platform_enum!(CheckConclusion {
    Success => "success",
    Failure => "failure",
    Neutral => "neutral",
    Cancelled => "cancelled",
    TimedOut => "timed_out",
    ActionRequired => "action_required",
    Stale => "stale",
    Skipped => "skipped",
});

/// Text a check run attached to its result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl CheckOutput {
    /// The text to excerpt failure lines from.
    ///
    /// Policy: the longest non-empty of `summary` and `text`, falling back to
    /// `title` when both are empty. Returns `None` if nothing has content.
    #[must_use]
    pub fn excerpt_source(&self) -> Option<&str> {
        fn non_empty(field: Option<&str>) -> Option<&str> {
            field.map(str::trim).filter(|s| !s.is_empty())
        }

        let body = match (non_empty(self.summary.as_deref()), non_empty(self.text.as_deref())) {
            (Some(summary), Some(text)) if text.len() > summary.len() => Some(text),
            (Some(summary), _) => Some(summary),
            (None, text) => text,
        };

        body.or_else(|| non_empty(self.title.as_deref()))
    }
}

/// A CI job reported against the head commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRun {
    /// Check name.
    pub name: String,

    /// Check status.
    pub status: CheckStatus,

    /// Conclusion, present once the check has completed.
    #[serde(default)]
    pub conclusion: Option<CheckConclusion>,

    /// Output attached to the check.
    #[serde(default)]
    pub output: CheckOutput,
}

impl CheckRun {
    /// Create a check run without output.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        status: impl Into<CheckStatus>,
        conclusion: Option<CheckConclusion>,
    ) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
            conclusion,
            output: CheckOutput::default(),
        }
    }

    /// Attach output to the check run.
    #[must_use]
    pub fn with_output(mut self, output: CheckOutput) -> Self {
        self.output = output;
        self
    }
}
