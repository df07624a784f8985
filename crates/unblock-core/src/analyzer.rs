//! Merge-blocker analysis.
//!
//! Reduces a pull request's details, reviews and check runs to an ordered list
//! of [`MergeBlocker`]s. Detection always runs in the same order:
//!
//! 1. check runs (`FAILING_CHECK`, or else `PENDING_CHECKS`)
//! 2. merge conflicts (`MERGE_CONFLICT`)
//! 3. reviews (`CHANGES_REQUESTED`, or else `MISSING_APPROVALS`)
//! 4. unexplained branch protection (`BRANCH_PROTECTION`)
//!
//! Blockers appear in [`PrAnalysis::blockers`] in that order. Review comments
//! only feed the summary and never block. The analysis is pure and total: unrecognized enumeration values add no signal and never
//! cause an error.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::analysis::{
    BlockerKind, CiStatus, CommentsStatus, ConflictStatus, MergeBlocker, PrAnalysis, PrState, ReviewStatus,
    StatusSummary,
};
use crate::labels::parse_review_labels;
use crate::types::{
    CheckConclusion, CheckRun, CheckStatus, Mergeable, MergeableState, PullRequestDetails, Review,
    ReviewComment, ReviewState,
};

/// Separator placed between excerpts of different failing checks.
pub const EXCERPT_SEPARATOR: &str = "\n---\n";

/// Default number of trailing output lines kept per failing check.
pub const DEFAULT_EXCERPT_LINES: usize = 5;

/// Tunables for [`Analyzer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Trailing lines of check output to keep in `FAILING_CHECK` details.
    pub excerpt_lines: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            excerpt_lines: DEFAULT_EXCERPT_LINES,
        }
    }
}

/// Analyze a pull request with default options.
#[must_use]
pub fn analyze(
    details: &PullRequestDetails,
    reviews: &[Review],
    check_runs: &[CheckRun],
) -> PrAnalysis {
    Analyzer::default().analyze(details, reviews, check_runs)
}

/// Stateless merge-blocker analyzer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Analyzer {
    options: AnalysisOptions,
}

impl Analyzer {
    #[must_use]
    pub const fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    /// Analyze a pull request.
    ///
    /// Empty `reviews` or `check_runs` mean "no signal of that kind".
    #[must_use]
    pub fn analyze(
        &self,
        details: &PullRequestDetails,
        reviews: &[Review],
        check_runs: &[CheckRun],
    ) -> PrAnalysis {
        self.analyze_with_comments(details, reviews, check_runs, &[])
    }

    /// Analyze a pull request, also reporting unanswered inline review
    /// comments in the summary. Comments never add blockers.
    #[must_use]
    pub fn analyze_with_comments(
        &self,
        details: &PullRequestDetails,
        reviews: &[Review],
        check_runs: &[CheckRun],
        comments: &[ReviewComment],
    ) -> PrAnalysis {
        let mut blockers = Vec::new();

        let checks = CheckBuckets::from_runs(check_runs);
        if let Some(blocker) = self.check_blocker(&checks) {
            blockers.push(blocker);
        }

        let conflicted = has_conflict(details);
        if conflicted {
            blockers.push(
                MergeBlocker::new(BlockerKind::MergeConflict, "PR has merge conflicts")
                    .with_details("Resolve conflicts with the base branch"),
            );
        }

        let reviewers = reduce_reviews(reviews);
        if let Some(blocker) = review_blocker(&reviewers, &details.mergeable_state) {
            blockers.push(blocker);
        }

        if details.mergeable_state == MergeableState::Blocked && blockers.is_empty() {
            blockers.push(
                MergeBlocker::new(
                    BlockerKind::BranchProtection,
                    "Blocked by branch protection rules",
                )
                .with_details("Check repository branch protection settings"),
            );
        }

        let unresolved = unresolved_comments(comments);

        let summary = StatusSummary {
            ci: checks.ci_status(),
            review: review_status(&reviewers, reviews),
            conflicts: if conflicted {
                ConflictStatus::Conflicts
            } else if details.mergeable == Mergeable::Yes {
                ConflictStatus::Clean
            } else {
                ConflictStatus::Unknown
            },
            comments: comments_status(comments, &unresolved),
            failed_checks: checks.failing.len(),
            pending_checks: checks.pending.len(),
            unresolved_comments: unresolved.len(),
        };

        PrAnalysis {
            repo: details.repo.clone(),
            number: details.number,
            title: details.title.clone(),
            url: details.url.clone(),
            blockers,
            summary,
            pr_state: PrState::detect(&details.state, details.draft, details.merged, &details.title),
            review_labels: parse_review_labels(&details.labels),
            unresolved_comment_urls: unresolved
                .iter()
                .filter_map(|comment| comment.url.clone())
                .collect(),
        }
    }

    fn check_blocker(&self, checks: &CheckBuckets<'_>) -> Option<MergeBlocker> {
        if let [first, rest @ ..] = checks.failing.as_slice() {
            let multiple = !rest.is_empty();
            let description = if multiple {
                format!(
                    "{} checks failed, starting with '{}'",
                    checks.failing.len(),
                    first.name
                )
            } else {
                format!("Check '{}' failed", first.name)
            };

            let mut details = Vec::new();
            if multiple {
                details.push(format!("Failing checks: {}", join_names(&checks.failing)));
            }

            let excerpts: Vec<String> = checks
                .failing
                .iter()
                .filter_map(|run| {
                    let excerpt =
                        tail_lines(run.output.excerpt_source()?, self.options.excerpt_lines)?;
                    Some(if multiple {
                        format!("{}:\n{excerpt}", run.name)
                    } else {
                        excerpt
                    })
                })
                .collect();
            if !excerpts.is_empty() {
                details.push(excerpts.join(EXCERPT_SEPARATOR));
            }

            let blocker = MergeBlocker::new(BlockerKind::FailingCheck, description);
            return Some(if details.is_empty() {
                blocker
            } else {
                blocker.with_details(details.join("\n"))
            });
        }

        if checks.pending.is_empty() {
            return None;
        }

        Some(
            MergeBlocker::new(
                BlockerKind::PendingChecks,
                format!("{} check(s) still running", checks.pending.len()),
            )
            .with_details(join_names(&checks.pending)),
        )
    }
}

/// Where a check run lands after de-duplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Failing,
    Pending,
    Passing,
    NoSignal,
}

fn classify(run: &CheckRun) -> Bucket {
    match (&run.status, &run.conclusion) {
        (CheckStatus::Queued | CheckStatus::InProgress, _) => Bucket::Pending,
        (CheckStatus::Completed, Some(conclusion)) => match conclusion {
            CheckConclusion::Failure
            | CheckConclusion::TimedOut
            | CheckConclusion::ActionRequired
            | CheckConclusion::Cancelled => Bucket::Failing,
            CheckConclusion::Success | CheckConclusion::Neutral | CheckConclusion::Skipped => {
                Bucket::Passing
            }
            CheckConclusion::Stale | CheckConclusion::Other(_) => Bucket::NoSignal,
        },
        _ => Bucket::NoSignal,
    }
}

#[derive(Debug, Default)]
struct CheckBuckets<'a> {
    failing: Vec<&'a CheckRun>,
    pending: Vec<&'a CheckRun>,
    passing: Vec<&'a CheckRun>,
}

impl<'a> CheckBuckets<'a> {
    fn from_runs(runs: &'a [CheckRun]) -> Self {
        let mut buckets = Self::default();
        for run in latest_per_name(runs) {
            match classify(run) {
                Bucket::Failing => buckets.failing.push(run),
                Bucket::Pending => buckets.pending.push(run),
                Bucket::Passing => buckets.passing.push(run),
                Bucket::NoSignal => {}
            }
        }
        buckets
    }

    fn ci_status(&self) -> CiStatus {
        if !self.failing.is_empty() {
            CiStatus::Failing
        } else if !self.pending.is_empty() {
            CiStatus::Pending
        } else if !self.passing.is_empty() {
            CiStatus::Passing
        } else {
            CiStatus::Unknown
        }
    }
}

/// Keep one run per name.
///
/// Policy: a run later in the input replaces any earlier run with the same
/// name, so a re-run that succeeds supersedes a cancelled one. The surviving
/// run keeps the position where its name first appeared.
fn latest_per_name(runs: &[CheckRun]) -> Vec<&CheckRun> {
    let mut slots: Vec<&CheckRun> = Vec::with_capacity(runs.len());
    let mut by_name: HashMap<&str, usize> = HashMap::new();

    for run in runs {
        match by_name.entry(run.name.as_str()) {
            Entry::Occupied(slot) => slots[*slot.get()] = run,
            Entry::Vacant(slot) => {
                slot.insert(slots.len());
                slots.push(run);
            }
        }
    }

    slots
}

fn join_names(runs: &[&CheckRun]) -> String {
    runs.iter()
        .map(|run| run.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Last `count` lines of `text`, or `None` if there is nothing to show.
fn tail_lines(text: &str, count: usize) -> Option<String> {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let tail = &lines[lines.len().saturating_sub(count)..];
    if tail.iter().all(|line| line.trim().is_empty()) {
        return None;
    }
    Some(tail.join("\n"))
}

fn has_conflict(details: &PullRequestDetails) -> bool {
    details.mergeable_state == MergeableState::Dirty || details.mergeable == Mergeable::No
}

/// Collapse reviews to the latest approving or change-requesting review per
/// reviewer. Comments, dismissed reviews and unknown states are ignored.
///
/// Each reviewer keeps the slot of their first counted review, so the result
/// lists reviewers in the order they first weighed in.
fn reduce_reviews(reviews: &[Review]) -> Vec<&Review> {
    let mut slots: Vec<&Review> = Vec::new();
    let mut by_login: HashMap<&str, usize> = HashMap::new();

    for review in reviews.iter().filter(|r| {
        matches!(r.state, ReviewState::Approved | ReviewState::ChangesRequested)
    }) {
        match by_login.entry(review.login.as_str()) {
            Entry::Occupied(slot) => slots[*slot.get()] = review,
            Entry::Vacant(slot) => {
                slot.insert(slots.len());
                slots.push(review);
            }
        }
    }

    slots
}

fn review_blocker(reviewers: &[&Review], mergeable_state: &MergeableState) -> Option<MergeBlocker> {
    let requesting: Vec<&str> = reviewers
        .iter()
        .filter(|r| r.state == ReviewState::ChangesRequested)
        .map(|r| r.login.as_str())
        .collect();

    if let [only] = requesting.as_slice() {
        return Some(
            MergeBlocker::new(
                BlockerKind::ChangesRequested,
                format!("Changes requested by {only}"),
            )
            .with_details(format!("Reviewers: {only}")),
        );
    }

    if !requesting.is_empty() {
        return Some(
            MergeBlocker::new(
                BlockerKind::ChangesRequested,
                format!("Changes requested by {} reviewers", requesting.len()),
            )
            .with_details(format!("Reviewers: {}", requesting.join(", "))),
        );
    }

    let approved = reviewers.iter().any(|r| r.state == ReviewState::Approved);
    if !approved && *mergeable_state == MergeableState::Blocked {
        return Some(
            MergeBlocker::new(BlockerKind::MissingApprovals, "Required approvals missing")
                .with_details("Branch protection requires at least one approving review"),
        );
    }

    None
}

fn review_status(reviewers: &[&Review], all_reviews: &[Review]) -> ReviewStatus {
    if reviewers
        .iter()
        .any(|r| r.state == ReviewState::ChangesRequested)
    {
        ReviewStatus::ChangesRequested
    } else if reviewers.iter().any(|r| r.state == ReviewState::Approved) {
        ReviewStatus::Approved
    } else if all_reviews.is_empty() {
        ReviewStatus::None
    } else {
        ReviewStatus::Pending
    }
}

/// Top-level comments that no other comment replies to, in input order.
fn unresolved_comments(comments: &[ReviewComment]) -> Vec<&ReviewComment> {
    let answered: HashSet<u64> = comments.iter().filter_map(|c| c.in_reply_to_id).collect();
    comments
        .iter()
        .filter(|c| c.is_top_level() && !answered.contains(&c.id))
        .collect()
}

fn comments_status(comments: &[ReviewComment], unresolved: &[&ReviewComment]) -> CommentsStatus {
    if comments.is_empty() {
        CommentsStatus::None
    } else if unresolved.is_empty() {
        CommentsStatus::Resolved
    } else {
        CommentsStatus::Unresolved
    }
}
