//! Terminal output formatting utilities.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use unblock_core::{BlockerKind, MergeBlocker, PrAnalysis, PrState};

static QUIET_MODE: AtomicBool = AtomicBool::new(false);

/// Set quiet mode globally. Call once at startup.
pub fn set_quiet(quiet: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

/// Print an error message (always prints to stderr).
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning message (always prints to stderr).
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print an info message (suppressed in quiet mode).
pub fn info(msg: &str) {
    if !is_quiet() {
        println!("{} {}", "→".blue(), msg);
    }
}

/// Print essential machine-readable output (always prints).
///
/// Use for results that should be available for piping, like analyses.
pub fn essential(msg: &str) {
    println!("{msg}");
}

/// Print a horizontal line (suppressed in quiet mode).
pub fn hr() {
    if !is_quiet() {
        println!("{}", "─".repeat(50).dimmed());
    }
}

/// Start a spinner on stderr with the given message.
pub fn spinner(msg: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Mergeable indicator: green check or red cross.
#[must_use]
pub fn mergeable_indicator(mergeable: bool) -> String {
    if mergeable {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

/// Colored blocker kind label.
#[must_use]
pub fn blocker_kind(kind: BlockerKind) -> String {
    let label = kind.as_str();
    match kind {
        BlockerKind::FailingCheck | BlockerKind::MergeConflict => label.red().to_string(),
        BlockerKind::PendingChecks | BlockerKind::MissingApprovals => {
            label.yellow().to_string()
        }
        BlockerKind::ChangesRequested => label.magenta().to_string(),
        BlockerKind::BranchProtection => label.blue().to_string(),
    }
}

/// Short tag for non-open PR states, empty for open PRs.
#[must_use]
pub fn state_tag(state: PrState) -> String {
    match state {
        PrState::Open => String::new(),
        PrState::Draft => " [draft]".dimmed().to_string(),
        PrState::Wip => " [wip]".dimmed().to_string(),
        PrState::Closed => " [closed]".red().to_string(),
        PrState::Merged => " [merged]".green().to_string(),
    }
}

/// Render one blocker: kind and description, then indented details.
#[must_use]
pub fn format_blocker(blocker: &MergeBlocker) -> String {
    let mut out = format!(
        "  {} {}",
        blocker_kind(blocker.kind()),
        blocker.description()
    );
    if let Some(details) = blocker.details() {
        for line in details.lines() {
            out.push_str(&format!("\n      {}", line.dimmed()));
        }
    }
    out
}

/// Render a full analysis: header, URL, blockers in detection order, then a
/// note about unanswered review comments.
#[must_use]
pub fn format_analysis(analysis: &PrAnalysis) -> String {
    let mut out = format!(
        "{} {}#{} {}{}\n  {}",
        mergeable_indicator(analysis.is_mergeable()),
        analysis.repo.bold(),
        analysis.number,
        analysis.title,
        state_tag(analysis.pr_state),
        analysis.url.dimmed(),
    );
    for blocker in &analysis.blockers {
        out.push('\n');
        out.push_str(&format_blocker(blocker));
    }
    let unresolved = analysis.summary.unresolved_comments;
    if unresolved > 0 {
        let note = format!("{unresolved} unanswered review comment(s)");
        out.push_str(&format!("\n  {} {}", "note:".cyan(), note.dimmed()));
    }
    out
}

/// Print an analysis (always prints).
pub fn print_analysis(analysis: &PrAnalysis) {
    essential(&format_analysis(analysis));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use unblock_core::{
        Analyzer, CheckConclusion, CheckOutput, CheckRun, Mergeable, MergeableState,
        PullRequestDetails, ReviewComment,
    };

    fn details(mergeable: Mergeable, state: MergeableState) -> PullRequestDetails {
        PullRequestDetails {
            repo: "owner/repo".into(),
            number: 42,
            title: "Add cache".into(),
            url: "https://github.com/owner/repo/pull/42".into(),
            head_sha: "abc123".into(),
            mergeable,
            mergeable_state: state,
            state: "open".into(),
            draft: false,
            merged: false,
            labels: vec![],
        }
    }

    #[test]
    fn test_format_analysis_mergeable() {
        colored::control::set_override(false);

        let analysis = unblock_core::analyze(
            &details(Mergeable::Yes, MergeableState::Clean),
            &[],
            &[],
        );
        let text = format_analysis(&analysis);

        assert_eq!(
            text,
            "✓ owner/repo#42 Add cache\n  https://github.com/owner/repo/pull/42"
        );
    }

    #[test]
    fn test_format_analysis_lists_blockers_in_order() {
        colored::control::set_override(false);

        let runs = vec![CheckRun::new("ci", "completed", Some(CheckConclusion::Failure))];
        let analysis = unblock_core::analyze(
            &details(Mergeable::No, MergeableState::Dirty),
            &[],
            &runs,
        );
        let text = format_analysis(&analysis);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("✗ owner/repo#42"));
        assert_eq!(lines[2], "  FAILING_CHECK Check 'ci' failed");
        assert_eq!(lines[3], "  MERGE_CONFLICT PR has merge conflicts");
        assert_eq!(lines[4], "      Resolve conflicts with the base branch");
    }

    #[test]
    fn test_format_blocker_indents_every_detail_line() {
        colored::control::set_override(false);

        let runs = vec![
            CheckRun::new("ci", "completed", Some(CheckConclusion::Failure)).with_output(
                CheckOutput {
                    title: None,
                    summary: Some("error[E0308]: mismatched types\nerror: aborting".into()),
                    text: None,
                },
            ),
        ];
        let analysis = unblock_core::analyze(
            &details(Mergeable::Yes, MergeableState::Clean),
            &[],
            &runs,
        );

        assert_eq!(
            format_blocker(&analysis.blockers[0]),
            "  FAILING_CHECK Check 'ci' failed\n      error[E0308]: mismatched types\n      error: aborting"
        );
    }

    #[test]
    fn test_format_analysis_notes_unanswered_comments() {
        colored::control::set_override(false);

        let comments = vec![
            ReviewComment::new(1),
            ReviewComment::new(2).reply_to(1),
            ReviewComment::new(3),
        ];
        let analysis = Analyzer::default().analyze_with_comments(
            &details(Mergeable::Yes, MergeableState::Clean),
            &[],
            &[],
            &comments,
        );
        let text = format_analysis(&analysis);

        assert!(text.starts_with("✓ owner/repo#42"));
        assert_eq!(
            text.lines().last(),
            Some("  note: 1 unanswered review comment(s)")
        );
    }

    #[test]
    fn test_state_tag_empty_for_open() {
        assert!(state_tag(PrState::Open).is_empty());
        assert!(state_tag(PrState::Draft).contains("draft"));
        assert!(state_tag(PrState::Merged).contains("merged"));
    }

    #[test]
    fn test_mergeable_indicator() {
        assert!(mergeable_indicator(true).contains('✓'));
        assert!(mergeable_indicator(false).contains('✗'));
    }

    #[test]
    fn test_quiet_mode_default() {
        // Reset to default state
        set_quiet(false);
        assert!(!is_quiet());
    }

    #[test]
    fn test_quiet_mode_enabled() {
        set_quiet(true);
        assert!(is_quiet());
        // Reset
        set_quiet(false);
    }
}
