//! Review labels such as `lgtm-alice` used by bot-driven review workflows.

use serde::Serialize;

/// What a review label says about its user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelStatus {
    Lgtm,
    Approved,
    ChangesRequested,
}

/// A review verdict carried by a pull request label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewLabel {
    pub username: String,
    pub status: LabelStatus,
}

const PREFIXES: &[(&str, LabelStatus)] = &[
    ("lgtm-", LabelStatus::Lgtm),
    ("approved-", LabelStatus::Approved),
    ("changes-requested-", LabelStatus::ChangesRequested),
    ("change-requested-", LabelStatus::ChangesRequested),
];

const KNOWN_BOTS: &[&str] = &["coderabbitai"];

impl ReviewLabel {
    /// Parse a single label name. Returns `None` for non-review labels and
    /// for labels naming a bot.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        let (username, status) = PREFIXES.iter().find_map(|(prefix, status)| {
            label
                .strip_prefix(prefix)
                .filter(|user| !user.is_empty())
                .map(|user| (user, *status))
        })?;

        if is_bot(username) {
            return None;
        }

        Some(Self {
            username: username.to_string(),
            status,
        })
    }
}

/// Parse every review label, in label order. No de-duplication.
#[must_use]
pub fn parse_review_labels<S: AsRef<str>>(labels: &[S]) -> Vec<ReviewLabel> {
    labels
        .iter()
        .filter_map(|label| ReviewLabel::parse(label.as_ref()))
        .collect()
}

fn is_bot(username: &str) -> bool {
    username.ends_with("[bot]") || username.ends_with("-bot") || KNOWN_BOTS.contains(&username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_each_prefix() {
        assert_eq!(
            ReviewLabel::parse("lgtm-alice"),
            Some(ReviewLabel {
                username: "alice".into(),
                status: LabelStatus::Lgtm
            })
        );
        assert_eq!(
            ReviewLabel::parse("approved-bob").map(|l| l.status),
            Some(LabelStatus::Approved)
        );
        assert_eq!(
            ReviewLabel::parse("changes-requested-carol").map(|l| l.status),
            Some(LabelStatus::ChangesRequested)
        );
        assert_eq!(
            ReviewLabel::parse("change-requested-dave").map(|l| l.username),
            Some("dave".to_string())
        );
    }

    #[test]
    fn test_non_review_labels_ignored() {
        for label in ["size/XS", "needs-rebase", "commented-eve", "lgtm-", "sig-network"] {
            assert_eq!(ReviewLabel::parse(label), None, "{label}");
        }
    }

    #[test]
    fn test_bots_filtered() {
        assert_eq!(ReviewLabel::parse("lgtm-coderabbitai"), None);
        assert_eq!(ReviewLabel::parse("lgtm-openshift-virtualization-qe-bot"), None);
        assert_eq!(ReviewLabel::parse("approved-somebot[bot]"), None);
    }

    #[test]
    fn test_same_user_under_two_statuses_kept() {
        let labels = parse_review_labels(&["approved-alice", "size/XS", "lgtm-alice"]);
        assert_eq!(labels.len(), 2);
        assert!(labels.iter().all(|l| l.username == "alice"));
        assert_eq!(labels[0].status, LabelStatus::Approved);
        assert_eq!(labels[1].status, LabelStatus::Lgtm);
    }
}
