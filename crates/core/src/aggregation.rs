//! Grouped review summaries for admins.
//!
//! The aggregator is pure: callers pass every review they hold and a reviewer
//! directory, and get back a summary grouped by overall rating.

use std::collections::HashMap;

use serde::Serialize;

/// Group label for reviews without an overall rating.
pub const NO_RATING_LABEL: &str = "No Rating";

/// Display name for reviewers missing from the directory.
pub const UNKNOWN_REVIEWER: &str = "Unknown";

/// Number of id characters shown when a reviewer has neither name nor email.
pub const TRUNCATED_ID_LENGTH: usize = 8;

/// The fields of a review the aggregator reads.
pub trait RatedReview {
    fn pitch_id(&self) -> &str;
    fn reviewer_id(&self) -> &str;
    fn overall_rating(&self) -> Option<&str>;
}

/// Directory entry used to render a reviewer's display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewerProfile {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Reviewers keyed by account id.
pub type ReviewerDirectory = HashMap<String, ReviewerProfile>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingGroup {
    pub rating: String,
    pub count: usize,
    /// Display names, in the order the reviews were supplied.
    pub reviewers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedSummary {
    pub pitch_id: String,
    /// Sorted by descending count, then rating label.
    pub groups: Vec<RatingGroup>,
    /// Sum of all group counts.
    pub count: usize,
}

impl GroupedSummary {
    pub fn group(&self, rating: &str) -> Option<&RatingGroup> {
        self.groups.iter().find(|g| g.rating == rating)
    }
}

/// Resolve a reviewer's display name: name, then email, then a truncated id.
/// Reviewers absent from the directory render as [`UNKNOWN_REVIEWER`].
pub fn reviewer_display_name(reviewer_id: &str, directory: &ReviewerDirectory) -> String {
    let Some(profile) = directory.get(reviewer_id) else {
        return UNKNOWN_REVIEWER.to_string();
    };

    let non_blank = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    non_blank(&profile.name)
        .or_else(|| non_blank(&profile.email))
        .unwrap_or_else(|| {
            if reviewer_id.is_empty() {
                UNKNOWN_REVIEWER.to_string()
            } else {
                reviewer_id.chars().take(TRUNCATED_ID_LENGTH).collect()
            }
        })
}

/// Summarize the reviews of `pitch_id`, ignoring reviews of other pitches.
pub fn aggregate_reviews<R: RatedReview>(
    pitch_id: &str,
    reviews: &[R],
    directory: &ReviewerDirectory,
) -> GroupedSummary {
    let mut groups: Vec<RatingGroup> = Vec::new();

    for review in reviews.iter().filter(|r| r.pitch_id() == pitch_id) {
        let label = review
            .overall_rating()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(NO_RATING_LABEL);
        let name = reviewer_display_name(review.reviewer_id(), directory);

        match groups.iter_mut().find(|g| g.rating == label) {
            Some(group) => {
                group.count += 1;
                group.reviewers.push(name);
            }
            None => groups.push(RatingGroup {
                rating: label.to_string(),
                count: 1,
                reviewers: vec![name],
            }),
        }
    }

    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.rating.cmp(&b.rating)));
    let count = groups.iter().map(|g| g.count).sum();

    GroupedSummary {
        pitch_id: pitch_id.to_string(),
        groups,
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        pitch: &'static str,
        reviewer: &'static str,
        rating: Option<&'static str>,
    }

    impl RatedReview for Sample {
        fn pitch_id(&self) -> &str {
            self.pitch
        }
        fn reviewer_id(&self) -> &str {
            self.reviewer
        }
        fn overall_rating(&self) -> Option<&str> {
            self.rating
        }
    }

    fn sample(pitch: &'static str, reviewer: &'static str, rating: Option<&'static str>) -> Sample {
        Sample {
            pitch,
            reviewer,
            rating,
        }
    }

    fn directory() -> ReviewerDirectory {
        let mut dir = ReviewerDirectory::new();
        dir.insert(
            "alice".into(),
            ReviewerProfile {
                name: Some("Alice A".into()),
                email: Some("alice@x.org".into()),
            },
        );
        dir.insert(
            "bob".into(),
            ReviewerProfile {
                name: None,
                email: Some("bob@x.org".into()),
            },
        );
        dir.insert(
            "carol-0123456789".into(),
            ReviewerProfile {
                name: Some("  ".into()),
                email: None,
            },
        );
        dir
    }

    #[test]
    fn test_empty_summary() {
        let summary = aggregate_reviews::<Sample>("P1", &[], &directory());
        assert_eq!(summary.count, 0);
        assert!(summary.groups.is_empty());
        assert_eq!(summary.pitch_id, "P1");
    }

    #[test]
    fn test_single_review() {
        let reviews = [sample("P1", "alice", Some("Pass"))];
        let summary = aggregate_reviews("P1", &reviews, &directory());
        assert_eq!(summary.count, 1);
        assert_eq!(summary.groups.len(), 1);
        assert_eq!(summary.groups[0].reviewers, vec!["Alice A".to_string()]);
    }

    #[test]
    fn test_two_favorites_grouped() {
        let reviews = [
            sample("P2", "alice", Some("Favorite")),
            sample("P2", "bob", Some("Favorite")),
        ];
        let summary = aggregate_reviews("P2", &reviews, &directory());
        assert_eq!(summary.count, 2);
        let fav = summary.group("Favorite").expect("Favorite group");
        assert_eq!(fav.count, 2);
        assert_eq!(fav.reviewers, vec!["Alice A".to_string(), "bob@x.org".to_string()]);
    }

    #[test]
    fn test_missing_rating_bucketed_and_sorted() {
        let reviews = [
            sample("P3", "alice", None),
            sample("P3", "bob", Some("Maybe")),
            sample("P3", "carol-0123456789", None),
            sample("P3", "dave", Some("   ")),
            sample("OTHER", "alice", Some("Favorite")),
        ];
        let summary = aggregate_reviews("P3", &reviews, &directory());

        assert_eq!(summary.count, 4);
        assert_eq!(summary.groups[0].rating, NO_RATING_LABEL);
        assert_eq!(summary.groups[0].count, 3);
        assert_eq!(summary.groups[1].rating, "Maybe");
        assert!(summary.group("Favorite").is_none());
        let total: usize = summary.groups.iter().map(|g| g.count).sum();
        assert_eq!(total, summary.count);
    }

    #[test]
    fn test_display_name_fallbacks() {
        let dir = directory();
        assert_eq!(reviewer_display_name("alice", &dir), "Alice A");
        assert_eq!(reviewer_display_name("bob", &dir), "bob@x.org");
        assert_eq!(reviewer_display_name("carol-0123456789", &dir), "carol-01");
        assert_eq!(reviewer_display_name("ghost", &dir), UNKNOWN_REVIEWER);
    }

    #[test]
    fn test_equal_counts_sorted_by_label() {
        let reviews = [
            sample("P4", "alice", Some("Pass")),
            sample("P4", "bob", Some("Favorite")),
        ];
        let summary = aggregate_reviews("P4", &reviews, &directory());
        let labels: Vec<&str> = summary.groups.iter().map(|g| g.rating.as_str()).collect();
        assert_eq!(labels, vec!["Favorite", "Pass"]);
    }
}
