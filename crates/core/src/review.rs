//! Review keys and payload validation.
//!
//! A reviewer has exactly one review per pitch. The review's primary key is
//! the composite `reviewer_id:pitch_id`, so writes upsert by construction.

use std::collections::BTreeMap;

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Separator between reviewer id and pitch id in a review key.
pub const REVIEW_KEY_SEPARATOR: char = ':';

/// Lowest accepted criterion score.
pub const MIN_CRITERION_SCORE: i16 = 1;

/// Highest accepted criterion score.
pub const MAX_CRITERION_SCORE: i16 = 5;

/// Maximum number of scored criteria per review.
pub const MAX_CRITERIA: usize = 20;

/// Maximum length for a criterion name.
pub const MAX_CRITERION_NAME_LENGTH: usize = 64;

/// Maximum length for review comments.
pub const MAX_COMMENT_LENGTH: usize = 10_000;

pub const RATING_FAVORITE: &str = "Favorite";
pub const RATING_STRONG: &str = "Strong";
pub const RATING_MAYBE: &str = "Maybe";
pub const RATING_PASS: &str = "Pass";

/// All valid overall rating values.
pub const VALID_OVERALL_RATINGS: &[&str] =
    &[RATING_FAVORITE, RATING_STRONG, RATING_MAYBE, RATING_PASS];

/* --------------------------------------------------------------------------
Keys
-------------------------------------------------------------------------- */

/// Build the primary key of the review `reviewer_id` wrote for `pitch_id`.
pub fn review_key(reviewer_id: &str, pitch_id: &str) -> String {
    format!("{reviewer_id}{REVIEW_KEY_SEPARATOR}{pitch_id}")
}

/// Pick the chapter a review is filed under: the pitch's chapter, or the
/// reviewer's when the pitch has none.
pub fn review_chapter<'a>(pitch_chapter: &'a str, reviewer_chapter: Option<&'a str>) -> &'a str {
    let pitch_chapter = pitch_chapter.trim();
    if pitch_chapter.is_empty() {
        reviewer_chapter.unwrap_or_default()
    } else {
        pitch_chapter
    }
}

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

/// Validate an optional overall rating. Blank strings count as "no rating".
pub fn validate_overall_rating(rating: Option<&str>) -> Result<Option<String>, CoreError> {
    match rating.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(None),
        Some(r) if VALID_OVERALL_RATINGS.contains(&r) => Ok(Some(r.to_string())),
        Some(r) => Err(CoreError::Validation(format!(
            "Invalid overall rating '{r}'. Must be one of: {}",
            VALID_OVERALL_RATINGS.join(", ")
        ))),
    }
}

/// Validate per-criterion scores.
pub fn validate_criterion_scores(scores: &BTreeMap<String, i16>) -> Result<(), CoreError> {
    if scores.len() > MAX_CRITERIA {
        return Err(CoreError::Validation(format!(
            "A review may score at most {MAX_CRITERIA} criteria"
        )));
    }

    for (name, score) in scores {
        if name.trim().is_empty() || name.chars().count() > MAX_CRITERION_NAME_LENGTH {
            return Err(CoreError::Validation(format!(
                "Invalid criterion name '{name}'"
            )));
        }
        if !(MIN_CRITERION_SCORE..=MAX_CRITERION_SCORE).contains(score) {
            return Err(CoreError::Validation(format!(
                "Score for '{name}' must be between {MIN_CRITERION_SCORE} and {MAX_CRITERION_SCORE}, got {score}"
            )));
        }
    }

    Ok(())
}

/// Validate optional comments. Blank comments are dropped.
pub fn validate_comments(comments: Option<&str>) -> Result<Option<String>, CoreError> {
    match comments.map(str::trim).filter(|c| !c.is_empty()) {
        None => Ok(None),
        Some(c) if c.len() > MAX_COMMENT_LENGTH => Err(CoreError::Validation(format!(
            "Comments exceed maximum length of {MAX_COMMENT_LENGTH} characters"
        ))),
        Some(c) => Ok(Some(c.to_string())),
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
