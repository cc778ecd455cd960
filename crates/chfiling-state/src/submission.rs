//! Submission-number format.
//!
//! Numbers are a fixed prefix followed by the zero-padded submission
//! counter: `S00001`, `S00002`, ... The gateway accepts up to nine
//! characters after the prefix.

/// Prefix of every submission number.
pub const SUBMISSION_PREFIX: &str = "S";

/// Minimum number of characters after the prefix.
pub const SUBMISSION_DIGITS: usize = 5;

const MAX_SUBMISSION_SUFFIX: usize = 9;

/// Largest counter whose formatted number still fits the nine-character suffix.
pub const MAX_SUBMISSION_COUNTER: u64 = 999_999_999;

/// Format a counter value as a submission number.
pub fn format_submission_number(counter: u64) -> String {
    format!("{SUBMISSION_PREFIX}{counter:0width$}", width = SUBMISSION_DIGITS)
}

/// Returns true if `candidate` is a well-formed submission number.
pub fn is_submission_number(candidate: &str) -> bool {
    match candidate.strip_prefix(SUBMISSION_PREFIX) {
        Some(rest) => {
            (SUBMISSION_DIGITS..=MAX_SUBMISSION_SUFFIX).contains(&rest.len())
                && rest.bytes().all(|b| b.is_ascii_alphanumeric())
        }
        None => false,
    }
}
