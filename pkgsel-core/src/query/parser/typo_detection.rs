//! Typo detection using Levenshtein distance for "did you mean" suggestions.
//!
//! Selector and function names are opaque to the parser and are only checked
//! against the catalog at evaluation time. When a name is unknown, the
//! evaluator asks this module for the closest registered name.
//!
//! ## Design Principles
//!
//! - Only suggest names within distance 2 (prevents false positives)
//! - Case-insensitive matching (`reaches` matches `Reaches`)
//! - Ties go to the candidate seen first, so callers pass names in a stable
//!   order

/// Largest edit distance still worth suggesting.
pub const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Find the closest candidate to `input`.
///
/// Returns `Some(candidate)` if one is within [`MAX_SUGGESTION_DISTANCE`]
/// edits, `None` otherwise. An exact (case-insensitive) match is returned as
/// is, which lets callers point out capitalization mistakes.
///
/// ## Examples
///
/// ```
/// use pkgsel_core::query::parser::typo_detection::find_closest_name;
///
/// let names = ["all", "import", "test", "+test", "-test"];
/// assert_eq!(find_closest_name("imprt", names), Some("import".to_string()));
/// assert_eq!(find_closest_name("xyzzy", names), None);
/// ```
#[must_use]
pub fn find_closest_name<'c>(
    input: &str,
    candidates: impl IntoIterator<Item = &'c str>,
) -> Option<String> {
    let input_lower = input.to_ascii_lowercase();

    let mut closest: Option<&str> = None;
    let mut min_distance = usize::MAX;

    for candidate in candidates {
        let candidate_lower = candidate.to_ascii_lowercase();

        // Length difference is a lower bound on the distance
        let len_diff = input_lower.len().abs_diff(candidate_lower.len());
        if len_diff > MAX_SUGGESTION_DISTANCE {
            continue;
        }

        let distance = levenshtein_distance(&input_lower, &candidate_lower);
        if distance <= MAX_SUGGESTION_DISTANCE && distance < min_distance {
            min_distance = distance;
            closest = Some(candidate);
        }
    }

    closest.map(ToString::to_string)
}

/// Compute Levenshtein distance between two strings.
///
/// Wagner-Fischer with two rolling rows, so space is O(n) in the length of
/// `s2`.
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row: Vec<usize> = vec![0; len2 + 1];

    let s2_chars: Vec<char> = s2.chars().collect();

    for (i, c1) in s1.chars().enumerate() {
        curr_row[0] = i + 1;

        for (j, &c2) in s2_chars.iter().enumerate() {
            let cost = usize::from(c1 != c2);

            curr_row[j + 1] = (curr_row[j] + 1) // insertion
                .min(prev_row[j + 1] + 1) // deletion
                .min(prev_row[j] + cost); // substitution
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len2]
}
