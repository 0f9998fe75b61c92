use std::collections::HashMap;

use super::Category;

/// Picks the most frequent category.
///
/// Ties go to the category that reached the winning count first while scanning
/// `selections` in order. Returns `None` only for an empty slice.
pub fn score(selections: &[Category]) -> Option<Category> {
    let mut counts: HashMap<Category, usize> = HashMap::new();
    let mut leader = None;
    let mut best = 0;

    for &category in selections {
        let count = counts.entry(category).or_default();
        *count += 1;
        if *count > best {
            best = *count;
            leader = Some(category);
        }
    }

    leader
}
