//! Suggests a category for a new expense from the user's past expenses.

use std::collections::{BTreeMap, HashSet};

use crate::expense::Expense;

fn words(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Suggest a category for an expense titled `title`.
///
/// Each past expense votes for its category once for every word its title
/// shares with `title`, ignoring case and punctuation. The category with the
/// most votes wins and ties go to the category that sorts first.
///
/// # Returns
/// `None` if `title` has no words or no past expense shares a word with it.
pub fn suggest_category(title: &str, history: &[Expense]) -> Option<String> {
    let title_words = words(title);
    if title_words.is_empty() {
        return None;
    }

    let mut votes: BTreeMap<&str, usize> = BTreeMap::new();

    for expense in history {
        let shared = words(&expense.title).intersection(&title_words).count();

        if shared > 0 {
            *votes.entry(expense.category.as_str()).or_default() += shared;
        }
    }

    let mut best: Option<(&str, usize)> = None;

    for (category, count) in votes {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((category, count));
        }
    }

    best.map(|(category, _)| category.to_owned())
}
