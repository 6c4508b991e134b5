//! String similarity used for fuzzy matching.

use std::collections::HashMap;

/// Sørensen–Dice coefficient over character bigrams, whitespace ignored.
///
/// Identical inputs score 1.0; inputs shorter than two characters score 0.0
/// unless identical.
pub fn dice_coefficient(first: &str, second: &str) -> f64 {
    let first: Vec<char> = first.chars().filter(|c| !c.is_whitespace()).collect();
    let second: Vec<char> = second.chars().filter(|c| !c.is_whitespace()).collect();

    if first == second {
        return 1.0;
    }
    if first.len() < 2 || second.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::with_capacity(first.len());
    for pair in first.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut intersection = 0usize;
    for pair in second.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                intersection += 1;
            }
        }
    }

    (2.0 * intersection as f64) / (first.len() + second.len() - 2) as f64
}

/// Score an aggregated candidate text against one search term.
///
/// Substring containment forces 1.0 whatever the similarity. Both inputs are
/// expected lowercase already.
pub fn score_term(text: &str, term: &str) -> f64 {
    // Short terms such as "x" or "+" are contained by many unrelated texts and
    // still force a perfect score.
    if text.contains(term) {
        1.0
    } else {
        dice_coefficient(text, term)
    }
}

/// Best score of `text` over every non-empty term.
pub fn best_term_score<'a, I>(text: &str, terms: I) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    terms
        .into_iter()
        .filter(|term| !term.trim().is_empty())
        .map(|term| score_term(text, term))
        .fold(0.0, f64::max)
}
