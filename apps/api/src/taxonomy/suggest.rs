//! Tag suggestion.
//!
//! Candidate tag names (from the LLM or the caller) are matched against the
//! tenant's existing tags by Levenshtein ratio. Candidates that match nothing
//! become proposals for new tags.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::taxonomy::TagRow;

/// Edit distance over Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// `1 - distance / max_len` on trimmed, lowercased input. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / max_len as f64
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagMatch {
    pub candidate: String,
    pub tag_id: Uuid,
    pub tag_slug: String,
    pub matched_name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TagSuggestions {
    pub existing: Vec<TagMatch>,
    pub new: Vec<String>,
}

/// Best-scoring existing tag for `candidate` across all localized names.
fn best_match(candidate: &str, tags: &[TagRow], threshold: f64) -> Option<TagMatch> {
    let mut best: Option<TagMatch> = None;
    for tag in tags {
        for name in tag.name.values() {
            let score = similarity(candidate, name);
            if score >= threshold && best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(TagMatch {
                    candidate: candidate.to_string(),
                    tag_id: tag.id,
                    tag_slug: tag.slug.clone(),
                    matched_name: name.to_string(),
                    score,
                });
            }
        }
    }
    best
}

pub fn match_candidates<S: AsRef<str>>(
    candidates: &[S],
    tags: &[TagRow],
    threshold: f64,
) -> TagSuggestions {
    let mut out = TagSuggestions::default();
    for candidate in candidates {
        let candidate = candidate.as_ref().trim();
        if candidate.is_empty() {
            continue;
        }
        match best_match(candidate, tags, threshold) {
            Some(m) => {
                if !out.existing.iter().any(|e| e.tag_id == m.tag_id) {
                    out.existing.push(m);
                }
            }
            None => {
                let duplicate = out
                    .new
                    .iter()
                    .any(|n| similarity(n, candidate) >= threshold);
                if !duplicate {
                    out.new.push(candidate.to_string());
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Lang;
    use crate::models::taxonomy::testing::sample_tag;

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
        assert_eq!(levenshtein("ラーメン", "ラメン"), 1);
    }

    #[test]
    fn test_similarity_is_case_insensitive() {
        assert_eq!(similarity("Tokyo", " tokyo "), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert!((similarity("ramen", "ramens") - (1.0 - 1.0 / 6.0)).abs() < 1e-9);
    }

    #[test]
    fn test_candidates_match_existing_tags_in_any_language() {
        let tenant = Uuid::new_v4();
        let mut ramen = sample_tag(tenant, "ramen", "ラーメン");
        ramen.name.0.set(Lang::En, "Ramen");
        let sushi = sample_tag(tenant, "sushi", "寿司");

        let result = match_candidates(&["ramens", "寿司", "Kyoto"], &[ramen.clone(), sushi], 0.8);

        assert_eq!(result.existing.len(), 2);
        assert_eq!(result.existing[0].tag_id, ramen.id);
        assert_eq!(result.existing[0].matched_name, "Ramen");
        assert_eq!(result.new, vec!["Kyoto".to_string()]);
    }

    #[test]
    fn test_new_proposals_are_deduplicated() {
        let result = match_candidates(&["Street Food", "street food", "streetfood", " "], &[], 0.8);
        assert_eq!(result.new, vec!["Street Food".to_string()]);
    }

    #[test]
    fn test_same_tag_reported_once() {
        let tenant = Uuid::new_v4();
        let mut tag = sample_tag(tenant, "ramen", "ラーメン");
        tag.name.0.set(Lang::En, "Ramen");
        let result = match_candidates(&["ramen", "Ramen!"], &[tag], 0.8);
        assert_eq!(result.existing.len(), 1);
        assert!(result.new.is_empty());
    }
}
