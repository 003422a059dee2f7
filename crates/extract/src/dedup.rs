use crate::levenshtein::levenshtein_distance;

pub const DEFAULT_DEDUP_THRESHOLD: usize = 2;

/// Collapses near-duplicate entity names into first-seen representatives.
///
/// Two names are duplicates when they are equal after trimming and case
/// folding, or when the edit distance between the folded forms is at most
/// `threshold`. The threshold is absolute, so very short names (two or
/// three chars) merge readily; this is accepted behaviour.
#[derive(Debug, Clone, Copy)]
pub struct EntityDeduplicator {
    threshold: usize,
}

impl Default for EntityDeduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_THRESHOLD)
    }
}

impl EntityDeduplicator {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Deduplicate `entities`, keeping input order of the survivors.
    ///
    /// Survivors are trimmed but otherwise keep their original casing and
    /// spelling. Blank names are dropped.
    pub fn deduplicate<I, S>(&self, entities: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // (representative, folded form)
        let mut canonical: Vec<(String, String)> = Vec::new();

        for entity in entities {
            let trimmed = entity.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }

            let folded = fold_case(trimmed);
            let seen = canonical
                .iter()
                .any(|(_, existing)| self.folded_match(&folded, existing));

            if !seen {
                canonical.push((trimmed.to_string(), folded));
            }
        }

        canonical.into_iter().map(|(name, _)| name).collect()
    }

    pub fn is_duplicate(&self, a: &str, b: &str) -> bool {
        self.folded_match(&fold_case(a.trim()), &fold_case(b.trim()))
    }

    fn folded_match(&self, a: &str, b: &str) -> bool {
        a == b || levenshtein_distance(a, b) <= self.threshold
    }
}

/// Caseless comparison form of `name`.
///
/// Lowercasing plus the full case foldings that lowercasing misses for
/// `ß` and final sigma. Other multi-char foldings (ligatures, some Armenian
/// and Greek forms) are not applied.
pub fn fold_case(name: &str) -> String {
    let mut folded = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        match c {
            'ß' => folded.push_str("ss"),
            'ς' => folded.push('σ'),
            _ => folded.push(c),
        }
    }
    folded
}

/// Deduplicate with the default threshold.
///
/// Names are trimmed first; blank or whitespace-only names are dropped
/// rather than kept as an empty entry.
pub fn deduplicate_entities<I, S>(entities: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    EntityDeduplicator::default().deduplicate(entities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let empty: Vec<String> = Vec::new();
        assert!(deduplicate_entities(empty).is_empty());
    }

    #[test]
    fn test_case_insensitive_keeps_first_casing() {
        assert_eq!(deduplicate_entities(["Alice", "alice"]), vec!["Alice"]);
        assert_eq!(deduplicate_entities(["ALICE", "Alice"]), vec!["ALICE"]);
    }

    #[test]
    fn test_fuzzy_merge_within_threshold() {
        assert_eq!(deduplicate_entities(["мосбилет", "мосбилета"]), vec!["мосбилет"]);
        assert_eq!(deduplicate_entities(["Мосбилета", "мосбилет"]), vec!["Мосбилета"]);
    }

    #[test]
    fn test_no_merge_beyond_threshold() {
        assert_eq!(deduplicate_entities(["cat", "dog"]), vec!["cat", "dog"]);
    }

    #[test]
    fn test_all_duplicates_collapse_to_one() {
        let names = ["Moscow", "moscow", "MOSCOW", "Moskow", "Moscow "];
        assert_eq!(deduplicate_entities(names), vec!["Moscow"]);
    }

    #[test]
    fn test_short_names_over_merge() {
        // Distance 2 between "AI" and "ML" is within the absolute threshold.
        assert_eq!(deduplicate_entities(["AI", "ML"]), vec!["AI"]);
    }

    #[test]
    fn test_blank_names_are_dropped() {
        assert_eq!(deduplicate_entities(["", "  ", "Paris"]), vec!["Paris"]);
    }

    #[test]
    fn test_custom_threshold() {
        let strict = EntityDeduplicator::new(0);
        assert_eq!(strict.deduplicate(["мосбилет", "мосбилета"]).len(), 2);
        assert_eq!(strict.deduplicate(["Paris", "PARIS"]), vec!["Paris"]);
    }

    #[test]
    fn test_full_case_folding() {
        assert_eq!(fold_case("STRASSE"), fold_case("straße"));
        assert_eq!(fold_case("ΣΟΦΟΣ"), fold_case("σοφος"));

        let strict = EntityDeduplicator::new(0);
        assert_eq!(strict.deduplicate(["Straße", "STRASSE"]), vec!["Straße"]);
        assert!(strict.is_duplicate("Σοφος", "ΣΟΦΟΣ"));
    }

    #[test]
    fn test_idempotent() {
        let inputs: Vec<Vec<&str>> = vec![
            vec!["Alice", "alice", "Bob", "Bobby", "Robert"],
            vec!["GET /api/users", "get /api/users", "GET /api/user", "POST /api/users"],
            vec!["мосбилет", "Мосбилета", "билет", "Москва", "москва"],
            vec!["a", "b", "c", "abcd", "abce"],
        ];
        let dedup = EntityDeduplicator::default();

        for input in inputs {
            let once = dedup.deduplicate(&input);
            let twice = dedup.deduplicate(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_survivors_are_pairwise_distinct() {
        let dedup = EntityDeduplicator::default();
        let out = dedup.deduplicate(["Paris", "London", "Berlin", "Parris", "london", "Bern"]);

        for (i, a) in out.iter().enumerate() {
            for b in &out[i + 1..] {
                assert!(!dedup.is_duplicate(a, b), "{a} ~ {b}");
            }
        }
    }
}
