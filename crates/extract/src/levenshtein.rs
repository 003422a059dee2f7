//! Edit distance between entity surface forms.
//!
//! Both functions compare strings exactly as given, char by char. Callers
//! that want case-insensitive comparison fold case first.

/// Minimum number of single-char insertions, deletions or substitutions
/// turning `a` into `b`.
///
/// Runs in O(len(a) * len(b)) time and keeps a single row sized to the
/// shorter input.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return long.len();
    }

    let mut row: Vec<usize> = (0..=short.len()).collect();

    for (i, lc) in long.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, sc) in short.iter().enumerate() {
            let substitution = diagonal + usize::from(lc != sc);
            let deletion = row[j + 1] + 1;
            let insertion = row[j] + 1;

            diagonal = row[j + 1];
            row[j + 1] = substitution.min(deletion).min(insertion);
        }
    }

    row[short.len()]
}

/// `1 - distance / max(len(a), len(b), 1)`, in `[0, 1]`.
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count()).max(1);
    1.0 - levenshtein_distance(a, b) as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_similarity("", ""), 1.0);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("héllo", ""), 5);
    }

    #[test]
    fn test_classic_pairs() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("flaw", "lawn"), 2);
        assert_eq!(levenshtein_distance("cat", "dog"), 3);
        assert_eq!(levenshtein_distance("same", "same"), 0);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        assert_eq!(levenshtein_distance("мосбилет", "мосбилета"), 1);
        assert_eq!(levenshtein_distance("café", "cafe"), 1);
    }

    #[test]
    fn test_is_symmetric() {
        let pairs = [("GraphRAG", "graph rag"), ("abc", "abcdef"), ("Paris", "Parisian")];
        for (a, b) in pairs {
            assert_eq!(levenshtein_distance(a, b), levenshtein_distance(b, a));
        }
    }

    #[test]
    fn test_is_case_sensitive() {
        assert_eq!(levenshtein_distance("Alice", "alice"), 1);
    }

    #[test]
    fn test_similarity_range() {
        assert_eq!(levenshtein_similarity("abc", "abc"), 1.0);
        assert_eq!(levenshtein_similarity("abc", "xyz"), 0.0);
        assert!((levenshtein_similarity("kitten", "sitting") - (1.0 - 3.0 / 7.0)).abs() < 1e-9);
    }
}
