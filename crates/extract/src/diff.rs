use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::dedup::fold_case;
use crate::schema::Entity;

/// Entities present on only one side of a request/response pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDiff {
    /// Found in the response but not in the request.
    pub potential_hallucinations: Vec<String>,
    /// Found in the request but not in the response.
    pub missing_entities: Vec<String>,
}

/// Compares two entity collections by label and name, ignoring case and
/// surrounding whitespace. Unlike [`crate::EntityDeduplicator`] there is no
/// fuzzy matching: a one-letter change counts as a different entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityDiffCalculator;

type EntityKey = (String, String);

impl EntityDiffCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Names come out trimmed, once per key, in order of first position.
    pub fn calculate(&self, request: &[Entity], response: &[Entity]) -> EntityDiff {
        let request = unique_by_key(request);
        let response = unique_by_key(response);

        let request_keys: HashSet<&EntityKey> = request.iter().map(|(key, _)| key).collect();
        let response_keys: HashSet<&EntityKey> = response.iter().map(|(key, _)| key).collect();

        EntityDiff {
            potential_hallucinations: only_in(&response, &request_keys),
            missing_entities: only_in(&request, &response_keys),
        }
    }
}

fn entity_key(entity: &Entity) -> EntityKey {
    (fold_case(&entity.label), fold_case(entity.text.trim()))
}

fn unique_by_key(entities: &[Entity]) -> Vec<(EntityKey, String)> {
    let mut ordered: Vec<&Entity> = entities.iter().collect();
    ordered.sort_by_key(|entity| entity.start);

    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for entity in ordered {
        let key = entity_key(entity);
        if seen.insert(key.clone()) {
            unique.push((key, entity.text.trim().to_string()));
        }
    }
    unique
}

fn only_in(side: &[(EntityKey, String)], other: &HashSet<&EntityKey>) -> Vec<String> {
    side.iter()
        .filter(|(key, _)| !other.contains(key))
        .map(|(_, text)| text.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(text: &str, start: usize) -> Entity {
        Entity::new(text, "Person", start, start + text.chars().count())
    }

    #[test]
    fn test_identical_sides_have_no_diff() {
        let entities = vec![person("Alice", 0), person("Bob", 10)];
        let diff = EntityDiffCalculator::new().calculate(&entities, &entities);

        assert_eq!(diff, EntityDiff::default());
    }

    #[test]
    fn test_response_only_entities_are_hallucinations() {
        let request = vec![person("Alice", 0)];
        let response = vec![person("Alice", 0), person("Mallory", 12)];

        let diff = EntityDiffCalculator::new().calculate(&request, &response);

        assert_eq!(diff.potential_hallucinations, vec!["Mallory"]);
        assert!(diff.missing_entities.is_empty());
    }

    #[test]
    fn test_request_only_entities_are_missing() {
        let request = vec![person("Alice", 0), person("Bob", 9)];
        let response = vec![person("Bob", 3)];

        let diff = EntityDiffCalculator::new().calculate(&request, &response);

        assert!(diff.potential_hallucinations.is_empty());
        assert_eq!(diff.missing_entities, vec!["Alice"]);
    }

    #[test]
    fn test_case_and_whitespace_are_ignored() {
        let request = vec![person(" Straße ", 0), Entity::new("Paris", "location", 8, 13)];
        let response = vec![person("STRASSE", 4), Entity::new("paris", "Location", 0, 5)];

        let diff = EntityDiffCalculator::new().calculate(&request, &response);

        assert_eq!(diff, EntityDiff::default());
    }

    #[test]
    fn test_label_is_part_of_identity() {
        let request = vec![Entity::new("Jordan", "Person", 0, 6)];
        let response = vec![Entity::new("Jordan", "Location", 0, 6)];

        let diff = EntityDiffCalculator::new().calculate(&request, &response);

        assert_eq!(diff.potential_hallucinations, vec!["Jordan"]);
        assert_eq!(diff.missing_entities, vec!["Jordan"]);
    }

    #[test]
    fn test_output_is_unique_and_ordered_by_position() {
        let response = vec![
            person("Carol", 30),
            person("Dave", 5),
            person("carol ", 40),
            person("Dave", 50),
        ];

        let diff = EntityDiffCalculator::new().calculate(&[], &response);

        assert_eq!(diff.potential_hallucinations, vec!["Dave", "Carol"]);
    }
}
