use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Entity schema as loaded from JSON: each entity type carries an ordered
/// list of raw regex pattern strings.
#[derive(Debug, Clone, Deserialize)]
pub struct EntitySchema {
    #[serde(default)]
    pub entities: Vec<EntityPatterns>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityPatterns {
    pub name: String,
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Compiled, immutable entity rules. Declaration order is preserved; a
/// pattern that fails to compile is dropped with a warning, and an entity
/// type left without any valid pattern is dropped entirely.
#[derive(Debug)]
pub struct RegexNer {
    rules: Vec<(String, Vec<Regex>)>,
}

impl RegexNer {
    pub fn new(schema: &EntitySchema) -> Self {
        let mut rules = Vec::with_capacity(schema.entities.len());
        for ent in &schema.entities {
            let mut compiled = Vec::with_capacity(ent.patterns.len());
            for pat in &ent.patterns {
                match RegexBuilder::new(pat).case_insensitive(true).build() {
                    Ok(re) => compiled.push(re),
                    Err(err) => warn!(
                        entity = %ent.name,
                        pattern = %pat,
                        %err,
                        "dropping entity pattern that failed to compile"
                    ),
                }
            }
            if !compiled.is_empty() {
                rules.push((ent.name.clone(), compiled));
            }
        }
        Self { rules }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.iter().map(|(_, pats)| pats.len()).sum()
    }

    /// Extract entities from the raw (un-normalized) text. Per entity type,
    /// matches are collected left to right across its patterns, trimmed, and
    /// deduplicated with first occurrence keeping its position. Types with
    /// no match are absent from the map.
    pub fn extract(&self, text: &str) -> BTreeMap<String, Vec<String>> {
        let mut found: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, patterns) in &self.rules {
            for re in patterns {
                for m in re.find_iter(text) {
                    let val = m.as_str().trim();
                    let values = found.entry(name.clone()).or_default();
                    if !values.iter().any(|v| v == val) {
                        values.push(val.to_string());
                    }
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(entities: &[(&str, &[&str])]) -> EntitySchema {
        EntitySchema {
            entities: entities
                .iter()
                .map(|(name, patterns)| EntityPatterns {
                    name: name.to_string(),
                    patterns: patterns.iter().map(|p| p.to_string()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn extracts_case_insensitively_from_raw_text() {
        let ner = RegexNer::new(&schema(&[("NIVEAU", &[r"\blicence\s*[123]\b"])]));
        let out = ner.extract("Frais pour la Licence 2 ?");
        assert_eq!(out["NIVEAU"], vec!["Licence 2"]);
    }

    #[test]
    fn dedups_values_and_keeps_first_seen_order() {
        let ner = RegexNer::new(&schema(&[("MONTANT", &[r"\d+\s*fcfa"])]));
        let out = ner.extract("payer 50000 FCFA puis 25000 fcfa puis 50000 FCFA");
        assert_eq!(out["MONTANT"], vec!["50000 FCFA", "25000 fcfa"]);
    }

    #[test]
    fn omits_entity_types_without_matches() {
        let ner = RegexNer::new(&schema(&[
            ("NIVEAU", &[r"\blicence\b"]),
            ("MONTANT", &[r"\d+\s*fcfa"]),
        ]));
        let out = ner.extract("question sur la licence");
        assert!(out.contains_key("NIVEAU"));
        assert!(!out.contains_key("MONTANT"));
    }

    #[test]
    fn invalid_pattern_is_dropped_not_fatal() {
        let ner = RegexNer::new(&schema(&[("NIVEAU", &[r"(((", r"\blicence\b"])]));
        assert_eq!(ner.rule_count(), 1);
        let out = ner.extract("la licence");
        assert_eq!(out["NIVEAU"], vec!["licence"]);
    }

    #[test]
    fn entity_type_with_only_invalid_patterns_is_dropped() {
        let ner = RegexNer::new(&schema(&[("BROKEN", &[r"((("])]));
        assert_eq!(ner.rule_count(), 0);
        assert!(ner.extract("anything").is_empty());
    }

    #[test]
    fn collects_across_multiple_patterns_of_one_type() {
        let ner = RegexNer::new(&schema(&[(
            "CONTACT",
            &[r"[a-z0-9.]+@[a-z0-9.]+\.[a-z]{2,}", r"\b\d{8}\b"],
        )]));
        let out = ner.extract("écrire à scolarite@uv.bf ou appeler le 70123456");
        assert_eq!(out["CONTACT"], vec!["scolarite@uv.bf", "70123456"]);
    }
}
