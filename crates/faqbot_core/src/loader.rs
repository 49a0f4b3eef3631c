use crate::error::LoadError;
use crate::model::KnowledgeEntry;
use crate::ner::EntitySchema;
use crate::template::{TemplateFile, TemplateSpec};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Raw CSV row. Every column defaults to empty so a knowledge base missing
/// optional columns still loads.
#[derive(Debug, Deserialize)]
struct RawKnowledgeRow {
    #[serde(default)]
    id: String,
    #[serde(default)]
    categorie: String,
    #[serde(default)]
    question_canonique: String,
    #[serde(default)]
    variantes: String,
    #[serde(default)]
    reponse: String,
    #[serde(default)]
    liens: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    derniere_mise_a_jour: String,
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn none_if_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn load_knowledge_csv(path: &Path) -> Result<Vec<KnowledgeEntry>, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut entries = Vec::new();
    let mut seen_ids = HashSet::new();

    for row in reader.deserialize::<RawKnowledgeRow>() {
        let row = row?;
        if !row.id.is_empty() && !seen_ids.insert(row.id.clone()) {
            return Err(LoadError::DuplicateId(row.id));
        }
        let updated_at = NaiveDate::parse_from_str(row.derniere_mise_a_jour.trim(), "%Y-%m-%d").ok();
        entries.push(KnowledgeEntry::new(
            row.id,
            row.categorie,
            row.question_canonique,
            split_list(&row.variantes),
            row.reponse,
            split_list(&row.liens),
            none_if_empty(row.source),
            updated_at,
        ));
    }

    info!(path = %path.display(), entries = entries.len(), "knowledge base loaded");
    Ok(entries)
}

pub fn load_entity_schema(path: &Path) -> Result<EntitySchema, LoadError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

pub fn load_templates(path: &Path) -> Result<Vec<TemplateSpec>, LoadError> {
    let file = File::open(path)?;
    let parsed: TemplateFile = serde_json::from_reader(file)?;
    Ok(parsed.intents)
}
