use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One curated knowledge-base record. `index_text` is derived once at
/// construction (canonical question + variants + answer) and is what the
/// vector space is built over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub category: String,
    pub question: String,
    pub variants: Vec<String>,
    pub answer: String,
    pub links: Vec<String>,
    pub source: Option<String>,
    pub updated_at: Option<NaiveDate>,
    pub index_text: String,
}

impl KnowledgeEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        category: String,
        question: String,
        variants: Vec<String>,
        answer: String,
        links: Vec<String>,
        source: Option<String>,
        updated_at: Option<NaiveDate>,
    ) -> Self {
        let mut pieces = Vec::with_capacity(variants.len() + 2);
        pieces.push(question.as_str());
        pieces.extend(variants.iter().map(String::as_str));
        pieces.push(answer.as_str());
        let index_text = pieces.join(" ");
        Self {
            id,
            category,
            question,
            variants,
            answer,
            links,
            source,
            updated_at,
            index_text,
        }
    }
}

/// Where the surfaced text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Template,
    Clarification,
    KnowledgeBase,
    NoMatch,
}

/// Everything a caller needs to display and log one resolved query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    pub text: String,
    pub entities: BTreeMap<String, Vec<String>>,
    pub intent: String,
    pub confidence: f32,
    pub source: AnswerSource,
    pub entry_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_text_concatenates_question_variants_answer() {
        let entry = KnowledgeEntry::new(
            "kb-1".to_string(),
            "acces_plateforme".to_string(),
            "Comment se connecter ?".to_string(),
            vec!["probleme de connexion".to_string(), "login".to_string()],
            "Utilisez vos identifiants.".to_string(),
            Vec::new(),
            None,
            None,
        );
        assert_eq!(
            entry.index_text,
            "Comment se connecter ? probleme de connexion login Utilisez vos identifiants."
        );
    }
}
