use crate::index::{IndexParams, VectorSpaceIndex};
use crate::intent::{IntentClassifier, DEFAULT_INTENT};
use crate::model::{AnswerSource, KnowledgeEntry, Resolution};
use crate::ner::RegexNer;
use crate::template::TemplateCatalog;

pub const NO_MATCH_MESSAGE: &str = "Désolé, je n'ai pas trouvé d'information pertinente.";
pub const DEFAULT_TOP_K: usize = 3;

/// The fully-built query pipeline. Construction performs the one-time index
/// build; afterwards every structure is immutable and `answer` is a pure
/// read, so a `Pipeline` can be shared across threads without locking.
/// Rebuilding after a corpus change means constructing a new `Pipeline` and
/// swapping the handle.
#[derive(Debug)]
pub struct Pipeline {
    entries: Vec<KnowledgeEntry>,
    ner: RegexNer,
    index: VectorSpaceIndex,
    intents: IntentClassifier,
    templates: TemplateCatalog,
    top_k: usize,
}

impl Pipeline {
    pub fn new(
        entries: Vec<KnowledgeEntry>,
        ner: RegexNer,
        intents: IntentClassifier,
        templates: TemplateCatalog,
        params: &IndexParams,
        top_k: usize,
    ) -> Self {
        let docs: Vec<String> = entries.iter().map(|e| e.index_text.clone()).collect();
        let index = VectorSpaceIndex::build(&docs, params);
        Self {
            entries,
            ner,
            index,
            intents,
            templates,
            top_k: top_k.max(1),
        }
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn search(&self, query: &str, top_k: usize) -> Vec<(usize, f32)> {
        self.index.search(query, top_k)
    }

    /// Retrieval-first resolution: the best hit's category drives template
    /// selection; the rule classifier only labels the canned response when
    /// retrieval comes up empty. A complete template render is surfaced; a
    /// render blocked on missing required entities surfaces its clarification
    /// prompt; otherwise the matched record's stored question and answer.
    pub fn answer(&self, query: &str) -> Resolution {
        let entities = self.ner.extract(query);

        let hits = self.index.search(query, self.top_k);
        let Some(&(best, score)) = hits.first() else {
            return Resolution {
                text: NO_MATCH_MESSAGE.to_string(),
                intent: self.intents.classify(query).to_string(),
                confidence: 0.0,
                source: AnswerSource::NoMatch,
                entry_id: None,
                entities,
            };
        };

        let entry = &self.entries[best];
        let category = entry.category.trim();
        let intent = if category.is_empty() {
            DEFAULT_INTENT.to_string()
        } else {
            category.to_string()
        };

        let rendered = self.templates.render(&intent, &entities);
        if rendered.need_more_info {
            return Resolution {
                text: rendered.text,
                intent,
                confidence: score,
                source: AnswerSource::Clarification,
                entry_id: Some(entry.id.clone()),
                entities,
            };
        }
        if !rendered.text.is_empty() {
            return Resolution {
                text: rendered.text,
                intent,
                confidence: score,
                source: AnswerSource::Template,
                entry_id: Some(entry.id.clone()),
                entities,
            };
        }

        Resolution {
            text: format!("**{}**\n\n{}", entry.question, entry.answer),
            intent,
            confidence: score,
            source: AnswerSource::KnowledgeBase,
            entry_id: Some(entry.id.clone()),
            entities,
        }
    }
}
