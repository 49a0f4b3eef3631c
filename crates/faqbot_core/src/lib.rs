pub mod config;
pub mod error;
pub mod eval;
pub mod index;
pub mod intent;
pub mod loader;
pub mod model;
pub mod ner;
pub mod normalize;
pub mod pipeline;
pub mod template;

pub use config::{AppConfig, DataConfig, RetrieverConfig};
pub use error::LoadError;
pub use eval::{evaluate_cases, EvalCase, EvalOutcome, EvalSummary};
pub use index::{IndexParams, VectorSpaceIndex};
pub use intent::{IntentClassifier, IntentRule, DEFAULT_INTENT};
pub use loader::{load_entity_schema, load_knowledge_csv, load_templates};
pub use model::{AnswerSource, KnowledgeEntry, Resolution};
pub use ner::{EntitySchema, RegexNer};
pub use normalize::{clean_tokens, normalize};
pub use pipeline::{Pipeline, DEFAULT_TOP_K, NO_MATCH_MESSAGE};
pub use template::{Rendered, TemplateCatalog, TemplateSpec};
