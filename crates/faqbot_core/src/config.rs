use crate::error::LoadError;
use crate::index::IndexParams;
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data: DataConfig,
    #[serde(default)]
    pub retriever: RetrieverConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub faq_csv: PathBuf,
    pub ner_json: PathBuf,
    pub templates_json: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrieverConfig {
    pub ngram_range: (usize, usize),
    pub min_df: usize,
    pub max_df: f32,
    pub top_k: usize,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        let params = IndexParams::default();
        Self {
            ngram_range: params.ngram_range,
            min_df: params.min_df,
            max_df: params.max_df,
            top_k: crate::pipeline::DEFAULT_TOP_K,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    pub fn index_params(&self) -> IndexParams {
        IndexParams {
            ngram_range: self.retriever.ngram_range,
            min_df: self.retriever.min_df,
            max_df: self.retriever.max_df,
        }
    }
}
