use crate::normalize::clean_tokens;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct IndexParams {
    /// Inclusive range of n-gram sizes forming the vocabulary.
    pub ngram_range: (usize, usize),
    /// Minimum number of documents a term must appear in.
    pub min_df: usize,
    /// Maximum fraction of documents a term may appear in.
    pub max_df: f32,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            min_df: 1,
            max_df: 0.95,
        }
    }
}

/// Immutable tf-idf vector space over a document corpus. Built once; a
/// corpus change means building a new index and swapping it in.
#[derive(Debug)]
pub struct VectorSpaceIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    rows: Vec<Vec<f32>>,
    ngram_range: (usize, usize),
}

fn ngrams(tokens: &[String], range: (usize, usize)) -> Vec<String> {
    let (lo, hi) = (range.0.max(1), range.1);
    let mut grams = Vec::new();
    for n in lo..=hi {
        if n > tokens.len() {
            break;
        }
        for window in tokens.windows(n) {
            grams.push(window.join(" "));
        }
    }
    grams
}

/// Raw term counts over the vocabulary, scaled by idf and L2-normalized.
/// A document with no in-vocabulary term stays the zero vector.
fn weigh(grams: &[String], vocabulary: &HashMap<String, usize>, idf: &[f32]) -> Vec<f32> {
    let mut row = vec![0.0f32; idf.len()];
    for gram in grams {
        if let Some(&id) = vocabulary.get(gram.as_str()) {
            row[id] += 1.0;
        }
    }
    for (weight, factor) in row.iter_mut().zip(idf) {
        *weight *= factor;
    }
    let norm = row.iter().map(|w| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for weight in &mut row {
            *weight /= norm;
        }
    }
    row
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl VectorSpaceIndex {
    pub fn build(docs: &[String], params: &IndexParams) -> Self {
        let gram_docs: Vec<Vec<String>> = docs
            .par_iter()
            .map(|doc| ngrams(&clean_tokens(doc), params.ngram_range))
            .collect();

        let n_docs = gram_docs.len();
        let mut df: HashMap<&str, usize> = HashMap::new();
        for grams in &gram_docs {
            let mut seen = HashSet::new();
            for gram in grams {
                if seen.insert(gram.as_str()) {
                    *df.entry(gram.as_str()).or_insert(0) += 1;
                }
            }
        }

        let max_count = params.max_df * n_docs as f32;
        let mut terms: Vec<&str> = df
            .iter()
            .filter(|(_, &d)| d >= params.min_df && d as f32 <= max_count)
            .map(|(term, _)| *term)
            .collect();
        // Ids in sorted term order so rebuilds of the same corpus are identical.
        terms.sort_unstable();

        let vocabulary: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(id, term)| (term.to_string(), id))
            .collect();
        // Smoothed log idf: strictly positive even for terms in every document.
        let idf: Vec<f32> = terms
            .iter()
            .map(|term| ((1.0 + n_docs as f32) / (1.0 + df[*term] as f32)).ln() + 1.0)
            .collect();

        let rows: Vec<Vec<f32>> = gram_docs
            .par_iter()
            .map(|grams| weigh(grams, &vocabulary, &idf))
            .collect();

        info!(
            documents = n_docs,
            vocabulary = vocabulary.len(),
            "vector space index built"
        );

        Self {
            vocabulary,
            idf,
            rows,
            ngram_range: params.ngram_range,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Cosine search: `(document index, score)` pairs sorted by descending
    /// score, ties broken by ascending document index. Scores ≤ 0 are
    /// dropped; at most `top_k` results. A query with no in-vocabulary term
    /// yields no results.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<(usize, f32)> {
        if top_k == 0 {
            return Vec::new();
        }
        let tokens = clean_tokens(query);
        if tokens.is_empty() {
            return Vec::new();
        }
        let query_vec = weigh(&ngrams(&tokens, self.ngram_range), &self.vocabulary, &self.idf);

        let mut scored: Vec<(usize, f32)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (i, dot(&query_vec, row)))
            .filter(|(_, score)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(top_k);
        scored
    }
}
