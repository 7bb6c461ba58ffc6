use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use crate::error::{FinderError, Result};

const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Sparse feature vector with indices kept sorted and unique
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Builds a vector from `(index, value)` pairs; zero values are dropped
    /// and repeated indices are summed.
    pub fn new(dim: usize, pairs: impl IntoIterator<Item = (usize, f64)>) -> Result<Self> {
        let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
        for (index, value) in pairs {
            if index >= dim {
                return Err(FinderError::DimensionMismatch {
                    expected: dim,
                    actual: index + 1,
                });
            }
            *merged.entry(index).or_insert(0.0) += value;
        }
        Ok(Self {
            dim,
            entries: merged.into_iter().filter(|(_, v)| *v != 0.0).collect(),
        })
    }

    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored non-zero entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_val) = self.entries[i];
            let (b_idx, b_val) = other.entries[j];
            if a_idx == b_idx {
                sum += a_val * b_val;
                i += 1;
                j += 1;
            } else if a_idx < b_idx {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }

    /// Cosine of the angle between the two vectors, 0 if either is all zeros
    pub fn cosine_similarity(&self, other: &SparseVector) -> f64 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            0.0
        } else {
            self.dot(other) / denom
        }
    }

    fn scale(&mut self, factor: f64) {
        for (_, v) in &mut self.entries {
            *v *= factor;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk form of a fitted vectorizer
#[derive(Debug, Deserialize)]
struct VectorizerArtifact {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default = "default_true")]
    lowercase: bool,
    #[serde(default = "default_token_pattern")]
    token_pattern: String,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    stop_words: Vec<String>,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
    #[serde(default = "default_true")]
    use_idf: bool,
    #[serde(default)]
    sublinear_tf: bool,
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Pre-fitted TF-IDF vectorizer
#[derive(Debug)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    lowercase: bool,
    token_pattern: Regex,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    norm: Option<Norm>,
    use_idf: bool,
    sublinear_tf: bool,
}

impl TfidfVectorizer {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Loading vectorizer from {}", path.display());
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let artifact: VectorizerArtifact = serde_json::from_str(data)?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: VectorizerArtifact) -> Result<Self> {
        let n_features = artifact.idf.len();
        if artifact.vocabulary.len() != n_features {
            return Err(FinderError::InvalidArtifact(format!(
                "vocabulary has {} terms but idf has {} weights",
                artifact.vocabulary.len(),
                n_features
            )));
        }

        let mut seen = vec![false; n_features];
        for (term, &index) in &artifact.vocabulary {
            if index >= n_features {
                return Err(FinderError::InvalidArtifact(format!(
                    "term '{}' maps to index {} outside {} features",
                    term, index, n_features
                )));
            }
            if seen[index] {
                return Err(FinderError::InvalidArtifact(format!(
                    "index {} assigned to more than one term",
                    index
                )));
            }
            seen[index] = true;
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(FinderError::InvalidArtifact(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        if artifact.idf.iter().any(|w| !w.is_finite()) {
            return Err(FinderError::InvalidArtifact(
                "idf contains non-finite weights".to_string(),
            ));
        }

        let token_pattern = Regex::new(&artifact.token_pattern)?;

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            lowercase: artifact.lowercase,
            token_pattern,
            ngram_range: artifact.ngram_range,
            stop_words: artifact.stop_words.into_iter().collect(),
            norm: artifact.norm,
            use_idf: artifact.use_idf,
            sublinear_tf: artifact.sublinear_tf,
        })
    }

    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Splits a document into the terms the vocabulary is keyed on
    pub fn analyze(&self, doc: &str) -> Vec<String> {
        let doc = if self.lowercase {
            doc.to_lowercase()
        } else {
            doc.to_string()
        };

        let use_group = self.token_pattern.captures_len() > 1;
        let tokens: Vec<&str> = self
            .token_pattern
            .captures_iter(&doc)
            .filter_map(|caps| {
                let m = if use_group { caps.get(1) } else { caps.get(0) };
                m.map(|m| m.as_str())
            })
            .filter(|token| !self.stop_words.contains(*token))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    pub fn transform(&self, doc: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyze(doc) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let entries = counts
            .into_iter()
            .map(|(index, count)| {
                let tf = if self.sublinear_tf { 1.0 + count.ln() } else { count };
                let weight = if self.use_idf { tf * self.idf[index] } else { tf };
                (index, weight)
            })
            .filter(|(_, w)| *w != 0.0)
            .collect();

        let mut vector = SparseVector {
            dim: self.n_features(),
            entries,
        };

        let length = match self.norm {
            Some(Norm::L2) => vector.norm(),
            Some(Norm::L1) => vector.entries.iter().map(|(_, v)| v.abs()).sum(),
            None => 0.0,
        };
        if length > 0.0 {
            vector.scale(1.0 / length);
        }

        vector
    }
}
