use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;

use crate::cluster::KMeansModel;
use crate::corpus::Corpus;
use crate::error::{FinderError, Result};
use crate::vectorizer::{SparseVector, TfidfVectorizer};

/// Number of verses returned per query
pub const TOP_K: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct VerseMatch {
    pub reference: String,
    pub text: String,
}

// Rendered on the wire as a `[reference, text]` pair
impl Serialize for VerseMatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (&self.reference, &self.text).serialize(serializer)
    }
}

/// Ranking result as served to clients: the matches, or the error message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SimilarityOutcome {
    Matches(Vec<VerseMatch>),
    Failed(String),
}

pub struct SimilarityEngine {
    corpus: Corpus,
    vectorizer: TfidfVectorizer,
    model: KMeansModel,
    vectors: Vec<SparseVector>,
    // Verse ids per cluster label, in corpus order
    members: Vec<Vec<usize>>,
}

impl SimilarityEngine {
    /// Vectorizes and clusters every verse of the corpus
    pub fn new(corpus: Corpus, vectorizer: TfidfVectorizer, model: KMeansModel) -> Result<Self> {
        if corpus.is_empty() {
            return Err(FinderError::EmptyCorpus);
        }
        if vectorizer.n_features() != model.n_features() {
            return Err(FinderError::DimensionMismatch {
                expected: model.n_features(),
                actual: vectorizer.n_features(),
            });
        }

        tracing::info!("Vectorizing {} verses", corpus.len());
        let vectors: Vec<SparseVector> = corpus
            .verses()
            .par_iter()
            .map(|verse| vectorizer.transform(&verse.text))
            .collect();

        let labels = vectors
            .par_iter()
            .map(|v| model.predict(v))
            .collect::<Result<Vec<usize>>>()?;

        let mut members = vec![Vec::new(); model.n_clusters()];
        for (id, label) in labels.into_iter().enumerate() {
            members[label].push(id);
        }

        let empty = members.iter().filter(|m| m.is_empty()).count();
        if empty > 0 {
            tracing::warn!("{} of {} clusters have no verses", empty, members.len());
        }
        tracing::info!(
            "Assigned {} verses to {} clusters",
            vectors.len(),
            members.len()
        );

        Ok(Self {
            corpus,
            vectorizer,
            model,
            vectors,
            members,
        })
    }

    pub fn verse_count(&self) -> usize {
        self.corpus.len()
    }

    pub fn cluster_count(&self) -> usize {
        self.model.n_clusters()
    }

    /// Verse ids assigned to `cluster`, empty for unknown labels
    pub fn cluster_members(&self, cluster: usize) -> &[usize] {
        self.members.get(cluster).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn predict_cluster(&self, query: &str) -> Result<usize> {
        self.model.predict(&self.vectorizer.transform(query))
    }

    /// Top verses of the query's cluster by cosine similarity.
    /// Equal scores put the later verse first.
    pub fn similar_verses(&self, query: &str) -> Result<Vec<VerseMatch>> {
        let query_vector = self.vectorizer.transform(query);
        let cluster = self.model.predict(&query_vector)?;

        let mut scored: Vec<(usize, f64)> = self
            .cluster_members(cluster)
            .iter()
            .map(|&id| (id, query_vector.cosine_similarity(&self.vectors[id])))
            .collect();

        scored.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => b.0.cmp(&a.0),
            ord => ord,
        });
        scored.truncate(TOP_K);

        let verses = self.corpus.verses();
        Ok(scored
            .into_iter()
            .map(|(id, _)| VerseMatch {
                reference: verses[id].reference.to_string(),
                text: verses[id].text.clone(),
            })
            .collect())
    }

    /// Like [`similar_verses`](Self::similar_verses) but never fails:
    /// errors come back as their message.
    pub fn find(&self, query: &str) -> SimilarityOutcome {
        match self.similar_verses(query) {
            Ok(matches) => SimilarityOutcome::Matches(matches),
            Err(e) => {
                tracing::error!("Similarity search failed: {}", e);
                SimilarityOutcome::Failed(e.to_string())
            }
        }
    }
}
