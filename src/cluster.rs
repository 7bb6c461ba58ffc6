use serde::Deserialize;
use std::path::Path;

use crate::error::{FinderError, Result};
use crate::vectorizer::SparseVector;

#[derive(Debug, Deserialize)]
struct KMeansArtifact {
    cluster_centers: Vec<Vec<f64>>,
}

/// Fitted k-means model; assigns vectors to the nearest centroid
#[derive(Debug)]
pub struct KMeansModel {
    centers: Vec<Vec<f64>>,
    // Squared norm of each centroid, reused on every prediction
    center_sq_norms: Vec<f64>,
    n_features: usize,
}

impl KMeansModel {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Loading cluster model from {}", path.display());
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let artifact: KMeansArtifact = serde_json::from_str(data)?;
        Self::new(artifact.cluster_centers)
    }

    pub fn new(centers: Vec<Vec<f64>>) -> Result<Self> {
        let n_features = match centers.first() {
            Some(first) if !first.is_empty() => first.len(),
            Some(_) => {
                return Err(FinderError::InvalidArtifact(
                    "cluster centers have no features".to_string(),
                ))
            }
            None => {
                return Err(FinderError::InvalidArtifact(
                    "model has no cluster centers".to_string(),
                ))
            }
        };

        for (i, center) in centers.iter().enumerate() {
            if center.len() != n_features {
                return Err(FinderError::InvalidArtifact(format!(
                    "center {} has {} features, expected {}",
                    i,
                    center.len(),
                    n_features
                )));
            }
            if center.iter().any(|v| !v.is_finite()) {
                return Err(FinderError::InvalidArtifact(format!(
                    "center {} contains non-finite values",
                    i
                )));
            }
        }

        let center_sq_norms = centers
            .iter()
            .map(|c| c.iter().map(|v| v * v).sum())
            .collect();

        Ok(Self {
            centers,
            center_sq_norms,
            n_features,
        })
    }

    pub fn n_clusters(&self) -> usize {
        self.centers.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Index of the closest centroid by squared Euclidean distance.
    /// Ties resolve to the lower index.
    pub fn predict(&self, x: &SparseVector) -> Result<usize> {
        if x.dim() != self.n_features {
            return Err(FinderError::DimensionMismatch {
                expected: self.n_features,
                actual: x.dim(),
            });
        }

        // ||x - c||^2 = ||x||^2 - 2 x.c + ||c||^2; ||x||^2 is shared by all centers
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (i, center) in self.centers.iter().enumerate() {
            let cross: f64 = x.entries().iter().map(|&(j, v)| v * center[j]).sum();
            let distance = self.center_sq_norms[i] - 2.0 * cross;
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }

        Ok(best)
    }
}
