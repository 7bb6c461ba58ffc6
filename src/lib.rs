// Public modules for testing
pub mod cluster;
pub mod config;
pub mod corpus;
pub mod error;
pub mod search;
pub mod server;
pub mod templates;
pub mod vectorizer;

// Re-export main types
pub use error::{FinderError, Result};
pub use search::SimilarityEngine;
