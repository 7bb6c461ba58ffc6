use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use verse_finder::cluster::KMeansModel;
use verse_finder::config::AppConfig;
use verse_finder::corpus::Corpus;
use verse_finder::vectorizer::TfidfVectorizer;
use verse_finder::{server, SimilarityEngine};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verse_finder=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("📖 Verse Finder");

    let config = AppConfig::load()?;
    let addr = config.socket_addr()?;

    // Step 1: Load the pre-trained artifacts
    tracing::info!("📦 Loading vectorizer and cluster model...");
    let vectorizer = TfidfVectorizer::load(&config.vectorizer_path).with_context(|| {
        format!("Failed to load vectorizer from {}", config.vectorizer_path.display())
    })?;
    let model = KMeansModel::load(&config.cluster_model_path).with_context(|| {
        format!(
            "Failed to load cluster model from {}",
            config.cluster_model_path.display()
        )
    })?;
    tracing::info!(
        "✅ Vectorizer has {} features, model has {} clusters",
        vectorizer.n_features(),
        model.n_clusters()
    );

    // Step 2: Parse the corpus
    let corpus = Corpus::load(&config.corpus_path)
        .with_context(|| format!("Failed to read corpus {}", config.corpus_path.display()))?;
    tracing::info!(
        "✅ Parsed {} verses across {} books",
        corpus.len(),
        corpus.books().len()
    );

    // Step 3: Vectorize and cluster the corpus, then serve
    tracing::info!("📚 Vectorizing and clustering verses...");
    let engine = SimilarityEngine::new(corpus, vectorizer, model)
        .context("Failed to build similarity engine")?;
    tracing::info!("✅ Similarity engine ready");

    tracing::info!("🌐 Starting web server on http://{}", addr);
    tracing::info!("");
    tracing::info!("✨ Ready! Open http://localhost:{} in your browser", config.port);
    tracing::info!("🔍 Similarity API: POST http://localhost:{}/api/similarity", config.port);
    tracing::info!("");
    tracing::info!("Press Ctrl+C to stop");

    server::serve(addr, Arc::new(engine)).await?;

    Ok(())
}
