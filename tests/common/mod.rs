#![allow(dead_code)]

use anyhow::Result;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

use verse_finder::cluster::KMeansModel;
use verse_finder::corpus::Corpus;
use verse_finder::vectorizer::TfidfVectorizer;
use verse_finder::SimilarityEngine;

pub const GENESIS: &str = "Genesis\n\n\
1\n\
In the beginning God created the heaven and the earth.\n\
And God said, Let there be light: and there was light.\n\
And God saw the light, that it was good.\n\n\
2\n\
Thus the heavens and the earth were finished.\n\
And on the seventh day God ended his work.";

pub const PSALMS: &str = "Psalms\n\n\
23\n\
The LORD is my shepherd; I shall not want.\n\
He maketh me to lie down in green pastures: he leadeth me beside the still waters.\n\
He restoreth my soul.\n";

pub fn corpus_text() -> String {
    format!("{}\n\n\n\n\n{}", GENESIS, PSALMS)
}

pub fn vectorizer_json() -> serde_json::Value {
    json!({
        "vocabulary": {
            "light": 0, "god": 1, "earth": 2, "heaven": 3, "shepherd": 4,
            "waters": 5, "soul": 6, "lord": 7, "pastures": 8, "day": 9
        },
        "idf": [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]
    })
}

/// Cluster 0 holds the creation words, cluster 1 the psalm words
pub fn model_json() -> serde_json::Value {
    json!({
        "cluster_centers": [
            [0.4, 0.4, 0.4, 0.4, 0.0, 0.0, 0.0, 0.0, 0.0, 0.4],
            [0.0, 0.0, 0.0, 0.0, 0.4, 0.4, 0.4, 0.4, 0.4, 0.0]
        ]
    })
}

pub struct FixturePaths {
    pub corpus: PathBuf,
    pub vectorizer: PathBuf,
    pub model: PathBuf,
}

pub fn write_fixtures(dir: &Path) -> Result<FixturePaths> {
    let paths = FixturePaths {
        corpus: dir.join("bible.txt"),
        vectorizer: dir.join("vectorizer.json"),
        model: dir.join("kmeans_model.json"),
    };
    fs::write(&paths.corpus, corpus_text())?;
    fs::write(&paths.vectorizer, vectorizer_json().to_string())?;
    fs::write(&paths.model, model_json().to_string())?;
    Ok(paths)
}

pub fn engine() -> Result<SimilarityEngine> {
    let corpus = Corpus::parse(&corpus_text());
    let vectorizer = TfidfVectorizer::from_json(&vectorizer_json().to_string())?;
    let model = KMeansModel::from_json(&model_json().to_string())?;
    Ok(SimilarityEngine::new(corpus, vectorizer, model)?)
}
