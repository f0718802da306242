//! Embedding generation for semantic matching.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tokio::sync::OnceCell;

use super::error::MappingError;

/// Trait for embedding generation.
///
/// Implementations must be deterministic for a given model version and safe
/// to share between concurrent requests once constructed.
pub trait Embedder: Send + Sync {
    /// Generate embeddings for a batch of text.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MappingError>;

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Get the model name.
    fn model_name(&self) -> &str;
}

/// FastEmbed-based embedder backed by a local ONNX sentence model.
pub struct FastEmbedder {
    model: TextEmbedding,
    dimension: usize,
    model_name: String,
}

impl FastEmbedder {
    /// Load `model_name`, downloading it into `cache_dir` on first use.
    pub fn load(model_name: &str, cache_dir: PathBuf) -> Result<Self, MappingError> {
        let model = resolve_model(model_name)?;

        std::fs::create_dir_all(&cache_dir).map_err(|e| {
            MappingError::Embedding(format!("Failed to create cache directory: {}", e))
        })?;

        let text_embedding = TextEmbedding::try_new(
            InitOptions::new(model)
                .with_cache_dir(cache_dir)
                .with_show_download_progress(true),
        )
        .map_err(|e| MappingError::Embedding(e.to_string()))?;

        // Get dimension from a test embedding
        let test_result = text_embedding
            .embed(vec!["test"], None)
            .map_err(|e| MappingError::Embedding(e.to_string()))?;

        let dimension = test_result.first().map(|v| v.len()).unwrap_or(384);

        tracing::info!(model = model_name, dimension, "embedding model loaded");

        Ok(Self {
            model: text_embedding,
            dimension,
            model_name: model_name.to_string(),
        })
    }
}

impl Embedder for FastEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MappingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let texts_vec: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();

        self.model
            .embed(texts_vec, None)
            .map_err(|e| MappingError::Embedding(e.to_string()))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Map a sentence-transformers style model name to a fastembed model.
pub fn resolve_model(model_name: &str) -> Result<EmbeddingModel, MappingError> {
    match model_name {
        "sentence-transformers/all-MiniLM-L6-v2" | "all-MiniLM-L6-v2" => {
            Ok(EmbeddingModel::AllMiniLML6V2)
        }
        "sentence-transformers/all-MiniLM-L12-v2" | "all-MiniLM-L12-v2" => {
            Ok(EmbeddingModel::AllMiniLML12V2)
        }
        "BAAI/bge-small-en-v1.5" | "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "BAAI/bge-base-en-v1.5" | "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        "intfloat/multilingual-e5-small" | "multilingual-e5-small" => {
            Ok(EmbeddingModel::MultilingualE5Small)
        }
        "intfloat/multilingual-e5-base" | "multilingual-e5-base" => {
            Ok(EmbeddingModel::MultilingualE5Base)
        }
        _ => Err(MappingError::UnknownModel(model_name.to_string())),
    }
}

type SharedCell = Arc<OnceCell<Arc<dyn Embedder>>>;

/// Process-wide embedder cache: one lazily loaded model per name.
///
/// Concurrent first callers for the same model wait on a single load, which
/// runs on the blocking pool.
pub struct EmbedderCache {
    fixed: Option<Arc<dyn Embedder>>,
    cache_dir: PathBuf,
    models: Mutex<HashMap<String, SharedCell>>,
}

impl EmbedderCache {
    /// Create a cache that loads fastembed models into `cache_dir`.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            fixed: None,
            cache_dir,
            models: Mutex::new(HashMap::new()),
        }
    }

    /// Create a cache that always hands out `embedder`, whatever model is asked for.
    pub fn fixed(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            fixed: Some(embedder),
            cache_dir: PathBuf::new(),
            models: Mutex::new(HashMap::new()),
        }
    }

    /// Get the embedder for `model_name`, loading it on first use.
    pub async fn get(&self, model_name: &str) -> Result<Arc<dyn Embedder>, MappingError> {
        if let Some(embedder) = &self.fixed {
            return Ok(Arc::clone(embedder));
        }

        let cell = self.cell_for(model_name)?;
        let embedder = cell
            .get_or_try_init(|| {
                let name = model_name.to_string();
                let cache_dir = self.cache_dir.clone();
                async move {
                    tracing::info!(model = %name, "loading embedding model");
                    let loaded = tokio::task::spawn_blocking(move || {
                        FastEmbedder::load(&name, cache_dir)
                    })
                    .await
                    .map_err(|e| MappingError::Embedding(format!("Model load task failed: {}", e)))??;
                    Ok::<Arc<dyn Embedder>, MappingError>(Arc::new(loaded))
                }
            })
            .await?;

        Ok(Arc::clone(embedder))
    }

    fn cell_for(&self, model_name: &str) -> Result<SharedCell, MappingError> {
        // Validate before creating a cell so unknown names never occupy a slot.
        resolve_model(model_name)?;

        let mut models = self
            .models
            .lock()
            .map_err(|_| MappingError::Embedding("embedder cache lock poisoned".to_string()))?;

        Ok(Arc::clone(
            models
                .entry(model_name.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new())),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstEmbedder;

    impl Embedder for ConstEmbedder {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MappingError> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimension(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "const"
        }
    }

    #[test]
    fn test_resolve_model() {
        assert!(matches!(
            resolve_model("sentence-transformers/all-MiniLM-L6-v2"),
            Ok(EmbeddingModel::AllMiniLML6V2)
        ));
        assert!(matches!(
            resolve_model("no-such-model"),
            Err(MappingError::UnknownModel(_))
        ));
    }

    #[tokio::test]
    async fn test_fixed_cache_ignores_model_name() {
        let cache = EmbedderCache::fixed(Arc::new(ConstEmbedder));
        let embedder = cache.get("anything").await.unwrap();
        assert_eq!(embedder.model_name(), "const");
    }

    #[tokio::test]
    async fn test_unknown_model_is_rejected_before_loading() {
        let cache = EmbedderCache::new(std::env::temp_dir());
        let result = cache.get("no-such-model").await;
        assert!(matches!(result, Err(MappingError::UnknownModel(_))));
    }

    #[test]
    #[ignore = "downloads the embedding model"]
    fn test_embedder_dimension() {
        let cache_dir = std::env::temp_dir().join("ontomap-model-cache");
        let embedder = FastEmbedder::load("sentence-transformers/all-MiniLM-L6-v2", cache_dir)
            .expect("Failed to create embedder");
        assert_eq!(embedder.dimension(), 384); // MiniLM-L6 produces 384-dim vectors
    }
}
