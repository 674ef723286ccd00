use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Everything a scoring model needs for one structured generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
	pub system: String,
	pub prompt: String,
	/// Response schema in the model API's dialect.
	pub schema: Value,
	pub temperature: f32,
}

#[derive(Debug, Error)]
pub enum ModelError {
	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),

	#[error("API error (status {status}): {message}")]
	Api { status: u16, message: String },

	#[error("model returned no text content")]
	EmptyContent,

	#[error("{0}")]
	Other(#[from] anyhow::Error),
}

/// A remote model that returns JSON text for a schema-constrained prompt.
#[async_trait]
pub trait ScoringModel: Send + Sync {
	fn name(&self) -> &str;
	async fn generate(&self, request: &GenerationRequest) -> Result<String, ModelError>;
}

/// Wrap an async closure as a `ScoringModel`.
pub fn model_fn<F, Fut>(name: impl Into<String>, f: F) -> Arc<dyn ScoringModel>
where
	F: Send + Sync + 'static + Fn(GenerationRequest) -> Fut,
	Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
{
	struct ClosureModel<F, Fut>
	where
		F: Send + Sync + 'static + Fn(GenerationRequest) -> Fut,
		Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
	{
		name: String,
		f: F,
	}

	#[async_trait]
	impl<F, Fut> ScoringModel for ClosureModel<F, Fut>
	where
		F: Send + Sync + 'static + Fn(GenerationRequest) -> Fut,
		Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
	{
		fn name(&self) -> &str {
			&self.name
		}

		async fn generate(&self, request: &GenerationRequest) -> Result<String, ModelError> {
			Ok((self.f)(request.clone()).await?)
		}
	}

	Arc::new(ClosureModel { name: name.into(), f })
}
