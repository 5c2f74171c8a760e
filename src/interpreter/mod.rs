pub mod gemini;
pub mod prompt;

pub use gemini::GeminiModel;

use crate::error::{Result, VibeError};
use crate::models::SearchParameters;
use prompt::{SYSTEM_INSTRUCTION, search_schema};
use serde_json::Value;
use tracing::{debug, info};

/// A hosted model that answers with a JSON object constrained to a schema
#[cfg_attr(test, mockall::automock)]
pub trait StructuredModel {
    fn model_name(&self) -> String;

    /// Return the raw object the model produced; conformance is checked by the caller
    fn generate_object(&self, system: &str, prompt: &str, schema: &Value) -> Result<Value>;
}

/// Translates a free-text vibe into catalog search parameters
pub struct VibeInterpreter<M: StructuredModel> {
    model: M,
}

impl<M: StructuredModel> VibeInterpreter<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn interpret(&self, prompt: &str) -> Result<SearchParameters> {
        debug!(model = %self.model.model_name(), "Interpreting vibe prompt");

        let object = self
            .model
            .generate_object(SYSTEM_INSTRUCTION, prompt, &search_schema())?;

        let params: SearchParameters = serde_json::from_value(object)
            .map_err(|e| VibeError::SchemaValidation(e.to_string()))?;

        info!(
            query = %params.query,
            bpm_min = ?params.bpm_min,
            bpm_max = ?params.bpm_max,
            genre_id = ?params.genre_id,
            "Generated search params"
        );
        Ok(params)
    }
}
