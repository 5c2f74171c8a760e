use crate::client::DeezerClient;
use crate::error::Result;
use crate::http::HttpTransport;
use crate::interpreter::{StructuredModel, VibeInterpreter};
use crate::models::VibeResult;
use tracing::info;

/// Prompt -> search parameters -> tracks, one sequential pass per call
pub struct VibeGenerator<M: StructuredModel, T: HttpTransport> {
    interpreter: VibeInterpreter<M>,
    catalog: DeezerClient<T>,
    limit: u32,
}

impl<M: StructuredModel, T: HttpTransport> VibeGenerator<M, T> {
    pub fn new(interpreter: VibeInterpreter<M>, catalog: DeezerClient<T>, limit: u32) -> Self {
        Self {
            interpreter,
            catalog,
            limit,
        }
    }

    pub fn catalog(&self) -> &DeezerClient<T> {
        &self.catalog
    }

    pub fn generate_vibe(&self, prompt: &str) -> Result<VibeResult> {
        let params = self.interpreter.interpret(prompt)?;
        let outcome = self.catalog.search_with_fallback(&params, self.limit)?;

        let explanation = match &outcome.simplified_query {
            Some(simplified) => with_simplified_note(&params.explanation, simplified),
            None => params.explanation.clone(),
        };

        info!(tracks = outcome.tracks.len(), "Vibe resolved");
        Ok(VibeResult {
            explanation,
            params,
            tracks: outcome.tracks,
        })
    }
}

/// Explanation suffix naming the query that actually produced results
pub fn with_simplified_note(explanation: &str, simplified: &str) -> String {
    format!("{explanation} (Used simplified search: \"{simplified}\")")
}
