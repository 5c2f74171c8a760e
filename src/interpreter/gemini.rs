use super::StructuredModel;
use crate::error::{Result, VibeError};
use crate::http::{HttpRequest, HttpTransport};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

/// Google Gemini `generateContent` with a JSON response schema
pub struct GeminiModel<T: HttpTransport> {
    transport: T,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl<T: HttpTransport> GeminiModel<T> {
    pub fn new(
        transport: T,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        GeminiModel {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    fn request_body(system: &str, prompt: &str, schema: &Value) -> Value {
        json!({
            "systemInstruction": { "parts": [{ "text": system }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        })
    }
}

impl<T: HttpTransport> StructuredModel for GeminiModel<T> {
    fn model_name(&self) -> String {
        self.model.clone()
    }

    fn generate_object(&self, system: &str, prompt: &str, schema: &Value) -> Result<Value> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = HttpRequest::post(url)
            .header("x-goog-api-key", &self.api_key)
            .json_body(&Self::request_body(system, prompt, schema));

        let response = self.transport.send(&request)?.error_for_status()?;

        let parsed: GenerateContentResponse = serde_json::from_str(&response.body)
            .map_err(|e| VibeError::SchemaValidation(format!("Unreadable model response: {e}")))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| VibeError::SchemaValidation("Model returned no candidates".to_string()))?;
        debug!(finish_reason = ?candidate.finish_reason, "Model answered");

        let text = candidate
            .content
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| {
                VibeError::SchemaValidation("Model candidate carried no text".to_string())
            })?;

        serde_json::from_str(&text)
            .map_err(|e| VibeError::SchemaValidation(format!("Model output is not JSON: {e}")))
    }
}
