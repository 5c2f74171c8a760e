use crate::error::{Result, VibeError};
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// An outbound request, fully composed (query string included)
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(url)
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn json_body(mut self, body: &serde_json::Value) -> Self {
        self.headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        self.body = Some(body.to_string());
        self
    }
}

/// Status and body text of a response, whatever the status was
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-success response into a `RemoteService` error
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(VibeError::RemoteService {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// The single seam every remote call goes through.
///
/// Non-success statuses come back as `Ok(HttpResponse)`; only failures to
/// send or read the request are errors here.
#[cfg_attr(test, mockall::automock)]
pub trait HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Blocking transport backed by a `ureq` agent
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("vibe-pilot/", env!("CARGO_PKG_VERSION")))
            .build();

        UreqTransport { agent }
    }
}

impl HttpTransport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(method = request.method.as_str(), url = %redact(&request.url), "Sending request");

        let mut call = self.agent.request(request.method.as_str(), &request.url);
        for (name, value) in &request.headers {
            call = call.set(name, value);
        }

        let outcome = match &request.body {
            Some(body) => call.send_string(body),
            None => call.call(),
        };

        match outcome {
            Ok(response) => {
                let status = response.status();
                let body = response
                    .into_string()
                    .map_err(|e| VibeError::Transport(format!("Failed to read response: {e}")))?;
                Ok(HttpResponse { status, body })
            }
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Ok(HttpResponse { status, body })
            }
            Err(ureq::Error::Transport(e)) => Err(VibeError::Transport(e.to_string())),
        }
    }
}

/// Strip secrets carried in query strings before they reach the logs
fn redact(url: &str) -> String {
    match url.split_once('?') {
        Some((base, query)) => {
            let params: Vec<String> = query
                .split('&')
                .map(|pair| match pair.split_once('=') {
                    Some((key, _)) if matches!(key, "access_token" | "secret" | "code") => {
                        format!("{key}=***")
                    }
                    _ => pair.to_string(),
                })
                .collect();
            format!("{base}?{}", params.join("&"))
        }
        None => url.to_string(),
    }
}
