use crate::config::SupabaseConfig;
use crate::error::{Result, VibeError};
use crate::http::{HttpRequest, HttpTransport};
use crate::models::{NewSavedPlaylist, SavedPlaylist};
use tracing::debug;
use urlencoding::encode;

const TABLE: &str = "playlists";

/// Where saved playlists are remembered
#[cfg_attr(test, mockall::automock)]
pub trait HistoryStore {
    fn record(&self, entry: &NewSavedPlaylist) -> Result<()>;

    /// Newest first
    fn list_for_user(&self, user_id: &str) -> Result<Vec<SavedPlaylist>>;
}

/// History kept in a Supabase table through its PostgREST interface
pub struct SupabaseHistory<T: HttpTransport> {
    transport: T,
    rest_url: String,
    anon_key: String,
}

impl<T: HttpTransport> SupabaseHistory<T> {
    pub fn new(transport: T, config: &SupabaseConfig) -> Self {
        SupabaseHistory {
            transport,
            rest_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            anon_key: config.anon_key.clone(),
        }
    }

    fn authorized(&self, request: HttpRequest) -> HttpRequest {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", &format!("Bearer {}", self.anon_key))
    }
}

impl<T: HttpTransport> HistoryStore for SupabaseHistory<T> {
    fn record(&self, entry: &NewSavedPlaylist) -> Result<()> {
        let url = format!("{}/{TABLE}", self.rest_url);
        let request = self
            .authorized(HttpRequest::post(url))
            .header("Prefer", "return=minimal")
            .json_body(&serde_json::to_value(entry)?);

        self.transport.send(&request)?.error_for_status()?;
        debug!(title = %entry.title, "Recorded playlist in history");
        Ok(())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<SavedPlaylist>> {
        let url = format!(
            "{}/{TABLE}?select=*&user_id=eq.{}&order=created_at.desc",
            self.rest_url,
            encode(user_id)
        );
        let response = self
            .transport
            .send(&self.authorized(HttpRequest::get(url)))?
            .error_for_status()?;

        serde_json::from_str(&response.body).map_err(|e| VibeError::RemoteService {
            status: response.status,
            body: format!("Unexpected history payload ({e}): {}", response.body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, Method, MockHttpTransport};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn config() -> SupabaseConfig {
        SupabaseConfig {
            url: "https://proj.supabase.co/".to_string(),
            anon_key: "anon".to_string(),
        }
    }

    fn has_header(req: &HttpRequest, name: &str, value: &str) -> bool {
        req.headers.iter().any(|(k, v)| k == name && v == value)
    }

    #[test]
    fn test_record_posts_row_with_keys() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                let body: serde_json::Value =
                    serde_json::from_str(req.body.as_deref().unwrap_or("null")).unwrap();
                req.method == Method::Post
                    && req.url == "https://proj.supabase.co/rest/v1/playlists"
                    && has_header(req, "apikey", "anon")
                    && has_header(req, "Authorization", "Bearer anon")
                    && has_header(req, "Prefer", "return=minimal")
                    && body["user_id"] == "me@example.com"
                    && body["tags"] == json!(["glaive hyperpop"])
            })
            .times(1)
            .returning(|_| {
                Ok(HttpResponse {
                    status: 201,
                    body: String::new(),
                })
            });
        let history = SupabaseHistory::new(transport, &config());

        history
            .record(&NewSavedPlaylist {
                user_id: "me@example.com".to_string(),
                title: "Pilot: hyperpop songs like glaive".to_string(),
                tracks: json!([]),
                tags: vec!["glaive hyperpop".to_string()],
                vibe_metrics: json!({ "query": "glaive hyperpop" }),
                deezer_link: Some("https://www.deezer.com/playlist/1".to_string()),
            })
            .unwrap();
    }

    #[test]
    fn test_list_filters_and_orders_by_user() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.method == Method::Get
                    && req.url
                        == "https://proj.supabase.co/rest/v1/playlists?select=*&user_id=eq.me%40example.com&order=created_at.desc"
            })
            .times(1)
            .returning(|_| {
                Ok(HttpResponse {
                    status: 200,
                    body: r#"[{"id":"6f1c","user_id":"me@example.com","title":"Pilot: rain","tracks":[],"tags":["rain"],"vibe_metrics":{},"created_at":"2026-03-01T18:30:00.123456+00:00","deezer_link":null}]"#.to_string(),
                })
            });
        let history = SupabaseHistory::new(transport, &config());

        let rows = history.list_for_user("me@example.com").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Pilot: rain");
        assert!(rows[0].deezer_link.is_none());
        assert_eq!(
            rows[0].created_at.date_naive(),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap().date_naive()
        );
    }

    #[test]
    fn test_rejected_insert_is_remote_service_error() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 401,
                body: r#"{"message":"Invalid API key"}"#.to_string(),
            })
        });
        let history = SupabaseHistory::new(transport, &config());

        let entry = NewSavedPlaylist {
            user_id: "1".to_string(),
            title: "t".to_string(),
            tracks: json!([]),
            tags: vec![],
            vibe_metrics: json!({}),
            deezer_link: None,
        };
        assert!(matches!(
            history.record(&entry),
            Err(VibeError::RemoteService { status: 401, .. })
        ));
    }
}
