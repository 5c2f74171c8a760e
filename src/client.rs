use crate::error::{Result, VibeError};
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::models::{CreatedPlaylist, DeezerUser, SearchParameters, SearchResponse, Track};
use tracing::{debug, info, warn};
use urlencoding::encode;

/// Number of tracks requested per search
pub const DEFAULT_LIMIT: u32 = 15;

/// Tokens kept from the original query when retrying an empty search
const FALLBACK_TOKENS: usize = 3;

/// Result of a search that may have fallen back to a simplified query
#[derive(Debug)]
pub struct SearchOutcome {
    pub tracks: Vec<Track>,
    /// Set only when the fallback query produced the returned tracks
    pub simplified_query: Option<String>,
}

/// Compose the `q` value: trimmed free text followed by the optional BPM filters.
///
/// Returns `None` when the trimmed query is empty; such a query is never sent.
pub fn compose_query(params: &SearchParameters) -> Option<String> {
    let text = params.query.trim();
    if text.is_empty() {
        return None;
    }

    let mut parts = vec![text.to_string()];
    if let Some(bpm_min) = params.bpm_min {
        parts.push(format!("bpm_min:{bpm_min}"));
    }
    if let Some(bpm_max) = params.bpm_max {
        parts.push(format!("bpm_max:{bpm_max}"));
    }
    Some(parts.join(" "))
}

/// First three whitespace-separated tokens of the query, single-space joined
pub fn simplified_query(query: &str) -> String {
    query
        .split_whitespace()
        .take(FALLBACK_TOKENS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Client for the public Deezer API
pub struct DeezerClient<T: HttpTransport> {
    transport: T,
    base_url: String,
}

impl<T: HttpTransport> DeezerClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        DeezerClient {
            transport,
            base_url,
        }
    }

    /// Run one search call; empty queries and malformed bodies yield no tracks
    pub fn search(&self, params: &SearchParameters, limit: u32) -> Result<Vec<Track>> {
        let Some(query) = compose_query(params) else {
            warn!("Search query is empty after trimming, skipping catalog request");
            return Ok(vec![]);
        };

        let url = format!("{}/search?q={}&limit={}", self.base_url, encode(&query), limit);
        debug!(%query, limit, "Searching Deezer catalog");

        let response = self.transport.send(&HttpRequest::get(url))?.error_for_status()?;

        match serde_json::from_str::<SearchResponse>(&response.body) {
            Ok(parsed) => {
                debug!(count = parsed.data.len(), total = parsed.total, "Search returned");
                Ok(parsed.data)
            }
            Err(e) => {
                warn!("Search response had no usable track array, treating as empty: {e}");
                Ok(vec![])
            }
        }
    }

    /// Search, retrying once with a simplified unfiltered query when nothing matched
    pub fn search_with_fallback(
        &self,
        params: &SearchParameters,
        limit: u32,
    ) -> Result<SearchOutcome> {
        let tracks = self.search(params, limit)?;
        if !tracks.is_empty() || params.query.trim().is_empty() {
            return Ok(SearchOutcome {
                tracks,
                simplified_query: None,
            });
        }

        let simplified = simplified_query(&params.query);
        info!("No results for '{}', retrying with '{}'", params.query.trim(), simplified);

        let tracks = self.search(&SearchParameters::query_only(simplified.clone()), limit)?;
        let simplified_query = if tracks.is_empty() {
            None
        } else {
            Some(simplified)
        };

        Ok(SearchOutcome {
            tracks,
            simplified_query,
        })
    }

    /// Profile of the account owning the access token
    pub fn current_user(&self, access_token: &str) -> Result<DeezerUser> {
        let url = format!("{}/user/me?access_token={}", self.base_url, encode(access_token));
        let response = self.transport.send(&HttpRequest::get(url))?;
        let value = Self::checked_json(response)?;

        serde_json::from_value(value).map_err(|e| VibeError::RemoteService {
            status: 200,
            body: format!("Unexpected user profile payload: {e}"),
        })
    }

    /// Create an empty playlist on the user's account
    pub fn create_playlist(&self, access_token: &str, title: &str) -> Result<CreatedPlaylist> {
        let url = format!(
            "{}/user/me/playlists?access_token={}&title={}",
            self.base_url,
            encode(access_token),
            encode(title)
        );

        info!("Creating playlist '{title}'...");
        let response = self.transport.send(&HttpRequest::post(url))?;
        let value = Self::checked_json(response)?;

        let id = value.get("id").and_then(|id| id.as_u64()).ok_or_else(|| {
            VibeError::RemoteService {
                status: 200,
                body: format!("No playlist id in create response: {value}"),
            }
        })?;
        let link = value
            .get("link")
            .and_then(|l| l.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("https://www.deezer.com/playlist/{id}"));

        info!("✓ Created playlist '{title}' with ID: {id}");
        Ok(CreatedPlaylist { id, link })
    }

    /// Append tracks to an existing playlist, in order
    pub fn add_tracks(&self, access_token: &str, playlist_id: u64, track_ids: &[u64]) -> Result<()> {
        if track_ids.is_empty() {
            warn!("No tracks to add to playlist {playlist_id}");
            return Ok(());
        }

        let songs = track_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!(
            "{}/playlist/{}/tracks?access_token={}&songs={}",
            self.base_url,
            playlist_id,
            encode(access_token),
            encode(&songs)
        );

        let response = self.transport.send(&HttpRequest::post(url))?;
        Self::checked_json(response)?;

        info!("✓ Added {} tracks to playlist {playlist_id}", track_ids.len());
        Ok(())
    }

    /// Deezer reports many failures as HTTP 200 with an `{"error": {...}}` body
    fn checked_json(response: HttpResponse) -> Result<serde_json::Value> {
        let response = response.error_for_status()?;
        let value: serde_json::Value =
            serde_json::from_str(&response.body).map_err(|e| VibeError::RemoteService {
                status: response.status,
                body: format!("Invalid JSON response ({e}): {}", response.body),
            })?;

        if value.get("error").is_some() {
            return Err(VibeError::RemoteService {
                status: response.status,
                body: response.body,
            });
        }
        Ok(value)
    }
}
