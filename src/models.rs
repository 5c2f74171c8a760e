use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Structured search intent produced by the language model for one prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<u32>,
    pub explanation: String,
}

impl SearchParameters {
    /// Plain text query without filters
    pub fn query_only(query: impl Into<String>) -> Self {
        SearchParameters {
            query: query.into(),
            bpm_min: None,
            bpm_max: None,
            genre_id: None,
            explanation: String::new(),
        }
    }
}

/// Deezer sends `null` for some absent values; read those as the field's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A Deezer track as returned by `/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title_short: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: u32, // in seconds
    #[serde(default, deserialize_with = "null_as_default")]
    pub rank: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explicit_lyrics: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preview: String,
    pub artist: Artist,
    pub album: Album,
}

impl Track {
    /// `m:ss` rendering of the duration
    pub fn duration_display(&self) -> String {
        format!("{}:{:02}", self.duration / 60, self.duration % 60)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub picture: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub picture_small: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub picture_medium: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub picture_big: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub picture_xl: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Album {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cover: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cover_small: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cover_medium: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cover_big: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cover_xl: String,
}

/// Response envelope of the `/search` endpoint
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct SearchResponse {
    pub data: Vec<Track>,
    #[serde(default)]
    pub total: u64,
    pub next: Option<String>,
}

/// Everything one prompt resolved to
#[derive(Debug, Clone, Serialize)]
pub struct VibeResult {
    pub explanation: String,
    pub params: SearchParameters,
    pub tracks: Vec<Track>,
}

impl VibeResult {
    pub fn track_ids(&self) -> Vec<u64> {
        self.tracks.iter().map(|t| t.id).collect()
    }
}

/// Playlist created on Deezer
#[derive(Debug, Clone, Serialize)]
pub struct CreatedPlaylist {
    pub id: u64,
    pub link: String,
}

/// Profile returned by `/user/me`
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct DeezerUser {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    pub picture: Option<String>,
    pub picture_medium: Option<String>,
}

impl DeezerUser {
    /// Key under which history rows are stored: email when shared, else the Deezer id
    pub fn history_key(&self) -> String {
        self.email.clone().unwrap_or_else(|| self.id.to_string())
    }
}

/// A row of the `playlists` history table
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct SavedPlaylist {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub tracks: serde_json::Value,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub vibe_metrics: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub deezer_link: Option<String>,
}

/// Insert payload for the history table; `id` and `created_at` are assigned by the database
#[derive(Debug, Clone, Serialize)]
pub struct NewSavedPlaylist {
    pub user_id: String,
    pub title: String,
    pub tracks: serde_json::Value,
    pub tags: Vec<String>,
    pub vibe_metrics: serde_json::Value,
    pub deezer_link: Option<String>,
}
