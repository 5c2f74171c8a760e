use crate::client::DeezerClient;
use crate::error::{Result, VibeError};
use crate::history::HistoryStore;
use crate::http::HttpTransport;
use crate::models::{CreatedPlaylist, NewSavedPlaylist, VibeResult};
use tracing::{info, warn};

/// Title given to playlists created from a prompt
pub fn playlist_title(prompt: &str) -> String {
    format!("Pilot: {}", prompt.trim())
}

/// Saves a vibe as a Deezer playlist and, when configured, into the history table
pub struct PlaylistPublisher<'a, T: HttpTransport> {
    catalog: &'a DeezerClient<T>,
    history: Option<&'a dyn HistoryStore>,
}

impl<'a, T: HttpTransport> PlaylistPublisher<'a, T> {
    pub fn new(catalog: &'a DeezerClient<T>, history: Option<&'a dyn HistoryStore>) -> Self {
        Self { catalog, history }
    }

    pub fn publish(
        &self,
        access_token: Option<&str>,
        prompt: &str,
        result: &VibeResult,
    ) -> Result<CreatedPlaylist> {
        let access_token = access_token.ok_or(VibeError::ReadOnly)?;

        let title = playlist_title(prompt);
        let playlist = self.catalog.create_playlist(access_token, &title)?;
        self.catalog
            .add_tracks(access_token, playlist.id, &result.track_ids())?;

        if let Some(history) = self.history {
            // History is best effort once the playlist exists
            match self.record(history, access_token, &title, result, &playlist) {
                Ok(()) => info!("Saved '{title}' to history"),
                Err(e) => warn!("Failed to save '{title}' to history: {e}"),
            }
        }

        Ok(playlist)
    }

    fn record(
        &self,
        history: &dyn HistoryStore,
        access_token: &str,
        title: &str,
        result: &VibeResult,
        playlist: &CreatedPlaylist,
    ) -> Result<()> {
        let user = self.catalog.current_user(access_token)?;
        let entry = NewSavedPlaylist {
            user_id: user.history_key(),
            title: title.to_string(),
            tracks: serde_json::to_value(&result.tracks)?,
            tags: vec![result.params.query.clone()],
            vibe_metrics: serde_json::to_value(&result.params)?,
            deezer_link: Some(playlist.link.clone()),
        };
        history.record(&entry)
    }
}
