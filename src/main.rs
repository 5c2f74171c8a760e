use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod client;
mod config;
mod error;
mod history;
mod http;
mod interpreter;
mod models;
mod vibe;

#[cfg(test)]
mod client_tests;

use crate::auth::{DEFAULT_PERMS, DeezerAuth, authorize_url};
use crate::client::{DEFAULT_LIMIT, DeezerClient};
use crate::config::{Config, load_config};
use crate::error::VibeError;
use crate::history::{HistoryStore, SupabaseHistory};
use crate::http::UreqTransport;
use crate::interpreter::{GeminiModel, VibeInterpreter};
use crate::models::{CreatedPlaylist, VibeResult};
use crate::vibe::{PlaylistPublisher, VibeGenerator, VibeMetrics};

#[derive(Parser)]
#[command(name = "vibe-pilot")]
#[command(about = "Describe a vibe, get a Deezer playlist")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Debug mode - log requests and intermediate results
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Quiet mode - only log warnings and errors
    #[arg(short = 'q', long = "quiet", global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Turn a free-text description into a track list
    Vibe {
        /// What you want to hear, e.g. "cyberpunk coding session at 2AM"
        #[arg(required = true)]
        prompt: Vec<String>,

        /// Number of tracks to request from the catalog
        #[arg(short = 'l', long = "limit", default_value_t = DEFAULT_LIMIT)]
        limit: u32,

        /// Create a Deezer playlist from the result (needs DEEZER_ACCESS_TOKEN)
        #[arg(short = 's', long = "save")]
        save: bool,

        /// Print the result as JSON instead of a listing
        #[arg(long = "json")]
        json: bool,
    },
    /// List playlists saved from earlier vibes
    History,
    /// Print the Deezer authorization URL to open in a browser
    AuthUrl,
    /// Exchange the `code` from the Deezer redirect for an access token
    AuthToken {
        code: String,
    },
}

fn init_logging(args: &Args) {
    let default_level = if args.quiet {
        LevelFilter::WARN
    } else if args.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    // Load configuration from .env
    let config = load_config()?;

    match args.command {
        Command::Vibe {
            prompt,
            limit,
            save,
            json,
        } => run_vibe(&config, &prompt.join(" "), limit, save, json),
        Command::History => run_history(&config),
        Command::AuthUrl => {
            let app_id = config.require_deezer_app_id()?;
            println!(
                "{}",
                authorize_url(app_id, &config.deezer_redirect_uri, DEFAULT_PERMS)
            );
            Ok(())
        }
        Command::AuthToken { code } => {
            let (app_id, secret) = config.require_deezer_app()?;
            let auth = DeezerAuth::new(UreqTransport::new(config.http_timeout), app_id, secret);
            let token = auth
                .exchange_code(&code)
                .context("Failed to exchange authorization code")?;
            println!("DEEZER_ACCESS_TOKEN={}", token.access_token);
            if token.expires > 0 {
                println!("# expires in {} seconds", token.expires);
            }
            Ok(())
        }
    }
}

fn history_store(config: &Config) -> Option<SupabaseHistory<UreqTransport>> {
    config
        .supabase
        .as_ref()
        .map(|supabase| SupabaseHistory::new(UreqTransport::new(config.http_timeout), supabase))
}

fn run_vibe(config: &Config, prompt: &str, limit: u32, save: bool, json: bool) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(anyhow::anyhow!("Describe a vibe to search for"));
    }

    let model = GeminiModel::new(
        UreqTransport::new(config.http_timeout),
        &config.gemini_base_url,
        &config.model_name,
        config.require_google_api_key()?,
    );
    let catalog = DeezerClient::new(UreqTransport::new(config.http_timeout), &config.deezer_base_url);
    let generator = VibeGenerator::new(VibeInterpreter::new(model), catalog, limit);

    info!("Generating vibe for \"{prompt}\"...");
    let result = generator
        .generate_vibe(prompt)
        .context("Failed to generate vibe")?;
    let metrics = VibeMetrics::from_result(&result);

    let playlist = if save {
        save_playlist(config, &generator, prompt, &result, json)?
    } else {
        None
    };

    if json {
        let report = json_report(&result, &metrics, playlist.as_ref());
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_result(&result, &metrics);
    if result.tracks.is_empty() {
        println!("\nNo tracks found. Try a different description.");
    }
    if let Some(playlist) = &playlist {
        println!("\n✓ Playlist created on Deezer: {}", playlist.link);
    }
    Ok(())
}

/// Create the playlist when possible; read-only mode and empty results are not failures
fn save_playlist(
    config: &Config,
    generator: &VibeGenerator<GeminiModel<UreqTransport>, UreqTransport>,
    prompt: &str,
    result: &VibeResult,
    json: bool,
) -> Result<Option<CreatedPlaylist>> {
    if result.tracks.is_empty() {
        info!("No tracks found, skipping playlist creation");
        return Ok(None);
    }
    if config.is_read_only() {
        warn!("Playlist saving is disabled: no Deezer access token configured");
        if !json {
            println!(
                "\nNote: playlist saving is disabled. Run `vibe-pilot auth-url` and `vibe-pilot auth-token <code>` to get DEEZER_ACCESS_TOKEN."
            );
        }
        return Ok(None);
    }

    let history = history_store(config);
    let publisher = PlaylistPublisher::new(
        generator.catalog(),
        history.as_ref().map(|h| h as &dyn HistoryStore),
    );
    let playlist = publisher
        .publish(config.deezer_access_token.as_deref(), prompt, result)
        .context("Failed to save playlist to Deezer")?;
    Ok(Some(playlist))
}

/// The single document printed by `vibe --json`
fn json_report(
    result: &VibeResult,
    metrics: &VibeMetrics,
    playlist: Option<&CreatedPlaylist>,
) -> serde_json::Value {
    serde_json::json!({
        "result": result,
        "metrics": metrics,
        "playlist": playlist,
    })
}

fn print_result(result: &VibeResult, metrics: &VibeMetrics) {
    println!("\n=== VIBE ANALYSIS ===");
    println!(
        "Energy: {:.0} | Popularity: {:.0} | Tempo: {:.0} | Mood: {:.0}",
        metrics.energy, metrics.popularity, metrics.tempo, metrics.mood
    );
    println!("\nInsight: {}", result.explanation);

    let params = &result.params;
    let bpm = match (params.bpm_min, params.bpm_max) {
        (Some(min), Some(max)) => format!(" | BPM: {min}-{max}"),
        (Some(min), None) => format!(" | BPM: {min}+"),
        (None, Some(max)) => format!(" | BPM: up to {max}"),
        (None, None) => String::new(),
    };
    println!("Query: \"{}\"{bpm}", params.query);

    if result.tracks.is_empty() {
        return;
    }

    println!("\n=== GENERATED TRACKS ===");
    for (i, track) in result.tracks.iter().enumerate() {
        let explicit = if track.explicit_lyrics { " [E]" } else { "" };
        println!(
            "  {}. \"{}\" by {}{} {}",
            i + 1,
            track.title,
            track.artist.name,
            explicit,
            track.duration_display()
        );
        if !track.preview.is_empty() {
            println!("     Preview: {}", track.preview);
        }
    }
}

fn run_history(config: &Config) -> Result<()> {
    let history = history_store(config)
        .ok_or(VibeError::Configuration(
            "SUPABASE_URL and SUPABASE_ANON_KEY must both be set".to_string(),
        ))?;
    let access_token = config
        .deezer_access_token
        .as_deref()
        .ok_or(VibeError::ReadOnly)?;

    let catalog = DeezerClient::new(UreqTransport::new(config.http_timeout), &config.deezer_base_url);
    let user = catalog
        .current_user(access_token)
        .context("Failed to look up the Deezer account")?;

    let playlists = history.list_for_user(&user.history_key())?;
    if playlists.is_empty() {
        println!("No vibes saved yet.");
        return Ok(());
    }

    println!("=== VIBE HISTORY ({}) ===", user.name);
    for playlist in &playlists {
        let link = playlist.deezer_link.as_deref().unwrap_or("-");
        println!(
            "{} | {} | {}",
            playlist.created_at.format("%Y-%m-%d"),
            playlist.title,
            link
        );
    }
    Ok(())
}
