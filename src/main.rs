//! `green-mirror` command-line interface.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use green_mirror::adapters::ai::{
    GeminiClient, GeminiImpactAnalyzer, GeminiVisualizer, MockImpactAnalyzer, MockVisualizer,
};
use green_mirror::adapters::{FileProfileStore, StaticComparisonSource};
use green_mirror::application::{
    AnalysisSessionManager, CommitSessionCommand, CommitSessionHandler, DeleteLogCommand,
    DeleteLogHandler, GetLeaderboardHandler, GetLeaderboardQuery, SignInCommand, SignInHandler,
    SignOutHandler, VisualizationOutcome,
};
use green_mirror::config::{
    AiProvider, AppConfig, ConfigError, LogFormat, LoggingConfig, ValidationError,
};
use green_mirror::domain::foundation::LogEntryId;
use green_mirror::domain::impact::{CapturedMedia, MediumTag};
use green_mirror::domain::profile::UserProfile;
use green_mirror::domain::progress::DailyCompletion;
use green_mirror::domain::session::SessionError;
use green_mirror::ports::{
    ComparisonError, ImpactAnalyzer, ProfileStore, ProfileStoreError, Visualizer,
};

#[derive(Parser)]
#[command(name = "green-mirror")]
#[command(about = "Log the environmental impact of everyday activities", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a photo, video, audio clip or text description
    Analyze {
        /// File to analyze; for `--medium text`, the description itself
        input: String,
        /// How the input was captured
        #[arg(long, default_value = "image")]
        medium: MediumTag,
        /// Declared MIME type of the file
        #[arg(long)]
        mime: Option<String>,
        /// Save the result to the profile
        #[arg(long, default_value_t = false)]
        save: bool,
        /// Run as an ephemeral guest; nothing is written to disk
        #[arg(long, default_value_t = false)]
        guest: bool,
    },
    /// List logged activities, newest first
    History,
    /// Delete a logged activity
    Delete {
        /// Log entry id as shown by `history`
        log_id: LogEntryId,
    },
    /// Show the ranking against other participants
    Leaderboard,
    /// Show today's habit completion
    Progress,
    /// Clear the stored profile
    SignOut,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] ProfileStoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Comparison(#[from] ComparisonError),
    #[error("could not read {path}: {source}")]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = logging.env_filter()?;
    match logging.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
    Ok(())
}

fn engines(config: &AppConfig) -> Result<(Arc<dyn ImpactAnalyzer>, Arc<dyn Visualizer>), CliError> {
    match config.ai.provider {
        AiProvider::Mock => Ok((
            Arc::new(MockImpactAnalyzer::new()),
            Arc::new(MockVisualizer::new()),
        )),
        AiProvider::Gemini => {
            let gemini = config
                .ai
                .gemini()
                .ok_or(ConfigError::ValidationFailed(ValidationError::MissingRequired(
                    "GEMINI_API_KEY",
                )))?;
            let client = Arc::new(GeminiClient::new(gemini)?);
            Ok((
                Arc::new(GeminiImpactAnalyzer::new(Arc::clone(&client))),
                Arc::new(GeminiVisualizer::new(client)),
            ))
        }
    }
}

async fn read_media(
    input: &str,
    medium: MediumTag,
    mime: Option<String>,
) -> Result<CapturedMedia, CliError> {
    let media = if medium == MediumTag::Text {
        CapturedMedia::text(input)
    } else {
        let path = PathBuf::from(input);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| CliError::Input { path, source })?;
        CapturedMedia::new(bytes, medium)
    };
    Ok(match mime {
        Some(mime) => media.with_declared_mime(mime),
        None => media,
    })
}

async fn signed_in(config: &AppConfig, store: Arc<dyn ProfileStore>) -> Result<UserProfile, CliError> {
    let identity = config.identity.identity().map_err(ConfigError::from)?;
    let result = SignInHandler::new(store)
        .handle(SignInCommand {
            identity,
            guest: None,
        })
        .await?;
    Ok(result.profile)
}

async fn run(cli: Cli, config: AppConfig) -> Result<(), CliError> {
    let store: Arc<dyn ProfileStore> = Arc::new(FileProfileStore::with_file_name(
        &config.storage.data_dir,
        config.storage.record_file.clone(),
    ));

    match cli.command {
        Commands::Analyze {
            input,
            medium,
            mime,
            save,
            guest,
        } => {
            let profile = if guest {
                UserProfile::guest()
            } else {
                signed_in(&config, Arc::clone(&store)).await?
            };
            let (analyzer, visualizer) = engines(&config)?;
            let sessions = Arc::new(
                AnalysisSessionManager::new(analyzer, visualizer)
                    .with_timeouts(config.ai.call_budget(), config.ai.call_budget()),
            );

            let media = read_media(&input, medium, mime).await?;
            let submission = sessions.submit(profile.id(), media).await?;
            if let Some(result) = &submission.snapshot.result {
                println!("{} [{}]", result.summary, result.main_category);
                println!("Carbon score: {}/100", result.total_carbon_score);
                for item in &result.items {
                    println!(
                        "  - {} ({}, {:.0} g CO2e): {}",
                        item.name, item.category, item.carbon_footprint, item.suggestion
                    );
                }
                for tip in &result.general_tips {
                    println!("  * {}", tip);
                }
            }

            match submission.visualization.wait().await? {
                VisualizationOutcome::Attached(_) => println!("Visualization ready, badge unlocked"),
                VisualizationOutcome::Failed(_) => println!("No visualization this time"),
                VisualizationOutcome::Stale => debug!("Visualization arrived after the session ended"),
            }

            if save {
                let committed = CommitSessionHandler::new(Arc::clone(&sessions), store)
                    .handle(CommitSessionCommand { profile })
                    .await?;
                println!(
                    "Saved {} (+{} points, {} total)",
                    committed.entry.id(),
                    committed.entry.points_earned(),
                    committed.profile.total_points()
                );
            } else {
                sessions.discard(profile.id()).await?;
            }
        }
        Commands::History => {
            let profile = signed_in(&config, store).await?;
            println!(
                "{}: {} points, {} day streak, {} badges",
                profile.name(),
                profile.total_points(),
                profile.streak_days(),
                profile.badges().count()
            );
            for entry in profile.logs() {
                println!(
                    "{}  {}  {:<9}  score {:>3}  +{:<3}{}",
                    entry.id(),
                    entry.recorded_at_time().to_rfc3339(),
                    entry.result().main_category.as_str(),
                    entry.result().total_carbon_score.value(),
                    entry.points_earned(),
                    if entry.is_badge() { "  badge" } else { "" }
                );
            }
        }
        Commands::Delete { log_id } => {
            let profile = signed_in(&config, Arc::clone(&store)).await?;
            let result = DeleteLogHandler::new(store)
                .handle(DeleteLogCommand { profile, log_id })
                .await?;
            if result.removed {
                println!("Deleted {} ({} points left)", log_id, result.profile.total_points());
            } else {
                println!("No entry {}", log_id);
            }
        }
        Commands::Leaderboard => {
            let profile = signed_in(&config, store).await?;
            let board = GetLeaderboardHandler::new(Arc::new(StaticComparisonSource::new()))
                .handle(GetLeaderboardQuery { profile })
                .await?;
            for entry in board {
                println!(
                    "{:>2}. {:<20} {:>5}{}",
                    entry.rank,
                    entry.name,
                    entry.points,
                    if entry.is_current_user { "  (you)" } else { "" }
                );
            }
        }
        Commands::Progress => {
            let profile = signed_in(&config, store).await?;
            let today = DailyCompletion::today(profile.logs());
            for (habit, done) in today.habits() {
                println!("[{}] {}", if done { "x" } else { " " }, habit.label());
            }
            println!(
                "{}/{} habits today ({})",
                today.completed_count(),
                today.total(),
                today.percent()
            );
        }
        Commands::SignOut => {
            SignOutHandler::new(store).handle().await?;
            println!("Signed out");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_tracing(&config.logging) {
        eprintln!("{}", err);
        return ExitCode::FAILURE;
    }
    if let Err(err) = config.validate() {
        error!(error = %err, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Command failed");
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
