/// gramophone - library database administration
mod config;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use config::GramophoneConfig;
use gramophone_core::{SpecId, SpecKind};
use gramophone_lastfm::LastFmClient;
use gramophone_storage::{aggregates, settings, users};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gramophone")]
#[command(about = "Administer a gramophone library database", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "GRAMOPHONE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read or write global settings
    #[command(subcommand)]
    Setting(SettingCommand),
    /// Convert between entity ids and wire tokens
    #[command(subcommand)]
    Id(IdCommand),
    /// Maintain cached aggregate columns
    #[command(subcommand)]
    Aggregates(AggregatesCommand),
    /// Manage users
    #[command(subcommand)]
    User(UserCommand),
    /// Last.fm account linking
    #[command(subcommand)]
    Lastfm(LastFmCommand),
}

#[derive(Subcommand)]
enum SettingCommand {
    /// Print a setting value
    Get { key: String },
    /// Store a setting value
    Set { key: String, value: String },
    /// List all settings
    List,
}

#[derive(Subcommand)]
enum IdCommand {
    /// Encode a kind and numeric id, e.g. `id encode album 42`
    Encode { kind: String, id: i64 },
    /// Decode a token, e.g. `id decode al-42`
    Decode { token: String },
}

#[derive(Subcommand)]
enum AggregatesCommand {
    /// Recompute every average rating from the rating rows
    Refresh,
}

#[derive(Subcommand)]
enum UserCommand {
    /// List all users
    List,
    /// Delete a user and everything they own
    Delete { name: String },
}

#[derive(Subcommand)]
enum LastFmCommand {
    /// Exchange an authorization token for a session key
    Session {
        token: String,
        /// Store the session key on this user
        #[arg(short, long)]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = GramophoneConfig::load(cli.config.as_deref())?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Id(command) => run_id(command),
        Commands::Setting(command) => {
            let pool = open_database(&config).await?;
            run_setting(&pool, command).await
        }
        Commands::Aggregates(AggregatesCommand::Refresh) => {
            let pool = open_database(&config).await?;
            aggregates::refresh_all_average_ratings(&pool).await?;
            println!("Average ratings refreshed");
            Ok(())
        }
        Commands::User(command) => {
            let pool = open_database(&config).await?;
            run_user(&pool, command).await
        }
        Commands::Lastfm(LastFmCommand::Session { token, user }) => {
            let pool = open_database(&config).await?;
            lastfm_session(&pool, &config, &token, user.as_deref()).await
        }
    }
}

async fn open_database(config: &GramophoneConfig) -> anyhow::Result<SqlitePool> {
    let pool = gramophone_storage::create_pool_with(&config.database)
        .await
        .with_context(|| format!("failed to open database {}", config.database.url))?;
    gramophone_storage::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    Ok(pool)
}

fn run_id(command: IdCommand) -> anyhow::Result<()> {
    match command {
        IdCommand::Encode { kind, id } => {
            let kind = parse_kind(&kind)?;
            if id < 0 {
                bail!("id must not be negative");
            }
            println!("{}", SpecId::new(kind, id));
        }
        IdCommand::Decode { token } => {
            let id = SpecId::decode(&token)?;
            println!("{} {}", id.kind, id.value);
        }
    }

    Ok(())
}

/// Accepts either the kind name (`album`) or its token prefix (`al`)
fn parse_kind(kind: &str) -> anyhow::Result<SpecKind> {
    SpecKind::from_name(kind)
        .or_else(|| SpecKind::from_prefix(kind))
        .with_context(|| {
            let known: Vec<&str> = SpecKind::ALL.iter().map(|kind| kind.as_str()).collect();
            format!("unknown kind '{kind}' (expected one of: {})", known.join(", "))
        })
}

async fn run_setting(pool: &SqlitePool, command: SettingCommand) -> anyhow::Result<()> {
    match command {
        SettingCommand::Get { key } => {
            let value = settings::get_setting(pool, &key).await?;
            println!("{value}");
        }
        SettingCommand::Set { key, value } => {
            settings::set_setting(pool, &key, &value).await?;
            tracing::info!(%key, "Setting stored");
        }
        SettingCommand::List => {
            for setting in settings::get_all_settings(pool).await? {
                println!("{} = {}", setting.key, setting.value);
            }
        }
    }

    Ok(())
}

async fn run_user(pool: &SqlitePool, command: UserCommand) -> anyhow::Result<()> {
    match command {
        UserCommand::List => {
            println!("Users:");
            for user in users::get_all(pool).await? {
                let role = if user.is_admin { " (admin)" } else { "" };
                println!("  {} - {}{}", user.id, user.name, role);
            }
        }
        UserCommand::Delete { name } => {
            let user = users::find_by_name(pool, &name)
                .await?
                .with_context(|| format!("no user named '{name}'"))?;
            users::delete(pool, user.id).await?;
            println!("Deleted user {name}");
        }
    }

    Ok(())
}

async fn lastfm_session(
    pool: &SqlitePool,
    config: &GramophoneConfig,
    token: &str,
    user: Option<&str>,
) -> anyhow::Result<()> {
    let api_key = credential(pool, config.lastfm.api_key.as_deref(), settings::SETTING_LASTFM_API_KEY).await?;
    let secret = credential(pool, config.lastfm.secret.as_deref(), settings::SETTING_LASTFM_SECRET).await?;

    let client = LastFmClient::new()?;
    let session_key = client.get_session(&api_key, &secret, token).await?;

    match user {
        Some(name) => {
            let user = users::find_by_name(pool, name)
                .await?
                .with_context(|| format!("no user named '{name}'"))?;
            users::set_lastfm_session(pool, user.id, Some(&session_key)).await?;
            println!("Linked Last.fm session to {name}");
        }
        None => println!("{session_key}"),
    }

    Ok(())
}

/// Config value first, then the stored setting
async fn credential(pool: &SqlitePool, configured: Option<&str>, key: &str) -> anyhow::Result<String> {
    if let Some(value) = configured.filter(|value| !value.is_empty()) {
        return Ok(value.to_owned());
    }

    settings::find_setting(pool, key)
        .await?
        .with_context(|| format!("Last.fm credential '{key}' is not configured"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn kind_by_name_or_prefix() {
        assert_eq!(parse_kind("album").unwrap(), SpecKind::Album);
        assert_eq!(parse_kind("pe").unwrap(), SpecKind::PodcastEpisode);
        assert!(parse_kind("song").is_err());
    }

    #[test]
    fn nested_subcommands_parse() {
        let cli = Cli::try_parse_from(["gramophone", "id", "encode", "track", "7"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Id(IdCommand::Encode { ref kind, id: 7 }) if kind == "track"
        ));

        let cli = Cli::try_parse_from(["gramophone", "lastfm", "session", "token1", "--user", "alice"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Lastfm(LastFmCommand::Session { ref user, .. }) if user.as_deref() == Some("alice")
        ));
    }
}
