
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use editor::doc::{Level, Levels, SaveLevelRequest};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("level not found: {0}")]
    NotFound(String),
    #[error("level already exists: {0}")]
    AlreadyExists(String),
    #[error("level name cannot be empty")]
    EmptyName,
    #[error("could not read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "level-cli", about = "Level editor storage API client")]
struct Cli {
    #[arg(long, env = "LEVEL_EDITOR_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up.
    Ping,
    /// List level names with their object counts.
    List,
    /// Print one level as JSON.
    Show { name: String },
    /// Save an empty 800×600 level under a new name.
    Create { name: String },
    /// Upload a level file under `name`.
    Save {
        name: String,
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    client: reqwest::Client,
}

impl CliContext {
    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = CliContext { base_url: cli.base_url, client: reqwest::Client::new() };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::List => run_list(&ctx).await,
        Command::Show { name } => run_show(&ctx, &name).await,
        Command::Create { name } => run_create(&ctx, &name).await,
        Command::Save { name, file } => run_save(&ctx, &name, file).await,
    }
}

async fn run_ping(ctx: &CliContext) -> Result<(), CliError> {
    let response = ctx.client.get(ctx.url("/healthz")).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn run_list(ctx: &CliContext) -> Result<(), CliError> {
    let levels = fetch_levels(ctx).await?;
    for line in summarize(&levels) {
        println!("{line}");
    }
    Ok(())
}

async fn run_show(ctx: &CliContext, name: &str) -> Result<(), CliError> {
    let mut levels = fetch_levels(ctx).await?;
    let level = levels.remove(name).ok_or_else(|| CliError::NotFound(name.to_owned()))?;
    println!("{}", serde_json::to_string_pretty(&level)?);
    Ok(())
}

async fn run_create(ctx: &CliContext, name: &str) -> Result<(), CliError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::EmptyName);
    }
    let levels = fetch_levels(ctx).await?;
    if levels.contains_key(name) {
        return Err(CliError::AlreadyExists(name.to_owned()));
    }
    upload(ctx, name, Level::default()).await
}

async fn run_save(ctx: &CliContext, name: &str, file: PathBuf) -> Result<(), CliError> {
    let raw = tokio::fs::read_to_string(&file)
        .await
        .map_err(|source| CliError::ReadFile { path: file.clone(), source })?;
    let level = parse_level(&raw)?;
    upload(ctx, name, level).await
}

async fn fetch_levels(ctx: &CliContext) -> Result<Levels, CliError> {
    let response = ctx.client.get(ctx.url("/api/levels")).send().await?;
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(CliError::ServerError { status: status.as_u16(), message });
    }
    Ok(response.json::<Levels>().await?)
}

async fn upload(ctx: &CliContext, name: &str, data: Level) -> Result<(), CliError> {
    let body = SaveLevelRequest { name: name.to_owned(), data };
    let response = ctx.client.post(ctx.url("/api/save-level")).json(&body).send().await?;
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or(Value::Null);
    let message = server_message(&value);

    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message });
    }
    println!("{name}: {message}");
    Ok(())
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Accepts either a bare level (`{ objects, dimensions }`) or a full save
/// body (`{ name, data }`), as written by the editor's export.
fn parse_level(raw: &str) -> Result<Level, CliError> {
    let value: Value = serde_json::from_str(raw)?;
    let level_value = match value.get("data") {
        Some(data) if value.get("objects").is_none() => data.clone(),
        _ => value,
    };
    Ok(serde_json::from_value(level_value)?)
}

fn server_message(value: &Value) -> String {
    value
        .get("message")
        .and_then(Value::as_str)
        .map_or_else(|| value.to_string(), str::to_owned)
}

fn summarize(levels: &Levels) -> Vec<String> {
    levels
        .iter()
        .map(|(name, level)| {
            format!(
                "{name}\t{} objects\t{}x{}",
                level.objects.len(),
                level.dimensions.width,
                level.dimensions.height
            )
        })
        .collect()
}
