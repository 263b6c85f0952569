use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::catalog::{Endpoints, DEFAULT_API_BASE, DEFAULT_PAGE_SIZE, DEFAULT_SPRITE_BASE};
use crate::theme::Theme;

/// pokeview - terminal catalog browser for the PokéAPI
///
/// Configuration priority: CLI args > Environment variables > Config file > Defaults
#[derive(Parser, Debug, Default)]
#[command(name = "pokeview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse the PokéAPI catalog from the terminal", long_about = None)]
pub struct CliArgs {
    /// Route to open on startup (e.g. "/pokemon/25" or "pokeview://pokemon/pikachu")
    pub route: Option<String>,

    /// PokéAPI base URL
    #[arg(long, env = "POKEAPI_BASE_URL")]
    pub api_base: Option<String>,

    /// Base URL for list sprites ({base}/{id}.png)
    #[arg(long, env = "POKEVIEW_SPRITE_BASE")]
    pub sprite_base: Option<String>,

    /// Records per page (1-100)
    #[arg(long, env = "POKEVIEW_PAGE_SIZE")]
    pub page_size: Option<u32>,

    /// HTTP request timeout in milliseconds (1000-60000)
    #[arg(long, env = "POKEVIEW_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Target UI rendering FPS (1-120)
    #[arg(long, env = "POKEVIEW_RENDER_FPS")]
    pub render_fps: Option<u32>,

    /// Color theme: nord, amber-crt, green-phosphor
    #[arg(long, env = "POKEVIEW_THEME", value_parser = clap::value_parser!(Theme))]
    pub theme: Option<Theme>,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long, env = "POKEVIEW_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// TOML config file
    #[arg(long, env = "POKEVIEW_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Optional TOML file; every key may be omitted
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub api_base: Option<String>,
    pub sprite_base: Option<String>,
    pub page_size: Option<u32>,
    pub timeout_ms: Option<u64>,
    pub render_fps: Option<u32>,
    pub theme: Option<String>,
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base: String,
    pub sprite_base: String,
    pub page_size: u32,
    pub timeout_ms: u64,
    pub render_fps: u32,
    pub theme: Theme,
    pub log_file: Option<PathBuf>,
    pub start_route: Option<String>,
}

impl Config {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(self.api_base.clone(), self.sprite_base.clone())
    }
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Must parse and use http(s)
fn validate_url(raw: &str, name: &str) -> Result<()> {
    if raw.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    let parsed = url::Url::parse(raw).with_context(|| format!("{name} is not a valid URL: {raw}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(anyhow!("{name} must use http:// or https://, got {other}://")),
    }
}

pub fn load_file(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
}

/// Load configuration from CLI args, environment and the optional config file
pub fn load() -> Result<Config> {
    let args = CliArgs::parse();
    let file = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            load_file(path)?
        }
        None => ConfigFile::default(),
    };
    resolve(args, file)
}

/// Merge parsed args (already env-aware) over file values over defaults
pub fn resolve(args: CliArgs, file: ConfigFile) -> Result<Config> {
    let api_base = args
        .api_base
        .or(file.api_base)
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    validate_url(&api_base, "POKEAPI_BASE_URL")?;

    let sprite_base = args
        .sprite_base
        .or(file.sprite_base)
        .unwrap_or_else(|| DEFAULT_SPRITE_BASE.to_string());
    validate_url(&sprite_base, "POKEVIEW_SPRITE_BASE")?;

    let page_size = args.page_size.or(file.page_size).unwrap_or(DEFAULT_PAGE_SIZE);
    let page_size = validate_in_range(page_size, 1, 100, "POKEVIEW_PAGE_SIZE")?;

    let timeout_ms = args.timeout_ms.or(file.timeout_ms).unwrap_or(10_000);
    let timeout_ms = validate_in_range(timeout_ms, 1000, 60_000, "POKEVIEW_TIMEOUT_MS")?;

    let render_fps = args.render_fps.or(file.render_fps).unwrap_or(30);
    let render_fps = validate_in_range(render_fps, 1, 120, "POKEVIEW_RENDER_FPS")?;

    let theme = match (args.theme, file.theme) {
        (Some(t), _) => t,
        (None, Some(name)) => name.parse().map_err(|e: String| anyhow!(e))?,
        (None, None) => Theme::default(),
    };

    Ok(Config {
        api_base,
        sprite_base,
        page_size,
        timeout_ms,
        render_fps,
        theme,
        log_file: args.log_file.or(file.log_file),
        start_route: args.route,
    })
}

/// Print current configuration (useful for debugging)
impl Config {
    pub fn log_summary(&self) {
        log::info!("pokeview configuration:");
        log::info!("  API base: {}", self.api_base);
        log::info!("  Sprite base: {}", self.sprite_base);
        log::info!("  Page size: {}", self.page_size);
        log::info!("  Timeout: {}ms", self.timeout_ms);
        log::info!("  Render FPS: {}", self.render_fps);
        log::info!("  Theme: {}", self.theme);
        if let Some(route) = &self.start_route {
            log::info!("  Start route: {route}");
        }
    }
}
