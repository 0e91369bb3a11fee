use crate::engine::controller::{CarouselOptions, ItemKey};
use crate::engine::viewport::{self, Breakpoint, Variant, ViewportConfig};
use crate::engine::{DEFAULT_FALLBACK_VISIBLE, DEFAULT_INTERVAL, DEFAULT_WIDTH};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AutoplayConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "interval_ms", default = "default_interval")]
    pub interval: Duration,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: DEFAULT_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewportSection {
    #[serde(default)]
    pub variant: Variant,
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_fallback")]
    pub fallback: usize,
    #[serde(default = "viewport::default_breakpoints")]
    pub breakpoints: Vec<Breakpoint>,
}

impl Default for ViewportSection {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            width: DEFAULT_WIDTH,
            fallback: DEFAULT_FALLBACK_VISIBLE,
            breakpoints: viewport::default_breakpoints(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub items: Vec<ItemKey>,
    #[serde(default)]
    pub autoplay: AutoplayConfig,
    #[serde(default)]
    pub viewport: ViewportSection,
}

fn default_true() -> bool {
    true
}

fn default_interval() -> Duration {
    DEFAULT_INTERVAL
}

fn default_width() -> f32 {
    DEFAULT_WIDTH
}

fn default_fallback() -> usize {
    DEFAULT_FALLBACK_VISIBLE
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.autoplay.interval.is_zero() {
            return Err(ConfigError::Invalid("autoplay.interval_ms must be positive"));
        }
        if self.viewport.fallback == 0 || self.viewport.breakpoints.iter().any(|b| b.visible == 0)
        {
            return Err(ConfigError::Invalid("visible counts must be positive"));
        }
        if !self.viewport.width.is_finite() || self.viewport.width < 0.0 {
            return Err(ConfigError::Invalid("viewport.width must be a finite, non-negative number"));
        }
        Ok(())
    }

    pub fn carousel_options(&self) -> CarouselOptions {
        CarouselOptions {
            autoplay: self.autoplay.enabled,
            interval: self.autoplay.interval,
            viewport: ViewportConfig::new(
                self.viewport.variant,
                self.viewport.breakpoints.clone(),
                self.viewport.fallback,
            ),
            width: self.viewport.width,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Invalid config: {0}")]
    Invalid(&'static str),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "carousel", "carousel").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&get_config_path()?)
}

fn load_config_from(config_path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("CAROUSEL")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Loads the user config. A first run installs the bundled defaults at the
/// config path; anything unusable falls back to them in memory.
pub fn load_or_default() -> Config {
    if let Ok(path) = get_config_path()
        && let Err(e) = install_default_config(&path)
    {
        log::warn!("Failed to create {}: {}", path.display(), e);
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default config: {}", e);
            default_config()
        }
    }
}

pub fn default_config() -> Config {
    toml_config(DEFAULT_CONFIG).unwrap_or_default()
}

fn toml_config(text: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(text, config::FileFormat::Toml))
        .build()?;
    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Writes the bundled defaults to `path` unless a file is already there.
/// Returns whether anything was written.
pub fn install_default_config(path: &Path) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(dir) = path.parent() {
        fs_err::create_dir_all(dir)?;
    }
    fs_err::write(path, DEFAULT_CONFIG)?;
    log::info!("Wrote default config to {}", path.display());
    Ok(true)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

fn touches_config(event: &notify::Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

/// Emits one `ConfigReload` per burst of filesystem events touching the
/// config file. Editors often write a file in several steps.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(Path::to_path_buf) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )
    .and_then(|mut w| w.watch(&config_dir, RecursiveMode::NonRecursive).map(|_| w));

    // keep the watcher alive for as long as the loop runs
    let _watcher = match watcher {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to watch config directory: {}", ConfigError::from(e));
            return;
        }
    };

    while let Ok(res) = bridge_rx.recv().await {
        let mut reload = match res {
            Ok(event) => touches_config(&event, &config_path),
            Err(e) => {
                log::error!("Watch error: {}", e);
                false
            }
        };

        while let Ok(pending) = bridge_rx.try_recv() {
            reload |= pending.is_ok_and(|event| touches_config(&event, &config_path));
        }

        if reload && tx.send(AppEvent::ConfigReload).await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_default_config() {
        let config = toml_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.items.len(), 5);
        assert!(config.autoplay.enabled);
        assert_eq!(config.autoplay.interval, Duration::from_millis(4000));
        assert_eq!(config.viewport.variant, Variant::Stack);

        let options = config.carousel_options();
        assert_eq!(options.viewport.visible_count(500.0), 1);
        assert_eq!(options.viewport.visible_count(900.0), 3);
        assert_eq!(options.viewport.visible_count(1200.0), 5);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = toml_config("items = [\"a\", \"b\"]").unwrap();
        assert_eq!(config.items, vec![ItemKey::new("a"), ItemKey::new("b")]);
        assert_eq!(config.autoplay.interval, DEFAULT_INTERVAL);
        assert_eq!(config.viewport.width, DEFAULT_WIDTH);
        assert_eq!(config.viewport.breakpoints, viewport::default_breakpoints());
    }

    #[test]
    fn test_slider_variant_and_interval() {
        let text = r#"
            items = ["hero"]

            [autoplay]
            enabled = false
            interval_ms = 2500

            [viewport]
            variant = "Slider"
        "#;
        let config = toml_config(text).unwrap();
        assert!(!config.autoplay.enabled);
        assert_eq!(config.autoplay.interval, Duration::from_millis(2500));
        assert_eq!(config.carousel_options().viewport.visible_count(1920.0), 1);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let text = "[autoplay]\ninterval_ms = 0\n";
        assert!(matches!(toml_config(text), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_visible_count_is_rejected() {
        let text = "[viewport]\nbreakpoints = [{ max_width = 600.0, visible = 0 }]\n";
        assert!(matches!(toml_config(text), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_only_config_file_events_trigger_reload() {
        use notify::event::{CreateKind, ModifyKind};

        let path = Path::new("/home/user/.config/carousel/config.toml");
        let modify = notify::Event::new(EventKind::Modify(ModifyKind::Any)).add_path(path.into());
        let other = notify::Event::new(EventKind::Create(CreateKind::File))
            .add_path("/home/user/.config/carousel/notes.txt".into());
        let access = notify::Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(path.into());

        assert!(touches_config(&modify, path));
        assert!(!touches_config(&other, path));
        assert!(!touches_config(&access, path));
    }

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("carousel-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_first_run_installs_default_config() {
        let dir = scratch_dir("install");
        let path = dir.join("carousel").join("config.toml");

        assert!(install_default_config(&path).unwrap());
        assert_eq!(fs_err::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.items, default_config().items);

        assert!(!install_default_config(&path).unwrap());
        fs_err::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_existing_config_is_not_overwritten() {
        let dir = scratch_dir("keep");
        let path = dir.join("config.toml");
        fs_err::create_dir_all(&dir).unwrap();
        fs_err::write(&path, "items = [\"mine\"]\n").unwrap();

        assert!(!install_default_config(&path).unwrap());
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.items, vec![ItemKey::new("mine")]);

        fs_err::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_interval_serializes_as_millis() {
        let json = serde_json::to_value(AutoplayConfig::default()).unwrap();
        assert_eq!(json["interval_ms"], 4000);
        assert_eq!(json["enabled"], true);
    }
}
