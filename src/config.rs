//! Run configuration.
//!
//! A run is described by a small TOML file naming the input CSV, the
//! template page, the output document and, optionally, a settings JSON
//! file plus inline overrides:
//!
//! ```toml
//! [input]
//! csv = "agenda.csv"
//!
//! [template]
//! path = "template.json"
//!
//! [output]
//! document = "out/agenda.json"
//! report = "out/report.txt"
//!
//! [settings]
//! path = "settings.json"
//!
//! [settings.chairOptions]
//! mode = "grid"
//! columns = 3
//! ```
//!
//! Relative paths resolve against the directory holding the config file.

use anyhow::{Context, Result};
use quickgenda_core::settings::Settings;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub input: InputConfig,
    pub template: TemplateConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    /// Directory the config was loaded from.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub csv: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TemplateConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub document: PathBuf,
    #[serde(default)]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SettingsConfig {
    /// Settings JSON file. Defaults apply when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Inline tables merged over the file, using the JSON key names.
    #[serde(flatten)]
    pub overrides: toml::Table,
}

impl Config {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.input.csv.as_os_str().is_empty() {
        anyhow::bail!("input.csv must not be empty");
    }
    if config.template.path.as_os_str().is_empty() {
        anyhow::bail!("template.path must not be empty");
    }
    if config.output.document.as_os_str().is_empty() {
        anyhow::bail!("output.document must not be empty");
    }
    if let Some(report) = &config.output.report {
        if report.as_os_str().is_empty() {
            anyhow::bail!("output.report must not be empty when given");
        }
        if *report == config.output.document {
            anyhow::bail!("output.report must differ from output.document");
        }
    }
    if let Some(settings) = &config.settings.path {
        if settings.as_os_str().is_empty() {
            anyhow::bail!("settings.path must not be empty when given");
        }
    }
    for key in config.settings.overrides.keys() {
        if !SETTINGS_SECTIONS.contains(&key.as_str()) {
            anyhow::bail!(
                "Unknown settings section: '{}'. Must be one of: {}",
                key,
                SETTINGS_SECTIONS.join(", ")
            );
        }
    }

    config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    config.input.csv = config.resolve(&config.input.csv);
    config.template.path = config.resolve(&config.template.path);
    config.output.document = config.resolve(&config.output.document);
    config.output.report = config.output.report.as_deref().map(|p| config.resolve(p));
    config.settings.path = config.settings.path.as_deref().map(|p| config.resolve(p));

    Ok(config)
}

const SETTINGS_SECTIONS: [&str; 5] = [
    "chairOptions",
    "topicOptions",
    "lineBreakOptions",
    "stylesOptions",
    "reportOptions",
];

/// Build the run settings: the settings file (or defaults), then inline
/// overrides, then grid clamping. A relative image folder resolves against
/// the config directory.
pub fn load_settings(config: &Config) -> Result<Settings> {
    let mut value = match &config.settings.path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
            serde_json::from_str::<Value>(&content)
                .with_context(|| format!("Failed to parse settings file: {}", path.display()))?
        }
        None => serde_json::to_value(Settings::default())?,
    };

    if !config.settings.overrides.is_empty() {
        let overrides = serde_json::to_value(&config.settings.overrides)
            .with_context(|| "Failed to convert inline settings")?;
        merge(&mut value, overrides);
    }

    let mut settings: Settings =
        serde_json::from_value(value).with_context(|| "Invalid settings")?;
    settings.chair_options.clamp_grid();

    let folder = &settings.chair_options.image_folder;
    if !folder.is_empty() && Path::new(folder).is_relative() {
        settings.chair_options.image_folder =
            config.resolve(Path::new(folder)).to_string_lossy().into_owned();
    }

    Ok(settings)
}

/// Overlay `patch` onto `base`. Objects merge key by key; anything else
/// replaces.
fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}
