//! The run settings object.
//!
//! Mirrors the JSON document produced by the settings UI:
//!
//! ```json
//! {
//!   "chairOptions": { "mode": "grid", "columns": 3, "units": "mm", ... },
//!   "topicOptions": { "mode": "table", "includeHeader": true, ... },
//!   "lineBreakOptions": { "lineBreaks": { "SessionTitle": { "enabled": true, "character": "|" } } },
//!   "stylesOptions": { "session": { "titlePara": "Title" }, ... },
//!   "reportOptions": { "includeImages": true, "includeOverset": true, "includeCounts": true }
//! }
//! ```
//!
//! Every field is optional on input and falls back to the product default,
//! so partial files are accepted. Serialization is lossless: a value
//! written with [`Settings::to_json`] parses back to an equal value.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::layout::Unit;

/// Lower bound for grid columns and rows.
pub const GRID_MIN: u32 = 1;
/// Upper bound for grid columns and rows.
pub const GRID_MAX: u32 = 99;

/// Line-break rule keys, one per fillable field.
pub mod keys {
    pub const SESSION_TITLE: &str = "SessionTitle";
    pub const SESSION_TIME: &str = "SessionTime";
    pub const SESSION_NO: &str = "SessionNo";
    pub const CHAIRPERSONS: &str = "Chairpersons";
    pub const TOPIC_TIME: &str = "topicTime";
    pub const TOPIC_TITLE: &str = "topicTitle";
    pub const TOPIC_SPEAKER: &str = "topicSpeaker";

    pub const ALL: [&str; 7] = [
        SESSION_TITLE,
        SESSION_TIME,
        SESSION_NO,
        CHAIRPERSONS,
        TOPIC_TIME,
        TOPIC_TITLE,
        TOPIC_SPEAKER,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub chair_options: ChairLayoutConfig,
    pub topic_options: TopicLayoutConfig,
    pub line_break_options: LineBreakOptions,
    pub styles_options: StylesOptions,
    pub report_options: ReportOptions,
}

impl Settings {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.chair_options.clamp_grid();
        Ok(settings)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChairMode {
    #[default]
    Inline,
    Grid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineSeparator {
    #[default]
    Comma,
    Linebreak,
}

/// Which grid dimension is authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillOrder {
    #[default]
    Row,
    Col,
}

/// How a placed image is fitted into its frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFitting {
    #[default]
    #[serde(rename = "Use Template Default")]
    TemplateDefault,
    #[serde(rename = "Fill Frame")]
    FillFrame,
    #[serde(rename = "Fit Proportionally")]
    FitProportionally,
    #[serde(rename = "Fit Content to Frame")]
    ContentToFrame,
    #[serde(rename = "Center Content")]
    CenterContent,
}

impl ImageFitting {
    pub fn label(self) -> &'static str {
        match self {
            ImageFitting::TemplateDefault => "Use Template Default",
            ImageFitting::FillFrame => "Fill Frame",
            ImageFitting::FitProportionally => "Fit Proportionally",
            ImageFitting::ContentToFrame => "Fit Content to Frame",
            ImageFitting::CenterContent => "Center Content",
        }
    }
}

/// Chairperson placement options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChairLayoutConfig {
    pub mode: ChairMode,
    pub inline_separator: InlineSeparator,
    pub order: FillOrder,
    #[serde(deserialize_with = "grid_count")]
    pub columns: u32,
    #[serde(deserialize_with = "grid_count")]
    pub rows: u32,
    pub col_spacing: f64,
    pub row_spacing: f64,
    pub units: Unit,
    pub center_grid: bool,
    pub enable_images: bool,
    pub image_folder: String,
    pub image_fitting: ImageFitting,
}

impl Default for ChairLayoutConfig {
    fn default() -> Self {
        Self {
            mode: ChairMode::Inline,
            inline_separator: InlineSeparator::Comma,
            order: FillOrder::Row,
            columns: 2,
            rows: 2,
            col_spacing: 8.0,
            row_spacing: 4.0,
            units: Unit::Pt,
            center_grid: false,
            enable_images: false,
            image_folder: String::new(),
            image_fitting: ImageFitting::TemplateDefault,
        }
    }
}

impl ChairLayoutConfig {
    pub fn col_spacing_pt(&self) -> f64 {
        self.units.to_points(self.col_spacing)
    }

    pub fn row_spacing_pt(&self) -> f64 {
        self.units.to_points(self.row_spacing)
    }

    /// Images are processed only when enabled and a folder is given.
    pub fn images_active(&self) -> bool {
        self.enable_images && !self.image_folder.is_empty()
    }

    pub fn clamp_grid(&mut self) {
        self.columns = self.columns.clamp(GRID_MIN, GRID_MAX);
        self.rows = self.rows.clamp(GRID_MIN, GRID_MAX);
    }
}

/// Accepts any integer and clamps it into the grid range, negatives included.
fn grid_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = i64::deserialize(deserializer)?;
    let clamped = value.clamp(i64::from(GRID_MIN), i64::from(GRID_MAX));
    u32::try_from(clamped).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicMode {
    #[default]
    Table,
    Independent,
}

/// Topic placement options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicLayoutConfig {
    pub mode: TopicMode,
    pub include_header: bool,
    pub vertical_spacing: f64,
    pub units: Unit,
}

impl Default for TopicLayoutConfig {
    fn default() -> Self {
        Self {
            mode: TopicMode::Table,
            include_header: true,
            vertical_spacing: 4.0,
            units: Unit::Pt,
        }
    }
}

impl TopicLayoutConfig {
    pub fn vertical_spacing_pt(&self) -> f64 {
        self.units.to_points(self.vertical_spacing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineBreakRule {
    pub enabled: bool,
    pub character: String,
}

impl Default for LineBreakRule {
    fn default() -> Self {
        Self {
            enabled: false,
            character: "|".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineBreakOptions {
    pub line_breaks: BTreeMap<String, LineBreakRule>,
}

impl Default for LineBreakOptions {
    fn default() -> Self {
        Self {
            line_breaks: keys::ALL
                .iter()
                .map(|k| (k.to_string(), LineBreakRule::default()))
                .collect(),
        }
    }
}

impl LineBreakOptions {
    /// Delimiter for `key` if its rule is enabled.
    pub fn delimiter_for(&self, key: &str) -> Option<&str> {
        self.line_breaks
            .get(key)
            .filter(|rule| rule.enabled && !rule.character.is_empty())
            .map(|rule| rule.character.as_str())
    }

    pub fn enable(&mut self, key: &str, character: &str) {
        self.line_breaks.insert(
            key.to_string(),
            LineBreakRule {
                enabled: true,
                character: character.to_string(),
            },
        );
    }
}

/// Style names applied after text is written. Empty means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StylesOptions {
    pub table: TableStyles,
    pub session: SessionStyles,
    pub chair: ChairStyles,
    pub topics_independent: TopicStyles,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableStyles {
    pub table_style: String,
    pub cell_style: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionStyles {
    pub title_para: String,
    pub time_para: String,
    pub no_para: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChairStyles {
    pub style: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicStyles {
    pub time_para: String,
    pub title_para: String,
    pub speaker_para: String,
}

/// Which report sections to include.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportOptions {
    pub include_images: bool,
    pub include_overset: bool,
    pub include_counts: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_images: true,
            include_overset: true,
            include_counts: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customized() -> Settings {
        let mut s = Settings::default();
        s.chair_options.mode = ChairMode::Grid;
        s.chair_options.order = FillOrder::Col;
        s.chair_options.columns = 4;
        s.chair_options.rows = 3;
        s.chair_options.col_spacing = 2.5;
        s.chair_options.units = Unit::Mm;
        s.chair_options.center_grid = true;
        s.chair_options.enable_images = true;
        s.chair_options.image_folder = "/tmp/faces".to_string();
        s.chair_options.image_fitting = ImageFitting::FitProportionally;
        s.topic_options.mode = TopicMode::Independent;
        s.topic_options.include_header = false;
        s.topic_options.vertical_spacing = 0.5;
        s.topic_options.units = Unit::Cm;
        s.line_break_options.enable(keys::TOPIC_TITLE, "/");
        s.styles_options.session.title_para = "Session \"Title\"".to_string();
        s.styles_options.table.cell_style = "Body\\Cell".to_string();
        s.report_options.include_overset = false;
        s
    }

    #[test]
    fn test_json_roundtrip_is_lossless() {
        let original = customized();
        let json = original.to_json().unwrap();
        let parsed = Settings::from_json(&json).unwrap();
        assert_eq!(parsed, original);

        let default_json = Settings::default().to_json().unwrap();
        assert_eq!(Settings::from_json(&default_json).unwrap(), Settings::default());
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = customized().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["chairOptions"]["mode"], "grid");
        assert_eq!(value["chairOptions"]["order"], "col");
        assert_eq!(value["chairOptions"]["imageFitting"], "Fit Proportionally");
        assert_eq!(value["topicOptions"]["includeHeader"], false);
        assert_eq!(value["lineBreakOptions"]["lineBreaks"]["topicTitle"]["character"], "/");
        assert_eq!(value["stylesOptions"]["topicsIndependent"]["timePara"], "");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = Settings::from_json(r#"{"chairOptions": {"mode": "grid", "columns": 250}}"#).unwrap();
        assert_eq!(s.chair_options.mode, ChairMode::Grid);
        assert_eq!(s.chair_options.columns, GRID_MAX);
        assert_eq!(s.chair_options.rows, 2);
        assert_eq!(s.chair_options.col_spacing, 8.0);
        assert_eq!(s.topic_options, TopicLayoutConfig::default());
        assert!(s.report_options.include_counts);
        assert_eq!(s.line_break_options.line_breaks.len(), 7);
    }

    #[test]
    fn test_zero_grid_is_clamped() {
        let s = Settings::from_json(r#"{"chairOptions": {"columns": 0, "rows": 0}}"#).unwrap();
        assert_eq!(s.chair_options.columns, 1);
        assert_eq!(s.chair_options.rows, 1);
    }

    #[test]
    fn test_negative_and_oversized_grid_is_clamped() {
        let s = Settings::from_json(r#"{"chairOptions": {"columns": -2, "rows": 250}}"#).unwrap();
        assert_eq!(s.chair_options.columns, 1);
        assert_eq!(s.chair_options.rows, 99);
    }

    #[test]
    fn test_line_break_lookup() {
        let mut opts = LineBreakOptions::default();
        assert_eq!(opts.delimiter_for(keys::SESSION_TITLE), None);
        opts.enable(keys::SESSION_TITLE, ";");
        assert_eq!(opts.delimiter_for(keys::SESSION_TITLE), Some(";"));
        assert_eq!(opts.delimiter_for("unknown"), None);
    }

    #[test]
    fn test_spacing_in_points() {
        let s = customized();
        assert!((s.chair_options.col_spacing_pt() - 2.5 * 2.834645669).abs() < 1e-9);
        assert!((s.topic_options.vertical_spacing_pt() - 14.173228345).abs() < 1e-9);
        assert!(s.chair_options.images_active());
    }

    #[test]
    fn test_invalid_enum_rejected() {
        assert!(Settings::from_json(r#"{"chairOptions": {"mode": "stacked"}}"#).is_err());
        assert!(Settings::from_json(r#"{"topicOptions": {"units": "in"}}"#).is_err());
    }
}
