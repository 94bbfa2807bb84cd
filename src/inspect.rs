//! `agenda inspect`: what the configured CSV and template offer.

use anyhow::Result;
use quickgenda_core::analysis::{analyze_template, TemplateAnalysis};
use quickgenda_core::models::AvailableFields;
use quickgenda_core::parse::Delimiter;
use quickgenda_core::settings::Settings;
use std::path::Path;

use crate::config::Config;
use crate::generate::read_csv;
use crate::image_fs::count_images;
use crate::template::load_template;

/// Combined CSV and template overview.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub sessions: usize,
    pub topics: usize,
    pub delimiter: Delimiter,
    pub fields: AvailableFields,
    pub csv_sha256: String,
    pub template: TemplateAnalysis,
    /// Candidate image files, when image automation is configured.
    pub image_files: Option<usize>,
}

pub fn inspect(config: &Config, settings: &Settings) -> Result<Inspection> {
    let (parsed, csv_sha256) = read_csv(&config.input.csv)?;
    let page = load_template(&config.template.path)?;

    let image_files = settings
        .chair_options
        .images_active()
        .then(|| count_images(Path::new(&settings.chair_options.image_folder)));

    Ok(Inspection {
        sessions: parsed.sessions.len(),
        topics: parsed.sessions.iter().map(|s| s.topics.len()).sum(),
        delimiter: parsed.delimiter,
        fields: parsed.available_fields,
        csv_sha256,
        template: analyze_template(&page),
        image_files,
    })
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

pub fn print_inspection(report: &Inspection) {
    println!("CSV");
    println!("  sessions:  {}", report.sessions);
    println!("  topics:    {}", report.topics);
    println!("  delimiter: {}", report.delimiter);
    println!("  sha256:    {}", report.csv_sha256);
    println!("  fields:");
    for (name, present) in report.fields.to_map() {
        println!("    {:<14} {}", name, yes_no(present));
    }

    let t = &report.template;
    println!();
    println!("Template");
    if t.placeholders.is_empty() {
        println!("  placeholders: (none)");
    } else {
        println!("  placeholders: {}", t.placeholders.join(", "));
    }
    println!("  table layout:       {}", yes_no(t.supports_table));
    println!("  independent layout: {}", yes_no(t.supports_independent));
    println!("  image automation:   {}", yes_no(t.image_automation_available));
    println!("  compatibility:      {}", t.compatibility);
    println!(
        "  suggested:          topics {:?}, chairs {:?}",
        t.suggested.topic_mode, t.suggested.chair_mode
    );

    if let Some(count) = report.image_files {
        println!();
        println!("Images");
        println!("  candidate files: {}", count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use quickgenda_core::analysis::Compatibility;
    use quickgenda_core::settings::TopicMode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_inspect_reports_csv_and_template() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("agenda.csv"),
            "Session Title;Topic Title\nA;one\nA;two\nB;three\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("template.json"),
            r#"{"bounds": [0, 0, 100, 100], "items": [
                {"type": "text", "label": "topicTime", "bounds": [0, 0, 10, 10]},
                {"type": "text", "label": "topicTitle", "bounds": [0, 10, 10, 20]},
                {"type": "text", "label": "topicSpeaker", "bounds": [0, 20, 10, 30]}
            ]}"#,
        )
        .unwrap();
        fs::create_dir(tmp.path().join("faces")).unwrap();
        fs::write(tmp.path().join("faces/Jane_Doe.png"), b"").unwrap();
        fs::write(
            tmp.path().join("agenda.toml"),
            "[input]\ncsv = \"agenda.csv\"\n[template]\npath = \"template.json\"\n\
             [output]\ndocument = \"out.json\"\n\
             [settings.chairOptions]\nenableImages = true\nimageFolder = \"faces\"\n",
        )
        .unwrap();

        let config = load_config(&tmp.path().join("agenda.toml")).unwrap();
        let settings = crate::config::load_settings(&config).unwrap();
        let report = inspect(&config, &settings).unwrap();

        assert_eq!(report.sessions, 2);
        assert_eq!(report.topics, 3);
        assert_eq!(report.delimiter, Delimiter::Semicolon);
        assert!(report.template.supports_independent);
        assert_eq!(report.template.compatibility, Compatibility::Good);
        assert_eq!(report.template.suggested.topic_mode, TopicMode::Independent);
        assert_eq!(report.image_files, Some(1));
    }
}
