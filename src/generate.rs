//! The generate run: CSV in, one filled page per session out.
//!
//! # Pipeline
//!
//! ```text
//! CSV ──▶ parse_sessions ──▶ for each session:
//!                              clone template page
//!                              fill_page (placeholders, chairs, topics, images)
//!                          ──▶ document JSON ──▶ optional text report
//! ```
//!
//! An empty session list or a template without any known placeholder stops
//! the run before anything is written. A page that fails to fill is kept in
//! the document with its failure reason and the run moves on.

use anyhow::{Context, Result};
use quickgenda_core::fill::fill_page;
use quickgenda_core::images::ImageResults;
use quickgenda_core::models::Session;
use quickgenda_core::parse::{parse_sessions, ParsedCsv};
use quickgenda_core::placeholders::PlaceholderSet;
use quickgenda_core::settings::Settings;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::image_fs::FsProbe;
use crate::report::{self, ReportContext};
use crate::template::{load_template, write_document, Document, DocumentPage};

/// How one session's page turned out.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    /// 1-based session number.
    pub session: usize,
    pub title: String,
    pub topic_rows: usize,
    pub chair_clones: usize,
    /// Skipped fill steps, already formatted.
    pub warnings: Vec<String>,
    pub error: Option<String>,
}

impl SessionOutcome {
    pub fn is_clean(&self) -> bool {
        self.error.is_none() && self.warnings.is_empty()
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub sessions: Vec<Session>,
    pub outcomes: Vec<SessionOutcome>,
    pub images: ImageResults,
    pub csv_sha256: String,
    pub document: PathBuf,
    pub report: Option<PathBuf>,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_some()).count()
    }

    pub fn warnings(&self) -> usize {
        self.outcomes.iter().map(|o| o.warnings.len()).sum()
    }
}

/// Read a CSV file and return its parsed sessions and SHA-256 digest.
pub fn read_csv(path: &Path) -> Result<(ParsedCsv, String)> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = format!("{:x}", hasher.finalize());

    let raw = String::from_utf8_lossy(&bytes);
    let parsed = parse_sessions(&raw)
        .with_context(|| format!("Failed to parse CSV file: {}", path.display()))?;
    Ok((parsed, digest))
}

/// Run a full generation for `config` with `settings`.
pub fn run_generate(config: &Config, settings: &Settings) -> Result<RunSummary> {
    let (parsed, csv_sha256) = read_csv(&config.input.csv)?;
    info!(
        sessions = parsed.sessions.len(),
        delimiter = %parsed.delimiter,
        fields = ?parsed.available_fields.present(),
        "parsed agenda CSV"
    );
    if parsed.sessions.is_empty() {
        anyhow::bail!(
            "No sessions found in CSV file: {}",
            config.input.csv.display()
        );
    }

    let template = load_template(&config.template.path)?;
    let found = PlaceholderSet::resolve(&template).found();
    if found.is_empty() {
        anyhow::bail!(
            "Template has no labeled placeholders: {}. Expected labels: sessionTitle, \
             sessionTime, sessionNo, chairpersons, topicsTable",
            config.template.path.display()
        );
    }
    debug!(placeholders = ?found, "template placeholders");

    let probe = FsProbe;
    let mut images = ImageResults::new();
    let mut document = Document::new();
    let mut outcomes = Vec::with_capacity(parsed.sessions.len());

    for (i, session) in parsed.sessions.iter().enumerate() {
        let number = i + 1;
        let mut page = template.clone();
        let mut outcome = SessionOutcome {
            session: number,
            title: session.title.clone(),
            topic_rows: 0,
            chair_clones: 0,
            warnings: Vec::new(),
            error: None,
        };

        match fill_page(&mut page, session, settings, &probe, &mut images) {
            Ok(result) => {
                debug!(
                    session = number,
                    topics = result.topic_rows,
                    chair_clones = result.chair_clones,
                    layout = ?result.topic_layout,
                    "filled page"
                );
                outcome.topic_rows = result.topic_rows;
                outcome.chair_clones = result.chair_clones;
                outcome.warnings = result.warnings.iter().map(|w| w.to_string()).collect();
            }
            Err(e) => {
                warn!(session = number, title = %session.title, error = %e, "page not filled");
                outcome.error = Some(e.to_string());
                page = template.clone();
            }
        }

        document.pages.push(DocumentPage {
            session: number,
            title: session.title.clone(),
            failed: outcome.error.clone(),
            page,
        });
        outcomes.push(outcome);
    }

    write_document(&config.output.document, &document)?;
    info!(
        path = %config.output.document.display(),
        pages = document.pages.len(),
        "wrote document"
    );

    let report = match &config.output.report {
        Some(path) => {
            let ctx = ReportContext {
                csv_sha256: &csv_sha256,
                sessions: &parsed.sessions,
                document: &document,
                outcomes: &outcomes,
                images: &images,
                options: &settings.report_options,
            };
            let written = report::write_report(path, &ctx)?;
            info!(path = %written.display(), "wrote report");
            Some(written)
        }
        None => None,
    };

    Ok(RunSummary {
        sessions: parsed.sessions,
        outcomes,
        images,
        csv_sha256,
        document: config.output.document.clone(),
        report,
    })
}

/// Print a short summary of a finished run to stdout.
pub fn print_summary(summary: &RunSummary) {
    println!("Generated {} page(s).", summary.outcomes.len());
    println!("  document: {}", summary.document.display());
    if let Some(report) = &summary.report {
        println!("  report:   {}", report.display());
    }
    println!("  failed pages:  {}", summary.failed());
    println!("  skipped steps: {}", summary.warnings());
    if summary.images.enabled {
        println!(
            "  images placed: {}/{}",
            summary.images.successful.len(),
            summary.images.total_attempted
        );
    }
    for outcome in summary.outcomes.iter().filter(|o| !o.is_clean()) {
        match &outcome.error {
            Some(error) => println!("  session {}: FAILED: {}", outcome.session, error),
            None => println!(
                "  session {}: {} skipped step(s)",
                outcome.session,
                outcome.warnings.len()
            ),
        }
    }
    println!("ok");
}
