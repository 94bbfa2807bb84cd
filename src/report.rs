//! Plain-text import report.
//!
//! Sections, in order: header, overset check, image placement, fill
//! diagnostics, sessions. The overset, image and sessions sections are
//! switched by [`ReportOptions`]; the image section also requires image
//! automation to have run.

use anyhow::{Context, Result};
use quickgenda_core::host::PageHost;
use quickgenda_core::images::ImageResults;
use quickgenda_core::models::Session;
use quickgenda_core::settings::ReportOptions;
use std::path::{Path, PathBuf};

use crate::generate::SessionOutcome;
use crate::template::Document;

/// Failed image entries list at most this many attempted filenames.
const MAX_LISTED_ATTEMPTS: usize = 10;

const RULE: &str = "=========================";

/// Inputs for one report.
pub struct ReportContext<'a> {
    pub csv_sha256: &'a str,
    pub sessions: &'a [Session],
    pub document: &'a Document,
    pub outcomes: &'a [SessionOutcome],
    pub images: &'a ImageResults,
    pub options: &'a ReportOptions,
}

/// A text frame whose content does not fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OversetFrame {
    pub page: usize,
    pub label: String,
}

impl OversetFrame {
    pub fn location(&self) -> String {
        format!("Page {}, {} text frame", self.page, self.label)
    }
}

/// Every overset text frame in `doc`, page by page in document order.
pub fn find_overset(doc: &Document) -> Vec<OversetFrame> {
    let mut found = Vec::new();
    for (i, entry) in doc.pages.iter().enumerate() {
        let page = &entry.page;
        for id in page.text_frames() {
            if !matches!(page.is_overset(id), Ok(true)) {
                continue;
            }
            let label = page
                .label(id)
                .ok()
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| "Unlabeled".to_string());
            found.push(OversetFrame { page: i + 1, label });
        }
    }
    found
}

/// Render the report text.
pub fn render(ctx: &ReportContext<'_>) -> String {
    let mut out: Vec<String> = Vec::new();

    out.push("AGENDA IMPORT REPORT".into());
    out.push("====================".into());
    out.push(format!(
        "Date: {}",
        ctx.document.created.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push(format!("Sessions imported: {}", ctx.sessions.len()));
    out.push(format!("CSV SHA-256: {}", ctx.csv_sha256));
    out.push(String::new());

    if ctx.options.include_overset {
        overset_section(ctx, &mut out);
    }
    if ctx.options.include_images && ctx.images.enabled {
        image_section(ctx.images, &mut out);
    }
    diagnostics_section(ctx.outcomes, &mut out);
    if ctx.options.include_counts {
        sessions_section(ctx.sessions, &mut out);
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn overset_section(ctx: &ReportContext<'_>, out: &mut Vec<String>) {
    let overset = find_overset(ctx.document);

    out.push("*** OVERSET TEXT CHECK ***".into());
    out.push(RULE.into());
    out.push(format!("Document has {} pages", ctx.document.pages.len()));
    out.push("Checked all text frames for overflow".into());
    out.push(String::new());

    if overset.is_empty() {
        out.push("GOOD NEWS: No overset text errors found in the document.".into());
    } else {
        out.push(format!(
            "!!! ATTENTION: FOUND {} OVERSET TEXT ERRORS !!!",
            overset.len()
        ));
        out.push("The following text frames have overset text that is not visible:".into());
        for (i, frame) in overset.iter().enumerate() {
            out.push(format!("  {}. {}", i + 1, frame.location()));
        }
    }
    out.push(String::new());
    out.push(RULE.into());
    out.push(String::new());
}

fn image_section(images: &ImageResults, out: &mut Vec<String>) {
    out.push("IMAGE PLACEMENT REPORT:".into());
    out.push("======================".into());
    out.push(format!("Image folder: {}", images.folder));
    out.push(format!("Total chairpersons processed: {}", images.total_attempted));
    out.push(format!(
        "Successfully placed: {}/{} images",
        images.successful.len(),
        images.total_attempted
    ));
    out.push(format!(
        "Missing images: {}/{}",
        images.missing(),
        images.total_attempted
    ));
    out.push(String::new());

    if !images.successful.is_empty() {
        out.push("SUCCESSFUL PLACEMENTS:".into());
        for placed in &images.successful {
            out.push(format!("  [SUCCESS] {}", placed));
        }
        out.push(String::new());
    }

    if !images.failed.is_empty() {
        out.push("MISSING IMAGES:".into());
        for failed in &images.failed {
            out.push(format!("  [MISSING] {}", failed.name));
            if failed.attempts.is_empty() {
                continue;
            }
            let shown: Vec<&str> = failed
                .attempts
                .iter()
                .take(MAX_LISTED_ATTEMPTS)
                .map(String::as_str)
                .collect();
            out.push(format!("    Searched for: {}", shown.join(", ")));
            if failed.attempts.len() > MAX_LISTED_ATTEMPTS {
                out.push(format!(
                    "    ... and {} more variations",
                    failed.attempts.len() - MAX_LISTED_ATTEMPTS
                ));
            }
        }
        out.push(String::new());
    }

    out.push(RULE.into());
    out.push(String::new());
}

fn diagnostics_section(outcomes: &[SessionOutcome], out: &mut Vec<String>) {
    out.push("FILL DIAGNOSTICS:".into());
    out.push(RULE.into());

    let troubled: Vec<&SessionOutcome> = outcomes.iter().filter(|o| !o.is_clean()).collect();
    if troubled.is_empty() {
        out.push("All pages filled without problems.".into());
    }
    for outcome in troubled {
        match &outcome.error {
            Some(error) => out.push(format!(
                "  SESSION {} ({}): FAILED: {}",
                outcome.session,
                or_none(&outcome.title),
                error
            )),
            None => {
                out.push(format!(
                    "  SESSION {} ({}): {} skipped step(s)",
                    outcome.session,
                    or_none(&outcome.title),
                    outcome.warnings.len()
                ));
                for warning in &outcome.warnings {
                    out.push(format!("    - {}", warning));
                }
            }
        }
    }
    out.push(String::new());
    out.push(RULE.into());
    out.push(String::new());
}

fn sessions_section(sessions: &[Session], out: &mut Vec<String>) {
    out.push("SESSIONS REPORT:".into());
    out.push(RULE.into());
    out.push(String::new());

    for (i, session) in sessions.iter().enumerate() {
        out.push(format!("SESSION {}:", i + 1));
        out.push(format!("  Title: {}", or_none(&session.title)));
        out.push(format!("  Time: {}", or_none(&session.time)));
        out.push(format!("  Session No: {}", or_none(&session.no)));
        out.push(format!("  Chairpersons: {}", or_none(&session.chairs)));
        out.push(format!("  Topics: {}", session.topics.len()));

        for (j, topic) in session.topics.iter().enumerate() {
            let title = if topic.title.is_empty() {
                "[No title]"
            } else {
                &topic.title
            };
            out.push(format!("    {}. {}", j + 1, title));
            out.push(format!("       Time: {}", or_none(&topic.time)));
            out.push(format!("       Speaker: {}", or_none(&topic.speaker)));
        }
        out.push(String::new());
    }
}

fn or_none(value: &str) -> &str {
    if value.is_empty() {
        "[None]"
    } else {
        value
    }
}

/// `path` with `.txt` appended unless it already ends in `.txt` (any case).
pub fn with_txt_extension(path: &Path) -> PathBuf {
    let has_txt = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
    if has_txt {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_owned();
    name.push(".txt");
    PathBuf::from(name)
}

/// Render and write the report. Returns the path actually written.
pub fn write_report(path: &Path, ctx: &ReportContext<'_>) -> Result<PathBuf> {
    let path = with_txt_extension(path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
    }
    std::fs::write(&path, render(ctx))
        .with_context(|| format!("Failed to write report file: {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::DocumentPage;
    use quickgenda_core::host::memory::{Element, MemoryPage};
    use quickgenda_core::images::FailedImage;
    use quickgenda_core::layout::Bounds;
    use quickgenda_core::models::Topic;

    fn frame() -> Bounds {
        Bounds::new(0.0, 0.0, 10.0, 100.0)
    }

    fn document() -> Document {
        let mut fits = MemoryPage::new(frame());
        fits.push(Element::text("sessionTitle", frame()).with_capacity(20).with_text("Short"));

        let mut overflows = MemoryPage::new(frame());
        overflows.push(
            Element::text("sessionTitle", frame())
                .with_capacity(5)
                .with_text("Far too long for the frame"),
        );
        overflows.push(Element::text("", frame()).with_capacity(1).with_text("xx"));

        let mut doc = Document::new();
        for (i, page) in [fits, overflows].into_iter().enumerate() {
            doc.pages.push(DocumentPage {
                session: i + 1,
                title: format!("S{}", i + 1),
                failed: None,
                page,
            });
        }
        doc
    }

    fn sessions() -> Vec<Session> {
        vec![
            Session {
                title: "Opening".into(),
                time: "09:00".into(),
                chairs: "Dr. Jane Doe".into(),
                topics: vec![
                    Topic {
                        time: "09:00".into(),
                        title: "Welcome".into(),
                        speaker: String::new(),
                    },
                    Topic {
                        time: "09:15".into(),
                        title: String::new(),
                        speaker: "A. Smith".into(),
                    },
                ],
                ..Session::default()
            },
            Session {
                title: "Closing".into(),
                ..Session::default()
            },
        ]
    }

    fn images() -> ImageResults {
        ImageResults {
            enabled: true,
            folder: "/img".into(),
            successful: vec!["Jane Doe -> Jane_Doe.jpg".into()],
            failed: vec![FailedImage {
                name: "John Roe".into(),
                attempts: (0..12).map(|i| format!("variant{}.jpg", i)).collect(),
            }],
            total_attempted: 2,
        }
    }

    fn render_with(options: ReportOptions, outcomes: &[SessionOutcome]) -> String {
        let doc = document();
        let sessions = sessions();
        let images = images();
        render(&ReportContext {
            csv_sha256: "abc123",
            sessions: &sessions,
            document: &doc,
            outcomes,
            images: &images,
            options: &options,
        })
    }

    #[test]
    fn test_full_report_sections_in_order() {
        let text = render_with(ReportOptions::default(), &[]);
        let order = [
            "AGENDA IMPORT REPORT",
            "Sessions imported: 2",
            "CSV SHA-256: abc123",
            "*** OVERSET TEXT CHECK ***",
            "IMAGE PLACEMENT REPORT:",
            "FILL DIAGNOSTICS:",
            "SESSIONS REPORT:",
        ];
        let mut last = 0;
        for heading in order {
            let pos = text.find(heading).unwrap_or_else(|| panic!("missing {}", heading));
            assert!(pos >= last, "{} out of order", heading);
            last = pos;
        }
    }

    #[test]
    fn test_overset_frames_listed_with_locations() {
        let text = render_with(ReportOptions::default(), &[]);
        assert!(text.contains("!!! ATTENTION: FOUND 2 OVERSET TEXT ERRORS !!!"));
        assert!(text.contains("  1. Page 2, sessionTitle text frame"));
        assert!(text.contains("  2. Page 2, Unlabeled text frame"));
    }

    #[test]
    fn test_no_overset_good_news() {
        let mut doc = document();
        doc.pages.truncate(1);
        assert!(find_overset(&doc).is_empty());
        let sessions = sessions();
        let images = ImageResults::new();
        let text = render(&ReportContext {
            csv_sha256: "",
            sessions: &sessions,
            document: &doc,
            outcomes: &[],
            images: &images,
            options: &ReportOptions::default(),
        });
        assert!(text.contains("GOOD NEWS: No overset text errors found in the document."));
        assert!(!text.contains("IMAGE PLACEMENT REPORT:"));
    }

    #[test]
    fn test_image_section_truncates_attempts() {
        let text = render_with(ReportOptions::default(), &[]);
        assert!(text.contains("Image folder: /img"));
        assert!(text.contains("Successfully placed: 1/2 images"));
        assert!(text.contains("Missing images: 1/2"));
        assert!(text.contains("  [SUCCESS] Jane Doe -> Jane_Doe.jpg"));
        assert!(text.contains("  [MISSING] John Roe"));
        assert!(text.contains("variant9.jpg"));
        assert!(!text.contains("variant10.jpg"));
        assert!(text.contains("    ... and 2 more variations"));
    }

    #[test]
    fn test_sessions_section_placeholders() {
        let text = render_with(ReportOptions::default(), &[]);
        assert!(text.contains("SESSION 1:\n  Title: Opening\n  Time: 09:00\n  Session No: [None]"));
        assert!(text.contains("  Chairpersons: Dr. Jane Doe"));
        assert!(text.contains("  Topics: 2"));
        assert!(text.contains("    1. Welcome\n       Time: 09:00\n       Speaker: [None]"));
        assert!(text.contains("    2. [No title]"));
        assert!(text.contains("SESSION 2:\n  Title: Closing"));
        assert!(text.contains("  Topics: 0"));
    }

    #[test]
    fn test_sections_switched_off() {
        let options = ReportOptions {
            include_images: false,
            include_overset: false,
            include_counts: false,
        };
        let text = render_with(options, &[]);
        assert!(!text.contains("OVERSET TEXT CHECK"));
        assert!(!text.contains("IMAGE PLACEMENT REPORT:"));
        assert!(!text.contains("SESSIONS REPORT:"));
        assert!(text.contains("FILL DIAGNOSTICS:"));
    }

    #[test]
    fn test_diagnostics_list_failures_and_warnings() {
        let outcomes = vec![
            SessionOutcome {
                session: 1,
                title: "Opening".into(),
                topic_rows: 2,
                chair_clones: 0,
                warnings: vec!["apply style on 'sessionTitle' skipped: unknown".into()],
                error: None,
            },
            SessionOutcome {
                session: 2,
                title: String::new(),
                topic_rows: 0,
                chair_clones: 0,
                warnings: Vec::new(),
                error: Some("no frames".into()),
            },
        ];
        let text = render_with(ReportOptions::default(), &outcomes);
        assert!(text.contains("  SESSION 1 (Opening): 1 skipped step(s)"));
        assert!(text.contains("    - apply style on 'sessionTitle' skipped: unknown"));
        assert!(text.contains("  SESSION 2 ([None]): FAILED: no frames"));
        assert!(!text.contains("All pages filled without problems."));
    }

    #[test]
    fn test_txt_extension() {
        assert_eq!(with_txt_extension(Path::new("out/report")), PathBuf::from("out/report.txt"));
        assert_eq!(with_txt_extension(Path::new("out/report.TXT")), PathBuf::from("out/report.TXT"));
        assert_eq!(with_txt_extension(Path::new("report.log")), PathBuf::from("report.log.txt"));
    }
}
