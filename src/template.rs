//! Template and output document files.
//!
//! A template is a JSON description of one page (see
//! [`quickgenda_core::host::memory`]). The generated document is a JSON file
//! holding one filled copy of that page per session.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quickgenda_core::host::memory::MemoryPage;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub fn load_template(path: &Path) -> Result<MemoryPage> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template file: {}", path.display()))?;
    MemoryPage::from_json(&content)
        .with_context(|| format!("Failed to parse template file: {}", path.display()))
}

/// The generated document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub generator: String,
    pub created: DateTime<Utc>,
    pub pages: Vec<DocumentPage>,
}

/// One output page, filled from one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPage {
    /// 1-based session number.
    pub session: usize,
    pub title: String,
    /// Why the page could not be filled; the page is left as the template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<String>,
    pub page: MemoryPage,
}

impl Document {
    pub fn new() -> Self {
        Self {
            generator: format!("quickgenda {}", env!("CARGO_PKG_VERSION")),
            created: Utc::now(),
            pages: Vec::new(),
        }
    }

    pub fn failed_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.failed.is_some()).count()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `doc` as pretty JSON, creating parent directories as needed.
pub fn write_document(path: &Path, doc: &Document) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write document: {}", path.display()))?;
    Ok(())
}

pub fn read_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse document: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickgenda_core::host::PageHost;
    use quickgenda_core::layout::Bounds;
    use tempfile::TempDir;

    const TEMPLATE: &str = r#"{
        "bounds": [0, 0, 842, 595],
        "paragraphStyles": ["Title"],
        "items": [
            {"type": "text", "label": "sessionTitle", "bounds": [20, 20, 60, 575], "capacity": 40},
            {"type": "group", "children": [
                {"type": "text", "label": "chairpersons", "bounds": [80, 20, 100, 200]},
                {"type": "image", "label": "chairAvatar", "bounds": [80, 210, 100, 240]}
            ]}
        ]
    }"#;

    #[test]
    fn test_load_template() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("template.json");
        std::fs::write(&path, TEMPLATE).unwrap();
        let page = load_template(&path).unwrap();
        assert_eq!(page.page_bounds(), Bounds::new(0.0, 0.0, 842.0, 595.0));
        assert!(page.find("sessionTitle").is_some());
        assert!(page.find("chairAvatar").is_some());
    }

    #[test]
    fn test_load_template_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "{").unwrap();
        let err = load_template(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_document_written_and_read_back() {
        let tmp = TempDir::new().unwrap();
        let page = MemoryPage::from_json(TEMPLATE).unwrap();
        let mut doc = Document::new();
        doc.pages.push(DocumentPage {
            session: 1,
            title: "Opening".into(),
            failed: None,
            page: page.clone(),
        });
        doc.pages.push(DocumentPage {
            session: 2,
            title: "Broken".into(),
            failed: Some("no placeholders".into()),
            page,
        });

        let path = tmp.path().join("nested/out/agenda.json");
        write_document(&path, &doc).unwrap();
        let back = read_document(&path).unwrap();
        assert_eq!(back.pages.len(), 2);
        assert_eq!(back.failed_pages(), 1);
        assert_eq!(back.pages[0].page, doc.pages[0].page);
        assert!(back.generator.starts_with("quickgenda "));
    }
}
