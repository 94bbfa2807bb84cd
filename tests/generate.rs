use quickgenda::config::{load_config, load_settings};
use quickgenda::generate::run_generate;
use quickgenda::template::read_document;
use quickgenda_core::host::memory::{Element, MemoryPage};
use quickgenda_core::host::PageHost;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CSV: &str = "\
Session Title,Session Time,Session No,Chairpersons,Time,Topic Title,Speaker
Opening,09:00,S1,Dr. Jane Doe||Prof. John Roe,09:00,Welcome,A. Smith
Opening,,,,09:15,Keynote,B. Jones
Closing,17:00,S2,,17:00,Wrap-up,C. Brown
";

const TEMPLATE: &str = r#"{
  "bounds": [0, 0, 842, 595],
  "items": [
    {"type": "text", "label": "sessionTitle", "bounds": [40, 40, 80, 555], "capacity": 10},
    {"type": "text", "label": "sessionTime", "bounds": [85, 40, 100, 300]},
    {"type": "group", "children": [
      {"type": "text", "label": "chairpersons", "bounds": [110, 40, 130, 200]},
      {"type": "image", "label": "chairAvatar", "bounds": [110, 205, 130, 225]},
      {"type": "image", "label": "chairFlag", "bounds": [110, 230, 130, 250]}
    ]},
    {"type": "text", "label": "topicsTable", "bounds": [200, 40, 780, 540]}
  ]
}"#;

fn setup(extra_toml: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    fs::write(root.join("agenda.csv"), CSV).unwrap();
    fs::write(root.join("template.json"), TEMPLATE).unwrap();
    fs::create_dir(root.join("faces")).unwrap();
    fs::write(root.join("faces/jane_doe.jpg"), b"jpg").unwrap();
    fs::write(root.join("faces/flag-jane_doe.png"), b"png").unwrap();

    let config = format!(
        r#"[input]
csv = "agenda.csv"

[template]
path = "template.json"

[output]
document = "out/agenda.json"
report = "out/report"
{extra_toml}"#
    );
    let config_path = root.join("agenda.toml");
    fs::write(&config_path, config).unwrap();
    (tmp, config_path)
}

fn labelled<'a>(page: &'a MemoryPage, label: &str) -> Vec<&'a Element> {
    page.all_elements()
        .into_iter()
        .filter(|e| e.label == label)
        .collect()
}

fn run(config_path: &Path) -> quickgenda::generate::RunSummary {
    let config = load_config(config_path).unwrap();
    let settings = load_settings(&config).unwrap();
    run_generate(&config, &settings).unwrap()
}

#[test]
fn test_inline_table_run() {
    let (tmp, config_path) = setup("");
    let summary = run(&config_path);

    assert_eq!(summary.sessions.len(), 2);
    assert_eq!(summary.failed(), 0);
    assert_eq!(summary.report, Some(tmp.path().join("out/report.txt")));

    let doc = read_document(&tmp.path().join("out/agenda.json")).unwrap();
    assert_eq!(doc.pages.len(), 2);

    let first = &doc.pages[0].page;
    let title = first.find("sessionTitle").unwrap();
    assert_eq!(first.text(title).unwrap(), "Opening");
    let chairs = first.find("chairpersons").unwrap();
    assert_eq!(first.text(chairs).unwrap(), "Dr. Jane Doe, Prof. John Roe");

    let table_frame = labelled(first, "topicsTable")[0];
    let table = table_frame.table().unwrap();
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[0], vec!["Time", "Topic", "Speaker"]);
    assert_eq!(table.rows[2], vec!["09:15", "Keynote", "B. Jones"]);

    // Empty chair string leaves the prototype text untouched.
    let second = &doc.pages[1].page;
    let chairs = second.find("chairpersons").unwrap();
    assert_eq!(second.text(chairs).unwrap(), "");
    let time = second.find("sessionTime").unwrap();
    assert_eq!(second.text(time).unwrap(), "17:00");
}

#[test]
fn test_grid_with_images_and_report() {
    let (tmp, config_path) = setup(
        r#"
[settings.chairOptions]
mode = "grid"
columns = 2
rows = 1
enableImages = true
imageFolder = "faces"
imageFitting = "Fit Proportionally"
"#,
    );
    let summary = run(&config_path);

    assert!(summary.images.enabled);
    assert_eq!(summary.images.total_attempted, 2);
    assert_eq!(
        summary.images.successful,
        vec!["Jane Doe -> jane_doe.jpg + flag-jane_doe.png"]
    );
    assert_eq!(summary.images.failed.len(), 1);
    assert_eq!(summary.images.failed[0].name, "John Roe");

    let doc = read_document(&tmp.path().join("out/agenda.json")).unwrap();
    let first = &doc.pages[0].page;
    let clones = labelled(first, "chairClone");
    assert_eq!(clones.len(), 2);
    assert!(clones.iter().all(|c| c.visible));

    let placed: Vec<&str> = clones[0]
        .children()
        .iter()
        .filter_map(|c| c.placed_image())
        .map(|img| img.path.as_str())
        .collect();
    assert_eq!(placed.len(), 2);
    assert!(placed[0].ends_with("jane_doe.jpg"));
    assert!(placed[1].ends_with("flag-jane_doe.png"));

    let report = fs::read_to_string(tmp.path().join("out/report.txt")).unwrap();
    assert!(report.starts_with("AGENDA IMPORT REPORT\n"));
    assert!(report.contains("Sessions imported: 2"));
    assert!(report.contains("Successfully placed: 1/2 images"));
    assert!(report.contains("  [MISSING] John Roe"));
    assert!(report.contains("... and 38 more variations"));
    assert!(report.contains("GOOD NEWS: No overset text errors found in the document."));
}

#[test]
fn test_overset_title_is_reported() {
    let (tmp, config_path) = setup("");
    let csv = CSV.replace("Closing", "A closing session title that overflows");
    fs::write(tmp.path().join("agenda.csv"), csv).unwrap();
    run(&config_path);

    let report = fs::read_to_string(tmp.path().join("out/report.txt")).unwrap();
    assert!(report.contains("!!! ATTENTION: FOUND 1 OVERSET TEXT ERRORS !!!"));
    assert!(report.contains("  1. Page 2, sessionTitle text frame"));
}

#[test]
fn test_independent_without_row_frames_marks_pages_failed() {
    let (tmp, config_path) = setup(
        r#"
[settings.topicOptions]
mode = "independent"
"#,
    );
    let summary = run(&config_path);
    assert_eq!(summary.failed(), 2);

    let doc = read_document(&tmp.path().join("out/agenda.json")).unwrap();
    assert_eq!(doc.failed_pages(), 2);
    let failure = doc.pages[0].failed.as_deref().unwrap();
    assert!(failure.contains("topicTime"));

    // The page is left exactly as the template.
    let template = MemoryPage::from_json(TEMPLATE).unwrap();
    assert_eq!(doc.pages[0].page, template);

    let report = fs::read_to_string(tmp.path().join("out/report.txt")).unwrap();
    assert!(report.contains("  SESSION 1 (Opening): FAILED:"));
}

#[test]
fn test_header_only_csv_writes_nothing() {
    let (tmp, config_path) = setup("");
    fs::write(tmp.path().join("agenda.csv"), "Session Title,Time\n").unwrap();

    let config = load_config(&config_path).unwrap();
    let settings = load_settings(&config).unwrap();
    let err = run_generate(&config, &settings).unwrap_err();
    assert!(err.to_string().contains("No sessions found"));
    assert!(!tmp.path().join("out/agenda.json").exists());
}

#[test]
fn test_template_without_placeholders_writes_nothing() {
    let (tmp, config_path) = setup("");
    fs::write(
        tmp.path().join("template.json"),
        r#"{"bounds": [0, 0, 10, 10], "items": [{"type": "text", "label": "footer"}]}"#,
    )
    .unwrap();

    let config = load_config(&config_path).unwrap();
    let settings = load_settings(&config).unwrap();
    let err = run_generate(&config, &settings).unwrap_err();
    assert!(err.to_string().contains("no labeled placeholders"));
    assert!(!tmp.path().join("out/agenda.json").exists());
}
