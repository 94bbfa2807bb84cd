//! Chairperson image matching and placement.
//!
//! File existence is checked through the [`ImageProbe`] trait so the core
//! stays free of filesystem I/O. Every filename tried is recorded, so a
//! failed lookup can show the user exactly what was searched.

use serde::Serialize;
use tracing::debug;

use crate::error::{FillStep, FillWarning};
use crate::host::{ElementId, PageHost};
use crate::names::{extract_clean_name, flag_variants, name_variants};
use crate::placeholders::labels;
use crate::settings::{ChairLayoutConfig, ImageFitting};

/// Extensions tried for every name variant, in order.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".tif", ".tiff", ".psd"];

/// Answers existence queries for image lookup.
pub trait ImageProbe {
    fn folder_exists(&self, folder: &str) -> bool;

    fn file_exists(&self, path: &str) -> bool;
}

/// Outcome of one variant search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameMatchResult {
    pub found: bool,
    pub file_path: String,
    pub file_name: String,
    pub search_attempts: Vec<String>,
}

/// `folder/file`, tolerating a trailing separator on `folder`.
pub fn join_path(folder: &str, file_name: &str) -> String {
    format!("{}/{}", folder.trim_end_matches(['/', '\\']), file_name)
}

/// Try every variant with every extension until one exists.
pub fn find_matching_image(variants: &[String], folder: &str, probe: &dyn ImageProbe) -> NameMatchResult {
    if folder.is_empty() || variants.is_empty() {
        return NameMatchResult::default();
    }
    if !probe.folder_exists(folder) {
        return NameMatchResult {
            search_attempts: vec![format!("Folder does not exist: {folder}")],
            ..NameMatchResult::default()
        };
    }

    let mut attempts = Vec::new();
    for variant in variants {
        for ext in SUPPORTED_EXTENSIONS {
            let file_name = format!("{variant}{ext}");
            let file_path = join_path(folder, &file_name);
            attempts.push(file_name.clone());
            if probe.file_exists(&file_path) {
                return NameMatchResult {
                    found: true,
                    file_path,
                    file_name,
                    search_attempts: attempts,
                };
            }
        }
    }

    NameMatchResult {
        search_attempts: attempts,
        ..NameMatchResult::default()
    }
}

/// What happened for one chairperson clone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChairImageOutcome {
    pub raw_name: String,
    pub clean_name: String,
    pub avatar_file: Option<String>,
    pub flag_file: Option<String>,
    pub attempts: Vec<String>,
}

impl ChairImageOutcome {
    pub fn succeeded(&self) -> bool {
        self.avatar_file.is_some() || self.flag_file.is_some()
    }

    /// `"<clean> -> <avatar>[ + <flag>]"`.
    pub fn success_message(&self) -> String {
        let mut msg = format!("{} -> ", self.clean_name);
        if let Some(avatar) = &self.avatar_file {
            msg.push_str(avatar);
        }
        if let Some(flag) = &self.flag_file {
            msg.push_str(" + ");
            msg.push_str(flag);
        }
        msg
    }
}

/// Look up and place the avatar and flag for one chair clone.
///
/// `root` is the cloned group holding the `chairAvatar`/`chairFlag`
/// frames. A flag is only searched for once the avatar is placed.
pub fn process_chair_images<P: PageHost + ?Sized>(
    page: &mut P,
    root: ElementId,
    raw_name: &str,
    options: &ChairLayoutConfig,
    probe: &dyn ImageProbe,
    warnings: &mut Vec<FillWarning>,
) -> ChairImageOutcome {
    let mut outcome = ChairImageOutcome {
        raw_name: raw_name.to_string(),
        ..ChairImageOutcome::default()
    };
    if options.image_folder.is_empty() || raw_name.is_empty() {
        return outcome;
    }

    outcome.clean_name = extract_clean_name(raw_name);
    if outcome.clean_name.is_empty() {
        outcome
            .attempts
            .push(format!("Could not extract clean name from: {raw_name}"));
        return outcome;
    }

    let avatar = find_matching_image(&name_variants(&outcome.clean_name), &options.image_folder, probe);
    outcome.attempts.extend(avatar.search_attempts.iter().cloned());
    if !avatar.found {
        return outcome;
    }
    if !place_in_frame(page, root, labels::CHAIR_AVATAR, &avatar, options.image_fitting, probe, warnings) {
        return outcome;
    }
    outcome.avatar_file = Some(avatar.file_name);

    let flag = find_matching_image(&flag_variants(&outcome.clean_name), &options.image_folder, probe);
    if flag.found && place_in_frame(page, root, labels::CHAIR_FLAG, &flag, options.image_fitting, probe, warnings) {
        outcome.flag_file = Some(flag.file_name);
    }
    outcome
}

fn place_in_frame<P: PageHost + ?Sized>(
    page: &mut P,
    root: ElementId,
    frame_label: &str,
    found: &NameMatchResult,
    fitting: ImageFitting,
    probe: &dyn ImageProbe,
    warnings: &mut Vec<FillWarning>,
) -> bool {
    let Some(frame) = page.find_descendant(root, frame_label) else {
        debug!(label = frame_label, "no image frame in chair clone");
        return false;
    };
    if !probe.file_exists(&found.file_path) {
        return false;
    }
    if let Err(e) = page.place_image(frame, &found.file_path) {
        warnings.push(FillWarning::new(frame_label, FillStep::Image, e));
        return false;
    }
    if fitting != ImageFitting::TemplateDefault {
        if let Err(e) = page.fit_image(frame, fitting) {
            warnings.push(FillWarning::new(frame_label, FillStep::ImageFitting, e));
        }
    }
    true
}

/// A chairperson whose images could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedImage {
    pub name: String,
    pub attempts: Vec<String>,
}

/// Run-scoped image accumulator.
///
/// Created by the caller before the first session, threaded through every
/// fill, and read once when the report is written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResults {
    pub enabled: bool,
    pub folder: String,
    pub successful: Vec<String>,
    pub failed: Vec<FailedImage>,
    pub total_attempted: usize,
}

impl ImageResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a session's chairpersons towards the run total.
    pub fn begin_session(&mut self, folder: &str, names: usize) {
        self.enabled = true;
        self.folder = folder.to_string();
        self.total_attempted += names;
    }

    pub fn record(&mut self, outcome: ChairImageOutcome) {
        if outcome.succeeded() {
            self.successful.push(outcome.success_message());
        } else {
            let name = if outcome.clean_name.is_empty() {
                outcome.raw_name
            } else {
                outcome.clean_name
            };
            self.failed.push(FailedImage {
                name,
                attempts: outcome.attempts,
            });
        }
    }

    pub fn missing(&self) -> usize {
        self.failed.len()
    }
}
