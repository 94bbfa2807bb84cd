//! Placeholder filler: writes one [`Session`] into one template page.
//!
//! # Sequence
//!
//! ```text
//! resolve placeholders ──▶ session fields ──▶ chairpersons ──▶ topics
//!                            │                  │                │
//!                            │                  ├ inline         ├ table
//!                            │                  └ grid + images  └ independent rows
//!                            └ per field: set text → paragraph style → line breaks
//! ```
//!
//! Only two conditions fail a page: no known placeholder at all, and
//! independent topic mode without the three row prototypes. Every other
//! host failure is recorded as a [`FillWarning`] and the fill continues.
//!
//! Filling is idempotent: generated clones from a previous fill are
//! removed before new ones are emitted.

use tracing::{debug, warn};

use crate::error::{FillError, FillStep, FillWarning, HostResult};
use crate::host::{ElementId, PageHost};
use crate::images::{process_chair_images, ImageProbe, ImageResults};
use crate::layout::{chair_grid_positions, topic_row_offsets};
use crate::models::{Session, Topic};
use crate::placeholders::{labels, PlaceholderSet, TopicRowFrames};
use crate::settings::{keys, ChairMode, Settings, TopicMode};
use crate::text::{apply_line_breaks, join_inline, split_chairs};

/// Column share of the frame width for Time, Topic and Speaker.
pub const TABLE_COLUMN_RATIOS: [f64; 3] = [0.20, 0.50, 0.30];

/// Header row labels in table mode.
pub const TABLE_HEADERS: [&str; 3] = ["Time", "Topic", "Speaker"];

/// Which topic layout was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicLayout {
    Table,
    IndependentGroup,
    IndependentFrames,
}

/// Outcome of a successful page fill.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillResult {
    pub placeholders: PlaceholderSet,
    /// Chair clones emitted in grid mode.
    pub chair_clones: usize,
    /// Topic rows written, excluding any header row.
    pub topic_rows: usize,
    pub topic_layout: Option<TopicLayout>,
    pub warnings: Vec<FillWarning>,
}

/// Collects degraded steps while a page is filled.
#[derive(Default)]
struct Diagnostics {
    warnings: Vec<FillWarning>,
}

impl Diagnostics {
    fn check<T>(&mut self, label: &str, step: FillStep, result: HostResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(source) => {
                warn!(label, %step, error = %source, "fill step skipped");
                self.warnings.push(FillWarning::new(label, step, source));
                None
            }
        }
    }
}

/// Fill `page` with `session`.
///
/// `images` is the run-scoped accumulator; chair image outcomes of this
/// page are appended to it.
pub fn fill_page<P: PageHost + ?Sized>(
    page: &mut P,
    session: &Session,
    settings: &Settings,
    probe: &dyn ImageProbe,
    images: &mut ImageResults,
) -> Result<FillResult, FillError> {
    let placeholders = PlaceholderSet::resolve(page);
    if placeholders.is_empty() {
        return Err(FillError::NoPlaceholdersFound);
    }
    let topic_rows = placeholders.topic_rows();
    if settings.topic_options.mode == TopicMode::Independent && topic_rows.is_none() {
        return Err(FillError::MissingTopicRowFrames);
    }

    let mut diag = Diagnostics::default();
    let mut result = FillResult {
        placeholders,
        ..FillResult::default()
    };

    let styles = &settings.styles_options.session;
    let fields = [
        (placeholders.session_title, labels::SESSION_TITLE, &session.title, &styles.title_para, keys::SESSION_TITLE),
        (placeholders.session_time, labels::SESSION_TIME, &session.time, &styles.time_para, keys::SESSION_TIME),
        (placeholders.session_no, labels::SESSION_NO, &session.no, &styles.no_para, keys::SESSION_NO),
    ];
    for (slot, label, value, style, key) in fields {
        if let Some(id) = slot.filter(|_| !value.is_empty()) {
            let line_break = settings.line_break_options.delimiter_for(key);
            write_field(page, id, label, value, style, line_break, &mut diag);
        }
    }

    if let Some(chair) = placeholders.chairpersons.filter(|_| !session.chairs.is_empty()) {
        result.chair_clones = fill_chairs(page, chair, &session.chairs, settings, probe, images, &mut diag);
    }

    match settings.topic_options.mode {
        TopicMode::Table => {
            if let Some(frame) = placeholders.topics_table {
                result.topic_rows = fill_topic_table(page, frame, &session.topics, settings, &mut diag);
                result.topic_layout = Some(TopicLayout::Table);
            }
        }
        TopicMode::Independent => {
            if let Some(frames) = topic_rows {
                let (layout, rows) = fill_topic_rows(page, frames, &session.topics, settings, &mut diag);
                result.topic_rows = rows;
                result.topic_layout = Some(layout);
            }
        }
    }

    debug!(
        title = %session.title,
        chair_clones = result.chair_clones,
        topics = result.topic_rows,
        warnings = diag.warnings.len(),
        "page filled"
    );
    result.warnings = diag.warnings;
    Ok(result)
}

/// Set text, then paragraph style, then line breaks.
fn write_field<P: PageHost + ?Sized>(
    page: &mut P,
    id: ElementId,
    label: &str,
    value: &str,
    style: &str,
    line_break: Option<&str>,
    diag: &mut Diagnostics,
) {
    if diag.check(label, FillStep::SetText, page.set_text(id, value)).is_none() {
        return;
    }
    if !style.is_empty() {
        diag.check(label, FillStep::ApplyStyle, page.apply_paragraph_style(id, style));
    }
    if let Some(delimiter) = line_break {
        let broken = page
            .text(id)
            .and_then(|text| page.set_text(id, &apply_line_breaks(&text, delimiter)));
        diag.check(label, FillStep::LineBreaks, broken);
    }
}

fn remove_clones<P: PageHost + ?Sized>(page: &mut P, clone_labels: &[&str]) {
    for label in clone_labels {
        for id in page.find_all(label) {
            // A clone nested in an already removed clone is gone with it.
            let _ = page.remove(id);
        }
    }
}

fn fill_chairs<P: PageHost + ?Sized>(
    page: &mut P,
    chair: ElementId,
    raw: &str,
    settings: &Settings,
    probe: &dyn ImageProbe,
    images: &mut ImageResults,
    diag: &mut Diagnostics,
) -> usize {
    let options = &settings.chair_options;
    let style = settings.styles_options.chair.style.as_str();
    let line_break = settings.line_break_options.delimiter_for(keys::CHAIRPERSONS);
    let label = labels::CHAIRPERSONS;

    remove_clones(page, &[labels::CHAIR_CLONE]);
    let names = split_chairs(raw);
    if options.images_active() {
        images.begin_session(&options.image_folder, names.len());
    }

    if options.mode == ChairMode::Inline {
        let content = join_inline(&names, options.inline_separator);
        let line_break = line_break.filter(|_| !content.is_empty());
        write_field(page, chair, label, &content, style, line_break, diag);
        return 0;
    }

    let Some(parent) = diag.check(label, FillStep::Layout, page.parent_group(chair)) else {
        return 0;
    };
    let root = parent.unwrap_or(chair);
    let root_is_group = parent.is_some();
    let Some(proto_bounds) = diag.check(label, FillStep::Layout, page.bounds(root)) else {
        return 0;
    };

    if root_is_group {
        diag.check(label, FillStep::Layout, page.set_visible(root, false));
    } else {
        diag.check(label, FillStep::SetText, page.set_text(chair, ""));
    }

    let positions = chair_grid_positions(names.len(), options, proto_bounds, page.page_bounds());
    let mut emitted = 0;
    for (name, target) in names.iter().zip(positions) {
        let Some(clone) = diag.check(label, FillStep::Layout, page.duplicate(root)) else {
            continue;
        };
        emitted += 1;
        diag.check(label, FillStep::Layout, page.set_label(clone, labels::CHAIR_CLONE));
        diag.check(label, FillStep::Layout, page.set_visible(clone, true));

        let text_frame = if root_is_group {
            page.find_descendant(clone, labels::CHAIRPERSONS)
        } else {
            Some(clone)
        };
        if let Some(frame) = text_frame {
            write_field(page, frame, label, name, style, line_break, diag);
        }

        if options.images_active() && root_is_group {
            let outcome = process_chair_images(page, clone, name, options, probe, &mut diag.warnings);
            images.record(outcome);
        }

        if let Some(current) = diag.check(label, FillStep::Layout, page.bounds(clone)) {
            let moved = page.move_by(clone, target.x - current.left, target.y - current.top);
            diag.check(label, FillStep::Layout, moved);
        }
    }
    emitted
}

fn fill_topic_table<P: PageHost + ?Sized>(
    page: &mut P,
    frame: ElementId,
    topics: &[Topic],
    settings: &Settings,
    diag: &mut Diagnostics,
) -> usize {
    let label = labels::TOPICS_TABLE;
    let header_rows = usize::from(settings.topic_options.include_header);

    let Some(has_table) = diag.check(label, FillStep::Table, page.has_table(frame)) else {
        return 0;
    };
    if !has_table {
        let created = page.create_table(frame, topics.len().max(1), TABLE_HEADERS.len());
        if diag.check(label, FillStep::Table, created).is_none() {
            return 0;
        }
    }

    let frame_width = page.bounds(frame).map(|b| b.width()).unwrap_or_default();
    let table_styles = &settings.styles_options.table;
    if !table_styles.table_style.is_empty() {
        let applied = page.apply_table_style(frame, &table_styles.table_style);
        diag.check(label, FillStep::ApplyStyle, applied);
    }
    if !table_styles.cell_style.is_empty() {
        let applied = page.apply_cell_style(frame, &table_styles.cell_style);
        diag.check(label, FillStep::ApplyStyle, applied);
    }

    let Some(table) = diag.check(label, FillStep::Table, page.table_mut(frame)) else {
        return 0;
    };
    let mut failures = Vec::new();

    table.set_column_count(TABLE_HEADERS.len());
    table.set_row_count(header_rows + topics.len());
    if let Err(e) = table.set_header_row_count(header_rows) {
        failures.push(e);
    }
    for (column, ratio) in TABLE_COLUMN_RATIOS.iter().enumerate() {
        if let Err(e) = table.set_column_width(column, frame_width * ratio) {
            failures.push(e);
        }
    }

    if header_rows > 0 {
        for (column, header) in TABLE_HEADERS.iter().enumerate() {
            if let Err(e) = table.set_cell(0, column, header) {
                failures.push(e);
            }
        }
    }

    let breaks = &settings.line_break_options;
    let break_keys = [keys::TOPIC_TIME, keys::TOPIC_TITLE, keys::TOPIC_SPEAKER];
    for (i, topic) in topics.iter().enumerate() {
        let values = [&topic.time, &topic.title, &topic.speaker];
        for (column, (value, key)) in values.iter().zip(break_keys).enumerate() {
            let text = match breaks.delimiter_for(key) {
                Some(delimiter) => apply_line_breaks(value, delimiter),
                None => value.to_string(),
            };
            if let Err(e) = table.set_cell(header_rows + i, column, &text) {
                failures.push(e);
            }
        }
    }

    for e in failures {
        diag.check::<()>(label, FillStep::Table, Err(e));
    }
    topics.len()
}

fn fill_topic_rows<P: PageHost + ?Sized>(
    page: &mut P,
    frames: TopicRowFrames,
    topics: &[Topic],
    settings: &Settings,
    diag: &mut Diagnostics,
) -> (TopicLayout, usize) {
    remove_clones(
        page,
        &[
            labels::TOPIC_CLONE_GROUP,
            labels::TOPIC_CLONE_TIME,
            labels::TOPIC_CLONE_TOPIC,
            labels::TOPIC_CLONE_SPEAKER,
        ],
    );

    let spacing = settings.topic_options.vertical_spacing_pt();
    let styles = &settings.styles_options.topics_independent;
    let breaks = &settings.line_break_options;
    // (prototype label, clone label, style, line-break key)
    let columns = [
        (labels::TOPIC_TIME, labels::TOPIC_CLONE_TIME, styles.time_para.as_str(), keys::TOPIC_TIME),
        (labels::TOPIC_TITLE, labels::TOPIC_CLONE_TOPIC, styles.title_para.as_str(), keys::TOPIC_TITLE),
        (labels::TOPIC_SPEAKER, labels::TOPIC_CLONE_SPEAKER, styles.speaker_para.as_str(), keys::TOPIC_SPEAKER),
    ];
    let values = |topic: &Topic| [topic.time.clone(), topic.title.clone(), topic.speaker.clone()];

    if let Some(group) = common_parent_group(page, &[frames.time, frames.title, frames.speaker]) {
        let label = labels::TOPIC_CLONE_GROUP;
        let Some(gb) = diag.check(label, FillStep::Layout, page.bounds(group)) else {
            return (TopicLayout::IndependentGroup, 0);
        };
        diag.check(label, FillStep::Layout, page.set_visible(group, false));

        let mut rows = 0;
        for (topic, y) in topics.iter().zip(topic_row_offsets(topics.len(), gb.top, gb.height(), spacing)) {
            let Some(clone) = diag.check(label, FillStep::Layout, page.duplicate(group)) else {
                continue;
            };
            rows += 1;
            diag.check(label, FillStep::Layout, page.set_label(clone, label));
            diag.check(label, FillStep::Layout, page.set_visible(clone, true));

            for ((proto_label, _, style, key), value) in columns.iter().zip(values(topic)) {
                if let Some(frame) = page.find_descendant(clone, proto_label) {
                    write_field(page, frame, proto_label, &value, style, breaks.delimiter_for(key), diag);
                }
            }

            if let Some(current) = diag.check(label, FillStep::Layout, page.bounds(clone)) {
                let moved = page.move_by(clone, gb.left - current.left, y - current.top);
                diag.check(label, FillStep::Layout, moved);
            }
        }
        return (TopicLayout::IndependentGroup, rows);
    }

    let protos = [frames.time, frames.title, frames.speaker];
    let Some(time_bounds) = diag.check(labels::TOPIC_TIME, FillStep::Layout, page.bounds(frames.time)) else {
        return (TopicLayout::IndependentFrames, 0);
    };
    for (proto, (proto_label, ..)) in protos.iter().zip(&columns) {
        diag.check(proto_label, FillStep::Layout, page.set_visible(*proto, false));
    }

    let offsets = topic_row_offsets(topics.len(), time_bounds.top, time_bounds.height(), spacing);
    let mut rows = 0;
    for (topic, y) in topics.iter().zip(offsets) {
        let mut cloned = false;
        for ((proto, (_, clone_label, style, key)), value) in protos.iter().zip(&columns).zip(values(topic)) {
            let Some(clone) = diag.check(clone_label, FillStep::Layout, page.duplicate(*proto)) else {
                continue;
            };
            cloned = true;
            diag.check(clone_label, FillStep::Layout, page.set_label(clone, clone_label));
            diag.check(clone_label, FillStep::Layout, page.set_visible(clone, true));
            write_field(page, clone, clone_label, &value, style, breaks.delimiter_for(key), diag);

            if let Some(current) = diag.check(clone_label, FillStep::Layout, page.bounds(clone)) {
                let moved = page.move_by(clone, 0.0, y - current.top);
                diag.check(clone_label, FillStep::Layout, moved);
            }
        }
        rows += usize::from(cloned);
    }
    (TopicLayout::IndependentFrames, rows)
}

/// The group shared by every frame, if they all sit directly in one.
fn common_parent_group<P: PageHost + ?Sized>(page: &P, frames: &[ElementId]) -> Option<ElementId> {
    let (first, rest) = frames.split_first()?;
    let parent = page.parent_group(*first).ok().flatten()?;
    rest.iter()
        .all(|id| page.parent_group(*id).ok().flatten() == Some(parent))
        .then_some(parent)
}
