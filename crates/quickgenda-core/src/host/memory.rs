//! In-memory [`PageHost`] implementation.
//!
//! A page is a tree of [`Element`]s. Templates are loaded from JSON and
//! generated pages serialize back to the same shape:
//!
//! ```json
//! {
//!   "bounds": [0, 0, 842, 595],
//!   "paragraphStyles": ["Title"],
//!   "items": [
//!     { "type": "text", "label": "sessionTitle", "bounds": [40, 40, 80, 555], "capacity": 60 },
//!     { "type": "group", "label": "", "children": [
//!         { "type": "text", "label": "chairpersons", "bounds": [100, 40, 120, 200] },
//!         { "type": "image", "label": "chairAvatar", "bounds": [100, 205, 120, 225] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Element ids are assigned on load in document order and are not part of
//! the JSON.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{HostError, HostResult};
use crate::layout::Bounds;
use crate::settings::ImageFitting;

use super::{ElementId, ElementKind, PageHost, TableHost};

/// One page item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(skip)]
    pub id: ElementId,
    #[serde(default)]
    pub label: String,
    /// Stored bounds. Groups report the union of their children instead.
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(flatten)]
    pub content: Content,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text {
        #[serde(default)]
        text: String,
        #[serde(
            default,
            rename = "paragraphStyle",
            skip_serializing_if = "Option::is_none"
        )]
        paragraph_style: Option<String>,
        /// Characters the frame can show before it oversets.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        capacity: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        table: Option<MemoryTable>,
    },
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image: Option<PlacedImage>,
    },
    Group {
        #[serde(default)]
        children: Vec<Element>,
    },
}

/// An image placed into a graphic frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedImage {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitting: Option<ImageFitting>,
}

impl Element {
    pub fn text(label: &str, bounds: Bounds) -> Self {
        Self::new(
            label,
            bounds,
            Content::Text {
                text: String::new(),
                paragraph_style: None,
                capacity: None,
                table: None,
            },
        )
    }

    pub fn image(label: &str, bounds: Bounds) -> Self {
        Self::new(label, bounds, Content::Image { image: None })
    }

    pub fn group(label: &str, children: Vec<Element>) -> Self {
        Self::new(label, Bounds::default(), Content::Group { children })
    }

    /// Set the overset capacity of a text frame. No-op for other kinds.
    pub fn with_capacity(mut self, chars: usize) -> Self {
        if let Content::Text { capacity, .. } = &mut self.content {
            *capacity = Some(chars);
        }
        self
    }

    pub fn with_text(mut self, value: &str) -> Self {
        if let Content::Text { text, .. } = &mut self.content {
            *text = value.to_string();
        }
        self
    }

    fn new(label: &str, bounds: Bounds, content: Content) -> Self {
        Self {
            id: ElementId::default(),
            label: label.to_string(),
            bounds,
            visible: true,
            content,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self.content {
            Content::Text { .. } => ElementKind::Text,
            Content::Image { .. } => ElementKind::Image,
            Content::Group { .. } => ElementKind::Group,
        }
    }

    pub fn children(&self) -> &[Element] {
        match &self.content {
            Content::Group { children } => children.as_slice(),
            _ => &[],
        }
    }

    /// Effective bounds: groups span their children.
    pub fn effective_bounds(&self) -> Bounds {
        let children = self.children();
        match children.split_first() {
            Some((first, rest)) => rest
                .iter()
                .fold(first.effective_bounds(), |acc, c| acc.union(&c.effective_bounds())),
            None => self.bounds,
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            Content::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn table(&self) -> Option<&MemoryTable> {
        match &self.content {
            Content::Text { table, .. } => table.as_ref(),
            _ => None,
        }
    }

    pub fn placed_image(&self) -> Option<&PlacedImage> {
        match &self.content {
            Content::Image { image } => image.as_ref(),
            _ => None,
        }
    }

    pub fn paragraph_style(&self) -> Option<&str> {
        match &self.content {
            Content::Text {
                paragraph_style, ..
            } => paragraph_style.as_deref(),
            _ => None,
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.bounds = self.bounds.translated(dx, dy);
        if let Content::Group { children } = &mut self.content {
            for child in children {
                child.translate(dx, dy);
            }
        }
    }

    fn renumber(&mut self, next_id: &mut u32) {
        *next_id += 1;
        self.id = ElementId(*next_id);
        if let Content::Group { children } = &mut self.content {
            for child in children {
                child.renumber(next_id);
            }
        }
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Element>) {
        out.push(self);
        for child in self.children() {
            child.collect(out);
        }
    }
}

/// A table inside a text frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryTable {
    pub columns: usize,
    #[serde(default)]
    pub header_rows: usize,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    #[serde(default)]
    pub column_widths: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_style: Option<String>,
}

impl MemoryTable {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            columns,
            header_rows: 0,
            rows: vec![vec![String::new(); columns]; rows],
            column_widths: vec![0.0; columns],
            table_style: None,
            cell_style: None,
        }
    }
}

impl TableHost for MemoryTable {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.columns
    }

    fn set_row_count(&mut self, rows: usize) {
        let columns = self.columns;
        self.rows.resize_with(rows, || vec![String::new(); columns]);
        self.header_rows = self.header_rows.min(rows);
    }

    fn set_column_count(&mut self, columns: usize) {
        self.columns = columns;
        for row in &mut self.rows {
            row.resize(columns, String::new());
        }
        self.column_widths.resize(columns, 0.0);
    }

    fn header_row_count(&self) -> usize {
        self.header_rows
    }

    fn set_header_row_count(&mut self, rows: usize) -> HostResult<()> {
        if rows > self.rows.len() {
            return Err(HostError::Other(format!(
                "cannot mark {rows} header rows in a table of {} rows",
                self.rows.len()
            )));
        }
        self.header_rows = rows;
        Ok(())
    }

    fn cell(&self, row: usize, column: usize) -> HostResult<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .ok_or(HostError::CellOutOfRange { row, column })
    }

    fn set_cell(&mut self, row: usize, column: usize, text: &str) -> HostResult<()> {
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(column))
            .ok_or(HostError::CellOutOfRange { row, column })?;
        *cell = text.to_string();
        Ok(())
    }

    fn set_column_width(&mut self, column: usize, width: f64) -> HostResult<()> {
        let slot = self
            .column_widths
            .get_mut(column)
            .ok_or(HostError::CellOutOfRange { row: 0, column })?;
        *slot = width;
        Ok(())
    }
}

/// Serialized page shape; ids are assigned when converting.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageData {
    bounds: Bounds,
    #[serde(default)]
    paragraph_styles: BTreeSet<String>,
    #[serde(default)]
    table_styles: BTreeSet<String>,
    #[serde(default)]
    cell_styles: BTreeSet<String>,
    #[serde(default)]
    items: Vec<Element>,
}

impl From<PageData> for MemoryPage {
    fn from(data: PageData) -> Self {
        let mut page = MemoryPage {
            bounds: data.bounds,
            paragraph_styles: data.paragraph_styles,
            table_styles: data.table_styles,
            cell_styles: data.cell_styles,
            items: data.items,
            next_id: 0,
        };
        for item in &mut page.items {
            item.renumber(&mut page.next_id);
        }
        page
    }
}

/// An in-memory page and its style catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PageData")]
pub struct MemoryPage {
    pub bounds: Bounds,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub paragraph_styles: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub table_styles: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub cell_styles: BTreeSet<String>,
    items: Vec<Element>,
    #[serde(skip)]
    next_id: u32,
}

impl MemoryPage {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            paragraph_styles: BTreeSet::new(),
            table_styles: BTreeSet::new(),
            cell_styles: BTreeSet::new(),
            items: Vec::new(),
            next_id: 0,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Append `element` to the top level and return its id.
    pub fn push(&mut self, mut element: Element) -> ElementId {
        element.renumber(&mut self.next_id);
        let id = element.id;
        self.items.push(element);
        id
    }

    pub fn items(&self) -> &[Element] {
        &self.items
    }

    /// Every element in document order, groups before their children.
    pub fn all_elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        for item in &self.items {
            item.collect(&mut out);
        }
        out
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.all_elements().into_iter().find(|e| e.id == id)
    }

    fn get(&self, id: ElementId) -> HostResult<&Element> {
        self.element(id).ok_or(HostError::UnknownElement(id))
    }

    fn get_mut(&mut self, id: ElementId) -> HostResult<&mut Element> {
        find_mut(&mut self.items, id).ok_or(HostError::UnknownElement(id))
    }
}

fn find_mut(items: &mut [Element], id: ElementId) -> Option<&mut Element> {
    for item in items.iter_mut() {
        if item.id == id {
            return Some(item);
        }
        if let Content::Group { children } = &mut item.content {
            if let Some(found) = find_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn remove_from(items: &mut Vec<Element>, id: ElementId) -> Option<Element> {
    if let Some(pos) = items.iter().position(|e| e.id == id) {
        return Some(items.remove(pos));
    }
    for item in items.iter_mut() {
        if let Content::Group { children } = &mut item.content {
            if let Some(removed) = remove_from(children, id) {
                return Some(removed);
            }
        }
    }
    None
}

/// `Some(parent)` if `id` is found under `items`.
fn parent_of(items: &[Element], id: ElementId, parent: Option<ElementId>) -> Option<Option<ElementId>> {
    for item in items {
        if item.id == id {
            return Some(parent);
        }
        if let Some(found) = parent_of(item.children(), id, Some(item.id)) {
            return Some(found);
        }
    }
    None
}

impl PageHost for MemoryPage {
    fn page_bounds(&self) -> Bounds {
        self.bounds
    }

    fn find_all(&self, label: &str) -> Vec<ElementId> {
        self.all_elements()
            .into_iter()
            .filter(|e| e.label == label)
            .map(|e| e.id)
            .collect()
    }

    fn find_descendant(&self, root: ElementId, label: &str) -> Option<ElementId> {
        let root = self.element(root)?;
        let mut subtree = Vec::new();
        for child in root.children() {
            child.collect(&mut subtree);
        }
        subtree.into_iter().find(|e| e.label == label).map(|e| e.id)
    }

    fn text_frames(&self) -> Vec<ElementId> {
        self.all_elements()
            .into_iter()
            .filter(|e| e.kind() == ElementKind::Text)
            .map(|e| e.id)
            .collect()
    }

    fn kind(&self, id: ElementId) -> HostResult<ElementKind> {
        Ok(self.get(id)?.kind())
    }

    fn label(&self, id: ElementId) -> HostResult<String> {
        Ok(self.get(id)?.label.clone())
    }

    fn set_label(&mut self, id: ElementId, label: &str) -> HostResult<()> {
        self.get_mut(id)?.label = label.to_string();
        Ok(())
    }

    fn parent_group(&self, id: ElementId) -> HostResult<Option<ElementId>> {
        parent_of(&self.items, id, None).ok_or(HostError::UnknownElement(id))
    }

    fn bounds(&self, id: ElementId) -> HostResult<Bounds> {
        Ok(self.get(id)?.effective_bounds())
    }

    fn duplicate(&mut self, id: ElementId) -> HostResult<ElementId> {
        let copy = self.get(id)?.clone();
        Ok(self.push(copy))
    }

    fn move_by(&mut self, id: ElementId, dx: f64, dy: f64) -> HostResult<()> {
        self.get_mut(id)?.translate(dx, dy);
        Ok(())
    }

    fn set_visible(&mut self, id: ElementId, visible: bool) -> HostResult<()> {
        self.get_mut(id)?.visible = visible;
        Ok(())
    }

    fn is_visible(&self, id: ElementId) -> HostResult<bool> {
        Ok(self.get(id)?.visible)
    }

    fn remove(&mut self, id: ElementId) -> HostResult<()> {
        remove_from(&mut self.items, id)
            .map(|_| ())
            .ok_or(HostError::UnknownElement(id))
    }

    fn text(&self, id: ElementId) -> HostResult<String> {
        self.get(id)?
            .text_content()
            .map(str::to_string)
            .ok_or(HostError::NotText(id))
    }

    fn set_text(&mut self, id: ElementId, value: &str) -> HostResult<()> {
        match &mut self.get_mut(id)?.content {
            Content::Text { text, .. } => {
                *text = value.to_string();
                Ok(())
            }
            _ => Err(HostError::NotText(id)),
        }
    }

    fn apply_paragraph_style(&mut self, id: ElementId, style: &str) -> HostResult<()> {
        if !self.paragraph_styles.contains(style) {
            return Err(HostError::UnknownStyle(style.to_string()));
        }
        match &mut self.get_mut(id)?.content {
            Content::Text {
                paragraph_style, ..
            } => {
                *paragraph_style = Some(style.to_string());
                Ok(())
            }
            _ => Err(HostError::NotText(id)),
        }
    }

    fn place_image(&mut self, frame: ElementId, path: &str) -> HostResult<()> {
        match &mut self.get_mut(frame)?.content {
            Content::Image { image } => {
                *image = Some(PlacedImage {
                    path: path.to_string(),
                    fitting: None,
                });
                Ok(())
            }
            _ => Err(HostError::NotImageFrame(frame)),
        }
    }

    fn fit_image(&mut self, frame: ElementId, fitting: ImageFitting) -> HostResult<()> {
        match &mut self.get_mut(frame)?.content {
            Content::Image { image: Some(placed) } => {
                placed.fitting = Some(fitting);
                Ok(())
            }
            Content::Image { image: None } => Err(HostError::Other(format!(
                "frame {frame} holds no placed graphic"
            ))),
            _ => Err(HostError::NotImageFrame(frame)),
        }
    }

    fn has_table(&self, frame: ElementId) -> HostResult<bool> {
        match &self.get(frame)?.content {
            Content::Text { table, .. } => Ok(table.is_some()),
            _ => Err(HostError::NotTableFrame(frame)),
        }
    }

    fn create_table(&mut self, frame: ElementId, rows: usize, columns: usize) -> HostResult<()> {
        match &mut self.get_mut(frame)?.content {
            Content::Text { text, table, .. } => {
                text.clear();
                *table = Some(MemoryTable::new(rows, columns));
                Ok(())
            }
            _ => Err(HostError::NotTableFrame(frame)),
        }
    }

    fn table_mut(&mut self, frame: ElementId) -> HostResult<&mut dyn TableHost> {
        match &mut self.get_mut(frame)?.content {
            Content::Text {
                table: Some(table), ..
            } => Ok(table as &mut dyn TableHost),
            _ => Err(HostError::NotTableFrame(frame)),
        }
    }

    fn apply_table_style(&mut self, frame: ElementId, style: &str) -> HostResult<()> {
        if !self.table_styles.contains(style) {
            return Err(HostError::UnknownStyle(style.to_string()));
        }
        let table = memory_table_mut(self, frame)?;
        table.table_style = Some(style.to_string());
        Ok(())
    }

    fn apply_cell_style(&mut self, frame: ElementId, style: &str) -> HostResult<()> {
        if !self.cell_styles.contains(style) {
            return Err(HostError::UnknownStyle(style.to_string()));
        }
        let table = memory_table_mut(self, frame)?;
        table.cell_style = Some(style.to_string());
        Ok(())
    }

    fn is_overset(&self, id: ElementId) -> HostResult<bool> {
        match &self.get(id)?.content {
            Content::Text { text, capacity, .. } => {
                Ok(capacity.is_some_and(|cap| text.chars().count() > cap))
            }
            _ => Err(HostError::NotText(id)),
        }
    }
}

fn memory_table_mut(page: &mut MemoryPage, frame: ElementId) -> HostResult<&mut MemoryTable> {
    match &mut page.get_mut(frame)?.content {
        Content::Text {
            table: Some(table), ..
        } => Ok(table),
        _ => Err(HostError::NotTableFrame(frame)),
    }
}
