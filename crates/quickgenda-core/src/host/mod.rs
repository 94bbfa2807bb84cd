//! Host document abstraction.
//!
//! The filler never touches a concrete layout application. It drives a
//! page through [`PageHost`] and the tables inside its frames through
//! [`TableHost`], so the same fill logic runs against the in-memory
//! [`MemoryPage`](memory::MemoryPage) used by the CLI and tests, or any
//! other binding.
//!
//! # Operations
//!
//! | Method | Purpose |
//! |--------|---------|
//! | [`find_all`](PageHost::find_all) | Every element with a label, groups included |
//! | [`find_descendant`](PageHost::find_descendant) | Label lookup inside one subtree |
//! | [`duplicate`](PageHost::duplicate) | Deep copy onto the page top level |
//! | [`move_by`](PageHost::move_by) | Translate an element and its children |
//! | [`set_text`](PageHost::set_text) | Replace text content |
//! | [`apply_paragraph_style`](PageHost::apply_paragraph_style) | Link a named paragraph style |
//! | [`place_image`](PageHost::place_image) | Put an image file into a frame |
//! | [`table_mut`](PageHost::table_mut) | Structural access to a frame's table |
//! | [`is_overset`](PageHost::is_overset) | Text exceeds the frame capacity |

pub mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HostResult;
use crate::layout::Bounds;
use crate::settings::ImageFitting;

/// Stable handle for one page element.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an element is, as far as filling is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A text frame. May host a table.
    Text,
    /// A graphic frame that receives placed images.
    Image,
    /// A container whose children move and duplicate with it.
    Group,
}

/// A single page of a host document.
pub trait PageHost {
    /// Page bounds in points, used for centering.
    fn page_bounds(&self) -> Bounds;

    /// Every element labelled `label`, depth-first in document order.
    fn find_all(&self, label: &str) -> Vec<ElementId>;

    /// First element labelled `label` anywhere on the page.
    fn find(&self, label: &str) -> Option<ElementId> {
        self.find_all(label).into_iter().next()
    }

    /// First descendant of `root` labelled `label`.
    fn find_descendant(&self, root: ElementId, label: &str) -> Option<ElementId>;

    /// All text frames on the page, groups included.
    fn text_frames(&self) -> Vec<ElementId>;

    fn kind(&self, id: ElementId) -> HostResult<ElementKind>;

    fn label(&self, id: ElementId) -> HostResult<String>;

    fn set_label(&mut self, id: ElementId, label: &str) -> HostResult<()>;

    /// Enclosing group, if the element sits inside one.
    fn parent_group(&self, id: ElementId) -> HostResult<Option<ElementId>>;

    fn bounds(&self, id: ElementId) -> HostResult<Bounds>;

    /// Copy `id` and its subtree onto the page top level.
    fn duplicate(&mut self, id: ElementId) -> HostResult<ElementId>;

    fn move_by(&mut self, id: ElementId, dx: f64, dy: f64) -> HostResult<()>;

    fn set_visible(&mut self, id: ElementId, visible: bool) -> HostResult<()>;

    fn is_visible(&self, id: ElementId) -> HostResult<bool>;

    /// Delete `id` and its subtree.
    fn remove(&mut self, id: ElementId) -> HostResult<()>;

    fn text(&self, id: ElementId) -> HostResult<String>;

    fn set_text(&mut self, id: ElementId, text: &str) -> HostResult<()>;

    fn apply_paragraph_style(&mut self, id: ElementId, style: &str) -> HostResult<()>;

    fn place_image(&mut self, frame: ElementId, path: &str) -> HostResult<()>;

    /// Fails if the frame holds no placed image.
    fn fit_image(&mut self, frame: ElementId, fitting: ImageFitting) -> HostResult<()>;

    fn has_table(&self, frame: ElementId) -> HostResult<bool>;

    /// Replace the frame's text with a new `rows` x `columns` table.
    fn create_table(&mut self, frame: ElementId, rows: usize, columns: usize) -> HostResult<()>;

    fn table_mut(&mut self, frame: ElementId) -> HostResult<&mut dyn TableHost>;

    fn apply_table_style(&mut self, frame: ElementId, style: &str) -> HostResult<()>;

    /// Apply a cell style to every cell of the frame's table.
    fn apply_cell_style(&mut self, frame: ElementId, style: &str) -> HostResult<()>;

    fn is_overset(&self, id: ElementId) -> HostResult<bool>;
}

/// A table inside a text frame. Header rows count towards `row_count`.
pub trait TableHost {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    /// Grow or shrink at the tail.
    fn set_row_count(&mut self, rows: usize);

    /// Grow or shrink at the tail.
    fn set_column_count(&mut self, columns: usize);

    fn header_row_count(&self) -> usize;

    fn set_header_row_count(&mut self, rows: usize) -> HostResult<()>;

    fn cell(&self, row: usize, column: usize) -> HostResult<&str>;

    fn set_cell(&mut self, row: usize, column: usize, text: &str) -> HostResult<()>;

    fn set_column_width(&mut self, column: usize, width: f64) -> HostResult<()>;
}
