//! Template analysis: which layouts a template page supports and which
//! settings suit it.

use std::fmt;

use serde::Serialize;

use crate::host::PageHost;
use crate::placeholders::PlaceholderSet;
use crate::settings::{ChairMode, Settings, TopicMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Compatibility {
    Good,
    Limited,
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compatibility::Good => f.write_str("Good"),
            Compatibility::Limited => f.write_str("Limited"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub topic_mode: TopicMode,
    pub chair_mode: ChairMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateAnalysis {
    pub placeholders: Vec<&'static str>,
    pub supports_table: bool,
    pub supports_independent: bool,
    pub image_automation_available: bool,
    pub compatibility: Compatibility,
    pub suggested: Suggestion,
}

pub fn analyze_template<P: PageHost + ?Sized>(page: &P) -> TemplateAnalysis {
    let set = PlaceholderSet::resolve(page);
    let supports_table = set.topics_table.is_some();
    let supports_independent = set.topic_rows().is_some();

    let compatibility = if supports_table || supports_independent {
        Compatibility::Good
    } else {
        Compatibility::Limited
    };
    let topic_mode = if !supports_table && supports_independent {
        TopicMode::Independent
    } else {
        TopicMode::Table
    };

    TemplateAnalysis {
        placeholders: set.found(),
        supports_table,
        supports_independent,
        image_automation_available: set.has_image_frames(),
        compatibility,
        suggested: Suggestion {
            topic_mode,
            chair_mode: ChairMode::Inline,
        },
    }
}

impl Settings {
    /// Adopt the suggested modes. The topic table header is switched on.
    pub fn apply_suggested(&mut self, suggestion: Suggestion) {
        self.topic_options.mode = suggestion.topic_mode;
        self.topic_options.include_header = true;
        self.chair_options.mode = suggestion.chair_mode;
    }
}
