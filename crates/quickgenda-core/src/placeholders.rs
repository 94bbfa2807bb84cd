//! Typed placeholder registry.
//!
//! A template page carries labelled elements. They are resolved once per
//! page into a [`PlaceholderSet`] so the filler works with typed handles
//! instead of re-querying labels.
//!
//! Elements inside generated clones (`chairClone`, `topicCloneGroup`)
//! keep their original labels, so resolution skips any element whose
//! ancestor carries a clone label. Resolving a filled page therefore finds
//! the same prototypes as resolving the template.

use serde::Serialize;

use crate::host::{ElementId, ElementKind, PageHost};

/// Label vocabulary shared with template authors.
pub mod labels {
    pub const SESSION_TITLE: &str = "sessionTitle";
    pub const SESSION_TIME: &str = "sessionTime";
    pub const SESSION_NO: &str = "sessionNo";
    pub const CHAIRPERSONS: &str = "chairpersons";
    pub const TOPICS_TABLE: &str = "topicsTable";
    pub const TOPIC_TIME: &str = "topicTime";
    pub const TOPIC_TITLE: &str = "topicTitle";
    pub const TOPIC_SPEAKER: &str = "topicSpeaker";
    pub const CHAIR_AVATAR: &str = "chairAvatar";
    pub const CHAIR_FLAG: &str = "chairFlag";

    pub const CHAIR_CLONE: &str = "chairClone";
    pub const TOPIC_CLONE_GROUP: &str = "topicCloneGroup";
    pub const TOPIC_CLONE_PREFIX: &str = "topicClone_";
    pub const TOPIC_CLONE_TIME: &str = "topicClone_Time";
    pub const TOPIC_CLONE_TOPIC: &str = "topicClone_Topic";
    pub const TOPIC_CLONE_SPEAKER: &str = "topicClone_Speaker";

    /// Labels that count towards "the page has placeholders".
    pub const KNOWN: [&str; 8] = [
        SESSION_TITLE,
        SESSION_TIME,
        SESSION_NO,
        CHAIRPERSONS,
        TOPICS_TABLE,
        TOPIC_TIME,
        TOPIC_TITLE,
        TOPIC_SPEAKER,
    ];

    /// True for labels the filler assigns to generated elements.
    pub fn is_clone(label: &str) -> bool {
        label == CHAIR_CLONE || label == TOPIC_CLONE_GROUP || label.starts_with(TOPIC_CLONE_PREFIX)
    }
}

/// A resolved placeholder, tagged by what it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Placeholder {
    Text(ElementId),
    Table(ElementId),
    Image(ElementId),
}

impl Placeholder {
    pub fn id(self) -> ElementId {
        match self {
            Placeholder::Text(id) | Placeholder::Table(id) | Placeholder::Image(id) => id,
        }
    }
}

/// The three prototypes of an independent topic row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicRowFrames {
    pub time: ElementId,
    pub title: ElementId,
    pub speaker: ElementId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaceholderSet {
    pub session_title: Option<ElementId>,
    pub session_time: Option<ElementId>,
    pub session_no: Option<ElementId>,
    pub chairpersons: Option<ElementId>,
    pub topics_table: Option<ElementId>,
    pub topic_time: Option<ElementId>,
    pub topic_title: Option<ElementId>,
    pub topic_speaker: Option<ElementId>,
    pub chair_avatar: Option<ElementId>,
    pub chair_flag: Option<ElementId>,
}

impl PlaceholderSet {
    pub fn resolve<P: PageHost + ?Sized>(page: &P) -> Self {
        let text = |label| find_prototype(page, label, ElementKind::Text);
        let image = |label| find_prototype(page, label, ElementKind::Image);
        Self {
            session_title: text(labels::SESSION_TITLE),
            session_time: text(labels::SESSION_TIME),
            session_no: text(labels::SESSION_NO),
            chairpersons: text(labels::CHAIRPERSONS),
            topics_table: text(labels::TOPICS_TABLE),
            topic_time: text(labels::TOPIC_TIME),
            topic_title: text(labels::TOPIC_TITLE),
            topic_speaker: text(labels::TOPIC_SPEAKER),
            chair_avatar: image(labels::CHAIR_AVATAR),
            chair_flag: image(labels::CHAIR_FLAG),
        }
    }

    /// Tagged lookup by label.
    pub fn get(&self, label: &str) -> Option<Placeholder> {
        match label {
            labels::SESSION_TITLE => self.session_title.map(Placeholder::Text),
            labels::SESSION_TIME => self.session_time.map(Placeholder::Text),
            labels::SESSION_NO => self.session_no.map(Placeholder::Text),
            labels::CHAIRPERSONS => self.chairpersons.map(Placeholder::Text),
            labels::TOPICS_TABLE => self.topics_table.map(Placeholder::Table),
            labels::TOPIC_TIME => self.topic_time.map(Placeholder::Text),
            labels::TOPIC_TITLE => self.topic_title.map(Placeholder::Text),
            labels::TOPIC_SPEAKER => self.topic_speaker.map(Placeholder::Text),
            labels::CHAIR_AVATAR => self.chair_avatar.map(Placeholder::Image),
            labels::CHAIR_FLAG => self.chair_flag.map(Placeholder::Image),
            _ => None,
        }
    }

    /// Labels from [`labels::KNOWN`] that resolved, in vocabulary order.
    pub fn found(&self) -> Vec<&'static str> {
        labels::KNOWN
            .iter()
            .copied()
            .filter(|label| self.get(label).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.found().is_empty()
    }

    /// All three independent-row prototypes, if present.
    pub fn topic_rows(&self) -> Option<TopicRowFrames> {
        Some(TopicRowFrames {
            time: self.topic_time?,
            title: self.topic_title?,
            speaker: self.topic_speaker?,
        })
    }

    pub fn has_image_frames(&self) -> bool {
        self.chair_avatar.is_some() || self.chair_flag.is_some()
    }
}

fn find_prototype<P: PageHost + ?Sized>(page: &P, label: &str, kind: ElementKind) -> Option<ElementId> {
    page.find_all(label)
        .into_iter()
        .find(|&id| page.kind(id).ok() == Some(kind) && !inside_clone(page, id))
}

fn inside_clone<P: PageHost + ?Sized>(page: &P, id: ElementId) -> bool {
    let mut current = page.parent_group(id).ok().flatten();
    while let Some(group) = current {
        if page.label(group).is_ok_and(|l| labels::is_clone(&l)) {
            return true;
        }
        current = page.parent_group(group).ok().flatten();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{Element, MemoryPage};
    use crate::layout::Bounds;

    fn frame() -> Bounds {
        Bounds::new(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn test_resolve_partial_template() {
        let mut page = MemoryPage::new(frame());
        let title = page.push(Element::text("sessionTitle", frame()));
        page.push(Element::text("topicsTable", frame()));
        let set = PlaceholderSet::resolve(&page);
        assert_eq!(set.session_title, Some(title));
        assert_eq!(set.get("sessionTitle"), Some(Placeholder::Text(title)));
        assert!(matches!(set.get("topicsTable"), Some(Placeholder::Table(_))));
        assert_eq!(set.found(), vec!["sessionTitle", "topicsTable"]);
        assert!(!set.is_empty());
        assert!(set.topic_rows().is_none());
    }

    #[test]
    fn test_empty_page_has_no_placeholders() {
        let mut page = MemoryPage::new(frame());
        page.push(Element::text("decoration", frame()));
        page.push(Element::image("chairAvatar", frame()));
        let set = PlaceholderSet::resolve(&page);
        assert!(set.is_empty());
        assert!(set.has_image_frames());
    }

    #[test]
    fn test_wrong_kind_is_ignored() {
        let mut page = MemoryPage::new(frame());
        page.push(Element::image("sessionTitle", frame()));
        assert!(PlaceholderSet::resolve(&page).session_title.is_none());
    }

    #[test]
    fn test_clone_descendants_are_skipped() {
        let mut page = MemoryPage::new(frame());
        let clone = page.push(Element::group(
            "topicCloneGroup",
            vec![Element::text("topicTime", frame())],
        ));
        let proto = page.push(Element::group(
            "",
            vec![
                Element::text("topicTime", frame()),
                Element::text("topicTitle", frame()),
                Element::text("topicSpeaker", frame()),
            ],
        ));
        let set = PlaceholderSet::resolve(&page);
        let rows = set.topic_rows().unwrap();
        assert_eq!(page.parent_group(rows.time).unwrap(), Some(proto));
        assert_ne!(page.parent_group(rows.time).unwrap(), Some(clone));
    }

    #[test]
    fn test_clone_labels() {
        assert!(labels::is_clone("chairClone"));
        assert!(labels::is_clone("topicClone_Speaker"));
        assert!(labels::is_clone("topicCloneGroup"));
        assert!(!labels::is_clone("chairpersons"));
    }
}
