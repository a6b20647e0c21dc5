//! Transcript rendering.
//!
//! The controller only talks to [`Renderer`]. [`ChatScreen`] is the plain-data
//! implementation; the Dioxus view draws a `ChatScreen` held in a signal.

use crate::strings::Strings;
use crate::types::{Role, Source};
use time::OffsetDateTime;

pub trait Renderer {
    /// Append a message, dropping the empty-state placeholder first.
    fn render_message(&mut self, role: Role, content: &str);
    /// Append a references block listing each source's label as plain text.
    fn render_sources(&mut self, sources: &[Source]);
    /// Show or hide the typing indicator and disable or enable submitting.
    fn set_loading(&mut self, on: bool);
    fn scroll_to_bottom(&mut self);
    /// Replace the transcript with the empty-state placeholder.
    fn reset_transcript(&mut self);
    fn clear_input(&mut self);
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntryKind {
    EmptyState,
    Message {
        role: Role,
        paragraphs: Vec<String>,
    },
    Sources {
        heading: String,
        items: Vec<String>,
    },
    Loading,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptEntry {
    pub id: u64,
    pub kind: EntryKind,
    pub created_at: OffsetDateTime,
}

/// One paragraph per line. Text is kept as-is; nothing is parsed as markup.
pub fn split_paragraphs(content: &str) -> Vec<String> {
    content.split('\n').map(str::to_string).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatScreen {
    pub entries: Vec<TranscriptEntry>,
    /// Current text of the composer input.
    pub input: String,
    pub submit_enabled: bool,
    /// Bumped on every scroll request.
    pub scroll_requests: u64,
    strings: Strings,
    next_id: u64,
}

impl ChatScreen {
    pub fn new(strings: Strings) -> Self {
        let mut screen = Self {
            entries: Vec::new(),
            input: String::new(),
            submit_enabled: true,
            scroll_requests: 0,
            strings,
            next_id: 0,
        };
        screen.push(EntryKind::EmptyState);
        screen
    }

    fn push(&mut self, kind: EntryKind) {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(TranscriptEntry {
            id,
            kind,
            created_at: OffsetDateTime::now_utc(),
        });
    }

    pub fn has_empty_state(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.kind == EntryKind::EmptyState)
    }

    pub fn is_loading(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.kind == EntryKind::Loading)
    }

    /// Messages in display order, each as (role, paragraphs).
    pub fn messages(&self) -> Vec<(Role, &[String])> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.kind {
                EntryKind::Message { role, paragraphs } => Some((*role, paragraphs.as_slice())),
                _ => None,
            })
            .collect()
    }

    /// Message texts joined back with newlines, in display order.
    pub fn message_texts(&self) -> Vec<(Role, String)> {
        self.messages()
            .into_iter()
            .map(|(role, paragraphs)| (role, paragraphs.join("\n")))
            .collect()
    }

    /// Labels of every references block, in display order.
    pub fn source_lists(&self) -> Vec<&[String]> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.kind {
                EntryKind::Sources { items, .. } => Some(items.as_slice()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for ChatScreen {
    fn render_message(&mut self, role: Role, content: &str) {
        self.entries
            .retain(|entry| entry.kind != EntryKind::EmptyState);
        self.push(EntryKind::Message {
            role,
            paragraphs: split_paragraphs(content),
        });
        self.scroll_to_bottom();
    }

    fn render_sources(&mut self, sources: &[Source]) {
        let items = sources
            .iter()
            .map(|source| source.label().to_string())
            .collect();
        self.push(EntryKind::Sources {
            heading: self.strings.references.to_string(),
            items,
        });
    }

    fn set_loading(&mut self, on: bool) {
        if on {
            if !self.is_loading() {
                self.push(EntryKind::Loading);
            }
        } else {
            self.entries.retain(|entry| entry.kind != EntryKind::Loading);
        }
        self.submit_enabled = !on;
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_requests += 1;
    }

    fn reset_transcript(&mut self) {
        self.entries.clear();
        self.push(EntryKind::EmptyState);
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }
}
