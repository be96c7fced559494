//! Card embedded object: a titled, colored text box.

use crate::model::frame::Frame;
use crate::model::record::CardRecord;

pub const DEFAULT_CARD_TITLE: &str = "Title";
pub const DEFAULT_CARD_BODY: &str = "Content";
pub const DEFAULT_CARD_WIDTH: u32 = 200;
pub const DEFAULT_CARD_HEIGHT: u32 = 120;
pub const DEFAULT_CARD_BACKGROUND: &str = "#333333";

/// Live state of one card.
///
/// The title is kept single-line; the body may span lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    title: String,
    body: String,
    frame: Frame,
}

impl Card {
    /// Creates a card with the default box size and background.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_frame(
            title,
            body,
            Frame::new(
                DEFAULT_CARD_WIDTH,
                DEFAULT_CARD_HEIGHT,
                DEFAULT_CARD_BACKGROUND,
            ),
        )
    }

    pub fn with_frame(title: impl Into<String>, body: impl Into<String>, frame: Frame) -> Self {
        Self {
            title: single_line(title.into()),
            body: body.into(),
            frame,
        }
    }

    /// Rebuilds a card from a decoded persisted record.
    pub fn from_record(record: CardRecord) -> Self {
        Self::with_frame(
            record.title,
            record.content,
            Frame::new(record.width, record.height, record.bg),
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replaces the title; line breaks are folded into spaces.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = single_line(title.into());
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.frame.set_background(color);
    }

    /// See [`Frame::resize`].
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.frame.resize(width, height)
    }

    /// Snapshot of all current fields in persisted shape.
    pub fn data(&self) -> CardRecord {
        CardRecord {
            title: self.title.clone(),
            content: self.body.clone(),
            bg: self.frame.background().to_string(),
            width: self.frame.width(),
            height: self.frame.height(),
        }
    }
}

impl Default for Card {
    fn default() -> Self {
        Self::new(DEFAULT_CARD_TITLE, DEFAULT_CARD_BODY)
    }
}

fn single_line(value: String) -> String {
    if value.contains(['\n', '\r']) {
        value.replace("\r\n", " ").replace(['\n', '\r'], " ")
    } else {
        value
    }
}
