//! Data models for extracted notes and the labels used to present them.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Note`]: One post extracted from a Xiaohongshu page
//! - [`ContentType`]: Whether a note carries a video or images/text
//! - [`Locale`] and [`Labels`]: The user-visible strings (CSV header,
//!   placeholders, content-type names, file label) for a language

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

/// The kind of media a note carries.
///
/// Detected by the presence of a video-bearing element within the note's
/// DOM scope; anything else is treated as image/text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Video,
    ImageText,
}

impl ContentType {
    pub fn from_has_video(has_video: bool) -> Self {
        if has_video {
            ContentType::Video
        } else {
            ContentType::ImageText
        }
    }
}

/// One extracted post.
///
/// Every field is populated: the extractor substitutes the locale's
/// placeholder for anything it could not find, so a `Note` never carries
/// an empty title, author or content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    /// The note title, or the "untitled" placeholder.
    pub title: String,
    /// The author's display name, or the "unknown author" placeholder.
    pub author: String,
    /// Video or image/text.
    pub content_type: ContentType,
    /// Body text fragments joined by single spaces, or the "no content" placeholder.
    pub content: String,
}

/// Language of the labels written into the export.
///
/// `En` is the default; `Zh` reproduces the labels of the browser extension
/// this tool replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::En => &EN_LABELS,
            Locale::Zh => &ZH_LABELS,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => f.write_str("en"),
            Locale::Zh => f.write_str("zh"),
        }
    }
}

/// The fixed strings used when building and exporting notes.
#[derive(Debug, PartialEq, Eq)]
pub struct Labels {
    /// CSV column labels in order: title, author, content type, content.
    pub header: [&'static str; 4],
    pub untitled: &'static str,
    pub unknown_author: &'static str,
    pub no_content: &'static str,
    pub video: &'static str,
    pub image_text: &'static str,
    /// Site label embedded in the exported file name.
    pub file_label: &'static str,
}

impl Labels {
    pub fn content_type(&self, content_type: ContentType) -> &'static str {
        match content_type {
            ContentType::Video => self.video,
            ContentType::ImageText => self.image_text,
        }
    }
}

pub static EN_LABELS: Labels = Labels {
    header: ["title", "author", "content-type", "content"],
    untitled: "Untitled",
    unknown_author: "Unknown author",
    no_content: "No content",
    video: "video",
    image_text: "image/text",
    file_label: "xiaohongshu_notes",
};

pub static ZH_LABELS: Labels = Labels {
    header: ["标题", "作者", "类型", "内容"],
    untitled: "无标题",
    unknown_author: "未知作者",
    no_content: "无内容",
    video: "视频",
    image_text: "图文",
    file_label: "小红书笔记",
};
