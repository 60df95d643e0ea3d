//! Xiaohongshu note extractor.
//!
//! Xiaohongshu markup is obfuscated and ships in several structural variants,
//! so every field is looked up through an ordered list of candidate CSS
//! selectors. The list is searched as one selector group: elements are
//! visited in document order and each element at most once, and the first
//! acceptable one wins.
//!
//! # Page Modes
//!
//! Two modes are recognized from the page URL. They are not exclusive: an
//! `/explore/<id>` URL qualifies for both, and both append to the same list.
//!
//! - **Detail view** (`/discovery/item/` or `/explore/`): one note built from
//!   the whole document.
//! - **Listing view** (site root or `/explore`): one note per feed card.

use crate::dom::Queryable;
use crate::models::{ContentType, Labels, Note};
use crate::utils::truncate_for_log;
use tracing::{debug, info, instrument};

pub const SITE_DOMAIN: &str = "xiaohongshu.com";
pub const SITE_ROOT: &str = "https://www.xiaohongshu.com/";

const DETAIL_PATH_MARKERS: &[&str] = &["/discovery/item/", "/explore/"];
const LISTING_PATH_MARKER: &str = "/explore";

const TITLE_SELECTORS: &[&str] = &["h1", ".title", ".note-content .content"];
const AUTHOR_SELECTORS: &[&str] = &[".author", ".nickname", ".user-nickname", ".user-name"];
const VIDEO_SELECTORS: &[&str] = &["video", ".video-container", ".videoframe"];
const CONTENT_SELECTORS: &[&str] = &[".content", ".desc", ".note-content p", ".note-desc"];
const PARAGRAPH_SELECTORS: &[&str] = &["p"];

const CARD_SELECTORS: &[&str] = &[".note-card", ".feed-card", ".explore-card", "[data-v-note]"];
const CARD_TITLE_SELECTORS: &[&str] = &[".title", ".desc"];
const CARD_AUTHOR_SELECTORS: &[&str] = &[".user-name", ".nickname"];
const CARD_VIDEO_SELECTORS: &[&str] = &["video", ".video-icon"];
const CARD_CONTENT_SELECTORS: &[&str] = &[".desc", ".content"];

fn selector_group(selectors: &[&str]) -> String {
    selectors.join(", ")
}

/// Whether `url` is a single-note detail page.
pub fn is_detail_view(url: &str) -> bool {
    url.contains(SITE_DOMAIN) && DETAIL_PATH_MARKERS.iter().any(|m| url.contains(m))
}

/// Whether `url` is the home feed or an explore listing.
pub fn is_listing_view(url: &str) -> bool {
    url.contains(SITE_DOMAIN) && (url == SITE_ROOT || url.contains(LISTING_PATH_MARKER))
}

/// Text of the first element whose trimmed text is non-empty.
fn first_non_empty_text<Q: Queryable>(scope: &Q, selectors: &[&str]) -> Option<String> {
    scope
        .select_all(&selector_group(selectors))
        .iter()
        .map(|el| el.trimmed_text())
        .find(|text| !text.is_empty())
}

/// Text of the first matching element, `None` when nothing matches or the
/// match is blank.
fn first_match_text<Q: Queryable>(scope: &Q, selectors: &[&str]) -> Option<String> {
    scope
        .select_first(&selector_group(selectors))
        .map(|el| el.trimmed_text())
        .filter(|text| !text.is_empty())
}

fn or_placeholder(value: Option<String>, placeholder: &str) -> String {
    value.unwrap_or_else(|| placeholder.to_string())
}

/// Trimmed, non-empty texts of every match that is not exactly the title.
fn body_fragments<Q: Queryable>(scope: &Q, selectors: &[&str], title: &str) -> Vec<String> {
    scope
        .select_all(&selector_group(selectors))
        .iter()
        .map(|el| el.trimmed_text())
        .filter(|text| !text.is_empty() && text != title)
        .collect()
}

/// Extract every note visible on the page at `url`.
///
/// Returns an empty list when the URL matches neither page mode.
#[instrument(level = "info", skip_all, fields(%url))]
pub fn extract_notes<Q: Queryable>(doc: &Q, url: &str, labels: &Labels) -> Vec<Note> {
    let mut notes = Vec::new();

    if is_detail_view(url) {
        if let Some(note) = extract_detail(doc, labels) {
            notes.push(note);
        }
    }

    if is_listing_view(url) {
        notes.extend(extract_listing(doc, labels));
    }

    info!(count = notes.len(), "Extracted Xiaohongshu notes");
    notes
}

fn extract_detail<Q: Queryable>(doc: &Q, labels: &Labels) -> Option<Note> {
    let title = first_non_empty_text(doc, TITLE_SELECTORS).unwrap_or_default();
    let author = first_non_empty_text(doc, AUTHOR_SELECTORS).unwrap_or_default();
    let content_type = ContentType::from_has_video(doc.exists(&selector_group(VIDEO_SELECTORS)));

    let mut fragments = body_fragments(doc, CONTENT_SELECTORS, &title);
    if fragments.is_empty() {
        fragments = body_fragments(doc, PARAGRAPH_SELECTORS, &title);
    }
    let content = fragments.join(" ");

    debug!(
        %title,
        %author,
        ?content_type,
        content = %truncate_for_log(&content, 120),
        "Detail view fields"
    );

    if title.is_empty() && content.is_empty() {
        return None;
    }

    Some(Note {
        title: non_empty_or(title, labels.untitled),
        author: non_empty_or(author, labels.unknown_author),
        content_type,
        content: non_empty_or(content, labels.no_content),
    })
}

fn non_empty_or(value: String, placeholder: &str) -> String {
    or_placeholder(Some(value).filter(|v| !v.is_empty()), placeholder)
}

fn extract_listing<Q: Queryable>(doc: &Q, labels: &Labels) -> Vec<Note> {
    let cards = doc.select_all(&selector_group(CARD_SELECTORS));
    debug!(cards = cards.len(), "Listing view cards");
    cards.iter().map(|card| extract_card(card, labels)).collect()
}

fn extract_card<N: Queryable>(card: &N, labels: &Labels) -> Note {
    Note {
        title: or_placeholder(first_match_text(card, CARD_TITLE_SELECTORS), labels.untitled),
        author: or_placeholder(
            first_match_text(card, CARD_AUTHOR_SELECTORS),
            labels.unknown_author,
        ),
        content_type: ContentType::from_has_video(card.exists(&selector_group(CARD_VIDEO_SELECTORS))),
        content: or_placeholder(
            first_match_text(card, CARD_CONTENT_SELECTORS),
            labels.no_content,
        ),
    }
}
