//! Page extractors for turning a rendered page into notes.
//!
//! Each extractor is a pure function over a [`Queryable`](crate::dom::Queryable)
//! document and the page URL. Extractors never fail: problems are logged and
//! produce an empty or partial result.
//!
//! # Supported Sources
//!
//! | Source | Module | Page modes |
//! |--------|--------|------------|
//! | Xiaohongshu | [`xiaohongshu`] | Note detail view, explore/home listing |

pub mod xiaohongshu;
