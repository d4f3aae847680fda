//! Record normalization.
//!
//! Maps one raw remote record into the canonical index-ready shape. The
//! mapping is pure and total over well-formed input: malformed sub-objects
//! degrade to empty-string fields, and only two conditions drop a record
//! entirely (no usable key, no name).

use crate::models::{CanonicalRecord, RawRecord};

/// Substring the remote API uses to encode thumbnail resolution in image
/// urls; replacing it upgrades the reference to full-cover resolution.
const THUMB_SEGMENT: &str = "t_thumb";
const COVER_SEGMENT: &str = "t_cover_big";

/// Normalizes a raw record, or returns `None` when it must be dropped.
///
/// Drop conditions:
/// - neither `slug` nor `id` is present (no usable key),
/// - `name` is absent or empty (the minimum viable searchable attribute).
///
/// The key is the slug when present and non-empty, else the numeric id
/// rendered as a string.
pub fn normalize(raw: RawRecord) -> Option<CanonicalRecord> {
    let key = match raw.slug.as_deref() {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => raw.id?.to_string(),
    };

    let name = match raw.name {
        Some(name) if !name.is_empty() => name,
        _ => return None,
    };

    let alternative_names = raw
        .alternative_names
        .unwrap_or_default()
        .into_iter()
        .filter_map(|alt| alt.name)
        .filter(|name| !name.is_empty())
        .collect();

    let thumbnail_image_url = raw
        .cover
        .and_then(|cover| cover.url)
        .unwrap_or_default();
    let cover_image_url = upgrade_cover_url(&thumbnail_image_url);

    Some(CanonicalRecord {
        key,
        name,
        alternative_names,
        summary: raw.summary.unwrap_or_default(),
        cover_image_url,
        thumbnail_image_url,
    })
}

/// Rewrites a thumbnail url to its full-cover-resolution counterpart.
fn upgrade_cover_url(thumbnail_url: &str) -> String {
    thumbnail_url.replace(THUMB_SEGMENT, COVER_SEGMENT)
}
