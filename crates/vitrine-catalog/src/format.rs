//! Display helpers for catalog fields.

use once_cell::sync::Lazy;
use regex::Regex;
use vitrine_gs1::checksum::digits_only;

/// Placeholder shown for empty values.
pub const EMPTY: &str = "—";

static FILE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"/file/d/([a-zA-Z0-9_-]+)").unwrap());
static QUERY_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"[?&]id=([a-zA-Z0-9_-]+)").unwrap());
static ANY_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"id=([a-zA-Z0-9_-]+)").unwrap());

/// `69120000` -> `6912.00.00`. Anything that is not 8 digits is returned as is.
pub fn format_ncm(ncm: Option<&str>) -> String {
    let Some(ncm) = ncm.filter(|n| !n.trim().is_empty()) else {
        return EMPTY.to_string();
    };
    let digits = digits_only(ncm);
    if digits.len() == 8 {
        format!("{}.{}.{}", &digits[..4], &digits[4..6], &digits[6..])
    } else {
        ncm.to_string()
    }
}

/// Thumbnail URL for a Drive share link.
///
/// Handles `/file/d/<id>`, `?id=<id>` and `uc?export=view&id=<id>` links;
/// direct `googleusercontent.com` image links pass through unchanged.
pub fn drive_thumbnail_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let thumbnail = |id: &str| format!("https://drive.google.com/thumbnail?id={id}&sz=w400");

    if let Some(caps) = FILE_ID.captures(url).or_else(|| QUERY_ID.captures(url)) {
        return Some(thumbnail(&caps[1]));
    }
    if url.contains("googleusercontent.com") {
        return Some(url.to_string());
    }
    ANY_ID.captures(url).map(|caps| thumbnail(&caps[1]))
}
