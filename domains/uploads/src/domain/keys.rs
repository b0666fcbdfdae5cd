//! Object key naming for uploads

use std::sync::LazyLock;

use uuid::Uuid;

use crate::domain::rules::UploadRoute;

/// Characters outside this set are replaced in key segments
static UNSAFE_CHARS: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"[^A-Za-z0-9._-]+").expect("unsafe character regex is valid")
});

const MAX_SEGMENT_LENGTH: usize = 128;

/// Make a file name or user id safe to use as a key segment
pub fn sanitize_segment(raw: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(raw.trim(), "_");
    let trimmed = replaced.trim_matches(|c| c == '.' || c == '_');
    let segment: String = trimmed.chars().take(MAX_SEGMENT_LENGTH).collect();
    if segment.is_empty() {
        "file".to_string()
    } else {
        segment
    }
}

/// `{route}/{user}/{uuid}-{file_name}`
pub fn object_key(route: UploadRoute, user_id: &str, upload_id: Uuid, file_name: &str) -> String {
    format!(
        "{}/{}/{}-{}",
        route.slug(),
        sanitize_segment(user_id),
        upload_id.simple(),
        sanitize_segment(file_name)
    )
}
