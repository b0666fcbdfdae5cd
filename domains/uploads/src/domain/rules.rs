//! Accepted media types and size caps per upload route

use serde::{Deserialize, Serialize};

use coursecraft_common::{Error, Result};

const MB: u64 = 1024 * 1024;
const GB: u64 = 1024 * MB;

/// Broad media family of an uploaded file, judged by its content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Text,
    Pdf,
    Audio,
    Video,
}

impl MediaKind {
    /// Classify a content type such as `image/png` or `application/pdf`
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        let (top, sub) = essence.split_once('/')?;
        if sub.is_empty() {
            return None;
        }
        match top {
            "image" => Some(Self::Image),
            "text" => Some(Self::Text),
            "audio" => Some(Self::Audio),
            "video" => Some(Self::Video),
            "application" if sub == "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Text => write!(f, "text"),
            Self::Pdf => write!(f, "pdf"),
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// The three upload endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadRoute {
    CourseImage,
    CourseAttachment,
    ChapterVideo,
}

impl UploadRoute {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "course-image" => Some(Self::CourseImage),
            "course-attachment" => Some(Self::CourseAttachment),
            "chapter-video" => Some(Self::ChapterVideo),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::CourseImage => "course-image",
            Self::CourseAttachment => "course-attachment",
            Self::ChapterVideo => "chapter-video",
        }
    }

    /// Size cap for a media kind, or `None` if the route rejects it
    pub fn max_bytes(&self, kind: MediaKind) -> Option<u64> {
        match (self, kind) {
            (Self::CourseImage, MediaKind::Image) => Some(8 * MB),
            (Self::CourseAttachment, MediaKind::Text) => Some(4 * MB),
            (Self::CourseAttachment, MediaKind::Image) => Some(4 * MB),
            (Self::CourseAttachment, MediaKind::Pdf) => Some(4 * MB),
            (Self::CourseAttachment, MediaKind::Audio) => Some(8 * MB),
            (Self::CourseAttachment, MediaKind::Video) => Some(16 * MB),
            (Self::ChapterVideo, MediaKind::Video) => Some(512 * GB),
            _ => None,
        }
    }

    /// Largest cap across every kind the route accepts
    pub fn largest_cap(&self) -> u64 {
        [
            MediaKind::Image,
            MediaKind::Text,
            MediaKind::Pdf,
            MediaKind::Audio,
            MediaKind::Video,
        ]
        .into_iter()
        .filter_map(|kind| self.max_bytes(kind))
        .max()
        .unwrap_or(0)
    }

    /// Check the declared content type and return its kind and cap
    pub fn accept(&self, content_type: &str) -> Result<(MediaKind, u64)> {
        let kind = MediaKind::from_content_type(content_type).ok_or_else(|| {
            Error::Validation(format!(
                "Unsupported file type '{}' for {}",
                content_type,
                self.slug()
            ))
        })?;
        let cap = self.max_bytes(kind).ok_or_else(|| {
            Error::Validation(format!("{} files are not accepted by {}", kind, self.slug()))
        })?;
        Ok((kind, cap))
    }

    /// Reject a size above the kind's cap
    pub fn check_size(&self, kind: MediaKind, cap: u64, size_bytes: u64) -> Result<()> {
        if size_bytes > cap {
            return Err(Error::Validation(format!(
                "{} file exceeds the {} limit for {}",
                kind,
                format_size(cap),
                self.slug()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for UploadRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// `8MB`, `512GB`
pub fn format_size(bytes: u64) -> String {
    if bytes >= GB && bytes % GB == 0 {
        format!("{}GB", bytes / GB)
    } else if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else {
        format!("{}B", bytes)
    }
}
