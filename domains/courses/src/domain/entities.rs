//! Domain entities for the Courses domain
//!
//! Course, Chapter, Attachment, Category and MuxData rows, plus the field
//! rules applied before any of them is written.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use coursecraft_common::{Error, Result};

/// Maximum course/chapter title length
pub const MAX_TITLE_LENGTH: usize = 200;

/// Largest value that fits NUMERIC(10,2)
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// A course authored by an instructor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub is_published: bool,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Create a new unpublished course with only a title
    pub fn new(owner_id: &str, title: &str) -> Result<Self> {
        let title = validate_title(title)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            image_url: None,
            price: None,
            category_id: None,
            is_published: false,
            owner_id: owner_id.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Price rendered as US dollars, if set
    pub fn formatted_price(&self) -> Option<String> {
        self.price.map(format_price)
    }
}

/// A chapter within a course, ordered by `position` (1-based)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chapter {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub is_free: bool,
    pub is_published: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chapter {
    /// Create a new unpublished chapter at the given position
    pub fn new(course_id: Uuid, title: &str, position: i32) -> Result<Self> {
        let title = validate_title(title)?;
        if position < 1 {
            return Err(Error::Validation(format!(
                "Chapter position must be at least 1, got {}",
                position
            )));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            course_id,
            title,
            description: None,
            video_url: None,
            is_free: false,
            is_published: false,
            position,
            created_at: now,
            updated_at: now,
        })
    }
}

/// A downloadable resource attached to a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attachment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    pub url: String,
    /// MIME subtype, e.g. `pdf`
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub attachment_type: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    /// Build an attachment from an uploaded file.
    ///
    /// The display name drops the file's last extension and the stored type
    /// is the MIME subtype.
    pub fn from_upload(
        course_id: Uuid,
        owner_id: &str,
        url: &str,
        file_name: &str,
        content_type: &str,
    ) -> Result<Self> {
        if url.trim().is_empty() {
            return Err(Error::Validation("Attachment url is required".to_string()));
        }
        let name = attachment_display_name(file_name);
        if name.is_empty() {
            return Err(Error::Validation(
                "Attachment file name is required".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            course_id,
            name,
            url: url.trim().to_string(),
            attachment_type: mime_subtype(content_type),
            owner_id: owner_id.to_string(),
            created_at: Utc::now(),
        })
    }
}

/// Flat reference list used to classify courses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

/// Video-hosting record for a chapter (one per chapter)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MuxData {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub asset_id: String,
    pub playback_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MuxData {
    pub fn new(chapter_id: Uuid, asset_id: String, playback_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            chapter_id,
            asset_id,
            playback_id,
            created_at: Utc::now(),
        }
    }
}

/// Trim a title and enforce non-empty / max length
pub fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("Title is required".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(Error::Validation(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// Prices are non-negative and must fit NUMERIC(10,2)
pub fn validate_price(price: Decimal) -> Result<Decimal> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(Error::Validation("Price must not be negative".to_string()));
    }
    let rounded = price.round_dp(2);
    if rounded > MAX_PRICE {
        return Err(Error::Validation(format!(
            "Price must not exceed {}",
            MAX_PRICE
        )));
    }
    Ok(rounded)
}

/// Format a price as US dollars: `1234.5` -> `$1,234.50`
pub fn format_price(price: Decimal) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if price.is_sign_negative() && !price.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, grouped, cents)
}

/// File name with its last extension removed.
///
/// Names without an extension and dotfiles (`.env`) are kept as-is.
pub fn attachment_display_name(file_name: &str) -> String {
    let trimmed = file_name.trim();
    match trimmed.rfind('.') {
        Some(idx) if idx > 0 => trimmed[..idx].to_string(),
        _ => trimmed.to_string(),
    }
}

/// MIME subtype of a content type (`application/pdf` -> `pdf`).
///
/// Parameters are dropped; a value without `/` is kept as-is.
pub fn mime_subtype(content_type: &str) -> String {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();
    match essence.split_once('/') {
        Some((_, subtype)) => subtype.to_ascii_lowercase(),
        None => essence.to_string(),
    }
}
