use crate::{Result, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use uuid::Uuid;

pub const DEFAULT_FONT_SIZE: f64 = 30.0;
pub const DEFAULT_SCROLL_SPEED: f64 = 10.0;
pub const FONT_SIZE_RANGE: RangeInclusive<f64> = 10.0..=100.0;
pub const SCROLL_SPEED_RANGE: RangeInclusive<f64> = 1.0..=100.0;
/// Characters of content shown in list rows.
pub const PREVIEW_CHARS: usize = 50;

const SAMPLE_TITLE: &str = "Sample Script";
const SAMPLE_CONTENT: &str = "Welcome to your teleprompter! This is a sample script to help you get started.

This text will scroll smoothly on your screen, allowing you to read naturally while recording.
You can adjust the scroll speed and font size to match your speaking pace and comfort.

Try moving this window around, resizing it, or locking it in place.
Use the play/pause button to control scrolling, and the forward/back buttons to adjust position.

When you're ready, create your own script by tapping the + button on the main screen.
Happy recording!";

/// Current time truncated to the microsecond precision the store keeps.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now)
}

pub fn clamp_font_size(value: f64) -> f64 {
    value.clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end())
}

pub fn clamp_scroll_speed(value: f64) -> f64 {
    value.clamp(*SCROLL_SPEED_RANGE.start(), *SCROLL_SPEED_RANGE.end())
}

fn check_range(field: &'static str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(StoreError::Validation {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub font_size: f64,
    pub scroll_speed: f64,
}

impl Script {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: Some(title.into()),
            content: Some(content.into()),
            created_at: now,
            updated_at: now,
            font_size: DEFAULT_FONT_SIZE,
            scroll_speed: DEFAULT_SCROLL_SPEED,
        }
    }

    /// The welcome script shown on first run and in previews.
    pub fn sample() -> Self {
        Self::new(SAMPLE_TITLE, SAMPLE_CONTENT)
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn display_content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// List-row preview: leading characters of the content and an ellipsis.
    pub fn preview(&self) -> String {
        let head: String = self.display_content().chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    }

    /// Move `updated_at` forward, strictly past its previous value.
    pub fn touch(&mut self) {
        let now = now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + chrono::Duration::microseconds(1)
        };
    }

    pub fn edit(&mut self, title: impl Into<String>, content: impl Into<String>) {
        self.title = Some(title.into());
        self.content = Some(content.into());
        self.touch();
    }

    pub fn apply_settings(&mut self, font_size: f64, scroll_speed: f64) -> Result<()> {
        check_range("font size", font_size, &FONT_SIZE_RANGE)?;
        check_range("scroll speed", scroll_speed, &SCROLL_SPEED_RANGE)?;
        self.font_size = font_size;
        self.scroll_speed = scroll_speed;
        self.touch();
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        check_range("font size", self.font_size, &FONT_SIZE_RANGE)?;
        check_range("scroll speed", self.scroll_speed, &SCROLL_SPEED_RANGE)?;
        if self.updated_at < self.created_at {
            return Err(StoreError::Timestamps {
                id: self.id.clone(),
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }
}
