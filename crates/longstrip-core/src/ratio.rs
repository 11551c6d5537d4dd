//! CSS aspect-ratio strings.

use std::fmt;

use longstrip_types::error::{LongstripError, Result};

/// A parsed CSS aspect ratio (`"2/3"`, `"2 / 3"`, or a bare number).
///
/// The original CSS text is kept verbatim for the host's custom
/// property; the numeric quotient drives placeholder layout.
#[derive(Debug, Clone)]
pub struct AspectRatio {
    css: String,
    quotient: f32,
}

impl AspectRatio {
    /// Parse a CSS ratio string. Fails on non-positive or malformed
    /// components.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let quotient = match trimmed.split_once('/') {
            Some((w, h)) => {
                let w = parse_component(w, trimmed)?;
                let h = parse_component(h, trimmed)?;
                w / h
            },
            None => parse_component(trimmed, trimmed)?,
        };
        Ok(Self {
            css: trimmed.to_string(),
            quotient,
        })
    }

    /// The ratio as width divided by height.
    pub fn quotient(&self) -> f32 {
        self.quotient
    }

    /// The original CSS text (for the host's `--aspect-ratio` property).
    pub fn css(&self) -> &str {
        &self.css
    }

    /// Placeholder height for a given width, rounded to whole pixels.
    pub fn height_for_width(&self, width: i32) -> i32 {
        (width as f32 / self.quotient).round() as i32
    }
}

fn parse_component(part: &str, whole: &str) -> Result<f32> {
    let value: f32 = part
        .trim()
        .parse()
        .map_err(|_| LongstripError::Manifest(format!("bad aspect ratio '{whole}'")))?;
    if value <= 0.0 || !value.is_finite() {
        return Err(LongstripError::Manifest(format!(
            "bad aspect ratio '{whole}'"
        )));
    }
    Ok(value)
}

impl PartialEq for AspectRatio {
    fn eq(&self, other: &Self) -> bool {
        self.css == other.css
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css)
    }
}
