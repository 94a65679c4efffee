//! Brightness, contrast and saturation with CSS filter semantics.
//!
//! Values are percentages where 100 leaves the image unchanged. Filters run
//! in the order brightness, contrast, saturate, and each step clamps to the
//! valid channel range before the next one runs.

use crate::{Error, Result};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};

pub const MIN_PERCENT: u16 = 0;
pub const MAX_PERCENT: u16 = 200;
pub const NEUTRAL_PERCENT: u16 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustments {
    pub brightness: u16,
    pub contrast: u16,
    pub saturation: u16,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            brightness: NEUTRAL_PERCENT,
            contrast: NEUTRAL_PERCENT,
            saturation: NEUTRAL_PERCENT,
        }
    }
}

impl Adjustments {
    pub fn new(brightness: u16, contrast: u16, saturation: u16) -> Result<Self> {
        let adjustments = Self {
            brightness,
            contrast,
            saturation,
        };
        adjustments.validate()?;
        Ok(adjustments)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
        ] {
            if !(MIN_PERCENT..=MAX_PERCENT).contains(&value) {
                return Err(Error::InvalidInput(format!(
                    "{} must be between {}% and {}%, got {}%",
                    name, MIN_PERCENT, MAX_PERCENT, value
                )));
            }
        }
        Ok(())
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Same filter string a browser canvas would take.
    pub fn css_filter(&self) -> String {
        format!(
            "brightness({}%) contrast({}%) saturate({}%)",
            self.brightness, self.contrast, self.saturation
        )
    }

    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        if self.is_identity() {
            return image.clone();
        }

        let mut rgba: RgbaImage = image.to_rgba8();
        let brightness = factor(self.brightness);
        let contrast = factor(self.contrast);
        let saturation = factor(self.saturation).map(saturate_matrix);

        for pixel in rgba.pixels_mut() {
            let mut rgb = [0f32; 3];
            for (channel, value) in rgb.iter_mut().zip(pixel.0.iter()) {
                let mut v = f32::from(*value) / 255.0;
                if let Some(b) = brightness {
                    v = clamp_unit(v * b);
                }
                if let Some(c) = contrast {
                    v = clamp_unit((v - 0.5) * c + 0.5);
                }
                *channel = v;
            }

            if let Some(matrix) = &saturation {
                let source = rgb;
                for (row, out) in matrix.iter().zip(rgb.iter_mut()) {
                    *out = clamp_unit(row[0] * source[0] + row[1] * source[1] + row[2] * source[2]);
                }
            }

            for (value, out) in rgb.iter().zip(pixel.0.iter_mut()) {
                *out = (value * 255.0).round() as u8;
            }
        }

        DynamicImage::ImageRgba8(rgba)
    }
}

/// `None` at the neutral 100%.
fn factor(percent: u16) -> Option<f32> {
    (percent != NEUTRAL_PERCENT).then(|| f32::from(percent) / 100.0)
}

fn clamp_unit(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Filter Effects `saturate()` color matrix.
fn saturate_matrix(s: f32) -> [[f32; 3]; 3] {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}
