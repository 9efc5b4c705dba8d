// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use png::{BitDepth, ColorType};

use crate::pixel_formats::PixelFormat;

/// How a [`PixelFormat`] is laid out in a PNG file.
///
/// PNG stores 8-bit sRGB, so every format maps to the sRGB layout with the
/// same channel count.
pub(crate) trait PngPixelFormat {
    fn png_color_type(self) -> ColorType;
    fn png_bit_depth(self) -> BitDepth;
}

impl PngPixelFormat for PixelFormat {
    fn png_color_type(self) -> ColorType {
        match self.channel_count() {
            1 => ColorType::Grayscale,
            _ => ColorType::Rgb,
        }
    }

    fn png_bit_depth(self) -> BitDepth {
        BitDepth::Eight
    }
}

/// The pixel format decoded rows of `color_type` are stored as, after palette
/// expansion.  Alpha channels are dropped.
pub(crate) fn pixel_format_for(color_type: ColorType) -> Option<PixelFormat> {
    match color_type {
        ColorType::Grayscale | ColorType::GrayscaleAlpha => Some(PixelFormat::SY8),
        ColorType::Rgb | ColorType::Rgba => Some(PixelFormat::SRGB8),
        ColorType::Indexed => None,
    }
}
