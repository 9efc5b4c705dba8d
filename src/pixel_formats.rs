// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Pixel format definitions for in-memory images.
//!
//! Each [`PixelFormat`] encodes:
//!
//! - Number of channels (luminance or RGB)
//! - Storage type per channel (8-bit unorm, 16-bit half float, 32-bit float)
//! - Color encoding of 8-bit formats (linear or sRGB)
//!
//! The format is the single source of truth for an image's memory layout and
//! numeric policy: [`PixelFormat::channel_count`], [`PixelFormat::byte_width`]
//! and [`PixelFormat::encoding`] are total functions over the variants, and
//! nothing else in the crate branches on the format directly.
//!
//! # Available Formats
//!
//! | Format | Channels | Bytes per channel | Encoding |
//! |--------|----------|-------------------|----------|
//! | [`Y8`](PixelFormat::Y8) | 1 | 1 | linear unorm |
//! | [`SY8`](PixelFormat::SY8) | 1 | 1 | sRGB unorm |
//! | [`Y16`](PixelFormat::Y16) | 1 | 2 | half float |
//! | [`Y32`](PixelFormat::Y32) | 1 | 4 | float |
//! | [`RGB8`](PixelFormat::RGB8) | 3 | 1 | linear unorm |
//! | [`SRGB8`](PixelFormat::SRGB8) | 3 | 1 | sRGB unorm |
//! | [`RGB16`](PixelFormat::RGB16) | 3 | 2 | half float |
//! | [`RGB32`](PixelFormat::RGB32) | 3 | 4 | float |
//!
//! # Examples
//!
//! ```
//! use render_images::pixel_formats::{Encoding, PixelFormat};
//!
//! let format = PixelFormat::SRGB8;
//! assert_eq!(format.channel_count(), 3);
//! assert_eq!(format.byte_width(), 1);
//! assert_eq!(format.encoding(), Encoding::Unsigned8Srgb);
//! ```

/*
Quick note on type design.  The GPU-facing side of a renderer wants pixel formats as
zero-sized types so that `write(x, y, value)` can be typechecked against the format.

Images here are different: the format of an image read from disk is chosen by the
file contents, not by the caller, so it has to be a runtime value.  We keep the
per-format numeric policy in zero-sized codec types (see [codec]) and dispatch to
them from one enum.
 */
pub mod codec;
pub(crate) mod png_support;

use std::fmt::Display;

pub use half::f16;

/// Storage encoding of a single channel.
///
/// Selects the [`codec::ChannelCodec`] an image uses to move between
/// normalized `f32` values and stored scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// 8-bit unsigned, `0..=255` mapped linearly onto `0.0..=1.0`.
    Unsigned8Linear,
    /// 8-bit unsigned holding sRGB-encoded values.
    Unsigned8Srgb,
    /// IEEE 754 half-precision float.
    Half16Linear,
    /// IEEE 754 single-precision float.
    Float32Linear,
}

impl Encoding {
    /// Number of bytes used to store one channel.
    #[inline]
    pub const fn byte_width(self) -> usize {
        match self {
            Encoding::Unsigned8Linear | Encoding::Unsigned8Srgb => 1,
            Encoding::Half16Linear => 2,
            Encoding::Float32Linear => 4,
        }
    }

    /// Encodes `value` and decodes it again.
    ///
    /// This is the value an image of this encoding reports after
    /// `set_channel(.., value)`.
    ///
    /// ```
    /// use render_images::pixel_formats::Encoding;
    ///
    /// assert_eq!(Encoding::Float32Linear.round_trip(-0.25), -0.25);
    /// assert_eq!(Encoding::Unsigned8Linear.round_trip(2.0), 1.0);
    /// ```
    pub fn round_trip(self, value: f32) -> f32 {
        use codec::{ChannelCodec, Float32Linear, Half16Linear, Unsigned8Linear, Unsigned8Srgb};
        match self {
            Encoding::Unsigned8Linear => Unsigned8Linear::decode(Unsigned8Linear::encode(value)),
            Encoding::Unsigned8Srgb => Unsigned8Srgb::decode(Unsigned8Srgb::encode(value)),
            Encoding::Half16Linear => Half16Linear::decode(Half16Linear::encode(value)),
            Encoding::Float32Linear => Float32Linear::decode(Float32Linear::encode(value)),
        }
    }
}

/// The storage format of an [`Image`](crate::image::Image).
///
/// Formats cross {luminance, RGB} with the four channel [`Encoding`]s. No
/// image mixes encodings between channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum PixelFormat {
    /// One 8-bit linear channel.
    Y8,
    /// One 8-bit sRGB-encoded channel.
    SY8,
    /// One half-float channel.
    Y16,
    /// One float channel.
    Y32,
    /// Three 8-bit linear channels.
    RGB8,
    /// Three 8-bit sRGB-encoded channels.
    SRGB8,
    /// Three half-float channels.
    RGB16,
    /// Three float channels.
    RGB32,
}

impl PixelFormat {
    /// Every pixel format, luminance formats first.
    pub const ALL: [PixelFormat; 8] = [
        PixelFormat::Y8,
        PixelFormat::SY8,
        PixelFormat::Y16,
        PixelFormat::Y32,
        PixelFormat::RGB8,
        PixelFormat::SRGB8,
        PixelFormat::RGB16,
        PixelFormat::RGB32,
    ];

    /// Number of channels per pixel: 1 or 3.
    #[inline]
    pub const fn channel_count(self) -> usize {
        match self {
            PixelFormat::Y8 | PixelFormat::SY8 | PixelFormat::Y16 | PixelFormat::Y32 => 1,
            PixelFormat::RGB8 | PixelFormat::SRGB8 | PixelFormat::RGB16 | PixelFormat::RGB32 => 3,
        }
    }

    /// How each channel is stored.
    #[inline]
    pub const fn encoding(self) -> Encoding {
        match self {
            PixelFormat::Y8 | PixelFormat::RGB8 => Encoding::Unsigned8Linear,
            PixelFormat::SY8 | PixelFormat::SRGB8 => Encoding::Unsigned8Srgb,
            PixelFormat::Y16 | PixelFormat::RGB16 => Encoding::Half16Linear,
            PixelFormat::Y32 | PixelFormat::RGB32 => Encoding::Float32Linear,
        }
    }

    /// Number of bytes used to store one channel: 1, 2 or 4.
    #[inline]
    pub const fn byte_width(self) -> usize {
        self.encoding().byte_width()
    }

    /// Number of bytes used to store one pixel.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        self.channel_count() * self.byte_width()
    }

    /// True for formats stored as one byte per channel.
    #[inline]
    pub const fn is_8bit(self) -> bool {
        self.byte_width() == 1
    }
    /// True for half-float formats.
    #[inline]
    pub const fn is_16bit(self) -> bool {
        self.byte_width() == 2
    }
    /// True for single-precision float formats.
    #[inline]
    pub const fn is_32bit(self) -> bool {
        self.byte_width() == 4
    }
    /// Whether channels hold sRGB-encoded rather than linear values.
    #[inline]
    pub const fn is_srgb(self) -> bool {
        matches!(self.encoding(), Encoding::Unsigned8Srgb)
    }

    /// The format with the same encoding and `channels` channels.
    ///
    /// # Panics
    ///
    /// Panics unless `channels` is 1 or 3.
    ///
    /// ```
    /// use render_images::pixel_formats::PixelFormat;
    ///
    /// assert_eq!(PixelFormat::SRGB8.with_channels(1), PixelFormat::SY8);
    /// assert_eq!(PixelFormat::Y16.with_channels(3), PixelFormat::RGB16);
    /// ```
    pub fn with_channels(self, channels: usize) -> PixelFormat {
        match (channels, self.encoding()) {
            (1, Encoding::Unsigned8Linear) => PixelFormat::Y8,
            (1, Encoding::Unsigned8Srgb) => PixelFormat::SY8,
            (1, Encoding::Half16Linear) => PixelFormat::Y16,
            (1, Encoding::Float32Linear) => PixelFormat::Y32,
            (3, Encoding::Unsigned8Linear) => PixelFormat::RGB8,
            (3, Encoding::Unsigned8Srgb) => PixelFormat::SRGB8,
            (3, Encoding::Half16Linear) => PixelFormat::RGB16,
            (3, Encoding::Float32Linear) => PixelFormat::RGB32,
            _ => panic!("pixel formats have 1 or 3 channels, not {channels}"),
        }
    }
}

impl Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PixelFormat::Y8 => "Y8",
            PixelFormat::SY8 => "SY8",
            PixelFormat::Y16 => "Y16",
            PixelFormat::Y32 => "Y32",
            PixelFormat::RGB8 => "RGB8",
            PixelFormat::SRGB8 => "SRGB8",
            PixelFormat::RGB16 => "RGB16",
            PixelFormat::RGB32 => "RGB32",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::{Encoding, PixelFormat};

    #[test]
    fn geometry() {
        let expected = [
            (PixelFormat::Y8, 1, 1),
            (PixelFormat::SY8, 1, 1),
            (PixelFormat::Y16, 1, 2),
            (PixelFormat::Y32, 1, 4),
            (PixelFormat::RGB8, 3, 1),
            (PixelFormat::SRGB8, 3, 1),
            (PixelFormat::RGB16, 3, 2),
            (PixelFormat::RGB32, 3, 4),
        ];
        for (format, channels, width) in expected {
            assert_eq!(format.channel_count(), channels, "{format}");
            assert_eq!(format.byte_width(), width, "{format}");
            assert_eq!(format.bytes_per_pixel(), channels * width, "{format}");
        }
    }

    #[test]
    fn sibling_formats_keep_encoding() {
        for format in PixelFormat::ALL {
            for channels in [1, 3] {
                let sibling = format.with_channels(channels);
                assert_eq!(sibling.encoding(), format.encoding());
                assert_eq!(sibling.channel_count(), channels);
            }
        }
        assert!(PixelFormat::SY8.is_srgb());
        assert!(!PixelFormat::Y8.is_srgb());
        assert!(PixelFormat::RGB16.is_16bit());
        assert_eq!(Encoding::Half16Linear.byte_width(), 2);
    }

    #[test]
    #[should_panic]
    fn two_channels_is_not_a_format() {
        PixelFormat::RGB32.with_channels(2);
    }
}
