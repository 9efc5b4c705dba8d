// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Per-channel codecs between normalized `f32` values and stored scalars.

Each codec is a zero-sized type implementing the sealed [`ChannelCodec`] trait.
Encoding never fails: 8-bit codecs clamp their input to `[0, 1]` before
quantizing, so out-of-range values are saturated rather than rejected.

| Codec | Stored | Round trip |
|-------|--------|------------|
| [`Float32Linear`] | `f32` | exact |
| [`Half16Linear`] | [`f16`] | nearest half value |
| [`Unsigned8Linear`] | `u8` | within `0.501 / 255` of the clamped input |
| [`Unsigned8Srgb`] | `u8` | [`srgb8_to_linear`](crate::srgb::srgb8_to_linear) of [`linear_to_srgb8`](crate::srgb::linear_to_srgb8) |
*/

use std::fmt::Debug;

use crate::pixel_formats::{Encoding, f16};
use crate::srgb;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Scalar encode/decode for one channel [`Encoding`].
///
/// This trait is sealed; the four implementations below are the only ones.
pub trait ChannelCodec: sealed::Sealed {
    /// The stored representation of one channel.
    type Stored: Copy + Default + Debug + Send + Sync + 'static;

    /// The encoding this codec implements.
    const ENCODING: Encoding;

    /// Converts a normalized value to its stored representation.
    fn encode(value: f32) -> Self::Stored;

    /// Converts a stored value back to a normalized value.
    fn decode(stored: Self::Stored) -> f32;
}

/// Identity codec for 32-bit float channels.
#[derive(Debug, Clone, Copy)]
pub struct Float32Linear;
impl sealed::Sealed for Float32Linear {}
impl ChannelCodec for Float32Linear {
    type Stored = f32;
    const ENCODING: Encoding = Encoding::Float32Linear;

    #[inline]
    fn encode(value: f32) -> f32 {
        value
    }
    #[inline]
    fn decode(stored: f32) -> f32 {
        stored
    }
}

/// Half-precision codec: rounds to the nearest representable [`f16`].
#[derive(Debug, Clone, Copy)]
pub struct Half16Linear;
impl sealed::Sealed for Half16Linear {}
impl ChannelCodec for Half16Linear {
    type Stored = f16;
    const ENCODING: Encoding = Encoding::Half16Linear;

    #[inline]
    fn encode(value: f32) -> f16 {
        f16::from_f32(value)
    }
    #[inline]
    fn decode(stored: f16) -> f32 {
        stored.to_f32()
    }
}

/// Linear 8-bit codec.
#[derive(Debug, Clone, Copy)]
pub struct Unsigned8Linear;
impl sealed::Sealed for Unsigned8Linear {}
impl ChannelCodec for Unsigned8Linear {
    type Stored = u8;
    const ENCODING: Encoding = Encoding::Unsigned8Linear;

    #[inline]
    fn encode(value: f32) -> u8 {
        //NaN falls through clamp and saturates to 0 in the cast
        (value.clamp(0.0, 1.0) * 255.0).round() as u8
    }
    #[inline]
    fn decode(stored: u8) -> f32 {
        stored as f32 / 255.0
    }
}

/// sRGB 8-bit codec.
///
/// Encodes through the lookup-table sRGB curve and decodes through a
/// 256-entry table of the exact inverse curve.
#[derive(Debug, Clone, Copy)]
pub struct Unsigned8Srgb;
impl sealed::Sealed for Unsigned8Srgb {}
impl ChannelCodec for Unsigned8Srgb {
    type Stored = u8;
    const ENCODING: Encoding = Encoding::Unsigned8Srgb;

    #[inline]
    fn encode(value: f32) -> u8 {
        srgb::linear_to_srgb8(value)
    }
    #[inline]
    fn decode(stored: u8) -> f32 {
        srgb::srgb8_to_linear(stored)
    }
}
