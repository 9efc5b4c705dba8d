// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! In-memory images.

An [`Image`] owns a contiguous pixel store tagged with a [`PixelFormat`] and a
[`Resolution`].  All access goes through normalized `f32` channel values; the format's
[`ChannelCodec`] converts them to and from the stored scalars.

# Lifecycle

Images are built and populated single-threaded: zero-filled with [`Image::new`],
from normalized values with [`Image::from_pixels`], or by a file codec with
[`Image::read`].  Once populated, share them read-only through `&Image` or
[`Image::into_shared`]; nothing mutates an image through a shared reference, so
any number of [`TexelProvider`](crate::texel_provider::TexelProvider)s may read
one concurrently without locks.

# Contract violations

Accessing a texel outside the resolution, or a channel the format does not have,
panics.  These are programming errors, not recoverable conditions.

# Example

```
use render_images::image::Image;
use render_images::image::texel::{Resolution, Texel};
use render_images::pixel_formats::PixelFormat;

let mut image = Image::new(PixelFormat::Y8, Resolution::new(4, 4));
image.set_channel(Texel::new(1, 2), 0, 0.5);
assert!((image.channel(Texel::new(1, 2), 0) - 0.5).abs() <= 0.501 / 255.0);
assert_eq!(image.bytes_used(), 16);
```
*/

pub mod texel;

use std::sync::Arc;

use crate::pixel_formats::codec::{
    ChannelCodec, Float32Linear, Half16Linear, Unsigned8Linear, Unsigned8Srgb,
};
use crate::pixel_formats::{Encoding, PixelFormat, f16};
use crate::spectrum::{self, RgbSpectrum, SpectrumType};
use texel::{Resolution, Texel};

/// Typed backing storage.  The variant always matches the image format's encoding.
#[derive(Debug, Clone, PartialEq)]
enum PixelStore {
    U8(Vec<u8>),
    F16(Vec<f16>),
    F32(Vec<f32>),
}

impl PixelStore {
    fn zeroed(encoding: Encoding, len: usize) -> Self {
        match encoding {
            Encoding::Unsigned8Linear | Encoding::Unsigned8Srgb => PixelStore::U8(vec![0; len]),
            Encoding::Half16Linear => PixelStore::F16(vec![f16::ZERO; len]),
            Encoding::Float32Linear => PixelStore::F32(vec![0.0; len]),
        }
    }

    fn len(&self) -> usize {
        match self {
            PixelStore::U8(d) => d.len(),
            PixelStore::F16(d) => d.len(),
            PixelStore::F32(d) => d.len(),
        }
    }

    fn scalar_size(&self) -> usize {
        match self {
            PixelStore::U8(_) => std::mem::size_of::<u8>(),
            PixelStore::F16(_) => std::mem::size_of::<f16>(),
            PixelStore::F32(_) => std::mem::size_of::<f32>(),
        }
    }
}

/// A 2D raster of pixels in one [`PixelFormat`].
///
/// The store is row-major, top row first, with the channels of each pixel
/// adjacent.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    format: PixelFormat,
    resolution: Resolution,
    store: PixelStore,
}

impl Image {
    /// Creates a zero-filled image.
    ///
    /// ```
    /// use render_images::image::Image;
    /// use render_images::image::texel::{Resolution, Texel};
    /// use render_images::pixel_formats::PixelFormat;
    ///
    /// let image = Image::new(PixelFormat::RGB16, Resolution::new(4, 16));
    /// assert_eq!(image.bytes_used(), 2 * 3 * 4 * 16);
    /// assert_eq!(image.channel(Texel::new(3, 15), 2), 0.0);
    /// ```
    pub fn new(format: PixelFormat, resolution: Resolution) -> Self {
        let len = resolution.pixel_count() * format.channel_count();
        Self {
            format,
            resolution,
            store: PixelStore::zeroed(format.encoding(), len),
        }
    }

    /// Creates an image from normalized channel values.
    ///
    /// `pixels` holds `channel_count` values per pixel in row-major order. Every
    /// value is encoded through the format's codec, which is where 8-bit and half
    /// formats lose precision.
    ///
    /// # Panics
    ///
    /// Panics if `pixels` does not hold exactly one value per channel per pixel.
    pub fn from_pixels(pixels: &[f32], format: PixelFormat, resolution: Resolution) -> Self {
        let channels = format.channel_count();
        assert_eq!(
            pixels.len(),
            resolution.pixel_count() * channels,
            "{format} image of {}x{} needs one value per channel",
            resolution.width,
            resolution.height
        );
        Self::new_with(format, resolution, |texel, c| {
            pixels[texel.vec_offset(resolution.width) * channels + c]
        })
    }

    /// Creates an image with channel values computed by a function.
    ///
    /// ```
    /// use render_images::image::Image;
    /// use render_images::image::texel::{Resolution, Texel};
    /// use render_images::pixel_formats::PixelFormat;
    ///
    /// // A horizontal gradient
    /// let image = Image::new_with(PixelFormat::Y32, Resolution::new(8, 2), |texel, _| {
    ///     texel.x as f32 / 8.0
    /// });
    /// assert_eq!(image.channel(Texel::new(4, 1), 0), 0.5);
    /// ```
    pub fn new_with<F: FnMut(Texel, usize) -> f32>(
        format: PixelFormat,
        resolution: Resolution,
        mut initialize_with: F,
    ) -> Self {
        let mut image = Self::new(format, resolution);
        for texel in resolution.texels() {
            for c in 0..format.channel_count() {
                image.set_channel(texel, c, initialize_with(texel, c));
            }
        }
        image
    }

    /// Wraps an existing 8-bit store.
    pub(crate) fn from_u8(format: PixelFormat, resolution: Resolution, data: Vec<u8>) -> Self {
        assert!(format.is_8bit(), "{format} is not an 8-bit format");
        Self::from_store(format, resolution, PixelStore::U8(data))
    }

    /// Wraps an existing half-float store.
    pub(crate) fn from_f16(format: PixelFormat, resolution: Resolution, data: Vec<f16>) -> Self {
        assert!(format.is_16bit(), "{format} is not a half-float format");
        Self::from_store(format, resolution, PixelStore::F16(data))
    }

    /// Wraps an existing float store.
    pub(crate) fn from_f32(format: PixelFormat, resolution: Resolution, data: Vec<f32>) -> Self {
        assert!(format.is_32bit(), "{format} is not a float format");
        Self::from_store(format, resolution, PixelStore::F32(data))
    }

    fn from_store(format: PixelFormat, resolution: Resolution, store: PixelStore) -> Self {
        assert_eq!(store.len(), resolution.pixel_count() * format.channel_count());
        Self {
            format,
            resolution,
            store,
        }
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }
    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.format.channel_count()
    }

    /// Size of the pixel store in bytes.
    ///
    /// Always `width * height * channel_count * byte_width`.
    pub fn bytes_used(&self) -> usize {
        self.store.len() * self.store.scalar_size()
    }

    /// The raw 8-bit store, for 8-bit formats.
    pub(crate) fn u8_data(&self) -> Option<&[u8]> {
        match &self.store {
            PixelStore::U8(d) => Some(d),
            _ => None,
        }
    }

    /// The raw half-float store, for half formats.
    pub(crate) fn f16_data(&self) -> Option<&[f16]> {
        match &self.store {
            PixelStore::F16(d) => Some(d),
            _ => None,
        }
    }

    #[inline]
    fn offset(&self, texel: Texel, channel: usize) -> usize {
        assert!(
            texel.is_inside(self.resolution),
            "texel ({}, {}) outside {}x{} image",
            texel.x,
            texel.y,
            self.resolution.width,
            self.resolution.height
        );
        assert!(
            channel < self.channel_count(),
            "channel {channel} out of range for {}",
            self.format
        );
        texel.vec_offset(self.resolution.width) * self.channel_count() + channel
    }

    #[inline]
    fn decode_at(&self, offset: usize) -> f32 {
        match (&self.store, self.format.encoding()) {
            (PixelStore::U8(d), Encoding::Unsigned8Linear) => Unsigned8Linear::decode(d[offset]),
            (PixelStore::U8(d), Encoding::Unsigned8Srgb) => Unsigned8Srgb::decode(d[offset]),
            (PixelStore::F16(d), Encoding::Half16Linear) => Half16Linear::decode(d[offset]),
            (PixelStore::F32(d), Encoding::Float32Linear) => Float32Linear::decode(d[offset]),
            _ => unreachable!("pixel store does not match {}", self.format),
        }
    }

    /// Writes one channel of one pixel, encoding through the format's codec.
    ///
    /// 8-bit formats clamp `value` to `[0, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if `texel` is outside the image or `channel` is not a channel of the format.
    pub fn set_channel(&mut self, texel: Texel, channel: usize, value: f32) {
        let offset = self.offset(texel, channel);
        match (&mut self.store, self.format.encoding()) {
            (PixelStore::U8(d), Encoding::Unsigned8Linear) => {
                d[offset] = Unsigned8Linear::encode(value)
            }
            (PixelStore::U8(d), Encoding::Unsigned8Srgb) => d[offset] = Unsigned8Srgb::encode(value),
            (PixelStore::F16(d), Encoding::Half16Linear) => d[offset] = Half16Linear::encode(value),
            (PixelStore::F32(d), Encoding::Float32Linear) => d[offset] = Float32Linear::encode(value),
            _ => unreachable!("pixel store does not match {}", self.format),
        }
    }

    /// Reads one channel of one pixel as a normalized value.
    ///
    /// # Panics
    ///
    /// Panics if `texel` is outside the image or `channel` is not a channel of the format.
    pub fn channel(&self, texel: Texel, channel: usize) -> f32 {
        self.decode_at(self.offset(texel, channel))
    }

    /// Reads the luminance of one pixel.
    ///
    /// For single-channel formats this is exactly `channel(texel, 0)`.  For RGB
    /// formats it is the Rec. 709 luminance of the decoded channels.
    pub fn luminance(&self, texel: Texel) -> f32 {
        match self.channel_count() {
            1 => self.channel(texel, 0),
            _ => spectrum::luminance(self.rgb(texel)),
        }
    }

    fn rgb(&self, texel: Texel) -> [f32; 3] {
        let base = self.offset(texel, 0);
        [
            self.decode_at(base),
            self.decode_at(base + 1),
            self.decode_at(base + 2),
        ]
    }

    /// Reads one pixel as a spectral value.
    ///
    /// RGB formats reconstruct the spectrum from the three decoded channels, so
    /// [`RgbSpectrum::to_rgb`] gives back exactly `channel(texel, 0..3)`.
    /// Single-channel formats give a grey spectrum.
    pub fn spectrum(&self, texel: Texel, spectrum_type: SpectrumType) -> RgbSpectrum {
        match self.channel_count() {
            1 => RgbSpectrum::grey(self.channel(texel, 0), spectrum_type),
            _ => RgbSpectrum::from_rgb(self.rgb(texel), spectrum_type),
        }
    }

    /// Every decoded channel value, in storage order.
    pub fn channel_values(&self) -> Vec<f32> {
        (0..self.store.len()).map(|i| self.decode_at(i)).collect()
    }

    /// Re-encodes the image in another format with the same channel count.
    ///
    /// # Panics
    ///
    /// Panics if `format` has a different channel count.
    pub fn convert_to_format(&self, format: PixelFormat) -> Image {
        assert_eq!(
            format.channel_count(),
            self.channel_count(),
            "cannot convert {} to {format}",
            self.format
        );
        if format == self.format {
            return self.clone();
        }
        Image::from_pixels(&self.channel_values(), format, self.resolution)
    }

    /// Reverses the order of the rows.
    pub fn flip_y(&mut self) {
        let row_len = self.resolution.width as usize * self.channel_count();
        match &mut self.store {
            PixelStore::U8(d) => flip_rows(d, row_len),
            PixelStore::F16(d) => flip_rows(d, row_len),
            PixelStore::F32(d) => flip_rows(d, row_len),
        }
    }

    /// Publishes the image for shared read-only access.
    pub fn into_shared(self) -> Arc<Image> {
        Arc::new(self)
    }
}

impl AsRef<Image> for Image {
    fn as_ref(&self) -> &Image {
        self
    }
}

fn flip_rows<T>(data: &mut [T], row_len: usize) {
    let rows = data.len() / row_len;
    for y in 0..rows / 2 {
        let (top, bottom) = data.split_at_mut((rows - 1 - y) * row_len);
        top[y * row_len..(y + 1) * row_len].swap_with_slice(&mut bottom[..row_len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srgb;

    /// Deterministic test pattern; some values fall outside `[0, 1]`.
    fn float_pixels(res: Resolution, channels: usize) -> Vec<f32> {
        let mut p = Vec::new();
        for y in 0..res.height {
            for x in 0..res.width {
                for c in 0..channels {
                    p.push(
                        (-0.25
                            + 2.0 * (c as f64 + 3.0 * x as f64 + 3.0 * y as f64 * res.width as f64)
                                / (res.width as f64 * res.height as f64)) as f32,
                    );
                }
            }
        }
        p
    }

    /// The linear value of the nearest 8-bit sRGB code, from the exact curve.
    fn srgb_round_trip(v: f32) -> f32 {
        let code = (255.0 * srgb::linear_to_srgb_full(v.clamp(0.0, 1.0))).round();
        srgb::srgb_to_linear(code / 255.0)
    }

    fn assert_srgb_round_trip(got: f32, original: f32) {
        let expected = srgb_round_trip(original);
        assert!((got - expected).abs() < 1e-6, "{original} read back as {got}, expected {expected}");
    }

    fn check_round_trip(format: PixelFormat, got: f32, original: f32) {
        match format.encoding() {
            Encoding::Float32Linear => assert_eq!(got, original),
            Encoding::Half16Linear => assert_eq!(got, f16::from_f32(original).to_f32()),
            Encoding::Unsigned8Linear => {
                assert!((got - original.clamp(0.0, 1.0)).abs() <= 0.501 / 255.0)
            }
            Encoding::Unsigned8Srgb => assert_srgb_round_trip(got, original),
        }
    }

    #[test]
    fn basics() {
        let res = Resolution::new(4, 8);
        for format in PixelFormat::ALL {
            let image = Image::new(format, res);
            assert_eq!(image.channel_count(), format.channel_count());
            assert_eq!(
                image.bytes_used(),
                format.byte_width() * format.channel_count() * 4 * 8,
                "{format}"
            );
        }
        let rgb32 = Image::new(PixelFormat::RGB32, Resolution::new(4, 32));
        assert_eq!(rgb32.bytes_used(), 4 * 3 * 4 * 32);
    }

    #[test]
    fn get_set_y() {
        let res = Resolution::new(9, 3);
        let y_pixels = float_pixels(res, 1);
        for format in [PixelFormat::Y8, PixelFormat::SY8, PixelFormat::Y16, PixelFormat::Y32] {
            let mut image = Image::new(format, res);
            for texel in res.texels() {
                image.set_channel(texel, 0, y_pixels[texel.vec_offset(res.width)]);
            }
            for texel in res.texels() {
                let v = image.channel(texel, 0);
                assert_eq!(v, image.luminance(texel));
                check_round_trip(format, v, y_pixels[texel.vec_offset(res.width)]);
            }
        }
    }

    #[test]
    fn get_set_rgb() {
        let res = Resolution::new(7, 32);
        let rgb_pixels = float_pixels(res, 3);
        for format in [
            PixelFormat::RGB8,
            PixelFormat::SRGB8,
            PixelFormat::RGB16,
            PixelFormat::RGB32,
        ] {
            let mut image = Image::new(format, res);
            for texel in res.texels() {
                for c in 0..3 {
                    image.set_channel(texel, c, rgb_pixels[3 * texel.vec_offset(res.width) + c]);
                }
            }
            for texel in res.texels() {
                let rgb = image.spectrum(texel, SpectrumType::Reflectance).to_rgb();
                for c in 0..3 {
                    assert_eq!(rgb[c], image.channel(texel, c));
                    check_round_trip(format, rgb[c], rgb_pixels[3 * texel.vec_offset(res.width) + c]);
                }
            }
        }
    }

    #[test]
    fn from_pixels_matches_set_channel() {
        let res = Resolution::new(5, 6);
        let pixels = float_pixels(res, 3);
        for format in [PixelFormat::SRGB8, PixelFormat::RGB16] {
            let bulk = Image::from_pixels(&pixels, format, res);
            let mut single = Image::new(format, res);
            for texel in res.texels() {
                for c in 0..3 {
                    single.set_channel(texel, c, pixels[3 * texel.vec_offset(res.width) + c]);
                }
            }
            assert_eq!(bulk, single);
        }
    }

    #[test]
    fn luminance_of_rgb() {
        let mut image = Image::new(PixelFormat::RGB32, Resolution::new(1, 1));
        for c in 0..3 {
            image.set_channel(Texel::ZERO, c, 1.0);
        }
        assert!((image.luminance(Texel::ZERO) - 1.0).abs() < 1e-6);
        let grey = Image::from_pixels(&[0.75], PixelFormat::Y32, Resolution::new(1, 1));
        assert_eq!(
            grey.spectrum(Texel::ZERO, SpectrumType::Illuminant).to_rgb(),
            [0.75, 0.75, 0.75]
        );
    }

    #[test]
    fn flip_y_reverses_rows() {
        let res = Resolution::new(2, 3);
        let pixels = float_pixels(res, 1);
        let mut image = Image::from_pixels(&pixels, PixelFormat::Y32, res);
        image.flip_y();
        for texel in res.texels() {
            let mirrored = Texel::new(texel.x, res.height as i32 - 1 - texel.y);
            assert_eq!(image.channel(texel, 0), pixels[mirrored.vec_offset(res.width)]);
        }
        image.flip_y();
        assert_eq!(image.channel_values(), pixels);
    }

    #[test]
    fn convert_between_formats() {
        let res = Resolution::new(4, 4);
        let pixels = float_pixels(res, 3);
        let float = Image::from_pixels(&pixels, PixelFormat::RGB32, res);
        let srgb8 = float.convert_to_format(PixelFormat::SRGB8);
        assert_eq!(srgb8.format(), PixelFormat::SRGB8);
        for (got, original) in srgb8.channel_values().into_iter().zip(&pixels) {
            assert_srgb_round_trip(got, *original);
        }
        assert_eq!(float.convert_to_format(PixelFormat::RGB32), float);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_texel() {
        let image = Image::new(PixelFormat::Y8, Resolution::new(2, 2));
        image.channel(Texel::new(2, 0), 0);
    }

    #[test]
    #[should_panic]
    fn out_of_range_channel() {
        let mut image = Image::new(PixelFormat::Y32, Resolution::new(2, 2));
        image.set_channel(Texel::ZERO, 1, 0.0);
    }

    #[test]
    #[should_panic]
    fn wrong_pixel_count() {
        Image::from_pixels(&[0.0; 5], PixelFormat::RGB8, Resolution::new(2, 1));
    }

    #[test]
    fn shared_images_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        let shared = Image::new(PixelFormat::Y8, Resolution::new(1, 1)).into_shared();
        assert_send_sync(&shared);
    }
}
