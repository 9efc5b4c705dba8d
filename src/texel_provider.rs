// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
A TexelProvider is a trait that allows random reading of texels, with wrap-around.

This is most commonly an [`Image`].  But it can also be a "virtual" source, such as
a function that generates pixel values.  Either way the provider adds two things
on top of the source:

- a [`WrapMode`] that resolves coordinates outside `[0, resolution)`
- a [`SpectrumType`] that tags how RGB texels become spectra

Providers never mutate their source.

# Examples

## Reading an image

```
use render_images::image::Image;
use render_images::image::texel::{Resolution, Texel};
use render_images::pixel_formats::PixelFormat;
use render_images::spectrum::SpectrumType;
use render_images::texel_provider::{ImageTexelProvider, TexelProvider, WrapMode};

let image = Image::new_with(PixelFormat::Y32, Resolution::new(4, 4), |texel, _| {
    (texel.x + texel.y) as f32
});
let provider = ImageTexelProvider::new(&image, WrapMode::Repeat, SpectrumType::Reflectance);
assert_eq!(provider.texel_scalar(0, Texel::new(2, 1)), 3.0);
// (-1, 5) repeats onto (3, 1)
assert_eq!(provider.texel_scalar(0, Texel::new(-1, 5)), 4.0);
```

## A virtual source

```
use render_images::image::texel::{Resolution, Texel};
use render_images::spectrum::{RgbSpectrum, SpectrumType};
use render_images::texel_provider::{FnTexelProvider, TexelProvider, WrapMode};

/// A checkerboard with 32-texel cells
let checker = FnTexelProvider::new(
    Resolution::new(256, 256),
    WrapMode::Black,
    SpectrumType::Reflectance,
    |texel: Texel, ty| {
        let v = if (texel.x / 32 + texel.y / 32) % 2 == 0 { 1.0 } else { 0.0 };
        RgbSpectrum::grey(v, ty)
    },
);
assert_eq!(checker.texel_scalar(0, Texel::new(0, 0)), 1.0);
assert_eq!(checker.texel_scalar(0, Texel::new(32, 0)), 0.0);
assert_eq!(checker.texel_scalar(0, Texel::new(-1, 0)), 0.0);
```
*/

use crate::image::Image;
use crate::image::texel::{Resolution, Texel, clamp_axis};
use crate::spectrum::{RgbSpectrum, SpectrumType};

/// Policy for texel coordinates outside an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    /// Saturate each axis to `[0, length - 1]`.
    #[default]
    Clamp,
    /// Wrap each axis modulo its length.
    Repeat,
    /// Out-of-bounds texels are zero.
    Black,
}

impl WrapMode {
    /// Resolves `texel` to an in-bounds texel, or `None` when the lookup is black.
    ///
    /// ```
    /// use render_images::image::texel::{Resolution, Texel};
    /// use render_images::texel_provider::WrapMode;
    ///
    /// let res = Resolution::new(4, 3);
    /// assert_eq!(WrapMode::Clamp.remap(Texel::new(-2, 7), res), Some(Texel::new(0, 2)));
    /// assert_eq!(WrapMode::Repeat.remap(Texel::new(-1, 7), res), Some(Texel::new(3, 1)));
    /// assert_eq!(WrapMode::Black.remap(Texel::new(4, 0), res), None);
    /// assert_eq!(WrapMode::Black.remap(Texel::new(3, 2), res), Some(Texel::new(3, 2)));
    /// ```
    pub fn remap(self, texel: Texel, resolution: Resolution) -> Option<Texel> {
        if texel.is_inside(resolution) {
            return Some(texel);
        }
        match self {
            WrapMode::Clamp => Some(Texel::new(
                clamp_axis(texel.x, resolution.width),
                clamp_axis(texel.y, resolution.height),
            )),
            WrapMode::Repeat => Some(Texel::new(
                repeat_axis(texel.x, resolution.width),
                repeat_axis(texel.y, resolution.height),
            )),
            WrapMode::Black => None,
        }
    }
}

#[inline]
fn repeat_axis(v: i32, length: u32) -> i32 {
    (v as i64).rem_euclid(length as i64) as i32
}

/// Read-only texel access for texture evaluation.
///
/// `level` addresses a resolution level of the source.  Providers in this crate
/// have a single level, 0; mip chains are built by callers on top of them.
pub trait TexelProvider {
    /// Size of level 0.
    fn resolution(&self) -> Resolution;

    fn wrap_mode(&self) -> WrapMode;

    fn spectrum_type(&self) -> SpectrumType;

    /// Reads a texel as a single value.
    ///
    /// Single-channel sources return the channel; RGB sources return luminance.
    ///
    /// # Panics
    ///
    /// Panics if `level` is not 0.
    fn texel_scalar(&self, level: usize, texel: Texel) -> f32;

    /// Reads a texel as a spectrum tagged with [`spectrum_type`](Self::spectrum_type).
    ///
    /// # Panics
    ///
    /// Panics if `level` is not 0.
    fn texel_spectrum(&self, level: usize, texel: Texel) -> RgbSpectrum;
}

#[inline]
fn check_level(level: usize) {
    assert_eq!(level, 0, "texel providers have a single resolution level");
}

/// A [`TexelProvider`] over an [`Image`].
///
/// `S` is anything that borrows an image: `&Image` for a provider bounded by a
/// borrow, or `Arc<Image>` for one that shares ownership.
#[derive(Debug, Clone)]
pub struct ImageTexelProvider<S> {
    image: S,
    wrap_mode: WrapMode,
    spectrum_type: SpectrumType,
}

impl<S: AsRef<Image>> ImageTexelProvider<S> {
    pub fn new(image: S, wrap_mode: WrapMode, spectrum_type: SpectrumType) -> Self {
        Self {
            image,
            wrap_mode,
            spectrum_type,
        }
    }

    pub fn image(&self) -> &Image {
        self.image.as_ref()
    }
}

impl<S: AsRef<Image>> TexelProvider for ImageTexelProvider<S> {
    fn resolution(&self) -> Resolution {
        self.image().resolution()
    }
    fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }
    fn spectrum_type(&self) -> SpectrumType {
        self.spectrum_type
    }

    fn texel_scalar(&self, level: usize, texel: Texel) -> f32 {
        check_level(level);
        match self.wrap_mode.remap(texel, self.resolution()) {
            Some(texel) => self.image().luminance(texel),
            None => 0.0,
        }
    }

    fn texel_spectrum(&self, level: usize, texel: Texel) -> RgbSpectrum {
        check_level(level);
        match self.wrap_mode.remap(texel, self.resolution()) {
            Some(texel) => self.image().spectrum(texel, self.spectrum_type),
            None => RgbSpectrum::zero(self.spectrum_type),
        }
    }
}

/// A [`TexelProvider`] whose texels are computed by a function.
///
/// The function is only called with in-bounds texels; wrapping is applied first.
#[derive(Debug, Clone)]
pub struct FnTexelProvider<F> {
    resolution: Resolution,
    wrap_mode: WrapMode,
    spectrum_type: SpectrumType,
    texel_fn: F,
}

impl<F: Fn(Texel, SpectrumType) -> RgbSpectrum> FnTexelProvider<F> {
    pub fn new(
        resolution: Resolution,
        wrap_mode: WrapMode,
        spectrum_type: SpectrumType,
        texel_fn: F,
    ) -> Self {
        Self {
            resolution,
            wrap_mode,
            spectrum_type,
            texel_fn,
        }
    }
}

impl<F: Fn(Texel, SpectrumType) -> RgbSpectrum> TexelProvider for FnTexelProvider<F> {
    fn resolution(&self) -> Resolution {
        self.resolution
    }
    fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }
    fn spectrum_type(&self) -> SpectrumType {
        self.spectrum_type
    }

    /// The luminance of the closure's spectrum.  Grey spectra return their
    /// component exactly, matching a one-channel image of the same values.
    fn texel_scalar(&self, level: usize, texel: Texel) -> f32 {
        self.texel_spectrum(level, texel).y()
    }

    fn texel_spectrum(&self, level: usize, texel: Texel) -> RgbSpectrum {
        check_level(level);
        match self.wrap_mode.remap(texel, self.resolution) {
            Some(texel) => (self.texel_fn)(texel, self.spectrum_type),
            None => RgbSpectrum::zero(self.spectrum_type),
        }
    }
}
