// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Spectral values reconstructed from RGB texels.
//!
//! Images store RGB; shading code consumes spectra.  The reconstruction here
//! is the RGB representation itself, so projecting an [`RgbSpectrum`] back to
//! RGB returns exactly the three channel values it was built from.  The
//! [`SpectrumType`] records whether the triple describes a surface
//! reflectance or a light emission, for evaluators that distinguish the two.

/// How an RGB triple is interpreted when it becomes a spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpectrumType {
    /// A surface reflectance, nominally within `[0, 1]`.
    #[default]
    Reflectance,
    /// A light emission or other unbounded quantity.
    Illuminant,
}

/// A spectral value in the linear RGB basis.
///
/// # Examples
///
/// ```
/// use render_images::spectrum::{RgbSpectrum, SpectrumType};
///
/// let s = RgbSpectrum::from_rgb([0.25, 0.5, 1.0], SpectrumType::Illuminant);
/// assert_eq!(s.to_rgb(), [0.25, 0.5, 1.0]);
/// assert_eq!(s.spectrum_type(), SpectrumType::Illuminant);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbSpectrum {
    r: f32,
    g: f32,
    b: f32,
    spectrum_type: SpectrumType,
}

impl RgbSpectrum {
    /// A black spectrum.
    pub const fn zero(spectrum_type: SpectrumType) -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            spectrum_type,
        }
    }

    /// Builds a spectrum from linear RGB.
    pub const fn from_rgb(rgb: [f32; 3], spectrum_type: SpectrumType) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            spectrum_type,
        }
    }

    /// A spectrum with `value` in every component.
    pub const fn grey(value: f32, spectrum_type: SpectrumType) -> Self {
        Self::from_rgb([value, value, value], spectrum_type)
    }

    /// Projects the spectrum back to linear RGB.
    pub const fn to_rgb(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Whether the triple is a reflectance or an emission.
    pub const fn spectrum_type(&self) -> SpectrumType {
        self.spectrum_type
    }

    /// Luminance using the Rec. 709 Y weights.
    pub fn y(&self) -> f32 {
        luminance([self.r, self.g, self.b])
    }

    /// True when every component is zero.
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }
}

/// Rec. 709 luminance of a linear RGB triple.
///
/// A grey triple returns its component unchanged, so a grey texel has the same
/// scalar value whether it is stored with one channel or three.
#[inline]
pub fn luminance(rgb: [f32; 3]) -> f32 {
    let [r, g, b] = rgb;
    if r == g && g == b {
        return r;
    }
    0.212671 * r + 0.715160 * g + 0.072169 * b
}
