// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The sRGB transfer function.

Two forward transforms coexist:

- [`linear_to_srgb_full`] evaluates the IEC 61966-2-1 curve exactly.  It is the
  correctness reference.
- [`linear_to_srgb`] evaluates a piecewise-linear table of the same curve.  It avoids
  `powf` where a continuous result within the table's error bound is enough.

8-bit quantization ([`linear_to_srgb8`]) always uses the exact curve, so the chosen
code is the nearest code to the true sRGB value even where the table's error would
push a value across a rounding boundary.

The table has [`LINEAR_TO_SRGB_SEGMENTS`] segments of equal width over `[0, 1]`.  Its
average absolute error against the exact curve is below `6e-6` and its maximum error
is below `1.5e-3`.  It is monotonic, including across segment boundaries: each segment
interpolates between the exact curve's values at its two endpoints, and the
interpolation is carried out in `f64` where `lo + t * (hi - lo)` with `t < 1` can
never round past `hi`.

# Examples

```
use render_images::srgb::{linear_to_srgb, linear_to_srgb_full, srgb_to_linear};

let fast = linear_to_srgb(0.5);
let exact = linear_to_srgb_full(0.5);
assert!((fast - exact).abs() < 1.5e-3);
assert!((srgb_to_linear(exact) - 0.5).abs() < 1e-6);
```
*/

use std::sync::LazyLock;

/// Number of linear segments in the table behind [`linear_to_srgb`].
pub const LINEAR_TO_SRGB_SEGMENTS: usize = 1024;

/// Converts a linear value to sRGB using the exact transfer function.
///
/// Extended range values follow the same formula: negative values stay on
/// the linear segment and values above 1 continue the power curve.
///
/// - For values ≤ 0.0031308: `12.92 * linear`
/// - For values > 0.0031308: `1.055 * linear^(1/2.4) - 0.055`
///
/// ```
/// use render_images::srgb::linear_to_srgb_full;
///
/// let dark = linear_to_srgb_full(0.002);
/// assert!((dark - 0.02584).abs() < 0.0001);
/// let bright = linear_to_srgb_full(0.5);
/// assert!((bright - 0.7353569).abs() < 0.0001);
/// ```
#[inline]
pub fn linear_to_srgb_full(linear: f32) -> f32 {
    if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Converts an sRGB-encoded value to linear using the exact transfer function.
#[inline]
pub fn srgb_to_linear(encoded: f32) -> f32 {
    if encoded <= 0.04045 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb_f64(linear: f64) -> f64 {
    if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

fn srgb_to_linear_f64(encoded: f64) -> f64 {
    if encoded <= 0.04045 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}

/// Exact curve values at the segment endpoints `i / LINEAR_TO_SRGB_SEGMENTS`.
static LINEAR_TO_SRGB_KNOTS: LazyLock<[f32; LINEAR_TO_SRGB_SEGMENTS + 1]> = LazyLock::new(|| {
    let mut knots = [0.0; LINEAR_TO_SRGB_SEGMENTS + 1];
    for (i, knot) in knots.iter_mut().enumerate() {
        *knot = linear_to_srgb_f64(i as f64 / LINEAR_TO_SRGB_SEGMENTS as f64) as f32;
    }
    knots
});

/// Linear value of every 8-bit sRGB code.
static SRGB8_TO_LINEAR: LazyLock<[f32; 256]> = LazyLock::new(|| {
    let mut table = [0.0; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = srgb_to_linear_f64(i as f64 / 255.0) as f32;
    }
    table
});

/// Index of the table segment that `linear` falls in.
///
/// `linear` must already be clamped to `[0, 1]`; `1.0` maps to the last segment.
#[inline]
pub fn linear_to_srgb_segment(linear: f32) -> usize {
    ((linear * LINEAR_TO_SRGB_SEGMENTS as f32) as usize).min(LINEAR_TO_SRGB_SEGMENTS - 1)
}

/// Converts a linear value to sRGB using the piecewise-linear table.
///
/// Inputs are clamped to `[0, 1]`.
#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    if !(linear > 0.0) {
        //also catches NaN
        return 0.0;
    }
    if linear >= 1.0 {
        return 1.0;
    }
    let knots = &*LINEAR_TO_SRGB_KNOTS;
    let segment = linear_to_srgb_segment(linear);
    //exact in f64: the segment count is a power of two
    let t = linear as f64 * LINEAR_TO_SRGB_SEGMENTS as f64 - segment as f64;
    let lo = knots[segment] as f64;
    let hi = knots[segment + 1] as f64;
    (lo + t * (hi - lo)) as f32
}

/// Quantizes a linear value to the nearest 8-bit sRGB code.
///
/// Inputs are clamped to `[0, 1]`; NaN maps to 0.
///
/// ```
/// use render_images::srgb::{linear_to_srgb8, srgb8_to_linear};
///
/// assert_eq!(linear_to_srgb8(0.0), 0);
/// assert_eq!(linear_to_srgb8(1.0), 255);
/// assert_eq!(linear_to_srgb8(0.2159), 128);
/// assert!((srgb8_to_linear(128) - 0.2158605).abs() < 1e-6);
/// ```
#[inline]
pub fn linear_to_srgb8(linear: f32) -> u8 {
    if !(linear > 0.0) {
        return 0;
    }
    (255.0 * linear_to_srgb_full(linear.min(1.0))).round().clamp(0.0, 255.0) as u8
}

/// Converts an 8-bit sRGB code to a linear value.
#[inline]
pub fn srgb8_to_linear(encoded: u8) -> f32 {
    SRGB8_TO_LINEAR[encoded as usize]
}
