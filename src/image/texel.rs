// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Integer lattice coordinates and image dimensions.

Coordinates follow the usual image convention:
- Origin (0, 0) is at the top-left
- X increases to the right
- Y increases downward

[`Texel`] coordinates are signed so that lookups outside an image can be expressed
and then resolved by a [`WrapMode`](crate::texel_provider::WrapMode).
*/

/// Integer texel coordinates.
///
/// # Examples
///
/// ```
/// use render_images::image::texel::{Resolution, Texel};
///
/// let texel = Texel::new(10, 20);
/// assert!(texel.is_inside(Resolution::new(16, 32)));
/// assert!(!Texel::new(-1, 0).is_inside(Resolution::new(16, 32)));
/// assert_eq!(Texel::ZERO, Texel::new(0, 0));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Texel {
    /// X coordinate (horizontal position)
    pub x: i32,
    /// Y coordinate (vertical position)
    pub y: i32,
}

impl Texel {
    /// The origin texel at coordinates (0, 0).
    pub const ZERO: Texel = Texel { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether the texel lies within `[0, width) × [0, height)`.
    #[inline]
    pub const fn is_inside(self, resolution: Resolution) -> bool {
        self.x >= 0
            && self.y >= 0
            && (self.x as i64) < resolution.width as i64
            && (self.y as i64) < resolution.height as i64
    }

    /// Converts in-bounds texel coordinates to a pixel index in row-major order.
    #[inline]
    pub(crate) const fn vec_offset(&self, width: u32) -> usize {
        width as usize * self.y as usize + self.x as usize
    }

    /// Converts a pixel index back to texel coordinates.
    #[inline]
    pub(crate) const fn from_vec_offset(width: u32, offset: usize) -> Texel {
        let y = offset / width as usize;
        let x = offset % width as usize;
        Texel {
            x: x as i32,
            y: y as i32,
        }
    }

    /// Offsets this texel, clamping the result to the resolution's bounds.
    ///
    /// ```
    /// use render_images::image::texel::{Resolution, Texel};
    ///
    /// let res = Resolution::new(10, 10);
    /// assert_eq!(Texel::new(5, 5).new_clamping(2, 1, res), Texel::new(7, 6));
    /// assert_eq!(Texel::new(9, 9).new_clamping(5, 5, res), Texel::new(9, 9));
    /// assert_eq!(Texel::new(0, 3).new_clamping(-4, -9, res), Texel::new(0, 0));
    /// ```
    #[inline]
    pub const fn new_clamping(self, dx: i32, dy: i32, resolution: Resolution) -> Self {
        Self {
            x: clamp_axis(self.x.saturating_add(dx), resolution.width),
            y: clamp_axis(self.y.saturating_add(dy), resolution.height),
        }
    }
}

#[inline]
pub(crate) const fn clamp_axis(v: i32, length: u32) -> i32 {
    let max = length as i64 - 1;
    if v < 0 {
        0
    } else if v as i64 > max {
        max as i32
    } else {
        v
    }
}

/// Width and height of an image, both positive.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// # Panics
    ///
    /// Panics if either dimension is zero or does not fit in an `i32`.
    pub const fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "image dimensions must be positive");
        assert!(
            width <= i32::MAX as u32 && height <= i32::MAX as u32,
            "image dimensions must fit texel coordinates"
        );
        Self { width, height }
    }

    /// Number of pixels.
    #[inline]
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Iterates over every texel in row-major order.
    ///
    /// ```
    /// use render_images::image::texel::{Resolution, Texel};
    ///
    /// let all: Vec<Texel> = Resolution::new(2, 2).texels().collect();
    /// assert_eq!(all, [Texel::new(0, 0), Texel::new(1, 0), Texel::new(0, 1), Texel::new(1, 1)]);
    /// ```
    pub fn texels(self) -> impl ExactSizeIterator<Item = Texel> {
        let width = self.width;
        (0..self.pixel_count()).map(move |offset| Texel::from_vec_offset(width, offset))
    }
}
