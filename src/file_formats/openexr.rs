// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! OpenEXR through the `exr` crate.
//!
//! Only the RGB channels of the first valid layer are read, at the largest
//! resolution level.  Samples are converted to half floats and kept unchanged
//! in an [`RGB16`](PixelFormat::RGB16) image.

use std::io::{BufRead, Seek, Write};

use exr::image::pixel_vec::PixelVec;
use exr::prelude::*;

use crate::error::{Error, Result};
use crate::file_formats::{ExrCompression, FileFormat};
use crate::image::Image;
use crate::image::texel::Resolution;
use crate::pixel_formats::{PixelFormat, f16};

pub(crate) const MAGIC: [u8; 4] = [0x76, 0x2f, 0x31, 0x01];

type RgbPixels = PixelVec<(f16, f16, f16)>;

fn dimension(v: usize, name: &str) -> Result<u32> {
    match u32::try_from(v) {
        Ok(v) if v > 0 && v <= i32::MAX as u32 => Ok(v),
        _ => Err(Error::malformed(FileFormat::Exr, format!("bad {name} {v}"))),
    }
}

pub(crate) fn read<R: BufRead + Seek + Send>(reader: R) -> Result<Image> {
    let exr_image = exr::prelude::read()
        .no_deep_data()
        .largest_resolution_level()
        .rgb_channels(RgbPixels::constructor, RgbPixels::set_pixel)
        .first_valid_layer()
        .all_attributes()
        .from_buffered(reader)?;

    let pixels = exr_image.layer_data.channel_data.pixels;
    let resolution = Resolution::new(
        dimension(pixels.resolution.x(), "width")?,
        dimension(pixels.resolution.y(), "height")?,
    );
    let mut data = Vec::with_capacity(resolution.pixel_count() * 3);
    for (r, g, b) in pixels.pixels {
        data.extend_from_slice(&[r, g, b]);
    }
    Ok(Image::from_f16(PixelFormat::RGB16, resolution, data))
}

pub(crate) fn write<W: Write + Seek>(image: &Image, writer: W, compression: ExrCompression) -> Result<()> {
    let resolution = image.resolution();
    let size = Vec2(resolution.width as usize, resolution.height as usize);
    let pixels: Vec<(f16, f16, f16)> = match image.f16_data() {
        Some(data) if image.channel_count() == 3 => {
            data.chunks_exact(3).map(|c| (c[0], c[1], c[2])).collect()
        }
        _ => resolution
            .texels()
            .map(|texel| {
                let channel = |c: usize| f16::from_f32(image.channel(texel, c.min(image.channel_count() - 1)));
                (channel(0), channel(1), channel(2))
            })
            .collect(),
    };

    let encoding = match compression {
        ExrCompression::None => Encoding::UNCOMPRESSED,
        ExrCompression::Fast => Encoding::FAST_LOSSLESS,
        ExrCompression::Small => Encoding::SMALL_LOSSLESS,
    };
    let exr_image = exr::prelude::Image::from_encoded_channels(
        size,
        encoding,
        SpecificChannels::rgb(PixelVec::new(size, pixels)),
    );
    exr_image.write().to_buffered(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::texel::Texel;
    use std::io::Cursor;

    fn encode(image: &Image, compression: ExrCompression) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        write(image, &mut out, compression).unwrap();
        out.into_inner()
    }

    fn half_round_trip(v: f32) -> f32 {
        f16::from_f32(v).to_f32()
    }

    #[test]
    fn every_compression_reads_back() {
        let resolution = Resolution::new(70, 3);
        let image = Image::new_with(PixelFormat::RGB32, resolution, |texel, c| {
            (texel.x as f32 - 20.0) * 0.37 + texel.y as f32 * 11.0 + c as f32
        });
        for compression in [ExrCompression::None, ExrCompression::Fast, ExrCompression::Small] {
            let bytes = encode(&image, compression);
            assert!(bytes.starts_with(&MAGIC));
            let read = read(Cursor::new(bytes)).unwrap();
            assert_eq!(read.format(), PixelFormat::RGB16);
            assert_eq!(read.resolution(), resolution);
            for texel in resolution.texels() {
                for c in 0..3 {
                    assert_eq!(read.channel(texel, c), half_round_trip(image.channel(texel, c)));
                }
            }
        }
    }

    #[test]
    fn half_images_are_unchanged() {
        let image = Image::new_with(PixelFormat::RGB16, Resolution::new(3, 2), |texel, c| {
            texel.x as f32 * 0.001 - c as f32 * 1000.5
        });
        let read = read(Cursor::new(encode(&image, ExrCompression::default()))).unwrap();
        assert_eq!(read, image);
    }

    #[test]
    fn grey_is_written_to_every_channel() {
        let image = Image::from_pixels(&[0.25, 4.0], PixelFormat::Y32, Resolution::new(2, 1));
        let read = read(Cursor::new(encode(&image, ExrCompression::None))).unwrap();
        assert_eq!(read.format(), PixelFormat::RGB16);
        for c in 0..3 {
            assert_eq!(read.channel(Texel::new(0, 0), c), 0.25);
            assert_eq!(read.channel(Texel::new(1, 0), c), 4.0);
        }
    }

    #[test]
    fn rejects_garbage() {
        let result = read(Cursor::new(b"not an exr file at all".to_vec()));
        assert!(matches!(result, Err(Error::Exr(_))));
    }
}
