// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Truevision TGA.
//!
//! Reading goes through the `image` crate, which handles colormapped,
//! truecolor and greyscale files, raw or run-length encoded.  Alpha is
//! discarded.  Greyscale files read as [`SY8`](PixelFormat::SY8), everything
//! else as [`SRGB8`](PixelFormat::SRGB8).
//!
//! Writing goes through `tgar` and always produces uncompressed truecolor
//! rows with opaque alpha.  Greyscale images are written with R = G = B.

use std::io::{BufRead, Seek, Write};

use crate::error::{Error, Result};
use crate::file_formats::FileFormat;
use crate::image::Image;
use crate::image::texel::Resolution;
use crate::pixel_formats::PixelFormat;
use crate::srgb::linear_to_srgb8;

const FORMAT: FileFormat = FileFormat::Tga;

/// Largest decoded buffer we are willing to allocate for a single file.
///
/// The header alone decides the allocation size, so this bounds what a
/// hostile or corrupt header can ask for.
const MAX_ALLOC: u64 = 512 * 1024 * 1024;

pub(crate) fn read<R: BufRead + Seek>(reader: R) -> Result<Image> {
    let mut limits = ::image::Limits::default();
    limits.max_alloc = Some(MAX_ALLOC);
    let mut decoder = ::image::ImageReader::with_format(reader, ::image::ImageFormat::Tga);
    decoder.limits(limits);
    let decoded = decoder.decode().map_err(Error::from_tga)?;

    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(Error::malformed(FORMAT, "zero-sized image"));
    }
    let resolution = Resolution::new(width, height);
    if decoded.color().has_color() {
        Ok(Image::from_u8(PixelFormat::SRGB8, resolution, decoded.to_rgb8().into_raw()))
    } else {
        Ok(Image::from_u8(PixelFormat::SY8, resolution, decoded.to_luma8().into_raw()))
    }
}

pub(crate) fn write<W: Write>(image: &Image, mut writer: W) -> Result<()> {
    let resolution = image.resolution();
    let (width, height) = match (u16::try_from(resolution.width), u16::try_from(resolution.height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(Error::unsupported(
                FORMAT,
                format!("{}x{} exceeds 65535 pixels per side", resolution.width, resolution.height),
            ));
        }
    };

    let converted;
    let encoded: &[u8] = match image.u8_data() {
        Some(data) if image.format() == PixelFormat::SRGB8 => data,
        _ => {
            converted = image
                .channel_values()
                .into_iter()
                .map(linear_to_srgb8)
                .collect::<Vec<u8>>();
            &converted
        }
    };
    let pixels: Vec<tgar::PixelBGRA> = if image.channel_count() == 1 {
        encoded
            .iter()
            .map(|&y| tgar::PixelBGRA { b: y, g: y, r: y, a: 255 })
            .collect()
    } else {
        encoded
            .chunks_exact(3)
            .map(|rgb| tgar::PixelBGRA {
                b: rgb[2],
                g: rgb[1],
                r: rgb[0],
                a: 255,
            })
            .collect()
    };
    let tga = tgar::BGRA::new(width, height, &pixels);
    writer.write_all(&tga.into_data())?;
    writer.flush()?;
    Ok(())
}
