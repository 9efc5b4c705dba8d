// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! PNG through the `png` crate.
//!
//! Chunk checksums are verified while decoding.  Palettes are expanded,
//! 16-bit samples reduced to 8 and alpha discarded, so every file reads as
//! [`SRGB8`](PixelFormat::SRGB8) or [`SY8`](PixelFormat::SY8).

use std::io::{BufRead, Seek, SeekFrom, Write};

use crate::error::{Error, Result};
use crate::file_formats::FileFormat;
use crate::image::Image;
use crate::image::texel::Resolution;
use crate::pixel_formats::png_support::{PngPixelFormat, pixel_format_for};
use crate::pixel_formats::PixelFormat;
use crate::srgb::linear_to_srgb8;

const FORMAT: FileFormat = FileFormat::Png;

pub(crate) const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

pub(crate) fn read<R: BufRead + Seek>(mut reader: R) -> Result<Image> {
    let mut signature = [0u8; 8];
    reader
        .read_exact(&mut signature)
        .map_err(|e| Error::from_read(FORMAT, e))?;
    if signature != SIGNATURE {
        return Err(Error::BadSignature(FORMAT));
    }
    reader.seek(SeekFrom::Current(-(SIGNATURE.len() as i64)))?;

    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut png_reader = decoder.read_info()?;

    let (color_type, _) = png_reader.output_color_type();
    let format = pixel_format_for(color_type)
        .ok_or_else(|| Error::unsupported(FORMAT, format!("{color_type:?} output")))?;
    let (width, height) = {
        let info = png_reader.info();
        (info.width, info.height)
    };
    if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(Error::malformed(FORMAT, format!("bad size {width}x{height}")));
    }
    let resolution = Resolution::new(width, height);
    let samples = color_type.samples();
    let mut buf = vec![0u8; resolution.pixel_count() * samples];
    let frame = png_reader.next_frame(&mut buf)?;
    png_reader.finish()?;

    let channels = format.channel_count();
    let mut data = Vec::with_capacity(resolution.pixel_count() * channels);
    for row in buf.chunks_exact(frame.line_size).take(height as usize) {
        for pixel in row[..width as usize * samples].chunks_exact(samples) {
            data.extend_from_slice(&pixel[..channels]);
        }
    }
    Ok(Image::from_u8(format, resolution, data))
}

pub(crate) fn write<W: Write>(image: &Image, writer: W) -> Result<()> {
    let resolution = image.resolution();
    let format = image.format();
    let target = PixelFormat::SRGB8.with_channels(format.channel_count());
    let converted;
    let data: &[u8] = match image.u8_data() {
        Some(data) if format == target => data,
        _ => {
            converted = image
                .channel_values()
                .into_iter()
                .map(linear_to_srgb8)
                .collect::<Vec<u8>>();
            &converted
        }
    };

    let mut encoder = png::Encoder::new(writer, resolution.width, resolution.height);
    encoder.set_color(target.png_color_type());
    encoder.set_depth(target.png_bit_depth());
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(data)?;
    png_writer.finish()?;
    Ok(())
}
