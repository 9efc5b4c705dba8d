// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Portable float maps.
//!
//! A text header `PF` (RGB) or `Pf` (grey), then width, height and a scale
//! factor, each separated by whitespace.  A single whitespace byte follows the
//! scale, then raw 32-bit floats, bottom row first.  A negative scale marks
//! little-endian samples; a magnitude other than 1 multiplies every sample.

use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::file_formats::{ByteOrder, FileFormat};
use crate::image::Image;
use crate::image::texel::{Resolution, Texel};
use crate::pixel_formats::PixelFormat;

const FORMAT: FileFormat = FileFormat::Pfm;
/// Longest header token accepted.
const MAX_WORD: usize = 64;

fn read_byte<R: Read>(reader: &mut R) -> Result<u8> {
    let mut byte = [0u8; 1];
    reader
        .read_exact(&mut byte)
        .map_err(|e| Error::from_read(FORMAT, e))?;
    Ok(byte[0])
}

/// Reads one whitespace-delimited header token, consuming exactly one
/// whitespace byte after it.
fn read_word<R: Read>(reader: &mut R) -> Result<String> {
    let mut byte = read_byte(reader)?;
    while byte.is_ascii_whitespace() {
        byte = read_byte(reader)?;
    }
    let mut word = Vec::new();
    while !byte.is_ascii_whitespace() {
        if word.len() == MAX_WORD {
            return Err(Error::malformed(FORMAT, "header token too long"));
        }
        word.push(byte);
        byte = read_byte(reader)?;
    }
    String::from_utf8(word).map_err(|_| Error::malformed(FORMAT, "header is not text"))
}

fn parse_dimension(word: &str, name: &str) -> Result<u32> {
    match word.parse::<u32>() {
        Ok(v) if v > 0 && v <= i32::MAX as u32 => Ok(v),
        _ => Err(Error::malformed(FORMAT, format!("bad {name} {word:?}"))),
    }
}

pub(crate) fn read<R: Read>(mut reader: R) -> Result<Image> {
    let channels = match read_word(&mut reader)?.as_str() {
        "PF" => 3,
        "Pf" => 1,
        _ => return Err(Error::BadSignature(FORMAT)),
    };
    let width = parse_dimension(&read_word(&mut reader)?, "width")?;
    let height = parse_dimension(&read_word(&mut reader)?, "height")?;
    let scale_word = read_word(&mut reader)?;
    let scale: f32 = match scale_word.parse::<f32>() {
        Ok(s) if s.is_finite() && s != 0.0 => s,
        _ => return Err(Error::malformed(FORMAT, format!("bad scale {scale_word:?}"))),
    };

    let resolution = Resolution::new(width, height);
    let sample_count = resolution
        .pixel_count()
        .checked_mul(channels)
        .ok_or_else(|| Error::malformed(FORMAT, "image too large"))?;
    let byte_count = sample_count
        .checked_mul(4)
        .ok_or_else(|| Error::malformed(FORMAT, "image too large"))?;

    //read through `take` so a lying header cannot force a huge allocation up front
    let mut bytes = Vec::new();
    (&mut reader)
        .take(byte_count as u64)
        .read_to_end(&mut bytes)?;
    if bytes.len() != byte_count {
        return Err(Error::Truncated(FORMAT));
    }

    let little_endian = scale < 0.0;
    let magnitude = scale.abs();
    let mut samples: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|b| {
            let b = [b[0], b[1], b[2], b[3]];
            if little_endian {
                f32::from_le_bytes(b)
            } else {
                f32::from_be_bytes(b)
            }
        })
        .collect();
    if magnitude != 1.0 {
        for s in &mut samples {
            *s *= magnitude;
        }
    }

    let format = PixelFormat::RGB32.with_channels(channels);
    let mut image = Image::from_f32(format, resolution, samples);
    //stored bottom row first
    image.flip_y();
    Ok(image)
}

pub(crate) fn write<W: Write>(image: &Image, mut writer: W, byte_order: ByteOrder) -> Result<()> {
    let resolution = image.resolution();
    let channels = image.channel_count();
    let (magic, scale) = match (channels, byte_order) {
        (3, ByteOrder::LittleEndian) => ("PF", "-1"),
        (3, ByteOrder::BigEndian) => ("PF", "1"),
        (_, ByteOrder::LittleEndian) => ("Pf", "-1"),
        (_, ByteOrder::BigEndian) => ("Pf", "1"),
    };
    write!(
        writer,
        "{magic}\n{} {}\n{scale}\n",
        resolution.width, resolution.height
    )?;

    let mut row = Vec::with_capacity(resolution.width as usize * channels * 4);
    for y in (0..resolution.height as i32).rev() {
        row.clear();
        for x in 0..resolution.width as i32 {
            let texel = Texel::new(x, y);
            for c in 0..channels {
                let v = image.channel(texel, c);
                let bytes = match byte_order {
                    ByteOrder::LittleEndian => v.to_le_bytes(),
                    ByteOrder::BigEndian => v.to_be_bytes(),
                };
                row.extend_from_slice(&bytes);
            }
        }
        writer.write_all(&row)?;
    }
    writer.flush()?;
    Ok(())
}
