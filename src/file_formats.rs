// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Image file reading and writing.

Four independent on-disk layouts share one read/write contract:

| [`FileFormat`] | Extension | Read as | Notes |
|----------------|-----------|---------|-------|
| [`Pfm`](FileFormat::Pfm) | `.pfm` | [`RGB32`](PixelFormat::RGB32) / [`Y32`](PixelFormat::Y32) | raw floats, bottom row first |
| [`Exr`](FileFormat::Exr) | `.exr` | [`RGB16`](PixelFormat::RGB16) | half-float OpenEXR |
| [`Tga`](FileFormat::Tga) | `.tga` | [`SRGB8`](PixelFormat::SRGB8) | Truevision TGA; greyscale files read as [`SY8`](PixelFormat::SY8) |
| [`Png`](FileFormat::Png) | `.png` | [`SRGB8`](PixelFormat::SRGB8) / [`SY8`](PixelFormat::SY8) | checksummed chunks |

The pixel format of an image read from a file is chosen by the file, never by the
caller.  Writing converts the image to the file's storage type as needed, so reading
it back gives the original's values within the file format's precision.

# Partial files

[`Image::write`] encodes into a hidden sibling file and renames it over the
destination only after encoding has succeeded and the data is flushed.  A failed
write removes the sibling and leaves the destination untouched.

# Example

```no_run
# //no_run due to file IO
use render_images::image::Image;
use render_images::image::texel::Resolution;
use render_images::pixel_formats::PixelFormat;

let image = Image::new(PixelFormat::RGB32, Resolution::new(16, 16));
image.write("frame.exr")?;
let read = Image::read("frame.exr")?;
assert_eq!(read.format(), PixelFormat::RGB16);
# Ok::<(), render_images::Error>(())
```
*/

mod openexr;
mod pfm;
mod png_codec;
mod tga;

use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use logwise::privacy::LogIt;

use crate::error::{Error, Result};
use crate::image::Image;
use crate::pixel_formats::PixelFormat;

/// A supported image file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Portable float map.
    Pfm,
    /// OpenEXR with half-float samples.
    Exr,
    /// Truevision TGA.
    Tga,
    /// Portable Network Graphics.
    Png,
}

impl FileFormat {
    pub const ALL: [FileFormat; 4] = [FileFormat::Pfm, FileFormat::Exr, FileFormat::Tga, FileFormat::Png];

    /// Looks up a format by file extension, ignoring case.
    ///
    /// ```
    /// use render_images::file_formats::FileFormat;
    ///
    /// assert_eq!(FileFormat::from_extension("EXR"), Some(FileFormat::Exr));
    /// assert_eq!(FileFormat::from_extension("jpg"), None);
    /// ```
    pub fn from_extension(extension: &str) -> Option<FileFormat> {
        let extension = extension.to_ascii_lowercase();
        match extension.as_str() {
            "pfm" => Some(FileFormat::Pfm),
            "exr" => Some(FileFormat::Exr),
            "tga" => Some(FileFormat::Tga),
            "png" => Some(FileFormat::Png),
            _ => None,
        }
    }

    /// Looks up a format by the extension of `path`.
    pub fn from_path(path: &Path) -> Result<FileFormat> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(FileFormat::from_extension)
            .ok_or_else(|| Error::UnsupportedExtension(path.to_path_buf()))
    }

    /// Identifies a format from the first bytes of a file.
    ///
    /// TGA files have no signature and are never identified this way.
    pub fn sniff(head: &[u8]) -> Option<FileFormat> {
        if head.starts_with(&png_codec::SIGNATURE) {
            Some(FileFormat::Png)
        } else if head.starts_with(&openexr::MAGIC) {
            Some(FileFormat::Exr)
        } else if head.len() >= 3
            && (head.starts_with(b"PF") || head.starts_with(b"Pf"))
            && head[2].is_ascii_whitespace()
        {
            Some(FileFormat::Pfm)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Pfm => "pfm",
            FileFormat::Exr => "exr",
            FileFormat::Tga => "tga",
            FileFormat::Png => "png",
        }
    }

    /// The pixel format an image with `channels` channels is stored as.
    pub fn native_format(self, channels: usize) -> PixelFormat {
        match self {
            FileFormat::Pfm => PixelFormat::RGB32.with_channels(channels),
            //grey images are written as R = G = B
            FileFormat::Exr => PixelFormat::RGB16,
            FileFormat::Tga => PixelFormat::SRGB8,
            FileFormat::Png => PixelFormat::SRGB8.with_channels(channels),
        }
    }

    /// Decodes an image from `reader`.
    pub fn read<R: BufRead + Seek + Send>(self, reader: R) -> Result<Image> {
        match self {
            FileFormat::Pfm => pfm::read(reader),
            FileFormat::Exr => openexr::read(reader),
            FileFormat::Tga => tga::read(reader),
            FileFormat::Png => png_codec::read(reader),
        }
    }

    /// Encodes `image` into `writer`.
    pub fn write<W: Write + Seek>(self, image: &Image, writer: W, config: &WriteConfig) -> Result<()> {
        let native = self.native_format(image.channel_count());
        if native != image.format() {
            logwise::trace_sync!(
                "converting {from} image to {to} for {file_format}",
                from = LogIt(&image.format()),
                to = LogIt(&native),
                file_format = LogIt(&self)
            );
        }
        match self {
            FileFormat::Pfm => pfm::write(image, writer, config.pfm_byte_order),
            FileFormat::Exr => openexr::write(image, writer, config.exr_compression),
            FileFormat::Tga => tga::write(image, writer),
            FileFormat::Png => png_codec::write(image, writer),
        }
    }
}

impl Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FileFormat::Pfm => "PFM",
            FileFormat::Exr => "OpenEXR",
            FileFormat::Tga => "TGA",
            FileFormat::Png => "PNG",
        };
        f.write_str(name)
    }
}

/// Byte order of PFM sample data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    #[default]
    LittleEndian,
    BigEndian,
}

/// Compression used for OpenEXR files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExrCompression {
    None,
    /// Run-length encoding.
    #[default]
    Fast,
    /// Zip compression.
    Small,
}

/// Options for writing image files.
///
/// Reading needs no options: everything is recorded in the file.
///
/// ```
/// use render_images::file_formats::{ByteOrder, ExrCompression, WriteConfig};
///
/// let config = WriteConfig {
///     exr_compression: ExrCompression::Small,
///     ..WriteConfig::default()
/// };
/// assert_eq!(config.pfm_byte_order, ByteOrder::LittleEndian);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteConfig {
    pub pfm_byte_order: ByteOrder,
    pub exr_compression: ExrCompression,
}

/// Where an image is encoded before it is renamed over `path`.
fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.partial"))
}

impl Image {
    /// Reads an image file.
    ///
    /// The format is identified from the file's first bytes, falling back to
    /// the extension for formats without a signature.
    pub fn read(path: impl AsRef<Path>) -> Result<Image> {
        let path = path.as_ref();
        let result = read_path(path);
        match &result {
            Ok(image) => {
                logwise::info_sync!(
                    "read {format} {width}x{height} image from {path}",
                    format = LogIt(&image.format()),
                    width = image.resolution().width,
                    height = image.resolution().height,
                    path = LogIt(path)
                );
            }
            Err(e) => {
                logwise::warn_sync!(
                    "failed to read {path}: {error}",
                    path = LogIt(path),
                    error = LogIt(e)
                );
            }
        }
        result
    }

    /// Writes the image with the default [`WriteConfig`], choosing the file
    /// format from the extension.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_with(path, &WriteConfig::default())
    }

    /// Writes the image, choosing the file format from the extension.
    pub fn write_with(&self, path: impl AsRef<Path>, config: &WriteConfig) -> Result<()> {
        let path = path.as_ref();
        let result = write_path(self, path, config);
        match &result {
            Ok(()) => {
                logwise::info_sync!(
                    "wrote {format} {width}x{height} image to {path}",
                    format = LogIt(&self.format()),
                    width = self.resolution().width,
                    height = self.resolution().height,
                    path = LogIt(path)
                );
            }
            Err(e) => {
                logwise::warn_sync!(
                    "failed to write {path}: {error}",
                    path = LogIt(path),
                    error = LogIt(e)
                );
            }
        }
        result
    }
}

fn read_path(path: &Path) -> Result<Image> {
    let mut reader = BufReader::new(File::open(path)?);
    let sniffed = FileFormat::sniff(reader.fill_buf()?);
    let format = match sniffed {
        Some(format) => format,
        None => FileFormat::from_path(path)?,
    };
    format.read(reader)
}

fn write_path(image: &Image, path: &Path, config: &WriteConfig) -> Result<()> {
    let format = FileFormat::from_path(path)?;
    let partial = partial_path(path);
    let result = (|| -> Result<()> {
        let mut writer = BufWriter::new(File::create(&partial)?);
        format.write(image, &mut writer, config)?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        std::fs::rename(&partial, path)?;
        Ok(())
    })();
    if result.is_err() {
        //may not exist if create failed
        let _ = std::fs::remove_file(&partial);
    }
    result
}
