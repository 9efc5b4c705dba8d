// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Reading and writing image files on disk.

use std::path::PathBuf;

use render_images::Error;
use render_images::file_formats::{ByteOrder, ExrCompression, FileFormat, WriteConfig};
use render_images::image::Image;
use render_images::image::texel::{Resolution, Texel};
use render_images::pixel_formats::{PixelFormat, f16};
use render_images::srgb::{linear_to_srgb_full, srgb_to_linear};

/// A fresh path in the system temp directory.
fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("render_images_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    path
}

fn partial_exists(path: &PathBuf) -> bool {
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    path.with_file_name(format!(".{name}.partial")).exists()
}

/// Values that cover negative numbers, [0, 1] and values above 1.
fn ramp(format: PixelFormat, resolution: Resolution) -> Image {
    let (w, h) = (resolution.width as f32, resolution.height as f32);
    Image::new_with(format, resolution, |texel: Texel, c| {
        -0.25 + 2.0 * (c as f32 + 3.0 * texel.x as f32 + 3.0 * texel.y as f32 * w) / (w * h)
    })
}

/// The linear value of the nearest 8-bit sRGB code, from the exact curve.
fn srgb_round_trip(v: f32) -> f32 {
    let code = (255.0 * linear_to_srgb_full(v.clamp(0.0, 1.0))).round();
    srgb_to_linear(code / 255.0)
}

fn half_round_trip(v: f32) -> f32 {
    f16::from_f32(v).to_f32()
}

fn assert_read_back(original: &Image, read: &Image, expected: impl Fn(f32) -> f32) {
    assert_eq!(read.resolution(), original.resolution());
    assert_eq!(read.channel_count(), original.channel_count());
    for texel in original.resolution().texels() {
        for c in 0..original.channel_count() {
            let got = read.channel(texel, c);
            let want = expected(original.channel(texel, c));
            assert!((got - want).abs() < 1e-6, "texel {texel:?} channel {c}: {got} != {want}");
        }
    }
}

#[test]
fn pfm() {
    let image = ramp(PixelFormat::RGB32, Resolution::new(16, 49));
    let path = temp_path("ramp.pfm");
    image.write(&path).unwrap();
    let read = Image::read(&path).unwrap();
    assert_eq!(read.format(), PixelFormat::RGB32);
    assert_eq!(read, image);
    assert!(!partial_exists(&path));

    let big_endian = WriteConfig {
        pfm_byte_order: ByteOrder::BigEndian,
        ..WriteConfig::default()
    };
    image.write_with(&path, &big_endian).unwrap();
    assert_eq!(Image::read(&path).unwrap(), image);
}

#[test]
fn exr() {
    let image = ramp(PixelFormat::RGB32, Resolution::new(16, 49));
    let path = temp_path("ramp.exr");
    for compression in [ExrCompression::None, ExrCompression::Fast, ExrCompression::Small] {
        let config = WriteConfig {
            exr_compression: compression,
            ..WriteConfig::default()
        };
        image.write_with(&path, &config).unwrap();
        let read = Image::read(&path).unwrap();
        assert_eq!(read.format(), PixelFormat::RGB16);
        assert_read_back(&image, &read, half_round_trip);
    }
}

#[test]
fn tga() {
    let image = ramp(PixelFormat::RGB32, Resolution::new(11, 48));
    let path = temp_path("ramp.tga");
    image.write(&path).unwrap();
    let read = Image::read(&path).unwrap();
    assert_eq!(read.format(), PixelFormat::SRGB8);
    assert_read_back(&image, &read, srgb_round_trip);
}

#[test]
fn png() {
    let image = ramp(PixelFormat::RGB32, Resolution::new(11, 50));
    let path = temp_path("ramp.png");
    image.write(&path).unwrap();
    let read = Image::read(&path).unwrap();
    assert_eq!(read.format(), PixelFormat::SRGB8);
    assert_read_back(&image, &read, srgb_round_trip);
}

#[test]
fn grey_images() {
    let image = ramp(PixelFormat::Y32, Resolution::new(7, 9));
    for (extension, format) in [("pfm", PixelFormat::Y32), ("png", PixelFormat::SY8)] {
        let path = temp_path(&format!("grey.{extension}"));
        image.write(&path).unwrap();
        let read = Image::read(&path).unwrap();
        assert_eq!(read.format(), format, "{extension}");
        if format == PixelFormat::Y32 {
            assert_eq!(read, image);
        } else {
            assert_read_back(&image, &read, srgb_round_trip);
        }
    }

    //TGA and EXR store grey as R = G = B
    for (extension, format, expected) in [
        ("tga", PixelFormat::SRGB8, srgb_round_trip as fn(f32) -> f32),
        ("exr", PixelFormat::RGB16, half_round_trip),
    ] {
        let path = temp_path(&format!("grey.{extension}"));
        image.write(&path).unwrap();
        let read = Image::read(&path).unwrap();
        assert_eq!(read.format(), format, "{extension}");
        for texel in image.resolution().texels() {
            let want = expected(image.channel(texel, 0));
            for c in 0..3 {
                let got = read.channel(texel, c);
                assert!((got - want).abs() < 1e-6, "{extension} texel {texel:?}: {got} != {want}");
            }
        }
    }
}

#[test]
fn srgb_images_survive_png_and_tga_unchanged() {
    let image = ramp(PixelFormat::SRGB8, Resolution::new(6, 5));
    for name in ["bytes.png", "bytes.tga"] {
        let path = temp_path(name);
        image.write(&path).unwrap();
        assert_eq!(Image::read(&path).unwrap(), image, "{name}");
    }
}

#[test]
fn extension_is_case_insensitive() {
    let image = ramp(PixelFormat::RGB32, Resolution::new(2, 2));
    let path = temp_path("UPPER.PFM");
    image.write(&path).unwrap();
    assert_eq!(Image::read(&path).unwrap(), image);
}

#[test]
fn unknown_extension() {
    let image = ramp(PixelFormat::RGB32, Resolution::new(2, 2));
    let path = temp_path("image.jpg");
    assert!(matches!(image.write(&path), Err(Error::UnsupportedExtension(_))));
    assert!(!path.exists());
    std::fs::write(&path, b"not really a jpeg").unwrap();
    assert!(matches!(Image::read(&path), Err(Error::UnsupportedExtension(_))));
}

#[test]
fn content_decides_the_format() {
    let image = ramp(PixelFormat::SRGB8, Resolution::new(3, 3));
    let path = temp_path("actually_png.tga");
    let mut file = std::fs::File::create(&path).unwrap();
    FileFormat::Png
        .write(&image, &mut file, &WriteConfig::default())
        .unwrap();
    drop(file);
    assert_eq!(Image::read(&path).unwrap(), image);
}

#[test]
fn missing_file() {
    let path = temp_path("does_not_exist.png");
    assert!(matches!(Image::read(&path), Err(Error::Io(_))));
}

#[test]
fn unwritable_destination() {
    let image = ramp(PixelFormat::RGB32, Resolution::new(2, 2));
    let path = temp_path("no_such_directory").join("image.png");
    assert!(matches!(image.write(&path), Err(Error::Io(_))));
    assert!(!path.exists());
    assert!(!partial_exists(&path));
}

#[test]
fn failed_write_keeps_the_old_file() {
    let original = ramp(PixelFormat::SRGB8, Resolution::new(4, 4));
    let path = temp_path("keep.tga");
    original.write(&path).unwrap();

    //too wide for a TGA header
    let too_wide = Image::new(PixelFormat::SRGB8, Resolution::new(70_000, 1));
    assert!(matches!(too_wide.write(&path), Err(Error::Unsupported { .. })));
    assert!(!partial_exists(&path));
    assert_eq!(Image::read(&path).unwrap(), original);
}

#[test]
fn corrupt_png_checksum() {
    let image = ramp(PixelFormat::SRGB8, Resolution::new(4, 4));
    let path = temp_path("corrupt.png");
    image.write(&path).unwrap();
    let mut bytes = std::fs::read(&path).unwrap();
    //last byte of the IHDR checksum
    bytes[32] ^= 0x01;
    std::fs::write(&path, bytes).unwrap();
    assert!(matches!(Image::read(&path), Err(Error::Png(_))));
}

#[test]
fn truncated_files() {
    let image = ramp(PixelFormat::RGB32, Resolution::new(5, 5));
    for name in ["short.pfm", "short.tga"] {
        let path = temp_path(name);
        image.write(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
        let read = Image::read(&path);
        if name.ends_with(".pfm") {
            assert!(matches!(read, Err(Error::Truncated(_))), "{name}");
        } else {
            assert!(read.is_err(), "{name}");
        }
    }
}

#[test]
fn bad_pfm_signature() {
    let path = temp_path("bad.pfm");
    std::fs::write(&path, b"P6\n1 1\n255\n\0\0\0").unwrap();
    assert!(matches!(Image::read(&path), Err(Error::BadSignature(FileFormat::Pfm))));
}
