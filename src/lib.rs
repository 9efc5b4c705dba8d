/*! render_images is the image layer of a physically based renderer: in-memory
pixel buffers, the pixel encodings they are stored in, and the file formats
that move them to and from disk.

Here is a quick chart of the pixel formats:

| Format | Channels | Storage      | Encoding         | Typical use                    |
|--------|----------|--------------|------------------|--------------------------------|
| `Y8`   | 1        | `u8`         | linear           | masks, roughness maps          |
| `SY8`  | 1        | `u8`         | sRGB             | greyscale photographs          |
| `Y16`  | 1        | `f16`        | linear           | HDR greyscale                  |
| `Y32`  | 1        | `f32`        | linear           | bump and displacement maps     |
| `RGB8` | 3        | `u8`         | linear           | normal maps                    |
| `SRGB8`| 3        | `u8`         | sRGB             | texture maps, PNG/TGA images   |
| `RGB16`| 3        | `f16`        | linear           | OpenEXR images                 |
| `RGB32`| 3        | `f32`        | linear           | renders, PFM images            |

Every channel value crosses the API as a linear `f32`.  Encoding and decoding
happen at the storage boundary, so code that reads an [`Image`] never needs to
know whether a texel was stored as sRGB bytes or as half floats.

# Crate layout

* [`pixel_formats`]: the [`PixelFormat`](pixel_formats::PixelFormat) catalogue and the channel codecs.
* [`srgb`]: the sRGB transfer function, exact and table-driven.
* [`image`]: the [`Image`] buffer and its [`Texel`](image::texel::Texel) coordinates.
* [`texel_provider`]: wrapped, read-only texel access for texture evaluation.
* [`file_formats`]: PFM, OpenEXR, TGA and PNG reading and writing.
* [`spectrum`]: spectra reconstructed from RGB texels.

# Example

```
use render_images::image::Image;
use render_images::image::texel::{Resolution, Texel};
use render_images::pixel_formats::PixelFormat;

let mut image = Image::new(PixelFormat::SRGB8, Resolution::new(8, 8));
image.set_channel(Texel::new(3, 4), 1, 0.5);
let stored = image.channel(Texel::new(3, 4), 1);
assert!((stored - 0.5).abs() < 0.005);
```

# Logging

File reads and writes log through [logwise](https://docs.rs/logwise).  Paths
and errors are logged as private data.
*/

pub mod error;
pub mod file_formats;
pub mod image;
pub mod pixel_formats;
pub mod spectrum;
pub mod srgb;
pub mod texel_provider;

pub use error::{Error, Result};
pub use image::Image;
