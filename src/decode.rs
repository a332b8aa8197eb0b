//! Image loading and normalization to the pixel format a metric expects.
//!
//! Files are decoded with the `image` crate, flattened to 8-bit RGB (alpha is
//! dropped), and optionally reduced to 8-bit luma.
//!
//! # Example
//!
//! ```ignore
//! use pair_eval::decode::{load_image, PixelFormat};
//!
//! let image = load_image("ref/cat.png".as_ref(), PixelFormat::Luma8)?;
//! println!("{}x{}", image.width(), image.height());
//! ```

use std::path::Path;

use imgref::ImgVec;
use rgb::RGB8;

use crate::error::{Error, Result};

/// Pixel representation requested by a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit RGB.
    Rgb8,
    /// 8-bit luma (ITU-R 601-2 weights).
    Luma8,
}

/// Decoded image data in one of the supported pixel formats.
#[derive(Debug, Clone)]
pub enum ImageData {
    /// RGB8 image using imgref.
    Rgb8(ImgVec<RGB8>),

    /// Single-channel 8-bit luma image.
    Luma8(ImgVec<u8>),
}

impl ImageData {
    /// Get image width.
    #[must_use]
    pub fn width(&self) -> usize {
        match self {
            Self::Rgb8(img) => img.width(),
            Self::Luma8(img) => img.width(),
        }
    }

    /// Get image height.
    #[must_use]
    pub fn height(&self) -> usize {
        match self {
            Self::Rgb8(img) => img.height(),
            Self::Luma8(img) => img.height(),
        }
    }

    /// Dimensions as (width, height).
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// The pixel format of this image.
    #[must_use]
    pub fn pixel_format(&self) -> PixelFormat {
        match self {
            Self::Rgb8(_) => PixelFormat::Rgb8,
            Self::Luma8(_) => PixelFormat::Luma8,
        }
    }

    /// Convert to an RGB8 slice representation (row-major, 3 bytes per pixel).
    ///
    /// Luma pixels are replicated into all three channels.
    #[must_use]
    pub fn to_rgb8_vec(&self) -> Vec<u8> {
        match self {
            Self::Rgb8(img) => img.pixels().flat_map(|p| [p.r, p.g, p.b]).collect(),
            Self::Luma8(img) => img.pixels().flat_map(|l| [l, l, l]).collect(),
        }
    }
}

/// Decode an image file into the requested pixel format.
///
/// # Errors
///
/// Returns [`Error::ImageDecode`] if the file cannot be opened or decoded.
pub fn load_image(path: &Path, format: PixelFormat) -> Result<ImageData> {
    let decoded = image::open(path).map_err(|e| Error::image_decode(path, e))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();

    let pixels: Vec<RGB8> = rgb
        .pixels()
        .map(|p| RGB8::new(p.0[0], p.0[1], p.0[2]))
        .collect();
    let rgb = ImgVec::new(pixels, width as usize, height as usize);

    Ok(match format {
        PixelFormat::Rgb8 => ImageData::Rgb8(rgb),
        PixelFormat::Luma8 => ImageData::Luma8(rgb8_to_luma8(&rgb)),
    })
}

/// Convert an RGB8 image to 8-bit luma.
///
/// Uses ITU-R 601-2 weights in 16.16 fixed point, rounding to nearest:
/// `L = R * 299/1000 + G * 587/1000 + B * 114/1000`.
#[must_use]
pub fn rgb8_to_luma8(img: &ImgVec<RGB8>) -> ImgVec<u8> {
    let luma: Vec<u8> = img
        .pixels()
        .map(|p| {
            let l = u32::from(p.r) * 19595 + u32::from(p.g) * 38470 + u32::from(p.b) * 7471;
            ((l + 0x8000) >> 16) as u8
        })
        .collect();

    ImgVec::new(luma, img.width(), img.height())
}
