//! Texture decoding (PNG/JPG -> raw pixel rows)
//!
//! Produces tightly packed 8-bit pixel data plus the sampler setup a backend
//! should create the texture with.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to load texture {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("unsupported channel count {0} (expected 1, 3 or 4)")]
    UnsupportedChannels(u8),
}

/// Pixel layout of decoded data, one byte per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Red,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn from_channels(channels: u8) -> Result<Self, TextureError> {
        match channels {
            1 => Ok(PixelFormat::Red),
            3 => Ok(PixelFormat::Rgb),
            4 => Ok(PixelFormat::Rgba),
            n => Err(TextureError::UnsupportedChannels(n)),
        }
    }

    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Red => 1,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTexture {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Row-major, first row is the bottom of the image when flipped
    pub pixels: Vec<u8>,
}

impl DecodedTexture {
    /// Decode an image file
    ///
    /// `flip_vertically` puts the first row at the bottom, matching GL texture
    /// coordinates.
    pub fn load(path: &Path, flip_vertically: bool) -> Result<Self, TextureError> {
        let img = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let texture = Self::from_image(img, flip_vertically)?;
        tracing::debug!(
            "Loaded texture {:?}: {}x{} {:?}",
            path,
            texture.width,
            texture.height,
            texture.format
        );
        Ok(texture)
    }

    pub fn from_image(img: DynamicImage, flip_vertically: bool) -> Result<Self, TextureError> {
        let format = PixelFormat::from_channels(img.color().channel_count())?;
        let img = if flip_vertically { img.flipv() } else { img };
        let (width, height) = (img.width(), img.height());

        let pixels = match format {
            PixelFormat::Red => img.to_luma8().into_raw(),
            PixelFormat::Rgb => img.to_rgb8().into_raw(),
            PixelFormat::Rgba => img.to_rgba8().into_raw(),
        };

        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    /// 1x1 RGB texture standing in for a flat color
    pub fn solid(red: u8, green: u8, blue: u8) -> Self {
        Self {
            width: 1,
            height: 1,
            format: PixelFormat::Rgb,
            pixels: vec![red, green, blue],
        }
    }

    /// Pixel at `(x, y)` in stored row order
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let channels = self.format.channels();
        let start = (y as usize * self.width as usize + x as usize) * channels;
        self.pixels.get(start..start + channels)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Nearest,
    Linear,
    LinearMipmapLinear,
}

/// Sampler parameters for a texture object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerDesc {
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub mipmaps: bool,
}

impl SamplerDesc {
    /// Mirrored repeat, nearest minification: the textured-quad demos
    pub fn tutorial() -> Self {
        Self {
            wrap_s: WrapMode::MirroredRepeat,
            wrap_t: WrapMode::MirroredRepeat,
            min_filter: FilterMode::Nearest,
            mag_filter: FilterMode::Linear,
            mipmaps: true,
        }
    }

    /// Repeat with trilinear minification: imported model textures
    pub fn model() -> Self {
        Self {
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            min_filter: FilterMode::LinearMipmapLinear,
            mag_filter: FilterMode::Linear,
            mipmaps: true,
        }
    }
}

/// Hands out sampler units in creation order
#[derive(Debug, Clone, Default)]
pub struct TextureUnits {
    next: u32,
}

impl TextureUnits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> u32 {
        let unit = self.next;
        self.next += 1;
        unit
    }

    /// Units handed out so far
    pub fn count(&self) -> u32 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, GrayImage, RgbaImage};

    fn quad() -> DynamicImage {
        // Top row red, green; bottom row blue, white
        #[rustfmt::skip]
        let pixels = vec![
            255, 0, 0, 255,     0, 255, 0, 255,
            0, 0, 255, 255,     255, 255, 255, 255,
        ];
        DynamicImage::ImageRgba8(RgbaImage::from_raw(2, 2, pixels).unwrap())
    }

    #[test]
    fn test_channel_mapping() {
        assert_eq!(PixelFormat::from_channels(1).unwrap(), PixelFormat::Red);
        assert_eq!(PixelFormat::from_channels(3).unwrap(), PixelFormat::Rgb);
        assert_eq!(PixelFormat::from_channels(4).unwrap(), PixelFormat::Rgba);
        assert!(matches!(
            PixelFormat::from_channels(2),
            Err(TextureError::UnsupportedChannels(2))
        ));
    }

    #[test]
    fn test_from_image_without_flip() {
        let texture = DecodedTexture::from_image(quad(), false).unwrap();
        assert_eq!((texture.width, texture.height), (2, 2));
        assert_eq!(texture.format, PixelFormat::Rgba);
        assert_eq!(texture.pixels.len(), 16);
        assert_eq!(texture.pixel(0, 0), Some(&[255, 0, 0, 255][..]));
    }

    #[test]
    fn test_from_image_flipped() {
        let texture = DecodedTexture::from_image(quad(), true).unwrap();
        assert_eq!(texture.pixel(0, 0), Some(&[0, 0, 255, 255][..]));
        assert_eq!(texture.pixel(1, 1), Some(&[0, 255, 0, 255][..]));
        assert_eq!(texture.pixel(2, 0), None);
    }

    #[test]
    fn test_grey_image_is_red_format() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_raw(2, 1, vec![10, 20]).unwrap());
        let texture = DecodedTexture::from_image(img, false).unwrap();
        assert_eq!(texture.format, PixelFormat::Red);
        assert_eq!(texture.pixels, vec![10, 20]);
    }

    #[test]
    fn test_grey_alpha_rejected() {
        let img = DynamicImage::ImageLumaA8(GrayAlphaImage::new(1, 1));
        assert!(matches!(
            DecodedTexture::from_image(img, true),
            Err(TextureError::UnsupportedChannels(2))
        ));
    }

    #[test]
    fn test_solid() {
        let texture = DecodedTexture::solid(1, 2, 3);
        assert_eq!(texture.format, PixelFormat::Rgb);
        assert_eq!(texture.pixel(0, 0), Some(&[1, 2, 3][..]));
    }

    #[test]
    fn test_sampler_presets() {
        let tutorial = SamplerDesc::tutorial();
        assert_eq!(tutorial.wrap_s, WrapMode::MirroredRepeat);
        assert_eq!(tutorial.min_filter, FilterMode::Nearest);
        let model = SamplerDesc::model();
        assert_eq!(model.wrap_t, WrapMode::Repeat);
        assert_eq!(model.min_filter, FilterMode::LinearMipmapLinear);
    }

    #[test]
    fn test_texture_units_sequential() {
        let mut units = TextureUnits::new();
        assert_eq!(units.allocate(), 0);
        assert_eq!(units.allocate(), 1);
        assert_eq!(units.count(), 2);
    }
}
