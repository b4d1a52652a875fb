//! Immutable 2D textures. A texture can be the source of a texture access from
//! a shader, through `set_texture`.

use std::path::Path;

use image::{self, DynamicImage};

use crate::errors::*;
use crate::math::prelude::Vector2;

use super::Device;

/// The channel layout of 8-bit texture data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    R8,
    RG8,
    RGB8,
    RGBA8,
}

impl TextureFormat {
    /// Maps the number of channels to a format, for `1..=4`.
    pub fn from_channels(channels: u32) -> Result<Self> {
        match channels {
            1 => Ok(TextureFormat::R8),
            2 => Ok(TextureFormat::RG8),
            3 => Ok(TextureFormat::RGB8),
            4 => Ok(TextureFormat::RGBA8),
            _ => Err(Error::ChannelCount(channels)),
        }
    }

    /// Returns the size in bytes of a `width` by `height` texture, or `None` if
    /// it does not fit in memory.
    #[inline]
    pub fn size(self, width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(self.channels() as usize))
    }

    #[inline]
    pub fn channels(self) -> u32 {
        match self {
            TextureFormat::R8 => 1,
            TextureFormat::RG8 => 2,
            TextureFormat::RGB8 => 3,
            TextureFormat::RGBA8 => 4,
        }
    }
}

/// Specify how the texture is used whenever the pixel being sampled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureFilter {
    /// Returns the value of the texture element that is nearest (in Manhattan distance)
    /// to the center of the pixel being textured.
    Nearest,
}

/// A texture object, with the dimensions and channels of its data. The zero
/// handle is the freed state.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Texture {
    handle: u32,
    width: u32,
    height: u32,
    channels: u32,
}

impl Texture {
    #[inline]
    pub fn handle(&self) -> u32 {
        self.handle
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> u32 {
        self.channels
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.handle == 0
    }
}

/// Decodes an image file and uploads it with `make_texture`. Rows are flipped
/// so that the first row of the data is the bottom of the image.
pub fn load_texture<P: AsRef<Path>>(video: &mut Device, path: P) -> Result<Texture> {
    let path = path.as_ref();
    let (width, height, channels, pixels) = decode(path)?;

    info!(
        "[Texture] loads {:?} ({}x{}, {} channels).",
        path, width, height, channels
    );

    make_texture(video, width, height, channels, &pixels)
}

/// Creates a texture with nearest filtering from 8-bit per channel data.
pub fn make_texture(
    video: &mut Device,
    width: u32,
    height: u32,
    channels: u32,
    pixels: &[u8],
) -> Result<Texture> {
    let format = TextureFormat::from_channels(channels)?;

    let len = format
        .size(width, height)
        .ok_or_else(|| Error::PixelDataMismatch(pixels.len(), usize::max_value()))?;

    if pixels.len() < len {
        return Err(Error::PixelDataMismatch(pixels.len(), len));
    }

    let dimensions = Vector2::new(width, height);
    let handle = unsafe {
        video
            .visitor()
            .create_texture(dimensions, format, TextureFilter::Nearest, &pixels[..len])?
    };

    debug!("[Texture] creates {} ({:?}).", handle, format);
    Ok(Texture {
        handle,
        width,
        height,
        channels,
    })
}

/// Deletes the texture object and resets `texture` to the freed state.
/// Freeing twice is a no-op.
pub fn free_texture(video: &mut Device, texture: &mut Texture) -> Result<()> {
    if texture.is_null() {
        return Ok(());
    }

    unsafe { video.visitor().delete_texture(texture.handle)? };
    debug!("[Texture] deletes {}.", texture.handle);

    *texture = Texture::default();
    Ok(())
}

/// Decodes `path` into `(width, height, channels, pixels)`, flipped vertically.
/// 8-bit gray, gray-alpha, RGB and RGBA images keep their channels, anything
/// else is converted to RGBA.
pub fn decode(path: &Path) -> Result<(u32, u32, u32, Vec<u8>)> {
    if !path.is_file() {
        return Err(Error::ResourceNotFound(
            path.to_owned(),
            "no such file".to_owned(),
        ));
    }

    let image = image::open(path)
        .map_err(|err| Error::Decode(path.to_owned(), format!("{}", err)))?
        .flipv();

    let decoded = match image {
        DynamicImage::ImageLuma8(v) => (v.width(), v.height(), 1, v.into_raw()),
        DynamicImage::ImageLumaA8(v) => (v.width(), v.height(), 2, v.into_raw()),
        DynamicImage::ImageRgb8(v) => (v.width(), v.height(), 3, v.into_raw()),
        DynamicImage::ImageRgba8(v) => (v.width(), v.height(), 4, v.into_raw()),
        other => {
            let v = other.to_rgba8();
            (v.width(), v.height(), 4, v.into_raw())
        }
    };

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn formats() {
        let formats: Vec<_> = (1..5)
            .map(|v| TextureFormat::from_channels(v).unwrap())
            .collect();

        assert_eq!(
            formats,
            [
                TextureFormat::R8,
                TextureFormat::RG8,
                TextureFormat::RGB8,
                TextureFormat::RGBA8
            ]
        );

        for (i, format) in formats.iter().enumerate() {
            assert_eq!(format.channels(), i as u32 + 1);
        }

        assert_eq!(TextureFormat::RGB8.size(4, 2), Some(24));
        assert_eq!(TextureFormat::RGBA8.size(65536, 65536), Some(1 << 34));
        assert_eq!(TextureFormat::R8.size(u32::max_value(), 0), Some(0));
        assert!(TextureFormat::from_channels(0).is_err());
        assert!(TextureFormat::from_channels(5).is_err());
    }

    #[test]
    fn decode_flips_rows() {
        // 1x2 RGB image, red on top and blue on the bottom.
        let path = std::env::temp_dir().join("pastel_texture_decode_flips_rows.ppm");
        fs::write(&path, "P3\n1 2\n255\n255 0 0\n0 0 255\n").unwrap();

        let (width, height, channels, pixels) = decode(&path).unwrap();
        assert_eq!((width, height, channels), (1, 2, 3));
        assert_eq!(pixels, [0, 0, 255, 255, 0, 0]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn decode_missing() {
        match decode(Path::new("no/such/image.png")) {
            Err(Error::ResourceNotFound(_, _)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn decode_garbage() {
        let path = std::env::temp_dir().join("pastel_texture_decode_garbage.png");
        fs::write(&path, "definitely not a png").unwrap();

        match decode(&path) {
            Err(Error::Decode(_, _)) => {}
            other => panic!("unexpected {:?}", other),
        }

        fs::remove_file(&path).unwrap();
    }
}
