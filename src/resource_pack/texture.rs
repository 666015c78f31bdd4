//! Texture decoding.

/// Decoded texture data.
#[derive(Debug, Clone)]
pub struct TextureData {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// RGBA8 pixel data (4 bytes per pixel).
    pub pixels: Vec<u8>,
    /// Whether this texture looks like a vertical animation strip.
    pub is_animated: bool,
    /// Animation frame count (1 if not animated).
    pub frame_count: u32,
}

impl TextureData {
    /// Create a new texture from RGBA data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
            is_animated: false,
            frame_count: 1,
        }
    }

    /// Create a placeholder texture (magenta/black checkerboard).
    pub fn placeholder() -> Self {
        let size = 16;
        let mut pixels = vec![0u8; (size * size * 4) as usize];

        for y in 0..size {
            for x in 0..size {
                let idx = ((y * size + x) * 4) as usize;
                if ((x / 2) + (y / 2)) % 2 == 0 {
                    pixels[idx] = 255;
                    pixels[idx + 2] = 255;
                }
                pixels[idx + 3] = 255;
            }
        }

        Self::new(size, size, pixels)
    }

    /// Get the first frame of an animated texture (or the whole texture if not animated).
    pub fn first_frame(&self) -> TextureData {
        if !self.is_animated || self.frame_count <= 1 {
            return self.clone();
        }

        let frame_height = self.height / self.frame_count;
        let frame_size = (self.width * frame_height * 4) as usize;

        Self::new(self.width, frame_height, self.pixels[..frame_size].to_vec())
    }
}

/// Decode a texture from PNG bytes.
pub fn load_texture_from_bytes(data: &[u8]) -> Result<TextureData, image::ImageError> {
    let img = image::load_from_memory(data)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    // Animation strips are taller than wide with a whole number of square frames
    let is_animated = width > 0 && height > width && height % width == 0;
    let frame_count = if is_animated { height / width } else { 1 };

    Ok(TextureData {
        width,
        height,
        pixels: rgba.into_raw(),
        is_animated,
        frame_count,
    })
}

/// Encode RGBA pixels as PNG bytes.
pub fn encode_png(width: u32, height: u32, pixels: &[u8]) -> Result<Vec<u8>, image::ImageError> {
    use image::ImageEncoder;

    let mut bytes = Vec::new();
    image::codecs::png::PngEncoder::new(std::io::Cursor::new(&mut bytes)).write_image(
        pixels,
        width,
        height,
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_texture() {
        let tex = TextureData::placeholder();
        assert_eq!(tex.width, 16);
        assert_eq!(tex.height, 16);
        assert_eq!(tex.pixels.len(), 16 * 16 * 4);
        assert_eq!(&tex.pixels[0..4], &[255, 0, 255, 255]);
    }

    #[test]
    fn test_png_round_trip_detects_animation() {
        let pixels: Vec<u8> = (0..2 * 4).flat_map(|i| [i as u8, 0, 0, 255]).collect();
        let png = encode_png(2, 4, &pixels).unwrap();

        let tex = load_texture_from_bytes(&png).unwrap();
        assert_eq!((tex.width, tex.height), (2, 4));
        assert!(tex.is_animated);
        assert_eq!(tex.frame_count, 2);

        let frame = tex.first_frame();
        assert_eq!((frame.width, frame.height), (2, 2));
        assert_eq!(frame.pixels, pixels[..2 * 2 * 4].to_vec());
    }

    #[test]
    fn test_invalid_png() {
        assert!(load_texture_from_bytes(b"not a png").is_err());
    }
}
