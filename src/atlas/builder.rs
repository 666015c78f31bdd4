//! Sprite sheet builder using simple row packing.

use crate::error::{ConverterError, Result};
use crate::resource_pack::texture::encode_png;
use crate::resource_pack::TextureData;
use indexmap::IndexMap;

/// Where a texture landed within its sprite sheet, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasPlacement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub atlas_width: u32,
    pub atlas_height: u32,
}

impl AtlasPlacement {
    /// Map a Java UV coordinate pair (0-16 within the texture) into the
    /// sheet's 0-16 space.
    pub fn remap(&self, u: f64, v: f64) -> [f64; 2] {
        [
            (u * self.width as f64 / 16.0 + self.x as f64) * 16.0 / self.atlas_width as f64,
            (v * self.height as f64 / 16.0 + self.y as f64) * 16.0 / self.atlas_height as f64,
        ]
    }
}

/// A packed sprite sheet.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    /// Width of the sheet in pixels.
    pub width: u32,
    /// Height of the sheet in pixels.
    pub height: u32,
    /// RGBA pixel data.
    pub pixels: Vec<u8>,
    /// Texture location to placement, in packing order.
    pub placements: IndexMap<String, AtlasPlacement>,
}

impl SpriteSheet {
    /// Get the placement of a texture.
    pub fn offset_of(&self, texture: &str) -> Option<AtlasPlacement> {
        self.placements.get(texture).copied()
    }

    /// Check if the sheet contains a texture.
    pub fn contains(&self, texture: &str) -> bool {
        self.placements.contains_key(texture)
    }

    /// Create an empty 16x16 sheet.
    pub fn empty() -> Self {
        Self {
            width: 16,
            height: 16,
            pixels: vec![0; 16 * 16 * 4],
            placements: IndexMap::new(),
        }
    }

    /// Export the sheet as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(self.width, self.height, &self.pixels)
            .map_err(|e| ConverterError::AtlasBuild(format!("Failed to encode PNG: {}", e)))
    }
}

/// Builder for item sprite sheets.
pub struct SpriteSheetBuilder {
    max_size: u32,
    padding: u32,
    textures: IndexMap<String, TextureData>,
}

impl SpriteSheetBuilder {
    pub fn new(max_size: u32, padding: u32) -> Self {
        Self {
            max_size,
            padding,
            textures: IndexMap::new(),
        }
    }

    /// Add a texture. Animated strips contribute their first frame; textures
    /// with no pixels are ignored.
    pub fn add_texture(&mut self, location: impl Into<String>, texture: TextureData) {
        let location = location.into();
        let frame = texture.first_frame();
        if frame.width == 0 || frame.height == 0 {
            log::debug!("ignoring empty texture {}", location);
            return;
        }
        self.textures.insert(location, frame);
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Pack every texture into the smallest power-of-two square that fits.
    pub fn build(self) -> Result<SpriteSheet> {
        if self.textures.is_empty() {
            return Ok(SpriteSheet::empty());
        }

        let padding = self.padding;
        let max_size = self.max_size;

        // Tallest first; the sort is stable so equal heights keep insertion order
        let mut textures: Vec<_> = self.textures.into_iter().collect();
        textures.sort_by(|a, b| b.1.height.cmp(&a.1.height));

        let total_area: u64 = textures
            .iter()
            .map(|(_, t)| (t.width + padding * 2) as u64 * (t.height + padding * 2) as u64)
            .sum();

        let min_size = (total_area as f64).sqrt().ceil() as u32;
        let mut atlas_size = 16u32;
        while atlas_size < min_size && atlas_size < max_size {
            atlas_size *= 2;
        }

        loop {
            if atlas_size > max_size {
                return Err(ConverterError::AtlasBuild(format!(
                    "Failed to pack {} textures into {}x{} sheet",
                    textures.len(),
                    max_size,
                    max_size
                )));
            }

            if let Some((pixels, placements)) = try_pack(&textures, atlas_size, padding) {
                log::debug!("packed {} textures into {}x{} sheet", placements.len(), atlas_size, atlas_size);
                return Ok(SpriteSheet {
                    width: atlas_size,
                    height: atlas_size,
                    pixels,
                    placements,
                });
            }

            atlas_size *= 2;
        }
    }
}

/// Try to pack textures into a sheet of the given size.
fn try_pack(
    textures: &[(String, TextureData)],
    atlas_size: u32,
    padding: u32,
) -> Option<(Vec<u8>, IndexMap<String, AtlasPlacement>)> {
    let mut pixels = vec![0u8; atlas_size as usize * atlas_size as usize * 4];
    let mut placements = IndexMap::new();

    let mut current_x = 0u32;
    let mut current_y = 0u32;
    let mut row_height = 0u32;

    for (location, texture) in textures {
        let tex_width = texture.width + padding * 2;
        let tex_height = texture.height + padding * 2;

        if tex_width > atlas_size {
            return None;
        }

        // Start a new row
        if current_x + tex_width > atlas_size {
            current_x = 0;
            current_y += row_height;
            row_height = 0;
        }

        if current_y + tex_height > atlas_size {
            return None;
        }

        let x = current_x + padding;
        let y = current_y + padding;

        // Padding pixels repeat the nearest edge pixel.
        for py in 0..tex_height {
            for px in 0..tex_width {
                let sx = (px as i32 - padding as i32).clamp(0, texture.width as i32 - 1) as u32;
                let sy = (py as i32 - padding as i32).clamp(0, texture.height as i32 - 1) as u32;

                let src_idx = (sy as usize * texture.width as usize + sx as usize) * 4;
                let dst_idx = ((current_y + py) as usize * atlas_size as usize
                    + (current_x + px) as usize)
                    * 4;

                if src_idx + 4 <= texture.pixels.len() && dst_idx + 4 <= pixels.len() {
                    pixels[dst_idx..dst_idx + 4]
                        .copy_from_slice(&texture.pixels[src_idx..src_idx + 4]);
                }
            }
        }

        placements.insert(
            location.clone(),
            AtlasPlacement {
                x,
                y,
                width: texture.width,
                height: texture.height,
                atlas_width: atlas_size,
                atlas_height: atlas_size,
            },
        );

        current_x += tex_width;
        row_height = row_height.max(tex_height);
    }

    Some((pixels, placements))
}
