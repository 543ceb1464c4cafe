use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

/// Errors from loading texture images.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Decoded RGBA8 pixels, bottom row first so `v = 0` samples the image bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexturePixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TexturePixels {
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    /// Decode any supported format (PNG, JPEG) from memory.
    pub fn decode(bytes: &[u8]) -> Result<Self, TextureError> {
        let image = image::load_from_memory(bytes)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(TextureError::Empty {
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(Self::from_image(&image))
    }

    pub fn from_image(image: &DynamicImage) -> Self {
        let rgba = image.flipv().to_rgba8();
        Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        }
    }

    /// Levels in a full mip chain down to 1x1, this one included.
    pub fn mip_level_count(&self) -> u32 {
        32 - self.width.max(self.height).max(1).leading_zeros()
    }

    /// This image followed by successively halved copies down to 1x1.
    ///
    /// Each level is filtered from the one above it; odd sizes round down.
    pub fn mip_chain(&self) -> Vec<TexturePixels> {
        let mut levels = vec![self.clone()];
        let Some(mut image) = RgbaImage::from_raw(self.width, self.height, self.rgba.clone())
        else {
            return levels;
        };
        while image.width() > 1 || image.height() > 1 {
            let width = (image.width() / 2).max(1);
            let height = (image.height() / 2).max(1);
            image = imageops::resize(&image, width, height, FilterType::Triangle);
            levels.push(Self {
                width,
                height,
                rgba: image.as_raw().clone(),
            });
        }
        levels
    }

    /// A single pixel of one colour.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }
}

/// A sampled 2D texture on the GPU.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// Upload `pixels` with a full mip chain and a trilinear sampler.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &TexturePixels,
        address_mode: wgpu::AddressMode,
        label: &str,
    ) -> Self {
        let levels = pixels.mip_chain();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: pixels.width,
                height: pixels.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &level.rgba,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level.width),
                    rows_per_image: Some(level.height),
                },
                wgpu::Extent3d {
                    width: level.width,
                    height: level.height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Load `path`, or log the failure and fall back to plain white.
    pub fn load_or_white(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        address_mode: wgpu::AddressMode,
        label: &str,
    ) -> Self {
        let pixels = match TexturePixels::load(path) {
            Ok(pixels) => {
                tracing::debug!(
                    "loaded texture {} ({}x{})",
                    path.display(),
                    pixels.width,
                    pixels.height
                );
                pixels
            }
            Err(e) => {
                tracing::error!("failed to load texture {}: {e}", path.display());
                TexturePixels::solid([255, 255, 255, 255])
            }
        };
        Self::upload(device, queue, &pixels, address_mode, label)
    }
}

/// The two textures every cube blends between.
pub struct CubeTextures {
    pub first: Texture,
    pub second: Texture,
}

impl CubeTextures {
    /// The first texture repeats, the second clamps to its edge.
    pub fn load(device: &wgpu::Device, queue: &wgpu::Queue, first: &Path, second: &Path) -> Self {
        Self {
            first: Texture::load_or_white(
                device,
                queue,
                first,
                wgpu::AddressMode::Repeat,
                "texture1",
            ),
            second: Texture::load_or_white(
                device,
                queue,
                second,
                wgpu::AddressMode::ClampToEdge,
                "texture2",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn red_over_blue() -> RgbaImage {
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, Rgba(RED));
        img.put_pixel(0, 1, Rgba(BLUE));
        img
    }

    #[test]
    fn pixels_are_flipped_vertically() {
        let pixels = TexturePixels::from_image(&DynamicImage::ImageRgba8(red_over_blue()));
        assert_eq!((pixels.width, pixels.height), (1, 2));
        assert_eq!(&pixels.rgba[0..4], &BLUE);
        assert_eq!(&pixels.rgba[4..8], &RED);
    }

    #[test]
    fn rgb_images_gain_opaque_alpha() {
        let rgb = image::RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30]));
        let pixels = TexturePixels::from_image(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(pixels.rgba.len(), 16);
        assert_eq!(&pixels.rgba[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn load_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.png");
        red_over_blue().save(&path).unwrap();

        let pixels = TexturePixels::load(&path).unwrap();
        assert_eq!(pixels.height, 2);
        assert_eq!(&pixels.rgba[0..4], &BLUE);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TexturePixels::load(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, TextureError::Io(_)));
    }

    #[test]
    fn garbage_is_decode_error() {
        let err = TexturePixels::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, TextureError::Decode(_)));
    }

    #[test]
    fn mip_chain_halves_down_to_one_pixel() {
        let pixels = TexturePixels::from_image(&DynamicImage::ImageRgba8(RgbaImage::new(8, 2)));
        assert_eq!(pixels.mip_level_count(), 4);

        let sizes: Vec<_> = pixels
            .mip_chain()
            .iter()
            .map(|level| (level.width, level.height, level.rgba.len()))
            .collect();
        assert_eq!(sizes, [(8, 2, 64), (4, 1, 16), (2, 1, 8), (1, 1, 4)]);
    }

    #[test]
    fn odd_sizes_round_down() {
        let pixels = TexturePixels::from_image(&DynamicImage::ImageRgba8(RgbaImage::new(5, 3)));
        let chain = pixels.mip_chain();
        assert_eq!(chain.len() as u32, pixels.mip_level_count());
        let dims: Vec<_> = chain.iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(dims, [(5, 3), (2, 1), (1, 1)]);
    }

    #[test]
    fn uniform_color_survives_downsampling() {
        let img = RgbaImage::from_pixel(4, 4, Rgba(RED));
        let pixels = TexturePixels::from_image(&DynamicImage::ImageRgba8(img));
        let last = pixels.mip_chain().pop().unwrap();
        assert_eq!(last.rgba, RED.to_vec());
    }

    #[test]
    fn solid_has_a_single_level() {
        let pixels = TexturePixels::solid([255; 4]);
        assert_eq!(pixels.mip_level_count(), 1);
        assert_eq!(pixels.mip_chain(), vec![pixels]);
    }

    #[test]
    fn solid_is_one_pixel() {
        let pixels = TexturePixels::solid([1, 2, 3, 4]);
        assert_eq!((pixels.width, pixels.height), (1, 1));
        assert_eq!(pixels.rgba, vec![1, 2, 3, 4]);
    }
}
