use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::io::Reader as ImageReader;
use image::{DynamicImage, GrayImage, Luma};
use ndarray::prelude::*;

pub trait Transform<In, Out> {
    fn transform(&self, x: In) -> Out;
}

/// Resizes to a fixed size with bilinear filtering.
#[derive(Debug, Clone, Copy)]
pub struct Resize {
    pub width: u32,
    pub height: u32,
}

impl Resize {
    pub fn square(size: u32) -> Self {
        Resize { width: size, height: size }
    }
}

impl Transform<GrayImage, GrayImage> for Resize {
    fn transform(&self, x: GrayImage) -> GrayImage {
        if x.dimensions() == (self.width, self.height) {
            return x;
        }
        imageops::resize(&x, self.width, self.height, FilterType::Triangle)
    }
}

/// 8 bit grayscale image to a [1, H, W] array in [0, 1].
#[derive(Debug, Clone, Copy, Default)]
pub struct ToTensor;

impl Transform<GrayImage, Array3<f32>> for ToTensor {
    fn transform(&self, x: GrayImage) -> Array3<f32> {
        let (w, h) = x.dimensions();
        Array3::from_shape_fn((1, h as usize, w as usize), |(_, i, j)| {
            f32::from(x.get_pixel(j as u32, i as u32)[0]) / 255.0
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Normalize {
    pub mean: f32,
    pub std: f32,
}

impl Default for Normalize {
    /// maps [0, 1] onto [-1, 1]
    fn default() -> Self {
        Normalize { mean: 0.5, std: 0.5 }
    }
}

impl Transform<Array3<f32>, Array3<f32>> for Normalize {
    fn transform(&self, mut x: Array3<f32>) -> Array3<f32> {
        x.mapv_inplace(|v| (v - self.mean) / self.std);
        x
    }
}

/// Decode side of the dataset: luma conversion, resize, to tensor, normalize.
#[derive(Debug, Clone, Copy)]
pub struct GlyphTransform {
    pub resize: Resize,
    pub to_tensor: ToTensor,
    pub normalize: Normalize,
}

impl GlyphTransform {
    pub fn new(load_size: u32) -> Self {
        GlyphTransform {
            resize: Resize::square(load_size),
            to_tensor: ToTensor,
            normalize: Normalize::default(),
        }
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Array3<f32>> {
        let path = path.as_ref();
        let img = ImageReader::open(path)
            .with_context(|| format!("Failed to open image {}", path.display()))?
            .decode()
            .with_context(|| format!("Failed to decode image {}", path.display()))?;
        Ok(self.transform(img))
    }
}

impl Transform<DynamicImage, Array3<f32>> for GlyphTransform {
    fn transform(&self, x: DynamicImage) -> Array3<f32> {
        let x = self.resize.transform(x.into_luma8());
        let x = self.to_tensor.transform(x);
        self.normalize.transform(x)
    }
}

/// Inverse of [`GlyphTransform`] for a single channel in [-1, 1].
pub fn to_image(x: &ArrayView2<f32>) -> GrayImage {
    let (h, w) = x.dim();
    GrayImage::from_fn(w as u32, h as u32, |j, i| {
        let v = (x[[i as usize, j as usize]] + 1.0) / 2.0 * 255.0;
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn to_tensor_layout() {
        // 3 wide, 2 high
        let img = GrayImage::from_raw(3, 2, vec![0, 51, 102, 153, 204, 255]).unwrap();
        let t = ToTensor.transform(img);
        assert_eq!(t.dim(), (1, 2, 3));
        assert_eq!(t[[0, 0, 1]], 0.2);
        assert_eq!(t[[0, 1, 0]], 0.6);
        assert_eq!(t[[0, 1, 2]], 1.0);
    }

    #[test]
    fn normalize_maps_to_unit_range() {
        let x = array![[[0.0f32, 0.5, 1.0]]];
        let y = Normalize::default().transform(x);
        assert_eq!(y, array![[[-1.0f32, 0.0, 1.0]]]);
    }

    #[test]
    fn resize_to_square() {
        let img = GrayImage::from_pixel(10, 20, Luma([200]));
        let out = Resize::square(8).transform(img);
        assert_eq!(out.dimensions(), (8, 8));
        assert!(out.pixels().all(|p| p[0].abs_diff(200) <= 1));
    }

    #[test]
    fn glyph_transform_shape_and_range() {
        let rgb = image::RgbImage::from_fn(17, 9, |x, y| image::Rgb([(x * 15) as u8, (y * 28) as u8, 255]));
        let t = GlyphTransform::new(16).transform(DynamicImage::ImageRgb8(rgb));
        assert_eq!(t.dim(), (1, 16, 16));
        assert!(t.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn to_image_inverts_normalization() {
        let img = GrayImage::from_fn(4, 4, |x, y| Luma([(x * 60 + y) as u8]));
        let t = GlyphTransform::new(4).transform(DynamicImage::ImageLuma8(img.clone()));
        let back = to_image(&t.index_axis(Axis(0), 0));
        assert_eq!(back, img);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = GlyphTransform::new(8).load(dir.path().join("missing.png")).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.png"));
    }
}
