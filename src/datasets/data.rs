//! The data types the font dataset outputs.

use std::path::PathBuf;

use anyhow::{Error, Result};
use image::{imageops, GrayImage};
use ndarray::prelude::*;

use super::transforms::to_image;

/// One training/inference example. Every image array is [C, H, W] with values in [-1, 1].
#[derive(Debug, Clone)]
pub struct FontSample {
    /// the unstyled glyph, [1, H, W]
    pub content: Array3<f32>,
    /// the same letter rendered in the target font, [1, H, W]
    pub ground_truth: Array3<f32>,
    /// reference glyphs of the target font, [style_channel, H, W]
    pub style: Array3<f32>,
    pub style_paths: Vec<PathBuf>,
    /// ground truth path when training, `font/letter` otherwise
    pub image_path: PathBuf,
}

/// Samples stacked on a leading batch axis, [B, C, H, W].
#[derive(Debug, Clone)]
pub struct FontBatch {
    pub content: Array4<f32>,
    pub ground_truth: Array4<f32>,
    pub style: Array4<f32>,
    pub style_paths: Vec<Vec<PathBuf>>,
    pub image_paths: Vec<PathBuf>,
}

impl FontBatch {
    pub fn collate(samples: Vec<FontSample>) -> Result<FontBatch> {
        let content = stack(&samples.iter().map(|s| &s.content).collect::<Vec<_>>())?;
        let ground_truth = stack(&samples.iter().map(|s| &s.ground_truth).collect::<Vec<_>>())?;
        let style = stack(&samples.iter().map(|s| &s.style).collect::<Vec<_>>())?;
        let (style_paths, image_paths) = samples.into_iter().map(|s| (s.style_paths, s.image_path)).unzip();
        Ok(FontBatch { content, ground_truth, style, style_paths, image_paths })
    }

    /// Splits sample `i` back out of the batch.
    pub fn sample(&self, i: usize) -> Option<FontSample> {
        if i >= self.len() {
            return None;
        }
        Some(FontSample {
            content: self.content.index_axis(Axis(0), i).to_owned(),
            ground_truth: self.ground_truth.index_axis(Axis(0), i).to_owned(),
            style: self.style.index_axis(Axis(0), i).to_owned(),
            style_paths: self.style_paths[i].clone(),
            image_path: self.image_paths[i].clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.image_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image_paths.is_empty()
    }
}

/// Concatenates [C_i, H, W] arrays along the channel axis.
pub fn concat_channels(imgs: &[Array3<f32>]) -> Result<Array3<f32>> {
    let (_, h, w) = imgs.first().ok_or_else(|| Error::msg("cannot concatenate zero images"))?.dim();
    let mut c = 0;
    for img in imgs {
        let (ci, hi, wi) = img.dim();
        if (hi, wi) != (h, w) {
            return Err(Error::msg(format!("image of size {}x{} does not match {}x{}", hi, wi, h, w)));
        }
        c += ci;
    }
    let mut out = Array3::<f32>::zeros((c, h, w));
    let mut start = 0;
    for img in imgs {
        let end = start + img.dim().0;
        out.slice_mut(s![start..end, .., ..]).assign(img);
        start = end;
    }
    Ok(out)
}

/// Assumes that all the 3d arrays have the same size, this function
/// stacks them in a new first dimension. [C, H, W] -> [B, C, H, W]
pub fn stack(imgs: &[&Array3<f32>]) -> Result<Array4<f32>> {
    let chw = imgs.first().ok_or_else(|| Error::msg("cannot stack an empty batch"))?.dim();
    let b = imgs.len();
    let mut out = Array4::<f32>::zeros((b, chw.0, chw.1, chw.2));
    for (i, img) in imgs.iter().enumerate() {
        if img.dim() != chw {
            return Err(Error::msg(format!("sample {} has shape {:?}, expected {:?}", i, img.dim(), chw)));
        }
        out.slice_mut(s![i, .., .., ..]).assign(*img);
    }
    Ok(out)
}

/// Lays content, ground truth and every style glyph side by side.
pub fn preview_strip(sample: &FontSample) -> GrayImage {
    let (_, h, w) = sample.content.dim();
    let channels = sample
        .content
        .outer_iter()
        .chain(sample.ground_truth.outer_iter())
        .chain(sample.style.outer_iter())
        .collect::<Vec<_>>();
    let mut strip = GrayImage::new((w * channels.len()) as u32, h as u32);
    for (k, ch) in channels.iter().enumerate() {
        imageops::replace(&mut strip, &to_image(ch), (k * w) as i64, 0);
    }
    strip
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample(fill: f32, style_channel: usize) -> FontSample {
        FontSample {
            content: Array3::from_elem((1, 4, 4), fill),
            ground_truth: Array3::from_elem((1, 4, 4), -fill),
            style: Array3::from_elem((style_channel, 4, 4), fill),
            style_paths: vec![PathBuf::from("s.png"); style_channel],
            image_path: PathBuf::from(format!("{}.png", fill)),
        }
    }

    #[test]
    fn concat_keeps_channel_order() {
        let a = Array3::from_elem((1, 2, 2), 1.0f32);
        let b = Array3::from_elem((2, 2, 2), 2.0f32);
        let c = concat_channels(&[a, b]).unwrap();
        assert_eq!(c.dim(), (3, 2, 2));
        assert!(c.index_axis(Axis(0), 0).iter().all(|&v| v == 1.0));
        assert!(c.slice(s![1.., .., ..]).iter().all(|&v| v == 2.0));
    }

    #[test]
    fn concat_rejects_mismatched_sizes() {
        let a = Array3::<f32>::zeros((1, 2, 2));
        let b = Array3::<f32>::zeros((1, 3, 2));
        assert!(concat_channels(&[a, b]).is_err());
        assert!(concat_channels(&[]).is_err());
    }

    #[test]
    fn collate_batch() {
        let batch = FontBatch::collate(vec![sample(0.5, 3), sample(-0.25, 3)]).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.content.dim(), (2, 1, 4, 4));
        assert_eq!(batch.style.dim(), (2, 3, 4, 4));
        assert_eq!(batch.ground_truth[[1, 0, 3, 3]], 0.25);
        assert_eq!(batch.image_paths, vec![PathBuf::from("0.5.png"), PathBuf::from("-0.25.png")]);
        assert_eq!(batch.style_paths[1].len(), 3);

        let second = batch.sample(1).unwrap();
        assert_eq!(second.ground_truth, Array3::from_elem((1, 4, 4), 0.25f32));
        assert_eq!(second.image_path, PathBuf::from("-0.25.png"));
        assert!(batch.sample(2).is_none());
    }

    #[test]
    fn collate_rejects_ragged_style() {
        assert!(FontBatch::collate(vec![sample(0.0, 2), sample(0.0, 3)]).is_err());
    }

    #[test]
    fn strip_width() {
        let strip = preview_strip(&sample(1.0, 2));
        assert_eq!(strip.dimensions(), (16, 4));
        assert_eq!(strip.get_pixel(0, 0)[0], 255);
        assert_eq!(strip.get_pixel(4, 0)[0], 0);
    }
}
