use std::path::{Path, PathBuf};

use anyhow::{Context, Error, Result};
use rand::seq::index;
use rand::Rng;

use super::data::{concat_channels, FontSample};
use super::image_folder::{list_dirs, list_files, make_dataset};
use super::options::{FontOptions, Phase};
use super::path::FontPath;
use super::transforms::GlyphTransform;
use super::IndexedDataset;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FontDatasetError {
    #[error("index {index} out of range for dataset of size {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{dir} holds {available} glyphs, cannot sample {requested} style references")]
    NotEnoughStyleGlyphs { dir: PathBuf, available: usize, requested: usize },

    #[error("no style fonts found under {dir}")]
    NoStyleFonts { dir: PathBuf },
}

/// Pairs every glyph of the content language with its unstyled source glyph
/// and a random handful of glyphs from the same font in the style language.
///
/// Only the file list is built eagerly, images are read on every access.
#[derive(Debug, Clone)]
pub struct FontDataset {
    dataroot: PathBuf,
    phase: Phase,
    content_language: &'static str,
    style_language: &'static str,
    style_channel: usize,
    paths: Vec<PathBuf>,
    transform: GlyphTransform,
}

impl FontDataset {
    pub fn new(opts: &FontOptions) -> Result<FontDataset> {
        if opts.style_channel == 0 {
            return Err(Error::msg("style_channel cannot be zero"));
        }
        if opts.load_size == 0 {
            return Err(Error::msg("load_size cannot be zero"));
        }
        let (content_language, style_language) = opts.direction.languages();
        let root = opts.dataset_root();
        let paths = make_dataset(&root, opts.max_dataset_size)
            .with_context(|| format!("Failed to scan font dataset at {}", root.display()))?;
        log::info!(
            "{} font dataset: {} glyphs under {} (content {}, style {})",
            opts.phase,
            paths.len(),
            root.display(),
            content_language,
            style_language
        );
        Ok(FontDataset {
            dataroot: opts.dataroot.clone(),
            phase: opts.phase,
            content_language,
            style_language,
            style_channel: opts.style_channel,
            paths,
            transform: GlyphTransform::new(opts.load_size),
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn style_channel(&self) -> usize {
        self.style_channel
    }

    /// Loads sample `index`, drawing the style references from `rng`.
    pub fn get<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Result<FontSample> {
        let gt_path = self
            .paths
            .get(index)
            .ok_or(FontDatasetError::IndexOutOfRange { index, len: self.paths.len() })?;
        let parts = FontPath::parse(&self.dataroot, gt_path)?;
        let style_paths = self.style_paths(&parts, rng)?;
        let content_path = parts.source_path(self.content_language);
        log::debug!("sample {}: {} -> {}", index, content_path.display(), gt_path.display());

        let content = self.transform.load(&content_path)?;
        let ground_truth = self.transform.load(gt_path)?;
        let style = style_paths
            .iter()
            .map(|p| self.transform.load(p))
            .collect::<Result<Vec<_>>>()?;
        let style = concat_channels(&style)?;

        let image_path = match self.phase {
            Phase::Train => gt_path.clone(),
            _ => {
                let font = style_paths[0]
                    .parent()
                    .and_then(Path::file_name)
                    .ok_or_else(|| Error::msg(format!("style path {} has no font dir", style_paths[0].display())))?;
                Path::new(font).join(&parts.letter)
            }
        };

        Ok(FontSample { content, ground_truth, style, style_paths, image_path })
    }

    /// [`FontDataset::get`] with the thread local rng.
    pub fn sample(&self, index: usize) -> Result<FontSample> {
        self.get(index, &mut rand::thread_rng())
    }

    fn style_paths<R: Rng + ?Sized>(&self, parts: &FontPath, rng: &mut R) -> Result<Vec<PathBuf>> {
        let font = match self.phase {
            Phase::Generate => {
                let fonts_dir = parts.fonts_dir(self.style_language);
                let fonts = if fonts_dir.is_dir() { list_dirs(&fonts_dir)? } else { Vec::new() };
                fonts
                    .into_iter()
                    .next()
                    .ok_or(FontDatasetError::NoStyleFonts { dir: fonts_dir })?
            }
            _ => parts.require_font()?.to_string(),
        };
        let font_dir = parts.font_dir(self.style_language, &font);
        let letters = list_files(&font_dir)?;
        if letters.len() < self.style_channel {
            return Err(FontDatasetError::NotEnoughStyleGlyphs {
                dir: font_dir,
                available: letters.len(),
                requested: self.style_channel,
            }
            .into());
        }
        Ok(index::sample(rng, letters.len(), self.style_channel)
            .into_iter()
            .map(|i| font_dir.join(&letters[i]))
            .collect())
    }
}

impl IndexedDataset for FontDataset {
    type Item = FontSample;

    fn len(&self) -> usize {
        FontDataset::len(self)
    }

    fn get<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Result<FontSample> {
        FontDataset::get(self, index, rng)
    }
}
