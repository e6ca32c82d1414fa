use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::Config;

/// Which language provides the style references and which one the content glyphs.
/// The name reads `<style>2<content>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(Display, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(from = "String", into = "String")]
pub enum Direction {
    English2Russian,
    English2Extcyr,
    English2Special,
    #[default]
    Russian2English,
}

impl Direction {
    /// Parses a direction name, falling back to the default pair on anything unknown.
    pub fn from_name(name: &str) -> Direction {
        Direction::from_str(name).unwrap_or_else(|_| {
            log::warn!(
                "unrecognized direction {:?}, falling back to {}",
                name,
                Direction::default()
            );
            Direction::default()
        })
    }

    /// (content language, style language)
    pub fn languages(&self) -> (&'static str, &'static str) {
        match self {
            Self::English2Russian => ("russian", "english"),
            Self::English2Extcyr => ("extcyr", "english"),
            Self::English2Special => ("special", "english"),
            Self::Russian2English => ("english", "russian"),
        }
    }

    pub fn content_language(&self) -> &'static str {
        self.languages().0
    }

    pub fn style_language(&self) -> &'static str {
        self.languages().1
    }
}

impl From<String> for Direction {
    fn from(name: String) -> Self {
        Direction::from_name(&name)
    }
}

impl From<Direction> for String {
    fn from(d: Direction) -> Self {
        d.to_string()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(Display, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Train,
    Test,
    /// Inference over unpaired content glyphs, styled after the first style font on disk.
    Generate,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// All flags needed to build a [`super::FontDataset`] and iterate it with a [`super::FontLoader`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontOptions {
    pub dataroot: PathBuf,
    pub phase: Phase,
    pub direction: Direction,
    /// number of style glyphs sampled per content glyph
    pub style_channel: usize,
    /// square edge every glyph is resized to
    pub load_size: u32,
    pub max_dataset_size: Option<usize>,
    pub batch_size: usize,
    /// iterate in file order instead of shuffling every epoch
    pub serial_batches: bool,
    pub seed: Option<u64>,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            dataroot: PathBuf::from("datasets/font"),
            phase: Phase::Train,
            direction: Direction::default(),
            style_channel: 6,
            load_size: 64,
            max_dataset_size: None,
            batch_size: 1,
            serial_batches: false,
            seed: None,
        }
    }
}

impl FontOptions {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let serialized = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut opts = FontOptions::default();
        opts.load_config(&serialized)?;
        Ok(opts)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(path, self.config()?)
            .with_context(|| format!("Failed to write config {}", path.display()))
    }

    /// The directory scanned for ground-truth glyphs.
    pub fn dataset_root(&self) -> PathBuf {
        let phase = self.dataroot.join(self.phase.name());
        match self.phase {
            Phase::Generate => phase.join("source").join(self.direction.content_language()),
            _ => phase.join(self.direction.content_language()),
        }
    }
}
