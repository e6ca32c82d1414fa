//! This module only defines the dataset logic for loading and processing the
//! font glyph datasets, the binary only wires options and logging around it.
use anyhow::Result;
use rand::Rng;

pub mod data;
pub mod font;
pub mod image_folder;
pub mod loader;
pub mod options;
pub mod path;
pub mod transforms;

pub use data::{FontBatch, FontSample};
pub use font::{FontDataset, FontDatasetError};
pub use loader::FontLoader;
pub use options::{Direction, FontOptions, Phase};
pub use path::{FontPath, PathLayoutError};

/// The universal Dataset trait, which is the final object
/// passed to the model for training
pub trait Dataset {
    type DataPoint;
    fn next(&mut self) -> Option<Self::DataPoint>;
    fn reset(&mut self);
    fn shuffle(&mut self);
}

/// Random access over a fixed list of samples. Randomness used while building
/// a sample comes from the caller so that runs can be seeded.
pub trait IndexedDataset: Sync + Send {
    type Item;
    fn len(&self) -> usize;
    fn get<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Result<Self::Item>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
