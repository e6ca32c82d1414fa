use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::data::{FontBatch, FontSample};
use super::font::FontDataset;
use super::options::FontOptions;
use super::{Dataset, IndexedDataset};

/// Walks an indexed dataset in batches. The last batch of an epoch may be short.
pub struct FontLoader<'a, D = FontDataset> {
    dataset: &'a D,
    order: Vec<usize>,
    idx: usize,
    batch_size: usize,
    shuffle: bool,
    rng: StdRng,
}

impl<'a, D> FontLoader<'a, D>
where
    D: IndexedDataset<Item = FontSample>,
{
    pub fn new(dataset: &'a D, batch_size: usize, shuffle: bool, seed: Option<u64>) -> Result<Self> {
        if batch_size == 0 {
            return Err(anyhow::Error::msg("batch size cannot be zero"));
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut loader = FontLoader {
            dataset,
            order: (0..dataset.len()).collect(),
            idx: 0,
            batch_size,
            shuffle,
            rng,
        };
        if shuffle {
            Dataset::shuffle(&mut loader);
        }
        Ok(loader)
    }

    pub fn from_options(dataset: &'a D, opts: &FontOptions) -> Result<Self> {
        Self::new(dataset, opts.batch_size, !opts.serial_batches, opts.seed)
    }

    pub fn num_batches(&self) -> usize {
        (self.order.len() + self.batch_size - 1) / self.batch_size
    }

    /// Sample indices in the order the current epoch visits them.
    pub fn order(&self) -> &[usize] {
        &self.order
    }
}

impl<'a, D> Dataset for FontLoader<'a, D>
where
    D: IndexedDataset<Item = FontSample>,
{
    type DataPoint = Result<FontBatch>;

    fn next(&mut self) -> Option<Self::DataPoint> {
        if self.idx >= self.order.len() {
            return None;
        }
        let end = (self.idx + self.batch_size).min(self.order.len());
        let mut samples = Vec::with_capacity(end - self.idx);
        for &i in &self.order[self.idx..end] {
            match self.dataset.get(i, &mut self.rng) {
                Ok(s) => samples.push(s),
                Err(e) => {
                    self.idx = end;
                    return Some(Err(e));
                }
            }
        }
        self.idx = end;
        Some(FontBatch::collate(samples))
    }

    /// Rewinds to the start of the epoch, reshuffling if enabled.
    fn reset(&mut self) {
        self.idx = 0;
        if self.shuffle {
            self.shuffle();
        }
    }

    fn shuffle(&mut self) {
        self.order.shuffle(&mut self.rng);
    }
}
