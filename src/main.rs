use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use fontnet_lib::datasets::data::preview_strip;
use fontnet_lib::datasets::{Dataset, Direction, FontBatch, FontDataset, FontLoader, FontOptions, Phase};

/// Builds a font glyph dataset and walks one epoch of it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ron file with dataset options, flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    dataroot: Option<PathBuf>,

    /// train, test or generate
    #[arg(long)]
    phase: Option<Phase>,

    /// english2russian, english2extcyr, english2special; anything else is russian2english
    #[arg(long)]
    direction: Option<String>,

    #[arg(long)]
    style_channel: Option<usize>,

    #[arg(long)]
    load_size: Option<u32>,

    #[arg(long)]
    max_dataset_size: Option<usize>,

    #[arg(long)]
    batch_size: Option<usize>,

    /// keep file order instead of shuffling
    #[arg(long)]
    serial_batches: bool,

    #[arg(long)]
    seed: Option<u64>,

    /// write content | ground truth | style strips of the first batch here
    #[arg(long)]
    preview_dir: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> Result<FontOptions> {
        let mut opts = match &self.config {
            Some(path) => FontOptions::from_file(path)?,
            None => FontOptions::default(),
        };
        if let Some(d) = &self.dataroot {
            opts.dataroot = d.clone();
        }
        if let Some(p) = self.phase {
            opts.phase = p;
        }
        if let Some(d) = &self.direction {
            opts.direction = Direction::from_name(d);
        }
        if let Some(c) = self.style_channel {
            opts.style_channel = c;
        }
        if let Some(s) = self.load_size {
            opts.load_size = s;
        }
        if self.max_dataset_size.is_some() {
            opts.max_dataset_size = self.max_dataset_size;
        }
        if let Some(b) = self.batch_size {
            opts.batch_size = b;
        }
        if self.serial_batches {
            opts.serial_batches = true;
        }
        if self.seed.is_some() {
            opts.seed = self.seed;
        }
        Ok(opts)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let opts = args.options()?;
    log::info!("options: {:?}", opts);

    let dataset = FontDataset::new(&opts)?;
    let mut loader = FontLoader::from_options(&dataset, &opts)?;
    log::info!("{} samples, {} batches of {}", dataset.len(), loader.num_batches(), opts.batch_size);

    let mut step = 0;
    while let Some(batch) = loader.next() {
        let batch = batch?;
        if step == 0 {
            if let Some(dir) = &args.preview_dir {
                write_previews(dir, &batch)?;
            }
        }
        log::debug!(
            "batch {}: content {:?} ground truth {:?} style {:?}",
            step,
            batch.content.shape(),
            batch.ground_truth.shape(),
            batch.style.shape()
        );
        step += 1;
    }
    log::info!("walked {} batches", step);
    Ok(())
}

fn write_previews(dir: &Path, batch: &FontBatch) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    for i in 0..batch.len() {
        let Some(sample) = batch.sample(i) else { continue };
        let out = dir.join(format!("preview_{}.png", i));
        preview_strip(&sample)
            .save(&out)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        log::info!("wrote {} for {}", out.display(), sample.image_path.display());
    }
    Ok(())
}
