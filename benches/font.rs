#[macro_use]
extern crate bencher;

use std::fs;
use std::path::Path;

use bencher::Bencher;
use image::{GrayImage, Luma};
use rand::rngs::StdRng;
use rand::SeedableRng;

use fontnet_lib::datasets::{Dataset, Direction, FontDataset, FontLoader, FontOptions, Phase};

fn glyph(path: &Path, size: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    GrayImage::from_fn(size, size, |x, y| Luma([((x * y) % 256) as u8]))
        .save(path)
        .unwrap();
}

fn font_tree(root: &Path) -> FontOptions {
    for font in ["Arial", "Times"] {
        for l in 0..26 {
            glyph(&root.join(format!("train/russian/{font}/{l}.png")), 80);
            glyph(&root.join(format!("train/english/{font}/{l}.png")), 80);
        }
    }
    for l in 0..26 {
        glyph(&root.join(format!("train/source/russian/{l}.png")), 80);
    }
    FontOptions {
        dataroot: root.to_path_buf(),
        phase: Phase::Train,
        direction: Direction::English2Russian,
        batch_size: 8,
        ..Default::default()
    }
}

fn bench_sample(bench: &mut Bencher) {
    let dir = tempfile::tempdir().unwrap();
    let ds = FontDataset::new(&font_tree(dir.path())).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let mut i = 0;
    bench.iter(|| {
        let s = ds.get(i % ds.len(), &mut rng).unwrap();
        i += 1;
        s
    })
}

fn bench_batch(bench: &mut Bencher) {
    let dir = tempfile::tempdir().unwrap();
    let opts = font_tree(dir.path());
    let ds = FontDataset::new(&opts).unwrap();
    let mut loader = FontLoader::from_options(&ds, &opts).unwrap();
    bench.iter(|| match loader.next() {
        Some(batch) => batch.unwrap().len(),
        None => {
            loader.reset();
            0
        }
    })
}

benchmark_group!(benches, bench_sample, bench_batch);
benchmark_main!(benches);
