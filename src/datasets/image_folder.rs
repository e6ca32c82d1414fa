use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Error, Result};
use itertools::Itertools;

/// Extensions recognised as images (case-insensitive).
pub const IMG_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "ppm", "bmp", "tif", "tiff", "webp"];

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMG_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Recursively collects every image under `dir`, sorted, keeping at most `max_dataset_size`.
pub fn make_dataset(dir: &Path, max_dataset_size: Option<usize>) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::msg(format!("{} is not a valid directory", dir.display())));
    }
    let mut images = Vec::new();
    collect_images(dir, &mut images)?;
    images.sort();
    if let Some(max) = max_dataset_size {
        images.truncate(max);
    }
    Ok(images)
}

fn collect_images(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read dir {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_images(&path, out)?;
        } else if is_image(&path) {
            out.push(path);
        }
    }
    Ok(())
}

/// Sorted names of the sub directories of `dir`.
pub fn list_dirs(dir: &Path) -> Result<Vec<String>> {
    list_entries(dir, |p| p.is_dir())
}

/// Sorted names of the regular files directly inside `dir`.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    list_entries(dir, |p| p.is_file())
}

fn list_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read dir {}", dir.display()))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if keep(&entry.path()) {
            let name = entry
                .file_name()
                .into_string()
                .map_err(|n| Error::msg(format!("{:?} in {} is not valid utf-8", n, dir.display())))?;
            names.push(name);
        }
    }
    Ok(names.into_iter().sorted().collect())
}

#[cfg(test)]
mod test {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn image_extensions() {
        assert!(is_image(Path::new("a/b.png")));
        assert!(is_image(Path::new("a/b.JPG")));
        assert!(is_image(Path::new("b.tiff")));
        assert!(!is_image(Path::new("a/b.txt")));
        assert!(!is_image(Path::new("a/png")));
    }

    #[test]
    fn recursive_sorted_and_capped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("b/2.png"));
        touch(&root.join("a/9.png"));
        touch(&root.join("a/1.png"));
        touch(&root.join("a/notes.txt"));
        touch(&root.join("c.jpg"));

        let all = make_dataset(root, None).unwrap();
        let rel: Vec<_> = all.iter().map(|p| p.strip_prefix(root).unwrap().to_path_buf()).collect();
        assert_eq!(rel, vec![
            PathBuf::from("a/1.png"),
            PathBuf::from("a/9.png"),
            PathBuf::from("b/2.png"),
            PathBuf::from("c.jpg"),
        ]);

        let capped = make_dataset(root, Some(2)).unwrap();
        assert_eq!(capped, all[..2].to_vec());
        assert_eq!(make_dataset(root, Some(100)).unwrap().len(), 4);
    }

    #[test]
    fn missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(make_dataset(&dir.path().join("missing"), None).is_err());
    }

    #[test]
    fn listings_are_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("Zeta/a.png"));
        touch(&root.join("Arial/b.png"));
        touch(&root.join("readme.md"));
        assert_eq!(list_dirs(root).unwrap(), vec!["Arial", "Zeta"]);
        assert_eq!(list_files(root).unwrap(), vec!["readme.md"]);
    }
}
