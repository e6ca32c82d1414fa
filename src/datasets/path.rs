use std::path::{Component, Path, PathBuf};

/// Marker directory holding the canonical, unstyled glyphs of a language.
pub const SOURCE_DIR: &str = "source";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathLayoutError {
    #[error("{path} is not under dataset root {root}")]
    NotUnderRoot { path: PathBuf, root: PathBuf },

    #[error("{path} has {found} segments below the dataset root, expected 4 (phase/language/font/letter or phase/source/language/letter)")]
    SegmentCount { path: PathBuf, found: usize },

    #[error("{path} contains a segment that is not valid utf-8")]
    NonUtf8 { path: PathBuf },

    #[error("{path} is a source glyph, a font directory was expected")]
    MissingFont { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlyphKind {
    /// `root/phase/source/<language>/<letter>`
    Source { language: String },
    /// `root/phase/<language>/<font>/<letter>`
    Styled { language: String, font: String },
}

/// A glyph file path split into its named parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontPath {
    pub root: PathBuf,
    pub phase: String,
    pub kind: GlyphKind,
    pub letter: String,
}

impl FontPath {
    pub fn parse<R: AsRef<Path>, P: AsRef<Path>>(root: R, path: P) -> Result<FontPath, PathLayoutError> {
        let root = root.as_ref();
        let path = path.as_ref();
        let rel = path.strip_prefix(root).map_err(|_| PathLayoutError::NotUnderRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;

        let mut segments = Vec::with_capacity(4);
        for c in rel.components() {
            match c {
                Component::Normal(s) => {
                    let s = s.to_str().ok_or_else(|| PathLayoutError::NonUtf8 { path: path.to_path_buf() })?;
                    segments.push(s.to_string());
                }
                Component::CurDir => {}
                _ => return Err(PathLayoutError::SegmentCount { path: path.to_path_buf(), found: rel.components().count() }),
            }
        }

        let [phase, second, third, letter]: [String; 4] = segments
            .try_into()
            .map_err(|s: Vec<String>| PathLayoutError::SegmentCount { path: path.to_path_buf(), found: s.len() })?;

        let kind = if second == SOURCE_DIR {
            GlyphKind::Source { language: third }
        } else {
            GlyphKind::Styled { language: second, font: third }
        };
        Ok(FontPath { root: root.to_path_buf(), phase, kind, letter })
    }

    /// `root/phase`
    pub fn prefix(&self) -> PathBuf {
        self.root.join(&self.phase)
    }

    pub fn language(&self) -> &str {
        match &self.kind {
            GlyphKind::Source { language } => language,
            GlyphKind::Styled { language, .. } => language,
        }
    }

    pub fn font(&self) -> Option<&str> {
        match &self.kind {
            GlyphKind::Source { .. } => None,
            GlyphKind::Styled { font, .. } => Some(font),
        }
    }

    pub fn require_font(&self) -> Result<&str, PathLayoutError> {
        self.font().ok_or_else(|| PathLayoutError::MissingFont { path: self.to_path() })
    }

    /// `root/phase/source/<language>/<letter>`, the unstyled glyph for the same letter.
    pub fn source_path(&self, language: &str) -> PathBuf {
        self.prefix().join(SOURCE_DIR).join(language).join(&self.letter)
    }

    /// `root/phase/<language>`, the directory holding one sub directory per font.
    pub fn fonts_dir(&self, language: &str) -> PathBuf {
        self.prefix().join(language)
    }

    pub fn font_dir(&self, language: &str, font: &str) -> PathBuf {
        self.fonts_dir(language).join(font)
    }

    pub fn to_path(&self) -> PathBuf {
        match &self.kind {
            GlyphKind::Source { language } => self.source_path(language),
            GlyphKind::Styled { language, font } => self.font_dir(language, font).join(&self.letter),
        }
    }
}
