//! Localization: per-language text catalogs loaded from a directory.
//!
//! Each language lives in `<dir>/<lang>.json`. A [`Localizer`] is built
//! once at startup and passed to whatever needs translated text.

mod catalog;

pub use catalog::Catalog;

use crate::error::LocaleError;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

/// The active language and its catalog.
#[derive(Debug, Clone)]
pub struct Localizer {
    dir: PathBuf,
    language: String,
    catalog: Catalog,
}

impl Localizer {
    /// Load `lang` from the catalogs in `dir`.
    pub fn load(dir: impl Into<PathBuf>, lang: &str) -> Result<Self, LocaleError> {
        let dir = dir.into();
        let catalog = read_catalog(&dir, lang)?;
        Ok(Self {
            dir,
            language: lang.to_string(),
            catalog,
        })
    }

    /// Switch to `lang`. On error the current language stays active.
    pub fn set_language(&mut self, lang: &str) -> Result<(), LocaleError> {
        self.catalog = read_catalog(&self.dir, lang)?;
        self.language = lang.to_string();
        tracing::debug!(lang, "language changed");
        Ok(())
    }

    /// The active language code.
    pub fn current_language(&self) -> &str {
        &self.language
    }

    /// The active catalog.
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Translated text for `key`; see [`Catalog::text`].
    pub fn text(&self, key: &str, args: &[&dyn Display]) -> String {
        self.catalog.text(key, args)
    }

    /// Language codes with a catalog in the directory, sorted.
    pub fn supported_languages(&self) -> Result<Vec<String>, LocaleError> {
        let read_dir_error = |source: std::io::Error| LocaleError::ReadDir {
            path: self.dir.clone(),
            source,
        };

        let mut languages = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(read_dir_error)? {
            let path = entry.map_err(read_dir_error)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    languages.push(stem.to_string());
                }
            }
        }
        languages.sort();
        Ok(languages)
    }
}

fn read_catalog(dir: &Path, lang: &str) -> Result<Catalog, LocaleError> {
    let path = dir.join(format!("{lang}.json"));
    let json = fs::read_to_string(&path).map_err(|source| LocaleError::Read { path, source })?;
    Catalog::from_json(&json)
}
