//! Map asset catalog.
//!
//! The [`AssetCatalog`] enumerates the background maps an operator can pick
//! from. It recomputes its list on every call; ordering is whatever the
//! underlying [`AssetSource`] yields.
//!
//! [`DirectorySource`] scans one directory for `.png` files and gives each a
//! content-fingerprinted URL (`<url_base>/<stem>-<fingerprint>.png`), the form
//! the renderer reports back and the rendered-URL adapter in
//! [`crate::resources::mapname`] understands.

use crate::resources::mapname::{MAP_EXTENSION, MapName};
use log::warn;
use rustc_hash::{FxHashMap, FxHasher};
use std::fs;
use std::hash::Hasher;
use std::io;
use std::path::{Path, PathBuf};

/// A background map the rendering engine can display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapAsset {
    /// Catalog key; a path-like string ending in the asset's file name.
    pub name: String,
    /// Resolved URL handed to the rendering engine.
    pub url: String,
}

impl MapAsset {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Canonical name derived from the catalog key, if it parses.
    pub fn map_name(&self) -> Option<MapName> {
        MapName::from_catalog_key(&self.name).ok()
    }
}

/// Enumerator over a fixed set of map resources.
pub trait AssetSource {
    /// Yield the available assets as `(key, resolved URL)` pairs.
    fn entries(&self) -> Vec<MapAsset>;
}

/// Fixed list of assets.
#[derive(Debug, Clone, Default)]
pub struct StaticSource(pub Vec<MapAsset>);

impl AssetSource for StaticSource {
    fn entries(&self) -> Vec<MapAsset> {
        self.0.clone()
    }
}

/// `.png` files found directly inside one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    url_base: String,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>, url_base: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_base: url_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Map files sorted by file name.
    fn map_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(MAP_EXTENSION))
            })
            .collect();
        files.sort();
        Ok(files)
    }

    /// Catalog key for a file: `./<dir-name>/<file-name>`.
    fn key_for(&self, path: &Path) -> Option<String> {
        let file_name = path.file_name()?.to_str()?;
        let dir_name = self
            .dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(".");
        Some(format!("./{}/{}", dir_name, file_name))
    }

    /// Resolved URL for a file, fingerprinted with its contents.
    fn url_for(&self, path: &Path) -> io::Result<Option<String>> {
        let Some(stem) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(MAP_EXTENSION))
        else {
            return Ok(None);
        };
        let bytes = fs::read(path)?;
        Ok(Some(format!(
            "{}/{}-{}{}",
            self.url_base,
            stem,
            fingerprint(&bytes),
            MAP_EXTENSION
        )))
    }

    /// Lookup from both catalog keys and resolved URLs to the file on disk.
    pub fn index(&self) -> io::Result<FxHashMap<String, PathBuf>> {
        let mut index = FxHashMap::default();
        for path in self.map_files()? {
            let Some(key) = self.key_for(&path) else {
                continue;
            };
            if let Some(url) = self.url_for(&path)? {
                index.insert(url, path.clone());
            }
            index.insert(key, path);
        }
        Ok(index)
    }
}

impl AssetSource for DirectorySource {
    fn entries(&self) -> Vec<MapAsset> {
        let files = match self.map_files() {
            Ok(files) => files,
            Err(e) => {
                warn!("Cannot list map directory {:?}: {}", self.dir, e);
                return Vec::new();
            }
        };
        files
            .iter()
            .filter_map(|path| {
                let key = self.key_for(path)?;
                match self.url_for(path) {
                    Ok(Some(url)) => Some(MapAsset::new(key, url)),
                    Ok(None) => None,
                    Err(e) => {
                        warn!("Skipping unreadable map {:?}: {}", path, e);
                        None
                    }
                }
            })
            .collect()
    }
}

/// 20 hex digits derived from the content, in the style of bundler asset names.
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut first = FxHasher::default();
    first.write(bytes);
    let mut second = FxHasher::default();
    second.write_usize(bytes.len());
    second.write(bytes);
    let hex = format!("{:016x}{:016x}", first.finish(), second.finish());
    hex[..20].to_string()
}

/// Catalog of selectable maps over an [`AssetSource`].
#[derive(Debug, Clone)]
pub struct AssetCatalog<S> {
    source: S,
}

impl<S: AssetSource> AssetCatalog<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Current list of map assets; recomputed on every call.
    pub fn enumerate(&self) -> Vec<MapAsset> {
        self.source.entries()
    }
}
