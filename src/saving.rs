use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::debug;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::builder::build_tree_from_records;
use crate::downloader::to_csv;
use crate::error::StoreError;
use crate::loader::parse_records;
use crate::vocab::{Category, VocabularyTree};

/// Where the canonical tree lives between runs.
///
/// The pipeline itself never touches storage: callers `load`, merge in
/// memory, then `save`. Two writers against the same store must be
/// serialized by the caller.
pub trait TreeStore {
    fn load(&self) -> Result<VocabularyTree, StoreError>;
    fn save(&self, tree: &VocabularyTree) -> Result<(), StoreError>;
}

/// The tree as one JSON document, gzip-compressed when the path ends in `.gz`.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn compressed(&self) -> bool {
        has_extension(&self.path, "gz")
    }
}

impl TreeStore for JsonFileStore {
    /// A missing file is an empty tree.
    fn load(&self) -> Result<VocabularyTree, StoreError> {
        if !self.path.exists() {
            debug!("{} does not exist yet, starting empty", self.path.display());
            return Ok(VocabularyTree::new());
        }

        let file = File::open(&self.path)?;
        let tree = if self.compressed() {
            serde_json::from_reader(BufReader::new(GzDecoder::new(file)))?
        } else {
            serde_json::from_reader(BufReader::new(file))?
        };
        Ok(tree)
    }

    fn save(&self, tree: &VocabularyTree) -> Result<(), StoreError> {
        let compressed = self.compressed();
        write_atomically(&self.path, |file| {
            if compressed {
                let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
                serde_json::to_writer_pretty(&mut encoder, tree)?;
                encoder.finish()?.flush()?;
            } else {
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, tree)?;
                writer.write_all(b"\n")?;
                writer.flush()?;
            }
            Ok(())
        })
    }
}

/// The tree flattened to one CSV row per vocabulary entry.
pub struct CsvTableStore {
    path: PathBuf,
}

impl CsvTableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvTableStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TreeStore for CsvTableStore {
    fn load(&self) -> Result<VocabularyTree, StoreError> {
        if !self.path.exists() {
            return Ok(VocabularyTree::new());
        }
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(VocabularyTree::new());
        }
        let records = parse_records(&text)?;
        let (tree, _) = build_tree_from_records(&records);
        Ok(tree)
    }

    fn save(&self, tree: &VocabularyTree) -> Result<(), StoreError> {
        let csv = to_csv(tree);
        write_atomically(&self.path, |file| {
            let mut writer = BufWriter::new(file);
            writer.write_all(csv.as_bytes())?;
            writer.flush()?;
            Ok(())
        })
    }
}

/// Picks a store from the file extension: `.json`, `.json.gz` or `.csv`.
pub fn open_store(path: impl AsRef<Path>) -> Result<Box<dyn TreeStore>, StoreError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("json") | Some("gz") => Ok(Box::new(JsonFileStore::new(path))),
        Some("csv") => Ok(Box::new(CsvTableStore::new(path))),
        Some(ext) => Err(StoreError::UnsupportedExtension(ext.to_string())),
        None => Err(StoreError::UnsupportedExtension(String::new())),
    }
}

pub fn load_tree(path: impl AsRef<Path>) -> Result<VocabularyTree, StoreError> {
    open_store(path)?.load()
}

pub fn save_tree(tree: &VocabularyTree, path: impl AsRef<Path>) -> Result<(), StoreError> {
    open_store(path)?.save(tree)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PendingDocument {
    Many(Vec<Category>),
    One(Category),
}

/// Reads a pending-contribution file: either one category object or an
/// array of them. Returns `None` when the file does not exist.
pub fn load_pending(path: impl AsRef<Path>) -> Result<Option<VocabularyTree>, StoreError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let mut text = String::new();
    File::open(path)?.read_to_string(&mut text)?;

    let tree = match serde_json::from_str(&text)? {
        PendingDocument::Many(categories) => VocabularyTree::from(categories),
        PendingDocument::One(category) => VocabularyTree::from(vec![category]),
    };
    Ok(Some(tree))
}

// Write to a temp file next to `path`, then rename over it, so readers
// never see a half-written document.
fn write_atomically<F>(path: &Path, write: F) -> Result<(), StoreError>
where
    F: FnOnce(&File) -> Result<(), StoreError>,
{
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    write(temp_file.as_file())?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
