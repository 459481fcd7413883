use serde::de::DeserializeOwned;
use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};
use thiserror::Error;
use zip::ZipArchive;

use crate::shared::ValidationError;

mod config;
pub mod models;
mod record;
pub use config::*;
pub use record::*;

/// Location of the development dataset, relative to the working directory.
pub const DEFAULT_DIRECTORY: &str = "support";

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
    #[error("Invalid record on row {row} of {file}: {source}")]
    InvalidRecord {
        file: String,
        row: usize,
        source: ValidationError,
    },
}

#[derive(Debug, Clone)]
pub enum StorageType {
    Directory(PathBuf),
    Zip(PathBuf),
}

impl Default for StorageType {
    fn default() -> Self {
        Self::Directory(DEFAULT_DIRECTORY.into())
    }
}

/// Tabular storage for the three entity tables.
///
/// Every table is a CSV file with a header row. The files either sit side by
/// side in a directory or together in a zip archive.
#[derive(Debug, Clone, Default)]
pub struct Storage {
    config: Config,
    storage: StorageType,
}

impl Storage {
    pub fn new(config: self::Config) -> Self {
        Self {
            config,
            storage: Default::default(),
        }
    }

    pub fn from_directory<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.storage = StorageType::Directory(path.into());
        self
    }

    pub fn from_zip<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.storage = StorageType::Zip(path.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage_type(&self) -> &StorageType {
        &self.storage
    }

    /// Streams every row of `file_name` in storage order.
    /// Stops at the first row that fails to parse or that `f` rejects.
    pub fn stream<T, F>(&self, file_name: &str, f: F) -> Result<(), self::Error>
    where
        T: DeserializeOwned,
        F: FnMut((usize, T)) -> Result<(), self::Error>,
    {
        match &self.storage {
            StorageType::Directory(path) => stream_from_directory(path, file_name, f),
            StorageType::Zip(path) => stream_from_zip(path, file_name, f),
        }
    }

    /// Reads every row of `file_name` in storage order.
    pub fn records<T: DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>, self::Error> {
        let mut records = Vec::new();
        self.stream(file_name, |(_, record)| {
            records.push(record);
            Ok(())
        })?;
        Ok(records)
    }
}

fn stream_from_directory<T, F>(directory: &Path, file_name: &str, f: F) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    F: FnMut((usize, T)) -> Result<(), self::Error>,
{
    let path = directory.join(file_name);
    let file = File::open(&path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => self::Error::FileNotFound(path.display().to_string()),
        _ => self::Error::Io(err),
    })?;
    stream_csv(file, f)
}

fn stream_from_zip<T, F>(zip_path: &Path, file_name: &str, f: F) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    F: FnMut((usize, T)) -> Result<(), self::Error>,
{
    let zip_file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(zip_file)?;
    let index = archive
        .index_for_name(file_name)
        .ok_or(self::Error::FileNotFound(file_name.to_string()))?;
    let file = archive.by_index(index)?;
    stream_csv(file, f)
}

fn stream_csv<R, T, F>(reader: R, mut f: F) -> Result<(), self::Error>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut((usize, T)) -> Result<(), self::Error>,
{
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    for (i, result) in reader.deserialize().enumerate() {
        let record: T = result?;
        f((i, record))?;
    }
    Ok(())
}
