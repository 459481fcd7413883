use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::debug;

use crate::{
    shared::ValidationError,
    storage::{self, Config, Storage},
};

/// An entity that is bulk loaded from one storage table.
pub trait Record: Sized {
    /// The row shape; field names are the table's column names.
    type Raw: DeserializeOwned;

    /// Entity name used in logs and errors.
    const KIND: &'static str;

    fn file_name(config: &Config) -> &str;

    fn id(&self) -> u32;

    fn from_raw(raw: Self::Raw) -> Result<Self, ValidationError>;

    /// Loads and validates every row of the entity's table, in storage order.
    fn load_all(storage: &Storage) -> Result<Vec<Self>, storage::Error> {
        let file_name = Self::file_name(storage.config());
        debug!("Loading {}s from {file_name}...", Self::KIND);
        let now = Instant::now();
        let mut values = Vec::new();
        storage.stream(file_name, |(i, raw)| {
            let value = Self::from_raw(raw).map_err(|source| storage::Error::InvalidRecord {
                file: file_name.to_string(),
                row: i + 1,
                source,
            })?;
            values.push(value);
            Ok(())
        })?;
        debug!(
            "Loading {} {}s took {:?}",
            values.len(),
            Self::KIND,
            now.elapsed()
        );
        Ok(values)
    }
}
