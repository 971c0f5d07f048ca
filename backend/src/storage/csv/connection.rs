use csv::{Reader, ReaderBuilder, Writer};
use log::debug;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::domain::models::product::ProductRecord;
use crate::storage::error::PersistenceError;

/// Column names of the inventory file, in order
pub const HEADER: [&str; 4] = ["id", "nombre", "cantidad", "precio"];

/// CsvConnection owns the location of an inventory file and the low-level
/// reads and writes on it
#[derive(Debug, Clone)]
pub struct CsvConnection {
    file_path: PathBuf,
}

impl CsvConnection {
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Directory holding the file; temp files are created here so the final
    /// rename stays on one filesystem
    pub fn directory(&self) -> PathBuf {
        parent_directory(&self.file_path)
    }

    /// Create the parent directory and a header-only file if missing.
    /// Returns true when the file was created.
    pub fn ensure_file_exists(&self) -> io::Result<bool> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        if self.file_path.exists() {
            return Ok(false);
        }

        let header = format!("{}\n", HEADER.join(","));
        fs::write(&self.file_path, header)?;
        debug!("Created inventory file: {:?}", self.file_path);
        Ok(true)
    }

    /// Open the file for reading. Rows may carry any number of fields; the
    /// repository decides what to do with short or long rows.
    pub fn open_reader(&self) -> io::Result<Reader<BufReader<File>>> {
        let file = File::open(&self.file_path)?;
        Ok(ReaderBuilder::new()
            .flexible(true)
            .from_reader(BufReader::new(file)))
    }

    /// Replace the file with the header followed by one row per product.
    pub fn write_products<'a, I>(&self, products: I) -> Result<(), PersistenceError>
    where
        I: IntoIterator<Item = &'a ProductRecord>,
    {
        write_atomically(&self.file_path, |writer| {
            let mut csv_writer = Writer::from_writer(writer);
            csv_writer.write_record(HEADER)?;

            for product in products {
                let quantity = product.quantity().to_string();
                let unit_price = format!("{:.2}", product.unit_price());
                csv_writer.write_record([
                    product.id(),
                    product.name(),
                    quantity.as_str(),
                    unit_price.as_str(),
                ])?;
            }

            csv_writer.flush()?;
            Ok(())
        })
    }
}

/// Write `target` through a temporary file in the same directory, then
/// rename it over the target.
///
/// The target is only touched by the final rename. On every failure path
/// the temporary file is removed when the guard drops.
pub fn write_atomically<F>(target: &Path, write: F) -> Result<(), PersistenceError>
where
    F: FnOnce(&mut BufWriter<&File>) -> io::Result<()>,
{
    let directory = parent_directory(target);
    let temp = NamedTempFile::new_in(&directory)
        .map_err(|e| PersistenceError::from_io(target, e))?;

    {
        let mut writer = BufWriter::new(temp.as_file());
        write(&mut writer).map_err(|e| PersistenceError::from_io(target, e))?;
        writer
            .flush()
            .map_err(|e| PersistenceError::from_io(target, e))?;
    }

    // temp files are created owner-only; the replacement keeps the target's mode
    if let Ok(metadata) = fs::metadata(target) {
        if metadata.is_file() {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| PersistenceError::from_io(target, e))?;
        }
    }

    temp.as_file()
        .sync_all()
        .map_err(|e| PersistenceError::from_io(target, e))?;

    temp.persist(target)
        .map_err(|e| PersistenceError::from_io(target, e.error))?;

    debug!("Replaced {:?} atomically", target);
    Ok(())
}

fn parent_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
