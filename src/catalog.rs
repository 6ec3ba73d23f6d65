//! Opcode catalog model: load, remap, collision scan, persist.
//!
//! The catalog is kept as raw JSON values rather than typed records so that
//! fields this tool does not understand survive the rewrite untouched, and so
//! category and record order round-trip exactly.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::diff::MappingTable;
use crate::error::RemapError;

/// Categorized opcode database.
pub struct Catalog {
    categories: Map<String, Value>,
}

/// One duplicate-opcode diagnostic: the record called `name` resolved to a
/// value already held by the most recently seen record, `previous`.
#[derive(Debug, PartialEq, Eq)]
pub struct Collision {
    pub name: String,
    pub previous: String,
    pub opcode: i64,
}

impl std::fmt::Display for Collision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Duplicate opcode found for {} & {}: {}",
            self.name, self.previous, self.opcode
        )
    }
}

impl Catalog {
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self, RemapError> {
        let categories =
            serde_json::from_reader(reader).map_err(|e| RemapError::from_json(path, e))?;
        Ok(Self { categories })
    }

    /// Rewrites every mapped `opcode` field in place and reports records that
    /// end up sharing a final opcode value. Categories and records keep their
    /// input order; colliding records are reported, never altered.
    ///
    /// The seen-set always moves to the current record, so a run of records
    /// sharing one value reports each against its immediate predecessor.
    pub fn apply_remap(&mut self, mapping: &MappingTable) -> Result<Vec<Collision>, RemapError> {
        let mut seen: HashMap<i64, String> = HashMap::new();
        let mut collisions = Vec::new();
        let mut remapped = 0usize;

        for (category, records) in self.categories.iter_mut() {
            let records = records.as_array_mut().ok_or_else(|| RemapError::NotAnArray {
                category: category.clone(),
            })?;
            for (index, record) in records.iter_mut().enumerate() {
                let opcode = record
                    .get("opcode")
                    .and_then(Value::as_i64)
                    .ok_or_else(|| RemapError::MissingOpcode {
                        category: category.clone(),
                        index,
                    })?;
                let opcode = match mapping.get(&opcode) {
                    Some(&new) => {
                        record["opcode"] = Value::from(new);
                        remapped += 1;
                        new
                    }
                    None => opcode,
                };

                let name = record
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| RemapError::MissingName {
                        category: category.clone(),
                        index,
                    })?;
                if let Some(previous) = seen.insert(opcode, name.to_owned()) {
                    collisions.push(Collision {
                        name: name.to_owned(),
                        previous,
                        opcode,
                    });
                }
            }
        }

        tracing::debug!(remapped, collisions = collisions.len(), "applied opcode remap");
        Ok(collisions)
    }

    /// Serializes the catalog with 4-space indentation and a single trailing
    /// newline.
    pub fn write_pretty<W: Write>(&self, mut writer: W) -> Result<(), RemapError> {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
        self.categories
            .serialize(&mut ser)
            .map_err(|e| RemapError::Io(e.into()))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Catalog plus the handle it was loaded from, held open across the
/// load-then-overwrite sequence.
pub struct CatalogFile {
    file: File,
    catalog: Catalog,
}

impl CatalogFile {
    /// Opens `path` for reading and later in-place writing.
    pub fn open(path: &Path) -> Result<Self, RemapError> {
        let file = File::options().read(true).write(true).open(path)?;
        let catalog = Catalog::from_reader(BufReader::new(&file), path)?;
        Ok(Self { file, catalog })
    }

    pub fn apply_remap(&mut self, mapping: &MappingTable) -> Result<Vec<Collision>, RemapError> {
        self.catalog.apply_remap(mapping)
    }

    /// Truncates the file and writes the mutated catalog back. Not atomic: a
    /// failure mid-write leaves the file partially written.
    pub fn persist(&mut self) -> Result<(), RemapError> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.set_len(0)?;
        let mut writer = BufWriter::new(&mut self.file);
        self.catalog.write_pretty(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
