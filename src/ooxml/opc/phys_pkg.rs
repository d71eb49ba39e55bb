//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! Reading enumerates every member in stored order together with the header
//! metadata needed to re-emit it. Rewriting walks that list once, raw-copies
//! each member that was not explicitly replaced (compressed bytes, compression
//! method and timestamp untouched) and re-encodes only the replaced ones.
//! Only Stored and Deflated can be written, so a replaced member stored with
//! any other method is re-encoded with Deflate.

use crate::common::{Error, Result};
use crate::ooxml::opc::constants::is_document_tree_xml;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Upper bound on the buffer reserved from a member's declared size.
const PREALLOC_LIMIT: u64 = 16 * 1024 * 1024;

/// Header metadata of one member of the package.
#[derive(Debug, Clone, PartialEq)]
pub struct PartEntry {
    /// Member name inside the archive (no leading slash)
    pub name: String,
    /// Compression method the member is stored with
    pub compression: CompressionMethod,
    /// Modification timestamp, when the archive records one
    pub last_modified: Option<DateTime>,
    /// Uncompressed size in bytes
    pub size: u64,
    /// Whether this member is a directory entry
    pub is_dir: bool,
}

/// Physical package reader over an in-memory ZIP archive.
///
/// The central directory is parsed once on construction; the reader is then
/// cloned cheaply for every member access so all methods take `&self`.
#[derive(Clone)]
pub struct PhysPkgReader<'data> {
    archive: ZipArchive<Cursor<&'data [u8]>>,
    entries: Vec<PartEntry>,
}

impl<'data> PhysPkgReader<'data> {
    /// Open a package from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchive`] when the bytes are not a ZIP archive.
    pub fn new(data: &'data [u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let file = archive.by_index_raw(index)?;
            entries.push(PartEntry {
                name: file.name().to_string(),
                compression: file.compression(),
                last_modified: file.last_modified(),
                size: file.size(),
                is_dir: file.is_dir(),
            });
        }

        Ok(Self { archive, entries })
    }

    /// All members in stored order.
    #[inline]
    pub fn entries(&self) -> &[PartEntry] {
        &self.entries
    }

    /// List all member names in stored order, directories excluded.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| !entry.is_dir)
            .map(|entry| entry.name.as_str())
    }

    /// Member names of the document-tree XML parts (`word/**.xml`), in
    /// stored order.
    pub fn document_tree_parts(&self) -> Vec<String> {
        self.member_names()
            .filter(|name| is_document_tree_xml(name))
            .map(str::to_string)
            .collect()
    }

    /// Check if a specific member exists in the package.
    pub fn contains(&self, member: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == member)
    }

    /// Get the number of members in the package.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the package is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read the decompressed content of a member.
    ///
    /// Returns `Ok(None)` when the member does not exist.
    pub fn read(&self, member: &str) -> Result<Option<Vec<u8>>> {
        let mut archive = self.archive.clone();
        let mut file = match archive.by_name(member) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // The declared size comes from the archive and is not trusted
        let mut blob = Vec::with_capacity(file.size().min(PREALLOC_LIMIT) as usize);
        file.read_to_end(&mut blob)
            .map_err(|e| Error::InvalidArchive(format!("{}: {}", member, e)))?;
        Ok(Some(blob))
    }

    /// Read a member as UTF-8 text.
    ///
    /// Returns `Ok(None)` when the member does not exist.
    pub fn read_string(&self, member: &str) -> Result<Option<String>> {
        match self.read(member)? {
            Some(blob) => String::from_utf8(blob)
                .map(Some)
                .map_err(|e| Error::malformed(member, e)),
            None => Ok(None),
        }
    }

    /// Re-emit the whole package, substituting the given members.
    ///
    /// Members are written in their original order. A member with an entry in
    /// `replacements` gets the new content with its original timestamp and
    /// permissions; it stays Stored if it was Stored and is Deflated
    /// otherwise. Every other member is raw-copied.
    pub fn rewrite(&self, replacements: &HashMap<String, Vec<u8>>) -> Result<Vec<u8>> {
        let mut source = self.archive.clone();
        let mut writer = PhysPkgWriter::with_capacity(source.len());

        for index in 0..source.len() {
            let file = source.by_index_raw(index)?;
            let replacement = replacements.get(file.name());
            match replacement {
                Some(blob) => {
                    let compression = match file.compression() {
                        CompressionMethod::Stored => CompressionMethod::Stored,
                        _ => CompressionMethod::Deflated,
                    };
                    let mut options = SimpleFileOptions::default()
                        .compression_method(compression)
                        .last_modified_time(file.last_modified().unwrap_or_default());
                    if let Some(mode) = file.unix_mode() {
                        options = options.unix_permissions(mode);
                    }
                    let name = file.name().to_string();
                    log::trace!("rewriting part {} ({} bytes)", name, blob.len());
                    writer.write_with_options(&name, blob, options)?;
                },
                None => writer.archive.raw_copy_file(file)?,
            }
        }

        writer.finish()
    }
}

/// Physical package writer for creating OPC packages.
///
/// Parts are written in the order they are added.
pub struct PhysPkgWriter {
    archive: ZipWriter<Cursor<Vec<u8>>>,
}

impl PhysPkgWriter {
    /// Create a new package writer that writes to memory.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    fn with_capacity(parts: usize) -> Self {
        Self {
            archive: ZipWriter::new(Cursor::new(Vec::with_capacity(parts * 1024))),
        }
    }

    /// Write a part to the package with Deflate compression.
    pub fn write(&mut self, member: &str, blob: &[u8]) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.write_with_options(member, blob, options)
    }

    /// Write a part to the package without compression (stored).
    pub fn write_stored(&mut self, member: &str, blob: &[u8]) -> Result<()> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        self.write_with_options(member, blob, options)
    }

    fn write_with_options(
        &mut self,
        member: &str,
        blob: &[u8],
        options: SimpleFileOptions,
    ) -> Result<()> {
        self.archive.start_file(member, options)?;
        self.archive
            .write_all(blob)
            .map_err(|e| Error::InvalidArchive(format!("{}: {}", member, e)))
    }

    /// Finish writing and return the package bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.archive.finish()?.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}
