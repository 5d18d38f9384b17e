//! Deduplicated NUL-terminated string tables.
//!
//! The XFBIN chunk table stores types, paths and names as three blocks, each
//! prefixed in the table header by an entry count and a byte size:
//!
//! ```text
//! "nuccChunkNull\0nuccChunkPage\0nuccChunkClump\0..."
//! ```
//!
//! Entries are referenced by their position in the block, so a string that
//! appears many times in a document is stored exactly once.

use std::collections::HashMap;

use super::{ByteReader, ByteWriter};
use crate::file::XfbinError;

/// Insertion-ordered set of strings with stable indices
#[derive(Debug, Default, Clone)]
pub struct StringTable {
	strings: Vec<String>,
	lookup: HashMap<String, u32>,
}

impl StringTable {
	/// Creates an empty table
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the index of `text`, appending it on first use
	pub fn intern(&mut self, text: &str) -> u32 {
		if let Some(&index) = self.lookup.get(text) {
			return index;
		}
		let index = self.strings.len() as u32;
		self.strings.push(text.to_owned());
		self.lookup.insert(text.to_owned(), index);
		index
	}

	/// Looks up the index of `text` without inserting
	pub fn index_of(&self, text: &str) -> Option<u32> {
		self.lookup.get(text).copied()
	}

	/// Number of unique strings
	pub fn len(&self) -> usize {
		self.strings.len()
	}

	/// Returns `true` if no string has been interned
	pub fn is_empty(&self) -> bool {
		self.strings.is_empty()
	}

	/// Encoded size of the block, terminators included
	pub fn byte_size(&self) -> usize {
		self.strings.iter().map(|s| s.len() + 1).sum()
	}

	/// Iterates the strings in index order
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.strings.iter().map(String::as_str)
	}

	/// Writes every string with its terminator
	pub fn write_to(&self, writer: &mut ByteWriter) {
		for text in &self.strings {
			writer.cstring(text);
		}
	}
}

/// Reads a block of `count` NUL-terminated strings spanning exactly `size` bytes
///
/// Every string takes at least its terminator, so a count above the block
/// size is rejected before anything is allocated.
pub fn read_string_block(reader: &mut ByteReader<'_>, count: usize, size: usize) -> Result<Vec<String>, XfbinError> {
	if count > size {
		return Err(XfbinError::invalid_data(
			reader.file_type(),
			format!("{count} strings cannot fit in {size} bytes"),
		));
	}
	let mut block = reader.sub_reader(size, reader.file_type())?;
	let mut strings = Vec::with_capacity(count);
	for _ in 0..count {
		strings.push(block.cstring()?);
	}
	Ok(strings)
}
