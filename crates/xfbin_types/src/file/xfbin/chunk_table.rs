//! The chunk table: string blocks, chunk maps, references and page map indices.
//!
//! ```text
//! u32 x 10   type count, type bytes, path count, path bytes,
//!            name count, name bytes, map count, map bytes,
//!            map index count, reference count
//! strings    types, paths, names (NUL-terminated), padded to 4
//! maps       (u32 type, u32 path, u32 name) x map count
//! refs       (u32 name, u32 map) x reference count
//! indices    u32 x map index count
//! ```
//!
//! The table is parsed in full before any chunk payload is touched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::constants::{CHUNK_MAP_SIZE, REFERENCE_SIZE, STRING_ALIGNMENT};
use crate::file::binary::{ByteReader, ByteWriter, StringTable, align_up, read_string_block};
use crate::file::nucc::ChunkKey;
use crate::file::{FileType, XfbinError};

/// One chunk map entry, indices into the string blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkMap {
	/// Type string index
	pub type_index: u32,
	/// Path string index
	pub path_index: u32,
	/// Name string index
	pub name_index: u32,
}

/// A named alias for a chunk, listed per page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkReference {
	/// Alias name
	pub name: String,
	/// Referenced chunk
	pub chunk: ChunkKey,
}

/// Raw reference entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReference {
	/// Name string index
	pub name_index: u32,
	/// Global chunk map index
	pub map_index: u32,
}

/// Decoded chunk table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkTable {
	/// Type strings
	pub types: Vec<String>,
	/// Path strings
	pub paths: Vec<String>,
	/// Name strings
	pub names: Vec<String>,
	/// Global chunk maps
	pub maps: Vec<ChunkMap>,
	/// References of every page, back to back
	pub references: Vec<RawReference>,
	/// Page-local map lists, back to back, as global map indices
	pub map_indices: Vec<u32>,
}

impl ChunkTable {
	/// Parses the table
	///
	/// `max_chunk_count` bounds the map count before anything is allocated.
	pub fn read(r: &mut ByteReader<'_>, max_chunk_count: usize) -> Result<Self, XfbinError> {
		let type_count = r.u32()? as usize;
		let type_size = r.u32()? as usize;
		let path_count = r.u32()? as usize;
		let path_size = r.u32()? as usize;
		let name_count = r.u32()? as usize;
		let name_size = r.u32()? as usize;
		let map_count = r.u32()? as usize;
		let map_size = r.u32()? as usize;
		let map_index_count = r.u32()? as usize;
		let reference_count = r.u32()? as usize;

		if map_count > max_chunk_count {
			return Err(XfbinError::SizeLimitExceeded {
				what: "chunk map",
				count: map_count,
				limit: max_chunk_count,
			});
		}
		if map_size as u64 != map_count as u64 * CHUNK_MAP_SIZE as u64 {
			return Err(XfbinError::invalid_data(
				FileType::ChunkTable,
				format!("{map_count} chunk maps cannot span {map_size} bytes"),
			));
		}
		log::trace!(
			"chunk table: {type_count} types, {path_count} paths, {name_count} names, {map_count} maps, \
			 {map_index_count} map indices, {reference_count} references"
		);

		// string blocks, maps, references and indices must all fit in what is left
		let needed = (type_size as u64 + path_size as u64 + name_size as u64)
			+ map_size as u64
			+ reference_count as u64 * REFERENCE_SIZE as u64
			+ map_index_count as u64 * 4;
		if needed > r.remaining() as u64 {
			return Err(XfbinError::invalid_data(
				FileType::ChunkTable,
				format!("table declares {needed} bytes but only {} remain", r.remaining()),
			));
		}

		let start = r.position();
		let types = read_string_block(r, type_count, type_size)?;
		let paths = read_string_block(r, path_count, path_size)?;
		let names = read_string_block(r, name_count, name_size)?;
		let string_end = start + type_size + path_size + name_size;
		r.skip(align_up(string_end, STRING_ALIGNMENT) - string_end)?;

		let maps = (0..map_count)
			.map(|_| {
				Ok(ChunkMap {
					type_index: r.u32()?,
					path_index: r.u32()?,
					name_index: r.u32()?,
				})
			})
			.collect::<Result<Vec<_>, XfbinError>>()?;
		let references = (0..reference_count)
			.map(|_| {
				Ok(RawReference {
					name_index: r.u32()?,
					map_index: r.u32()?,
				})
			})
			.collect::<Result<Vec<_>, XfbinError>>()?;
		let map_indices = (0..map_index_count).map(|_| r.u32()).collect::<Result<Vec<_>, _>>()?;

		Ok(Self {
			types,
			paths,
			names,
			maps,
			references,
			map_indices,
		})
	}

	/// Resolves a global map index to a key
	pub fn key(&self, map_index: u32) -> Option<ChunkKey> {
		let map = self.maps.get(map_index as usize)?;
		Some(ChunkKey::new(
			self.types.get(map.type_index as usize)?,
			self.paths.get(map.path_index as usize)?,
			self.names.get(map.name_index as usize)?,
		))
	}

	/// Resolves a raw reference
	pub fn reference(&self, raw: &RawReference) -> Option<ChunkReference> {
		Some(ChunkReference {
			name: self.names.get(raw.name_index as usize)?.clone(),
			chunk: self.key(raw.map_index)?,
		})
	}
}

/// Accumulates the chunk table while a document is written
#[derive(Debug, Default)]
pub struct ChunkTableBuilder {
	types: StringTable,
	paths: StringTable,
	names: StringTable,
	maps: Vec<ChunkMap>,
	lookup: HashMap<ChunkKey, u32>,
	references: Vec<RawReference>,
	map_indices: Vec<u32>,
}

impl ChunkTableBuilder {
	/// Creates a builder whose first global maps are the null, page and index entries
	pub fn new() -> Self {
		let mut builder = Self::default();
		builder.map(&ChunkKey::null());
		builder.map(&ChunkKey::page());
		builder.map(&ChunkKey::index());
		builder
	}

	/// Global map index of `key`, adding it on first use
	pub fn map(&mut self, key: &ChunkKey) -> u32 {
		if let Some(&index) = self.lookup.get(key) {
			return index;
		}
		let map = ChunkMap {
			type_index: self.types.intern(&key.chunk_type),
			path_index: self.paths.intern(&key.path),
			name_index: self.names.intern(&key.name),
		};
		let index = self.maps.len() as u32;
		self.maps.push(map);
		self.lookup.insert(key.clone(), index);
		index
	}

	/// Appends one page's local map list
	pub fn push_page_map(&mut self, keys: &[ChunkKey]) {
		for key in keys {
			let index = self.map(key);
			self.map_indices.push(index);
		}
	}

	/// Appends one page reference
	pub fn push_reference(&mut self, reference: &ChunkReference) {
		let raw = RawReference {
			name_index: self.names.intern(&reference.name),
			map_index: self.map(&reference.chunk),
		};
		self.references.push(raw);
	}

	/// Serializes the table
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut w = ByteWriter::new();
		w.u32(self.types.len() as u32);
		w.u32(self.types.byte_size() as u32);
		w.u32(self.paths.len() as u32);
		w.u32(self.paths.byte_size() as u32);
		w.u32(self.names.len() as u32);
		w.u32(self.names.byte_size() as u32);
		w.u32(self.maps.len() as u32);
		w.u32((self.maps.len() * CHUNK_MAP_SIZE) as u32);
		w.u32(self.map_indices.len() as u32);
		w.u32(self.references.len() as u32);

		self.types.write_to(&mut w);
		self.paths.write_to(&mut w);
		self.names.write_to(&mut w);
		w.align(STRING_ALIGNMENT);

		for map in &self.maps {
			w.u32(map.type_index);
			w.u32(map.path_index);
			w.u32(map.name_index);
		}
		for reference in &self.references {
			w.u32(reference.name_index);
			w.u32(reference.map_index);
		}
		for &index in &self.map_indices {
			w.u32(index);
		}

		log::trace!(
			"built chunk table: {} maps, {} map indices, {} bytes",
			self.maps.len(),
			self.map_indices.len(),
			w.position()
		);
		w.into_inner()
	}
}
