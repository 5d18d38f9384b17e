//! Chunks the registry has no codec for.

use serde::{Deserialize, Serialize};

use super::ChunkKey;
use crate::file::xfbin::RawChunk;

/// A chunk kept as raw bytes and written back unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unknown {
	/// Type tag as found in the chunk map
	pub chunk_type: String,
	/// Virtual path
	pub path: String,
	/// Chunk name
	pub name: String,
	/// Version field of the record header
	pub version: u16,
	/// Raw payload
	pub data: Vec<u8>,
}

impl Unknown {
	/// Captures a raw chunk record
	pub fn from_raw(raw: &RawChunk<'_>) -> Self {
		Self {
			chunk_type: raw.key.chunk_type.clone(),
			path: raw.key.path.clone(),
			name: raw.key.name.clone(),
			version: raw.version,
			data: raw.data.to_vec(),
		}
	}

	/// Identity of this chunk
	pub fn key(&self) -> ChunkKey {
		ChunkKey::new(&self.chunk_type, &self.path, &self.name)
	}
}

/// Placeholder for a record whose map index could not be resolved
///
/// The payload is kept for inspection. Placeholders are not written back,
/// since there is no type, path or name to write them under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullChunk {
	/// The unresolvable page-local map index
	pub map_index: u32,
	/// Raw payload
	pub data: Vec<u8>,
}
