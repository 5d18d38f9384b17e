//! `nuccChunkAnm`: animation data, carried opaquely.
//!
//! The payload embeds page-local map indices for the clumps and coords it
//! animates, so it is only byte-stable while the page map keeps its order.
//! The leading header can be inspected without decoding the curves:
//!
//! ```text
//! 0x00  u32  frame count
//! 0x04  u32  frame size
//! 0x08  u16  entry count
//! 0x0A  u16  looped
//! 0x0C  u16  clump count
//! 0x0E  u16  other entry count
//! 0x10  u32  coord count
//! ```

use serde::{Deserialize, Serialize};

use super::{ChunkKey, constants};
use crate::file::binary::ByteReader;
use crate::file::xfbin::{DecodeContext, EncodeContext, RawChunk};
use crate::file::{FileType, XfbinError};

/// Summary of an animation header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnmHeader {
	/// Length of the animation in frames
	pub frame_count: u32,
	/// Frame size
	pub frame_size: u32,
	/// Number of curve entries
	pub entry_count: u16,
	/// Whether the animation loops
	pub looped: bool,
	/// Number of clumps animated
	pub clump_count: u16,
	/// Number of non-clump entries
	pub other_entry_count: u16,
	/// Number of coords animated
	pub coord_count: u32,
}

/// An animation chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anm {
	/// Virtual path
	pub path: String,
	/// Animation name
	pub name: String,
	/// Raw payload
	pub data: Vec<u8>,
	/// Version field of the record header
	#[serde(default = "super::default_version")]
	pub version: u16,
}

impl Anm {
	/// Wraps a raw animation payload
	pub fn new(path: impl Into<String>, name: impl Into<String>, data: Vec<u8>) -> Self {
		Self {
			path: path.into(),
			name: name.into(),
			data,
			version: constants::CHUNK_VERSION,
		}
	}

	/// Identity of this chunk
	pub fn key(&self) -> ChunkKey {
		ChunkKey::new(constants::ANM, &self.path, &self.name)
	}

	/// Parses the leading header of the payload
	pub fn header(&self) -> Result<AnmHeader, XfbinError> {
		let mut r = ByteReader::new(&self.data, FileType::Anm);
		Ok(AnmHeader {
			frame_count: r.u32()?,
			frame_size: r.u32()?,
			entry_count: r.u16()?,
			looped: r.u16()? != 0,
			clump_count: r.u16()?,
			other_entry_count: r.u16()?,
			coord_count: r.u32()?,
		})
	}

	pub(crate) fn decode(raw: &RawChunk<'_>, _ctx: &mut DecodeContext<'_>) -> Result<Self, XfbinError> {
		Ok(Self {
			path: raw.key.path.clone(),
			name: raw.key.name.clone(),
			data: raw.data.to_vec(),
			version: raw.version,
		})
	}

	pub(crate) fn encode(&self, _ctx: &EncodeContext<'_>) -> Result<Vec<u8>, XfbinError> {
		Ok(self.data.clone())
	}
}
