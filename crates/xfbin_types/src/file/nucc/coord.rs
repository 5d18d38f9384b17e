//! `nuccChunkCoord`: one skeleton node.
//!
//! ```text
//! 0x00  f32 x 3  position (cm)
//! 0x0C  f32 x 3  rotation (degrees)
//! 0x18  f32 x 3  scale
//! 0x24  f32      unknown
//! 0x28  u16      unknown
//! 0x2A  u16      unknown, absent in some files
//! ```

use serde::{Deserialize, Serialize};

use super::{ChunkKey, constants};
use crate::file::binary::{ByteReader, ByteWriter};
use crate::file::xfbin::{DecodeContext, EncodeContext, RawChunk};
use crate::file::{FileType, XfbinError};

/// Encoded payload size
pub const PAYLOAD_SIZE: usize = 0x2C;

/// A skeleton node
///
/// Inside a [`Clump`](super::Clump) coords live in an arena; `parent` and
/// `children` are indices into that arena. A coord outside a clump has no
/// parent and no children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coord {
	/// Virtual path
	pub path: String,
	/// Bone name
	pub name: String,
	/// Local position in centimeters
	pub position: [f32; 3],
	/// Local rotation in degrees
	pub rotation: [f32; 3],
	/// Local scale, sign preserving
	pub scale: [f32; 3],
	/// Unknown float
	pub unk_float: f32,
	/// Unknown short
	pub unk_short: u16,
	/// Trailing short
	#[serde(default)]
	pub unk_trailer: u16,
	/// Arena index of the parent node
	pub parent: Option<usize>,
	/// Arena indices of the child nodes, in order
	pub children: Vec<usize>,
	/// Version field of the record header
	#[serde(default = "super::default_version")]
	pub version: u16,
}

impl Coord {
	/// Creates a node with the identity transform
	pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			name: name.into(),
			position: [0.0; 3],
			rotation: [0.0; 3],
			scale: [1.0; 3],
			unk_float: 1.0,
			unk_short: 0,
			unk_trailer: 0,
			parent: None,
			children: Vec::new(),
			version: constants::CHUNK_VERSION,
		}
	}

	/// Identity of this node
	pub fn key(&self) -> ChunkKey {
		ChunkKey::new(constants::COORD, &self.path, &self.name)
	}

	/// Copies the transform and record fields of `other`, leaving identity and tree links untouched
	pub fn copy_transform(&mut self, other: &Coord) {
		self.position = other.position;
		self.rotation = other.rotation;
		self.scale = other.scale;
		self.unk_float = other.unk_float;
		self.unk_short = other.unk_short;
		self.unk_trailer = other.unk_trailer;
		self.version = other.version;
	}

	pub(crate) fn decode(raw: &RawChunk<'_>, _ctx: &mut DecodeContext<'_>) -> Result<Self, XfbinError> {
		let mut r = ByteReader::new(raw.data, FileType::Coord);
		let mut coord = Coord::new(&raw.key.path, &raw.key.name);
		coord.version = raw.version;
		coord.position = r.f32_array()?;
		coord.rotation = r.f32_array()?;
		coord.scale = r.f32_array()?;
		coord.unk_float = r.f32()?;
		coord.unk_short = r.u16()?;
		if r.remaining() >= 2 {
			coord.unk_trailer = r.u16()?;
		}
		Ok(coord)
	}

	pub(crate) fn encode(&self, _ctx: &EncodeContext<'_>) -> Result<Vec<u8>, XfbinError> {
		let mut w = ByteWriter::with_capacity(PAYLOAD_SIZE);
		w.f32_slice(&self.position);
		w.f32_slice(&self.rotation);
		w.f32_slice(&self.scale);
		w.f32(self.unk_float);
		w.u16(self.unk_short);
		w.u16(self.unk_trailer);
		Ok(w.into_inner())
	}
}
