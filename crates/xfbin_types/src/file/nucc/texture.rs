//! `nuccChunkTexture`: an embedded NUT texture container.
//!
//! ```text
//! u16     field00
//! u16     width
//! u16     height
//! u16     field06
//! u32     NUT size
//! ...     NUT bytes
//! ```
//!
//! The NUT bytes are kept exactly as read so an unmodified texture is written
//! back byte for byte. They are still parsed on decode, so a texture in a
//! pixel format with no known mapping is reported instead of carried silently.

use serde::{Deserialize, Serialize};

use super::{ChunkKey, constants};
use crate::file::binary::{ByteReader, ByteWriter};
use crate::file::nut::Nut;
use crate::file::xfbin::{DecodeContext, EncodeContext, RawChunk};
use crate::file::{FileType, XfbinError};

/// A texture chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Texture {
	/// Virtual path
	pub path: String,
	/// Texture name
	pub name: String,
	/// Unknown header value
	pub field00: u16,
	/// Width in pixels
	pub width: u16,
	/// Height in pixels
	pub height: u16,
	/// Unknown header value
	pub field06: u16,
	/// Raw NUT container
	pub nut: Vec<u8>,
	/// Version field of the record header
	#[serde(default = "super::default_version")]
	pub version: u16,
}

impl Texture {
	/// Wraps NUT bytes, taking the dimensions from its first texture
	pub fn from_nut(path: impl Into<String>, name: impl Into<String>, nut: Vec<u8>) -> Result<Self, XfbinError> {
		let parsed = Nut::from_bytes(&nut)?;
		let (width, height) = parsed.textures.first().map(|t| (t.width, t.height)).unwrap_or_default();
		Ok(Self {
			path: path.into(),
			name: name.into(),
			field00: 0,
			width,
			height,
			field06: 0,
			nut,
			version: constants::CHUNK_VERSION,
		})
	}

	/// Identity of this texture
	pub fn key(&self) -> ChunkKey {
		ChunkKey::new(constants::TEXTURE, &self.path, &self.name)
	}

	/// Parses the embedded NUT container
	pub fn parse_nut(&self) -> Result<Nut, XfbinError> {
		Nut::from_bytes(&self.nut)
	}

	/// Converts the first texture of the embedded NUT into a DDS image
	pub fn to_dds(&self) -> Result<Vec<u8>, XfbinError> {
		self.parse_nut()?.to_dds(0)
	}

	pub(crate) fn decode(raw: &RawChunk<'_>, _ctx: &mut DecodeContext<'_>) -> Result<Self, XfbinError> {
		let mut r = ByteReader::new(raw.data, FileType::Texture);
		let field00 = r.u16()?;
		let width = r.u16()?;
		let height = r.u16()?;
		let field06 = r.u16()?;
		let nut_size = r.u32()? as usize;
		let nut = r.bytes(nut_size)?.to_vec();
		Nut::from_bytes(&nut)?;

		Ok(Self {
			path: raw.key.path.clone(),
			name: raw.key.name.clone(),
			field00,
			width,
			height,
			field06,
			nut,
			version: raw.version,
		})
	}

	pub(crate) fn encode(&self, _ctx: &EncodeContext<'_>) -> Result<Vec<u8>, XfbinError> {
		let mut w = ByteWriter::with_capacity(self.nut.len() + 12);
		w.u16(self.field00);
		w.u16(self.width);
		w.u16(self.height);
		w.u16(self.field06);
		w.u32(self.nut.len() as u32);
		w.bytes(&self.nut);
		Ok(w.into_inner())
	}
}
