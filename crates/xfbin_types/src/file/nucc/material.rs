//! `nuccChunkMaterial`: render parameters plus texture references.
//!
//! ```text
//! u16            texture group count
//! u8             field02
//! u8             field03
//! f32            field04
//! u8             format code
//! f32 x c        floats, c = float_count(format)
//! -- per texture group --
//! u16            texture count
//! u16            padding
//! i32            flag
//! u32 x n        texture map indices
//! ```

use serde::{Deserialize, Serialize};

use super::{ChunkKey, constants};
use crate::file::binary::{ByteReader, ByteWriter};
use crate::file::xfbin::{DecodeContext, EncodeContext, RawChunk};
use crate::file::{FileType, XfbinError};

/// Maximum number of floats any format code can carry
pub const FLOAT_CAPACITY: usize = 0x20;

/// Number of meaningful floats for a material format code
///
/// The table is closed: codes not observed in game files are rejected
/// instead of guessed.
pub fn float_count(format: u8) -> Result<usize, XfbinError> {
	let count = match format {
		0x00 => 0,
		0x01 => 1,
		0x03 => 2,
		0x07 => 3,
		0x0F => 4,
		0x3D => 8,
		0x3F => 12,
		0x7F => 16,
		0xB8 => 24,
		0xFF => FLOAT_CAPACITY,
		other => return Err(XfbinError::InvalidMaterialFormat(other)),
	};
	Ok(count)
}

/// An ordered list of textures sharing a flag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureGroup {
	/// Group flag
	pub flag: i32,
	/// Referenced texture chunks, [`ChunkKey::null`] for an unresolved slot
	pub textures: Vec<ChunkKey>,
}

/// A material chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
	/// Virtual path
	pub path: String,
	/// Material name
	pub name: String,
	/// First scalar field
	pub field02: u8,
	/// Unknown byte following `field02`
	pub field03: u8,
	/// Second scalar field
	pub field04: f32,
	/// Format code selecting how many floats are meaningful
	pub format: u8,
	/// Float parameters; padded with 0.0 or cut to `float_count(format)` on encode
	pub floats: Vec<f32>,
	/// Texture groups
	pub texture_groups: Vec<TextureGroup>,
	/// Version field of the record header
	#[serde(default = "super::default_version")]
	pub version: u16,
}

impl Material {
	/// Creates a material with format 0 and no textures
	pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			name: name.into(),
			field02: 0,
			field03: 0,
			field04: 0.0,
			format: 0,
			floats: Vec::new(),
			texture_groups: Vec::new(),
			version: constants::CHUNK_VERSION,
		}
	}

	/// Identity of this material
	pub fn key(&self) -> ChunkKey {
		ChunkKey::new(constants::MATERIAL, &self.path, &self.name)
	}

	/// Every key referenced from the material payload
	pub fn references(&self) -> Vec<ChunkKey> {
		self.texture_groups
			.iter()
			.flat_map(|g| g.textures.iter())
			.filter(|key| !key.is_null())
			.cloned()
			.collect()
	}

	/// The floats as they will be written: exactly `float_count(format)` values
	pub fn encoded_floats(&self) -> Result<Vec<f32>, XfbinError> {
		let count = float_count(self.format)?;
		let mut floats: Vec<f32> = self.floats.iter().copied().take(count).collect();
		floats.resize(count, 0.0);
		Ok(floats)
	}

	pub(crate) fn decode(raw: &RawChunk<'_>, ctx: &mut DecodeContext<'_>) -> Result<Self, XfbinError> {
		let mut r = ByteReader::new(raw.data, FileType::Material);
		let mut material = Material::new(&raw.key.path, &raw.key.name);
		material.version = raw.version;

		let group_count = r.u16()? as usize;
		material.field02 = r.u8()?;
		material.field03 = r.u8()?;
		material.field04 = r.f32()?;
		material.format = r.u8()?;

		let count = float_count(material.format)?;
		material.floats = (0..count).map(|_| r.f32()).collect::<Result<_, _>>()?;

		for _ in 0..group_count {
			let texture_count = r.u16()? as usize;
			r.skip(2)?;
			let mut group = TextureGroup {
				flag: r.i32()?,
				textures: Vec::with_capacity(texture_count),
			};
			for _ in 0..texture_count {
				let local = r.u32()?;
				let key = ctx.resolve_or_warn(FileType::Material, local).unwrap_or_else(ChunkKey::null);
				group.textures.push(key);
			}
			material.texture_groups.push(group);
		}

		Ok(material)
	}

	pub(crate) fn encode(&self, ctx: &EncodeContext<'_>) -> Result<Vec<u8>, XfbinError> {
		let floats = self.encoded_floats()?;
		let group_count = u16::try_from(self.texture_groups.len())
			.map_err(|_| XfbinError::invalid_data(FileType::Material, "too many texture groups"))?;

		let mut w = ByteWriter::new();
		w.u16(group_count);
		w.u8(self.field02);
		w.u8(self.field03);
		w.f32(self.field04);
		w.u8(self.format);
		w.f32_slice(&floats);

		for group in &self.texture_groups {
			let count = u16::try_from(group.textures.len())
				.map_err(|_| XfbinError::invalid_data(FileType::Material, "too many textures in group"))?;
			w.u16(count);
			w.u16(0);
			w.i32(group.flag);
			for texture in &group.textures {
				w.u32(ctx.index_of_optional(FileType::Material, Some(texture))?);
			}
		}

		Ok(w.into_inner())
	}
}
