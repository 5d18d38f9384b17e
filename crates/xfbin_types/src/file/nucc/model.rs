//! `nuccChunkModel`: one mesh instance with its embedded NUD.
//!
//! ```text
//! u16            field00
//! u16            rigging flags
//! u8 x 4         material flags
//! f32 x 6        extra floats, only when material_flags[1] & 0x04
//! u32            clump map index
//! u32            hit map index (0 = none)
//! u32            coord arena index inside the clump
//! u32            NUD size
//! ...            NUD bytes
//! u16            material count
//! u32 x n        material map indices
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::{ChunkKey, constants};
use crate::file::binary::{ByteReader, ByteWriter};
use crate::file::nud::Nud;
use crate::file::xfbin::{DecodeContext, EncodeContext, RawChunk};
use crate::file::{FileType, XfbinError};

/// Bit of `material_flags[1]` that enables the extra float block
pub const FLAG1_FLOATS_BIT: u8 = 0x04;

/// Number of floats in the extra float block
pub const FLAG1_FLOAT_COUNT: usize = 6;

bitflags! {
	/// How a model is skinned and rendered
	///
	/// The bits are independent; a model can be skinned and outlined and
	/// shadowed at once. Unknown bits are preserved.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
	pub struct RiggingFlag: u16 {
		/// Rigid, attached to a single coord
		const UNSKINNED = 0x01;
		/// Skinned to the skeleton
		const SKINNED = 0x02;
		/// Drawn with an outline
		const OUTLINE = 0x04;
		/// Motion blur
		const BLUR = 0x10;
		/// Casts a shadow
		const SHADOW = 0x20;
	}
}

/// A mesh instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
	/// Virtual path
	pub path: String,
	/// Model name
	pub name: String,
	/// Unknown header value
	pub field00: u16,
	/// Skinning and render flags
	pub rigging_flag: RiggingFlag,
	/// Material flags
	pub material_flags: [u8; 4],
	/// Extra floats, written only when `material_flags[1]` has [`FLAG1_FLOATS_BIT`]
	pub flag1_floats: Option<[f32; FLAG1_FLOAT_COUNT]>,
	/// Owning clump
	pub clump: Option<ChunkKey>,
	/// Hit volume chunk
	pub hit: Option<ChunkKey>,
	/// Index of the coord the model is attached to, 0 for the root
	pub coord_index: u32,
	/// Mesh payload
	pub nud: Nud,
	/// One material per mesh, in mesh order
	///
	/// A slot that could not be resolved holds [`ChunkKey::null`], so the
	/// meshes after it keep their materials.
	pub materials: Vec<ChunkKey>,
	/// Version field of the record header
	#[serde(default = "super::default_version")]
	pub version: u16,
}

impl Model {
	/// Creates a model with an empty NUD
	pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			name: name.into(),
			field00: 0,
			rigging_flag: RiggingFlag::empty(),
			material_flags: [0; 4],
			flag1_floats: None,
			clump: None,
			hit: None,
			coord_index: 0,
			nud: Nud::new(),
			materials: Vec::new(),
			version: constants::CHUNK_VERSION,
		}
	}

	/// Identity of this model
	pub fn key(&self) -> ChunkKey {
		ChunkKey::new(constants::MODEL, &self.path, &self.name)
	}

	/// Returns `true` if the material flags enable the extra float block
	pub fn has_flag1_floats(&self) -> bool {
		self.material_flags[1] & FLAG1_FLOATS_BIT != 0
	}

	/// Every key referenced from the model payload
	pub fn references(&self) -> Vec<ChunkKey> {
		let mut keys: Vec<ChunkKey> = self.clump.iter().chain(self.hit.iter()).cloned().collect();
		keys.extend(self.materials.iter().filter(|key| !key.is_null()).cloned());
		keys
	}

	pub(crate) fn decode(raw: &RawChunk<'_>, ctx: &mut DecodeContext<'_>) -> Result<Self, XfbinError> {
		let mut r = ByteReader::new(raw.data, FileType::Model);
		let mut model = Model::new(&raw.key.path, &raw.key.name);
		model.version = raw.version;

		model.field00 = r.u16()?;
		model.rigging_flag = RiggingFlag::from_bits_retain(r.u16()?);
		model.material_flags = r.array()?;
		if model.has_flag1_floats() {
			model.flag1_floats = Some(r.f32_array()?);
		}

		model.clump = ctx.resolve_or_warn(FileType::Model, r.u32()?);
		model.hit = ctx.resolve_or_warn(FileType::Model, r.u32()?);
		model.coord_index = r.u32()?;

		let nud_size = r.u32()? as usize;
		model.nud = Nud::from_bytes(r.bytes(nud_size)?)?;

		let material_count = r.u16()? as usize;
		for _ in 0..material_count {
			let local = r.u32()?;
			let key = ctx.resolve_or_warn(FileType::Model, local).unwrap_or_else(ChunkKey::null);
			model.materials.push(key);
		}

		Ok(model)
	}

	pub(crate) fn encode(&self, ctx: &EncodeContext<'_>) -> Result<Vec<u8>, XfbinError> {
		let nud = self.nud.to_bytes()?;
		let material_count = u16::try_from(self.materials.len())
			.map_err(|_| XfbinError::invalid_data(FileType::Model, "too many materials"))?;

		let mut w = ByteWriter::with_capacity(nud.len() + 64);
		w.u16(self.field00);
		w.u16(self.rigging_flag.bits());
		w.bytes(&self.material_flags);
		if self.has_flag1_floats() {
			w.f32_slice(&self.flag1_floats.unwrap_or_default());
		}

		w.u32(ctx.index_of_optional(FileType::Model, self.clump.as_ref())?);
		w.u32(ctx.index_of_optional(FileType::Model, self.hit.as_ref())?);
		w.u32(self.coord_index);

		w.u32(nud.len() as u32);
		w.bytes(&nud);

		w.u16(material_count);
		for material in &self.materials {
			w.u32(ctx.index_of_optional(FileType::Model, Some(material))?);
		}

		Ok(w.into_inner())
	}
}
