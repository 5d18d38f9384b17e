//! NUD material blocks.
//!
//! ```text
//! -- header (0x20) --
//! u32   flags            u32   padding
//! u16   source factor    u16   texture count
//! u16   dest factor      u8    alpha test      u8  alpha function
//! u16   ref alpha        u16   cull mode
//! f32   unk1             f32   unk2
//! i32   z-buffer offset
//! -- texture (0x18) x texture count --
//! i32   hash             6 bytes padding
//! u16   map mode         u8 wrap S, wrap T, min filter, mag filter, mip detail, unk1
//! 4 bytes padding        u16   unk2
//! -- property, repeated --
//! u32   size (0x10 + 4n, 0 for the last property)
//! u32   name offset into the name section
//! 3 bytes padding        u8    value count
//! 4 bytes padding
//! f32 x n values
//! ```

use serde::{Deserialize, Serialize};

use super::constants::{MATERIAL_HEADER_SIZE, MATERIAL_PROPERTY_HEADER_SIZE, MATERIAL_TEXTURE_SIZE};
use crate::file::binary::{ByteReader, ByteWriter};
use crate::file::{FileType, XfbinError};

/// Sampler settings of one material texture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NudMaterialTexture {
	/// Texture hash
	pub hash: i32,
	/// Map mode
	pub map_mode: u16,
	/// Horizontal wrap mode
	pub wrap_s: u8,
	/// Vertical wrap mode
	pub wrap_t: u8,
	/// Minification filter
	pub min_filter: u8,
	/// Magnification filter
	pub mag_filter: u8,
	/// Mip detail
	pub mip_detail: u8,
	/// Unknown byte
	pub unk1: u8,
	/// Unknown short
	pub unk2: u16,
}

/// A named list of shader parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NudMaterialProperty {
	/// Property name, e.g. `NU_materialHash`
	pub name: String,
	/// Values
	pub values: Vec<f32>,
}

/// Render state, textures and shader parameters of a mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NudMaterial {
	/// Shader flags
	pub flags: u32,
	/// Blend source factor
	pub src_factor: u16,
	/// Blend destination factor
	pub dst_factor: u16,
	/// Alpha test
	pub alpha_test: u8,
	/// Alpha function
	pub alpha_func: u8,
	/// Alpha reference
	pub ref_alpha: u16,
	/// Cull mode
	pub cull_mode: u16,
	/// Unknown float
	pub unk1: f32,
	/// Unknown float
	pub unk2: f32,
	/// Z-buffer offset
	pub zbuffer_offset: i32,
	/// Textures
	pub textures: Vec<NudMaterialTexture>,
	/// Shader properties
	pub properties: Vec<NudMaterialProperty>,
}

impl NudMaterial {
	/// Encoded size of the block
	///
	/// A material without properties still carries one empty terminator entry.
	pub fn encoded_size(&self) -> usize {
		let properties: usize = if self.properties.is_empty() {
			MATERIAL_PROPERTY_HEADER_SIZE
		} else {
			self.properties.iter().map(|p| MATERIAL_PROPERTY_HEADER_SIZE + 4 * p.values.len()).sum()
		};
		MATERIAL_HEADER_SIZE + MATERIAL_TEXTURE_SIZE * self.textures.len() + properties
	}

	/// Reads a material block at the reader's position
	///
	/// `name_section` is the absolute offset of the name section.
	pub(super) fn read(r: &mut ByteReader<'_>, name_section: usize) -> Result<Self, XfbinError> {
		let flags = r.u32()?;
		r.skip(4)?;
		let src_factor = r.u16()?;
		let texture_count = r.u16()? as usize;
		let mut material = NudMaterial {
			flags,
			src_factor,
			dst_factor: r.u16()?,
			alpha_test: r.u8()?,
			alpha_func: r.u8()?,
			ref_alpha: r.u16()?,
			cull_mode: r.u16()?,
			unk1: r.f32()?,
			unk2: r.f32()?,
			zbuffer_offset: r.i32()?,
			textures: Vec::with_capacity(texture_count),
			properties: Vec::new(),
		};

		for _ in 0..texture_count {
			let hash = r.i32()?;
			r.skip(6)?;
			let mut texture = NudMaterialTexture {
				hash,
				map_mode: r.u16()?,
				wrap_s: r.u8()?,
				wrap_t: r.u8()?,
				min_filter: r.u8()?,
				mag_filter: r.u8()?,
				mip_detail: r.u8()?,
				unk1: r.u8()?,
				unk2: 0,
			};
			r.skip(4)?;
			texture.unk2 = r.u16()?;
			material.textures.push(texture);
		}

		loop {
			let start = r.position();
			let size = r.u32()? as usize;
			let name_offset = r.u32()? as usize;
			r.skip(3)?;
			let count = r.u8()? as usize;
			r.skip(4)?;
			let values = (0..count).map(|_| r.f32()).collect::<Result<Vec<_>, _>>()?;

			// An empty terminator stands in for "no properties"
			let is_terminator = size == 0 && count == 0 && material.properties.is_empty();
			if !is_terminator {
				let name = r.cstring_at(name_section + name_offset)?;
				material.properties.push(NudMaterialProperty {
					name,
					values,
				});
			}

			if size == 0 {
				break;
			}
			if size < MATERIAL_PROPERTY_HEADER_SIZE {
				return Err(XfbinError::invalid_data(FileType::Nud, format!("material property size {size}")));
			}
			r.seek(start + size)?;
		}

		Ok(material)
	}

	/// Writes the material block
	///
	/// `name_offset` maps each property, in order, to its offset in the name section.
	pub(super) fn write(&self, w: &mut ByteWriter, name_offsets: &[u32]) -> Result<(), XfbinError> {
		let texture_count = u16::try_from(self.textures.len())
			.map_err(|_| XfbinError::invalid_data(FileType::Nud, "too many material textures"))?;

		w.u32(self.flags);
		w.u32(0);
		w.u16(self.src_factor);
		w.u16(texture_count);
		w.u16(self.dst_factor);
		w.u8(self.alpha_test);
		w.u8(self.alpha_func);
		w.u16(self.ref_alpha);
		w.u16(self.cull_mode);
		w.f32(self.unk1);
		w.f32(self.unk2);
		w.i32(self.zbuffer_offset);

		for texture in &self.textures {
			w.i32(texture.hash);
			w.zeros(6);
			w.u16(texture.map_mode);
			w.u8(texture.wrap_s);
			w.u8(texture.wrap_t);
			w.u8(texture.min_filter);
			w.u8(texture.mag_filter);
			w.u8(texture.mip_detail);
			w.u8(texture.unk1);
			w.zeros(4);
			w.u16(texture.unk2);
		}

		if self.properties.is_empty() {
			w.zeros(MATERIAL_PROPERTY_HEADER_SIZE);
			return Ok(());
		}

		let last = self.properties.len() - 1;
		for (i, property) in self.properties.iter().enumerate() {
			let count = u8::try_from(property.values.len())
				.map_err(|_| XfbinError::invalid_data(FileType::Nud, "too many property values"))?;
			let size = if i == last {
				0
			} else {
				(MATERIAL_PROPERTY_HEADER_SIZE + 4 * property.values.len()) as u32
			};
			w.u32(size);
			w.u32(name_offsets.get(i).copied().unwrap_or_default());
			w.zeros(3);
			w.u8(count);
			w.zeros(4);
			w.f32_slice(&property.values);
		}

		Ok(())
	}
}
