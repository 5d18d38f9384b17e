//! NUT (NTP3) texture container support.
//!
//! Texture chunks embed an NTP3 container. It is kept as bytes in the chunk
//! and parsed here for inspection and DDS export.
//!
//! # File Structure
//!
//! ```text
//! +---------------------------+ 0x00
//! | "NTP3"                    |
//! | u16 version, u16 count    |
//! | 8 bytes padding           |
//! +---------------------------+ 0x10
//! | Texture header            |
//! |   u32 total size          |
//! |   u32 padding             |
//! |   u32 data size           |
//! |   u16 header size         |
//! |   u16 padding             |
//! |   u8  padding             |
//! |   u8  mipmap count        |
//! |   u8  padding             |
//! |   u8  pixel format        |
//! |   u16 width, u16 height   |
//! |   padding up to 0x30      |
//! |   u32 x n mipmap sizes    |  only when n > 1, padded to 16
//! |   "eXt\0" section (0x10)  |
//! |   "GIDX" section (0x10)   |  carries the hash id
//! +---------------------------+ header start + header size
//! | Pixel data                |
//! +---------------------------+ header start + total size
//! | Next texture ...          |
//! +---------------------------+
//! ```
//!
//! All fields are big-endian.

mod dds;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::file::binary::{ByteReader, ByteWriter, align_up};
use crate::file::{FileType, XfbinError};

/// NUT constants
pub mod constants {
	/// Magic bytes
	pub const MAGIC: [u8; 4] = *b"NTP3";

	/// Version written by [`super::Nut::to_bytes`]
	pub const VERSION: u16 = 0x0200;

	/// Size of the file header
	pub const HEADER_SIZE: usize = 0x10;

	/// Offset of the mipmap size table within a texture header
	pub const MIPMAP_TABLE_OFFSET: usize = 0x30;

	/// Extension section magic
	pub const EXT_MAGIC: [u8; 4] = *b"eXt\0";

	/// Global index section magic
	pub const GIDX_MAGIC: [u8; 4] = *b"GIDX";

	/// Size of the eXt and GIDX sections
	pub const SECTION_SIZE: usize = 0x10;
}

/// Pixel formats that can be exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
	/// BC1
	Dxt1,
	/// BC2
	Dxt3,
	/// BC3
	Dxt5,
	/// 16-bit, 1-bit alpha
	Rgb5a1,
	/// 16-bit, no alpha; codes 7 and 8
	Rgb565,
	/// 32-bit ARGB
	Argb8,
	/// 32-bit BGRA
	Bgra8,
}

impl PixelFormat {
	/// Decodes a NUT pixel format code
	pub fn from_code(code: u8) -> Result<Self, XfbinError> {
		match code {
			0 => Ok(PixelFormat::Dxt1),
			1 => Ok(PixelFormat::Dxt3),
			2 => Ok(PixelFormat::Dxt5),
			6 => Ok(PixelFormat::Rgb5a1),
			7 | 8 => Ok(PixelFormat::Rgb565),
			14 => Ok(PixelFormat::Argb8),
			17 => Ok(PixelFormat::Bgra8),
			other => Err(XfbinError::UnsupportedPixelFormat(other)),
		}
	}

	/// Returns `true` for block-compressed formats
	pub fn is_compressed(self) -> bool {
		matches!(self, PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5)
	}

	/// Bytes per pixel for uncompressed formats, bytes per 4x4 block otherwise
	pub fn unit_size(self) -> usize {
		match self {
			PixelFormat::Dxt1 => 8,
			PixelFormat::Dxt3 | PixelFormat::Dxt5 => 16,
			PixelFormat::Rgb5a1 | PixelFormat::Rgb565 => 2,
			PixelFormat::Argb8 | PixelFormat::Bgra8 => 4,
		}
	}

	/// Size in bytes of one mip level
	pub fn level_size(self, width: u32, height: u32) -> usize {
		let (width, height) = (width.max(1) as usize, height.max(1) as usize);
		if self.is_compressed() {
			width.div_ceil(4) * height.div_ceil(4) * self.unit_size()
		} else {
			width * height * self.unit_size()
		}
	}
}

/// One texture of a NUT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutTexture {
	/// Width in pixels
	pub width: u16,
	/// Height in pixels
	pub height: u16,
	/// Raw pixel format code
	pub format_code: u8,
	/// Parsed pixel format
	pub pixel_format: PixelFormat,
	/// Size of each mip level, largest first
	pub mipmap_sizes: Vec<u32>,
	/// Hash id from the GIDX section
	pub hash_id: u32,
	/// Pixel data, all mip levels back to back
	#[serde(skip)]
	pub data: Vec<u8>,
}

impl NutTexture {
	/// Creates a single-level texture
	pub fn new(width: u16, height: u16, format_code: u8, data: Vec<u8>) -> Result<Self, XfbinError> {
		let pixel_format = PixelFormat::from_code(format_code)?;
		Ok(Self {
			width,
			height,
			format_code,
			pixel_format,
			mipmap_sizes: vec![data.len() as u32],
			hash_id: 0,
			data,
		})
	}

	/// Number of mip levels
	pub fn mipmap_count(&self) -> usize {
		self.mipmap_sizes.len().max(1)
	}

	fn header_size(&self) -> usize {
		let table = if self.mipmap_sizes.len() > 1 {
			align_up(4 * self.mipmap_sizes.len(), 0x10)
		} else {
			0
		};
		constants::MIPMAP_TABLE_OFFSET + table + 2 * constants::SECTION_SIZE
	}
}

/// A parsed NTP3 container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nut {
	/// Format version
	pub version: u16,
	/// Textures
	pub textures: Vec<NutTexture>,
}

impl Nut {
	/// Parses an NTP3 container
	///
	/// Fails with [`XfbinError::UnsupportedPixelFormat`] if any texture uses
	/// a format that cannot be exported.
	pub fn from_bytes(data: &[u8]) -> Result<Self, XfbinError> {
		let mut r = ByteReader::new(data, FileType::Nut);
		let magic: [u8; 4] = r.array()?;
		if magic != constants::MAGIC {
			return Err(XfbinError::invalid_magic(FileType::Nut, &constants::MAGIC, &magic));
		}
		let version = r.u16()?;
		let count = r.u16()? as usize;
		r.skip(8)?;

		let mut textures = Vec::with_capacity(count);
		for _ in 0..count {
			let start = r.position();
			let total_size = r.u32()? as usize;
			r.skip(4)?;
			let data_size = r.u32()? as usize;
			let header_size = r.u16()? as usize;
			r.skip(3)?;
			let mipmap_count = r.u8()? as usize;
			r.skip(1)?;
			let format_code = r.u8()?;
			let width = r.u16()?;
			let height = r.u16()?;
			let pixel_format = PixelFormat::from_code(format_code)?;

			let mipmap_sizes = if mipmap_count > 1 {
				r.seek(start + constants::MIPMAP_TABLE_OFFSET)?;
				(0..mipmap_count).map(|_| r.u32()).collect::<Result<Vec<_>, _>>()?
			} else {
				vec![data_size as u32]
			};

			let hash_id = if header_size >= constants::SECTION_SIZE {
				let mut gidx = r.clone();
				gidx.seek(start + header_size - constants::SECTION_SIZE)?;
				if gidx.array::<4>()? == constants::GIDX_MAGIC {
					gidx.skip(4)?;
					gidx.u32()?
				} else {
					0
				}
			} else {
				0
			};

			r.seek(start + header_size)?;
			let pixels = r.bytes(data_size)?.to_vec();
			textures.push(NutTexture {
				width,
				height,
				format_code,
				pixel_format,
				mipmap_sizes,
				hash_id,
				data: pixels,
			});

			if total_size < header_size + data_size {
				return Err(XfbinError::invalid_data(FileType::Nut, format!("texture size {total_size} too small")));
			}
			r.seek(start + total_size)?;
		}

		log::trace!("parsed NUT with {} textures", textures.len());
		Ok(Nut {
			version,
			textures,
		})
	}

	/// Serializes the container
	pub fn to_bytes(&self) -> Result<Vec<u8>, XfbinError> {
		let count = u16::try_from(self.textures.len())
			.map_err(|_| XfbinError::invalid_data(FileType::Nut, "too many textures"))?;

		let mut w = ByteWriter::new();
		w.bytes(&constants::MAGIC);
		w.u16(self.version);
		w.u16(count);
		w.zeros(8);

		for texture in &self.textures {
			let start = w.position();
			let header_size = texture.header_size();
			let mipmap_count = u8::try_from(texture.mipmap_count())
				.map_err(|_| XfbinError::invalid_data(FileType::Nut, "too many mip levels"))?;

			w.u32((header_size + texture.data.len()) as u32);
			w.u32(0);
			w.u32(texture.data.len() as u32);
			w.u16(header_size as u16);
			w.zeros(3);
			w.u8(mipmap_count);
			w.u8(0);
			w.u8(texture.format_code);
			w.u16(texture.width);
			w.u16(texture.height);
			w.zeros(start + constants::MIPMAP_TABLE_OFFSET - w.position());

			if texture.mipmap_sizes.len() > 1 {
				for &size in &texture.mipmap_sizes {
					w.u32(size);
				}
				w.align(0x10);
			}

			w.bytes(&constants::EXT_MAGIC);
			w.u32(0x20);
			w.u32(constants::SECTION_SIZE as u32);
			w.u32(0);
			w.bytes(&constants::GIDX_MAGIC);
			w.u32(constants::SECTION_SIZE as u32);
			w.u32(texture.hash_id);
			w.u32(0);

			w.bytes(&texture.data);
		}

		Ok(w.into_inner())
	}

	/// Exports one texture as a complete `.dds` image
	pub fn to_dds(&self, index: usize) -> Result<Vec<u8>, XfbinError> {
		let texture = self
			.textures
			.get(index)
			.ok_or_else(|| XfbinError::unresolved(FileType::Nut, index as i64, self.textures.len()))?;
		dds::write_dds(texture)
	}
}
