//! DDS export.
//!
//! ```text
//! "DDS "
//! -- header (124 bytes, little-endian) --
//! u32 size (124), flags, height, width, pitch or linear size, depth, mip count
//! u32 x 11 reserved
//! -- pixel format (32 bytes) --
//! u32 size (32), flags, fourcc, rgb bit count, r/g/b/a masks
//! u32 caps, caps2, caps3, caps4, reserved
//! -- payload --
//! ```

use super::{NutTexture, PixelFormat};
use crate::file::XfbinError;

const DDS_MAGIC: &[u8; 4] = b"DDS ";
const HEADER_SIZE: u32 = 124;
const PIXEL_FORMAT_SIZE: u32 = 32;

mod flags {
	pub const CAPS: u32 = 0x1;
	pub const HEIGHT: u32 = 0x2;
	pub const WIDTH: u32 = 0x4;
	pub const PITCH: u32 = 0x8;
	pub const PIXEL_FORMAT: u32 = 0x1000;
	pub const MIPMAP_COUNT: u32 = 0x20000;
	pub const LINEAR_SIZE: u32 = 0x80000;
}

mod caps {
	pub const COMPLEX: u32 = 0x8;
	pub const TEXTURE: u32 = 0x1000;
	pub const MIPMAP: u32 = 0x400000;
}

mod pf_flags {
	pub const ALPHAPIXELS: u32 = 0x1;
	pub const FOURCC: u32 = 0x4;
	pub const RGB: u32 = 0x40;
}

/// The DDS pixel format block for a NUT format
struct DdsPixelFormat {
	flags: u32,
	fourcc: [u8; 4],
	bit_count: u32,
	masks: [u32; 4],
}

impl From<PixelFormat> for DdsPixelFormat {
	fn from(format: PixelFormat) -> Self {
		let fourcc = |code: &[u8; 4]| DdsPixelFormat {
			flags: pf_flags::FOURCC,
			fourcc: *code,
			bit_count: 0,
			masks: [0; 4],
		};
		let rgb = |bit_count, masks: [u32; 4]| DdsPixelFormat {
			flags: if masks[3] != 0 {
				pf_flags::RGB | pf_flags::ALPHAPIXELS
			} else {
				pf_flags::RGB
			},
			fourcc: [0; 4],
			bit_count,
			masks,
		};

		match format {
			PixelFormat::Dxt1 => fourcc(b"DXT1"),
			PixelFormat::Dxt3 => fourcc(b"DXT3"),
			PixelFormat::Dxt5 => fourcc(b"DXT5"),
			PixelFormat::Rgb5a1 => rgb(16, [0x7C00, 0x03E0, 0x001F, 0x8000]),
			PixelFormat::Rgb565 => rgb(16, [0xF800, 0x07E0, 0x001F, 0]),
			PixelFormat::Argb8 => rgb(32, [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000]),
			PixelFormat::Bgra8 => rgb(32, [0x0000_FF00, 0x00FF_0000, 0xFF00_0000, 0x0000_00FF]),
		}
	}
}

/// Reorders big-endian pixel words into the little-endian layout DDS expects
fn swap_payload(format: PixelFormat, data: &[u8]) -> Vec<u8> {
	let word = match format {
		PixelFormat::Rgb5a1 | PixelFormat::Rgb565 => 2,
		PixelFormat::Argb8 | PixelFormat::Bgra8 => 4,
		_ => return data.to_vec(),
	};
	let mut out = Vec::with_capacity(data.len());
	for chunk in data.chunks(word) {
		out.extend(chunk.iter().rev());
	}
	out
}

pub(super) fn write_dds(texture: &NutTexture) -> Result<Vec<u8>, XfbinError> {
	let format = texture.pixel_format;
	let pixel_format = DdsPixelFormat::from(format);
	let width = u32::from(texture.width);
	let height = u32::from(texture.height);
	let mipmap_count = texture.mipmap_count() as u32;

	let mut header_flags = flags::CAPS | flags::HEIGHT | flags::WIDTH | flags::PIXEL_FORMAT;
	let pitch_or_linear_size = if format.is_compressed() {
		header_flags |= flags::LINEAR_SIZE;
		format.level_size(width, height) as u32
	} else {
		header_flags |= flags::PITCH;
		width * format.unit_size() as u32
	};
	let mut surface_caps = caps::TEXTURE;
	if mipmap_count > 1 {
		header_flags |= flags::MIPMAP_COUNT;
		surface_caps |= caps::COMPLEX | caps::MIPMAP;
	}

	let payload = swap_payload(format, &texture.data);
	let mut out = Vec::with_capacity(4 + HEADER_SIZE as usize + payload.len());
	out.extend_from_slice(DDS_MAGIC);

	let mut put = |value: u32| out.extend_from_slice(&value.to_le_bytes());
	put(HEADER_SIZE);
	put(header_flags);
	put(height);
	put(width);
	put(pitch_or_linear_size);
	put(0);
	put(mipmap_count);
	for _ in 0..11 {
		put(0);
	}

	put(PIXEL_FORMAT_SIZE);
	put(pixel_format.flags);
	put(u32::from_le_bytes(pixel_format.fourcc));
	put(pixel_format.bit_count);
	for mask in pixel_format.masks {
		put(mask);
	}

	put(surface_caps);
	for _ in 0..4 {
		put(0);
	}

	out.extend_from_slice(&payload);
	log::trace!("exported {}x{} {:?} texture to DDS ({} bytes)", width, height, format, out.len());
	Ok(out)
}
