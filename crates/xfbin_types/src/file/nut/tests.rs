//! Unit tests for NUT parsing and DDS export

use super::*;

fn le_u32(data: &[u8], offset: usize) -> u32 {
	u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
}

fn single(format_code: u8, width: u16, height: u16, data: Vec<u8>) -> Nut {
	Nut {
		version: constants::VERSION,
		textures: vec![NutTexture::new(width, height, format_code, data).unwrap()],
	}
}

#[test]
fn test_round_trip() {
	let mut texture = NutTexture::new(4, 4, 0, vec![0xAB; 8]).unwrap();
	texture.hash_id = 0x4000_0001;
	let mut mipmapped = NutTexture::new(2, 2, 14, (0..20).collect()).unwrap();
	mipmapped.mipmap_sizes = vec![16, 4];
	let nut = Nut {
		version: constants::VERSION,
		textures: vec![texture, mipmapped],
	};

	let bytes = nut.to_bytes().unwrap();
	assert_eq!(&bytes[0..4], b"NTP3");
	assert_eq!(Nut::from_bytes(&bytes).unwrap(), nut);
}

#[test]
fn test_unsupported_format() {
	let mut bytes = single(0, 4, 4, vec![0; 8]).to_bytes().unwrap();
	// pixel format byte of the first texture header
	bytes[constants::HEADER_SIZE + 0x13] = 9;
	assert!(matches!(Nut::from_bytes(&bytes), Err(XfbinError::UnsupportedPixelFormat(9))));
	assert!(NutTexture::new(1, 1, 3, vec![0; 4]).is_err());
}

#[test]
fn test_invalid_magic() {
	let mut bytes = single(0, 4, 4, vec![0; 8]).to_bytes().unwrap();
	bytes[..4].copy_from_slice(b"NTWU");
	assert!(matches!(Nut::from_bytes(&bytes), Err(XfbinError::InvalidMagic { .. })));
}

#[test]
fn test_truncated_payload() {
	let bytes = single(0, 4, 4, vec![0; 8]).to_bytes().unwrap();
	assert!(matches!(Nut::from_bytes(&bytes[..bytes.len() - 1]), Err(XfbinError::Truncated { .. })));
}

#[test]
fn test_dds_dxt5() {
	let payload: Vec<u8> = (0..16).collect();
	let dds = single(2, 4, 4, payload.clone()).to_dds(0).unwrap();

	assert_eq!(&dds[0..4], b"DDS ");
	assert_eq!(le_u32(&dds, 4), 124);
	assert_eq!(le_u32(&dds, 12), 4);
	assert_eq!(le_u32(&dds, 16), 4);
	assert_eq!(le_u32(&dds, 20), 16);
	assert_eq!(le_u32(&dds, 76), 32);
	assert_eq!(&dds[84..88], b"DXT5");
	assert_eq!(dds.len(), 128 + payload.len());
	assert_eq!(&dds[128..], &payload[..]);
}

#[test]
fn test_dds_rgb565_swaps_words() {
	let dds = single(8, 2, 1, vec![0x12, 0x34, 0x56, 0x78]).to_dds(0).unwrap();

	assert_eq!(le_u32(&dds, 88), 16);
	assert_eq!(le_u32(&dds, 92), 0xF800);
	assert_eq!(le_u32(&dds, 100), 0x001F);
	assert_eq!(le_u32(&dds, 104), 0);
	assert_eq!(&dds[128..], &[0x34, 0x12, 0x78, 0x56]);
}

#[test]
fn test_dds_argb8() {
	// A=1 R=2 G=3 B=4 stored big-endian
	let dds = single(14, 1, 1, vec![1, 2, 3, 4]).to_dds(0).unwrap();

	assert_eq!(le_u32(&dds, 88), 32);
	assert_eq!(le_u32(&dds, 104), 0xFF00_0000);
	let pixel = le_u32(&dds, 128);
	assert_eq!(pixel & 0xFF00_0000, 0x0100_0000);
	assert_eq!(pixel & 0x00FF_0000, 0x0002_0000);
	assert_eq!(pixel & 0x0000_00FF, 0x0000_0004);
}

#[test]
fn test_dds_bgra8_masks() {
	let dds = single(17, 1, 1, vec![1, 2, 3, 4]).to_dds(0).unwrap();
	assert_eq!(le_u32(&dds, 92), 0x0000_FF00);
	assert_eq!(le_u32(&dds, 100), 0xFF00_0000);
	assert_eq!(le_u32(&dds, 104), 0x0000_00FF);
}

#[test]
fn test_dds_index_out_of_range() {
	let nut = single(0, 4, 4, vec![0; 8]);
	assert!(matches!(nut.to_dds(1), Err(XfbinError::UnresolvedReference { index: 1, len: 1, .. })));
}

#[test]
fn test_level_size() {
	assert_eq!(PixelFormat::Dxt1.level_size(1, 1), 8);
	assert_eq!(PixelFormat::Dxt5.level_size(8, 4), 32);
	assert_eq!(PixelFormat::Argb8.level_size(3, 2), 24);
}
