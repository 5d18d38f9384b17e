//! Unit tests for primitive binary I/O

use half::f16;

use super::*;

fn round_trip<T: Primitive + PartialEq + std::fmt::Debug>(value: T) {
	let mut out = Vec::new();
	value.encode(&mut out);
	assert_eq!(out.len(), T::SIZE);
	let (decoded, consumed) = T::decode(&out, 0).unwrap();
	assert_eq!(consumed, T::SIZE);
	assert_eq!(decoded, value);
}

#[test]
fn test_integer_round_trip() {
	for v in [0u8, 1, 0x7F, 0xFF] {
		round_trip(v);
	}
	for v in [i8::MIN, -1, 0, i8::MAX] {
		round_trip(v);
	}
	for v in [0u16, 0x1234, u16::MAX] {
		round_trip(v);
	}
	for v in [i16::MIN, -1, 0, i16::MAX] {
		round_trip(v);
	}
	for v in [0u32, 0xDEAD_BEEF, u32::MAX] {
		round_trip(v);
	}
	for v in [i32::MIN, -1, i32::MAX] {
		round_trip(v);
	}
	round_trip(u64::MAX);
	round_trip(i64::MIN);
}

#[test]
fn test_big_endian_layout() {
	let mut out = Vec::new();
	0x1234_5678u32.encode(&mut out);
	0xABCDu16.encode(&mut out);
	assert_eq!(out, [0x12, 0x34, 0x56, 0x78, 0xAB, 0xCD]);
}

#[test]
fn test_float_bit_exact() {
	let values = [0.0f32, -0.0, 1.0, -1.5, f32::MIN, f32::MAX, f32::MIN_POSITIVE, f32::EPSILON, f32::INFINITY];
	for value in values {
		let mut out = Vec::new();
		value.encode(&mut out);
		let (decoded, _) = f32::decode(&out, 0).unwrap();
		assert_eq!(decoded.to_bits(), value.to_bits());
	}

	// NaN payloads pass through untouched
	let nan = f32::from_bits(0x7FC0_1234);
	let mut out = Vec::new();
	nan.encode(&mut out);
	let (decoded, _) = f32::decode(&out, 0).unwrap();
	assert_eq!(decoded.to_bits(), 0x7FC0_1234);
}

#[test]
fn test_half_matches_reference() {
	for value in [0.0f32, -0.0, 1.0, 0.5, -2.25, 65504.0, 0.000_061_035_156] {
		let mut writer = ByteWriter::new();
		writer.f16(value);
		let bytes = writer.into_inner();
		assert_eq!(bytes, f16::from_f32(value).to_bits().to_be_bytes());

		let mut reader = ByteReader::new(&bytes, crate::file::FileType::Nud);
		let decoded = reader.f16().unwrap();
		assert_eq!(decoded.to_bits(), f16::from_f32(value).to_f32().to_bits());
	}
}

#[test]
fn test_truncated_read() {
	let data = [0x00, 0x01, 0x02];
	let err = u32::decode(&data, 0).unwrap_err();
	assert!(matches!(
		err,
		XfbinError::Truncated {
			needed: 4,
			available: 3,
			..
		}
	));

	let mut reader = ByteReader::new(&data, crate::file::FileType::Coord);
	assert_eq!(reader.u16().unwrap(), 0x0001);
	let err = reader.u16().unwrap_err();
	assert!(matches!(
		err,
		XfbinError::Truncated {
			file_type: crate::file::FileType::Coord,
			offset: 2,
			..
		}
	));
}

#[test]
fn test_cstring() {
	let data = b"nuccChunkClump\0abc\0tail";
	let mut reader = ByteReader::new(data, crate::file::FileType::ChunkTable);
	assert_eq!(reader.cstring().unwrap(), "nuccChunkClump");
	assert_eq!(reader.cstring().unwrap(), "abc");
	assert!(reader.cstring().is_err());
	assert_eq!(reader.cstring_at(15).unwrap(), "abc");
}

#[test]
fn test_string_table_dedup() {
	let mut table = StringTable::new();
	assert_eq!(table.intern(""), 0);
	assert_eq!(table.intern("c/1nrt/max/1nrtbod1.max"), 1);
	assert_eq!(table.intern(""), 0);
	assert_eq!(table.intern("1nrtbod1"), 2);
	assert_eq!(table.len(), 3);
	assert_eq!(table.byte_size(), 1 + 24 + 9);

	let mut writer = ByteWriter::new();
	table.write_to(&mut writer);
	let bytes = writer.into_inner();
	assert_eq!(bytes.len(), table.byte_size());

	let mut reader = ByteReader::new(&bytes, crate::file::FileType::ChunkTable);
	let strings = read_string_block(&mut reader, 3, bytes.len()).unwrap();
	assert_eq!(strings, vec!["", "c/1nrt/max/1nrtbod1.max", "1nrtbod1"]);
}

#[test]
fn test_string_block_count_bound() {
	let mut reader = ByteReader::new(b"a\0", crate::file::FileType::ChunkTable);
	let result = read_string_block(&mut reader, usize::MAX, 2);
	assert!(matches!(result, Err(crate::file::XfbinError::InvalidData { .. })));
	// nothing was consumed
	assert_eq!(reader.position(), 0);
	assert_eq!(read_string_block(&mut reader, 1, 2).unwrap(), vec!["a"]);
}

#[test]
fn test_alignment() {
	assert_eq!(align_up(0, 16), 0);
	assert_eq!(align_up(1, 16), 16);
	assert_eq!(align_up(16, 16), 16);
	assert_eq!(align_up(33, 4), 36);

	let mut writer = ByteWriter::new();
	writer.u8(1);
	writer.align(4);
	assert_eq!(writer.position(), 4);
	writer.u32(0);
	writer.patch_u32(4, 0xAABB_CCDD);
	assert_eq!(&writer.as_slice()[4..], &[0xAA, 0xBB, 0xCC, 0xDD]);
}
