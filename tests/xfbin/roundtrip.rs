//! Decoding and encoding whole files

use super::*;

#[test_log::test]
fn test_character_round_trip() {
	let document = character("2sikbod1");
	let bytes = xfbin_rs::encode(&document).unwrap();
	assert_eq!(hex::encode(&bytes[..4]), "4e554343");

	let decoded = xfbin_rs::decode(&bytes).unwrap();
	assert!(decoded.warnings().is_empty(), "{:?}", decoded.warnings());
	assert_eq!(decoded, document);
	assert_eq!(xfbin_rs::encode(&decoded).unwrap(), bytes);
}

#[test_log::test]
fn test_clump_children_survive() {
	let bytes = xfbin_rs::encode(&character("2sikbod1")).unwrap();
	let decoded = xfbin_rs::decode(&bytes).unwrap();

	let clump = decoded.pages()[0].clump().unwrap();
	assert_eq!(clump.coords.len(), 3);
	assert_eq!(clump.coord_index("head"), Some(2));
	assert_eq!(clump.coords[2].parent, Some(1));
	assert_eq!(clump.root_coords().collect::<Vec<_>>(), vec![0]);

	let model = &clump.models[0];
	assert_eq!(model.coord_index, 1);
	assert_eq!(model.nud.mesh_count(), 1);
	assert_eq!(model.materials, vec![ChunkKey::new(tags::MATERIAL, MAX_PATH, "mat_body")]);
}

#[test]
fn test_file_round_trip() {
	let path = std::env::temp_dir().join(format!("xfbin_rs_{}_round_trip.xfbin", std::process::id()));
	let document = character("2sikbod1");

	XfbinWriter::default().write_file(&document, &path).unwrap();
	let decoded = XfbinReader::new(ChunkRegistry::with_builtin(), ParseConfig::strict()).read_file(&path).unwrap();
	std::fs::remove_file(&path).unwrap();

	assert_eq!(decoded, document);
}

#[test]
fn test_missing_file() {
	let path = std::env::temp_dir().join("xfbin_rs_does_not_exist.xfbin");
	assert!(matches!(XfbinReader::default().read_file(&path), Err(XfbinError::Io(_))));
}

#[test]
fn test_garbage_is_rejected() {
	assert!(xfbin_rs::decode(b"not an xfbin file at all, clearly").is_err());
	assert!(xfbin_rs::decode(&[]).is_err());
}

#[test_log::test]
fn test_empty_registry_keeps_every_chunk_raw() {
	let document = character("2sikbod1");
	let bytes = xfbin_rs::encode(&document).unwrap();

	let reader = XfbinReader::new(ChunkRegistry::empty(), ParseConfig::default());
	let raw = reader.read(&bytes).unwrap();
	assert!(raw.pages().iter().flat_map(Page::chunks).all(|chunk| matches!(chunk, Chunk::Unknown(_))));

	let writer = XfbinWriter::new(ChunkRegistry::empty());
	assert_eq!(writer.write(&raw).unwrap(), bytes);
}

#[test]
fn test_json_dump() {
	let document = character("2sikbod1");
	let json = serde_json::to_value(&document).unwrap();
	let text = json.to_string();
	assert!(text.contains("2sikbod1"));
	assert!(text.contains("mat_body"));

	let restored: Document = serde_json::from_value(json).unwrap();
	assert_eq!(restored, document);
}
