//! Editing decoded documents

use super::*;

#[test_log::test]
fn test_inject_page_from_another_file() {
	let mut target = xfbin_rs::decode(&xfbin_rs::encode(&character("2sikbod1")).unwrap()).unwrap();
	let mut source = character("2sikbod1");
	source.pages_mut()[0].clump_mut().unwrap().coords[2].position = [0.0, 160.0, 0.0];

	let index = target.get_chunk_page_index(MAX_PATH).unwrap();
	let page = source.get_chunk_page(MAX_PATH).unwrap().clone();
	target.replace_page(index, page);

	let bytes = xfbin_rs::encode(&target).unwrap();
	let decoded = xfbin_rs::decode(&bytes).unwrap();
	let clump = decoded.get_chunk_page(MAX_PATH).unwrap().clump().unwrap();
	assert_eq!(clump.coords[2].position, [0.0, 160.0, 0.0]);
	assert_eq!(decoded.pages().len(), 2);
}

#[test]
fn test_replace_texture() {
	let mut document = character("2sikbod1");
	let replacement = Texture::from_nut(TEX_PATH, "2sikbody", nut_bytes(16, 16, 0x33)).unwrap();
	let old = document.pages_mut()[0].replace_chunk(replacement).unwrap();
	assert!(matches!(old, Chunk::Texture(ref t) if t.width == 8));

	let decoded = xfbin_rs::decode(&xfbin_rs::encode(&document).unwrap()).unwrap();
	let textures = decoded.get_chunks_by_type(tags::TEXTURE);
	assert_eq!(textures.len(), 1);
	let ChunkView::Texture(texture) = textures[0] else {
		panic!("expected a texture view");
	};
	assert_eq!((texture.width, texture.height), (16, 16));
}

#[test]
fn test_remove_page() {
	let mut document = character("2sikbod1");
	let removed = document.remove_page(1).unwrap();
	assert_eq!(removed.chunks()[0].chunk_type(), tags::ANM);
	assert!(document.remove_page(5).is_none());

	let decoded = xfbin_rs::decode(&xfbin_rs::encode(&document).unwrap()).unwrap();
	assert_eq!(decoded.pages().len(), 1);
	assert!(decoded.get_chunks_by_type(tags::ANM).is_empty());
}

#[test]
fn test_texture_export() {
	let document = character("2sikbod1");
	let ChunkView::Texture(texture) = document.get_chunks_by_type(tags::TEXTURE)[0] else {
		panic!("expected a texture view");
	};
	let dds = texture.to_dds().unwrap();
	assert_eq!(&dds[..4], b"DDS ");
	assert_eq!(u32::from_le_bytes(dds[4..8].try_into().unwrap()), 124);
	assert_eq!(&dds[84..88], b"DXT1");
	assert_eq!(dds.len(), 128 + 32);
}

#[test]
fn test_host_conversion() {
	use xfbin_rs::xfbin_types::convert;

	assert_eq!(convert::pos_to_host([1.0, 2.0, 3.0]), [1.0, 3.0, -2.0]);
	assert_eq!(convert::pos_from_host([1.0, 3.0, -2.0]), [1.0, 2.0, 3.0]);

	let host = convert::pos_scaled_to_host([0.0, 150.0, 20.0]);
	for (got, want) in host.iter().zip([0.0, 0.2, -1.5]) {
		assert!((got - want).abs() < 1e-6, "{host:?}");
	}
	assert_eq!(convert::uv_to_host([0.25, 0.25]), [0.25, 0.75]);
}
