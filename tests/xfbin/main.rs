//! Integration tests for `xfbin-rs`

use xfbin_rs::prelude::*;
use xfbin_rs::xfbin_types::file::nucc::constants as tags;
use xfbin_rs::xfbin_types::file::nut::{self, NutTexture};

mod editing;
mod roundtrip;

pub(crate) const MAX_PATH: &str = "c/2sik/max/2sikbod1.max";
pub(crate) const TEX_PATH: &str = "c/2sik/tex/2sikbod1.max";

pub(crate) fn nut_bytes(width: u16, height: u16, fill: u8) -> Vec<u8> {
	let size = PixelFormat::Dxt1.level_size(width as u32, height as u32);
	nut::Nut {
		version: nut::constants::VERSION,
		textures: vec![NutTexture::new(width, height, 0, vec![fill; size]).unwrap()],
	}
	.to_bytes()
	.unwrap()
}

pub(crate) fn quad_nud() -> Nud {
	let vertex = |x: f32, y: f32| Vertex {
		position: [x, y, 0.0],
		normal: [0.0, 0.0, 1.0],
		uv: vec![[x, y]],
		color: Some([1.0, 1.0, 1.0, 1.0]),
		..Vertex::default()
	};
	let mut group = MeshGroup::new("body");
	group.meshes.push(Mesh {
		vertices: vec![vertex(0.0, 0.0), vertex(1.0, 0.0), vertex(1.0, 1.0), vertex(0.0, 1.0)],
		faces: vec![[0, 1, 2], [0, 2, 3]],
		..Mesh::default()
	});
	Nud {
		mesh_groups: vec![group],
		..Nud::new()
	}
}

/// A character file: one clump page with material and texture, one anm page
pub(crate) fn character(name: &str) -> Document {
	let mut clump = Clump::new(MAX_PATH, name);
	let root = clump.add_coord(Coord::new(MAX_PATH, "trall"), None);
	let hip = clump.add_coord(Coord::new(MAX_PATH, "hip"), Some(root));
	let mut head = Coord::new(MAX_PATH, "head");
	head.position = [0.0, 150.0, 0.0];
	clump.add_coord(head, Some(hip));

	let texture = Texture::from_nut(TEX_PATH, "2sikbody", nut_bytes(8, 8, 0x5A)).unwrap();
	let mut material = Material::new(MAX_PATH, "mat_body");
	material.format = 0x07;
	material.floats = vec![1.0, 0.5, 0.25];
	material.texture_groups.push(TextureGroup {
		flag: 0,
		textures: vec![texture.key()],
	});

	let mut model = Model::new(MAX_PATH, "body");
	model.coord_index = hip as u32;
	model.nud = quad_nud();
	model.materials = vec![material.key()];
	let model_key = model.key();
	clump.add_model(model);
	clump.model_groups.push(ModelGroup {
		models: vec![Some(model_key)],
		..ModelGroup::default()
	});

	let mut document = Document::new();
	let page = document.add_clump_page(clump);
	document.pages_mut()[page].push(material);
	document.pages_mut()[page].push(texture);
	document.add_chunk_page(Anm::new("c/2sik/anm/2sikidle.max", "2sikidle", vec![0; 0x14]));
	document
}

#[test]
fn test_chunk_type_tags() {
	assert_eq!(tags::CLUMP, "nuccChunkClump");
	assert_eq!(tags::TEXTURE, "nuccChunkTexture");
	assert_eq!(ChunkKey::page().chunk_type, tags::PAGE);
}
