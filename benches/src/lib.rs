//! Benchmark helper utilities for xfbin-rs
//!
//! This module generates synthetic documents shaped like character model
//! files: one clump page per character holding its coords, models and
//! materials, followed by the textures those materials point at.

use xfbin_types::file::nucc::constants as tags;
use xfbin_types::file::nut::{self, NutTexture};
use xfbin_types::prelude::*;

/// Builds a NUD with `mesh_count` meshes of `vertex_count` vertices each
///
/// Vertices lie on a fan so every mesh has `vertex_count - 2` triangles.
pub fn generate_nud(mesh_count: usize, vertex_count: usize) -> Nud {
	let vertex_count = vertex_count.max(3);
	let mut group = MeshGroup::new("synthetic");
	for mesh in 0..mesh_count {
		let vertices = (0..vertex_count)
			.map(|i| {
				let angle = i as f32 / vertex_count as f32 * std::f32::consts::TAU;
				Vertex {
					position: [angle.cos(), angle.sin(), mesh as f32 * 0.1],
					normal: [0.0, 0.0, 1.0],
					uv: vec![[angle.cos() * 0.5 + 0.5, angle.sin() * 0.5 + 0.5]],
					color: Some([1.0, 1.0, 1.0, 1.0]),
					..Vertex::default()
				}
			})
			.collect();
		let faces = (1..vertex_count as u32 - 1).map(|i| [0, i, i + 1]).collect();
		group.meshes.push(Mesh {
			vertices,
			faces,
			..Mesh::default()
		});
	}
	Nud {
		mesh_groups: vec![group],
		..Nud::new()
	}
}

/// Builds NUT bytes holding one DXT1 texture of the given size
pub fn generate_nut(width: u16, height: u16) -> Result<Vec<u8>, XfbinError> {
	let size = PixelFormat::Dxt1.level_size(width as u32, height as u32);
	let data = (0..size).map(|i| (i % 251) as u8).collect();
	Nut {
		version: nut::constants::VERSION,
		textures: vec![NutTexture::new(width, height, 0, data)?],
	}
	.to_bytes()
}

/// Builds a document with `characters` clump pages
///
/// Each clump carries a chain of `bone_count` coords and `model_count`
/// models, each model with its own material and texture.
pub fn generate_document(
	characters: usize,
	bone_count: usize,
	model_count: usize,
	vertex_count: usize,
) -> Result<Document, XfbinError> {
	let mut document = Document::new();
	for character in 0..characters {
		let path = format!("c/{character:02}/max/{character:02}bod1.max");
		let tex_path = format!("c/{character:02}/tex/{character:02}bod1.max");

		let mut clump = Clump::new(&path, format!("{character:02}bod1"));
		let mut parent = None;
		for bone in 0..bone_count.max(1) {
			let mut coord = Coord::new(&path, format!("bone{bone:03}"));
			coord.position = [0.0, 10.0, 0.0];
			parent = Some(clump.add_coord(coord, parent));
		}

		let mut extras = Vec::with_capacity(model_count * 2);
		let mut group = ModelGroup::default();
		for index in 0..model_count {
			let texture_name = format!("tex{index:02}");
			extras.push(Chunk::Texture(Texture::from_nut(&tex_path, &texture_name, generate_nut(64, 64)?)?));

			let mut material = Material::new(&path, format!("mat{index:02}"));
			material.format = 0x07;
			material.floats = vec![1.0, 1.0, 1.0];
			material.texture_groups.push(TextureGroup {
				flag: 0,
				textures: vec![ChunkKey::new(tags::TEXTURE, &tex_path, &texture_name)],
			});

			let mut model = Model::new(&path, format!("model{index:02}"));
			model.coord_index = (index % bone_count.max(1)) as u32;
			model.nud = generate_nud(2, vertex_count);
			model.materials = vec![material.key()];
			group.models.push(Some(model.key()));
			clump.add_model(model);
			extras.push(Chunk::Material(material));
		}
		clump.model_groups.push(group);

		let page = document.add_clump_page(clump);
		for chunk in extras {
			document.pages_mut()[page].push(chunk);
		}
	}
	Ok(document)
}
