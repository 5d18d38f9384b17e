//! Unit tests for the NUD codec and mesh builder

use super::constants::{MAX_FACES, MAX_VERTICES};
use super::reader::{list_to_faces, strip_to_faces};
use super::*;

fn vertex(position: [f32; 3], uv: [f32; 2]) -> Vertex {
	Vertex {
		position,
		normal: [0.0, 0.0, 1.0],
		uv: vec![uv],
		color: Some([1.0, 0.0, 0.0, 1.0]),
		..Vertex::default()
	}
}

fn quad_mesh() -> Mesh {
	Mesh {
		vertices: vec![
			vertex([0.0, 0.0, 0.0], [0.0, 0.0]),
			vertex([1.0, 0.0, 0.0], [1.0, 0.0]),
			vertex([0.0, 1.0, 0.0], [0.0, 1.0]),
			vertex([1.0, 1.0, 0.0], [1.0, 1.0]),
		],
		faces: vec![[0, 1, 2], [1, 3, 2]],
		..Mesh::default()
	}
}

fn material() -> NudMaterial {
	NudMaterial {
		flags: 0x9461_1E41,
		src_factor: 1,
		cull_mode: 0x0405,
		textures: vec![NudMaterialTexture {
			hash: 0x2A,
			wrap_s: 1,
			wrap_t: 1,
			min_filter: 2,
			..Default::default()
		}],
		properties: vec![
			NudMaterialProperty {
				name: "NU_colorSamplerUV".to_string(),
				values: vec![1.0, 1.0, 0.0, 0.0],
			},
			NudMaterialProperty {
				name: "NU_materialHash".to_string(),
				values: vec![0.5],
			},
		],
		..Default::default()
	}
}

fn nud_with(meshes: Vec<Mesh>) -> Nud {
	let mut group = MeshGroup::new("body");
	group.bounding_sphere = [0.5, 0.5, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];
	group.meshes = meshes;
	Nud {
		bounding_sphere: [0.5, 0.5, 0.0, 1.0],
		bone_count: 2,
		mesh_groups: vec![group],
		..Nud::new()
	}
}

#[test]
fn test_empty_round_trip() {
	let nud = Nud::new();
	let bytes = nud.to_bytes().unwrap();
	assert_eq!(&bytes[0..4], b"NDP3");
	assert_eq!(bytes.len(), constants::HEADER_SIZE);
	assert_eq!(Nud::from_bytes(&bytes).unwrap(), nud);
}

#[test]
fn test_unskinned_round_trip() {
	let mut mesh = quad_mesh();
	mesh.materials = vec![material()];
	let nud = nud_with(vec![mesh]);

	let bytes = nud.to_bytes().unwrap();
	assert_eq!(bytes.len() % constants::ALIGNMENT, 0);
	assert_eq!(u32::from_be_bytes(bytes[4..8].try_into().unwrap()) as usize, bytes.len());

	let decoded = Nud::from_bytes(&bytes).unwrap();
	assert_eq!(decoded, nud);
	assert_eq!(decoded.to_bytes().unwrap(), bytes);
}

#[test]
fn test_skinned_half_round_trip() {
	let mut mesh = quad_mesh();
	mesh.vertex_type = VertexType::NormalsTanBiTanHalfFloat;
	mesh.bone_type = BoneType::HalfFloat;
	mesh.color_type = ColorType::HalfFloat;
	mesh.uv_count = 2;
	for (i, v) in mesh.vertices.iter_mut().enumerate() {
		v.tangent = [1.0, 0.0, 0.0, -1.0];
		v.bitangent = derive_bitangent(v.normal, v.tangent);
		v.uv.push([0.25, 0.75]);
		v.color = Some([0.5, 0.25, 1.0, 1.0]);
		v.bone_ids = [i as u32, 1, 0, 0];
		v.bone_weights = [0.75, 0.25, 0.0, 0.0];
	}
	let nud = nud_with(vec![mesh]);

	let decoded = Nud::from_bytes(&nud.to_bytes().unwrap()).unwrap();
	assert_eq!(decoded, nud);
}

#[test]
fn test_byte_bones_and_colors() {
	let mut mesh = quad_mesh();
	mesh.bone_type = BoneType::Byte;
	for v in &mut mesh.vertices {
		v.bone_ids = [3, 2, 0, 0];
		v.bone_weights = [0.6, 0.4, 0.0, 0.0];
		v.color = Some([0.5, 0.5, 0.5, 1.0]);
	}
	let decoded = Nud::from_bytes(&nud_with(vec![mesh]).to_bytes().unwrap()).unwrap();
	let v = &decoded.mesh_groups[0].meshes[0].vertices[0];

	assert_eq!(v.bone_ids, [3, 2, 0, 0]);
	assert!((v.bone_weights[0] - 0.6).abs() < 1.0 / 255.0);
	assert!((v.bone_weights[1] - 0.4).abs() < 1.0 / 255.0);
	assert_eq!(v.color.map(|c| (c[0] * 255.0).round()), Some(128.0));
}

#[test]
fn test_byte_bone_index_overflow() {
	let mut mesh = quad_mesh();
	mesh.bone_type = BoneType::Byte;
	mesh.vertices[0].bone_ids = [300, 0, 0, 0];
	mesh.vertices[0].bone_weights = [1.0, 0.0, 0.0, 0.0];
	assert!(matches!(nud_with(vec![mesh]).to_bytes(), Err(XfbinError::InvalidData { .. })));
}

#[test]
fn test_weights_normalized_on_encode() {
	let mut mesh = quad_mesh();
	mesh.bone_type = BoneType::Float;
	mesh.vertices[0].bone_ids = [3, 0, 0, 0];
	mesh.vertices[0].bone_weights = [0.0; 4];
	mesh.vertices[1].bone_ids = [1, 2, 3, 4];
	mesh.vertices[1].bone_weights = [0.5; 4];
	mesh.vertices[2].bone_ids = [2, 6, 0, 0];
	mesh.vertices[2].bone_weights = [0.2, 0.6, 0.0, 0.0];
	mesh.vertices[3].bone_ids = [5, 1, 0, 0];
	mesh.vertices[3].bone_weights = [0.7, 0.3, 0.0, 0.0];

	let decoded = Nud::from_bytes(&nud_with(vec![mesh]).to_bytes().unwrap()).unwrap();
	let vertices = &decoded.mesh_groups[0].meshes[0].vertices;
	assert_eq!(vertices[0].bone_ids, [0; 4]);
	assert_eq!(vertices[0].bone_weights, [1.0, 0.0, 0.0, 0.0]);
	assert_eq!(vertices[1].bone_weights, [0.25; 4]);
	assert_eq!(vertices[2].bone_ids, [6, 2, 0, 0]);
	assert!((vertices[2].bone_weights.iter().sum::<f32>() - 1.0).abs() < 1e-6);
	// already normalized weights are written as they are
	assert_eq!(vertices[3].bone_ids, [5, 1, 0, 0]);
	assert_eq!(vertices[3].bone_weights, [0.7, 0.3, 0.0, 0.0]);
}

#[test]
fn test_bitangent_derived_on_encode() {
	let mut mesh = quad_mesh();
	mesh.vertex_type = VertexType::NormalsTanBiTanFloat;
	for v in &mut mesh.vertices {
		v.tangent = [1.0, 0.0, 0.0, 1.0];
		v.bitangent = [9.0, 9.0, 9.0];
	}
	let decoded = Nud::from_bytes(&nud_with(vec![mesh]).to_bytes().unwrap()).unwrap();
	for v in &decoded.mesh_groups[0].meshes[0].vertices {
		assert_eq!(v.bitangent, [0.0, 1.0, 0.0]);
	}
}

#[test]
fn test_encode_rejects_small_mesh() {
	let mut mesh = quad_mesh();
	mesh.vertices.truncate(1);
	mesh.faces.clear();
	assert!(matches!(mesh.check_limits(), Err(XfbinError::TooFewVertices(1))));
	assert!(matches!(nud_with(vec![mesh]).to_bytes(), Err(XfbinError::TooFewVertices(1))));
}

#[test]
fn test_material_without_properties() {
	let mut bare = material();
	bare.properties.clear();
	let mut mesh = quad_mesh();
	mesh.materials = vec![bare, material()];

	let decoded = Nud::from_bytes(&nud_with(vec![mesh.clone()]).to_bytes().unwrap()).unwrap();
	assert_eq!(decoded.mesh_groups[0].meshes[0].materials, mesh.materials);
}

#[test]
fn test_too_many_materials() {
	let mut mesh = quad_mesh();
	mesh.materials = vec![material(); 5];
	let result = nud_with(vec![mesh]).to_bytes();
	assert!(matches!(result, Err(XfbinError::SizeLimitExceeded { what: "material", .. })));
}

#[test]
fn test_multiple_groups_and_meshes() {
	let mut second = MeshGroup::new("head");
	second.single_bind = 4;
	second.meshes = vec![quad_mesh(), quad_mesh()];
	let mut nud = nud_with(vec![quad_mesh()]);
	nud.mesh_groups.push(second);

	let decoded = Nud::from_bytes(&nud.to_bytes().unwrap()).unwrap();
	assert_eq!(decoded.mesh_count(), 3);
	assert_eq!(decoded.mesh_groups[1].name, "head");
	assert_eq!(decoded.mesh_groups[1].single_bind, 4);
	assert_eq!(decoded, nud);
}

#[test]
fn test_strip_encoding_round_trip() {
	let mut mesh = quad_mesh();
	mesh.face_flag = 0;
	let nud = nud_with(vec![mesh]);

	let decoded = Nud::from_bytes(&nud.to_bytes().unwrap()).unwrap();
	assert_eq!(decoded.mesh_groups[0].meshes[0].faces, vec![[0, 1, 2], [1, 3, 2]]);
}

#[test]
fn test_strip_to_faces() {
	assert_eq!(strip_to_faces(&[0, 1, 2, 3]), vec![[0, 1, 2], [1, 3, 2]]);
	assert_eq!(strip_to_faces(&[0, 1, 2, 0xFFFF, 3, 4, 5]), vec![[0, 1, 2], [3, 4, 5]]);
	assert!(strip_to_faces(&[0, 1, 1, 2]).is_empty());
	assert!(strip_to_faces(&[]).is_empty());
}

#[test]
fn test_list_to_faces_ignores_partial() {
	assert_eq!(list_to_faces(&[0, 1, 2, 3, 4]), vec![[0, 1, 2]]);
}

#[test]
fn test_vertex_limit_boundary() {
	let mut mesh = Mesh {
		vertices: vec![Vertex::default(); MAX_VERTICES],
		..Mesh::default()
	};
	assert!(mesh.check_limits().is_ok());

	mesh.vertices.push(Vertex::default());
	let result = nud_with(vec![mesh]).to_bytes();
	assert!(matches!(result, Err(XfbinError::SizeLimitExceeded { what: "vertex", .. })));
}

#[test]
fn test_face_limit_boundary() {
	let mut mesh = quad_mesh();
	mesh.faces = vec![[0, 1, 2]; MAX_FACES];
	assert!(mesh.check_limits().is_ok());

	mesh.faces.push([0, 1, 2]);
	assert!(matches!(mesh.check_limits(), Err(XfbinError::SizeLimitExceeded { what: "face", .. })));
}

#[test]
fn test_face_index_out_of_range() {
	let mut mesh = quad_mesh();
	mesh.faces.push([0, 1, 9]);
	let result = nud_with(vec![mesh]).to_bytes();
	assert!(matches!(result, Err(XfbinError::UnresolvedReference { index: 9, len: 4, .. })));
}

#[test]
fn test_invalid_magic() {
	let mut bytes = Nud::new().to_bytes().unwrap();
	bytes[0] = b'X';
	assert!(matches!(Nud::from_bytes(&bytes), Err(XfbinError::InvalidMagic { .. })));
}

#[test]
fn test_truncated() {
	let bytes = nud_with(vec![quad_mesh()]).to_bytes().unwrap();
	assert!(matches!(Nud::from_bytes(&bytes[..0x40]), Err(XfbinError::Truncated { .. })));
}

#[test]
fn test_mesh_count_past_end() {
	let mut bytes = nud_with(vec![quad_mesh()]).to_bytes().unwrap();
	// mesh count of the first group header
	let count = constants::HEADER_SIZE + 42;
	bytes[count..count + 2].copy_from_slice(&u16::MAX.to_be_bytes());
	assert!(matches!(Nud::from_bytes(&bytes), Err(XfbinError::Truncated { .. })));
}

#[test]
fn test_type_bytes() {
	let mesh = Mesh {
		vertex_type: VertexType::NormalsTanBiTanFloat,
		bone_type: BoneType::Byte,
		color_type: ColorType::HalfFloat,
		uv_count: 3,
		..Mesh::default()
	};
	assert_eq!(mesh.vertex_type_byte(), 0x43);
	assert_eq!(mesh.uv_type_byte(), 0x34);
	assert!(VertexType::try_from(2).is_err());
	assert!(BoneType::try_from(0x30).is_err());
}

// ============================================================================
// Builder
// ============================================================================

fn corner(position: [f32; 3], uv: [f32; 2]) -> CornerAttributes {
	CornerAttributes {
		position,
		normal: [0.0, 0.0, 1.0],
		tangent: [1.0, 0.0, 0.0, 1.0],
		uv: vec![uv],
		color: None,
		influences: vec![(1, 1.0)],
	}
}

fn build_quad() -> MeshBuilder {
	let a = corner([0.0, 0.0, 0.0], [0.0, 0.0]);
	let b = corner([1.0, 0.0, 0.0], [1.0, 0.0]);
	let c = corner([0.0, 1.0, 0.0], [0.0, 1.0]);
	let d = corner([1.0, 1.0, 0.0], [1.0, 1.0]);

	let mut builder = MeshBuilder::new(VertexType::NormalsFloat, BoneType::Float, ColorType::None, 1);
	builder.add_triangle([&a, &b, &c]);
	builder.add_triangle([&b, &d, &c]);
	builder
}

#[test]
fn test_builder_dedups_shared_corners() {
	let mesh = build_quad().build().unwrap();
	assert_eq!(mesh.vertices.len(), 4);
	assert_eq!(mesh.faces, vec![[0, 1, 2], [1, 3, 2]]);
}

#[test]
fn test_builder_splits_on_any_attribute() {
	let mut builder = build_quad();
	// Same position as corner 0, different UV seam
	let seam = corner([0.0, 0.0, 0.0], [0.5, 0.0]);
	let index = builder.add_corner(&seam);
	assert_eq!(index, 4);
	assert_eq!(builder.add_corner(&seam), 4);
	assert_eq!(builder.vertex_count(), 5);
}

#[test]
fn test_builder_merges_signed_zeros() {
	let mut builder = MeshBuilder::new(VertexType::NormalsFloat, BoneType::None, ColorType::None, 1);
	let a = corner([0.0, 0.0, 0.0], [0.0, 0.0]);
	let b = corner([-0.0, 0.0, -0.0], [0.0, -0.0]);
	assert_eq!(builder.add_corner(&a), builder.add_corner(&b));
	assert_eq!(builder.vertex_count(), 1);
}

#[test]
fn test_builder_is_deterministic() {
	let first = build_quad().build().unwrap();
	let second = build_quad().build().unwrap();
	assert_eq!(first, second);
}

#[test]
fn test_builder_drops_degenerate_faces() {
	let mut builder = build_quad();
	assert!(!builder.add_face([0, 0, 1]));
	assert!(!builder.add_face([0, 1, 7]));

	let a = corner([0.0, 0.0, 0.0], [0.0, 0.0]);
	let b = corner([1.0, 0.0, 0.0], [1.0, 0.0]);
	assert!(!builder.add_triangle([&a, &a, &b]));
	assert_eq!(builder.face_count(), 2);
}

#[test]
fn test_builder_too_few_vertices() {
	let mut builder = MeshBuilder::new(VertexType::NoNormals, BoneType::None, ColorType::None, 0);
	builder.add_corner(&corner([0.0; 3], [0.0; 2]));
	builder.add_corner(&corner([1.0; 3], [0.0; 2]));
	assert!(matches!(builder.build(), Err(XfbinError::TooFewVertices(2))));
}

#[test]
fn test_builder_settings() {
	let mesh = build_quad().with_face_flag(0).with_materials(vec![material()]).build().unwrap();
	assert_eq!(mesh.face_flag, 0);
	assert_eq!(mesh.materials.len(), 1);
	assert_eq!(mesh.bone_type, BoneType::Float);
}

#[test]
fn test_built_mesh_encodes() {
	let mesh = build_quad().build().unwrap();
	let nud = nud_with(vec![mesh.clone()]);
	let decoded = Nud::from_bytes(&nud.to_bytes().unwrap()).unwrap();
	// Float normals drop tangents on disk
	assert_eq!(decoded.mesh_groups[0].meshes[0].faces, mesh.faces);
	assert_eq!(decoded.mesh_groups[0].meshes[0].vertices[3].position, [1.0, 1.0, 0.0]);
	assert_eq!(decoded.mesh_groups[0].meshes[0].vertices[3].bone_ids, [1, 0, 0, 0]);
}

#[test]
fn test_normalize_weights() {
	let sum = |w: [f32; 4]| w.iter().sum::<f32>();

	assert_eq!(normalize_weights(&[]), ([0; 4], [1.0, 0.0, 0.0, 0.0]));
	assert_eq!(normalize_weights(&[(5, 0.0), (6, 0.0)]), ([0; 4], [1.0, 0.0, 0.0, 0.0]));

	let (ids, weights) = normalize_weights(&[(7, 2.0)]);
	assert_eq!(ids, [7, 0, 0, 0]);
	assert_eq!(weights, [1.0, 0.0, 0.0, 0.0]);

	let (ids, weights) = normalize_weights(&[(1, 0.1), (2, 0.2), (3, 0.3)]);
	assert_eq!(ids, [3, 2, 1, 0]);
	assert!((sum(weights) - 1.0).abs() < 1e-6);
	assert_eq!(weights[3], 0.0);

	let (ids, weights) = normalize_weights(&[(1, 0.1), (2, 0.5), (3, 0.2), (4, 0.15), (5, 0.05)]);
	assert_eq!(ids, [2, 3, 4, 1]);
	assert!((sum(weights) - 1.0).abs() < 1e-6);
}

#[test]
fn test_derive_bitangent() {
	assert_eq!(derive_bitangent([0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0]), [0.0, 1.0, 0.0]);
	assert_eq!(derive_bitangent([0.0, 0.0, 1.0], [1.0, 0.0, 0.0, -1.0]), [-0.0, -1.0, -0.0]);
}
