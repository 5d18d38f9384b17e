//! Mesh assembly from per-corner attributes.
//!
//! Host meshes store attributes per face corner. [`MeshBuilder`] collapses
//! corners with identical attributes into one vertex, in first-seen order,
//! so the same input sequence always yields the same vertex and face lists.

use std::collections::HashMap;

use super::constants::{MAX_FACES, MAX_VERTICES};
use super::{BoneType, ColorType, Mesh, NudMaterial, Vertex, VertexType};
use crate::file::XfbinError;

/// Attributes of one face corner
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CornerAttributes {
	/// Position
	pub position: [f32; 3],
	/// Normal
	pub normal: [f32; 3],
	/// Tangent with handedness in `w`
	pub tangent: [f32; 4],
	/// UV channels
	pub uv: Vec<[f32; 2]>,
	/// RGBA color, 0..1
	pub color: Option<[f32; 4]>,
	/// Bone influences as `(bone index, weight)`, any count
	pub influences: Vec<(u32, f32)>,
}

impl CornerAttributes {
	/// Converts the corner into a vertex with normalised weights and a derived bitangent
	pub fn to_vertex(&self) -> Vertex {
		let (bone_ids, bone_weights) = normalize_weights(&self.influences);
		Vertex {
			position: self.position,
			normal: self.normal,
			tangent: self.tangent,
			bitangent: derive_bitangent(self.normal, self.tangent),
			uv: self.uv.clone(),
			color: self.color,
			bone_ids,
			bone_weights,
		}
	}
}

/// Keeps the four strongest influences and scales them to sum to 1
///
/// Unused slots are zero. When no influence carries weight the result is
/// bone 0 at full weight.
pub fn normalize_weights(influences: &[(u32, f32)]) -> ([u32; 4], [f32; 4]) {
	let mut sorted: Vec<(u32, f32)> = influences.iter().copied().filter(|&(_, w)| w > 0.0).collect();
	sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
	sorted.truncate(4);

	let sum: f32 = sorted.iter().map(|&(_, w)| w).sum();
	if !sum.is_normal() {
		return ([0; 4], [1.0, 0.0, 0.0, 0.0]);
	}

	let mut ids = [0u32; 4];
	let mut weights = [0f32; 4];
	for (slot, &(id, weight)) in sorted.iter().enumerate() {
		ids[slot] = id;
		weights[slot] = weight / sum;
	}
	(ids, weights)
}

/// `cross(normal, tangent.xyz) * tangent.w`
pub fn derive_bitangent(normal: [f32; 3], tangent: [f32; 4]) -> [f32; 3] {
	let [nx, ny, nz] = normal;
	let [tx, ty, tz, sign] = tangent;
	[(ny * tz - nz * ty) * sign, (nz * tx - nx * tz) * sign, (nx * ty - ny * tx) * sign]
}

/// Bit pattern of a float, with both zeros mapping to the same key
fn key_bits(f: &f32) -> u32 {
	if *f == 0.0 { 0 } else { f.to_bits() }
}

/// Bit pattern of every encoded attribute, used as the dedup key
fn vertex_key(v: &Vertex) -> Vec<u32> {
	let mut key = Vec::with_capacity(32);
	key.extend(v.position.iter().map(key_bits));
	key.extend(v.normal.iter().map(key_bits));
	key.extend(v.tangent.iter().map(key_bits));
	key.push(v.uv.len() as u32);
	key.extend(v.uv.iter().flatten().map(key_bits));
	match v.color {
		Some(color) => {
			key.push(1);
			key.extend(color.iter().map(key_bits));
		}
		None => key.push(0),
	}
	key.extend(v.bone_ids);
	key.extend(v.bone_weights.iter().map(key_bits));
	key
}

/// Builds a [`Mesh`] from corners and triangles
///
/// # Examples
///
/// ```
/// use xfbin_types::file::nud::{BoneType, ColorType, CornerAttributes, MeshBuilder, VertexType};
///
/// let mut builder = MeshBuilder::new(VertexType::NormalsFloat, BoneType::None, ColorType::None, 1);
/// let corner = |x: f32, y: f32| CornerAttributes {
///     position: [x, y, 0.0],
///     uv: vec![[x, y]],
///     ..Default::default()
/// };
/// builder.add_triangle([&corner(0.0, 0.0), &corner(1.0, 0.0), &corner(0.0, 1.0)]);
/// builder.add_triangle([&corner(1.0, 0.0), &corner(1.0, 1.0), &corner(0.0, 1.0)]);
///
/// let mesh = builder.build().unwrap();
/// assert_eq!(mesh.vertices.len(), 4);
/// assert_eq!(mesh.faces, vec![[0, 1, 2], [1, 3, 2]]);
/// ```
#[derive(Debug, Clone)]
pub struct MeshBuilder {
	mesh: Mesh,
	lookup: HashMap<Vec<u32>, u32>,
}

impl MeshBuilder {
	/// Creates a builder that will emit the given encodings
	pub fn new(vertex_type: VertexType, bone_type: BoneType, color_type: ColorType, uv_count: u8) -> Self {
		Self {
			mesh: Mesh {
				vertex_type,
				bone_type,
				color_type,
				uv_count,
				..Mesh::default()
			},
			lookup: HashMap::new(),
		}
	}

	/// Sets the mesh materials
	pub fn with_materials(mut self, materials: Vec<NudMaterial>) -> Self {
		self.mesh.materials = materials;
		self
	}

	/// Sets the face flag byte
	pub fn with_face_flag(mut self, face_flag: u8) -> Self {
		self.mesh.face_flag = face_flag;
		self
	}

	/// Returns the index of the vertex for this corner, adding it if unseen
	pub fn add_corner(&mut self, corner: &CornerAttributes) -> u32 {
		let vertex = corner.to_vertex();
		let key = vertex_key(&vertex);
		if let Some(&index) = self.lookup.get(&key) {
			return index;
		}
		let index = self.mesh.vertices.len() as u32;
		self.mesh.vertices.push(vertex);
		self.lookup.insert(key, index);
		index
	}

	/// Adds a face by vertex index
	///
	/// Faces that repeat an index or point past the vertex list are dropped
	/// and `false` is returned.
	pub fn add_face(&mut self, face: [u32; 3]) -> bool {
		let [a, b, c] = face;
		let count = self.mesh.vertices.len() as u32;
		if a == b || b == c || a == c || face.iter().any(|&i| i >= count) {
			log::trace!("dropping degenerate face {face:?}");
			return false;
		}
		self.mesh.faces.push(face);
		true
	}

	/// Adds the three corners of a triangle and the face joining them
	pub fn add_triangle(&mut self, corners: [&CornerAttributes; 3]) -> bool {
		let face = corners.map(|corner| self.add_corner(corner));
		self.add_face(face)
	}

	/// Number of distinct vertices so far
	pub fn vertex_count(&self) -> usize {
		self.mesh.vertices.len()
	}

	/// Number of accepted faces so far
	pub fn face_count(&self) -> usize {
		self.mesh.faces.len()
	}

	/// Finishes the mesh
	///
	/// Fails with [`XfbinError::TooFewVertices`] below three vertices and
	/// with [`XfbinError::SizeLimitExceeded`] above the format limits.
	pub fn build(self) -> Result<Mesh, XfbinError> {
		self.mesh.check_limits()?;
		log::debug!(
			"built mesh: {} vertices, {} faces (limits {MAX_VERTICES}/{MAX_FACES})",
			self.mesh.vertices.len(),
			self.mesh.faces.len()
		);
		Ok(self.mesh)
	}
}
