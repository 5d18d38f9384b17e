//! NUD (NDP3) mesh container support.
//!
//! A NUD is embedded in every model chunk. It holds mesh groups, each with a
//! list of meshes, and every mesh selects its own vertex, bone and UV/color
//! encodings.
//!
//! # File Structure
//!
//! ```text
//! +--------------------------+ 0x00
//! | Header (0x30)            |
//! +--------------------------+ 0x30
//! | Group headers (0x30 each)|
//! | Mesh headers  (0x30 each)|
//! | Material blocks          |
//! +--------------------------+ poly section start (aligned 16)
//! | Index buffers            |
//! +--------------------------+
//! | Vertex buffers           |  color/UV, or everything if unskinned
//! +--------------------------+
//! | Vertex-add buffers       |  position/normal/bones of skinned meshes
//! +--------------------------+
//! | Names                    |
//! +--------------------------+
//! ```
//!
//! Every section, and every mesh's slice of a section, is padded to 16 bytes.

mod builder;
mod material;
mod reader;
mod writer;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

pub use builder::{CornerAttributes, MeshBuilder, derive_bitangent, normalize_weights};
pub use material::{NudMaterial, NudMaterialProperty, NudMaterialTexture};

use crate::file::{FileType, XfbinError};

/// NUD constants
pub mod constants {
	/// Magic bytes
	pub const MAGIC: [u8; 4] = *b"NDP3";

	/// Format version
	pub const VERSION: u16 = 0x0200;

	/// Size of the file header and of each group or mesh header
	pub const HEADER_SIZE: usize = 0x30;

	/// Size of a material block header
	pub const MATERIAL_HEADER_SIZE: usize = 0x20;

	/// Size of one material texture entry
	pub const MATERIAL_TEXTURE_SIZE: usize = 0x18;

	/// Size of a material property before its values
	pub const MATERIAL_PROPERTY_HEADER_SIZE: usize = 0x10;

	/// Section alignment
	pub const ALIGNMENT: usize = 0x10;

	/// Largest vertex count a mesh may have
	pub const MAX_VERTICES: usize = 32767;

	/// Largest face count a mesh may have
	pub const MAX_FACES: usize = 16383;

	/// Bone weights whose sum is this close to 1 are written unchanged
	pub const WEIGHT_SUM_TOLERANCE: f32 = 1.0 / 128.0;

	/// Largest number of materials per mesh
	pub const MAX_MATERIALS: usize = 4;

	/// Largest number of UV channels per vertex
	pub const MAX_UV_CHANNELS: u8 = 4;

	/// Face flag bit selecting a triangle list instead of strips
	pub const FACE_FLAG_TRIANGLE_LIST: u8 = 0x40;

	/// Index that restarts a triangle strip
	pub const STRIP_RESTART: u16 = 0xFFFF;
}

/// Normal/tangent encoding, the low nibble of the vertex type byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VertexType {
	/// Position only
	NoNormals,
	/// Float normal
	#[default]
	NormalsFloat,
	/// Float normal, bitangent and tangent
	NormalsTanBiTanFloat,
	/// Half normal
	NormalsHalfFloat,
	/// Half normal, bitangent and tangent
	NormalsTanBiTanHalfFloat,
}

impl VertexType {
	/// Returns `true` if the encoding stores tangent and bitangent
	pub fn has_tangents(self) -> bool {
		matches!(self, VertexType::NormalsTanBiTanFloat | VertexType::NormalsTanBiTanHalfFloat)
	}
}

impl TryFrom<u8> for VertexType {
	type Error = XfbinError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(VertexType::NoNormals),
			1 => Ok(VertexType::NormalsFloat),
			3 => Ok(VertexType::NormalsTanBiTanFloat),
			6 => Ok(VertexType::NormalsHalfFloat),
			7 => Ok(VertexType::NormalsTanBiTanHalfFloat),
			other => Err(XfbinError::invalid_data(FileType::Nud, format!("unknown vertex type {other}"))),
		}
	}
}

impl From<VertexType> for u8 {
	fn from(value: VertexType) -> Self {
		match value {
			VertexType::NoNormals => 0,
			VertexType::NormalsFloat => 1,
			VertexType::NormalsTanBiTanFloat => 3,
			VertexType::NormalsHalfFloat => 6,
			VertexType::NormalsTanBiTanHalfFloat => 7,
		}
	}
}

/// Bone index/weight encoding, the high nibble of the vertex type byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BoneType {
	/// Not skinned
	#[default]
	None,
	/// u32 indices, f32 weights
	Float,
	/// u16 indices, half weights
	HalfFloat,
	/// u8 indices, u8 weights scaled by 255
	Byte,
}

impl TryFrom<u8> for BoneType {
	type Error = XfbinError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0x00 => Ok(BoneType::None),
			0x10 => Ok(BoneType::Float),
			0x20 => Ok(BoneType::HalfFloat),
			0x40 => Ok(BoneType::Byte),
			other => Err(XfbinError::invalid_data(FileType::Nud, format!("unknown bone type {other:#04X}"))),
		}
	}
}

impl From<BoneType> for u8 {
	fn from(value: BoneType) -> Self {
		match value {
			BoneType::None => 0x00,
			BoneType::Float => 0x10,
			BoneType::HalfFloat => 0x20,
			BoneType::Byte => 0x40,
		}
	}
}

/// Vertex color encoding, the low nibble of the UV type byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorType {
	/// No color
	None,
	/// u8 RGBA
	#[default]
	Byte,
	/// Half RGBA
	HalfFloat,
}

impl TryFrom<u8> for ColorType {
	type Error = XfbinError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(ColorType::None),
			2 => Ok(ColorType::Byte),
			4 => Ok(ColorType::HalfFloat),
			other => Err(XfbinError::invalid_data(FileType::Nud, format!("unknown color type {other}"))),
		}
	}
}

impl From<ColorType> for u8 {
	fn from(value: ColorType) -> Self {
		match value {
			ColorType::None => 0,
			ColorType::Byte => 2,
			ColorType::HalfFloat => 4,
		}
	}
}

/// One vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
	/// Position in centimeters
	pub position: [f32; 3],
	/// Normal
	pub normal: [f32; 3],
	/// Tangent, `w` is the handedness used to derive the bitangent
	pub tangent: [f32; 4],
	/// Bitangent as read; the writer derives it from `normal` and `tangent`
	pub bitangent: [f32; 3],
	/// UV channels, up to four
	pub uv: Vec<[f32; 2]>,
	/// RGBA color normalised to 0..1
	pub color: Option<[f32; 4]>,
	/// Bone indices into the clump's coords
	pub bone_ids: [u32; 4],
	/// Bone weights, summing to 1
	pub bone_weights: [f32; 4],
}

impl Default for Vertex {
	fn default() -> Self {
		Self {
			position: [0.0; 3],
			normal: [0.0; 3],
			tangent: [0.0, 0.0, 0.0, 1.0],
			bitangent: [0.0; 3],
			uv: Vec::new(),
			color: None,
			bone_ids: [0; 4],
			bone_weights: [1.0, 0.0, 0.0, 0.0],
		}
	}
}

/// One mesh, drawn with up to four materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
	/// Normal/tangent encoding
	pub vertex_type: VertexType,
	/// Bone encoding
	pub bone_type: BoneType,
	/// Color encoding
	pub color_type: ColorType,
	/// Number of UV channels written per vertex
	pub uv_count: u8,
	/// Index size byte
	pub face_size: u8,
	/// Face flags, [`constants::FACE_FLAG_TRIANGLE_LIST`] selects a list over strips
	pub face_flag: u8,
	/// Vertices
	pub vertices: Vec<Vertex>,
	/// Triangles as vertex indices
	pub faces: Vec<[u32; 3]>,
	/// Render materials
	pub materials: Vec<NudMaterial>,
}

impl Default for Mesh {
	fn default() -> Self {
		Self {
			vertex_type: VertexType::default(),
			bone_type: BoneType::default(),
			color_type: ColorType::default(),
			uv_count: 1,
			face_size: 0x04,
			face_flag: constants::FACE_FLAG_TRIANGLE_LIST,
			vertices: Vec::new(),
			faces: Vec::new(),
			materials: Vec::new(),
		}
	}
}

impl Mesh {
	/// The vertex type byte: bone type in the high nibble, normal type in the low one
	pub fn vertex_type_byte(&self) -> u8 {
		u8::from(self.bone_type) | u8::from(self.vertex_type)
	}

	/// The UV type byte: UV count in the high nibble, color type in the low one
	pub fn uv_type_byte(&self) -> u8 {
		(self.uv_count << 4) | u8::from(self.color_type)
	}

	/// Returns `true` if faces are stored as a plain triangle list
	pub fn is_triangle_list(&self) -> bool {
		self.face_flag & constants::FACE_FLAG_TRIANGLE_LIST != 0
	}

	/// Checks the mesh against the vertex and face limits of the format
	///
	/// A mesh needs at least three vertices.
	pub fn check_limits(&self) -> Result<(), XfbinError> {
		if self.vertices.len() < 3 {
			return Err(XfbinError::TooFewVertices(self.vertices.len()));
		}
		if self.vertices.len() > constants::MAX_VERTICES {
			return Err(XfbinError::SizeLimitExceeded {
				what: "vertex",
				count: self.vertices.len(),
				limit: constants::MAX_VERTICES,
			});
		}
		if self.faces.len() > constants::MAX_FACES {
			return Err(XfbinError::SizeLimitExceeded {
				what: "face",
				count: self.faces.len(),
				limit: constants::MAX_FACES,
			});
		}
		Ok(())
	}
}

/// A named list of meshes sharing a bounding volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshGroup {
	/// Group name
	pub name: String,
	/// Bounding sphere (center, radius) followed by four unknown floats
	pub bounding_sphere: [f32; 8],
	/// Unknown header value
	pub unk: u16,
	/// Bone association flags
	pub bone_flags: u16,
	/// Coord index for single-bound groups, -1 otherwise
	pub single_bind: i16,
	/// Unknown header value
	pub position: u32,
	/// Meshes
	pub meshes: Vec<Mesh>,
}

impl MeshGroup {
	/// Creates an empty group
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			bounding_sphere: [0.0; 8],
			unk: 0,
			bone_flags: 0,
			single_bind: -1,
			position: 0,
			meshes: Vec::new(),
		}
	}
}

/// A decoded NUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nud {
	/// Bounding sphere (center, radius)
	pub bounding_sphere: [f32; 4],
	/// Unknown header value
	pub unk: u16,
	/// Bone count
	pub bone_count: u16,
	/// Mesh groups
	pub mesh_groups: Vec<MeshGroup>,
}

impl Default for Nud {
	fn default() -> Self {
		Self::new()
	}
}

impl Nud {
	/// Creates an empty NUD
	pub fn new() -> Self {
		Self {
			bounding_sphere: [0.0; 4],
			unk: 0,
			bone_count: 0,
			mesh_groups: Vec::new(),
		}
	}

	/// Iterates every mesh of every group
	pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
		self.mesh_groups.iter().flat_map(|g| g.meshes.iter())
	}

	/// Total number of meshes
	pub fn mesh_count(&self) -> usize {
		self.mesh_groups.iter().map(|g| g.meshes.len()).sum()
	}
}
