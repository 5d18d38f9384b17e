//! NUD encoding.
//!
//! Every offset is recomputed from the in-memory tree. The data sections are
//! laid out first so the header section can point into them.

use super::builder::{derive_bitangent, normalize_weights};
use super::constants::{
	ALIGNMENT, HEADER_SIZE, MAGIC, MAX_MATERIALS, MAX_UV_CHANNELS, STRIP_RESTART, VERSION, WEIGHT_SUM_TOLERANCE,
};
use super::{BoneType, ColorType, Mesh, Nud, Vertex, VertexType};
use crate::file::binary::{ByteWriter, align_up};
use crate::file::{FileType, XfbinError};

/// Where one mesh's data landed in each section
#[derive(Debug, Default, Clone, Copy)]
struct MeshSpans {
	poly: u32,
	vert: u32,
	vert_add: u32,
	index_count: u16,
}

impl Nud {
	/// Serializes the NUD
	///
	/// Fails with [`XfbinError::TooFewVertices`] if a mesh has fewer than
	/// three vertices and with [`XfbinError::SizeLimitExceeded`] if it has
	/// more vertices or faces than the format allows.
	pub fn to_bytes(&self) -> Result<Vec<u8>, XfbinError> {
		let group_count = u16::try_from(self.mesh_groups.len())
			.map_err(|_| XfbinError::invalid_data(FileType::Nud, "too many mesh groups"))?;

		let mut names = ByteWriter::new();
		let mut group_names = Vec::with_capacity(self.mesh_groups.len());
		for group in &self.mesh_groups {
			group_names.push(names.position() as u32);
			names.cstring(&group.name);
		}

		let mut poly = ByteWriter::new();
		let mut vert = ByteWriter::new();
		let mut vert_add = ByteWriter::new();
		let mut spans = Vec::with_capacity(self.mesh_count());
		let mut property_names: Vec<Vec<Vec<u32>>> = Vec::with_capacity(self.mesh_count());

		for mesh in self.meshes() {
			validate_mesh(mesh)?;

			let mut span = MeshSpans {
				poly: poly.position() as u32,
				vert: vert.position() as u32,
				vert_add: vert_add.position() as u32,
				..MeshSpans::default()
			};
			span.index_count = write_indices(&mut poly, mesh)?;
			poly.align(ALIGNMENT);

			write_vertices(&mut vert, &mut vert_add, mesh)?;
			vert.align(ALIGNMENT);
			vert_add.align(ALIGNMENT);
			spans.push(span);

			let mut mesh_names = Vec::with_capacity(mesh.materials.len());
			for material in &mesh.materials {
				let mut offsets = Vec::with_capacity(material.properties.len());
				for property in &material.properties {
					offsets.push(names.position() as u32);
					names.cstring(&property.name);
				}
				mesh_names.push(offsets);
			}
			property_names.push(mesh_names);
		}
		names.align(ALIGNMENT);

		let mesh_headers_end = HEADER_SIZE * (1 + self.mesh_groups.len() + spans.len());
		let materials_size: usize = self.meshes().flat_map(|m| m.materials.iter()).map(|m| m.encoded_size()).sum();
		let poly_start = align_up(mesh_headers_end + materials_size, ALIGNMENT);
		let file_size = poly_start + poly.position() + vert.position() + vert_add.position() + names.position();

		let mut w = ByteWriter::with_capacity(file_size);
		w.bytes(&MAGIC);
		w.u32(file_size as u32);
		w.u16(VERSION);
		w.u16(group_count);
		w.u16(self.unk);
		w.u16(self.bone_count);
		w.u32((poly_start - HEADER_SIZE) as u32);
		w.u32(poly.position() as u32);
		w.u32(vert.position() as u32);
		w.u32(vert_add.position() as u32);
		w.f32_slice(&self.bounding_sphere);

		for (group, &name_offset) in self.mesh_groups.iter().zip(&group_names) {
			let mesh_count = u16::try_from(group.meshes.len())
				.map_err(|_| XfbinError::invalid_data(FileType::Nud, "too many meshes in group"))?;
			w.f32_slice(&group.bounding_sphere);
			w.u32(name_offset);
			w.u16(group.unk);
			w.u16(group.bone_flags);
			w.i16(group.single_bind);
			w.u16(mesh_count);
			w.u32(group.position);
		}

		let mut material_offset = mesh_headers_end;
		for (mesh, span) in self.meshes().zip(&spans) {
			let header_start = w.position();
			w.u32(span.poly);
			w.u32(span.vert);
			w.u32(span.vert_add);
			w.u16(mesh.vertices.len() as u16);
			w.u8(mesh.vertex_type_byte());
			w.u8(mesh.uv_type_byte());
			for slot in 0..MAX_MATERIALS {
				match mesh.materials.get(slot) {
					Some(material) => {
						w.u32(material_offset as u32);
						material_offset += material.encoded_size();
					}
					None => w.u32(0),
				}
			}
			w.u16(span.index_count);
			w.u8(mesh.face_size);
			w.u8(mesh.face_flag);
			w.zeros(header_start + HEADER_SIZE - w.position());
		}

		for (mesh, offsets) in self.meshes().zip(&property_names) {
			for (material, names) in mesh.materials.iter().zip(offsets) {
				material.write(&mut w, names)?;
			}
		}
		w.align(ALIGNMENT);

		w.bytes(poly.as_slice());
		w.bytes(vert.as_slice());
		w.bytes(vert_add.as_slice());
		w.bytes(names.as_slice());

		Ok(w.into_inner())
	}
}

fn validate_mesh(mesh: &Mesh) -> Result<(), XfbinError> {
	mesh.check_limits()?;
	if mesh.materials.len() > MAX_MATERIALS {
		return Err(XfbinError::SizeLimitExceeded {
			what: "material",
			count: mesh.materials.len(),
			limit: MAX_MATERIALS,
		});
	}
	if mesh.uv_count > MAX_UV_CHANNELS {
		return Err(XfbinError::SizeLimitExceeded {
			what: "UV channel",
			count: mesh.uv_count as usize,
			limit: MAX_UV_CHANNELS as usize,
		});
	}
	let vertex_count = mesh.vertices.len() as u32;
	if let Some(&index) = mesh.faces.iter().flatten().find(|&&i| i >= vertex_count) {
		return Err(XfbinError::unresolved(FileType::Nud, index, mesh.vertices.len()));
	}
	Ok(())
}

/// Writes the index buffer and returns its entry count
fn write_indices(w: &mut ByteWriter, mesh: &Mesh) -> Result<u16, XfbinError> {
	let mut indices: Vec<u16> = Vec::with_capacity(mesh.faces.len() * 4);
	for (n, face) in mesh.faces.iter().enumerate() {
		if !mesh.is_triangle_list() && n > 0 {
			indices.push(STRIP_RESTART);
		}
		indices.extend(face.iter().map(|&i| i as u16));
	}
	let count = u16::try_from(indices.len())
		.map_err(|_| XfbinError::invalid_data(FileType::Nud, "index buffer too large"))?;
	for index in indices {
		w.u16(index);
	}
	Ok(count)
}

fn write_vertices(vert: &mut ByteWriter, vert_add: &mut ByteWriter, mesh: &Mesh) -> Result<(), XfbinError> {
	if mesh.bone_type == BoneType::None {
		for v in &mesh.vertices {
			write_position_block(vert, mesh.vertex_type, v);
			write_color_uv(vert, mesh.color_type, mesh.uv_count, v);
		}
	} else {
		for v in &mesh.vertices {
			write_color_uv(vert, mesh.color_type, mesh.uv_count, v);
		}
		for v in &mesh.vertices {
			write_position_block(vert_add, mesh.vertex_type, v);
			write_bones(vert_add, mesh.bone_type, v)?;
		}
	}
	Ok(())
}

fn write_position_block(w: &mut ByteWriter, vertex_type: VertexType, v: &Vertex) {
	w.f32_slice(&v.position);
	match vertex_type {
		VertexType::NoNormals => w.f32(1.0),
		VertexType::NormalsFloat => {
			w.f32(1.0);
			w.f32_slice(&v.normal);
			w.f32(1.0);
		}
		VertexType::NormalsTanBiTanFloat => {
			w.f32(1.0);
			w.f32_slice(&v.normal);
			w.f32(1.0);
			w.f32_slice(&derive_bitangent(v.normal, v.tangent));
			w.f32(1.0);
			w.f32_slice(&v.tangent);
		}
		VertexType::NormalsHalfFloat => {
			w.f16_slice(&v.normal);
			w.f16(1.0);
		}
		VertexType::NormalsTanBiTanHalfFloat => {
			w.f16_slice(&v.normal);
			w.f16(1.0);
			w.f16_slice(&derive_bitangent(v.normal, v.tangent));
			w.f16(1.0);
			w.f16_slice(&v.tangent);
		}
	}
}

/// Bone slots as written
///
/// Weights that already sum to 1 are kept as they are; anything else goes
/// through [`normalize_weights`].
fn encoded_weights(v: &Vertex) -> ([u32; 4], [f32; 4]) {
	let sum: f32 = v.bone_weights.iter().sum();
	if v.bone_weights.iter().all(|&w| w >= 0.0) && (sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE {
		return (v.bone_ids, v.bone_weights);
	}
	let influences: Vec<(u32, f32)> = v.bone_ids.iter().copied().zip(v.bone_weights).collect();
	normalize_weights(&influences)
}

fn write_bones(w: &mut ByteWriter, bone_type: BoneType, v: &Vertex) -> Result<(), XfbinError> {
	let out_of_range =
		|id: u32| XfbinError::invalid_data(FileType::Nud, format!("bone index {id} does not fit {bone_type:?}"));
	if bone_type == BoneType::None {
		return Ok(());
	}
	let (ids, weights) = encoded_weights(v);
	match bone_type {
		BoneType::None => {}
		BoneType::Float => {
			for id in ids {
				w.u32(id);
			}
			w.f32_slice(&weights);
		}
		BoneType::HalfFloat => {
			for id in ids {
				w.u16(u16::try_from(id).map_err(|_| out_of_range(id))?);
			}
			w.f16_slice(&weights);
		}
		BoneType::Byte => {
			for id in ids {
				w.u8(u8::try_from(id).map_err(|_| out_of_range(id))?);
			}
			for weight in weights {
				w.u8(unit_to_byte(weight));
			}
		}
	}
	Ok(())
}

fn write_color_uv(w: &mut ByteWriter, color_type: ColorType, uv_count: u8, v: &Vertex) {
	let color = v.color.unwrap_or([1.0; 4]);
	match color_type {
		ColorType::None => {}
		ColorType::Byte => {
			for c in color {
				w.u8(unit_to_byte(c));
			}
		}
		ColorType::HalfFloat => w.f16_slice(&color),
	}
	for channel in 0..uv_count as usize {
		let uv = v.uv.get(channel).copied().unwrap_or_default();
		w.f16_slice(&uv);
	}
}

fn unit_to_byte(value: f32) -> u8 {
	(value * 255.0).round().clamp(0.0, 255.0) as u8
}
