//! NUD decoding.

use super::constants::{
	FACE_FLAG_TRIANGLE_LIST, HEADER_SIZE, MAGIC, MAX_MATERIALS, MAX_UV_CHANNELS, STRIP_RESTART,
};
use super::{BoneType, ColorType, Mesh, MeshGroup, Nud, NudMaterial, Vertex, VertexType};
use crate::file::binary::ByteReader;
use crate::file::{FileType, XfbinError};

/// Absolute offsets of the data sections
#[derive(Debug, Clone, Copy)]
struct Sections {
	poly: usize,
	vert: usize,
	vert_add: usize,
	names: usize,
}

/// Mesh header fields needed after all headers are read
#[derive(Debug)]
struct MeshHeader {
	poly_offset: usize,
	vert_offset: usize,
	vert_add_offset: usize,
	vertex_count: usize,
	vertex_type: u8,
	uv_type: u8,
	material_offsets: [u32; MAX_MATERIALS],
	index_count: usize,
	face_size: u8,
	face_flag: u8,
}

impl Nud {
	/// Parses a NUD from bytes
	pub fn from_bytes(data: &[u8]) -> Result<Self, XfbinError> {
		let mut r = ByteReader::new(data, FileType::Nud);
		let magic: [u8; 4] = r.array()?;
		if magic != MAGIC {
			return Err(XfbinError::invalid_magic(FileType::Nud, &MAGIC, &magic));
		}

		let _file_size = r.u32()?;
		let _version = r.u16()?;
		let group_count = r.u16()? as usize;
		let unk = r.u16()?;
		let bone_count = r.u16()?;

		let poly = HEADER_SIZE + r.u32()? as usize;
		let vert = poly + r.u32()? as usize;
		let vert_add = vert + r.u32()? as usize;
		let names = vert_add + r.u32()? as usize;
		let sections = Sections {
			poly,
			vert,
			vert_add,
			names,
		};
		let bounding_sphere = r.f32_array()?;

		let mut groups = Vec::with_capacity(group_count);
		let mut mesh_counts = Vec::with_capacity(group_count);
		for _ in 0..group_count {
			let bounding_sphere = r.f32_array()?;
			let name_offset = r.u32()? as usize;
			let mut group = MeshGroup::new(r.cstring_at(sections.names + name_offset)?);
			group.bounding_sphere = bounding_sphere;
			group.unk = r.u16()?;
			group.bone_flags = r.u16()?;
			group.single_bind = r.i16()?;
			mesh_counts.push(r.u16()? as usize);
			group.position = r.u32()?;
			groups.push(group);
		}

		let mesh_total: usize = mesh_counts.iter().sum();
		if mesh_total > r.remaining() / HEADER_SIZE {
			return Err(XfbinError::truncated(FileType::Nud, r.position(), mesh_total * HEADER_SIZE, r.remaining()));
		}
		let mut headers = Vec::with_capacity(mesh_total);
		for _ in 0..mesh_total {
			headers.push(read_mesh_header(&mut r)?);
		}

		let mut headers = headers.into_iter();
		for (group, &count) in groups.iter_mut().zip(&mesh_counts) {
			for header in headers.by_ref().take(count) {
				group.meshes.push(read_mesh(&r, &header, sections)?);
			}
		}

		Ok(Nud {
			bounding_sphere,
			unk,
			bone_count,
			mesh_groups: groups,
		})
	}
}

fn read_mesh_header(r: &mut ByteReader<'_>) -> Result<MeshHeader, XfbinError> {
	let start = r.position();
	let header = MeshHeader {
		poly_offset: r.u32()? as usize,
		vert_offset: r.u32()? as usize,
		vert_add_offset: r.u32()? as usize,
		vertex_count: r.u16()? as usize,
		vertex_type: r.u8()?,
		uv_type: r.u8()?,
		material_offsets: [r.u32()?, r.u32()?, r.u32()?, r.u32()?],
		index_count: r.u16()? as usize,
		face_size: r.u8()?,
		face_flag: r.u8()?,
	};
	r.seek(start + HEADER_SIZE)?;
	Ok(header)
}

fn read_mesh(r: &ByteReader<'_>, header: &MeshHeader, sections: Sections) -> Result<Mesh, XfbinError> {
	let vertex_type = VertexType::try_from(header.vertex_type & 0x0F)?;
	let bone_type = BoneType::try_from(header.vertex_type & 0xF0)?;
	let color_type = ColorType::try_from(header.uv_type & 0x0F)?;
	let uv_count = header.uv_type >> 4;
	if uv_count > MAX_UV_CHANNELS {
		return Err(XfbinError::invalid_data(FileType::Nud, format!("{uv_count} UV channels")));
	}

	let mut mesh = Mesh {
		vertex_type,
		bone_type,
		color_type,
		uv_count,
		face_size: header.face_size,
		face_flag: header.face_flag,
		vertices: vec![Vertex::default(); header.vertex_count],
		faces: Vec::new(),
		materials: Vec::new(),
	};

	let mut vr = r.clone();
	vr.seek(sections.vert + header.vert_offset)?;
	if bone_type == BoneType::None {
		for vertex in &mut mesh.vertices {
			read_position_block(&mut vr, vertex_type, vertex)?;
			read_color_uv(&mut vr, color_type, uv_count, vertex)?;
		}
	} else {
		for vertex in &mut mesh.vertices {
			read_color_uv(&mut vr, color_type, uv_count, vertex)?;
		}
		let mut ar = r.clone();
		ar.seek(sections.vert_add + header.vert_add_offset)?;
		for vertex in &mut mesh.vertices {
			read_position_block(&mut ar, vertex_type, vertex)?;
			read_bones(&mut ar, bone_type, vertex)?;
		}
	}

	let mut pr = r.clone();
	pr.seek(sections.poly + header.poly_offset)?;
	let indices = (0..header.index_count).map(|_| pr.u16()).collect::<Result<Vec<_>, _>>()?;
	mesh.faces = if header.face_flag & FACE_FLAG_TRIANGLE_LIST != 0 {
		list_to_faces(&indices)
	} else {
		strip_to_faces(&indices)
	};

	for &offset in header.material_offsets.iter().filter(|&&o| o != 0) {
		let mut mr = r.clone();
		mr.seek(offset as usize)?;
		mesh.materials.push(NudMaterial::read(&mut mr, sections.names)?);
	}

	Ok(mesh)
}

fn read_position_block(r: &mut ByteReader<'_>, vertex_type: VertexType, v: &mut Vertex) -> Result<(), XfbinError> {
	v.position = r.f32_array()?;
	match vertex_type {
		VertexType::NoNormals => r.skip(4)?,
		VertexType::NormalsFloat => {
			r.skip(4)?;
			v.normal = r.f32_array()?;
			r.skip(4)?;
		}
		VertexType::NormalsTanBiTanFloat => {
			r.skip(4)?;
			v.normal = r.f32_array()?;
			r.skip(4)?;
			v.bitangent = r.f32_array()?;
			r.skip(4)?;
			v.tangent = r.f32_array()?;
		}
		VertexType::NormalsHalfFloat => {
			let [x, y, z, _] = r.f16_array()?;
			v.normal = [x, y, z];
		}
		VertexType::NormalsTanBiTanHalfFloat => {
			let [x, y, z, _] = r.f16_array()?;
			v.normal = [x, y, z];
			let [x, y, z, _] = r.f16_array()?;
			v.bitangent = [x, y, z];
			v.tangent = r.f16_array()?;
		}
	}
	Ok(())
}

fn read_bones(r: &mut ByteReader<'_>, bone_type: BoneType, v: &mut Vertex) -> Result<(), XfbinError> {
	match bone_type {
		BoneType::None => {}
		BoneType::Float => {
			for id in &mut v.bone_ids {
				*id = r.u32()?;
			}
			v.bone_weights = r.f32_array()?;
		}
		BoneType::HalfFloat => {
			for id in &mut v.bone_ids {
				*id = u32::from(r.u16()?);
			}
			v.bone_weights = r.f16_array()?;
		}
		BoneType::Byte => {
			for id in &mut v.bone_ids {
				*id = u32::from(r.u8()?);
			}
			for weight in &mut v.bone_weights {
				*weight = f32::from(r.u8()?) / 255.0;
			}
		}
	}
	Ok(())
}

fn read_color_uv(r: &mut ByteReader<'_>, color_type: ColorType, uv_count: u8, v: &mut Vertex) -> Result<(), XfbinError> {
	v.color = match color_type {
		ColorType::None => None,
		ColorType::Byte => {
			let rgba: [u8; 4] = r.array()?;
			Some(rgba.map(|c| f32::from(c) / 255.0))
		}
		ColorType::HalfFloat => Some(r.f16_array()?),
	};
	v.uv = (0..uv_count).map(|_| r.f16_array()).collect::<Result<_, _>>()?;
	Ok(())
}

/// Splits a triangle list into faces, ignoring a trailing partial triangle
pub(super) fn list_to_faces(indices: &[u16]) -> Vec<[u32; 3]> {
	indices
		.chunks_exact(3)
		.map(|tri| [u32::from(tri[0]), u32::from(tri[1]), u32::from(tri[2])])
		.collect()
}

/// Expands triangle strips with restart markers into faces
///
/// Winding alternates along a strip; degenerate triangles are skipped.
pub(super) fn strip_to_faces(indices: &[u16]) -> Vec<[u32; 3]> {
	let mut faces = Vec::new();
	for strip in indices.split(|&i| i == STRIP_RESTART) {
		for (n, window) in strip.windows(3).enumerate() {
			let (a, b, c) = (u32::from(window[0]), u32::from(window[1]), u32::from(window[2]));
			if a == b || b == c || a == c {
				continue;
			}
			faces.push(if n % 2 == 0 { [a, b, c] } else { [a, c, b] });
		}
	}
	faces
}
