//! `nuccChunkDynamics`: spring bone physics for a clump.
//!
//! ```text
//! u16                    spring group count
//! u16                    collision sphere count
//! u32                    clump map index
//! -- per spring group (0x14) --
//! f32 x 4                bounciness, elasticity, stiffness, movement
//! u16                    coord index
//! u16                    bone count
//! -- per collision sphere (0x20) --
//! f32 x 3                offset
//! f32 x 3                scale
//! u16                    coord index
//! u16                    attach to spring groups (0/1)
//! u16                    attached group count
//! u16                    padding
//! -- per spring group --
//! u16 x bone count       bone flags
//! -- per attached sphere --
//! u16 x attached count   spring group indices
//! ```

use serde::{Deserialize, Serialize};

use super::{ChunkKey, constants};
use crate::file::binary::{ByteReader, ByteWriter};
use crate::file::xfbin::{DecodeContext, EncodeContext, RawChunk};
use crate::file::{FileType, XfbinError};

/// A chain of spring bones starting at one coord
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpringGroup {
	/// Bounciness
	pub bounciness: f32,
	/// Elasticity
	pub elasticity: f32,
	/// Stiffness
	pub stiffness: f32,
	/// Movement
	pub movement: f32,
	/// Coord index of the chain root inside the clump
	pub coord_index: u16,
	/// One flag per bone in the chain; its length is the chain's bone count
	pub flags: Vec<u16>,
}

/// A collision sphere attached to a coord
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionSphere {
	/// Offset from the coord
	pub offset: [f32; 3],
	/// Scale
	pub scale: [f32; 3],
	/// Coord index inside the clump
	pub coord_index: u16,
	/// Spring groups this sphere affects; `Some` when attached, possibly empty
	pub attached_groups: Option<Vec<u16>>,
}

impl CollisionSphere {
	/// Returns `true` if the sphere is attached to spring groups
	pub fn is_attached(&self) -> bool {
		self.attached_groups.is_some()
	}
}

/// Physics metadata for a clump
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dynamics {
	/// Virtual path
	pub path: String,
	/// Chunk name
	pub name: String,
	/// Clump the coord indices refer to
	pub clump: ChunkKey,
	/// Spring groups
	pub spring_groups: Vec<SpringGroup>,
	/// Collision spheres
	pub collision_spheres: Vec<CollisionSphere>,
	/// Version field of the record header
	#[serde(default = "super::default_version")]
	pub version: u16,
}

impl Dynamics {
	/// Creates an empty dynamics chunk for `clump`
	pub fn new(path: impl Into<String>, name: impl Into<String>, clump: ChunkKey) -> Self {
		Self {
			path: path.into(),
			name: name.into(),
			clump,
			spring_groups: Vec::new(),
			collision_spheres: Vec::new(),
			version: constants::CHUNK_VERSION,
		}
	}

	/// Identity of this chunk
	pub fn key(&self) -> ChunkKey {
		ChunkKey::new(constants::DYNAMICS, &self.path, &self.name)
	}

	pub(crate) fn decode(raw: &RawChunk<'_>, ctx: &mut DecodeContext<'_>) -> Result<Self, XfbinError> {
		let mut r = ByteReader::new(raw.data, FileType::Dynamics);
		let group_count = r.u16()? as usize;
		let sphere_count = r.u16()? as usize;
		let clump = ctx.resolve_or_warn(FileType::Dynamics, r.u32()?).unwrap_or_else(ChunkKey::null);

		let mut bone_counts = Vec::with_capacity(group_count);
		let mut spring_groups = Vec::with_capacity(group_count);
		for _ in 0..group_count {
			spring_groups.push(SpringGroup {
				bounciness: r.f32()?,
				elasticity: r.f32()?,
				stiffness: r.f32()?,
				movement: r.f32()?,
				coord_index: r.u16()?,
				flags: Vec::new(),
			});
			bone_counts.push(r.u16()? as usize);
		}

		let mut attached_counts = Vec::with_capacity(sphere_count);
		let mut collision_spheres = Vec::with_capacity(sphere_count);
		for _ in 0..sphere_count {
			let offset = r.f32_array()?;
			let scale = r.f32_array()?;
			let coord_index = r.u16()?;
			let attached = r.u16()? != 0;
			let count = r.u16()? as usize;
			r.skip(2)?;
			collision_spheres.push(CollisionSphere {
				offset,
				scale,
				coord_index,
				attached_groups: attached.then(Vec::new),
			});
			attached_counts.push(count);
		}

		for (group, &count) in spring_groups.iter_mut().zip(&bone_counts) {
			group.flags = (0..count).map(|_| r.u16()).collect::<Result<_, _>>()?;
		}

		for (sphere, &count) in collision_spheres.iter_mut().zip(&attached_counts) {
			if let Some(groups) = sphere.attached_groups.as_mut() {
				for _ in 0..count {
					groups.push(r.u16()?);
				}
			}
		}

		Ok(Self {
			path: raw.key.path.clone(),
			name: raw.key.name.clone(),
			clump,
			spring_groups,
			collision_spheres,
			version: raw.version,
		})
	}

	pub(crate) fn encode(&self, ctx: &EncodeContext<'_>) -> Result<Vec<u8>, XfbinError> {
		let too_many = |what: &str| XfbinError::invalid_data(FileType::Dynamics, format!("too many {what}"));
		let group_count = u16::try_from(self.spring_groups.len()).map_err(|_| too_many("spring groups"))?;
		let sphere_count = u16::try_from(self.collision_spheres.len()).map_err(|_| too_many("spheres"))?;

		let mut w = ByteWriter::new();
		w.u16(group_count);
		w.u16(sphere_count);
		w.u32(ctx.index_of_optional(FileType::Dynamics, Some(&self.clump))?);

		for group in &self.spring_groups {
			w.f32(group.bounciness);
			w.f32(group.elasticity);
			w.f32(group.stiffness);
			w.f32(group.movement);
			w.u16(group.coord_index);
			w.u16(u16::try_from(group.flags.len()).map_err(|_| too_many("bones"))?);
		}

		for sphere in &self.collision_spheres {
			w.f32_slice(&sphere.offset);
			w.f32_slice(&sphere.scale);
			w.u16(sphere.coord_index);
			w.u16(u16::from(sphere.is_attached()));
			let attached = sphere.attached_groups.as_ref().map_or(0, Vec::len);
			w.u16(u16::try_from(attached).map_err(|_| too_many("attached groups"))?);
			w.u16(0);
		}

		for group in &self.spring_groups {
			for &flag in &group.flags {
				w.u16(flag);
			}
		}

		for groups in self.collision_spheres.iter().filter_map(|s| s.attached_groups.as_ref()) {
			for &index in groups {
				w.u16(index);
			}
		}

		Ok(w.into_inner())
	}
}
