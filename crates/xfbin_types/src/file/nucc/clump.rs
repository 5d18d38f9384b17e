//! `nuccChunkClump`: a skeleton plus the models attached to it.
//!
//! ```text
//! u32            field00
//! u16            coord count
//! u8, u8         coord flags
//! i16 x n        parent arena index per coord (-1 = root)
//! u32 x n        coord map index per coord
//! u16            model count
//! u8, u8         model flags
//! u32            unknown
//! u32 x m        model map index per model
//! -- repeated until the end of the payload --
//! u16            group model count
//! u8, u8         group flags
//! u32            unknown
//! i32 x k        model map index per slot (-1 = empty slot)
//! ```

use serde::{Deserialize, Serialize};

use super::{ChunkKey, Coord, Model, constants};
use crate::file::binary::{ByteReader, ByteWriter};
use crate::file::xfbin::{DecodeContext, EncodeContext, RawChunk};
use crate::file::{FileType, WarningKind, XfbinError};

/// An ordered subset of a clump's models
///
/// Empty slots are meaningful and must be preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelGroup {
	/// First flag byte
	pub flag0: u8,
	/// Second flag byte
	pub flag1: u8,
	/// Unknown value
	pub unk: u32,
	/// Model slots, `None` for an empty slot and [`ChunkKey::null`] for an
	/// index that did not resolve
	pub models: Vec<Option<ChunkKey>>,
}

/// A skeleton with its models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clump {
	/// Virtual path
	pub path: String,
	/// Clump name
	pub name: String,
	/// Unknown header value
	pub field00: u32,
	/// First coord flag byte
	pub coord_flag0: u8,
	/// Second coord flag byte
	pub coord_flag1: u8,
	/// First model flag byte
	pub model_flag0: u8,
	/// Second model flag byte
	pub model_flag1: u8,
	/// Unknown value after the model flags
	pub model_unk: u32,
	/// Skeleton arena, parents and children are indices into this list
	pub coords: Vec<Coord>,
	/// Models attached to the skeleton, in order
	pub models: Vec<Model>,
	/// Model slots whose chunk could not be linked, as `(slot, key)`
	///
	/// `slot` is the position in the full model list, see [`Clump::model_keys`].
	/// A key that could not be resolved at all is [`ChunkKey::null`].
	#[serde(default)]
	pub unlinked_models: Vec<(usize, ChunkKey)>,
	/// Model groups
	pub model_groups: Vec<ModelGroup>,
	/// Version field of the record header
	#[serde(default = "super::default_version")]
	pub version: u16,
}

impl Clump {
	/// Creates an empty clump
	pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			name: name.into(),
			field00: 0,
			coord_flag0: 0,
			coord_flag1: 0,
			model_flag0: 0,
			model_flag1: 0,
			model_unk: 0,
			coords: Vec::new(),
			models: Vec::new(),
			unlinked_models: Vec::new(),
			model_groups: Vec::new(),
			version: constants::CHUNK_VERSION,
		}
	}

	/// Identity of this clump
	pub fn key(&self) -> ChunkKey {
		ChunkKey::new(constants::CLUMP, &self.path, &self.name)
	}

	/// Appends a coord under `parent` and returns its arena index
	pub fn add_coord(&mut self, mut coord: Coord, parent: Option<usize>) -> usize {
		let index = self.coords.len();
		let parent = parent.filter(|&p| p < index);
		coord.parent = parent;
		coord.children.clear();
		self.coords.push(coord);
		if let Some(p) = parent {
			self.coords[p].children.push(index);
		}
		index
	}

	/// Appends a model and points its clump reference at this clump
	pub fn add_model(&mut self, mut model: Model) {
		model.clump = Some(self.key());
		self.models.push(model);
	}

	/// Arena indices of the nodes without a parent
	pub fn root_coords(&self) -> impl Iterator<Item = usize> + '_ {
		self.coords.iter().enumerate().filter(|(_, c)| c.parent.is_none()).map(|(i, _)| i)
	}

	/// Finds a coord by name
	pub fn coord_index(&self, name: &str) -> Option<usize> {
		self.coords.iter().position(|c| c.name == name)
	}

	/// Finds a model by key
	pub fn model(&self, key: &ChunkKey) -> Option<&Model> {
		self.models.iter().find(|m| &m.key() == key)
	}

	/// Keys of the full model list, linked and unlinked, in slot order
	pub fn model_keys(&self) -> Vec<ChunkKey> {
		let mut keys: Vec<ChunkKey> = self.models.iter().map(Model::key).collect();
		for (slot, key) in &self.unlinked_models {
			keys.insert((*slot).min(keys.len()), key.clone());
		}
		keys
	}

	/// Recomputes every `children` list from the `parent` links
	pub fn rebuild_children(&mut self) {
		for coord in &mut self.coords {
			coord.children.clear();
		}
		for index in 0..self.coords.len() {
			if let Some(parent) = self.coords[index].parent {
				self.coords[parent].children.push(index);
			}
		}
	}

	/// Every key referenced from the clump payload
	pub fn references(&self) -> Vec<ChunkKey> {
		let mut keys: Vec<ChunkKey> = self.coords.iter().map(Coord::key).collect();
		keys.extend(self.model_keys().into_iter().filter(|k| !k.is_null()));
		for group in &self.model_groups {
			keys.extend(group.models.iter().flatten().cloned());
		}
		keys
	}

	/// Decodes the payload
	///
	/// Coords and models come back as placeholders carrying only their keys;
	/// the page linker fills them in from the coord and model chunks of the
	/// same page.
	pub(crate) fn decode(raw: &RawChunk<'_>, ctx: &mut DecodeContext<'_>) -> Result<Self, XfbinError> {
		let mut r = ByteReader::new(raw.data, FileType::Clump);
		let mut clump = Clump::new(&raw.key.path, &raw.key.name);
		clump.version = raw.version;

		clump.field00 = r.u32()?;
		let coord_count = r.u16()? as usize;
		clump.coord_flag0 = r.u8()?;
		clump.coord_flag1 = r.u8()?;

		let mut parents = Vec::with_capacity(coord_count);
		for _ in 0..coord_count {
			parents.push(r.i16()?);
		}
		for i in 0..coord_count {
			let local = r.u32()?;
			let coord = match ctx.resolve(FileType::Clump, local) {
				Ok(key) => Coord::new(&key.path, &key.name),
				Err(err) => {
					ctx.warn_error(&err);
					Coord::new(&clump.path, format!("coord_{i}"))
				}
			};
			clump.coords.push(coord);
		}
		for (i, &parent) in parents.iter().enumerate() {
			clump.coords[i].parent = match parent {
				-1 => None,
				p if (p as usize) < coord_count && p >= 0 => Some(p as usize),
				p => {
					ctx.warn(
						WarningKind::UnresolvedReference,
						format!("coord {i} has parent {p} outside {coord_count} coords"),
					);
					None
				}
			};
		}
		clump.rebuild_children();

		let model_count = r.u16()? as usize;
		clump.model_flag0 = r.u8()?;
		clump.model_flag1 = r.u8()?;
		clump.model_unk = r.u32()?;
		for slot in 0..model_count {
			let local = r.u32()?;
			match ctx.resolve_or_warn(FileType::Clump, local) {
				Some(key) => clump.models.push(Model::new(&key.path, &key.name)),
				None => clump.unlinked_models.push((slot, ChunkKey::null())),
			}
		}

		while r.remaining() > 0 {
			let count = r.u16()? as usize;
			let mut group = ModelGroup {
				flag0: r.u8()?,
				flag1: r.u8()?,
				unk: r.u32()?,
				models: Vec::with_capacity(count),
			};
			for _ in 0..count {
				let slot = match r.i32()? {
					-1 => None,
					index => Some(
						u32::try_from(index)
							.ok()
							.and_then(|local| ctx.resolve_or_warn(FileType::Clump, local))
							.unwrap_or_else(ChunkKey::null),
					),
				};
				group.models.push(slot);
			}
			clump.model_groups.push(group);
		}

		Ok(clump)
	}

	pub(crate) fn encode(&self, ctx: &EncodeContext<'_>) -> Result<Vec<u8>, XfbinError> {
		let coord_count = u16::try_from(self.coords.len())
			.map_err(|_| XfbinError::invalid_data(FileType::Clump, "too many coords"))?;
		let model_keys = self.model_keys();
		let model_count = u16::try_from(model_keys.len())
			.map_err(|_| XfbinError::invalid_data(FileType::Clump, "too many models"))?;

		let mut w = ByteWriter::new();
		w.u32(self.field00);
		w.u16(coord_count);
		w.u8(self.coord_flag0);
		w.u8(self.coord_flag1);
		for coord in &self.coords {
			let parent = match coord.parent {
				Some(p) if p < self.coords.len() => p as i16,
				_ => -1,
			};
			w.i16(parent);
		}
		for coord in &self.coords {
			w.u32(ctx.index_of(FileType::Clump, &coord.key())?);
		}

		w.u16(model_count);
		w.u8(self.model_flag0);
		w.u8(self.model_flag1);
		w.u32(self.model_unk);
		for key in &model_keys {
			w.u32(ctx.index_of_optional(FileType::Clump, Some(key))?);
		}

		for group in &self.model_groups {
			let count = u16::try_from(group.models.len())
				.map_err(|_| XfbinError::invalid_data(FileType::Clump, "too many models in group"))?;
			w.u16(count);
			w.u8(group.flag0);
			w.u8(group.flag1);
			w.u32(group.unk);
			for slot in &group.models {
				let index = match slot {
					Some(key) => ctx.index_of_optional(FileType::Clump, Some(key))? as i32,
					None => -1,
				};
				w.i32(index);
			}
		}

		Ok(w.into_inner())
	}
}
