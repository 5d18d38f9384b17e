//! Resolves clump ownership once every chunk of a page is decoded.
//!
//! A decoded clump only knows the keys of its coords and models. Linking
//! copies the coord transforms and model payloads from the page into the
//! clump, then drops the claimed chunks from the page's top level. Anything
//! that cannot be resolved is repaired and reported as a warning:
//!
//! - a missing coord keeps the identity transform;
//! - a missing model keeps its slot as a key only, see [`Clump::unlinked_models`];
//! - a group slot naming a model outside the clump's model list becomes empty;
//! - a model coord index outside the arena becomes 0.

use std::collections::{HashMap, HashSet};

use super::registry::DecodeContext;
use crate::file::WarningKind;
use crate::file::nucc::{Chunk, ChunkKey, Clump, Coord, Model};

/// Links every clump of a page
pub(crate) fn link_page(chunks: Vec<Chunk>, ctx: &mut DecodeContext<'_>) -> Vec<Chunk> {
	let mut coords: HashMap<ChunkKey, (usize, Coord)> = HashMap::new();
	let mut models: HashMap<ChunkKey, (usize, Model)> = HashMap::new();
	let mut rest: Vec<(usize, Chunk)> = Vec::with_capacity(chunks.len());

	for (index, chunk) in chunks.into_iter().enumerate() {
		match chunk {
			Chunk::Coord(coord) if !coords.contains_key(&coord.key()) => {
				coords.insert(coord.key(), (index, coord));
			}
			Chunk::Model(model) if !models.contains_key(&model.key()) => {
				models.insert(model.key(), (index, model));
			}
			other => rest.push((index, other)),
		}
	}

	let mut claimed = HashSet::new();
	for (_, chunk) in &mut rest {
		if let Chunk::Clump(clump) = chunk {
			ctx.set_current(Some(clump.key()));
			link_clump(clump, &coords, &models, &mut claimed, ctx);
		}
	}
	ctx.set_current(None);

	let unclaimed_coords = coords
		.into_iter()
		.filter(|(key, _)| !claimed.contains(key))
		.map(|(_, (index, coord))| (index, Chunk::Coord(coord)));
	let unclaimed_models = models
		.into_iter()
		.filter(|(key, _)| !claimed.contains(key))
		.map(|(_, (index, model))| (index, Chunk::Model(model)));
	rest.extend(unclaimed_coords);
	rest.extend(unclaimed_models);
	rest.sort_by_key(|(index, _)| *index);

	log::debug!("page {}: linked {} chunks into clumps", ctx.page(), claimed.len());
	rest.into_iter().map(|(_, chunk)| chunk).collect()
}

fn link_clump(
	clump: &mut Clump,
	coords: &HashMap<ChunkKey, (usize, Coord)>,
	models: &HashMap<ChunkKey, (usize, Model)>,
	claimed: &mut HashSet<ChunkKey>,
	ctx: &mut DecodeContext<'_>,
) {
	for coord in &mut clump.coords {
		let key = coord.key();
		match coords.get(&key) {
			Some((_, source)) => {
				coord.copy_transform(source);
				claimed.insert(key);
			}
			None => ctx.warn(WarningKind::UnresolvedReference, format!("coord {key} is not on the page")),
		}
	}

	let coord_count = clump.coords.len();
	let slots = clump.model_keys();
	clump.models.clear();
	clump.unlinked_models.clear();
	for (slot, key) in slots.into_iter().enumerate() {
		let Some((_, source)) = models.get(&key) else {
			if !key.is_null() {
				ctx.warn(WarningKind::UnresolvedReference, format!("model {key} is not a decoded model on the page"));
			}
			clump.unlinked_models.push((slot, key));
			continue;
		};
		let mut model = source.clone();
		if model.coord_index as usize >= coord_count && model.coord_index != 0 {
			ctx.warn(
				WarningKind::UnresolvedReference,
				format!("model {key} uses coord {} of {coord_count}, reset to 0", model.coord_index),
			);
			model.coord_index = 0;
		}
		if model.clump.is_none() {
			model.clump = Some(clump.key());
		}
		claimed.insert(key);
		clump.models.push(model);
	}

	let owned: HashSet<ChunkKey> = clump.model_keys().into_iter().collect();
	for (group_index, group) in clump.model_groups.iter_mut().enumerate() {
		for slot in &mut group.models {
			if let Some(key) = slot.as_ref().filter(|key| !key.is_null() && !owned.contains(*key)) {
				ctx.warn(
					WarningKind::UnresolvedReference,
					format!("model group {group_index} names {key}, which the clump does not own"),
				);
				*slot = None;
			}
		}
	}
}
