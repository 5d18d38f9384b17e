//! The decoded document model: pages of chunks.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::chunk_table::ChunkReference;
use crate::file::DecodeWarning;
use crate::file::nucc::{Chunk, ChunkKey, ChunkView, Clump};

/// A bundle of chunks that are read and replaced together
///
/// Typically one clump with the materials and textures it needs, or a
/// standalone texture or dynamics chunk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
	chunks: Vec<Chunk>,
	references: Vec<ChunkReference>,
	/// Page-local map list seen on decode, reused on encode so that an
	/// unmodified page keeps its map indices
	#[serde(skip)]
	pub(crate) map_order: Vec<ChunkKey>,
}

impl Page {
	/// Creates an empty page
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a page holding `chunks`
	pub fn with_chunks(chunks: Vec<Chunk>) -> Self {
		Self {
			chunks,
			..Self::default()
		}
	}

	/// Top-level chunks in page order
	///
	/// Coords and models owned by a clump are not listed here; see [`Page::views`].
	pub fn chunks(&self) -> &[Chunk] {
		&self.chunks
	}

	/// Mutable access to the top-level chunks
	pub fn chunks_mut(&mut self) -> &mut Vec<Chunk> {
		&mut self.chunks
	}

	/// Appends a chunk
	pub fn push(&mut self, chunk: impl Into<Chunk>) {
		self.chunks.push(chunk.into());
	}

	/// Named chunk aliases of this page
	pub fn references(&self) -> &[ChunkReference] {
		&self.references
	}

	/// Adds a named chunk alias
	pub fn add_reference(&mut self, name: impl Into<String>, chunk: ChunkKey) {
		self.references.push(ChunkReference {
			name: name.into(),
			chunk,
		});
	}

	/// Every chunk in write order, owned children included
	///
	/// A clump is followed by its coords and then its models. Each key is
	/// listed once; null placeholders are left out.
	pub fn views(&self) -> Vec<ChunkView<'_>> {
		let mut seen = HashSet::new();
		let mut views = Vec::with_capacity(self.chunks.len());
		for chunk in &self.chunks {
			let Some(view) = chunk.view() else {
				continue;
			};
			push_unique(&mut seen, &mut views, view);
			if let Chunk::Clump(clump) = chunk {
				for coord in &clump.coords {
					push_unique(&mut seen, &mut views, ChunkView::Coord(coord));
				}
				for model in &clump.models {
					push_unique(&mut seen, &mut views, ChunkView::Model(model));
				}
			}
		}
		views
	}

	/// Every chunk with the given type tag, owned children included
	pub fn get_chunks_by_type(&self, chunk_type: &str) -> Vec<ChunkView<'_>> {
		self.views().into_iter().filter(|v| v.chunk_type() == chunk_type).collect()
	}

	/// Finds a chunk by key, owned children included
	pub fn find(&self, key: &ChunkKey) -> Option<ChunkView<'_>> {
		self.views().into_iter().find(|v| &v.key() == key)
	}

	/// Returns `true` if any chunk, owned children included, has this path
	pub fn contains_path(&self, path: &str) -> bool {
		self.views().iter().any(|v| v.key().path == path)
	}

	/// The first clump of the page
	pub fn clump(&self) -> Option<&Clump> {
		self.chunks.iter().find_map(|c| match c {
			Chunk::Clump(clump) => Some(clump),
			_ => None,
		})
	}

	/// Mutable access to the first clump of the page
	pub fn clump_mut(&mut self) -> Option<&mut Clump> {
		self.chunks.iter_mut().find_map(|c| match c {
			Chunk::Clump(clump) => Some(clump),
			_ => None,
		})
	}

	/// Replaces the top-level chunk with the same key, or appends it
	///
	/// Returns the chunk that was replaced.
	pub fn replace_chunk(&mut self, chunk: impl Into<Chunk>) -> Option<Chunk> {
		let chunk = chunk.into();
		let key = chunk.key();
		match self.chunks.iter_mut().find(|c| c.key() == key) {
			Some(slot) => Some(std::mem::replace(slot, chunk)),
			None => {
				self.chunks.push(chunk);
				None
			}
		}
	}

	/// Removes the top-level chunk with this key
	pub fn remove_chunk(&mut self, key: &ChunkKey) -> Option<Chunk> {
		let index = self.chunks.iter().position(|c| &c.key() == key)?;
		Some(self.chunks.remove(index))
	}
}

impl PartialEq for Page {
	fn eq(&self, other: &Self) -> bool {
		self.chunks == other.chunks && self.references == other.references
	}
}

fn push_unique<'a>(seen: &mut HashSet<ChunkKey>, views: &mut Vec<ChunkView<'a>>, view: ChunkView<'a>) {
	if seen.insert(view.key()) {
		views.push(view);
	} else {
		log::debug!("skipping duplicate chunk {}", view.key());
	}
}

/// A decoded XFBIN file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
	pages: Vec<Page>,
	#[serde(skip)]
	warnings: Vec<DecodeWarning>,
}

impl Document {
	/// Creates an empty document
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn from_parts(pages: Vec<Page>, warnings: Vec<DecodeWarning>) -> Self {
		Self {
			pages,
			warnings,
		}
	}

	/// Pages in file order
	pub fn pages(&self) -> &[Page] {
		&self.pages
	}

	/// Mutable access to the pages
	pub fn pages_mut(&mut self) -> &mut [Page] {
		&mut self.pages
	}

	/// Non-fatal problems found while decoding
	pub fn warnings(&self) -> &[DecodeWarning] {
		&self.warnings
	}

	/// Every chunk with the given type tag, in document order
	pub fn get_chunks_by_type(&self, chunk_type: &str) -> Vec<ChunkView<'_>> {
		self.pages.iter().flat_map(|p| p.get_chunks_by_type(chunk_type)).collect()
	}

	/// Index of the first page holding a chunk with this path
	pub fn get_chunk_page_index(&self, path: &str) -> Option<usize> {
		self.pages.iter().position(|p| p.contains_path(path))
	}

	/// The first page holding a chunk with this path
	pub fn get_chunk_page(&self, path: &str) -> Option<&Page> {
		self.get_chunk_page_index(path).map(|i| &self.pages[i])
	}

	/// Mutable variant of [`Document::get_chunk_page`]
	pub fn get_chunk_page_mut(&mut self, path: &str) -> Option<&mut Page> {
		let index = self.get_chunk_page_index(path)?;
		self.pages.get_mut(index)
	}

	/// Finds a chunk anywhere in the document
	pub fn find_chunk(&self, key: &ChunkKey) -> Option<ChunkView<'_>> {
		self.pages.iter().find_map(|p| p.find(key))
	}

	/// Appends a page and returns its index
	pub fn add_page(&mut self, page: Page) -> usize {
		self.pages.push(page);
		self.pages.len() - 1
	}

	/// Appends a page holding one clump
	///
	/// Pages with the same path are not merged; remove or replace them first.
	pub fn add_clump_page(&mut self, clump: Clump) -> usize {
		self.add_page(Page::with_chunks(vec![Chunk::Clump(clump)]))
	}

	/// Appends a page holding one chunk
	pub fn add_chunk_page(&mut self, chunk: impl Into<Chunk>) -> usize {
		self.add_page(Page::with_chunks(vec![chunk.into()]))
	}

	/// Removes a page
	pub fn remove_page(&mut self, index: usize) -> Option<Page> {
		(index < self.pages.len()).then(|| self.pages.remove(index))
	}

	/// Replaces a page, returning the old one
	pub fn replace_page(&mut self, index: usize, page: Page) -> Option<Page> {
		self.pages.get_mut(index).map(|slot| std::mem::replace(slot, page))
	}

	/// Number of chunks, owned children included
	pub fn chunk_count(&self) -> usize {
		self.pages.iter().map(|p| p.views().len()).sum()
	}
}
