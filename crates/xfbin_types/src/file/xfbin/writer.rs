//! Document encoding.
//!
//! Payloads are encoded first, page by page, since only then is every key
//! they reference known. The chunk table is assembled from the page maps
//! afterwards and written in front of the body.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use super::chunk_table::ChunkTableBuilder;
use super::constants::{HEADER_SIZE, PAGE_PAYLOAD_SIZE, RECORD_HEADER_SIZE};
use super::document::{Document, Page};
use super::header::Header;
use super::registry::{ChunkRegistry, EncodeContext};
use crate::file::binary::ByteWriter;
use crate::file::nucc::{ChunkKey, ChunkView, constants};
use crate::file::{FileType, XfbinError};

/// Encodes a [`Document`] into XFBIN bytes
#[derive(Debug, Default)]
pub struct XfbinWriter {
	registry: ChunkRegistry,
}

impl XfbinWriter {
	/// Creates a writer with the given codecs
	pub fn new(registry: ChunkRegistry) -> Self {
		Self {
			registry,
		}
	}

	/// The codecs in use
	pub fn registry(&self) -> &ChunkRegistry {
		&self.registry
	}

	/// Encodes a document and writes it to `path`
	pub fn write_file(&self, document: &Document, path: impl AsRef<Path>) -> Result<(), XfbinError> {
		let data = self.write(document)?;
		std::fs::write(path, data)?;
		Ok(())
	}

	/// Encodes a document
	///
	/// The output is deterministic: the same document always produces the
	/// same bytes.
	pub fn write(&self, document: &Document) -> Result<Vec<u8>, XfbinError> {
		let mut table = ChunkTableBuilder::new();
		let mut body = ByteWriter::new();
		write_record(&mut body, 0, constants::CHUNK_VERSION, &[]);

		for (page_index, page) in document.pages().iter().enumerate() {
			let views = page.views();
			let keys = page_map(page, &views);
			let mut lookup = HashMap::with_capacity(keys.len());
			for (index, key) in keys.iter().enumerate() {
				lookup.entry(key.clone()).or_insert(index as u32);
			}
			let ctx = EncodeContext::new(&lookup);

			for view in &views {
				let payload = self.registry.encode(*view, &ctx)?;
				let local = ctx.index_of(FileType::Xfbin, &view.key())?;
				write_record(&mut body, local, view.version(), &payload);
			}

			table.push_page_map(&keys);
			for reference in page.references() {
				table.push_reference(reference);
			}

			let mut terminator = ByteWriter::with_capacity(PAGE_PAYLOAD_SIZE);
			terminator.u32(keys.len() as u32);
			terminator.u32(page.references().len() as u32);
			let local = ctx.index_of(FileType::Xfbin, &ChunkKey::page())?;
			write_record(&mut body, local, constants::CHUNK_VERSION, terminator.as_slice());

			log::debug!("page {page_index}: wrote {} chunks, {} map entries", views.len(), keys.len());
		}

		let table = table.to_bytes();
		let header = Header::new(table.len() as u32);
		let mut out = ByteWriter::with_capacity(table.len() + body.position() + HEADER_SIZE);
		header.write(&mut out);
		out.bytes(&table);
		out.bytes(body.as_slice());
		Ok(out.into_inner())
	}
}

/// Page-local map list: null first, then the order seen on decode, then
/// every chunk and reference not yet listed, then the page terminator
fn page_map(page: &Page, views: &[ChunkView<'_>]) -> Vec<ChunkKey> {
	let mut keys = vec![ChunkKey::null()];
	let mut seen: HashSet<ChunkKey> = keys.iter().cloned().collect();
	let mut push = |key: ChunkKey| {
		if seen.insert(key.clone()) {
			keys.push(key);
		}
	};

	for key in &page.map_order {
		push(key.clone());
	}
	for view in views {
		push(view.key());
	}
	for view in views {
		for key in view.references().into_iter().filter(|k| !k.is_null()) {
			push(key);
		}
	}
	push(ChunkKey::page());
	keys
}

fn write_record(w: &mut ByteWriter, local: u32, version: u16, payload: &[u8]) {
	w.reserve(RECORD_HEADER_SIZE + payload.len());
	w.u32(payload.len() as u32);
	w.u32(local);
	w.u16(version);
	w.u16(0);
	w.bytes(payload);
}
