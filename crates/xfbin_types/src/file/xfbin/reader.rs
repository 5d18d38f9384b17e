//! Two-phase XFBIN decoding: chunk table first, then payloads page by page.

use std::path::Path;

use super::chunk_table::ChunkTable;
use super::constants::RECORD_HEADER_SIZE;
use super::document::{Document, Page};
use super::header::Header;
use super::link::link_page;
use super::parse_config::ParseConfig;
use super::registry::{ChunkRegistry, DecodeContext, RawChunk};
use crate::file::binary::ByteReader;
use crate::file::nucc::{Chunk, ChunkKey, NullChunk, Unknown, constants};
use crate::file::{DecodeWarning, FileType, WarningKind, XfbinError};

/// A chunk record as laid out in the body
#[derive(Debug, Clone, Copy)]
struct Record<'a> {
	local: u32,
	version: u16,
	data: &'a [u8],
}

/// A record waiting for its page terminator
#[derive(Debug)]
struct Pending<'a> {
	key: Option<ChunkKey>,
	record: Record<'a>,
}

/// Position of the page being assembled within the chunk table
#[derive(Debug, Clone, Copy, Default)]
struct PageSpan {
	map_start: usize,
	map_count: usize,
	reference_start: usize,
	reference_count: usize,
}

/// Decodes XFBIN bytes into a [`Document`]
///
/// # Examples
///
/// ```no_run
/// use xfbin_types::file::xfbin::{ChunkRegistry, ParseConfig, XfbinReader};
///
/// let reader = XfbinReader::new(ChunkRegistry::with_builtin(), ParseConfig::strict());
/// let document = reader.read_file("1nrtbod1.xfbin").unwrap();
/// println!("{} pages", document.pages().len());
/// ```
#[derive(Debug, Default)]
pub struct XfbinReader {
	registry: ChunkRegistry,
	config: ParseConfig,
}

impl XfbinReader {
	/// Creates a reader with the given codecs and limits
	pub fn new(registry: ChunkRegistry, config: ParseConfig) -> Self {
		Self {
			registry,
			config,
		}
	}

	/// The codecs in use
	pub fn registry(&self) -> &ChunkRegistry {
		&self.registry
	}

	/// The parse configuration in use
	pub fn config(&self) -> ParseConfig {
		self.config
	}

	/// Reads and decodes a file
	pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Document, XfbinError> {
		let data = std::fs::read(path)?;
		self.read(&data)
	}

	/// Decodes a complete XFBIN buffer
	///
	/// Fails with [`XfbinError::MalformedContainer`] if the header or chunk
	/// table is unusable. Problems inside chunks become warnings on the
	/// returned document unless the configuration is strict.
	pub fn read(&self, data: &[u8]) -> Result<Document, XfbinError> {
		let mut r = ByteReader::new(data, FileType::Xfbin);
		let header = Header::read(&mut r)?;
		let table = r
			.sub_reader(header.chunk_table_size as usize, FileType::ChunkTable)
			.and_then(|mut t| ChunkTable::read(&mut t, self.config.max_chunk_count))
			.map_err(|err| XfbinError::MalformedContainer(format!("chunk table: {err}")))?;

		let mut pages = Vec::new();
		let mut warnings = Vec::new();
		let mut pending: Vec<Pending<'_>> = Vec::new();
		let mut span = PageSpan::default();
		let mut record_count = 0usize;
		let mut unterminated = false;

		while r.remaining() > 0 {
			let record = match read_record(&mut r) {
				Ok(record) => record,
				Err(err) if self.config.strict => return Err(err),
				Err(err) => {
					let warning = DecodeWarning {
						page: pages.len(),
						chunk: None,
						kind: WarningKind::Truncated,
						message: format!("chunk body ends early: {err}"),
					};
					log::warn!("{warning}");
					warnings.push(warning);
					break;
				}
			};

			record_count += 1;
			if record_count > self.config.max_chunk_count {
				return Err(XfbinError::SizeLimitExceeded {
					what: "chunk record",
					count: record_count,
					limit: self.config.max_chunk_count,
				});
			}

			let key = table
				.map_indices
				.get(span.map_start + record.local as usize)
				.and_then(|&global| table.key(global));
			match key {
				Some(key) if key.chunk_type == constants::NULL && record.data.is_empty() => {}
				// the leading null record of a file without pages
				None if record.local == 0 && record.data.is_empty() => {}
				Some(key) if key.chunk_type == constants::PAGE => {
					match read_page_counts(record.data) {
						Ok((map_count, reference_count)) => {
							span.map_count = map_count;
							span.reference_count = reference_count;
						}
						Err(err) if self.config.strict => {
							return Err(XfbinError::MalformedContainer(format!("page terminator: {err}")));
						}
						Err(err) => {
							let warning = DecodeWarning {
								page: pages.len(),
								chunk: None,
								kind: WarningKind::Truncated,
								message: format!("unreadable page terminator: {err}"),
							};
							log::warn!("{warning}");
							warnings.push(warning);
							unterminated = true;
							break;
						}
					}
					let records = std::mem::take(&mut pending);
					pages.push(self.finish_page(pages.len(), &table, span, records, &mut warnings)?);
					span.map_start += span.map_count;
					span.reference_start += span.reference_count;
				}
				key => pending.push(Pending {
					key,
					record,
				}),
			}
		}

		if unterminated || !pending.is_empty() {
			let warning = DecodeWarning {
				page: pages.len(),
				chunk: None,
				kind: WarningKind::UnterminatedPage,
				message: format!("{} chunks without a page terminator", pending.len()),
			};
			log::warn!("{warning}");
			warnings.push(warning);
			span.map_count = table.map_indices.len().saturating_sub(span.map_start);
			span.reference_count = table.references.len().saturating_sub(span.reference_start);
			pages.push(self.finish_page(pages.len(), &table, span, pending, &mut warnings)?);
		}

		log::debug!("decoded {} pages, {} chunk records, {} warnings", pages.len(), record_count, warnings.len());
		Ok(Document::from_parts(pages, warnings))
	}

	fn finish_page(
		&self,
		page_index: usize,
		table: &ChunkTable,
		span: PageSpan,
		records: Vec<Pending<'_>>,
		warnings: &mut Vec<DecodeWarning>,
	) -> Result<Page, XfbinError> {
		let map_end = (span.map_start + span.map_count).min(table.map_indices.len());
		let page_map: Vec<Option<ChunkKey>> = table
			.map_indices
			.get(span.map_start..map_end)
			.unwrap_or_default()
			.iter()
			.map(|&global| table.key(global))
			.collect();

		let mut ctx = DecodeContext::new(page_index, &page_map);
		let mut chunks = Vec::with_capacity(records.len());
		for Pending {
			key,
			record,
		} in records
		{
			let Some(key) = key else {
				let err = XfbinError::unresolved(FileType::Xfbin, record.local, page_map.len());
				if self.config.strict {
					return Err(err);
				}
				ctx.set_current(None);
				ctx.warn_error(&err);
				chunks.push(Chunk::Null(NullChunk {
					map_index: record.local,
					data: record.data.to_vec(),
				}));
				continue;
			};

			let raw = RawChunk {
				key: &key,
				version: record.version,
				data: record.data,
			};
			ctx.set_current(Some(key.clone()));
			match self.registry.decode(&raw, &mut ctx) {
				Ok(chunk) => chunks.push(chunk),
				Err(err) if self.config.strict => return Err(err),
				Err(err) => {
					ctx.warn_error(&err);
					chunks.push(Chunk::Unknown(Unknown::from_raw(&raw)));
				}
			}
		}
		ctx.set_current(None);

		let reference_end = (span.reference_start + span.reference_count).min(table.references.len());
		let mut page = Page::with_chunks(link_page(chunks, &mut ctx));
		for raw in table.references.get(span.reference_start..reference_end).unwrap_or_default() {
			match table.reference(raw) {
				Some(reference) => page.add_reference(reference.name, reference.chunk),
				None => ctx.warn(
					WarningKind::UnresolvedReference,
					format!("page reference to map {} cannot be resolved", raw.map_index),
				),
			}
		}
		page.map_order = page_map.iter().flatten().cloned().collect();

		log::debug!(
			"page {page_index}: {} chunks, {} map entries, {} references",
			page.chunks().len(),
			page.map_order.len(),
			page.references().len()
		);
		warnings.extend(ctx.take_warnings());
		Ok(page)
	}
}

fn read_page_counts(data: &[u8]) -> Result<(usize, usize), XfbinError> {
	let mut r = ByteReader::new(data, FileType::Xfbin);
	Ok((r.u32()? as usize, r.u32()? as usize))
}

fn read_record<'a>(r: &mut ByteReader<'a>) -> Result<Record<'a>, XfbinError> {
	if r.remaining() < RECORD_HEADER_SIZE {
		return Err(XfbinError::truncated(FileType::Xfbin, r.position(), RECORD_HEADER_SIZE, r.remaining()));
	}
	let size = r.u32()? as usize;
	let local = r.u32()?;
	let version = r.u16()?;
	let _unknown = r.u16()?;
	Ok(Record {
		local,
		version,
		data: r.bytes(size)?,
	})
}
