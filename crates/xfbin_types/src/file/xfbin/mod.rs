//! XFBIN container codec.
//!
//! # File Structure
//!
//! ```text
//! +--------------------+
//! | Header (28 bytes)  |  "NUCC", version, flags, chunk table size
//! +--------------------+
//! | Chunk table        |  string blocks, chunk maps, references,
//! |                    |  page-local map lists
//! +--------------------+
//! | Chunk records      |  u32 size, u32 map index, u16 version,
//! |   ...              |  u16 unknown, payload
//! +--------------------+
//! ```
//!
//! All fields are big-endian. Records are grouped into pages, each closed by
//! a `nuccChunkPage` record whose payload holds the number of map entries and
//! references the page consumed. A record's map index is local to its page:
//! it selects an entry of the page's map list, which in turn names a global
//! chunk map.
//!
//! Decoding reads the whole chunk table before any payload; encoding writes
//! every payload before the table. [`decode`] and [`encode`] use the built-in
//! codecs with the default [`ParseConfig`]; use [`XfbinReader`] and
//! [`XfbinWriter`] for anything else.
//!
//! # Examples
//!
//! ```no_run
//! use xfbin_types::file::xfbin;
//!
//! let data = std::fs::read("1nrtbod1.xfbin").unwrap();
//! let document = xfbin::decode(&data).unwrap();
//! for warning in document.warnings() {
//!     eprintln!("{warning}");
//! }
//! let out = xfbin::encode(&document).unwrap();
//! ```

pub mod chunk_table;
pub mod document;
pub mod header;
pub mod parse_config;
pub mod reader;
pub mod registry;
pub mod writer;

mod link;


pub use chunk_table::{ChunkReference, ChunkTable, ChunkTableBuilder};
pub use document::{Document, Page};
pub use header::Header;
pub use parse_config::ParseConfig;
pub use reader::XfbinReader;
pub use registry::{ChunkCodec, ChunkRegistry, DecodeContext, EncodeContext, RawChunk};
pub use writer::XfbinWriter;

use crate::file::XfbinError;

/// Container layout constants
pub mod constants {
	/// File magic
	pub const MAGIC: [u8; 4] = *b"NUCC";
	/// Container version, stored in the header twice
	pub const VERSION: u16 = 0x79;
	/// Header size in bytes
	pub const HEADER_SIZE: usize = 28;
	/// Minimum page size field of the header
	pub const MIN_PAGE_SIZE: u32 = 3;
	/// Size of one chunk map entry
	pub const CHUNK_MAP_SIZE: usize = 12;
	/// Size of one page reference entry
	pub const REFERENCE_SIZE: usize = 8;
	/// The string blocks are padded to this alignment
	pub const STRING_ALIGNMENT: usize = 4;
	/// Size of a chunk record header
	pub const RECORD_HEADER_SIZE: usize = 12;
	/// Size of a page terminator payload
	pub const PAGE_PAYLOAD_SIZE: usize = 8;
}

/// Decodes XFBIN bytes with the built-in codecs and the default configuration
pub fn decode(data: &[u8]) -> Result<Document, XfbinError> {
	XfbinReader::default().read(data)
}

/// Encodes a document with the built-in codecs
pub fn encode(document: &Document) -> Result<Vec<u8>, XfbinError> {
	XfbinWriter::default().write(document)
}
