//! The 28-byte container header.

use super::constants::{HEADER_SIZE, MAGIC, MIN_PAGE_SIZE, VERSION};
use crate::file::binary::{ByteReader, ByteWriter};
use crate::file::{FileType, XfbinError};

/// Container header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
	/// File version
	pub file_version: u32,
	/// Flags, always 0 in known files
	pub flags: u64,
	/// Size of the chunk table that follows the header
	pub chunk_table_size: u32,
	/// Minimum page size
	pub min_page_size: u32,
	/// Format version
	pub version: u16,
	/// Unknown
	pub unknown: u16,
}

impl Header {
	/// Creates a header for a chunk table of the given size
	pub fn new(chunk_table_size: u32) -> Self {
		Self {
			file_version: u32::from(VERSION),
			flags: 0,
			chunk_table_size,
			min_page_size: MIN_PAGE_SIZE,
			version: VERSION,
			unknown: 0,
		}
	}

	/// Reads and validates the header
	///
	/// A wrong magic or a short buffer is a [`XfbinError::MalformedContainer`].
	pub fn read(r: &mut ByteReader<'_>) -> Result<Self, XfbinError> {
		if r.remaining() < HEADER_SIZE {
			return Err(XfbinError::MalformedContainer(format!(
				"{} bytes is too short for the {HEADER_SIZE}-byte header",
				r.remaining()
			)));
		}
		let magic: [u8; 4] = r.array()?;
		if magic != MAGIC {
			return Err(XfbinError::MalformedContainer(
				XfbinError::invalid_magic(FileType::Xfbin, &MAGIC, &magic).to_string(),
			));
		}
		Ok(Self {
			file_version: r.u32()?,
			flags: r.u64()?,
			chunk_table_size: r.u32()?,
			min_page_size: r.u32()?,
			version: r.u16()?,
			unknown: r.u16()?,
		})
	}

	/// Writes the header
	pub fn write(&self, w: &mut ByteWriter) {
		w.bytes(&MAGIC);
		w.u32(self.file_version);
		w.u64(self.flags);
		w.u32(self.chunk_table_size);
		w.u32(self.min_page_size);
		w.u16(self.version);
		w.u16(self.unknown);
	}
}
