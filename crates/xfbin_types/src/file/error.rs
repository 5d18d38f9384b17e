//! Error types for file format parsing and manipulation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::nucc::ChunkKey;

/// Identifies which structure was being read or written when an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// The XFBIN container header or body
	Xfbin,
	/// The XFBIN chunk table (index section)
	ChunkTable,
	/// `nuccChunkClump` payload
	Clump,
	/// `nuccChunkCoord` payload
	Coord,
	/// `nuccChunkModel` payload
	Model,
	/// `nuccChunkMaterial` payload
	Material,
	/// `nuccChunkTexture` payload
	Texture,
	/// `nuccChunkDynamics` payload
	Dynamics,
	/// `nuccChunkAnm` payload
	Anm,
	/// NUD (NDP3) mesh container
	Nud,
	/// NUT (NTP3) texture container
	Nut,
	/// DDS image output
	Dds,
}

impl fmt::Display for FileType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			FileType::Xfbin => "XFBIN",
			FileType::ChunkTable => "chunk table",
			FileType::Clump => "clump",
			FileType::Coord => "coord",
			FileType::Model => "model",
			FileType::Material => "material",
			FileType::Texture => "texture",
			FileType::Dynamics => "dynamics",
			FileType::Anm => "anm",
			FileType::Nud => "NUD",
			FileType::Nut => "NUT",
			FileType::Dds => "DDS",
		};
		f.write_str(name)
	}
}

/// Errors produced while decoding or encoding XFBIN data and its nested formats
#[derive(Debug, Error)]
pub enum XfbinError {
	/// Fewer bytes remain than a read requires
	#[error(
		"{file_type}: truncated at offset {offset:#X}, needed {needed} bytes but only {available} remain"
	)]
	Truncated {
		/// Structure being read
		file_type: FileType,
		/// Offset of the failed read
		offset: usize,
		/// Number of bytes required
		needed: usize,
		/// Number of bytes available
		available: usize,
	},

	/// An internal index points outside its valid range
	#[error("{file_type}: reference {index} is out of range (valid entries: {len})")]
	UnresolvedReference {
		/// Structure holding the reference
		file_type: FileType,
		/// Index that failed to resolve
		index: i64,
		/// Number of valid entries
		len: usize,
	},

	/// Texture pixel format code with no known mapping
	#[error("Unsupported pixel format code: {0}")]
	UnsupportedPixelFormat(u8),

	/// A mesh exceeds the capacity of its target format
	#[error("{what} count {count} exceeds the limit of {limit}")]
	SizeLimitExceeded {
		/// What was counted (vertices, faces, ...)
		what: &'static str,
		/// Actual count
		count: usize,
		/// Maximum accepted count
		limit: usize,
	},

	/// A mesh has fewer than three unique vertices after assembly
	#[error("Mesh has only {0} vertices, at least 3 are required")]
	TooFewVertices(usize),

	/// Header mismatch or unrecoverable index corruption
	#[error("Malformed container: {0}")]
	MalformedContainer(String),

	/// Invalid magic number
	#[error("{file_type}: invalid magic, expected {expected:02X?}, got {actual:02X?}")]
	InvalidMagic {
		/// Structure being read
		file_type: FileType,
		/// Expected magic bytes
		expected: Vec<u8>,
		/// Magic bytes found
		actual: Vec<u8>,
	},

	/// Material format code missing from the float count table
	#[error("Unknown material format code: {0:#04X}")]
	InvalidMaterialFormat(u8),

	/// Structurally invalid data
	#[error("{file_type}: {message}")]
	InvalidData {
		/// Structure being read or written
		file_type: FileType,
		/// Description of the problem
		message: String,
	},

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl XfbinError {
	/// Creates a [`XfbinError::Truncated`] error
	pub fn truncated(file_type: FileType, offset: usize, needed: usize, available: usize) -> Self {
		Self::Truncated {
			file_type,
			offset,
			needed,
			available,
		}
	}

	/// Creates a [`XfbinError::UnresolvedReference`] error
	pub fn unresolved(file_type: FileType, index: impl Into<i64>, len: usize) -> Self {
		Self::UnresolvedReference {
			file_type,
			index: index.into(),
			len,
		}
	}

	/// Creates a [`XfbinError::InvalidMagic`] error
	pub fn invalid_magic(file_type: FileType, expected: &[u8], actual: &[u8]) -> Self {
		Self::InvalidMagic {
			file_type,
			expected: expected.to_vec(),
			actual: actual.to_vec(),
		}
	}

	/// Creates a [`XfbinError::InvalidData`] error
	pub fn invalid_data(file_type: FileType, message: impl Into<String>) -> Self {
		Self::InvalidData {
			file_type,
			message: message.into(),
		}
	}

	/// Classifies the error for the warning list of a partially decoded document
	pub fn warning_kind(&self) -> WarningKind {
		match self {
			XfbinError::Truncated { .. } => WarningKind::Truncated,
			XfbinError::UnresolvedReference { .. } => WarningKind::UnresolvedReference,
			XfbinError::UnsupportedPixelFormat(_) => WarningKind::UnsupportedPixelFormat,
			_ => WarningKind::InvalidChunk,
		}
	}
}

/// Category of a non-fatal decode problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
	/// A chunk payload ended early
	Truncated,
	/// An index referenced a missing entry and was replaced by a null reference
	UnresolvedReference,
	/// A texture used a pixel format with no known mapping
	UnsupportedPixelFormat,
	/// A chunk payload failed to decode and was kept as raw bytes
	InvalidChunk,
	/// Chunk records trailed the last page terminator
	UnterminatedPage,
}

/// A structural issue found while decoding that did not abort the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeWarning {
	/// Index of the page being decoded
	pub page: usize,
	/// Chunk the warning belongs to, when known
	pub chunk: Option<ChunkKey>,
	/// Warning category
	pub kind: WarningKind,
	/// Human readable description
	pub message: String,
}

impl fmt::Display for DecodeWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.chunk {
			Some(key) => write!(f, "page {} [{}]: {}", self.page, key, self.message),
			None => write!(f, "page {}: {}", self.page, self.message),
		}
	}
}
