//! Parse configuration for XFBIN decoding.
//!
//! Real-world files routinely contain chunks this crate does not fully
//! understand, so decoding is lenient by default: a chunk that fails to
//! decode is kept as raw bytes and reported as a warning.

/// Configuration for decoding an XFBIN document.
///
/// # Presets
///
/// - `default()`: chunk failures become warnings, up to 65536 chunks
/// - `lenient()`: chunk failures become warnings, no practical chunk limit
/// - `strict()`: the first chunk failure aborts the decode, up to 65536 chunks
///
/// # Examples
///
/// ```
/// use xfbin_types::file::xfbin::ParseConfig;
///
/// // Keep going past broken chunks
/// let config = ParseConfig::default();
///
/// // Fail on the first broken chunk
/// let config = ParseConfig::strict();
///
/// // Custom limits
/// let config = ParseConfig::new(false, 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
	/// Turn chunk-local failures into hard errors
	pub strict: bool,
	/// Maximum number of chunk map entries and chunk records accepted
	pub max_chunk_count: usize,
}

impl Default for ParseConfig {
	fn default() -> Self {
		Self {
			strict: false,
			max_chunk_count: 0x10000,
		}
	}
}

impl ParseConfig {
	/// Create a new parse configuration.
	///
	/// # Arguments
	/// * `strict` - Abort on the first chunk that fails to decode
	/// * `max_chunk_count` - Chunk map and chunk record limit
	pub fn new(strict: bool, max_chunk_count: usize) -> Self {
		Self {
			strict,
			max_chunk_count,
		}
	}

	/// Create a lenient configuration.
	///
	/// - `strict`: false
	/// - `max_chunk_count`: `u32::MAX`
	pub fn lenient() -> Self {
		Self {
			strict: false,
			max_chunk_count: u32::MAX as usize,
		}
	}

	/// Create a strict configuration.
	///
	/// - `strict`: true
	/// - `max_chunk_count`: 65536
	pub fn strict() -> Self {
		Self {
			strict: true,
			..Self::default()
		}
	}
}
