//! Chunk type registry.
//!
//! Maps a chunk type tag to the codec that turns its payload into a typed
//! [`Chunk`] and back. The registry is a plain value: build one with
//! [`ChunkRegistry::with_builtin`], register additional codecs or override
//! built-in ones, and hand it to the reader and writer. Tags without a codec
//! decode to [`Chunk::Unknown`] and are replayed byte for byte.

use std::collections::HashMap;

use log::trace;

use crate::file::nucc::{
	Anm, Chunk, ChunkKey, ChunkView, Clump, Coord, Dynamics, Material, Model, Texture, Unknown,
	constants,
};
use crate::file::{DecodeWarning, FileType, WarningKind, XfbinError};

/// One chunk record as found in the file body, with its map entry resolved
#[derive(Debug, Clone, Copy)]
pub struct RawChunk<'a> {
	/// Identity resolved from the chunk map
	pub key: &'a ChunkKey,
	/// Version field of the record header
	pub version: u16,
	/// Payload bytes
	pub data: &'a [u8],
}

/// Resolves page-local map indices while a chunk payload is decoded
#[derive(Debug)]
pub struct DecodeContext<'a> {
	page: usize,
	page_map: &'a [Option<ChunkKey>],
	current: Option<ChunkKey>,
	warnings: Vec<DecodeWarning>,
}

impl<'a> DecodeContext<'a> {
	/// Creates a context for one page
	///
	/// `page_map` holds the page-local map list; `None` marks an entry whose
	/// global index was out of range.
	pub fn new(page: usize, page_map: &'a [Option<ChunkKey>]) -> Self {
		Self {
			page,
			page_map,
			current: None,
			warnings: Vec::new(),
		}
	}

	/// Index of the page being decoded
	pub fn page(&self) -> usize {
		self.page
	}

	/// Sets the chunk that subsequent warnings are attributed to
	pub fn set_current(&mut self, key: Option<ChunkKey>) {
		self.current = key;
	}

	/// Resolves a page-local map index
	pub fn resolve(&self, file_type: FileType, local: u32) -> Result<&'a ChunkKey, XfbinError> {
		self.page_map
			.get(local as usize)
			.and_then(Option::as_ref)
			.ok_or_else(|| XfbinError::unresolved(file_type, local, self.page_map.len()))
	}

	/// Resolves a map index where the null entry means "no reference"
	pub fn resolve_optional(&self, file_type: FileType, local: u32) -> Result<Option<&'a ChunkKey>, XfbinError> {
		self.resolve(file_type, local).map(|key| (!key.is_null()).then_some(key))
	}

	/// Resolves a reference and downgrades a failure to a warning
	pub fn resolve_or_warn(&mut self, file_type: FileType, local: u32) -> Option<ChunkKey> {
		match self.resolve_optional(file_type, local) {
			Ok(key) => key.cloned(),
			Err(err) => {
				self.warn_error(&err);
				None
			}
		}
	}

	/// Records a non-fatal problem against the current chunk
	pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
		let warning = DecodeWarning {
			page: self.page,
			chunk: self.current.clone(),
			kind,
			message: message.into(),
		};
		log::warn!("{warning}");
		self.warnings.push(warning);
	}

	/// Records an error as a non-fatal warning
	pub fn warn_error(&mut self, err: &XfbinError) {
		self.warn(err.warning_kind(), err.to_string());
	}

	/// Takes the warnings gathered so far
	pub fn take_warnings(&mut self) -> Vec<DecodeWarning> {
		std::mem::take(&mut self.warnings)
	}
}

/// Assigns page-local map indices while a chunk payload is encoded
#[derive(Debug)]
pub struct EncodeContext<'a> {
	page_map: &'a HashMap<ChunkKey, u32>,
}

impl<'a> EncodeContext<'a> {
	/// Creates a context over a finished page map
	pub fn new(page_map: &'a HashMap<ChunkKey, u32>) -> Self {
		Self {
			page_map,
		}
	}

	/// Page-local index of `key`
	pub fn index_of(&self, file_type: FileType, key: &ChunkKey) -> Result<u32, XfbinError> {
		self.page_map.get(key).copied().ok_or_else(|| {
			XfbinError::invalid_data(file_type, format!("{key} is missing from the page map"))
		})
	}

	/// Page-local index of an optional reference, 0 (the null entry) for `None`
	pub fn index_of_optional(&self, file_type: FileType, key: Option<&ChunkKey>) -> Result<u32, XfbinError> {
		match key {
			Some(key) if !key.is_null() => self.index_of(file_type, key),
			_ => Ok(0),
		}
	}
}

/// Decoder and encoder for one chunk type
///
/// Implementations must be pure: decoding the same bytes against the same
/// page map always yields the same chunk.
pub trait ChunkCodec: Send + Sync {
	/// Type tag this codec handles
	fn chunk_type(&self) -> &str;

	/// Decodes a payload into a typed chunk
	fn decode(&self, raw: &RawChunk<'_>, ctx: &mut DecodeContext<'_>) -> Result<Chunk, XfbinError>;

	/// Encodes a chunk payload
	fn encode(&self, chunk: ChunkView<'_>, ctx: &EncodeContext<'_>) -> Result<Vec<u8>, XfbinError>;
}

fn wrong_view(file_type: FileType, view: &ChunkView<'_>) -> XfbinError {
	XfbinError::invalid_data(file_type, format!("codec cannot encode {}", view.chunk_type()))
}

macro_rules! builtin_codec {
	($codec:ident, $ty:ident, $tag:expr, $file_type:expr) => {
		/// Built-in codec for
		#[doc = concat!("`", stringify!($ty), "`")]
		/// chunks
		#[derive(Debug, Default, Clone, Copy)]
		pub struct $codec;

		impl ChunkCodec for $codec {
			fn chunk_type(&self) -> &str {
				$tag
			}

			fn decode(&self, raw: &RawChunk<'_>, ctx: &mut DecodeContext<'_>) -> Result<Chunk, XfbinError> {
				$ty::decode(raw, ctx).map(Chunk::$ty)
			}

			fn encode(&self, chunk: ChunkView<'_>, ctx: &EncodeContext<'_>) -> Result<Vec<u8>, XfbinError> {
				match chunk {
					ChunkView::$ty(inner) => inner.encode(ctx),
					other => Err(wrong_view($file_type, &other)),
				}
			}
		}
	};
}

builtin_codec!(ClumpCodec, Clump, constants::CLUMP, FileType::Clump);
builtin_codec!(CoordCodec, Coord, constants::COORD, FileType::Coord);
builtin_codec!(ModelCodec, Model, constants::MODEL, FileType::Model);
builtin_codec!(MaterialCodec, Material, constants::MATERIAL, FileType::Material);
builtin_codec!(TextureCodec, Texture, constants::TEXTURE, FileType::Texture);
builtin_codec!(DynamicsCodec, Dynamics, constants::DYNAMICS, FileType::Dynamics);
builtin_codec!(AnmCodec, Anm, constants::ANM, FileType::Anm);

/// Dispatch table from type tag to codec
pub struct ChunkRegistry {
	codecs: HashMap<String, Box<dyn ChunkCodec>>,
}

impl std::fmt::Debug for ChunkRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut tags: Vec<_> = self.codecs.keys().collect();
		tags.sort();
		f.debug_struct("ChunkRegistry").field("codecs", &tags).finish()
	}
}

impl Default for ChunkRegistry {
	fn default() -> Self {
		Self::with_builtin()
	}
}

impl ChunkRegistry {
	/// Creates a registry with no codecs; every chunk decodes as unknown
	pub fn empty() -> Self {
		Self {
			codecs: HashMap::new(),
		}
	}

	/// Creates a registry with codecs for every built-in chunk type
	pub fn with_builtin() -> Self {
		let mut registry = Self::empty();
		registry.register(ClumpCodec);
		registry.register(CoordCodec);
		registry.register(ModelCodec);
		registry.register(MaterialCodec);
		registry.register(TextureCodec);
		registry.register(DynamicsCodec);
		registry.register(AnmCodec);
		registry
	}

	/// Registers a codec, returning the one it replaced
	pub fn register(&mut self, codec: impl ChunkCodec + 'static) -> Option<Box<dyn ChunkCodec>> {
		let tag = codec.chunk_type().to_owned();
		self.codecs.insert(tag, Box::new(codec))
	}

	/// Removes the codec for `tag`, so its chunks decode as unknown
	pub fn unregister(&mut self, tag: &str) -> Option<Box<dyn ChunkCodec>> {
		self.codecs.remove(tag)
	}

	/// Returns the codec registered for `tag`
	pub fn get(&self, tag: &str) -> Option<&dyn ChunkCodec> {
		self.codecs.get(tag).map(Box::as_ref)
	}

	/// Returns `true` if `tag` has a codec
	pub fn contains(&self, tag: &str) -> bool {
		self.codecs.contains_key(tag)
	}

	/// Decodes a raw chunk, falling back to [`Chunk::Unknown`] for unregistered tags
	pub fn decode(&self, raw: &RawChunk<'_>, ctx: &mut DecodeContext<'_>) -> Result<Chunk, XfbinError> {
		match self.get(&raw.key.chunk_type) {
			Some(codec) => {
				trace!("decoding {} ({} bytes)", raw.key, raw.data.len());
				codec.decode(raw, ctx)
			}
			None => Ok(Chunk::Unknown(Unknown::from_raw(raw))),
		}
	}

	/// Encodes a chunk payload; total over every variant, unknown chunks return their bytes
	pub fn encode(&self, chunk: ChunkView<'_>, ctx: &EncodeContext<'_>) -> Result<Vec<u8>, XfbinError> {
		if let ChunkView::Unknown(unknown) = chunk {
			return Ok(unknown.data.clone());
		}
		match self.get(chunk.chunk_type()) {
			Some(codec) => codec.encode(chunk, ctx),
			None => Err(XfbinError::invalid_data(
				FileType::Xfbin,
				format!("no codec registered for {}", chunk.chunk_type()),
			)),
		}
	}
}
