//! Prelude module for `xfbin_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use xfbin_types::prelude::*;
//!
//! let mut document = Document::new();
//! document.add_clump_page(Clump::new("c/1nrt/max/1nrtbod1.max", "1nrtbod1"));
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Errors
	DecodeWarning,
	FileType,
	WarningKind,
	XfbinError,

	// Container
	ChunkRegistry,
	Document,
	Page,
	ParseConfig,
	XfbinReader,
	XfbinWriter,

	// Chunks
	Chunk,
	ChunkKey,
	ChunkView,

	// NUD types
	Mesh,
	MeshGroup,
	Nud,
	Vertex,

	// NUT types
	Nut,
	NutTexture,
	PixelFormat,
};

// Chunk payload types
#[doc(inline)]
pub use crate::file::nucc::{
	Anm, Clump, CollisionSphere, Coord, Dynamics, Material, Model, ModelGroup, RiggingFlag, SpringGroup,
	Texture, TextureGroup, Unknown,
};

#[doc(inline)]
pub use crate::file::nud::{CornerAttributes, MeshBuilder};

#[doc(inline)]
pub use crate::file::nud::{BoneType, ColorType, VertexType};

#[doc(inline)]
pub use crate::file::xfbin::{ChunkCodec, ChunkReference, DecodeContext, EncodeContext, RawChunk};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
