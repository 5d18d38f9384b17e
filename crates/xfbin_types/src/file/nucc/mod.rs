//! nucc chunk payloads.
//!
//! Every chunk inside an XFBIN is identified by a `(type, path, name)` triple,
//! modelled here as [`ChunkKey`]. Once decoded, chunks refer to each other
//! through those keys or by direct ownership, never through the numeric map
//! indices of the serialized form.
//!
//! | Type tag              | Rust type      | Notes                                  |
//! |-----------------------|----------------|----------------------------------------|
//! | `nuccChunkClump`      | [`Clump`]      | owns its coord arena and models        |
//! | `nuccChunkCoord`      | [`Coord`]      | one skeleton node                      |
//! | `nuccChunkModel`      | [`Model`]      | owns an embedded NUD and its materials |
//! | `nuccChunkMaterial`   | [`Material`]   | texture groups reference textures      |
//! | `nuccChunkTexture`    | [`Texture`]    | embedded NUT kept byte-exact           |
//! | `nuccChunkDynamics`   | [`Dynamics`]   | spring groups and collision spheres    |
//! | `nuccChunkAnm`        | [`Anm`]        | opaque                                 |
//! | anything else         | [`Unknown`]    | replayed verbatim                      |

pub mod anm;
pub mod clump;
pub mod coord;
pub mod dynamics;
pub mod material;
pub mod model;
pub mod texture;
pub mod unknown;


use std::fmt;

use serde::{Deserialize, Serialize};

pub use anm::{Anm, AnmHeader};
pub use clump::{Clump, ModelGroup};
pub use coord::Coord;
pub use dynamics::{CollisionSphere, Dynamics, SpringGroup};
pub use material::{Material, TextureGroup, float_count};
pub use model::{Model, RiggingFlag};
pub use texture::Texture;
pub use unknown::{NullChunk, Unknown};

pub(crate) fn default_version() -> u16 {
	constants::CHUNK_VERSION
}

/// Chunk type tags and shared header constants
pub mod constants {
	/// Header version of new chunk records
	pub const CHUNK_VERSION: u16 = 0x79;

	/// Null chunk, always global map entry 0
	pub const NULL: &str = "nuccChunkNull";
	/// Page terminator
	pub const PAGE: &str = "nuccChunkPage";
	/// Index entry present in every chunk map
	pub const INDEX: &str = "nuccChunkIndex";
	/// Skeleton and model list
	pub const CLUMP: &str = "nuccChunkClump";
	/// Skeleton node
	pub const COORD: &str = "nuccChunkCoord";
	/// Mesh instance
	pub const MODEL: &str = "nuccChunkModel";
	/// Model hit volume, only ever referenced
	pub const MODEL_HIT: &str = "nuccChunkModelHit";
	/// Material
	pub const MATERIAL: &str = "nuccChunkMaterial";
	/// Texture
	pub const TEXTURE: &str = "nuccChunkTexture";
	/// Spring bone physics
	pub const DYNAMICS: &str = "nuccChunkDynamics";
	/// Animation
	pub const ANM: &str = "nuccChunkAnm";
}

/// Identity of a chunk: its type tag, virtual path and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ChunkKey {
	/// Type tag, e.g. `nuccChunkClump`
	pub chunk_type: String,
	/// Virtual path, e.g. `c/1nrt/max/1nrtbod1.max`
	pub path: String,
	/// Chunk name
	pub name: String,
}

impl ChunkKey {
	/// Creates a new key
	pub fn new(chunk_type: impl Into<String>, path: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			chunk_type: chunk_type.into(),
			path: path.into(),
			name: name.into(),
		}
	}

	/// The key of the null chunk (global map entry 0)
	pub fn null() -> Self {
		Self::new(constants::NULL, "", "")
	}

	/// The key every page terminator uses
	pub fn page() -> Self {
		Self::new(constants::PAGE, "", "Page0")
	}

	/// The key of the index entry
	pub fn index() -> Self {
		Self::new(constants::INDEX, "", "index")
	}

	/// Returns `true` for the null chunk key
	pub fn is_null(&self) -> bool {
		self.chunk_type == constants::NULL
	}
}

impl fmt::Display for ChunkKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {:?} {:?}", self.chunk_type, self.path, self.name)
	}
}

/// A decoded chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Chunk {
	/// `nuccChunkClump`
	Clump(Clump),
	/// `nuccChunkCoord` not owned by a clump
	Coord(Coord),
	/// `nuccChunkModel` not owned by a clump
	Model(Model),
	/// `nuccChunkMaterial` not owned by a model
	Material(Material),
	/// `nuccChunkTexture`
	Texture(Texture),
	/// `nuccChunkDynamics`
	Dynamics(Dynamics),
	/// `nuccChunkAnm`
	Anm(Anm),
	/// Any chunk without a registered codec, or one that failed to decode
	Unknown(Unknown),
	/// A record whose map index could not be resolved
	Null(NullChunk),
}

impl Chunk {
	/// Type tag of this chunk
	pub fn chunk_type(&self) -> &str {
		match self {
			Chunk::Clump(_) => constants::CLUMP,
			Chunk::Coord(_) => constants::COORD,
			Chunk::Model(_) => constants::MODEL,
			Chunk::Material(_) => constants::MATERIAL,
			Chunk::Texture(_) => constants::TEXTURE,
			Chunk::Dynamics(_) => constants::DYNAMICS,
			Chunk::Anm(_) => constants::ANM,
			Chunk::Unknown(c) => &c.chunk_type,
			Chunk::Null(_) => constants::NULL,
		}
	}

	/// Virtual path of this chunk
	pub fn path(&self) -> &str {
		match self {
			Chunk::Clump(c) => &c.path,
			Chunk::Coord(c) => &c.path,
			Chunk::Model(c) => &c.path,
			Chunk::Material(c) => &c.path,
			Chunk::Texture(c) => &c.path,
			Chunk::Dynamics(c) => &c.path,
			Chunk::Anm(c) => &c.path,
			Chunk::Unknown(c) => &c.path,
			Chunk::Null(_) => "",
		}
	}

	/// Name of this chunk
	pub fn name(&self) -> &str {
		match self {
			Chunk::Clump(c) => &c.name,
			Chunk::Coord(c) => &c.name,
			Chunk::Model(c) => &c.name,
			Chunk::Material(c) => &c.name,
			Chunk::Texture(c) => &c.name,
			Chunk::Dynamics(c) => &c.name,
			Chunk::Anm(c) => &c.name,
			Chunk::Unknown(c) => &c.name,
			Chunk::Null(_) => "",
		}
	}

	/// Identity of this chunk
	pub fn key(&self) -> ChunkKey {
		ChunkKey::new(self.chunk_type(), self.path(), self.name())
	}

	/// Borrowed view used by the encoder, `None` for null placeholders
	pub fn view(&self) -> Option<ChunkView<'_>> {
		Some(match self {
			Chunk::Clump(c) => ChunkView::Clump(c),
			Chunk::Coord(c) => ChunkView::Coord(c),
			Chunk::Model(c) => ChunkView::Model(c),
			Chunk::Material(c) => ChunkView::Material(c),
			Chunk::Texture(c) => ChunkView::Texture(c),
			Chunk::Dynamics(c) => ChunkView::Dynamics(c),
			Chunk::Anm(c) => ChunkView::Anm(c),
			Chunk::Unknown(c) => ChunkView::Unknown(c),
			Chunk::Null(_) => return None,
		})
	}
}

macro_rules! impl_from_chunk {
	($($variant:ident),* $(,)?) => {
		$(
			impl From<$variant> for Chunk {
				fn from(chunk: $variant) -> Self {
					Chunk::$variant(chunk)
				}
			}
		)*
	};
}

impl_from_chunk!(Clump, Coord, Model, Material, Texture, Dynamics, Anm, Unknown);

/// A borrowed chunk ready to be serialized
///
/// Owned children (coords inside a clump, materials inside a model) are
/// written as chunks of their own, so they are viewed through this type
/// rather than through [`Chunk`].
#[derive(Debug, Clone, Copy)]
pub enum ChunkView<'a> {
	/// A clump payload
	Clump(&'a Clump),
	/// A coord payload
	Coord(&'a Coord),
	/// A model payload
	Model(&'a Model),
	/// A material payload
	Material(&'a Material),
	/// A texture payload
	Texture(&'a Texture),
	/// A dynamics payload
	Dynamics(&'a Dynamics),
	/// An animation payload
	Anm(&'a Anm),
	/// Raw bytes of an unknown chunk
	Unknown(&'a Unknown),
}

impl<'a> ChunkView<'a> {
	/// Type tag of the viewed chunk
	pub fn chunk_type(&self) -> &'a str {
		match self {
			ChunkView::Clump(_) => constants::CLUMP,
			ChunkView::Coord(_) => constants::COORD,
			ChunkView::Model(_) => constants::MODEL,
			ChunkView::Material(_) => constants::MATERIAL,
			ChunkView::Texture(_) => constants::TEXTURE,
			ChunkView::Dynamics(_) => constants::DYNAMICS,
			ChunkView::Anm(_) => constants::ANM,
			ChunkView::Unknown(c) => &c.chunk_type,
		}
	}

	/// Identity of the viewed chunk
	pub fn key(&self) -> ChunkKey {
		match self {
			ChunkView::Clump(c) => c.key(),
			ChunkView::Coord(c) => c.key(),
			ChunkView::Model(c) => c.key(),
			ChunkView::Material(c) => c.key(),
			ChunkView::Texture(c) => c.key(),
			ChunkView::Dynamics(c) => c.key(),
			ChunkView::Anm(c) => c.key(),
			ChunkView::Unknown(c) => c.key(),
		}
	}

	/// Header version written in the chunk record
	pub fn version(&self) -> u16 {
		match self {
			ChunkView::Clump(c) => c.version,
			ChunkView::Coord(c) => c.version,
			ChunkView::Model(c) => c.version,
			ChunkView::Material(c) => c.version,
			ChunkView::Texture(c) => c.version,
			ChunkView::Dynamics(c) => c.version,
			ChunkView::Anm(c) => c.version,
			ChunkView::Unknown(c) => c.version,
		}
	}

	/// Keys of every chunk this payload refers to by map index
	///
	/// The page map written for the containing page must list each of them.
	pub fn references(&self) -> Vec<ChunkKey> {
		match self {
			ChunkView::Clump(c) => c.references(),
			ChunkView::Model(c) => c.references(),
			ChunkView::Material(c) => c.references(),
			ChunkView::Dynamics(c) => vec![c.clump.clone()],
			_ => Vec::new(),
		}
	}
}
