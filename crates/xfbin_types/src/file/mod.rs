//! File format support for `xfbin-rs`.
//!
//! - **XFBIN**: the chunk container, see [`xfbin`]
//! - **nucc**: typed chunk payloads, see [`nucc`]
//! - **NUD**: NDP3 mesh containers embedded in model chunks
//! - **NUT**: NTP3 texture containers embedded in texture chunks

mod error;

pub mod binary;
pub mod nucc;
pub mod nud;
pub mod nut;
pub mod xfbin;

// Re-export unified error type
pub use error::{DecodeWarning, FileType, WarningKind, XfbinError};

// Re-export main types
pub use nucc::{Chunk, ChunkKey, ChunkView};
pub use nud::{Mesh, MeshGroup, Nud, Vertex};
pub use nut::{Nut, NutTexture, PixelFormat};
pub use xfbin::{ChunkRegistry, Document, Page, ParseConfig, XfbinReader, XfbinWriter};
