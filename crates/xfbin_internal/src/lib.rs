//! This crate backs the `xfbin-rs` facade, and should not be used directly.

/// `use xfbin_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export xfbin_types for convenience
pub use xfbin_types;

// Re-export commonly used types at crate root
pub use xfbin_types::file::xfbin::{decode, encode};
pub use xfbin_types::file::{ChunkRegistry, Document, ParseConfig, XfbinError, XfbinReader, XfbinWriter};
