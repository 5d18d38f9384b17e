//! This crate provides the data types and codecs of the `xfbin-rs` project.
//!
//! # File Formats
//!
//! - **XFBIN**: CyberConnect2 chunk container holding pages of `nucc` chunks
//! - **NUD**: NDP3 mesh container embedded in `nuccChunkModel`
//! - **NUT**: NTP3 texture container embedded in `nuccChunkTexture`, exportable as DDS
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use xfbin_types::prelude::*;
//!
//! let data = std::fs::read("1nrtbod1.xfbin").unwrap();
//! let document = XfbinReader::new(ChunkRegistry::with_builtin(), ParseConfig::default())
//!     .read(&data)
//!     .unwrap();
//!
//! for clump in document.get_chunks_by_type("nuccChunkClump") {
//!     println!("{}", clump.key());
//! }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use xfbin_types::file::xfbin;
//!
//! let document = xfbin::decode(&std::fs::read("1nrtbod1.xfbin").unwrap()).unwrap();
//! let bytes = xfbin::encode(&document).unwrap();
//! ```

pub mod convert;
pub mod file;

/// `use xfbin_types::prelude::*;` to import commonly used items.
pub mod prelude;
