#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `xfbin-rs` reads and writes CyberConnect2 XFBIN containers, together with
//! the NUD meshes and NUT textures embedded in them.
//!
//! ```no_run
//! use xfbin_rs::prelude::*;
//!
//! let data = std::fs::read("1nrtbod1.xfbin").unwrap();
//! let document = XfbinReader::new(ChunkRegistry::with_builtin(), ParseConfig::default())
//!     .read(&data)
//!     .unwrap();
//! for page in document.pages() {
//!     println!("{} chunks", page.chunks().len());
//! }
//! ```
pub use xfbin_internal::*;
