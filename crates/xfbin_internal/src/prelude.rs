//! Prelude module for `xfbin_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use xfbin_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let mut document = Document::new();
//! let mut clump = Clump::new("c/1nrt/max/1nrtbod1.max", "1nrtbod1");
//! clump.add_coord(Coord::new("c/1nrt/max/1nrtbod1.max", "trall"), None);
//! document.add_clump_page(clump);
//!
//! let bytes = XfbinWriter::default().write(&document).unwrap();
//! let decoded = XfbinReader::default().read(&bytes).unwrap();
//! assert_eq!(decoded, document);
//! ```

// Re-export everything from xfbin_types::prelude
#[doc(inline)]
pub use xfbin_types::prelude::*;

// Re-export the entire xfbin_types module for advanced usage
#[doc(inline)]
pub use xfbin_types;
