//! Primitive big-endian binary I/O shared by every format in this crate.
//!
//! All XFBIN structures, and the NUD/NUT payloads nested inside them, are
//! stored big-endian. The [`Primitive`] trait describes one fixed-width value
//! and is the single place where byte order is decided:
//!
//! ```text
//! decode(buf, offset) -> (value, bytes_consumed)
//! encode(value)       -> bytes            (exact left inverse of decode)
//! ```
//!
//! Floats are moved through their bit patterns, so negative zero and NaN
//! payloads survive a round trip unchanged. Half floats use [`half::f16`].

mod reader;
mod strings;
mod writer;

#[cfg(test)]
mod tests;

pub use reader::ByteReader;
pub use strings::{StringTable, read_string_block};
pub use writer::ByteWriter;

use half::f16;

use crate::file::{FileType, XfbinError};

/// A fixed-width value with a defined big-endian encoding
pub trait Primitive: Sized + Copy {
	/// Encoded width in bytes
	const SIZE: usize;

	/// Decodes a value at `offset`, returning it together with the bytes consumed
	fn decode(buf: &[u8], offset: usize) -> Result<(Self, usize), XfbinError>;

	/// Appends the encoded value to `out`
	fn encode(self, out: &mut Vec<u8>);
}

/// Borrows exactly `N` bytes at `offset` or reports how short the buffer is
fn take<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N], XfbinError> {
	let available = buf.len().saturating_sub(offset);
	if available < N {
		return Err(XfbinError::truncated(FileType::Xfbin, offset, N, available));
	}
	let mut bytes = [0u8; N];
	bytes.copy_from_slice(&buf[offset..offset + N]);
	Ok(bytes)
}

macro_rules! impl_primitive {
	($($ty:ty => $size:literal),* $(,)?) => {
		$(
			impl Primitive for $ty {
				const SIZE: usize = $size;

				fn decode(buf: &[u8], offset: usize) -> Result<(Self, usize), XfbinError> {
					let bytes = take::<$size>(buf, offset)?;
					Ok((<$ty>::from_be_bytes(bytes), Self::SIZE))
				}

				fn encode(self, out: &mut Vec<u8>) {
					out.extend_from_slice(&self.to_be_bytes());
				}
			}
		)*
	};
}

impl_primitive!(u8 => 1, i8 => 1, u16 => 2, i16 => 2, u32 => 4, i32 => 4, u64 => 8, i64 => 8);

impl Primitive for f32 {
	const SIZE: usize = 4;

	fn decode(buf: &[u8], offset: usize) -> Result<(Self, usize), XfbinError> {
		let (bits, size) = u32::decode(buf, offset)?;
		Ok((f32::from_bits(bits), size))
	}

	fn encode(self, out: &mut Vec<u8>) {
		self.to_bits().encode(out);
	}
}

impl Primitive for f16 {
	const SIZE: usize = 2;

	fn decode(buf: &[u8], offset: usize) -> Result<(Self, usize), XfbinError> {
		let (bits, size) = u16::decode(buf, offset)?;
		Ok((f16::from_bits(bits), size))
	}

	fn encode(self, out: &mut Vec<u8>) {
		self.to_bits().encode(out);
	}
}

/// Rounds `value` up to the next multiple of `alignment`
pub const fn align_up(value: usize, alignment: usize) -> usize {
	value.div_ceil(alignment) * alignment
}
