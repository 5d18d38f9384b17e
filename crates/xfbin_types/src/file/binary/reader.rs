//! Cursor over an in-memory big-endian buffer.

use half::f16;

use super::Primitive;
use crate::file::{FileType, XfbinError};

/// Random-access reader over a borrowed byte slice
///
/// Every failed read reports [`XfbinError::Truncated`] tagged with the
/// [`FileType`] the reader was created for, so callers can tell which nested
/// structure ran out of data.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
	data: &'a [u8],
	pos: usize,
	file_type: FileType,
}

impl<'a> ByteReader<'a> {
	/// Creates a reader positioned at the start of `data`
	pub fn new(data: &'a [u8], file_type: FileType) -> Self {
		Self {
			data,
			pos: 0,
			file_type,
		}
	}

	/// Current offset from the start of the buffer
	pub fn position(&self) -> usize {
		self.pos
	}

	/// Total length of the underlying buffer
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns `true` if the underlying buffer is empty
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Number of bytes left after the cursor
	pub fn remaining(&self) -> usize {
		self.data.len().saturating_sub(self.pos)
	}

	/// The structure this reader reports errors for
	pub fn file_type(&self) -> FileType {
		self.file_type
	}

	/// Moves the cursor to an absolute offset
	pub fn seek(&mut self, pos: usize) -> Result<(), XfbinError> {
		if pos > self.data.len() {
			return Err(self.truncated(pos, 0));
		}
		self.pos = pos;
		Ok(())
	}

	/// Advances the cursor without reading
	pub fn skip(&mut self, count: usize) -> Result<(), XfbinError> {
		self.bytes(count).map(|_| ())
	}

	/// Reads any [`Primitive`] value
	pub fn read<T: Primitive>(&mut self) -> Result<T, XfbinError> {
		let (value, consumed) = T::decode(self.data, self.pos).map_err(|_| self.truncated(self.pos, T::SIZE))?;
		self.pos += consumed;
		Ok(value)
	}

	/// Reads a u8
	pub fn u8(&mut self) -> Result<u8, XfbinError> {
		self.read()
	}

	/// Reads an i8
	pub fn i8(&mut self) -> Result<i8, XfbinError> {
		self.read()
	}

	/// Reads a big-endian u16
	pub fn u16(&mut self) -> Result<u16, XfbinError> {
		self.read()
	}

	/// Reads a big-endian i16
	pub fn i16(&mut self) -> Result<i16, XfbinError> {
		self.read()
	}

	/// Reads a big-endian u32
	pub fn u32(&mut self) -> Result<u32, XfbinError> {
		self.read()
	}

	/// Reads a big-endian i32
	pub fn i32(&mut self) -> Result<i32, XfbinError> {
		self.read()
	}

	/// Reads a big-endian u64
	pub fn u64(&mut self) -> Result<u64, XfbinError> {
		self.read()
	}

	/// Reads a big-endian IEEE single
	pub fn f32(&mut self) -> Result<f32, XfbinError> {
		self.read()
	}

	/// Reads a big-endian IEEE half and widens it to f32
	pub fn f16(&mut self) -> Result<f32, XfbinError> {
		self.read::<f16>().map(f16::to_f32)
	}

	/// Reads `N` consecutive f32 values
	pub fn f32_array<const N: usize>(&mut self) -> Result<[f32; N], XfbinError> {
		let mut values = [0.0; N];
		for value in &mut values {
			*value = self.f32()?;
		}
		Ok(values)
	}

	/// Reads `N` consecutive half floats, widened to f32
	pub fn f16_array<const N: usize>(&mut self) -> Result<[f32; N], XfbinError> {
		let mut values = [0.0; N];
		for value in &mut values {
			*value = self.f16()?;
		}
		Ok(values)
	}

	/// Borrows the next `count` bytes
	pub fn bytes(&mut self, count: usize) -> Result<&'a [u8], XfbinError> {
		if self.remaining() < count {
			return Err(self.truncated(self.pos, count));
		}
		let slice = &self.data[self.pos..self.pos + count];
		self.pos += count;
		Ok(slice)
	}

	/// Reads a fixed-size byte array
	pub fn array<const N: usize>(&mut self) -> Result<[u8; N], XfbinError> {
		let mut out = [0u8; N];
		out.copy_from_slice(self.bytes(N)?);
		Ok(out)
	}

	/// Reads a NUL-terminated UTF-8 string and consumes the terminator
	pub fn cstring(&mut self) -> Result<String, XfbinError> {
		let rest = &self.data[self.pos.min(self.data.len())..];
		let Some(end) = rest.iter().position(|&b| b == 0) else {
			return Err(self.truncated(self.pos, rest.len() + 1));
		};
		let text = std::str::from_utf8(&rest[..end])
			.map_err(|e| XfbinError::invalid_data(self.file_type, format!("invalid string at {:#X}: {e}", self.pos)))?
			.to_owned();
		self.pos += end + 1;
		Ok(text)
	}

	/// Reads a NUL-terminated string at an absolute offset without moving the cursor
	pub fn cstring_at(&self, offset: usize) -> Result<String, XfbinError> {
		let mut probe = self.clone();
		probe.seek(offset)?;
		probe.cstring()
	}

	/// Moves the cursor forward to the next multiple of `alignment`
	pub fn align(&mut self, alignment: usize) -> Result<(), XfbinError> {
		let target = super::align_up(self.pos, alignment);
		self.skip(target - self.pos)
	}

	/// Creates a sub-reader over `count` bytes starting at the cursor, advancing past them
	pub fn sub_reader(&mut self, count: usize, file_type: FileType) -> Result<ByteReader<'a>, XfbinError> {
		Ok(ByteReader::new(self.bytes(count)?, file_type))
	}

	fn truncated(&self, offset: usize, needed: usize) -> XfbinError {
		XfbinError::truncated(self.file_type, offset, needed, self.data.len().saturating_sub(offset))
	}
}
