//! Growable big-endian output buffer.

use half::f16;

use super::{Primitive, align_up};

/// Big-endian writer that owns its output buffer
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
	buf: Vec<u8>,
}

impl ByteWriter {
	/// Creates an empty writer
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty writer with reserved capacity
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			buf: Vec::with_capacity(capacity),
		}
	}

	/// Reserves room for at least `additional` more bytes
	pub fn reserve(&mut self, additional: usize) {
		self.buf.reserve(additional);
	}

	/// Number of bytes written so far
	pub fn position(&self) -> usize {
		self.buf.len()
	}

	/// Writes any [`Primitive`] value
	pub fn write<T: Primitive>(&mut self, value: T) {
		value.encode(&mut self.buf);
	}

	/// Writes a u8
	pub fn u8(&mut self, value: u8) {
		self.write(value);
	}

	/// Writes an i8
	pub fn i8(&mut self, value: i8) {
		self.write(value);
	}

	/// Writes a big-endian u16
	pub fn u16(&mut self, value: u16) {
		self.write(value);
	}

	/// Writes a big-endian i16
	pub fn i16(&mut self, value: i16) {
		self.write(value);
	}

	/// Writes a big-endian u32
	pub fn u32(&mut self, value: u32) {
		self.write(value);
	}

	/// Writes a big-endian i32
	pub fn i32(&mut self, value: i32) {
		self.write(value);
	}

	/// Writes a big-endian u64
	pub fn u64(&mut self, value: u64) {
		self.write(value);
	}

	/// Writes a big-endian IEEE single
	pub fn f32(&mut self, value: f32) {
		self.write(value);
	}

	/// Narrows `value` to an IEEE half and writes it
	pub fn f16(&mut self, value: f32) {
		self.write(f16::from_f32(value));
	}

	/// Writes a slice of f32 values
	pub fn f32_slice(&mut self, values: &[f32]) {
		for &value in values {
			self.f32(value);
		}
	}

	/// Writes a slice of f32 values narrowed to halves
	pub fn f16_slice(&mut self, values: &[f32]) {
		for &value in values {
			self.f16(value);
		}
	}

	/// Writes raw bytes
	pub fn bytes(&mut self, data: &[u8]) {
		self.buf.extend_from_slice(data);
	}

	/// Writes a string followed by a NUL terminator
	pub fn cstring(&mut self, text: &str) {
		self.buf.extend_from_slice(text.as_bytes());
		self.buf.push(0);
	}

	/// Writes `count` zero bytes
	pub fn zeros(&mut self, count: usize) {
		self.buf.resize(self.buf.len() + count, 0);
	}

	/// Pads with zeros up to the next multiple of `alignment`
	pub fn align(&mut self, alignment: usize) {
		let target = align_up(self.buf.len(), alignment);
		self.buf.resize(target, 0);
	}

	/// Overwrites a previously written u32 at `offset`
	///
	/// Used to back-patch sizes and offsets once the data after them is known.
	pub fn patch_u32(&mut self, offset: usize, value: u32) {
		self.buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
	}

	/// Overwrites a previously written u16 at `offset`
	pub fn patch_u16(&mut self, offset: usize, value: u16) {
		self.buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
	}

	/// Borrows the bytes written so far
	pub fn as_slice(&self) -> &[u8] {
		&self.buf
	}

	/// Consumes the writer and returns its buffer
	pub fn into_inner(self) -> Vec<u8> {
		self.buf
	}
}
