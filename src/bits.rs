//! Bit-addressable reads over a bounded slice of a section.
//!
//! Section fields are packed most-significant-bit first and rarely fall on
//! byte boundaries, so every read here is expressed in bits. A [`BitCursor`]
//! may never read outside the slice it was constructed over: a read which
//! would do so fails with [`DecodeError::OutOfBounds`] and leaves the cursor
//! where it was.
//!
//! Nested records are decoded through [`BitCursor::read_scoped`], which hands
//! a child cursor bounded to the record's declared length to a decoder, and
//! only advances the parent once the child has been consumed exactly.

use alloc::vec::Vec;
use core::fmt;

use crate::error::DecodeError;

/// Derive [`FromBits`] for a struct of fixed-layout fields.
///
/// Fields are read in declaration order. Each field must carry exactly one
/// layout attribute:
///
/// - `bits(N)`: an unsigned integer of `N` bits (`bool` fields must be one
///   bit wide).
/// - `bytes(N)`: `N` whole bytes, converted from `[u8; N]`.
/// - `text`: a one-byte length followed by that many bytes, converted from
///   [`Text`].
/// - `rest`: every byte remaining in scope, converted from `Vec<u8>`.
/// - `nested`: another type implementing [`FromBits`].
///
/// Reserved bits preceding a field are skipped with `reserved(N)`.
///
/// The generated implementation names `FromBits`, `BitCursor` and
/// `DecodeError` unqualified, so these must be in scope.
///
/// ```
/// #[derive(Debug, FromBits)]
/// struct ContentClassification {
///     #[bits(4)]
///     level_1: u8,
///     #[bits(4)]
///     level_2: u8,
///     #[reserved(7)]
///     #[bits(1)]
///     flag: bool,
/// }
/// ```
pub use sectional_derive::FromBits;

/// Decode a value of fixed layout from the tip of a cursor.
///
/// See the [`FromBits`](macro@FromBits) derive macro for an automatic
/// implementation of this trait.
pub trait FromBits: Sized {
    /// Read this value, advancing the cursor past it.
    fn from_bits(cursor: &mut BitCursor<'_>) -> Result<Self, DecodeError>;
}

/// A read cursor over a bounded, bit-addressed slice of a buffer.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    // Absolute bit offsets into `data`.
    start: usize,
    pos: usize,
    end: usize,
}

impl<'a> BitCursor<'a> {
    /// Create a cursor over `len` bytes of `data`, beginning at byte `offset`.
    pub fn new(data: &'a [u8], offset: usize, len: usize) -> Result<Self, DecodeError> {
        match offset.checked_add(len) {
            Some(end) if end <= data.len() => Ok(Self {
                data,
                start: offset * 8,
                pos: offset * 8,
                end: end * 8,
            }),
            _ => Err(DecodeError::OutOfBounds {
                requested: len.saturating_mul(8),
                available: data.len().saturating_sub(offset) * 8,
            }),
        }
    }

    /// Create a cursor over the whole of `data`.
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self {
            data,
            start: 0,
            pos: 0,
            end: data.len() * 8,
        }
    }

    /// Number of bits left before the end of this cursor's scope.
    pub fn remaining_bits(&self) -> usize {
        self.end - self.pos
    }

    /// Number of whole bytes left before the end of this cursor's scope.
    pub fn remaining_bytes(&self) -> usize {
        self.remaining_bits() / 8
    }

    /// Number of bits consumed since the cursor was created.
    pub fn position(&self) -> usize {
        self.pos - self.start
    }

    pub fn is_byte_aligned(&self) -> bool {
        self.pos % 8 == 0
    }

    /// Read the next `n` bits as an unsigned integer, most significant bit
    /// first.
    ///
    /// # Panics
    ///
    /// If `n` is greater than 32.
    pub fn read_bits(&mut self, n: usize) -> Result<u32, DecodeError> {
        assert!(n <= 32, "cannot read {n} bits into a u32");

        self.require(n)?;
        let value = self.peek(n);
        self.pos += n;

        Ok(value)
    }

    /// Read a single bit as a flag.
    pub fn read_flag(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Advance over `n` bits without interpreting them.
    pub fn skip_bits(&mut self, n: usize) -> Result<(), DecodeError> {
        self.require(n)?;
        self.pos += n;
        Ok(())
    }

    /// Read the next `n` bytes, whether or not the cursor is byte-aligned.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, DecodeError> {
        self.require(n.saturating_mul(8))?;

        let bytes = if self.is_byte_aligned() {
            let i = self.pos / 8;
            self.data[i..i + n].to_vec()
        } else {
            (0..n).map(|k| self.peek_at(self.pos + k * 8, 8) as u8).collect()
        };
        self.pos += n * 8;

        Ok(bytes)
    }

    /// Read the next `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        self.require(N * 8)?;

        let mut array = [0; N];
        for (k, b) in array.iter_mut().enumerate() {
            *b = self.peek_at(self.pos + k * 8, 8) as u8;
        }
        self.pos += N * 8;

        Ok(array)
    }

    /// Read a one-byte length, then that many bytes of text.
    ///
    /// The text is returned undecoded; its character set is left to the
    /// caller.
    pub fn read_length_prefixed_text(&mut self) -> Result<Text, DecodeError> {
        self.require(8)?;
        let length = self.peek(8) as usize;

        // Check the whole read up front so a short text leaves the length in
        // place.
        self.require(8 + length * 8)?;
        self.pos += 8;

        Ok(Text(self.read_bytes(length)?))
    }

    /// Read every whole byte left in scope.
    ///
    /// Trailing bits short of a byte are left unread, to be reported by
    /// [`BitCursor::finish`].
    pub fn read_remaining(&mut self) -> Result<Vec<u8>, DecodeError> {
        self.read_bytes(self.remaining_bytes())
    }

    /// Read values of `T` back-to-back until the scope is exhausted.
    pub fn read_until_end<T: FromBits>(&mut self) -> Result<Vec<T>, DecodeError> {
        let mut values = Vec::new();
        while self.remaining_bits() != 0 {
            values.push(T::from_bits(self)?);
        }
        Ok(values)
    }

    /// Decode a nested record declared to be exactly `len` bytes long.
    ///
    /// `f` receives a cursor bounded to the record. If it fails, or leaves
    /// any of the record unread, the error is returned and this cursor does
    /// not advance.
    pub fn read_scoped<T>(
        &mut self,
        len: usize,
        f: impl FnOnce(&mut BitCursor<'a>) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        let bits = len.saturating_mul(8);
        self.require(bits)?;

        let mut scope = Self {
            data: self.data,
            start: self.pos,
            pos: self.pos,
            end: self.pos + bits,
        };

        let value = f(&mut scope)?;
        scope.finish()?;
        self.pos = scope.end;

        Ok(value)
    }

    /// Require that the whole scope has been consumed.
    pub fn finish(&self) -> Result<(), DecodeError> {
        if self.pos != self.end {
            Err(DecodeError::LengthMismatch {
                expected: self.end - self.start,
                actual: self.position(),
            })?;
        }

        Ok(())
    }

    fn require(&self, n: usize) -> Result<(), DecodeError> {
        let available = self.remaining_bits();
        if n > available {
            Err(DecodeError::OutOfBounds {
                requested: n,
                available,
            })?;
        }

        Ok(())
    }

    fn peek(&self, n: usize) -> u32 {
        self.peek_at(self.pos, n)
    }

    /// Assemble `n` bits starting at absolute bit offset `pos`. Bounds must
    /// already have been checked.
    fn peek_at(&self, mut pos: usize, mut n: usize) -> u32 {
        let mut value = 0u32;

        while n != 0 {
            let bit = pos % 8;
            let take = (8 - bit).min(n);
            let chunk = (self.data[pos / 8] >> (8 - bit - take)) as u32 & ((1 << take) - 1);

            value = (value << take) | chunk;
            pos += take;
            n -= take;
        }

        value
    }
}

/// Undecoded text bytes.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Text(Vec<u8>);

impl Text {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Text {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.escape_ascii())
    }
}

/// A three-letter ISO 639-2 language (or ISO 3166 country) code.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LanguageCode(pub [u8; 3]);

impl LanguageCode {
    pub fn as_bytes(&self) -> &[u8; 3] {
        &self.0
    }

    /// The code as a string, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.0).ok()
    }
}

impl From<[u8; 3]> for LanguageCode {
    fn from(code: [u8; 3]) -> Self {
        Self(code)
    }
}

impl fmt::Debug for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.escape_ascii())
    }
}
