//! Dispatch of descriptor payloads to decoders by tag.

use alloc::vec::Vec;
use core::fmt;

use tracing::{debug, trace};

use crate::{bits::BitCursor, error::DecodeError};

use super::{DESCRIPTOR_HEADER_SIZE, Descriptor, DescriptorLoop, UnknownDescriptor, dvb};

/// Decode a descriptor payload.
///
/// The cursor is bounded to the payload. A decoder must consume the whole
/// payload.
pub type DecodeFn = fn(&mut BitCursor<'_>) -> Result<Descriptor, DecodeError>;

/// A mapping from descriptor tags to decoders.
///
/// Registries are immutable once built, and are constructed in `const`
/// context so they may live in `static` items shared between threads:
///
/// ```
/// static REGISTRY: DescriptorRegistry = DescriptorRegistry::empty()
///     .with(0x52, decode_stream_identifier)
///     .with(0x83, decode_logical_channel);
/// ```
#[derive(Clone, Copy)]
pub struct DescriptorRegistry {
    decoders: [Option<DecodeFn>; 256],
}

static STANDARD: DescriptorRegistry = DescriptorRegistry::empty()
    .with(dvb::ISO_639_LANGUAGE, dvb::decode_iso_639_language)
    .with(dvb::NETWORK_NAME, dvb::decode_network_name)
    .with(dvb::SERVICE, dvb::decode_service)
    .with(dvb::SHORT_EVENT, dvb::decode_short_event)
    .with(dvb::STREAM_IDENTIFIER, dvb::decode_stream_identifier)
    .with(dvb::CONTENT, dvb::decode_content)
    .with(dvb::PARENTAL_RATING, dvb::decode_parental_rating)
    .with(dvb::PRIVATE_DATA_SPECIFIER, dvb::decode_private_data_specifier)
    .with(dvb::CONTENT_IDENTIFIER, dvb::decode_content_identifier);

impl DescriptorRegistry {
    /// A registry with no decoders, where every descriptor is unknown.
    pub const fn empty() -> Self {
        Self {
            decoders: [None; 256],
        }
    }

    /// The registry of every descriptor in [`crate::descriptor::dvb`].
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Register a decoder for a tag, replacing any existing decoder.
    pub const fn with(mut self, tag: u8, decoder: DecodeFn) -> Self {
        self.decoders[tag as usize] = Some(decoder);
        self
    }

    /// Retrieve the decoder for a tag, if one is registered.
    pub fn get(&self, tag: u8) -> Option<DecodeFn> {
        self.decoders[tag as usize]
    }

    pub fn is_registered(&self, tag: u8) -> bool {
        self.get(tag).is_some()
    }

    /// Decode a loop of `length` bytes from the tip of a cursor.
    ///
    /// The loop must be filled exactly by whole descriptors. A descriptor
    /// running past the end of the loop fails with
    /// [`DecodeError::LengthMismatch`], and a loop running past the end of
    /// the cursor with [`DecodeError::OutOfBounds`]. On failure the cursor
    /// does not advance.
    pub fn decode_loop(
        &self,
        cursor: &mut BitCursor<'_>,
        length: usize,
    ) -> Result<DescriptorLoop, DecodeError> {
        let descriptors = cursor.read_scoped(length, |scope| self.decode_descriptors(scope))?;

        Ok(DescriptorLoop {
            length,
            descriptors,
        })
    }

    /// Decode a loop filling a whole slice.
    pub fn decode_slice(&self, r: &[u8]) -> Result<DescriptorLoop, DecodeError> {
        self.decode_loop(&mut BitCursor::from_slice(r), r.len())
    }

    /// Decode a single descriptor's payload.
    pub fn decode(&self, tag: u8, payload: &mut BitCursor<'_>) -> Result<Descriptor, DecodeError> {
        match self.get(tag) {
            Some(decode) => decode(payload).inspect_err(|err| {
                debug!(tag, %err, "descriptor failed to decode");
            }),
            None => {
                trace!(tag, length = payload.remaining_bytes(), "unregistered descriptor tag");

                Ok(Descriptor::Unknown(UnknownDescriptor {
                    tag,
                    payload: payload.read_remaining()?,
                }))
            }
        }
    }

    fn decode_descriptors(&self, scope: &mut BitCursor<'_>) -> Result<Vec<Descriptor>, DecodeError> {
        let mut descriptors = Vec::new();

        while scope.remaining_bits() != 0 {
            let expected = scope.position() + scope.remaining_bits();

            // Reject a truncated record before reading any of it.
            if scope.remaining_bytes() < DESCRIPTOR_HEADER_SIZE {
                Err(DecodeError::LengthMismatch {
                    expected,
                    actual: scope.position() + DESCRIPTOR_HEADER_SIZE * 8,
                })?;
            }

            let tag = scope.read_bits(8)? as u8;
            let length = scope.read_bits(8)? as usize;

            if length * 8 > scope.remaining_bits() {
                Err(DecodeError::LengthMismatch {
                    expected,
                    actual: scope.position() + length * 8,
                })?;
            }

            let descriptor = scope.read_scoped(length, |payload| self.decode(tag, payload))?;
            descriptors.push(descriptor);
        }

        Ok(descriptors)
    }
}

impl Default for DescriptorRegistry {
    fn default() -> Self {
        STANDARD
    }
}

impl fmt::Debug for DescriptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags = (0..=u8::MAX).filter(|&tag| self.is_registered(tag));
        f.debug_set().entries(tags).finish()
    }
}
