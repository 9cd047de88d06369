//! Framing and decoding of whole sections.
//!
//! A [`RawSection`] is a reassembled section buffer together with the length
//! its producer declared for it. Framing it checks that the declared length
//! agrees with the section's own length field and splits it into a
//! [`SectionHeader`], a payload, and a trailing checksum. Decoding then
//! dispatches the payload on the table id to a body decoder, producing an
//! owned [`Section`] with no references back into the buffer.
//!
//! Checksums are only verified when asked: either explicitly with
//! [`RawSection::verify_checksum`], or for every section decoded with
//! [`DecodeOptions::strict`].

use alloc::vec::Vec;
use core::ops::Range;

use tracing::{debug, trace};

use crate::{
    bits::BitCursor,
    check::{self, CHECKSUM_SIZE},
    descriptor::DescriptorRegistry,
    error::DecodeError,
};

pub mod header;
pub mod rct;

pub use header::{HEADER_SIZE, SectionHeader};
pub use rct::RelatedContentSection;

/// A reassembled section and the number of bytes declared for it.
#[derive(Debug, Clone, Copy)]
pub struct RawSection<'a> {
    data: &'a [u8],
    declared_len: usize,
}

impl<'a> RawSection<'a> {
    /// Wrap a buffer whose first `declared_len` bytes hold a section.
    pub fn new(data: &'a [u8], declared_len: usize) -> Self {
        Self { data, declared_len }
    }

    /// Wrap a buffer holding exactly one section.
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::new(data, data.len())
    }

    pub fn declared_len(&self) -> usize {
        self.declared_len
    }

    /// Split the section into its header, payload and checksum.
    pub fn frame(&self) -> Result<FramedSection<'a>, DecodeError> {
        let Some(data) = self.data.get(..self.declared_len) else {
            Err(DecodeError::OutOfBounds {
                requested: self.declared_len.saturating_mul(8),
                available: self.data.len() * 8,
            })?
        };

        let header = SectionHeader::read(data)?;

        let total = header.total_len();
        if total > self.data.len() {
            Err(DecodeError::OutOfBounds {
                requested: total * 8,
                available: self.data.len() * 8,
            })?;
        }

        if total != data.len() {
            Err(DecodeError::LengthMismatch {
                expected: data.len() * 8,
                actual: total * 8,
            })?;
        }

        const MINIMUM: usize = HEADER_SIZE + CHECKSUM_SIZE;
        if total < MINIMUM {
            Err(DecodeError::TruncatedHeader {
                length: total,
                required: MINIMUM,
            })?;
        }

        Ok(FramedSection { header, data })
    }

    /// Verify the section's trailing checksum.
    pub fn verify_checksum(&self) -> Result<(), DecodeError> {
        self.frame()?.verify_checksum()
    }
}

/// A section split into its header, payload and checksum.
#[derive(Debug, Clone, Copy)]
pub struct FramedSection<'a> {
    pub header: SectionHeader,
    data: &'a [u8],
}

impl<'a> FramedSection<'a> {
    /// The bytes of the whole section.
    pub fn bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Byte range of the payload within the section.
    pub fn payload_range(&self) -> Range<usize> {
        self.header.payload_range()
    }

    pub fn payload(&self) -> &'a [u8] {
        let data = self.data;
        &data[self.payload_range()]
    }

    pub fn checksum_bytes(&self) -> [u8; CHECKSUM_SIZE] {
        let mut checksum = [0; CHECKSUM_SIZE];
        checksum.copy_from_slice(&self.data[self.header.checksum_range()]);
        checksum
    }

    pub fn checksum(&self) -> u32 {
        u32::from_be_bytes(self.checksum_bytes())
    }

    pub fn verify_checksum(&self) -> Result<(), DecodeError> {
        check::verify(self.data)
    }
}

/// Options controlling how sections are decoded.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions<'r> {
    /// Decoders for descriptor loops.
    pub registry: &'r DescriptorRegistry,
    /// Reject sections whose checksum does not match their contents.
    pub verify_checksum: bool,
}

impl DecodeOptions<'static> {
    /// Decode with the standard registry, verifying checksums.
    pub fn strict() -> Self {
        Self {
            verify_checksum: true,
            ..Self::default()
        }
    }
}

impl Default for DecodeOptions<'static> {
    fn default() -> Self {
        Self {
            registry: DescriptorRegistry::standard(),
            verify_checksum: false,
        }
    }
}

/// A decoded section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub header: SectionHeader,
    pub body: SectionBody,
    pub checksum: u32,
}

impl Section {
    /// The table id extension, which related content sections use as a
    /// service id.
    pub fn service_id(&self) -> u16 {
        self.header.table_id_extension
    }
}

/// The table-specific contents of a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    RelatedContent(RelatedContentSection),
    /// The payload of a section with no body decoder.
    Unparsed(Vec<u8>),
}

/// Decode a section with the default options.
///
/// See [`decode_with`].
pub fn decode(raw: &RawSection<'_>) -> Result<Section, DecodeError> {
    decode_with(raw, &DecodeOptions::default())
}

/// Decode a section.
///
/// The payload must be consumed exactly by its body decoder. Any failure is
/// returned whole; no partially decoded section is produced.
pub fn decode_with(
    raw: &RawSection<'_>,
    options: &DecodeOptions<'_>,
) -> Result<Section, DecodeError> {
    let framed = raw.frame()?;
    let header = framed.header;

    decode_framed(&framed, options)
        .inspect(|_| {
            trace!(table_id = header.table_id, length = header.total_len(), "decoded section");
        })
        .inspect_err(|err| {
            debug!(table_id = header.table_id, %err, "section failed to decode");
        })
}

fn decode_framed(
    framed: &FramedSection<'_>,
    options: &DecodeOptions<'_>,
) -> Result<Section, DecodeError> {
    if options.verify_checksum {
        framed.verify_checksum()?;
    }

    let mut cursor = BitCursor::from_slice(framed.payload());

    let body = match framed.header.table_id {
        rct::TABLE_ID => {
            SectionBody::RelatedContent(RelatedContentSection::decode(&mut cursor, options.registry)?)
        }
        _ => SectionBody::Unparsed(cursor.read_remaining()?),
    };

    cursor.finish()?;

    Ok(Section {
        header: framed.header,
        body,
        checksum: framed.checksum(),
    })
}

/// Decode independent sections, one result per section.
///
/// A section failing to decode does not prevent the decoding of those
/// following it.
pub fn decode_all<'a>(
    sections: impl IntoIterator<Item = RawSection<'a>>,
    options: &DecodeOptions<'_>,
) -> Vec<Result<Section, DecodeError>> {
    sections
        .into_iter()
        .map(|raw| decode_with(&raw, options))
        .collect()
}
