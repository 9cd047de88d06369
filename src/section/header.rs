//! The header common to every section.

use core::ops::Range;

use tartan_bitfield::bitfield;
use zerocopy::FromBytes;

use crate::{
    check::CHECKSUM_SIZE,
    error::DecodeError,
    lookup::{Entry, LookupTable},
};

/// Size of the fixed header, from the table id to the last section number.
pub const HEADER_SIZE: usize = 8;

/// Bytes preceding the first byte counted by `section_length`.
pub const LENGTH_OFFSET: usize = 3;

/// Fields common to every section using the long form of the section syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionHeader {
    pub table_id: u8,
    pub section_syntax_indicator: bool,
    pub private_indicator: bool,
    /// Number of bytes following the length field, checksum included.
    pub section_length: u16,
    /// A table-specific identifier, such as a service id.
    pub table_id_extension: u16,
    pub version_number: u8,
    pub current_next_indicator: bool,
    pub section_number: u8,
    pub last_section_number: u8,
}

impl SectionHeader {
    /// Decode a section header from its fixed bytes.
    pub fn parse(r: [u8; HEADER_SIZE]) -> Self {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct FixedHeader {
            table_id: u8,
            length: [u8; 2],
            table_id_extension: [u8; 2],
            version: u8,
            section_number: u8,
            last_section_number: u8,
        }

        let FixedHeader {
            table_id,
            length,
            table_id_extension,
            version,
            section_number,
            last_section_number,
        } = zerocopy::transmute!(r);

        bitfield! {
            struct LengthField(u16) {
                [0..12] section_length: u16,
                [14] private_indicator,
                [15] section_syntax_indicator,
            }
        }

        bitfield! {
            struct VersionField(u8) {
                [0] current_next_indicator,
                [1..6] version_number: u8,
            }
        }

        let length = LengthField(u16::from_be_bytes(length));
        let version = VersionField(version);

        Self {
            table_id,
            section_syntax_indicator: length.section_syntax_indicator(),
            private_indicator: length.private_indicator(),
            section_length: length.section_length(),
            table_id_extension: u16::from_be_bytes(table_id_extension),
            version_number: version.version_number(),
            current_next_indicator: version.current_next_indicator(),
            section_number,
            last_section_number,
        }
    }

    /// Decode a section header from the front of a buffer.
    pub fn read(r: &[u8]) -> Result<Self, DecodeError> {
        let Some(fixed) = r.first_chunk::<HEADER_SIZE>() else {
            Err(DecodeError::TruncatedHeader {
                length: r.len(),
                required: HEADER_SIZE,
            })?
        };

        Ok(Self::parse(*fixed))
    }

    /// Size of the whole section in bytes, from the table id to the end of
    /// the checksum.
    pub fn total_len(&self) -> usize {
        LENGTH_OFFSET + self.section_length as usize
    }

    /// Byte range of the table-specific payload, between the header and the
    /// checksum.
    pub fn payload_range(&self) -> Range<usize> {
        let end = self.total_len().saturating_sub(CHECKSUM_SIZE).max(HEADER_SIZE);
        HEADER_SIZE..end
    }

    /// Byte range of the trailing checksum.
    pub fn checksum_range(&self) -> Range<usize> {
        self.payload_range().end..self.total_len()
    }

    /// A description of this section's table id.
    pub fn table_name(&self) -> &'static str {
        TABLE_IDS.get(self.table_id.into())
    }
}

/// Names of table ids (EN 300 468, table 2).
pub static TABLE_IDS: LookupTable = LookupTable::new(&[
    Entry::single(0x00, "program_association_section"),
    Entry::single(0x01, "conditional_access_section"),
    Entry::single(0x02, "program_map_section"),
    Entry::single(0x03, "transport_stream_description_section"),
    Entry::range(0x04, 0x3F, "reserved"),
    Entry::single(0x40, "network_information_section - actual_network"),
    Entry::single(0x41, "network_information_section - other_network"),
    Entry::single(0x42, "service_description_section - actual_transport_stream"),
    Entry::range(0x43, 0x45, "reserved for future use"),
    Entry::single(0x46, "service_description_section - other_transport_stream"),
    Entry::range(0x47, 0x49, "reserved for future use"),
    Entry::single(0x4A, "bouquet_association_section"),
    Entry::single(0x4B, "update_notification_table_section"),
    Entry::single(0x4C, "IP/MAC_notification_section"),
    Entry::single(0x4D, "reserved for future use"),
    Entry::single(0x4E, "event_information_section - actual_transport_stream, present/following"),
    Entry::single(0x4F, "event_information_section - other_transport_stream, present/following"),
    Entry::range(0x50, 0x5F, "event_information_section - actual_transport_stream, schedule"),
    Entry::range(0x60, 0x6F, "event_information_section - other_transport_stream, schedule"),
    Entry::single(0x70, "time_date_section"),
    Entry::single(0x71, "running_status_section"),
    Entry::single(0x72, "stuffing_section"),
    Entry::single(0x73, "time_offset_section"),
    Entry::single(0x74, "application information section"),
    Entry::single(0x75, "container section"),
    Entry::single(0x76, "related content section"),
    Entry::single(0x77, "content identifier section"),
    Entry::single(0x78, "MPE-FEC section"),
    Entry::single(0x79, "resolution provider notification section"),
    Entry::single(0x7A, "MPE-IFEC section"),
    Entry::range(0x7B, 0x7D, "reserved for future use"),
    Entry::single(0x7E, "discontinuity_information_section"),
    Entry::single(0x7F, "selection_information_section"),
    Entry::range(0x80, 0xFE, "user defined"),
    Entry::single(0xFF, "reserved"),
]);
