//! Descriptors defined by ETSI EN 300 468 and TS 102 323.

use crate::{
    bits::{BitCursor, FromBits, LanguageCode, Text},
    error::DecodeError,
    lookup::{Entry, LookupTable},
};

use super::Descriptor;

pub const ISO_639_LANGUAGE: u8 = 0x0A;
pub const NETWORK_NAME: u8 = 0x40;
pub const SERVICE: u8 = 0x48;
pub const SHORT_EVENT: u8 = 0x4D;
pub const STREAM_IDENTIFIER: u8 = 0x52;
pub const CONTENT: u8 = 0x54;
pub const PARENTAL_RATING: u8 = 0x55;
pub const PRIVATE_DATA_SPECIFIER: u8 = 0x5F;
pub const CONTENT_IDENTIFIER: u8 = 0x76;

/// An entry of an ISO 639 language descriptor.
#[derive(Debug, Clone, PartialEq, Eq, FromBits)]
pub struct LanguageEntry {
    #[bytes(3)]
    pub language: LanguageCode,
    #[bits(8)]
    pub audio_type: u8,
}

pub fn decode_iso_639_language(c: &mut BitCursor<'_>) -> Result<Descriptor, DecodeError> {
    Ok(Descriptor::Iso639Language(c.read_until_end()?))
}

pub fn decode_network_name(c: &mut BitCursor<'_>) -> Result<Descriptor, DecodeError> {
    Ok(Descriptor::NetworkName(c.read_remaining()?.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, FromBits)]
pub struct ServiceDescriptor {
    #[bits(8)]
    pub service_type: u8,
    #[text]
    pub provider_name: Text,
    #[text]
    pub service_name: Text,
}

impl ServiceDescriptor {
    pub fn service_type_name(&self) -> &'static str {
        SERVICE_TYPES.get(self.service_type.into())
    }
}

pub fn decode_service(c: &mut BitCursor<'_>) -> Result<Descriptor, DecodeError> {
    Ok(Descriptor::Service(ServiceDescriptor::from_bits(c)?))
}

#[derive(Debug, Clone, PartialEq, Eq, FromBits)]
pub struct ShortEventDescriptor {
    #[bytes(3)]
    pub language: LanguageCode,
    #[text]
    pub event_name: Text,
    #[text]
    pub text: Text,
}

pub fn decode_short_event(c: &mut BitCursor<'_>) -> Result<Descriptor, DecodeError> {
    Ok(Descriptor::ShortEvent(ShortEventDescriptor::from_bits(c)?))
}

#[derive(Debug, Clone, PartialEq, Eq, FromBits)]
pub struct StreamIdentifierDescriptor {
    #[bits(8)]
    pub component_tag: u8,
}

pub fn decode_stream_identifier(c: &mut BitCursor<'_>) -> Result<Descriptor, DecodeError> {
    Ok(Descriptor::StreamIdentifier(StreamIdentifierDescriptor::from_bits(c)?))
}

/// A genre classification of a content descriptor.
#[derive(Debug, Clone, PartialEq, Eq, FromBits)]
pub struct ContentClassification {
    #[bits(4)]
    pub level_1: u8,
    #[bits(4)]
    pub level_2: u8,
    #[bits(8)]
    pub user_byte: u8,
}

pub fn decode_content(c: &mut BitCursor<'_>) -> Result<Descriptor, DecodeError> {
    Ok(Descriptor::Content(c.read_until_end()?))
}

#[derive(Debug, Clone, PartialEq, Eq, FromBits)]
pub struct ParentalRating {
    #[bytes(3)]
    pub country: LanguageCode,
    #[bits(8)]
    pub rating: u8,
}

impl ParentalRating {
    /// Minimum recommended age, for ratings defined by the broadcaster's
    /// standard rather than privately.
    pub fn minimum_age(&self) -> Option<u8> {
        matches!(self.rating, 0x01..=0x0F).then(|| self.rating + 3)
    }
}

pub fn decode_parental_rating(c: &mut BitCursor<'_>) -> Result<Descriptor, DecodeError> {
    Ok(Descriptor::ParentalRating(c.read_until_end()?))
}

#[derive(Debug, Clone, PartialEq, Eq, FromBits)]
pub struct PrivateDataSpecifierDescriptor {
    #[bits(32)]
    pub private_data_specifier: u32,
}

pub fn decode_private_data_specifier(c: &mut BitCursor<'_>) -> Result<Descriptor, DecodeError> {
    Ok(Descriptor::PrivateDataSpecifier(
        PrivateDataSpecifierDescriptor::from_bits(c)?,
    ))
}

/// A content reference identifier (CRID) of a content identifier
/// descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentIdentifier {
    pub crid_type: u8,
    pub location: CridLocation,
}

/// Where a CRID is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CridLocation {
    /// The CRID is carried in the descriptor.
    Carried(Text),
    /// The CRID is carried in a content identifier table, under this
    /// reference.
    Referenced(u16),
}

impl FromBits for ContentIdentifier {
    fn from_bits(c: &mut BitCursor<'_>) -> Result<Self, DecodeError> {
        let crid_type = c.read_bits(6)? as u8;
        let crid_location = c.read_bits(2)?;

        let location = match crid_location {
            0b00 => CridLocation::Carried(c.read_length_prefixed_text()?),
            0b01 => CridLocation::Referenced(c.read_bits(16)? as u16),
            _ => Err(DecodeError::UnsupportedFeature("reserved crid_location"))?,
        };

        Ok(Self {
            crid_type,
            location,
        })
    }
}

pub fn decode_content_identifier(c: &mut BitCursor<'_>) -> Result<Descriptor, DecodeError> {
    Ok(Descriptor::ContentIdentifier(c.read_until_end()?))
}

/// Meanings of `crid_location` (TS 102 323, table 124).
pub static CRID_LOCATIONS: LookupTable = LookupTable::new(&[
    Entry::single(0x0, "Carried explicitly within descriptor"),
    Entry::single(0x1, "Carried in Content Identifier Table (CIT)"),
    Entry::range(0x2, 0x3, "DVB reserved"),
]);

/// Meanings of `service_type` (EN 300 468, table 87).
pub static SERVICE_TYPES: LookupTable = LookupTable::new(&[
    Entry::single(0x00, "reserved for future use"),
    Entry::single(0x01, "digital television service"),
    Entry::single(0x02, "digital radio sound service"),
    Entry::single(0x03, "Teletext service"),
    Entry::single(0x04, "NVOD reference service"),
    Entry::single(0x05, "NVOD time-shifted service"),
    Entry::single(0x06, "mosaic service"),
    Entry::single(0x07, "FM radio service"),
    Entry::single(0x08, "DVB SRM service"),
    Entry::single(0x09, "reserved for future use"),
    Entry::single(0x0A, "advanced codec digital radio sound service"),
    Entry::single(0x0B, "H.264/AVC mosaic service"),
    Entry::single(0x0C, "data broadcast service"),
    Entry::single(0x0D, "reserved for Common Interface Usage"),
    Entry::single(0x0E, "RCS Map"),
    Entry::single(0x0F, "RCS FLS"),
    Entry::single(0x10, "DVB MHP service"),
    Entry::single(0x11, "MPEG-2 HD digital television service"),
    Entry::range(0x12, 0x15, "reserved for future use"),
    Entry::single(0x16, "H.264/AVC SD digital television service"),
    Entry::single(0x17, "H.264/AVC SD NVOD time-shifted service"),
    Entry::single(0x18, "H.264/AVC SD NVOD reference service"),
    Entry::single(0x19, "H.264/AVC HD digital television service"),
    Entry::single(0x1A, "H.264/AVC HD NVOD time-shifted service"),
    Entry::single(0x1B, "H.264/AVC HD NVOD reference service"),
    Entry::single(0x1C, "H.264/AVC frame compatible plano-stereoscopic HD digital television service"),
    Entry::single(0x1D, "H.264/AVC frame compatible plano-stereoscopic HD NVOD time-shifted service"),
    Entry::single(0x1E, "H.264/AVC frame compatible plano-stereoscopic HD NVOD reference service"),
    Entry::single(0x1F, "HEVC digital television service"),
    Entry::range(0x20, 0x7F, "reserved for future use"),
    Entry::range(0x80, 0xFE, "user defined"),
    Entry::single(0xFF, "reserved for future use"),
]);
