//! Related content sections (ETSI TS 102 323, clause 10.4).
//!
//! A related content table links an event or service to other content
//! through a sequence of link records, each naming how the content is
//! related and, depending on its link type, where the content is found.

use alloc::vec::Vec;

use crate::{
    bits::{BitCursor, FromBits, LanguageCode, Text},
    descriptor::{DescriptorLoop, DescriptorRegistry},
    error::DecodeError,
    lookup::{Entry, LookupTable},
};

/// Table id of related content sections.
pub const TABLE_ID: u8 = 0x76;

/// Link information is a URI string only.
pub const LINK_URI: u8 = 0x0;
/// Link information is a binary locator only.
pub const LINK_BINARY_LOCATOR: u8 = 0x1;
/// Link information is both a binary locator and a URI string.
pub const LINK_BINARY_LOCATOR_AND_URI: u8 = 0x2;
/// Link information is carried in a descriptor.
pub const LINK_DESCRIPTOR: u8 = 0x3;

/// The body of a related content section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedContentSection {
    pub year_offset: u16,
    pub links: Vec<LinkInfo>,
    pub descriptors: DescriptorLoop,
}

impl RelatedContentSection {
    /// Decode a section body from a cursor over its payload.
    pub fn decode(c: &mut BitCursor<'_>, registry: &DescriptorRegistry) -> Result<Self, DecodeError> {
        let year_offset = c.read_bits(16)? as u16;
        let link_count = c.read_bits(8)? as usize;

        let mut links = Vec::with_capacity(link_count);
        for _ in 0..link_count {
            c.skip_bits(4)?;
            let link_info_length = c.read_bits(12)? as usize;

            links.push(c.read_scoped(link_info_length, |c| LinkInfo::decode(c, registry))?);
        }

        c.skip_bits(4)?;
        let descriptor_loop_length = c.read_bits(12)? as usize;
        let descriptors = registry.decode_loop(c, descriptor_loop_length)?;

        Ok(Self {
            year_offset,
            links,
            descriptors,
        })
    }
}

/// A link to related content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    /// Declared length of the record in bytes.
    pub length: usize,
    pub link_type: u8,
    pub how_related_classification_scheme_id: u8,
    pub term_id: u16,
    pub group_id: u8,
    pub precedence: u8,
    /// Present for link types carrying a URI.
    pub media_uri: Option<Vec<u8>>,
    pub promotional_items: Vec<PromotionalText>,
    pub default_icon_flag: bool,
    pub icon_id: u8,
    pub descriptors: DescriptorLoop,
}

impl LinkInfo {
    /// Decode a link record from a cursor bounded to it.
    pub fn decode(c: &mut BitCursor<'_>, registry: &DescriptorRegistry) -> Result<Self, DecodeError> {
        let length = c.remaining_bytes();

        let link_type = c.read_bits(4)? as u8;
        c.skip_bits(2)?;
        let how_related_classification_scheme_id = c.read_bits(6)? as u8;
        let term_id = c.read_bits(12)? as u16;
        let group_id = c.read_bits(4)? as u8;
        let precedence = c.read_bits(4)? as u8;

        // The layout of dvb_binary_locator() is not decoded, and skipping it
        // would misplace every field after it.
        if matches!(link_type, LINK_BINARY_LOCATOR | LINK_BINARY_LOCATOR_AND_URI) {
            Err(DecodeError::UnsupportedFeature("dvb_binary_locator"))?;
        }

        let media_uri = match link_type {
            LINK_URI => Some(c.read_length_prefixed_text()?.into_bytes()),
            _ => None,
        };

        c.skip_bits(2)?;
        let number_items = c.read_bits(6)? as usize;
        let promotional_items = (0..number_items)
            .map(|_| PromotionalText::from_bits(c))
            .collect::<Result<Vec<_>, _>>()?;

        let default_icon_flag = c.read_flag()?;
        let icon_id = c.read_bits(3)? as u8;
        let descriptor_loop_length = c.read_bits(12)? as usize;
        let descriptors = registry.decode_loop(c, descriptor_loop_length)?;

        Ok(Self {
            length,
            link_type,
            how_related_classification_scheme_id,
            term_id,
            group_id,
            precedence,
            media_uri,
            promotional_items,
            default_icon_flag,
            icon_id,
            descriptors,
        })
    }

    pub fn link_type_name(&self) -> &'static str {
        LINK_TYPES.get(self.link_type.into())
    }

    pub fn classification_scheme_name(&self) -> &'static str {
        HOW_RELATED_SCHEMES.get(self.how_related_classification_scheme_id.into())
    }
}

/// Promotional text in a single language.
#[derive(Debug, Clone, PartialEq, Eq, FromBits)]
pub struct PromotionalText {
    #[bytes(3)]
    pub language: LanguageCode,
    #[text]
    pub text: Text,
}

/// Meanings of `link_type`.
pub static LINK_TYPES: LookupTable = LookupTable::new(&[
    Entry::single(0x0, "Link information is a URI string only"),
    Entry::single(0x1, "Link information is a binary locator only"),
    Entry::single(0x2, "Link information is both a binary locator and a URI string"),
    Entry::single(0x3, "Link information is through means of a descriptor"),
    Entry::range(0x4, 0xF, "DVB reserved"),
]);

/// Meanings of `how_related_classification_scheme_id`.
pub static HOW_RELATED_SCHEMES: LookupTable = LookupTable::new(&[
    Entry::single(0x00, "urn:tva:metadata:HowRelatedCS:2004, clause A.3"),
    Entry::single(0x01, "urn:tva:metadata:HowRelatedCS:2005, clause A.3"),
    Entry::single(0x02, "urn:tva:metadata:HowRelatedCS:2007, clause A.3"),
    Entry::range(0x03, 0x2F, "DVB reserved"),
    Entry::range(0x30, 0x3F, "User Private"),
]);
