//! Tagged extension records ("descriptors") and the loops carrying them.
//!
//! A descriptor loop is a declared-length run of back-to-back records, each
//! framed as a one-byte tag, a one-byte length, and that many payload bytes.
//! Loops are decoded by a [`DescriptorRegistry`], which dispatches each
//! payload to the decoder registered for its tag. Unregistered tags are kept
//! verbatim as [`Descriptor::Unknown`], so no data is dropped.

use alloc::vec::Vec;

use crate::{
    bits::Text,
    lookup::{Entry, LookupTable},
};

pub mod dvb;
pub mod registry;

pub use registry::{DecodeFn, DescriptorRegistry};

use dvb::{
    ContentClassification, ContentIdentifier, LanguageEntry, ParentalRating,
    PrivateDataSpecifierDescriptor, ServiceDescriptor, ShortEventDescriptor,
    StreamIdentifierDescriptor,
};

/// Size of a descriptor's tag and length.
pub const DESCRIPTOR_HEADER_SIZE: usize = 2;

/// A decoded descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    Iso639Language(Vec<LanguageEntry>),
    NetworkName(Text),
    Service(ServiceDescriptor),
    ShortEvent(ShortEventDescriptor),
    StreamIdentifier(StreamIdentifierDescriptor),
    Content(Vec<ContentClassification>),
    ParentalRating(Vec<ParentalRating>),
    PrivateDataSpecifier(PrivateDataSpecifierDescriptor),
    ContentIdentifier(Vec<ContentIdentifier>),
    /// A descriptor with no registered decoder.
    Unknown(UnknownDescriptor),
}

impl Descriptor {
    /// The tag this descriptor was decoded from.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Iso639Language(_) => dvb::ISO_639_LANGUAGE,
            Self::NetworkName(_) => dvb::NETWORK_NAME,
            Self::Service(_) => dvb::SERVICE,
            Self::ShortEvent(_) => dvb::SHORT_EVENT,
            Self::StreamIdentifier(_) => dvb::STREAM_IDENTIFIER,
            Self::Content(_) => dvb::CONTENT,
            Self::ParentalRating(_) => dvb::PARENTAL_RATING,
            Self::PrivateDataSpecifier(_) => dvb::PRIVATE_DATA_SPECIFIER,
            Self::ContentIdentifier(_) => dvb::CONTENT_IDENTIFIER,
            Self::Unknown(d) => d.tag,
        }
    }

    /// A description of this descriptor's tag.
    pub fn name(&self) -> &'static str {
        DESCRIPTOR_TAGS.get(self.tag().into())
    }
}

/// A descriptor kept as its raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDescriptor {
    pub tag: u8,
    pub payload: Vec<u8>,
}

/// Descriptors decoded from a loop, in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorLoop {
    /// Declared length of the loop in bytes.
    pub length: usize,
    pub descriptors: Vec<Descriptor>,
}

impl DescriptorLoop {
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Descriptor> {
        self.descriptors.iter()
    }
}

impl<'a> IntoIterator for &'a DescriptorLoop {
    type Item = &'a Descriptor;
    type IntoIter = core::slice::Iter<'a, Descriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Names of descriptor tags (EN 300 468, table 12).
pub static DESCRIPTOR_TAGS: LookupTable = LookupTable::new(&[
    Entry::range(0x00, 0x01, "reserved"),
    Entry::range(0x02, 0x3F, "ISO/IEC 13818-1 descriptor"),
    Entry::single(0x40, "network_name_descriptor"),
    Entry::single(0x41, "service_list_descriptor"),
    Entry::single(0x42, "stuffing_descriptor"),
    Entry::single(0x43, "satellite_delivery_system_descriptor"),
    Entry::single(0x44, "cable_delivery_system_descriptor"),
    Entry::single(0x45, "VBI_data_descriptor"),
    Entry::single(0x46, "VBI_teletext_descriptor"),
    Entry::single(0x47, "bouquet_name_descriptor"),
    Entry::single(0x48, "service_descriptor"),
    Entry::single(0x49, "country_availability_descriptor"),
    Entry::single(0x4A, "linkage_descriptor"),
    Entry::single(0x4B, "NVOD_reference_descriptor"),
    Entry::single(0x4C, "time_shifted_service_descriptor"),
    Entry::single(0x4D, "short_event_descriptor"),
    Entry::single(0x4E, "extended_event_descriptor"),
    Entry::single(0x4F, "time_shifted_event_descriptor"),
    Entry::single(0x50, "component_descriptor"),
    Entry::single(0x51, "mosaic_descriptor"),
    Entry::single(0x52, "stream_identifier_descriptor"),
    Entry::single(0x53, "CA_identifier_descriptor"),
    Entry::single(0x54, "content_descriptor"),
    Entry::single(0x55, "parental_rating_descriptor"),
    Entry::single(0x56, "teletext_descriptor"),
    Entry::single(0x57, "telephone_descriptor"),
    Entry::single(0x58, "local_time_offset_descriptor"),
    Entry::single(0x59, "subtitling_descriptor"),
    Entry::single(0x5A, "terrestrial_delivery_system_descriptor"),
    Entry::single(0x5B, "multilingual_network_name_descriptor"),
    Entry::single(0x5C, "multilingual_bouquet_name_descriptor"),
    Entry::single(0x5D, "multilingual_service_name_descriptor"),
    Entry::single(0x5E, "multilingual_component_descriptor"),
    Entry::single(0x5F, "private_data_specifier_descriptor"),
    Entry::single(0x60, "service_move_descriptor"),
    Entry::single(0x61, "short_smoothing_buffer_descriptor"),
    Entry::single(0x62, "frequency_list_descriptor"),
    Entry::single(0x63, "partial_transport_stream_descriptor"),
    Entry::single(0x64, "data_broadcast_descriptor"),
    Entry::single(0x65, "scrambling_descriptor"),
    Entry::single(0x66, "data_broadcast_id_descriptor"),
    Entry::single(0x67, "transport_stream_descriptor"),
    Entry::single(0x68, "DSNG_descriptor"),
    Entry::single(0x69, "PDC_descriptor"),
    Entry::single(0x6A, "AC-3_descriptor"),
    Entry::single(0x6B, "ancillary_data_descriptor"),
    Entry::single(0x6C, "cell_list_descriptor"),
    Entry::single(0x6D, "cell_frequency_link_descriptor"),
    Entry::single(0x6E, "announcement_support_descriptor"),
    Entry::single(0x6F, "application_signalling_descriptor"),
    Entry::single(0x70, "adaptation_field_data_descriptor"),
    Entry::single(0x71, "service_identifier_descriptor"),
    Entry::single(0x72, "service_availability_descriptor"),
    Entry::single(0x73, "default_authority_descriptor"),
    Entry::single(0x74, "related_content_descriptor"),
    Entry::single(0x75, "TVA_id_descriptor"),
    Entry::single(0x76, "content_identifier_descriptor"),
    Entry::single(0x77, "time_slice_fec_identifier_descriptor"),
    Entry::single(0x78, "ECM_repetition_rate_descriptor"),
    Entry::single(0x79, "S2_satellite_delivery_system_descriptor"),
    Entry::single(0x7A, "enhanced_AC-3_descriptor"),
    Entry::single(0x7B, "DTS_descriptor"),
    Entry::single(0x7C, "AAC_descriptor"),
    Entry::single(0x7D, "XAIT_location_descriptor"),
    Entry::single(0x7E, "FTA_content_management_descriptor"),
    Entry::single(0x7F, "extension_descriptor"),
    Entry::range(0x80, 0xFE, "user defined"),
    Entry::single(0xFF, "forbidden"),
]);
