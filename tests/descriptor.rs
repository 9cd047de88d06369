mod support;

use proptest::prelude::*;
use sectional::{
    DecodeError,
    bits::{BitCursor, LanguageCode},
    descriptor::{
        Descriptor, DescriptorRegistry, UnknownDescriptor,
        dvb::{
            self, ContentClassification, ContentIdentifier, CridLocation, LanguageEntry,
            ParentalRating, StreamIdentifierDescriptor,
        },
    },
};
use support::{BitWriter, descriptor};

fn decode(r: &[u8]) -> Result<Vec<Descriptor>, DecodeError> {
    DescriptorRegistry::standard()
        .decode_slice(r)
        .map(|l| l.descriptors)
}

#[test]
fn empty_loop() {
    let descriptors = DescriptorRegistry::standard().decode_slice(&[]).unwrap();
    assert!(descriptors.is_empty());
    assert_eq!(descriptors.length, 0);
}

#[test]
fn unknown_tags_keep_their_payload() {
    let data = [descriptor(0xE7, &[1, 2, 3]), descriptor(0x52, &[9])].concat();
    let descriptors = decode(&data).unwrap();

    assert_eq!(
        descriptors,
        [
            Descriptor::Unknown(UnknownDescriptor {
                tag: 0xE7,
                payload: vec![1, 2, 3],
            }),
            Descriptor::StreamIdentifier(StreamIdentifierDescriptor { component_tag: 9 }),
        ]
    );
    assert_eq!(descriptors[0].tag(), 0xE7);
    assert_eq!(descriptors[0].name(), "user defined");
    assert_eq!(descriptors[1].name(), "stream_identifier_descriptor");
}

#[test]
fn empty_registry_keeps_every_descriptor() {
    let data = [descriptor(0x52, &[9]), descriptor(0x40, b"net")].concat();
    let descriptors = DescriptorRegistry::empty().decode_slice(&data).unwrap();

    assert!(descriptors.iter().all(|d| matches!(d, Descriptor::Unknown(_))));
    assert_eq!(descriptors.iter().map(Descriptor::tag).collect::<Vec<_>>(), [0x52, 0x40]);
}

#[test]
fn record_overshooting_the_loop_is_a_length_mismatch() {
    // The second record declares four payload bytes, but only two remain.
    let mut data = [descriptor(0x52, &[9]), descriptor(0x80, &[1, 2, 3, 4])].concat();
    data.truncate(data.len() - 2);

    assert_eq!(
        decode(&data),
        Err(DecodeError::LengthMismatch {
            expected: 56,
            actual: 72
        })
    );
}

#[test]
fn trailing_byte_is_a_length_mismatch() {
    let data = [descriptor(0x52, &[9]), vec![0x80]].concat();

    assert!(matches!(
        decode(&data),
        Err(DecodeError::LengthMismatch { .. })
    ));
}

#[test]
fn loop_longer_than_its_enclosure_is_out_of_bounds() {
    let data = descriptor(0x52, &[9]);
    let mut c = BitCursor::from_slice(&data);

    assert!(matches!(
        DescriptorRegistry::standard().decode_loop(&mut c, 4),
        Err(DecodeError::OutOfBounds { .. })
    ));
    assert_eq!(c.position(), 0);
}

#[test]
fn payload_not_consumed_by_its_decoder_is_a_length_mismatch() {
    let data = descriptor(0x52, &[9, 10]);

    assert_eq!(
        decode(&data),
        Err(DecodeError::LengthMismatch {
            expected: 16,
            actual: 8
        })
    );
}

#[test]
fn failing_descriptor_fails_the_loop() {
    let data = [descriptor(0x80, &[]), descriptor(0x5F, &[0, 0])].concat();

    assert!(matches!(
        decode(&data),
        Err(DecodeError::OutOfBounds { .. })
    ));
}

#[test]
fn custom_registry_dispatches_private_tags() {
    fn decode_logical_channel(c: &mut BitCursor<'_>) -> Result<Descriptor, DecodeError> {
        Ok(Descriptor::Unknown(UnknownDescriptor {
            tag: 0x83,
            payload: c.read_remaining()?.into_iter().rev().collect(),
        }))
    }

    static REGISTRY: DescriptorRegistry = DescriptorRegistry::empty()
        .with(0x52, dvb::decode_stream_identifier)
        .with(0x83, decode_logical_channel);

    assert!(REGISTRY.is_registered(0x83));
    assert!(!REGISTRY.is_registered(0x48));
    assert_eq!(format!("{REGISTRY:?}"), "{82, 131}");

    let data = [descriptor(0x83, &[1, 2]), descriptor(0x52, &[7])].concat();
    let descriptors = REGISTRY.decode_slice(&data).unwrap();

    assert_eq!(
        descriptors.descriptors,
        [
            Descriptor::Unknown(UnknownDescriptor {
                tag: 0x83,
                payload: vec![2, 1],
            }),
            Descriptor::StreamIdentifier(StreamIdentifierDescriptor { component_tag: 7 }),
        ]
    );
}

#[test]
fn iso_639_language() {
    let data = descriptor(0x0A, b"eng\x01dut\x00");

    assert_eq!(
        decode(&data).unwrap(),
        [Descriptor::Iso639Language(vec![
            LanguageEntry {
                language: LanguageCode(*b"eng"),
                audio_type: 1
            },
            LanguageEntry {
                language: LanguageCode(*b"dut"),
                audio_type: 0
            },
        ])]
    );
}

#[test]
fn network_name() {
    let data = descriptor(0x40, b"Ziggo");
    let descriptors = decode(&data).unwrap();
    let [Descriptor::NetworkName(name)] = &descriptors[..] else {
        panic!("expected a network name");
    };

    assert_eq!(name.as_bytes(), b"Ziggo");
}

#[test]
fn service() {
    let payload = BitWriter::new()
        .bits(8, 0x19)
        .text(b"NPO")
        .text(b"NPO 1 HD")
        .finish();
    let data = descriptor(0x48, &payload);

    let descriptors = decode(&data).unwrap();
    let [Descriptor::Service(service)] = &descriptors[..] else {
        panic!("expected a service descriptor");
    };

    assert_eq!(service.service_type, 0x19);
    assert_eq!(service.service_type_name(), "H.264/AVC HD digital television service");
    assert_eq!(service.provider_name.as_bytes(), b"NPO");
    assert_eq!(service.service_name.as_bytes(), b"NPO 1 HD");
}

#[test]
fn service_with_overlong_name_fails() {
    let payload = BitWriter::new().bits(8, 0x01).text(b"NPO").bits(8, 5).bytes(b"abc").finish();
    let data = descriptor(0x48, &payload);

    assert!(matches!(
        decode(&data),
        Err(DecodeError::OutOfBounds { .. })
    ));
}

#[test]
fn short_event() {
    let payload = BitWriter::new()
        .bytes(b"dut")
        .text(b"Journaal")
        .text(b"")
        .finish();
    let data = descriptor(0x4D, &payload);

    let descriptors = decode(&data).unwrap();
    let [Descriptor::ShortEvent(event)] = &descriptors[..] else {
        panic!("expected a short event descriptor");
    };

    assert_eq!(event.language.as_str(), Some("dut"));
    assert_eq!(event.event_name.as_bytes(), b"Journaal");
    assert!(event.text.is_empty());
}

#[test]
fn content_and_parental_rating() {
    let data = [
        descriptor(0x54, &[0x23, 0x00, 0xF1, 0xAA]),
        descriptor(0x55, b"NLD\x09GBR\x40"),
    ]
    .concat();

    let descriptors = decode(&data).unwrap();

    assert_eq!(
        descriptors[0],
        Descriptor::Content(vec![
            ContentClassification {
                level_1: 0x2,
                level_2: 0x3,
                user_byte: 0x00
            },
            ContentClassification {
                level_1: 0xF,
                level_2: 0x1,
                user_byte: 0xAA
            },
        ])
    );

    let Descriptor::ParentalRating(ratings) = &descriptors[1] else {
        panic!("expected a parental rating descriptor");
    };
    assert_eq!(
        ratings[0],
        ParentalRating {
            country: LanguageCode(*b"NLD"),
            rating: 9
        }
    );
    assert_eq!(ratings[0].minimum_age(), Some(12));
    assert_eq!(ratings[1].minimum_age(), None);
}

#[test]
fn content_with_partial_entry_fails() {
    let data = descriptor(0x54, &[0x23, 0x00, 0xF1]);

    assert!(matches!(
        decode(&data),
        Err(DecodeError::OutOfBounds { .. })
    ));
}

#[test]
fn private_data_specifier() {
    let data = descriptor(0x5F, &[0x00, 0x00, 0x00, 0x28]);
    let descriptors = decode(&data).unwrap();
    let [Descriptor::PrivateDataSpecifier(pds)] = &descriptors[..] else {
        panic!("expected a private data specifier descriptor");
    };

    assert_eq!(pds.private_data_specifier, 0x28);
}

#[test]
fn content_identifier() {
    let payload = BitWriter::new()
        .bits(6, 0x31)
        .bits(2, 0b00)
        .text(b"/ep1")
        .bits(6, 0x32)
        .bits(2, 0b01)
        .bits(16, 0xBEEF)
        .finish();
    let data = descriptor(0x76, &payload);

    assert_eq!(
        decode(&data).unwrap(),
        [Descriptor::ContentIdentifier(vec![
            ContentIdentifier {
                crid_type: 0x31,
                location: CridLocation::Carried(b"/ep1".to_vec().into()),
            },
            ContentIdentifier {
                crid_type: 0x32,
                location: CridLocation::Referenced(0xBEEF),
            },
        ])]
    );
}

#[test]
fn content_identifier_with_reserved_location_is_unsupported() {
    let payload = BitWriter::new().bits(6, 0x31).bits(2, 0b10).bits(8, 0).finish();
    let data = descriptor(0x76, &payload);

    assert_eq!(
        decode(&data),
        Err(DecodeError::UnsupportedFeature("reserved crid_location"))
    );
}

proptest! {
    #[test]
    fn loop_accounts_for_every_byte(
        records in prop::collection::vec(
            (0x80u8..=0xFE, prop::collection::vec(any::<u8>(), 0..20)),
            0..12,
        ),
    ) {
        let data = records
            .iter()
            .flat_map(|(tag, payload)| descriptor(*tag, payload))
            .collect::<Vec<_>>();

        let decoded = DescriptorRegistry::standard().decode_slice(&data).unwrap();

        let accounted: usize = decoded
            .iter()
            .map(|d| match d {
                Descriptor::Unknown(u) => 2 + u.payload.len(),
                _ => unreachable!(),
            })
            .sum();
        prop_assert_eq!(accounted, decoded.length);
        prop_assert_eq!(decoded.length, data.len());

        for (d, (tag, payload)) in decoded.iter().zip(&records) {
            prop_assert_eq!(d, &Descriptor::Unknown(UnknownDescriptor {
                tag: *tag,
                payload: payload.clone(),
            }));
        }
    }

    #[test]
    fn decoding_is_repeatable(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let registry = DescriptorRegistry::standard();
        prop_assert_eq!(registry.decode_slice(&data), registry.decode_slice(&data));
    }
}
