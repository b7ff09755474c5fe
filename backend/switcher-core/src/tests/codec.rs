use crate::error::protocol::ProtocolError;
use crate::protocol::{MessageCodec, WireEncoding};

use models::{DEVICE_STATUS_UP, LightState, Method, Record, RecordKey};

/// **VALUE**: Verifies that every record the engine can send decodes back to itself.
///
/// **WHY THIS MATTERS**: Both directions share the same labels. If encode and decode
/// disagree on a label or on the delimiter, the two peers stop understanding each other.
#[test]
fn given_each_record_kind_when_encoded_and_decoded_then_value_is_preserved() {
    // GIVEN
    let records = [
        Record::device("LightSwitcher"),
        Record::lights(LightState::On),
        Record::method(Method::RequestStatus),
        Record::status(DEVICE_STATUS_UP),
    ];

    for encoding in [WireEncoding::Utf16Le, WireEncoding::Utf8] {
        let codec = MessageCodec::new(encoding);
        for record in &records {
            // WHEN
            let decoded = codec.decode(&codec.encode(record)).expect("Should decode");

            // THEN
            assert_eq!(&decoded, record, "{encoding}");
        }
    }
}

#[test]
fn given_default_codec_when_encoding_then_emits_utf16le_bytes() {
    let codec = MessageCodec::default();

    let bytes = codec.encode(&Record::status(DEVICE_STATUS_UP));

    assert_eq!(bytes.as_ref(), WireEncoding::Utf16Le.encode("Status: 42;").as_slice());
    assert_eq!(&bytes[bytes.len() - 2..], &[b';', 0]);
}

#[test]
fn given_segment_without_known_label_when_decoded_then_fails_with_unknown_label() {
    // GIVEN
    let codec = MessageCodec::new(WireEncoding::Utf8);

    // WHEN
    let result = codec.decode(b"Colour: blue;");

    // THEN
    match result {
        Err(ProtocolError::UnknownLabel { segment, .. }) => assert_eq!(segment, "Colour: blue;"),
        other => panic!("Expected UnknownLabel, got {other:?}"),
    }
}

/// **VALUE**: Verifies that zero padding in front of a label is ignored.
///
/// **WHY THIS MATTERS**: Some peers write their whole fixed-size buffer, so records
/// can arrive with leading NUL characters.
#[test]
fn given_nul_padding_before_label_when_decoded_then_record_is_recognized() {
    let codec = MessageCodec::new(WireEncoding::Utf16Le);

    let record = codec
        .decode_text("\0\0\0Method: SWITCH;")
        .expect("Should decode");

    assert_eq!(record.key(), RecordKey::Method);
    assert_eq!(record.value(), "SWITCH");
}

#[test]
fn given_text_after_delimiter_when_decoded_then_only_first_record_counts() {
    let codec = MessageCodec::new(WireEncoding::Utf8);

    let record = codec.decode_text("Lights: True;Method: SWITCH").expect("Should decode");

    assert_eq!(record, Record::lights(LightState::On));
}

#[test]
fn given_two_labels_in_one_record_when_decoded_then_earliest_label_wins() {
    let codec = MessageCodec::new(WireEncoding::Utf8);

    let record = codec.decode_text("Device: Status: 1;").expect("Should decode");

    assert_eq!(record.key(), RecordKey::Device);
    assert_eq!(record.value(), "Status: 1");
}

#[test]
fn given_odd_length_utf16_segment_when_decoded_then_fails_with_encoding_error() {
    let codec = MessageCodec::new(WireEncoding::Utf16Le);

    let result = codec.decode(&[b'L', 0, b'i']);

    assert!(matches!(result, Err(ProtocolError::Encoding { .. })));
}
