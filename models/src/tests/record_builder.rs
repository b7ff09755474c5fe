use crate::{ModelError, RecordBuilder, RecordKey};

#[test]
fn given_key_and_value_when_built_then_succeeds() {
    let record = RecordBuilder::default()
        .with_key(RecordKey::Lights)
        .with_value("True")
        .build()
        .expect("Valid record");

    assert_eq!(record.key(), RecordKey::Lights);
    assert_eq!(record.value(), "True");
}

#[test]
fn given_missing_key_when_built_then_returns_validation_error() {
    let result = RecordBuilder::default().with_value("True").build();

    assert!(matches!(result, Err(ModelError::Validation { .. })));
}

/// **VALUE**: A value containing the delimiter would split into two records on the
/// peer side; the builder must refuse it.
#[test]
fn given_value_with_delimiter_when_built_then_returns_validation_error() {
    let result = RecordBuilder::default()
        .with_key(RecordKey::Device)
        .with_value("a;b")
        .build();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("must not contain"));
}

#[test]
fn given_no_value_when_built_then_value_is_empty() {
    let record = RecordBuilder::default()
        .with_key(RecordKey::Status)
        .build()
        .expect("Empty value is allowed");

    assert_eq!(record.value(), "");
}
