use crate::error::model_error::ModelError;
use crate::record::{RECORD_DELIMITER, Record, RecordKey};
use crate::ErrorLocation;

use std::panic::Location;

/// Builder for records whose value comes from outside (the wire, user input).
///
/// The typed constructors on [`Record`] cover everything the engine sends;
/// this is for values that still need checking.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    key: Option<RecordKey>,
    value: Option<String>,
}

impl RecordBuilder {
    pub fn with_key(mut self, key: RecordKey) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Build the record with validation.
    #[track_caller]
    pub fn build(self) -> Result<Record, ModelError> {
        let key = self.key.ok_or_else(|| ModelError::Validation {
            message: String::from("Record key is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let value = self.value.unwrap_or_default();

        if value.contains(RECORD_DELIMITER) {
            return Err(ModelError::Validation {
                message: format!("Record value must not contain '{RECORD_DELIMITER}': {value:?}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Record { key, value })
    }
}
