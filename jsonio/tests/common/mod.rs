#![allow(dead_code)] // Not every test binary uses every helper

use jsonio::internal::WriteContext;
use jsonio::options::EncodeOptionsDefault;
use jsonio::prelude::*;
use std::fmt::Debug;

/// Asserts that the value encodes to exactly `text` and decodes back to itself.
pub fn round_trip<T: Encode + Decode + Default + Debug + PartialEq>(value: &T, text: &str) {
    serialize_eq(value, value, text);
}

pub fn serialize_eq<I: Encode + ?Sized, O: Decode + Default + Debug + PartialEq>(i: &I, o: &O, text: &str) {
    let encoded = as_json(i);
    assert_eq!(encoded.as_str(), text);
    assert_eq!(sized(i), text.len());
    match decode::<O>(&encoded) {
        Ok(parsed) => assert_eq!(o, &parsed),
        Err(e) => panic!("{} in {}", e, encoded),
    }
}

/// What the sizing pass predicts for `value` with no blob store.
pub fn sized<T: Encode + ?Sized>(value: &T) -> usize {
    value.json_size(&WriteContext::new(None, &EncodeOptionsDefault))
}

pub fn round_trip_default<T: Encode + Decode + Default + Debug + PartialEq>(text: &str) {
    let data = T::default();
    round_trip(&data, text);
}

/// A value with the blob store the tests share for a whole test binary.
pub fn with_store() -> EncodedValue {
    EncodedValue::new().with_blobs(jsonio::BlobStore::in_memory())
}
