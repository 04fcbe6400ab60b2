//! Wire-format checks.
//!
//! Records exchanged with the authority are JSON with camelCase field
//! names. These helpers compare a value's encoding against a reference
//! document so that renames are caught in review.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Debug;

/// Reference encoding of [`crate::fixtures::document`]`("a")`.
pub fn reference_document_json() -> Value {
    json!({
        "id": "a",
        "title": "a",
        "content": "content of a",
        "author": crate::fixtures::TEST_USER,
        "createdAt": crate::fixtures::FIXTURE_TIME.as_millis(),
        "updatedAt": crate::fixtures::FIXTURE_TIME.as_millis(),
        "isDirty": false,
    })
}

/// Asserts that `value` encodes to `expected` and decodes back to itself.
///
/// # Panics
///
/// Panics with both encodings on mismatch.
pub fn assert_wire_json<T>(value: &T, expected: &Value)
where
    T: Serialize + DeserializeOwned + PartialEq + Debug,
{
    let actual = serde_json::to_value(value).expect("value must encode");
    assert_eq!(
        &actual, expected,
        "wire encoding changed\nexpected: {expected:#}\nactual:   {actual:#}"
    );

    let decoded: T = serde_json::from_value(actual).expect("encoding must decode");
    assert_eq!(&decoded, value, "decoding did not reproduce the value");
}
