//! JSON encoding for quantities.
//!
//! JSON has no literal for infinity, and serde_json writes non-finite
//! floats as `null`. Quantities such as `1e999` are legal imports, so
//! non-finite values are written as the strings `"Infinity"`,
//! `"-Infinity"` and `"NaN"` and read back from the same strings.
//!
//! Use with `#[serde(with = "execbom_models::quantity")]`.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serializer};

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.is_sign_positive() {
        serializer.serialize_str("Infinity")
    } else {
        serializer.serialize_str("-Infinity")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(f64),
    Text(String),
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Repr::deserialize(deserializer)? {
        Repr::Number(value) => Ok(value),
        Repr::Text(text) => match text.as_str() {
            "Infinity" | "+Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            "NaN" => Ok(f64::NAN),
            other => Err(de::Error::custom(format!("invalid quantity '{}'", other))),
        },
    }
}
