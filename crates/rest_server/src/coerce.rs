//! Lenient numeric fields for JSON request bodies.
//!
//! Accepts a JSON number or a numeric string. Integer fields also take an
//! integral float such as `5.0`. Anything else is rejected.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Text(String),
}

pub fn i32_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    let wide = match Loose::deserialize(d)? {
        Loose::Int(v) => v,
        Loose::Float(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
        Loose::Float(f) => return Err(D::Error::custom(format!("expected an integer, got {f}"))),
        Loose::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("expected an integer, got {s:?}")))?,
    };
    i32::try_from(wide).map_err(|_| D::Error::custom(format!("integer {wide} out of range")))
}

pub fn f64_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let v = match Loose::deserialize(d)? {
        Loose::Int(v) => v as f64,
        Loose::Float(f) => f,
        Loose::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("expected a number, got {s:?}")))?,
    };
    if !v.is_finite() {
        return Err(D::Error::custom("number must be finite"));
    }
    Ok(v)
}
