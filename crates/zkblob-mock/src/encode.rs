//! Flattening JSON circuit inputs into field elements.
//!
//! Order follows the ABI: parameters in declaration order, arrays element by
//! element, structs field by field, strings byte by byte. Values are accepted
//! as JSON numbers, decimal strings (up to `u128`), `0x` hex strings (up to
//! 32 bytes) and booleans where the type is boolean.

use serde_json::Value;
use zkblob_core::{Abi, FieldElement, InputMap, ParameterType, Sign};

/// Why an input could not be encoded. `path` names the offending value,
/// e.g. `terms.days[1]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// No value for a parameter or struct field.
    #[error("missing input `{path}`")]
    Missing {
        /// Value path.
        path: String,
    },
    /// The JSON value has the wrong shape for the type.
    #[error("input `{path}`: expected {expected}")]
    TypeMismatch {
        /// Value path.
        path: String,
        /// Human-readable expected shape.
        expected: &'static str,
    },
    /// An array, tuple or string has the wrong length.
    #[error("input `{path}`: expected length {expected}, got {actual}")]
    LengthMismatch {
        /// Value path.
        path: String,
        /// Declared length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
    /// A number does not fit the declared type.
    #[error("input `{path}`: value out of range")]
    OutOfRange {
        /// Value path.
        path: String,
    },
}

/// Encoded witness, split by visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Witness {
    /// Public fields in ABI order; these land in the blob.
    pub public: Vec<FieldElement>,
    /// Private fields in ABI order; these only influence commitments.
    pub private: Vec<FieldElement>,
}

/// Encode every parameter of `abi` from `inputs`.
pub fn encode_inputs(abi: &Abi, inputs: &InputMap) -> Result<Witness, EncodeError> {
    let mut w = Witness::default();
    for p in &abi.parameters {
        let v = inputs.get(&p.name).ok_or_else(|| EncodeError::Missing {
            path: p.name.clone(),
        })?;
        let out = if p.is_public() {
            &mut w.public
        } else {
            &mut w.private
        };
        encode_value(&p.ty, v, &p.name, out)?;
    }
    Ok(w)
}

fn encode_value(
    ty: &ParameterType,
    v: &Value,
    path: &str,
    out: &mut Vec<FieldElement>,
) -> Result<(), EncodeError> {
    match ty {
        ParameterType::Field => out.push(scalar(v, path)?),
        ParameterType::Boolean => {
            let b = match v {
                Value::Bool(b) => *b,
                Value::Number(n) if n.as_u64() == Some(0) => false,
                Value::Number(n) if n.as_u64() == Some(1) => true,
                _ => return Err(mismatch(path, "a boolean")),
            };
            out.push(FieldElement::from_u128(u128::from(b)));
        }
        ParameterType::Integer { sign, width } => out.push(integer(v, *sign, *width, path)?),
        ParameterType::String { length } => {
            let s = v.as_str().ok_or_else(|| mismatch(path, "a string"))?;
            check_len(path, *length, s.len())?;
            out.extend(s.bytes().map(|b| FieldElement::from_u128(u128::from(b))));
        }
        ParameterType::Array {
            length,
            element_type,
        } => {
            let items = v.as_array().ok_or_else(|| mismatch(path, "an array"))?;
            check_len(path, *length, items.len())?;
            for (i, item) in items.iter().enumerate() {
                encode_value(element_type, item, &format!("{path}[{i}]"), out)?;
            }
        }
        ParameterType::Struct { fields, .. } => {
            let obj = v.as_object().ok_or_else(|| mismatch(path, "an object"))?;
            for f in fields {
                let sub = format!("{path}.{}", f.name);
                let item = obj
                    .get(&f.name)
                    .ok_or_else(|| EncodeError::Missing { path: sub.clone() })?;
                encode_value(&f.ty, item, &sub, out)?;
            }
        }
        ParameterType::Tuple { fields } => {
            let items = v.as_array().ok_or_else(|| mismatch(path, "an array"))?;
            check_len(path, fields.len(), items.len())?;
            for (i, (t, item)) in fields.iter().zip(items).enumerate() {
                encode_value(t, item, &format!("{path}.{i}"), out)?;
            }
        }
    }
    Ok(())
}

/// Any unsigned value up to 32 bytes.
fn scalar(v: &Value, path: &str) -> Result<FieldElement, EncodeError> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .map(|x| FieldElement::from_u128(u128::from(x)))
            .ok_or_else(|| out_of_range(path)),
        Value::String(s) => parse_str(s, path),
        _ => Err(mismatch(path, "a number or numeric string")),
    }
}

fn parse_str(s: &str, path: &str) -> Result<FieldElement, EncodeError> {
    if let Some(h) = s.strip_prefix("0x") {
        let padded = if h.len() % 2 == 1 {
            format!("0{h}")
        } else {
            h.to_owned()
        };
        let bytes = hex::decode(padded).map_err(|_| mismatch(path, "a hex string"))?;
        FieldElement::from_be_slice(&bytes).ok_or_else(|| out_of_range(path))
    } else {
        s.parse::<u128>()
            .map(FieldElement::from_u128)
            .map_err(|_| mismatch(path, "a decimal string"))
    }
}

/// Integers are range-checked against their width. Negative signed values
/// use two's complement within `width` bits.
fn integer(v: &Value, sign: Sign, width: u32, path: &str) -> Result<FieldElement, EncodeError> {
    if width == 0 || width > 127 {
        return Err(out_of_range(path));
    }
    let bound = 1u128 << width;
    let raw: i128 = match v {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .ok_or_else(|| out_of_range(path))?,
        Value::String(s) => {
            let fe = parse_str(s, path)?;
            let bytes = fe.as_bytes();
            if bytes[..16].iter().any(|b| *b != 0) {
                return Err(out_of_range(path));
            }
            let mut lo = [0u8; 16];
            lo.copy_from_slice(&bytes[16..]);
            i128::try_from(u128::from_be_bytes(lo)).map_err(|_| out_of_range(path))?
        }
        _ => return Err(mismatch(path, "an integer")),
    };
    let encoded = match sign {
        Sign::Unsigned => u128::try_from(raw)
            .ok()
            .filter(|x| *x < bound)
            .ok_or_else(|| out_of_range(path))?,
        Sign::Signed => {
            let half = i128::try_from(bound >> 1).map_err(|_| out_of_range(path))?;
            if raw < -half || raw >= half {
                return Err(out_of_range(path));
            }
            // In range, so the sum is non-negative and below `bound`.
            u128::try_from(raw.rem_euclid(half * 2)).map_err(|_| out_of_range(path))?
        }
    };
    Ok(FieldElement::from_u128(encoded))
}

fn check_len(path: &str, expected: usize, actual: usize) -> Result<(), EncodeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(EncodeError::LengthMismatch {
            path: path.to_owned(),
            expected,
            actual,
        })
    }
}

fn mismatch(path: &str, expected: &'static str) -> EncodeError {
    EncodeError::TypeMismatch {
        path: path.to_owned(),
        expected,
    }
}

fn out_of_range(path: &str) -> EncodeError {
    EncodeError::OutOfRange {
        path: path.to_owned(),
    }
}
