//! Circuit interface description (ABI) as emitted by the Noir compiler.
//!
//! Types are a closed, internally tagged enum keyed by `"kind"`, so every
//! recursive case is handled exhaustively instead of probing optional keys.
//! Extra keys in the compiler artifact (`noir_version`, `hash`,
//! `return_type`, debug symbols, ...) are ignored on read.

use crate::error::AbiError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signedness of an integer parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    /// `u8`, `u32`, ...
    Unsigned,
    /// `i8`, `i32`, ...
    Signed,
}

/// Type of a circuit parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParameterType {
    /// A single field element.
    Field,
    /// A boolean, encoded as one field element.
    Boolean,
    /// A fixed-width integer, encoded as one field element.
    Integer {
        /// Signedness.
        sign: Sign,
        /// Bit width.
        width: u32,
    },
    /// A fixed-length string; one field element per byte.
    String {
        /// Length in bytes.
        length: usize,
    },
    /// A homogeneous fixed-length array.
    Array {
        /// Number of elements.
        length: usize,
        /// Element type.
        #[serde(rename = "type")]
        element_type: Box<ParameterType>,
    },
    /// A named struct; fields keep declaration order.
    Struct {
        /// Noir type path, e.g. `lease::Terms`. Display only.
        #[serde(default)]
        path: String,
        /// Ordered fields.
        fields: Vec<StructField>,
    },
    /// An anonymous tuple.
    Tuple {
        /// Ordered members.
        fields: Vec<ParameterType>,
    },
}

/// One named member of a [`ParameterType::Struct`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    /// Field name.
    pub name: String,
    /// Field type.
    #[serde(rename = "type")]
    pub ty: ParameterType,
}

/// Whether a parameter is revealed in the proof's public-input region.
///
/// Applies to the whole top-level parameter; nested members inherit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Revealed.
    Public,
    /// Hidden.
    Private,
}

/// A top-level circuit input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name, as used in the inputs map.
    pub name: String,
    /// Parameter type.
    #[serde(rename = "type")]
    pub ty: ParameterType,
    /// Visibility.
    pub visibility: Visibility,
}

impl Parameter {
    /// Convenience constructor.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: ParameterType, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility,
        }
    }

    /// `true` for public parameters.
    #[inline]
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// Ordered parameter list of a circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abi {
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
}

/// A compiled circuit: opaque bytecode plus its ABI.
///
/// Loaded once and read-only afterwards; two circuits are the same circuit
/// when bytecode and ABI are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    /// Backend-specific program encoding (base64 in Noir artifacts).
    pub bytecode: String,
    /// Interface description.
    pub abi: Abi,
}

impl Circuit {
    /// Build a circuit from parts and validate its ABI.
    pub fn new(bytecode: impl Into<String>, parameters: Vec<Parameter>) -> Result<Self, AbiError> {
        let c = Self {
            bytecode: bytecode.into(),
            abi: Abi { parameters },
        };
        c.validate()?;
        Ok(c)
    }

    /// Parse a compiler artifact (JSON) and validate its ABI.
    pub fn from_json(s: &str) -> Result<Self, AbiError> {
        let c: Self = serde_json::from_str(s).map_err(|e| AbiError::Malformed(e.to_string()))?;
        c.validate()?;
        Ok(c)
    }

    /// Parse from a JSON value (e.g. one embedded in a larger document).
    pub fn from_value(v: serde_json::Value) -> Result<Self, AbiError> {
        let c: Self = serde_json::from_value(v).map_err(|e| AbiError::Malformed(e.to_string()))?;
        c.validate()?;
        Ok(c)
    }

    /// JSON encoding of the ABI alone, as handed to proving backends.
    pub fn abi_json(&self) -> Result<String, AbiError> {
        serde_json::to_string(&self.abi).map_err(|e| AbiError::Malformed(e.to_string()))
    }

    /// Structural checks serde cannot express: no empty structs anywhere.
    pub fn validate(&self) -> Result<(), AbiError> {
        self.abi.parameters.iter().try_for_each(|p| p.ty.validate())
    }

    /// Parameters marked public, in order.
    pub fn public_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.abi.parameters.iter().filter(|p| p.is_public())
    }
}

impl ParameterType {
    /// Shorthand for `Array { element_type, length }`.
    #[must_use]
    pub fn array(element_type: Self, length: usize) -> Self {
        Self::Array {
            length,
            element_type: Box::new(element_type),
        }
    }

    /// Shorthand for an unnamed struct.
    #[must_use]
    pub fn structure<N: Into<String>>(fields: impl IntoIterator<Item = (N, Self)>) -> Self {
        Self::Struct {
            path: String::new(),
            fields: fields
                .into_iter()
                .map(|(name, ty)| StructField {
                    name: name.into(),
                    ty,
                })
                .collect(),
        }
    }

    fn validate(&self) -> Result<(), AbiError> {
        match self {
            Self::Field | Self::Boolean | Self::Integer { .. } | Self::String { .. } => Ok(()),
            Self::Array { element_type, .. } => element_type.validate(),
            Self::Struct { path, fields } => {
                if fields.is_empty() {
                    return Err(AbiError::EmptyStruct { path: path.clone() });
                }
                fields.iter().try_for_each(|f| f.ty.validate())
            }
            Self::Tuple { fields } => fields.iter().try_for_each(Self::validate),
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => f.write_str("Field"),
            Self::Boolean => f.write_str("bool"),
            Self::Integer { sign, width } => match sign {
                Sign::Unsigned => write!(f, "u{width}"),
                Sign::Signed => write!(f, "i{width}"),
            },
            Self::String { length } => write!(f, "str<{length}>"),
            Self::Array {
                length,
                element_type,
            } => write!(f, "[{element_type}; {length}]"),
            Self::Struct { path, fields } if path.is_empty() => {
                write!(f, "struct {{ {} fields }}", fields.len())
            }
            Self::Struct { path, .. } => f.write_str(path),
            Self::Tuple { fields } => {
                f.write_str("(")?;
                for (i, t) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{t}")?;
                }
                f.write_str(")")
            }
        }
    }
}
