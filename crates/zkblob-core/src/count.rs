//! Number of field elements a parameter occupies in the public-input region.
//!
//! Counting is a fold over the type tree. Visibility is consulted only at the
//! top level: a private parameter contributes nothing however deep it is.

use crate::abi::{Circuit, Parameter, ParameterType};
use crate::error::AbiError;

impl ParameterType {
    /// Field elements one value of this type encodes to.
    ///
    /// Array dimensions multiply through; struct and tuple members add up.
    pub fn field_count(&self) -> Result<usize, AbiError> {
        match self {
            Self::Field | Self::Boolean | Self::Integer { .. } => Ok(1),
            Self::String { length } => Ok(*length),
            Self::Array {
                length,
                element_type,
            } => length
                .checked_mul(element_type.field_count()?)
                .ok_or(AbiError::CountOverflow),
            Self::Struct { fields, .. } => sum(fields.iter().map(|f| &f.ty)),
            Self::Tuple { fields } => sum(fields.iter()),
        }
    }
}

fn sum<'a>(mut types: impl Iterator<Item = &'a ParameterType>) -> Result<usize, AbiError> {
    types.try_fold(0usize, |acc, t| {
        acc.checked_add(t.field_count()?)
            .ok_or(AbiError::CountOverflow)
    })
}

/// Total public field count over a parameter list.
pub fn public_field_count(params: &[Parameter]) -> Result<usize, AbiError> {
    sum(params.iter().filter(|p| p.is_public()).map(|p| &p.ty))
}

impl Circuit {
    /// Public field count `N` of this circuit.
    pub fn public_field_count(&self) -> Result<usize, AbiError> {
        public_field_count(&self.abi.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{Sign, Visibility};
    use ParameterType as T;

    fn public(name: &str, ty: T) -> Parameter {
        Parameter::new(name, ty, Visibility::Public)
    }

    #[test]
    fn scalars_count_one() {
        assert_eq!(T::Field.field_count().unwrap(), 1);
        assert_eq!(T::Boolean.field_count().unwrap(), 1);
        let u = T::Integer {
            sign: Sign::Unsigned,
            width: 64,
        };
        assert_eq!(u.field_count().unwrap(), 1);
    }

    #[test]
    fn strings_count_per_byte() {
        assert_eq!(T::String { length: 5 }.field_count().unwrap(), 5);
        assert_eq!(T::String { length: 0 }.field_count().unwrap(), 0);
    }

    #[test]
    fn nested_arrays_multiply() {
        let t = T::array(T::array(T::Field, 3), 2);
        assert_eq!(t.field_count().unwrap(), 6);
        let strs = T::array(T::String { length: 4 }, 3);
        assert_eq!(strs.field_count().unwrap(), 12);
    }

    #[test]
    fn struct_of_array_of_structs() {
        let pair = T::structure([("a", T::Field), ("b", T::Field)]);
        let outer = T::structure([("items", T::array(pair, 3))]);
        assert_eq!(outer.field_count().unwrap(), 6);
        assert_eq!(public_field_count(&[public("x", outer)]).unwrap(), 6);
    }

    #[test]
    fn private_parameters_contribute_nothing() {
        let wide = T::structure((0..10).map(|i| (format!("f{i}"), T::Field)));
        let params = vec![
            Parameter::new("secret", wide, Visibility::Private),
            Parameter::new("k", T::array(T::Field, 100), Visibility::Private),
        ];
        assert_eq!(public_field_count(&params).unwrap(), 0);
    }

    #[test]
    fn mixed_visibility_sums_public_only() {
        let params = vec![
            Parameter::new("s", T::Field, Visibility::Private),
            public("root", T::Field),
            public("tag", T::String { length: 3 }),
            public(
                "t",
                T::Tuple {
                    fields: vec![T::Boolean, T::array(T::Field, 2)],
                },
            ),
        ];
        assert_eq!(public_field_count(&params).unwrap(), 1 + 3 + 3);
    }

    #[test]
    fn overflow_is_reported() {
        let t = T::array(T::array(T::Field, usize::MAX), 2);
        assert_eq!(t.field_count(), Err(AbiError::CountOverflow));
    }
}
