//! Layout and slicing invariants.
//!
//! The codec is checked against blobs assembled region by region, so the
//! expected slices are known independently of the offset arithmetic.

use proptest::prelude::*;
use zkblob_core::layout::{FIELD_HEX_WIDTH, HEADER_END, HEADER_HEX_WIDTH};
use zkblob_core::{
    BlobCodec, BlobError, BlobLayout, Circuit, Parameter, ParameterType, Visibility,
};

/// Assemble `header ∥ commitments ∥ public ∥ tail` from explicit regions.
fn assemble(header: &str, commitments: &str, public: &str, tail: &str) -> String {
    assert_eq!(header.len(), HEADER_HEX_WIDTH);
    assert_eq!(commitments.len(), HEADER_END - HEADER_HEX_WIDTH);
    format!("{header}{commitments}{public}{tail}")
}

fn hex_of(len: usize, seed: u8) -> String {
    const DIGITS: &[u8] = b"0123456789abcdef";
    (0..len)
        .map(|i| DIGITS[(i + seed as usize) % 16] as char)
        .collect()
}

#[test]
fn reference_fixture() {
    let circuit = Circuit::new(
        "",
        vec![
            Parameter::new("a", ParameterType::Field, Visibility::Public),
            Parameter::new("b", ParameterType::Field, Visibility::Public),
        ],
    )
    .unwrap();
    let blob = assemble(
        "00000001",
        &"f".repeat(192),
        &"a".repeat(128),
        &"b".repeat(64),
    );
    let codec = BlobCodec::for_circuit(&circuit).unwrap();
    assert_eq!(codec.extract_public_inputs(&blob).unwrap(), "a".repeat(128));
    assert_eq!(
        codec.extract_proof(&blob).unwrap(),
        format!("{}{}", "f".repeat(192), "b".repeat(64))
    );
}

#[test]
fn nested_struct_layout() {
    // struct { items: [struct { x: Field, y: Field }; 3] } → 6 fields
    let pair = ParameterType::structure([("x", ParameterType::Field), ("y", ParameterType::Field)]);
    let outer = ParameterType::structure([("items", ParameterType::array(pair, 3))]);
    let circuit = Circuit::new(
        "",
        vec![
            Parameter::new("p", outer.clone(), Visibility::Public),
            Parameter::new("hidden", outer, Visibility::Private),
        ],
    )
    .unwrap();
    let layout = BlobLayout::for_circuit(&circuit).unwrap();
    assert_eq!(layout.public_field_count, 6);
    assert_eq!(layout.public_inputs_end, HEADER_END + 6 * FIELD_HEX_WIDTH);
}

#[test]
fn no_public_parameters() {
    let circuit = Circuit::new(
        "",
        vec![Parameter::new(
            "s",
            ParameterType::String { length: 32 },
            Visibility::Private,
        )],
    )
    .unwrap();
    let codec = BlobCodec::for_circuit(&circuit).unwrap();
    assert_eq!(codec.layout().public_inputs_end, codec.layout().header_end);
    let blob = assemble("00000000", &hex_of(192, 3), "", &hex_of(10, 1));
    assert_eq!(codec.extract_public_inputs(&blob).unwrap(), "");
}

prop_compose! {
    fn arb_regions()(n in 0usize..=12, tail in 0usize..=256, seed in any::<u8>())
        -> (usize, String, String, String, String)
    {
        (
            n,
            hex_of(HEADER_HEX_WIDTH, seed),
            hex_of(192, seed.wrapping_add(1)),
            hex_of(n * FIELD_HEX_WIDTH, seed.wrapping_add(2)),
            hex_of(tail, seed.wrapping_add(3)),
        )
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    // The two extractions recover exactly the regions the blob was built from.
    #[test]
    fn slices_recover_regions((n, header, commits, public, tail) in arb_regions()) {
        let blob = assemble(&header, &commits, &public, &tail);
        let codec = BlobCodec::new(BlobLayout::checked(n).unwrap());

        let pi = codec.extract_public_inputs(&blob).unwrap();
        prop_assert_eq!(pi.len(), n * FIELD_HEX_WIDTH);
        prop_assert_eq!(pi, public.as_str());

        let proof = codec.extract_proof(&blob).unwrap();
        prop_assert_eq!(proof.len(), blob.len() - HEADER_HEX_WIDTH - n * FIELD_HEX_WIDTH);
        prop_assert_eq!(proof, format!("{commits}{tail}"));

        prop_assert_eq!(codec.public_input_fields(&blob).unwrap().len(), n);
    }

    // Any truncation into the public-input region is reported, never read past.
    #[test]
    fn truncation_is_malformed(n in 0usize..=8, cut in 0usize..=1000) {
        let layout = BlobLayout::checked(n).unwrap();
        let cut = cut % layout.public_inputs_end;
        let blob = hex_of(cut, 0);
        let codec = BlobCodec::new(layout);
        prop_assert_eq!(
            codec.extract_proof(&blob),
            Err(BlobError::TooShort { expected: layout.public_inputs_end, actual: cut })
        );
        prop_assert!(codec.extract_public_inputs(&blob).is_err());
    }

    // Public arrays count their full extent; wrapping them in a private
    // parameter hides all of it.
    #[test]
    fn array_counts_multiply(a in 1usize..=6, b in 1usize..=6, s in 0usize..=9) {
        let t = ParameterType::array(ParameterType::array(ParameterType::String { length: s }, b), a);
        let public = Circuit::new("", vec![Parameter::new("x", t.clone(), Visibility::Public)]).unwrap();
        let private = Circuit::new("", vec![Parameter::new("x", t, Visibility::Private)]).unwrap();
        prop_assert_eq!(public.public_field_count().unwrap(), a * b * s);
        prop_assert_eq!(private.public_field_count().unwrap(), 0);
    }
}
