//! Slicing a combined `proof ∥ public inputs` hex blob.
//!
//! Both extractions validate the blob once against the layout and then slice
//! by byte offset. Validation guarantees every byte past the header is an
//! ASCII hex digit, so every offset used afterwards is a char boundary.

use crate::abi::Circuit;
use crate::error::{AbiError, BlobError, Error};
use crate::field::FieldElement;
use crate::layout::{BlobLayout, FIELD_HEX_WIDTH, HEADER_END, HEADER_HEX_WIDTH};

/// Codec bound to one circuit's layout.
///
/// Cheap to copy and free of interior state; share it freely across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobCodec {
    layout: BlobLayout,
}

/// Both halves of a blob, borrowed where possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitBlob<'a> {
    /// Raw public-input region (`N * 64` hex chars).
    pub public_inputs: &'a str,
    /// Commitments followed by the proof tail.
    pub proof: String,
}

impl BlobCodec {
    /// Codec for an explicit layout.
    #[must_use]
    pub const fn new(layout: BlobLayout) -> Self {
        Self { layout }
    }

    /// Codec for a circuit's ABI.
    pub fn for_circuit(circuit: &Circuit) -> Result<Self, AbiError> {
        BlobLayout::for_circuit(circuit).map(Self::new)
    }

    /// The layout this codec slices by.
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> &BlobLayout {
        &self.layout
    }

    /// Reject blobs that are too short or carry non-hex bytes after the header.
    pub fn check(&self, blob: &str) -> Result<(), BlobError> {
        let bytes = blob.as_bytes();
        if bytes.len() < self.layout.public_inputs_end {
            return Err(BlobError::TooShort {
                expected: self.layout.public_inputs_end,
                actual: bytes.len(),
            });
        }
        match bytes[HEADER_HEX_WIDTH..]
            .iter()
            .position(|b| !b.is_ascii_hexdigit())
        {
            Some(i) => Err(BlobError::NotHex {
                offset: HEADER_HEX_WIDTH + i,
                byte: bytes[HEADER_HEX_WIDTH + i],
            }),
            None => Ok(()),
        }
    }

    /// The raw public-input region, `blob[header_end..public_inputs_end]`.
    pub fn extract_public_inputs<'a>(&self, blob: &'a str) -> Result<&'a str, BlobError> {
        self.check(blob)?;
        Ok(&blob[self.layout.header_end..self.layout.public_inputs_end])
    }

    /// The standalone proof: commitments followed by the proof tail, with the
    /// public-input region excised and the header dropped.
    pub fn extract_proof(&self, blob: &str) -> Result<String, BlobError> {
        self.check(blob)?;
        Ok(self.proof_unchecked(blob))
    }

    /// Both extractions with a single validation pass.
    pub fn split<'a>(&self, blob: &'a str) -> Result<SplitBlob<'a>, BlobError> {
        self.check(blob)?;
        Ok(SplitBlob {
            public_inputs: &blob[self.layout.header_end..self.layout.public_inputs_end],
            proof: self.proof_unchecked(blob),
        })
    }

    /// The public-input region cut into one 64-char slice per field element.
    pub fn public_input_fields<'a>(&self, blob: &'a str) -> Result<Vec<&'a str>, BlobError> {
        let region = self.extract_public_inputs(blob)?;
        Ok((0..self.layout.public_field_count)
            .map(|i| &region[i * FIELD_HEX_WIDTH..(i + 1) * FIELD_HEX_WIDTH])
            .collect())
    }

    /// Public inputs decoded into field elements, in ABI order.
    pub fn decode_public_inputs(&self, blob: &str) -> Result<Vec<FieldElement>, BlobError> {
        self.public_input_fields(blob)?
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                s.parse::<FieldElement>().map_err(|_| BlobError::NotHex {
                    offset: self.layout.header_end + i * FIELD_HEX_WIDTH,
                    byte: s.as_bytes()[0],
                })
            })
            .collect()
    }

    fn proof_unchecked(&self, blob: &str) -> String {
        let tail = &blob[self.layout.public_inputs_end..];
        let mut out = String::with_capacity(HEADER_END - HEADER_HEX_WIDTH + tail.len());
        out.push_str(&blob[HEADER_HEX_WIDTH..HEADER_END]);
        out.push_str(tail);
        out
    }
}

/// Raw public inputs of `blob` for `circuit`.
pub fn extract_public_inputs(circuit: &Circuit, blob: &str) -> Result<String, Error> {
    let codec = BlobCodec::for_circuit(circuit)?;
    Ok(codec.extract_public_inputs(blob)?.to_owned())
}

/// Standalone proof of `blob` for `circuit`.
pub fn extract_proof(circuit: &Circuit, blob: &str) -> Result<String, Error> {
    let codec = BlobCodec::for_circuit(circuit)?;
    Ok(codec.extract_proof(blob)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{Parameter, ParameterType, Visibility};

    fn fixture() -> String {
        let mut s = String::from("00000001");
        s.push_str(&"f".repeat(192));
        s.push_str(&"a".repeat(128));
        s.push_str(&"b".repeat(64));
        s
    }

    fn two_public() -> Circuit {
        Circuit::new(
            "",
            vec![
                Parameter::new("x", ParameterType::Field, Visibility::Public),
                Parameter::new("y", ParameterType::Field, Visibility::Public),
                Parameter::new("w", ParameterType::array(ParameterType::Field, 4), Visibility::Private),
            ],
        )
        .unwrap()
    }

    #[test]
    fn fixture_slices_exactly() {
        let blob = fixture();
        let c = two_public();
        assert_eq!(extract_public_inputs(&c, &blob).unwrap(), "a".repeat(128));
        let proof = extract_proof(&c, &blob).unwrap();
        assert_eq!(proof, format!("{}{}", "f".repeat(192), "b".repeat(64)));
        assert_eq!(proof.len(), blob.len() - HEADER_HEX_WIDTH - 2 * FIELD_HEX_WIDTH);
    }

    #[test]
    fn split_matches_individual_calls() {
        let blob = fixture();
        let codec = BlobCodec::for_circuit(&two_public()).unwrap();
        let s = codec.split(&blob).unwrap();
        assert_eq!(s.public_inputs, codec.extract_public_inputs(&blob).unwrap());
        assert_eq!(s.proof, codec.extract_proof(&blob).unwrap());
    }

    #[test]
    fn fields_and_decoding() {
        let blob = fixture();
        let codec = BlobCodec::for_circuit(&two_public()).unwrap();
        let fields = codec.public_input_fields(&blob).unwrap();
        assert_eq!(fields, vec!["a".repeat(64), "a".repeat(64)]);
        let decoded = codec.decode_public_inputs(&blob).unwrap();
        assert_eq!(decoded, vec![FieldElement([0xaa; 32]); 2]);
    }

    #[test]
    fn no_public_inputs_gives_empty_region() {
        let codec = BlobCodec::new(BlobLayout::checked(0).unwrap());
        let blob = fixture();
        assert_eq!(codec.extract_public_inputs(&blob).unwrap(), "");
        assert_eq!(codec.extract_proof(&blob).unwrap(), &blob[8..]);
        assert!(codec.public_input_fields(&blob).unwrap().is_empty());
    }

    #[test]
    fn truncated_blob_is_malformed() {
        let codec = BlobCodec::for_circuit(&two_public()).unwrap();
        let blob = fixture();
        let short = &blob[..327];
        assert_eq!(
            codec.extract_public_inputs(short),
            Err(BlobError::TooShort {
                expected: 328,
                actual: 327
            })
        );
        assert!(codec.extract_proof("").is_err());
    }

    #[test]
    fn exact_length_without_tail_is_fine() {
        let codec = BlobCodec::for_circuit(&two_public()).unwrap();
        let blob = fixture();
        let exact = &blob[..328];
        assert_eq!(codec.extract_proof(exact).unwrap(), "f".repeat(192));
    }

    #[test]
    fn non_hex_after_header_is_rejected() {
        let codec = BlobCodec::for_circuit(&two_public()).unwrap();
        let mut blob = fixture();
        blob.replace_range(250..251, "é");
        assert!(matches!(
            codec.extract_proof(&blob),
            Err(BlobError::NotHex { offset: 250, .. })
        ));
    }

    #[test]
    fn header_is_opaque() {
        let codec = BlobCodec::for_circuit(&two_public()).unwrap();
        let mut blob = fixture();
        blob.replace_range(0..8, "zzzzzzzz");
        assert!(codec.extract_proof(&blob).is_ok());
    }
}
