#![no_main]
use libfuzzer_sys::fuzz_target;
use zkblob_core::layout::{FIELD_HEX_WIDTH, HEADER_HEX_WIDTH};
use zkblob_core::{BlobCodec, BlobLayout};

// First byte picks the public field count; the rest is the blob.
fuzz_target!(|data: &[u8]| {
    let Some((&n, rest)) = data.split_first() else {
        return;
    };
    let Ok(blob) = std::str::from_utf8(rest) else {
        return;
    };
    let Some(layout) = BlobLayout::checked(usize::from(n % 16)) else {
        return;
    };
    let codec = BlobCodec::new(layout);
    if let Ok(parts) = codec.split(blob) {
        assert_eq!(parts.public_inputs.len(), layout.public_field_count * FIELD_HEX_WIDTH);
        assert_eq!(
            parts.proof.len() + parts.public_inputs.len() + HEADER_HEX_WIDTH,
            blob.len()
        );
    }
});
