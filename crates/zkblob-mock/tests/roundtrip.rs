//! Mock backend driven through the session manager, with the codec applied
//! to what it produces.

use serde_json::json;
use zkblob_core::layout::{FIELD_HEX_WIDTH, HEADER_END};
use zkblob_core::{
    BlobCodec, Circuit, CircuitSessionManager, FieldElement, InputMap, ProofSystem, SessionError,
};
use zkblob_mock::{MockBackend, TAIL_FIELDS};

const LEASE: &str = r#"{
    "noir_version": "0.36.0",
    "bytecode": "H4sIAAAAAAAA/+1YS27CMBA=",
    "abi": {
        "parameters": [
            {"name": "owner_secret", "type": {"kind": "field"}, "visibility": "private"},
            {"name": "spot_id", "type": {"kind": "integer", "sign": "unsigned", "width": 32}, "visibility": "public"},
            {"name": "lease", "type": {"kind": "struct", "path": "lease::Lease", "fields": [
                {"name": "start", "type": {"kind": "integer", "sign": "unsigned", "width": 64}},
                {"name": "end", "type": {"kind": "integer", "sign": "unsigned", "width": 64}}
            ]}, "visibility": "public"},
            {"name": "plate", "type": {"kind": "string", "length": 3}, "visibility": "public"}
        ],
        "return_type": null
    }
}"#;

fn lease() -> Circuit {
    Circuit::from_json(LEASE).unwrap()
}

fn inputs(secret: &str) -> InputMap {
    json!({
        "owner_secret": secret,
        "spot_id": 42,
        "lease": {"start": "1700000000", "end": "1700086400"},
        "plate": "ABC",
    })
    .as_object()
    .cloned()
    .unwrap()
}

#[tokio::test]
async fn prove_split_verify() {
    let mgr = CircuitSessionManager::new(MockBackend::new());
    let circuit = lease();
    let id = mgr.setup(circuit.clone(), false).await.unwrap();
    let art = mgr
        .generate_proof(id, &inputs("0x1234"), ProofSystem::Honk, false)
        .await
        .unwrap();

    // 1 + 2 + 3 public fields
    let codec = BlobCodec::for_circuit(&circuit).unwrap();
    assert_eq!(codec.layout().public_field_count, 6);
    assert_eq!(
        art.len(),
        codec.layout().expected_len(TAIL_FIELDS * FIELD_HEX_WIDTH)
    );
    assert_eq!(&art.proof_with_public_inputs[..8], "0000000d");

    let fields = art.public_input_fields(&circuit).unwrap();
    let expect: Vec<FieldElement> = [42u128, 1_700_000_000, 1_700_086_400, 65, 66, 67]
        .into_iter()
        .map(FieldElement::from_u128)
        .collect();
    assert_eq!(fields, expect);

    let proof = art.proof(&circuit).unwrap();
    assert_eq!(proof.len(), 192 + TAIL_FIELDS * FIELD_HEX_WIDTH);
    assert_eq!(&proof[..192], &art.proof_with_public_inputs[8..HEADER_END]);

    assert!(mgr
        .verify_proof(id, &art.proof_with_public_inputs, &art.vkey, ProofSystem::Honk)
        .await
        .unwrap());
    mgr.teardown(id).await.unwrap();
    assert_eq!(mgr.backend().loaded(), 0);
}

#[tokio::test]
async fn tampering_is_rejected() {
    let mgr = CircuitSessionManager::new(MockBackend::new());
    let id = mgr.setup(lease(), false).await.unwrap();
    let art = mgr
        .generate_proof(id, &inputs("7"), ProofSystem::Honk, false)
        .await
        .unwrap();

    // Flip one hex digit inside the first public input.
    let mut forged = art.proof_with_public_inputs.clone();
    let at = HEADER_END + FIELD_HEX_WIDTH - 1;
    let flipped = if &forged[at..=at] == "0" { "1" } else { "0" };
    forged.replace_range(at..=at, flipped);
    assert!(!mgr
        .verify_proof(id, &forged, &art.vkey, ProofSystem::Honk)
        .await
        .unwrap());

    assert!(!mgr
        .verify_proof(id, &art.proof_with_public_inputs, &"00".repeat(32), ProofSystem::Honk)
        .await
        .unwrap());

    let truncated = &art.proof_with_public_inputs[..HEADER_END + 10];
    let err = mgr
        .verify_proof(id, truncated, &art.vkey, ProofSystem::Honk)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::VerificationFailed(_)));
}

#[tokio::test]
async fn private_inputs_stay_out_of_public_region() {
    let mgr = CircuitSessionManager::new(MockBackend::new());
    let circuit = lease();
    let id = mgr.setup(circuit.clone(), false).await.unwrap();
    let a = mgr
        .generate_proof(id, &inputs("1"), ProofSystem::Honk, false)
        .await
        .unwrap();
    let b = mgr
        .generate_proof(id, &inputs("2"), ProofSystem::Honk, false)
        .await
        .unwrap();
    assert_eq!(
        a.public_inputs(&circuit).unwrap(),
        b.public_inputs(&circuit).unwrap()
    );
    assert_ne!(a.proof(&circuit).unwrap(), b.proof(&circuit).unwrap());
    assert_eq!(a.vkey, b.vkey);
}

#[tokio::test]
async fn bad_inputs_fail_proving() {
    let mgr = CircuitSessionManager::new(MockBackend::new());
    let id = mgr.setup(lease(), false).await.unwrap();
    let mut bad = inputs("1");
    bad.insert("plate".into(), json!("TOOLONG"));
    let err = mgr
        .generate_proof(id, &bad, ProofSystem::Honk, false)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::ProvingFailed(m) if m.contains("plate")));

    let err = mgr
        .generate_proof(id, &inputs("1"), ProofSystem::Honk, true)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::ProvingFailed(_)));
}

#[tokio::test]
async fn srs_gate() {
    let mgr = CircuitSessionManager::new(MockBackend::requiring_srs());
    assert!(matches!(
        mgr.setup(lease(), false).await,
        Err(SessionError::SetupFailed(_))
    ));
    mgr.prepare_srs().await.unwrap();
    let id = mgr.setup(lease(), true).await.unwrap();
    mgr.generate_proof(id, &inputs("3"), ProofSystem::Honk, true)
        .await
        .unwrap();
}

#[tokio::test]
async fn bulk_teardown_releases_backend() {
    let mgr = CircuitSessionManager::new(MockBackend::new());
    let a = mgr.setup(lease(), false).await.unwrap();
    let _b = mgr.setup(lease(), false).await.unwrap();
    assert_eq!(mgr.backend().loaded(), 2);
    mgr.teardown_all().await.unwrap();
    assert_eq!(mgr.backend().loaded(), 0);
    assert_eq!(
        mgr.generate_proof(a, &inputs("1"), ProofSystem::Honk, false)
            .await
            .unwrap_err(),
        SessionError::SessionDestroyed(a)
    );
}
