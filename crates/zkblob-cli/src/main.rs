// crates/zkblob-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zkblob_core::{
    io::{read_circuit_auto, read_hex_file, read_proof_artifact_auto, write_hex_file, write_proof_artifact_auto},
    BlobCodec, BlobLayout, Circuit, CircuitSessionManager, InputMap, ProofSystem, SessionOptions,
    Visibility,
};
use zkblob_mock::MockBackend;

#[derive(Parser, Debug)]
#[command(
    name = "zkblob",
    about = "Proof blob layout tool",
    long_about = "Proof blob layout tool.\n\nInspect a circuit's public-input layout, split combined proof blobs, and prove/verify with the in-memory reference backend.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    /// TOML file with defaults (`proof_system`, `recursive`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the public field count and region offsets of a circuit
    Inspect {
        /// Compiled circuit (JSON/CBOR)
        #[arg(long)]
        circuit: PathBuf,

        /// Emit JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Split a combined hex blob into public inputs and proof
    Split {
        /// Compiled circuit (JSON/CBOR)
        #[arg(long)]
        circuit: PathBuf,

        /// Text file holding the combined hex blob
        #[arg(long)]
        blob: PathBuf,

        /// Where to write the raw public inputs (stdout if omitted)
        #[arg(long)]
        out_public: Option<PathBuf>,

        /// Where to write the standalone proof (stdout if omitted)
        #[arg(long)]
        out_proof: Option<PathBuf>,
    },

    /// Prove with the reference backend
    Prove {
        /// Compiled circuit (JSON/CBOR)
        #[arg(long)]
        circuit: PathBuf,

        /// JSON object of inputs keyed by parameter name
        #[arg(long)]
        inputs: PathBuf,

        /// Output path for the proof artifact (CBOR/JSON)
        #[arg(long, default_value = "proof.json")]
        out: PathBuf,

        /// Proof system (overrides config)
        #[arg(long, value_enum)]
        proof_system: Option<ProofSystemOpt>,

        /// Set up and prove for recursive verification
        #[arg(long, default_value_t = false)]
        recursive: bool,
    },

    /// Verify a proof artifact with the reference backend
    Verify {
        /// Compiled circuit (JSON/CBOR)
        #[arg(long)]
        circuit: PathBuf,

        /// Proof artifact (CBOR/JSON)
        #[arg(long)]
        proof: PathBuf,

        /// The proof was produced with `--recursive`
        #[arg(long, default_value_t = false)]
        recursive: bool,
    },
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum ProofSystemOpt {
    /// UltraHonk
    Honk,
}

impl From<ProofSystemOpt> for ProofSystem {
    fn from(o: ProofSystemOpt) -> Self {
        match o {
            ProofSystemOpt::Honk => Self::Honk,
        }
    }
}

#[derive(Serialize)]
struct ParamReport<'a> {
    name: &'a str,
    ty: String,
    visibility: Visibility,
    fields: usize,
}

#[derive(Serialize)]
struct InspectReport<'a> {
    parameters: Vec<ParamReport<'a>>,
    layout: BlobLayout,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let opts = load_options(cli.config.as_deref())?;
    match cli.cmd {
        Cmd::Inspect { circuit, json } => inspect(&circuit, json),

        Cmd::Split {
            circuit,
            blob,
            out_public,
            out_proof,
        } => split(&circuit, &blob, out_public.as_deref(), out_proof.as_deref()),

        Cmd::Prove {
            circuit,
            inputs,
            out,
            proof_system,
            recursive,
        } => {
            let opts = SessionOptions {
                proof_system: proof_system.map_or(opts.proof_system, Into::into),
                recursive: recursive || opts.recursive,
            };
            prove(&circuit, &inputs, &out, opts).await
        }

        Cmd::Verify {
            circuit,
            proof,
            recursive,
        } => {
            let opts = SessionOptions {
                recursive: recursive || opts.recursive,
                ..opts
            };
            verify(&circuit, &proof, opts).await
        }
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn load_options(path: Option<&Path>) -> Result<SessionOptions> {
    let Some(path) = path else {
        return Ok(SessionOptions::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn inspect(circuit_path: &Path, json: bool) -> Result<()> {
    let circuit = read_circuit_auto(circuit_path)?;
    let layout = BlobLayout::for_circuit(&circuit).context("computing layout")?;

    let parameters = circuit
        .abi
        .parameters
        .iter()
        .map(|p| {
            let fields = if p.is_public() { p.ty.field_count()? } else { 0 };
            Ok(ParamReport {
                name: &p.name,
                ty: p.ty.to_string(),
                visibility: p.visibility,
                fields,
            })
        })
        .collect::<Result<Vec<_>, zkblob_core::AbiError>>()?;
    let report = InspectReport { parameters, layout };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        );
        return Ok(());
    }
    for p in &report.parameters {
        println!(
            "{:<24} {:<8} {:<28} {} field(s)",
            p.name,
            match p.visibility {
                Visibility::Public => "public",
                Visibility::Private => "private",
            },
            p.ty,
            p.fields
        );
    }
    println!(
        "public fields: {}  header_end: {}  public_inputs_end: {}",
        layout.public_field_count, layout.header_end, layout.public_inputs_end
    );
    Ok(())
}

fn split(
    circuit_path: &Path,
    blob_path: &Path,
    out_public: Option<&Path>,
    out_proof: Option<&Path>,
) -> Result<()> {
    let circuit = read_circuit_auto(circuit_path)?;
    let blob = read_hex_file(blob_path)?;
    let codec = BlobCodec::for_circuit(&circuit).context("computing layout")?;
    let parts = codec
        .split(&blob)
        .with_context(|| format!("splitting {}", blob_path.display()))?;
    info!(
        public_fields = codec.layout().public_field_count,
        blob_len = blob.len(),
        proof_len = parts.proof.len(),
        "split blob"
    );

    match out_public {
        Some(p) => write_hex_file(p, parts.public_inputs)?,
        None => println!("public_inputs: {}", parts.public_inputs),
    }
    match out_proof {
        Some(p) => write_hex_file(p, &parts.proof)?,
        None => println!("proof: {}", parts.proof),
    }
    Ok(())
}

fn read_inputs(path: &Path) -> Result<InputMap> {
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let v: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    match v {
        serde_json::Value::Object(m) => Ok(m),
        _ => bail!("{}: inputs must be a JSON object", path.display()),
    }
}

async fn open_session(
    circuit: Circuit,
    recursive: bool,
) -> Result<(CircuitSessionManager<MockBackend>, zkblob_core::SessionId)> {
    let mgr = CircuitSessionManager::new(MockBackend::new());
    mgr.prepare_srs().await.context("preparing SRS")?;
    let id = mgr
        .setup(circuit, recursive)
        .await
        .context("circuit setup failed")?;
    Ok((mgr, id))
}

async fn prove(
    circuit_path: &Path,
    inputs_path: &Path,
    out: &Path,
    opts: SessionOptions,
) -> Result<()> {
    let circuit = read_circuit_auto(circuit_path)?;
    let inputs = read_inputs(inputs_path)?;
    info!(circuit=%circuit_path.display(), out=%out.display(), proof_system=%opts.proof_system, recursive=opts.recursive, "proving");

    let (mgr, id) = open_session(circuit, opts.recursive).await?;
    let artifact = mgr
        .generate_proof(id, &inputs, opts.proof_system, opts.recursive)
        .await
        .context("proof generation failed")?;
    mgr.teardown(id).await.context("releasing circuit")?;

    write_proof_artifact_auto(out, &artifact)
        .with_context(|| format!("writing proof to {}", out.display()))?;
    println!(
        "Proved with {}, wrote {} ({} hex chars)",
        artifact.proof_system,
        out.display(),
        artifact.len()
    );
    Ok(())
}

async fn verify(circuit_path: &Path, proof_path: &Path, opts: SessionOptions) -> Result<()> {
    let circuit = read_circuit_auto(circuit_path)?;
    let artifact = read_proof_artifact_auto(proof_path)
        .with_context(|| format!("reading proof artifact from {}", proof_path.display()))?;
    info!(circuit=%circuit_path.display(), proof=%proof_path.display(), "verifying proof");

    let (mgr, id) = open_session(circuit, opts.recursive).await?;
    let ok = mgr
        .verify_proof(
            id,
            &artifact.proof_with_public_inputs,
            &artifact.vkey,
            artifact.proof_system,
        )
        .await
        .context("verification failed")?;
    mgr.teardown(id).await.context("releasing circuit")?;

    if !ok {
        bail!("proof rejected");
    }
    println!("OK: proof verified");
    Ok(())
}
