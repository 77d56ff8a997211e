//! Paradex Signer CLI.
//!
//! Every command prints one JSON line on stdout: `{"ok": {...}}` with exit
//! code 0, or `{"err": {"code": N, "name": "..."}}` with exit code 1.
//! Logs go to stderr and are filtered with `RUST_LOG`.

use clap::{Parser, Subcommand};
use paradex_signer::conformance::{CorpusRunner, TestResult};
use paradex_signer::paradex::{compute_account_address, SystemConfig};
use paradex_signer::typed_data::{type_hash, type_signature};
use paradex_signer::{
    ErrorCode, FieldElement, HashBackendKind, Signature, Signer, SignerConfig, SignerResult,
};
use serde_json::{json, Value as Json};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "signer")]
#[command(about = "Starknet typed-data hashing and Stark-curve signing for Paradex", long_about = None)]
#[command(version)]
struct Cli {
    /// Signer configuration file (JSON); the environment is used when absent
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Hash backend override (`table` or `reference`)
    #[arg(long, global = true)]
    hash_backend: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information
    Version,

    /// Hash a typed message (JSON file or stdin)
    MessageHash {
        /// Account address the message is signed for
        #[arg(long)]
        address: String,
        /// Typed message file; stdin when absent
        input: Option<PathBuf>,
    },

    /// Print the canonical type signature and type hash
    TypeSignature {
        /// Type to resolve; defaults to the primary type
        #[arg(long = "type")]
        type_name: Option<String>,
        /// Typed message file; stdin when absent
        input: Option<PathBuf>,
    },

    /// Sign a raw hash, or hash and sign a typed message
    Sign {
        /// Stark private key
        #[arg(long)]
        private_key: String,
        /// Message hash to sign directly
        #[arg(long, conflicts_with_all = ["address", "input"])]
        hash: Option<String>,
        /// Account address for typed-message signing
        #[arg(long, required_unless_present = "hash")]
        address: Option<String>,
        /// Typed message file; stdin when absent
        input: Option<PathBuf>,
    },

    /// Verify a signature (exit code 1 when invalid)
    Verify {
        /// Message hash
        #[arg(long)]
        hash: String,
        /// Signature r
        #[arg(long)]
        r: String,
        /// Signature s
        #[arg(long)]
        s: String,
        /// Stark public key
        #[arg(long)]
        public_key: String,
    },

    /// Derive a Stark key pair from an L1 signature
    DeriveKey {
        /// 65-byte L1 signature as hex
        signature: String,
    },

    /// Compute the public key of a private key
    PublicKey {
        /// Stark private key
        #[arg(long)]
        private_key: String,
    },

    /// Compute the account address for a public key
    AccountAddress {
        /// System configuration JSON
        #[arg(long)]
        system_config: PathBuf,
        /// Stark public key
        #[arg(long)]
        public_key: String,
    },

    /// Run a conformance corpus
    Conformance {
        /// Corpus file
        corpus: PathBuf,
        /// Hash backend for hashing vectors
        #[arg(long)]
        backend: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Version) | None => {
            println!("Paradex Signer v{}", env!("CARGO_PKG_VERSION"));
            if cli.command.is_none() {
                println!("Use --help for usage information");
            }
            ExitCode::SUCCESS
        }
        Some(Commands::Verify {
            hash,
            r,
            s,
            public_key,
        }) => match verify(&cli, hash, r, s, public_key) {
            Ok(valid) => {
                let code = emit(Ok(json!({ "valid": valid })));
                if valid {
                    code
                } else {
                    ExitCode::FAILURE
                }
            }
            Err(e) => emit(Err(e)),
        },
        Some(Commands::Conformance { corpus, backend }) => conformance(corpus, backend.as_deref()),
        Some(command) => emit(run(&cli, command)),
    }
}

fn run(cli: &Cli, command: &Commands) -> SignerResult<Json> {
    let signer = build_signer(cli)?;
    match command {
        Commands::MessageHash { address, input } => {
            let typed = signer.parse_message(&read_input(input.as_deref())?)?;
            let hash = signer.message_hash_hex(&typed, address)?;
            Ok(json!({ "hash": hash, "primary_type": typed.primary_type() }))
        }
        Commands::TypeSignature { type_name, input } => {
            let typed = signer.parse_message(&read_input(input.as_deref())?)?;
            let name = type_name.as_deref().unwrap_or(typed.primary_type());
            Ok(json!({
                "type": name,
                "signature": type_signature(typed.types(), name)?,
                "type_hash": type_hash(typed.types(), name)?.to_hex(),
            }))
        }
        Commands::Sign {
            private_key,
            hash,
            address,
            input,
        } => {
            let private_key = FieldElement::from_hex(private_key)?;
            let (hash, signature) = match (hash, address) {
                (Some(hash), _) => {
                    let hash = FieldElement::from_hex(hash)?;
                    (hash, signer.sign(&hash, &private_key)?)
                }
                (None, Some(address)) => {
                    let typed = signer.parse_message(&read_input(input.as_deref())?)?;
                    let account = FieldElement::from_hex(address)?;
                    signer.sign_typed_message(&typed, &account, &private_key)?
                }
                (None, None) => {
                    return Err(ErrorCode::E203_UnexpectedValue(
                        "address".to_string(),
                        "required without --hash".to_string(),
                    ))
                }
            };
            Ok(json!({
                "hash": hash.to_hex(),
                "signature": signature.to_hex_pair(),
            }))
        }
        Commands::DeriveKey { signature } => {
            let private_key = signer.derive_key(signature)?;
            Ok(json!({
                "private_key": private_key.to_hex(),
                "public_key": signer.public_key(&private_key)?.to_hex(),
            }))
        }
        Commands::PublicKey { private_key } => {
            let private_key = FieldElement::from_hex(private_key)?;
            Ok(json!({ "public_key": signer.public_key(&private_key)?.to_hex() }))
        }
        Commands::AccountAddress {
            system_config,
            public_key,
        } => {
            let config = SystemConfig::from_file(system_config)?;
            let public_key = FieldElement::from_hex(public_key)?;
            let address = compute_account_address(signer.backend(), &config, &public_key)?;
            Ok(json!({ "address": address.to_hex() }))
        }
        Commands::Version | Commands::Verify { .. } | Commands::Conformance { .. } => {
            Err(ErrorCode::E900_InternalError("command dispatched twice".to_string()))
        }
    }
}

fn verify(cli: &Cli, hash: &str, r: &str, s: &str, public_key: &str) -> SignerResult<bool> {
    let signer = build_signer(cli)?;
    let hash = FieldElement::from_hex(hash)?;
    let signature = Signature::from_hex_pair(r, s)?;
    let public_key = FieldElement::from_hex(public_key)?;
    Ok(signer.verify(&hash, &signature, &public_key))
}

fn conformance(path: &Path, backend: Option<&str>) -> ExitCode {
    let kind = match backend.map(str::parse::<HashBackendKind>).transpose() {
        Ok(kind) => kind.unwrap_or_default(),
        Err(e) => return emit(Err(e)),
    };
    let runner = match CorpusRunner::load(path) {
        Ok(runner) => runner.with_backend(kind),
        Err(message) => return emit(Err(ErrorCode::E601_ConfigIo(message))),
    };

    let results = runner.run_all();
    let failures: Vec<Json> = results
        .details
        .iter()
        .filter_map(|(id, result)| match result {
            TestResult::Fail { expected, actual } => {
                Some(json!({ "id": id, "expected": expected, "actual": actual }))
            }
            TestResult::Error { message } => Some(json!({ "id": id, "error": message })),
            TestResult::Pass | TestResult::Skip { .. } => None,
        })
        .collect();

    let code = emit(Ok(json!({
        "backend": kind.as_str(),
        "passed": results.passed,
        "failed": results.failed,
        "skipped": results.skipped,
        "errors": results.errors,
        "failures": failures,
    })));

    if results.all_passed() {
        code
    } else {
        ExitCode::FAILURE
    }
}

fn build_signer(cli: &Cli) -> SignerResult<Signer> {
    let mut config = match &cli.config {
        Some(path) => SignerConfig::from_file(path)?,
        None => SignerConfig::from_env()?,
    };
    if let Some(kind) = &cli.hash_backend {
        config.hash_backend = kind.parse()?;
    }
    Signer::new(&config)
}

fn read_input(path: Option<&Path>) -> SignerResult<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| ErrorCode::E601_ConfigIo(format!("{}: {}", path.display(), e))),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| ErrorCode::E601_ConfigIo(format!("stdin: {}", e)))?;
            Ok(buf)
        }
    }
}

fn emit(result: SignerResult<Json>) -> ExitCode {
    match result {
        Ok(value) => {
            println!("{}", json!({ "ok": value }));
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(code = e.code(), "command failed: {}", e);
            println!(
                "{}",
                json!({ "err": { "code": e.code(), "name": e.name(), "message": e.to_string() } })
            );
            ExitCode::FAILURE
        }
    }
}
