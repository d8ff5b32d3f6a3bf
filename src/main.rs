//! Proof Transcoder CLI
//!
//! Encodes snarkjs artifacts into verify instruction data, and decodes
//! instruction data back into readable coordinates.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use proof_transcoder::artifacts::{self, OutputFormat};
use proof_transcoder::common::{init_from_config, LogFormat, LogLevel};
use proof_transcoder::{FieldCheck, Result, Transcoder, TranscoderConfig};

#[derive(Parser)]
#[command(name = "proof-transcoder")]
#[command(about = "Transcode Groth16 proofs into Solana verifier instruction data")]
struct Cli {
    /// Log level (overrides TRANSCODER_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format: pretty or json (overrides TRANSCODER_LOG_FORMAT)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode proof.json + public.json into instruction data
    Encode {
        /// Path to snarkjs proof.json
        #[arg(short, long)]
        proof: PathBuf,

        /// Path to snarkjs public.json
        #[arg(short = 'i', long)]
        public: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Output format: binary or hex
        #[arg(short, long, default_value = "hex")]
        format: OutputFormat,

        /// Field check: width or modulus (overrides TRANSCODER_FIELD_CHECK)
        #[arg(long)]
        field_check: Option<FieldCheck>,
    },

    /// Decode instruction data into a JSON summary
    Decode {
        /// File holding raw or hex instruction data
        #[arg(long, conflicts_with = "hex", required_unless_present = "hex")]
        input: Option<PathBuf>,

        /// Instruction data as a hex string
        #[arg(long)]
        hex: Option<String>,
    },
}

fn main() -> ExitCode {
    // .env is optional
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        // Transcoder failures are already logged as request events
        Err(e) if e.is_input_error() => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!(code = e.error_code(), "{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = TranscoderConfig::from_env()?;
    if let Some(level) = cli.log_level.as_deref() {
        config.log_level = LogLevel::from(level);
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Commands::Encode {
        field_check: Some(field_check),
        ..
    } = &cli.command
    {
        config.field_check = *field_check;
    }

    init_from_config(&config)?;
    config.log_summary();

    let transcoder = Transcoder::from_config(&config);

    match cli.command {
        Commands::Encode {
            proof,
            public,
            out,
            format,
            ..
        } => encode(&transcoder, &proof, &public, out, format),
        Commands::Decode { input, hex } => decode(&transcoder, input, hex),
    }
}

fn encode(
    transcoder: &Transcoder,
    proof_path: &Path,
    public_path: &Path,
    out: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let proof = artifacts::load_proof(proof_path)?;
    let public_signals = artifacts::load_public_signals(public_path)?;
    let data = transcoder.encode_request(&proof, &public_signals)?;

    match out {
        Some(path) => {
            artifacts::write_instruction(&path, &data, format)?;
            tracing::info!(path = %path.display(), bytes = data.len(), "instruction written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&artifacts::render(&data, format))?;
            if format == OutputFormat::Hex {
                writeln!(stdout)?;
            }
            stdout.flush()?;
        }
    }

    Ok(())
}

fn decode(transcoder: &Transcoder, input: Option<PathBuf>, hex: Option<String>) -> Result<()> {
    let data = match (input, hex) {
        (Some(path), _) => artifacts::read_instruction(path)?,
        (None, Some(text)) => artifacts::decode_hex(&text)?,
        (None, None) => Vec::new(),
    };

    let summary = transcoder.inspect(&data)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
