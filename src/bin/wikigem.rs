//! Convert article HTML to gemtext from the command line

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use gemini_wiki_converter::converter::DEFAULT_MAX_DEPTH;
use gemini_wiki_converter::gateway::{GatewayConfig, GatewayError, pages};
use gemini_wiki_converter::parser::decode_source;
use gemini_wiki_converter::{ConversionError, ConversionOptions, GemtextConverter, HtmlSourceParser};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "wikigem", version, about = "Render article HTML as gemtext")]
struct CliArgs {
    /// HTML file to convert; stdin when omitted
    #[arg(value_name = "PATH")]
    input: Option<PathBuf>,

    /// Content-Type header the HTML was served with, used for charset detection
    #[arg(long, value_name = "HEADER")]
    content_type: Option<String>,

    /// Elements nested deeper than this are dropped
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Wrap the output in the article page under this title
    #[arg(long, value_name = "NAME")]
    title: Option<String>,

    /// Language of the article, used for page links
    #[arg(long, env = "WIKIGEM_LANG", default_value = "en")]
    lang: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {origin}: {source}")]
    Read {
        origin: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    // A subscriber installed by an embedding test harness wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn read_input(input: Option<&PathBuf>) -> Result<Vec<u8>, CliError> {
    match input {
        Some(path) => fs::read(path).map_err(|source| CliError::Read {
            origin: path.display().to_string(),
            source,
        }),
        None => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .map_err(|source| CliError::Read {
                    origin: "stdin".to_string(),
                    source,
                })?;
            Ok(bytes)
        }
    }
}

fn run(args: &CliArgs) -> Result<(), CliError> {
    let bytes = read_input(args.input.as_ref())?;
    let source = decode_source(&bytes, args.content_type.as_deref())?;

    let converter = GemtextConverter::with_options(ConversionOptions {
        max_depth: args.max_depth,
    });
    let body = converter.convert(&HtmlSourceParser::new(), &source);
    info!(input_bytes = bytes.len(), output_bytes = body.len(), "converted");

    let output = match &args.title {
        Some(title) => {
            let language = GatewayConfig::default().language(&args.lang)?;
            pages::article_page(&language, title, &body)
        }
        None => body,
    };

    io::stdout()
        .lock()
        .write_all(output.as_bytes())
        .map_err(CliError::Write)
}

fn main() -> ExitCode {
    init_logging();
    let args = CliArgs::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "wikigem failed");
            ExitCode::FAILURE
        }
    }
}
