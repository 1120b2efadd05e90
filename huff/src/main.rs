use anyhow::Context;
use clap::Parser;
use huff::files::{
    compression_ratio, decode_file, decode_to_default_output, encode_file,
    encode_to_default_output, require_compressed_extension,
};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Clone, clap::Args)]
struct OperationArgs {
    input_path: PathBuf,

    /// Write here instead of next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Operation {
    /// Compress a text file into a .huff file
    Huff(OperationArgs),
    /// Decompress a .huff file into a text file
    Unhuff(OperationArgs),
}

#[derive(Debug, clap::Parser)]
#[command(version, about = "Huffman compression for text files")]
struct Args {
    /// Log every stage of the encoder and decoder
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    op: Operation,
}

fn compress(args: OperationArgs) -> anyhow::Result<()> {
    let input_path = args.input_path;

    let output_path = match args.output {
        Some(output_path) => {
            encode_file(&input_path, &output_path)
                .with_context(|| format!("failed to compress {}", input_path.display()))?;
            output_path
        }
        None => {
            encode_to_default_output(&input_path)
                .with_context(|| format!("failed to compress {}", input_path.display()))?
                .0
        }
    };

    let ratio = compression_ratio(&input_path, &output_path)?;
    println!(
        "Compressed {} to {} (compression ratio {:.3})",
        input_path.display(),
        output_path.display(),
        ratio
    );

    Ok(())
}

fn decompress(args: OperationArgs) -> anyhow::Result<()> {
    let input_path = args.input_path;

    let output_path = match args.output {
        Some(output_path) => {
            require_compressed_extension(&input_path)?;
            decode_file(&input_path, &output_path)
                .with_context(|| format!("failed to decompress {}", input_path.display()))?;
            output_path
        }
        None => {
            decode_to_default_output(&input_path)
                .with_context(|| format!("failed to decompress {}", input_path.display()))?
                .0
        }
    };

    println!(
        "Decompressed {} to {}",
        input_path.display(),
        output_path.display()
    );

    Ok(())
}

fn init_logger(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });

    // RUST_LOG directives take precedence over the flag.
    builder.parse_env("RUST_LOG");

    builder.init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logger(args.verbose);

    match args.op {
        Operation::Huff(args) => compress(args),
        Operation::Unhuff(args) => decompress(args),
    }
}
