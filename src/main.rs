use anyhow::{Context, Result};
use std::process;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufReader, BufWriter};
use tracing::info;

mod cli;

use line_sift::constants::OUTPUT_BUFFER_SIZE_BYTES;
use line_sift::utils::{format_duration, setup_logging};
use line_sift::{comparator_for, SiftConfig, SiftProcessor, SiftStats};

#[tokio::main]
async fn main() {
    let tool = cli::ToolName::from_argv();
    let args = cli::parse(&tool);

    let verbosity = if args.verbose { "verbose" } else { "normal" };
    if let Err(err) = setup_logging(verbosity) {
        cli::report_error(&tool, &err);
        process::exit(1);
    }

    match run(&args).await {
        Ok(stats) => {
            info!("Lines read: {}", stats.total_lines);
            info!("Unique lines: {}", stats.unique_lines);
            info!("Duplicates removed: {}", stats.duplicates_removed);
            info!("Chunks spilled: {}", stats.chunks_created);
            info!(
                "Entire process took {}",
                format_duration(stats.processing_time_ms as f64 / 1000.0)
            );
        }
        Err(err) => {
            cli::report_error(&tool, &err);
            process::exit(1);
        }
    }
}

async fn run(args: &cli::Args) -> Result<SiftStats> {
    // The comparison strategy is fixed before partitioning; chunks sorted
    // under one strategy cannot be merged under another.
    let comparator = comparator_for(&args.input);

    let input_file = File::open(&args.input)
        .await
        .with_context(|| format!("failed to open input file {}", args.input.display()))?;
    let input = BufReader::new(input_file);

    let processor = SiftProcessor::new(comparator, SiftConfig::default())?;

    match &args.output_file {
        Some(path) => {
            let file = File::create(path)
                .await
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            let mut output = BufWriter::with_capacity(OUTPUT_BUFFER_SIZE_BYTES, file);
            let stats = processor.process(input, &mut output).await?;
            output.shutdown().await?;
            Ok(stats)
        }
        None => {
            let mut output = tokio::io::stdout();
            processor.process(input, &mut output).await
        }
    }
}
