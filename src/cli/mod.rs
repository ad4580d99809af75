// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, built on clap.
// All pipeline logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `inspect` — load a corpus and stream a few batches
//   2. `config`  — dump the default data configuration
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, ConfigArgs, InspectArgs};

use crate::application::config::DataConfig;

#[derive(Parser, Debug)]
#[command(
    name = "mmt-batch",
    version = "0.1.0",
    about = "Load multimodal translation corpora and assemble padded batches."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Inspect(args) => run_inspect(args),
            Commands::Config(args)  => run_config(args),
        }
    }
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    tracing::info!("Inspecting {:?} corpus ({} files)", args.corpus, args.files.len());

    let report = InspectUseCase::new(args.into_request()?).execute()?;
    let s      = &report.summary;

    println!("records:        {}", s.records);
    println!("candidates:     {}", s.candidates);
    println!("visual:         {}", if s.has_visual { "yes" } else { "no" });
    println!("max visual len: {}", s.max_visual_len);
    println!("max source len: {}", s.max_source_len);
    println!("max target len: {}", s.max_target_len);
    if report.held_out_records > 0 {
        println!("split:          {} train / {} held out", report.train_records, report.held_out_records);
    }

    for (i, b) in report.batches.iter().enumerate() {
        match b.visual {
            Some(v) => println!("batch {i}: visual {v:?} source {:?} target {:?}", b.source, b.target),
            None    => println!("batch {i}: source {:?} target {:?}", b.source, b.target),
        }
    }
    Ok(())
}

fn run_config(args: ConfigArgs) -> Result<()> {
    let config = DataConfig::default();
    match args.output {
        Some(path) => config.save(path),
        None => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
