//! Command-line front end for the Tibbar RISC-V instruction-stream
//! generator (spec §6 "CLI").
//!
//! Parses run parameters, loads the memory config (or falls back to the
//! default layout), resolves `--generator` to a main funnel, drives
//! `tibbar_core::Engine::generate`, and writes the assembly text (and,
//! optionally, a debug YAML) to disk. Config, assembly, and engine errors
//! all surface as a one-line diagnostic on stderr and a non-zero exit; no
//! partial output file is written (spec §7 "Propagation policy").

use std::{fs, process};

use clap::Parser;

use tibbar_core::emit::{render_assembly, DebugDump};
use tibbar_core::gen::suite;
use tibbar_core::{Engine, GenError, MemoryConfig};
use tibbar_core::gen::engine::RunParams;

#[derive(Parser, Debug)]
#[command(
    name = "tibbar",
    author,
    version,
    about = "Directed-random RISC-V instruction-stream generator",
    long_about = "Generates a self-contained bare-metal RISC-V assembly test program by \
interleaving a registered generator's sequences through the placement and execution model.\n\n\
Examples:\n  tibbar -g simple\n  tibbar -g ldst -s 7 -o ldst.S\n  tibbar -g hazard --memory-config mem.yaml --debug-yaml run.yaml"
)]
struct Cli {
    /// Name of the registered generator suite to run (required).
    #[arg(short, long)]
    generator: String,

    /// Output assembly file path.
    #[arg(short, long, default_value = "test.S")]
    output: String,

    /// PRNG seed; identical (generator, seed, config) reproduces identical output.
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Verbosity: repeat for more detail (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbosity: u8,

    /// Optional path to write a debug YAML describing the run.
    #[arg(long = "debug-yaml")]
    debug_yaml: Option<String>,

    /// Optional path to a memory config YAML; uses the built-in default layout if omitted.
    #[arg(long = "memory-config")]
    memory_config: Option<String>,

    /// Ceiling on the number of instructions the engine will place before driving to exit.
    #[arg(long = "max-instructions")]
    max_instructions: Option<u64>,

    /// Ceiling on code bytes the engine will place before driving to exit.
    #[arg(long = "max-code-bytes")]
    max_code_bytes: Option<u64>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    if let Err(e) = run(&cli) {
        eprintln!("tibbar: {e}");
        process::exit(1);
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn run(cli: &Cli) -> Result<(), GenError> {
    if !suite::NAMES.contains(&cli.generator.as_str()) {
        return Err(GenError::ConfigError(format!(
            "unknown generator '{}', expected one of: {}",
            cli.generator,
            suite::NAMES.join(", ")
        )));
    }

    let config = match &cli.memory_config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| GenError::Io(format!("reading {path}: {e}")))?;
            MemoryConfig::from_yaml(&text)?
        }
        None => MemoryConfig::default_layout(),
    };

    let mut params = RunParams::new(cli.seed);
    if let Some(max) = cli.max_instructions {
        params = params.with_max_instructions(max);
    }
    if let Some(max) = cli.max_code_bytes {
        params = params.with_max_code_bytes(max);
    }

    let main_funnel = suite::build(&cli.generator, cli.seed)?;
    let store = Engine::generate(&config, &params, main_funnel)?;

    let assembly = render_assembly(&store);
    fs::write(&cli.output, assembly).map_err(|e| GenError::Io(format!("writing {}: {e}", cli.output)))?;
    log::info!("tibbar: wrote {}", cli.output);

    if let Some(debug_path) = &cli.debug_yaml {
        let info = DebugDump::new(&cli.generator, &params, &store);
        let yaml = info.to_yaml()?;
        fs::write(debug_path, yaml).map_err(|e| GenError::Io(format!("writing {debug_path}: {e}")))?;
        log::info!("tibbar: wrote {debug_path}");
    }

    Ok(())
}
