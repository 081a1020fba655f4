//! gentypesc - header generation, typedef checking and Gecko code passes
//!
//! Usage: gentypesc [OPTIONS] <COMMAND>

use std::io;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use gentypes_tool::driver;
use gentypes_tool::gecko::parse_address;
use gentypes_tool::header::DEFAULT_GUARD;
use gentypes_tool::{
    CheckConfig, DataModel, DiagnosticReporter, GeckoConfig, HeaderConfig, InjectConfig,
};
use log::debug;

/// Target data model
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Default)]
enum Model {
    /// 32-bit int, long and pointers; unsigned plain char
    #[default]
    Ilp32,
    /// 64-bit long and pointers; signed plain char
    Lp64,
}

impl From<Model> for DataModel {
    fn from(model: Model) -> Self {
        match model {
            Model::Ilp32 => DataModel::Ilp32,
            Model::Lp64 => DataModel::Lp64,
        }
    }
}

#[derive(ClapParser, Debug)]
#[command(name = "gentypesc")]
#[command(version)]
#[command(about = "Header generation, typedef checking and Gecko code passes for the gentypes aliases", long_about = None)]
struct Args {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the C alias header
    Header {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Omit the include guard
        #[arg(long)]
        no_guard: bool,

        /// Include guard macro
        #[arg(long, default_value = DEFAULT_GUARD, conflicts_with = "no_guard")]
        guard: String,

        /// Omit the _Static_assert width checks
        #[arg(long)]
        no_asserts: bool,

        /// Target data model
        #[arg(short = 'm', long, value_enum, default_value = "ilp32")]
        data_model: Model,
    },

    /// Rewrite the include prelude of a C source in place
    Inject {
        /// C source file
        input: PathBuf,

        /// Game identifier selecting include/<ID>.h
        #[arg(short, long)]
        game_id: Option<String>,

        /// Directory searched for include/gc and the game header (repeatable)
        #[arg(short, long = "base", default_value = ".")]
        base: Vec<PathBuf>,
    },

    /// Report typedefs that redefine an alias
    Check {
        /// C source file
        input: PathBuf,

        /// Target data model
        #[arg(short = 'm', long, value_enum, default_value = "ilp32")]
        data_model: Model,
    },

    /// Print the alias table
    Table,

    /// Convert a decomp-toolkit symbols.txt into an address:label map
    Symbols {
        /// symbols.txt file
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert an address:label map into .set directives
    Codewrite {
        /// .lst file
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Prepare compiler assembly for the Gekko assembler, in place
    Asm {
        /// Assembly (.s) file
        input: PathBuf,

        /// symbols.txt whose symbols are prepended as .set directives
        #[arg(short, long)]
        symbols: Option<PathBuf>,
    },

    /// Convert an assembled object into a Gecko code
    Gecko {
        /// Object file produced by the assembler
        #[arg(default_value = "a.out")]
        input: PathBuf,

        /// Insertion address in hex (0x80000000 if omitted)
        #[arg(short, long)]
        address: Option<String>,

        /// Overwrite the bytes at the address instead of inserting a branch
        #[arg(long)]
        overwrite: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    gentypes_tool::logger::init(args.verbose).context("cannot install logger")?;
    debug!("{:?}", args.command);

    match args.command {
        Command::Header { output, no_guard, guard, no_asserts, data_model } => {
            let config = HeaderConfig {
                guard: (!no_guard).then_some(guard),
                static_asserts: !no_asserts,
                data_model: data_model.into(),
            };
            driver::emit_header(&config, output.as_deref(), &mut io::stdout().lock())?;
        }

        Command::Inject { input, game_id, base } => {
            let config = InjectConfig { game_id, base_paths: base };
            let prepared = driver::inject(&input, &config)
                .with_context(|| format!("cannot prepare {}", input.display()))?;
            if args.verbose {
                eprintln!(
                    "Updated {}: {} includes added, {} removed",
                    input.display(),
                    prepared.includes.len(),
                    prepared.removed
                );
            }
        }

        Command::Check { input, data_model } => {
            let config = CheckConfig { data_model: data_model.into() };
            let mut reporter = DiagnosticReporter::new();
            let summary = driver::check_file(&input, &config, &mut reporter)
                .with_context(|| format!("cannot check {}", input.display()))?;
            if summary.errors > 0 {
                bail!(
                    "{}: {} conflicting alias definition(s)",
                    input.display(),
                    summary.errors
                );
            }
            if args.verbose {
                eprintln!("{}: ok ({} warning(s))", input.display(), summary.warnings);
            }
        }

        Command::Table => print!("{}", driver::render_table()),

        Command::Symbols { input, output } => {
            let count = driver::convert_symbols(&input, output.as_deref(), &mut io::stdout().lock())
                .with_context(|| format!("cannot convert {}", input.display()))?;
            debug!("{} symbols", count);
        }

        Command::Codewrite { input, output } => {
            let mut reporter = DiagnosticReporter::new();
            let count = driver::convert_lst(
                &input,
                output.as_deref(),
                &mut io::stdout().lock(),
                &mut reporter,
            )
            .with_context(|| format!("cannot convert {}", input.display()))?;
            debug!("{} symbols", count);
        }

        Command::Asm { input, symbols } => {
            let processed = driver::postprocess_asm(&input, symbols.as_deref())
                .with_context(|| format!("cannot process {}", input.display()))?;
            if args.verbose {
                eprintln!(
                    "Updated {}: {} attribute line(s) removed, {} call(s) rewritten",
                    input.display(),
                    processed.attributes_removed,
                    processed.calls_rewritten
                );
            }
        }

        Command::Gecko { input, address, overwrite, output } => {
            let config = GeckoConfig {
                address: parse_address(address.as_deref().unwrap_or_default())?,
                overwrite,
            };
            driver::gecko(&input, &config, output.as_deref(), &mut io::stdout().lock())
                .with_context(|| format!("cannot convert {}", input.display()))?;
        }
    }

    Ok(())
}
