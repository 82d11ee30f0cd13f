use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use uvm_asm::bytecode::{try_decode_word, words_from_bytes, EncodedWord};
use uvm_asm::{sample, trace, Assembler, AssemblerConfig};

/// Assembler for the UVM instruction set
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Translate a program into a binary of little-endian 32 bit words
  Assemble {
    /// Program text, one `MNEMONIC[,operand]` record per line
    input: PathBuf,
    /// Binary output
    output: PathBuf,
    /// Print `A=`/`HEX:` lines instead of the detailed table
    #[arg(long)]
    test: bool,
    /// Skip malformed lines instead of stopping at the first one
    #[arg(long)]
    lenient: bool,
    /// Reject LOAD_CONST operands outside [0, 2^26) instead of packing them as given
    #[arg(long)]
    strict_constants: bool,
    /// Accept decimal opcodes in place of mnemonics
    #[arg(long)]
    numeric_opcodes: bool,
    /// Also write the intermediate representation as JSON
    #[arg(long, value_name = "PATH")]
    intermediate: Option<PathBuf>,
  },
  /// Decode a binary back into instructions
  Disassemble {
    input: PathBuf,
  },
  /// Write a sample program
  Sample {
    #[arg(default_value = "sample_program.csv")]
    path: PathBuf,
  },
}

fn init_logging() {
  use tracing_subscriber::EnvFilter;

  tracing_subscriber::fmt()
    // `RUST_LOG` overrides the default of warnings only.
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .with_level(true)
    .with_target(false)
    .without_time()
    .init();
}

fn assemble(
  input: PathBuf,
  output: PathBuf,
  test: bool,
  config: AssemblerConfig,
  intermediate: Option<PathBuf>
) -> Result<()> {
  let text = fs::read_to_string(&input)
    .with_context(|| format!("could not read program from {}", input.display()))?;

  let translation = Assembler::new(config).translate(&text)?;

  let mut file = fs::File::create(&output)
    .with_context(|| format!("could not create {}", output.display()))?;
  translation
    .write_to(&mut file)
    .with_context(|| format!("could not write {}", output.display()))?;
  info!(bytes = translation.words.len() * 4, "wrote {}", output.display());

  if test {
    print!("{}", trace::render_translation(&translation));
  } else {
    print!("{}", trace::detailed_table(&translation));
  }
  if translation.is_empty() {
    println!("\nNo commands loaded from {}", input.display());
  } else {
    println!("\nProcessed {} commands", translation.len());
  }
  if !translation.errors.is_empty() {
    println!("Skipped {} malformed lines", translation.errors.len());
  }

  if let Some(path) = intermediate {
    let json = trace::intermediate_json(&translation)?;
    fs::write(&path, json).with_context(|| format!("could not write {}", path.display()))?;
    println!("Intermediate representation saved to {}", path.display());
  }
  Ok(())
}

fn disassemble(input: PathBuf) -> Result<()> {
  let bytes = fs::read(&input).with_context(|| format!("could not read {}", input.display()))?;
  let words = words_from_bytes(&bytes)?;
  let mut instructions = Vec::with_capacity(words.len());
  for (i, value) in words.iter().enumerate() {
    let instruction = try_decode_word(*value)
      .with_context(|| format!("word {} ({:#010X})", i, value))?;
    instructions.push((instruction, EncodedWord { value: *value }));
  }
  print!("{}", trace::render_test_format(instructions.iter().map(|(i, w)| (i, w))));
  println!("\nDecoded {} words", instructions.len());
  Ok(())
}

fn main() -> Result<()> {
  init_logging();
  let args = Args::parse();

  match args.command {
    Command::Assemble {
      input, output, test, lenient, strict_constants, numeric_opcodes, intermediate
    } => {
      let mut config = AssemblerConfig::new();
      if lenient {
        config = config.lenient();
      }
      if strict_constants {
        config = config.reject_wide_constants();
      }
      if numeric_opcodes {
        config = config.numeric_opcodes();
      }
      assemble(input, output, test, config, intermediate)
    }
    Command::Disassemble { input } => disassemble(input),
    Command::Sample { path } => {
      sample::write_sample(&path).with_context(|| format!("could not write {}", path.display()))?;
      println!("Wrote sample program to {}", path.display());
      Ok(())
    }
  }
}
