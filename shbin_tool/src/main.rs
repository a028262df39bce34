use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use shbin_lib::uniform::UniformKind;
use shbin_lib::ShaderBinary;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print debug logs while parsing.
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the uniforms for each shader unit.
    List {
        /// The input .shbin file.
        input: String,
        /// Only print the unit with this index.
        #[arg(long)]
        unit: Option<usize>,
    },
    /// Print the input register table and symbol string locations for each shader unit.
    Symbols {
        /// The input .shbin file.
        input: String,
    },
    /// Export the decoded uniforms to JSON.
    Export {
        /// The input .shbin file.
        input: String,
        /// The output JSON file. Defaults to the input with a .json extension.
        output: Option<String>,
    },
    /// Replace the values of a uniform and save the file.
    /// Float uniforms use decimal values and other uniforms use integers from 0 to 255.
    Set {
        /// The input .shbin file.
        input: String,
        /// The index of the shader unit.
        unit: usize,
        /// The position of the uniform in the unit's constant table.
        position: usize,
        x: String,
        y: String,
        z: String,
        w: String,
        /// The output .shbin file. Defaults to overwriting the input.
        #[arg(long)]
        output: Option<String>,
    },
    /// Check that every .shbin file in a folder parses and writes back unchanged.
    Check {
        /// The folder to search recursively.
        input_folder: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Ignore most logs to avoid flooding the console.
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    simple_logger::SimpleLogger::new().with_level(level).init()?;

    match cli.command {
        Commands::List { input, unit } => list_uniforms(&input, unit),
        Commands::Symbols { input } => print_symbols(&input),
        Commands::Export { input, output } => {
            let output = output
                .map(PathBuf::from)
                .unwrap_or_else(|| Path::new(&input).with_extension("json"));
            export_json(&input, &output)
        }
        Commands::Set {
            input,
            unit,
            position,
            x,
            y,
            z,
            w,
            output,
        } => {
            let output = output.unwrap_or_else(|| input.clone());
            set_value(
                &input,
                &output,
                unit,
                position,
                [x.as_str(), y.as_str(), z.as_str(), w.as_str()],
            )
        }
        Commands::Check { input_folder } => check_folder(&input_folder),
    }
}

fn load(path: &str) -> Result<ShaderBinary> {
    ShaderBinary::from_file(path).with_context(|| format!("failed to read {path:?}"))
}

fn list_uniforms(input: &str, unit_index: Option<usize>) -> Result<()> {
    let binary = load(input)?;

    for unit in binary
        .units()
        .iter()
        .filter(|u| unit_index.map_or(true, |i| i == u.index))
    {
        println!("DVLE {} at {:#x}", unit.index, unit.base_offset);
        for c in &unit.constants {
            println!(
                "  {:>3} {:<24} {:<5} {}",
                c.position,
                c.display_name(),
                kind_label(c.kind),
                c.preview()
            );
        }
    }

    for issue in binary.validate() {
        log::warn!("{issue:?}");
    }

    Ok(())
}

fn kind_label(kind: UniformKind) -> &'static str {
    match kind {
        UniformKind::FloatVec4 => "Float",
        UniformKind::IntVec | UniformKind::Bool => "Int",
    }
}

fn print_symbols(input: &str) -> Result<()> {
    let binary = load(input)?;

    for unit in binary.units() {
        println!(
            "\n--- DVLE {} (Start Offset: {:#x}) ---",
            unit.index, unit.base_offset
        );
        for (i, register) in unit.input_registers.iter().enumerate() {
            println!(
                "  Entry {i}: Reg {:#x} -> Name Offset {:#x} -> File Address {:#x}: '{}'",
                register.register_start, register.name_offset, register.string_offset, register.name
            );
        }
    }

    Ok(())
}

fn export_json(input: &str, output: &Path) -> Result<()> {
    let binary = load(input)?;
    binary
        .snapshot()
        .write_to_file(output)
        .with_context(|| format!("failed to write {output:?}"))?;
    println!("Exported {output:?}");
    Ok(())
}

fn set_value(
    input: &str,
    output: &str,
    unit: usize,
    position: usize,
    text: [&str; 4],
) -> Result<()> {
    let mut binary = load(input)?;
    binary
        .update_value_text(unit, position, text)
        .with_context(|| format!("failed to update unit {unit} position {position}"))?;

    binary
        .write_to_file(output)
        .with_context(|| format!("failed to write {output:?}"))?;

    if let Some(c) = binary.uniforms(unit).and_then(|u| u.get(position)) {
        println!("{} = {:?}", c.display_name(), c.decoded_values());
    }
    Ok(())
}

fn check_folder(input_folder: &str) -> Result<()> {
    let start = std::time::Instant::now();

    globwalk::GlobWalkerBuilder::from_patterns(input_folder, &["*.shbin"])
        .build()?
        .filter_map(|e| e.ok())
        .par_bridge()
        .for_each(|entry| {
            let path = entry.path();
            match std::fs::read(path) {
                Ok(bytes) => check_file(path, bytes),
                Err(e) => println!("Error reading {path:?}: {e}"),
            }
        });

    println!("Finished in {:?}", start.elapsed());
    Ok(())
}

fn check_file(path: &Path, bytes: Vec<u8>) {
    let mut binary = match ShaderBinary::from_bytes(bytes.clone()) {
        Ok(binary) => binary,
        Err(e) => {
            println!("Error reading {path:?}: {e}");
            return;
        }
    };

    if binary.as_bytes() != bytes {
        println!("Read/write not 1:1 for {path:?}");
    }

    // Writing the current values back only clears bits that aren't stored for each type.
    let edits: Vec<_> = binary
        .units()
        .iter()
        .flat_map(|u| u.constants.iter().map(|c| (u.index, c.position, c.raw_values)))
        .collect();
    for (unit, position, values) in &edits {
        if let Err(e) = binary.update_value(*unit, *position, *values) {
            println!("Error updating {path:?} unit {unit} position {position}: {e}");
        }
    }

    match ShaderBinary::from_bytes(binary.to_bytes()) {
        Ok(rewritten) => {
            let changed = rewritten
                .units()
                .iter()
                .flat_map(|u| &u.constants)
                .zip(&edits)
                .any(|(c, (_, _, values))| c.kind.mask(*values) != c.raw_values);
            if changed {
                println!("Rewriting values is not 1:1 for {path:?}");
            } else if binary.as_bytes() != bytes {
                println!("Rewriting values cleared unused payload bits for {path:?}");
            }
        }
        Err(e) => println!("Error reading rewritten {path:?}: {e}"),
    }

    for issue in binary.validate() {
        println!("{path:?}: {issue:?}");
    }
}
