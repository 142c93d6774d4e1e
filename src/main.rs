//! PhyEngine - DC analysis of netlist circuits through a native engine.
//!
//! # Usage
//!
//! ```bash
//! phyengine analyze divider.phy --library ./libphyengine.so
//! phyengine locate
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use phyengine_bridge::{dsl, error::Result, AnalysisSession, LibraryResolver};

/// Circuit analysis through the native PhyEngine library
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse a netlist and print the voltage of every pin
    Analyze {
        /// Path to the netlist file
        #[arg(value_name = "CIRCUIT_FILE")]
        circuit_file: PathBuf,

        /// Analysis kind; overrides the netlist's `.analysis` directive
        #[arg(short, long)]
        analysis: Option<String>,

        /// Path to the engine library
        #[arg(short, long, value_name = "PATH")]
        library: Option<PathBuf>,
    },
    /// Print the library path that would be loaded
    Locate {
        /// Path to the engine library
        #[arg(short, long, value_name = "PATH")]
        library: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let resolver = LibraryResolver::new();

    match args.command {
        Command::Analyze {
            circuit_file,
            analysis,
            library,
        } => {
            let ast = dsl::parse_file(&circuit_file)?;
            let graph = dsl::build_circuit(&ast)?;

            let analysis = analysis.or(ast.analysis).unwrap_or_else(|| "DC".to_string());
            let result = AnalysisSession::new(&resolver).analyze(&graph, &analysis, library.as_deref())?;

            for component in graph.components() {
                let Some(volts) = result.get(component.id()) else {
                    continue;
                };
                let pins: Vec<String> = component
                    .pins()
                    .iter()
                    .zip(volts)
                    .map(|(pin, v)| format!("{}={:.6}", pin, v))
                    .collect();
                println!("{} ({}): {}", component.name(), component.kind(), pins.join(" "));
            }
        }
        Command::Locate { library } => {
            let path = resolver.locate(library.as_deref())?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
