use clap::{Parser, Subcommand};
use plugin_pack::{config, output, package};
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "plugin-pack")]
#[command(about = "Stage a plugin folder and package it into a versioned zip")]
#[command(long_about = "\
Stage a plugin folder and package it into a versioned zip

Run from the release folder, next to the plugin sources:

  ../source/                      # Plugin sources (copied recursively)
  │   └── 31EDO_Tuner.qml         # Holds the `version: \"1.2.3\";` line
  ../LICENSE                      # Copied into the staging root
  ../thumbnails/*.png             # Copied into 31edo_tuner/thumbnails/
  ./                              # Working directory (--dir)
  ├── 31edo_tuner/                # Staging folder, merged on every run
  └── 31edo_tuner_1.2.3.zip       # Versioned archive

The version comes from the first `version: \"<value>\";` line in a source file
whose name contains the plugin name (underscores and case ignored).

A successful run prints nothing unless --verbose is given. On failure the
error is printed and the tool waits for Enter before exiting, unless
--no-pause is given.

Run 'plugin-pack gen-config' to generate a documented pack.toml.")]
#[command(version)]
struct Cli {
    /// Working directory; relative paths resolve against it and the archive is written there
    #[arg(long, default_value = ".", global = true)]
    dir: PathBuf,

    /// Config file (defaults to <dir>/pack.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Exit immediately on failure instead of waiting for Enter
    #[arg(long, global = true)]
    no_pause: bool,

    /// Print each packaging step as it completes
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Stage and archive the plugin (the default)
    Pack,
    /// Print the detected version and the file it was found in
    Version {
        /// Print the version marker as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock pack.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{e}");
            if !cli.no_pause {
                wait_for_enter();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        None | Some(Command::Pack) => {
            let config = config::load_config(&cli.dir, cli.config.as_deref())?;
            let report = package::package(&config, &cli.dir, |event| {
                if cli.verbose {
                    output::print_package_event(event, &cli.dir)
                }
            })?;
            if cli.verbose {
                println!("==> Package complete: {}", report.archive.path.display());
            }
        }
        Some(Command::Version { json }) => {
            let config = config::load_config(&cli.dir, cli.config.as_deref())?;
            let marker = package::detect_version(&config, &cli.dir)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&marker)?);
            } else {
                output::print_version(&marker, &cli.dir);
            }
        }
        Some(Command::GenConfig) => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Block until the user presses Enter, so a double-clicked run keeps its
/// window open long enough to read the error.
fn wait_for_enter() {
    std::io::stdin().lock().read_line(&mut String::new()).ok();
}
