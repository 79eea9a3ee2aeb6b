use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, ensure};
use clap::{ArgGroup, Parser, Subcommand};
use glob::Pattern;
use infinity_data_tools::{
    commands::{
        cat::cat_resource,
        dump::dump_resources,
        extract::extract_resources,
        list::{list_bundles, list_resources},
        load_archive,
        strings::{find_string_table, print_strings},
    },
    game_folder::{find_master_index, game_folder_search},
    path::game_root,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Subcommand)]
enum Command {
    /// List resources
    List {
        /// Glob patterns to filter the list of resources
        #[clap(default_value = "*")]
        #[arg(num_args = 1..)]
        globs: Vec<Pattern>,
    },
    /// List the bundles named by the master index
    Bundles,
    /// Extract matched resources to a folder
    Extract {
        /// Path to the folder to output the extracted resources
        output_folder: PathBuf,
        /// Glob patterns to filter the list of resources
        #[clap(default_value = "*")]
        #[arg(num_args = 1..)]
        globs: Vec<Pattern>,
    },
    /// Extract a single resource to stdout, override folder first
    Cat {
        /// Resource to extract, e.g. SW1H01.itm
        filename: String,
    },
    /// Parses items and 2DA tables into JSON files
    Dump {
        /// Path to write out the parsed resources to
        output_folder: PathBuf,
        /// Glob patterns to filter the list of resources
        #[arg(num_args = 1.., default_values = ["*.itm", "*.2da"])]
        globs: Vec<Pattern>,
    },
    /// Look up strings in the game's string table
    String {
        /// String ids to print
        #[arg(num_args = 1..)]
        ids: Vec<u32>,
        /// String table to read instead of the game's own
        #[arg(long)]
        tlk: Option<PathBuf>,
        /// Locale folder to look in for enhanced editions
        #[arg(long, default_value = "en_US")]
        locale: String,
    },
}

/// A CLI tool for reading resources out of Infinity Engine game folders.
/// Data is written to stdout, logs to stderr.
#[derive(Parser, Debug)]
#[command(
    name = "ie_files",
    group(
        ArgGroup::new("source")
        .args(&["game", "key"])
        .required(false) // Falls back to searching the usual install folders
        .multiple(false)
    )
)]
#[clap(version)]
struct Cli {
    /// Game folder containing chitin.key
    #[arg(long, env = "IE_GAME_DIR")]
    game: Option<PathBuf>,

    /// Path to a master index file
    #[arg(long)]
    key: Option<PathBuf>,

    /// Log debug output. RUST_LOG takes precedence.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug)]
struct Args {
    key_path: PathBuf,
    command: Command,
    verbose: bool,
}

/// Validates user input and constructs a valid input state
fn parse_args() -> Result<Args> {
    let cli = Cli::parse();

    let key_path = match (cli.key, cli.game) {
        (Some(key_path), _) => {
            ensure!(key_path.is_file(), "Master index {key_path:?} doesn't exist");
            key_path
        }
        (None, Some(game)) => {
            ensure!(game.is_dir(), "Game folder {game:?} doesn't exist");
            find_master_index(&game)
                .ok_or_else(|| anyhow!("No chitin.key found in {game:?}"))?
        }
        (None, None) => game_folder_search()
            .and_then(|game| find_master_index(&game))
            .context("No game folder found, pass --game or --key")?,
    };

    Ok(Args {
        key_path,
        command: cli.command,
        verbose: cli.verbose,
    })
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = parse_args()?;
    init_logging(args.verbose);

    match args.command {
        Command::List { globs } => {
            let archive = load_archive(&args.key_path)?;
            list_resources(&archive, &globs).context("List command failed")?
        }
        Command::Bundles => {
            let archive = load_archive(&args.key_path)?;
            list_bundles(&archive).context("Bundles command failed")?
        }
        Command::Cat { filename } => {
            let archive = load_archive(&args.key_path)?;
            cat_resource(&archive, &filename).context("Cat command failed")?
        }
        Command::Extract {
            output_folder,
            globs,
        } => {
            let archive = load_archive(&args.key_path)?;
            let count = extract_resources(&archive, &globs, &output_folder)
                .context("Extract command failed")?;
            info!("Extracted {count} resources to {output_folder:?}");
        }
        Command::Dump {
            output_folder,
            globs,
        } => {
            let archive = load_archive(&args.key_path)?;
            let count = dump_resources(&archive, &globs, &output_folder)
                .context("Dump command failed")?;
            info!("Dumped {count} resources to {output_folder:?}");
        }
        // String tables live beside the master index rather than in it
        Command::String { ids, tlk, locale } => {
            let root = game_root(&args.key_path);
            let table_path = match tlk {
                Some(path) => path,
                None => find_string_table(root, &locale)
                    .with_context(|| format!("No string table found in {root:?}"))?,
            };
            print_strings(&table_path, &ids).context("String command failed")?
        }
    }

    Ok(())
}
