use camino::Utf8PathBuf;
use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{
    create_combinations, import_mods, reduce_combinations, show_dependencies, show_parents,
    CreateCombinationsArgs, ImportModsArgs, ReduceCombinationsArgs, ShowDependenciesArgs,
    ShowParentsArgs,
};
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod errors;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (defaults to modmatrix.toml next to the executable)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Store directory, overrides `store_path` from the configuration
    #[arg(long, global = true)]
    store: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import mods from a directory of unpacked mods with info.json files
    Import {
        /// The directory containing one sub-directory per mod
        mods_dir: String,
    },
    /// Show the mandatory and optional dependencies of a mod
    Deps {
        /// The name of the mod
        mod_name: String,
    },
    /// Create and register the combinations of a mod
    Combinations {
        /// The name of the main mod
        mod_name: String,

        /// Maximum number of optional mods per combination
        #[arg(long)]
        max_optional: Option<usize>,
    },
    /// Show the ranked parents of a combination
    Parents {
        /// The name of the combination
        combination: String,
    },
    /// Reduce combinations against their parents
    Reduce {
        /// The combinations to reduce
        combinations: Vec<String>,

        /// Reduce every known combination
        #[arg(long, conflicts_with = "combinations")]
        all: bool,

        /// Layer all ranked parents instead of only the nearest one
        #[arg(long)]
        merge_parents: bool,
    },
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "modmatrix=info,mmx_reduce=info,mmx_store=info".into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let args = parse_args();
    let config_path = args.config.map(Utf8PathBuf::from);
    let config = utils::config::load_config(config_path.as_deref())?;
    let store_path = args
        .store
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|| config.store_path.clone());

    match args.command {
        Commands::Import { mods_dir } => import_mods(ImportModsArgs {
            store_path,
            mods_dir: Utf8PathBuf::from(mods_dir),
        }),
        Commands::Deps { mod_name } => show_dependencies(ShowDependenciesArgs {
            store_path,
            mod_name,
        }),
        Commands::Combinations {
            mod_name,
            max_optional,
        } => {
            let mut options = config.creator_options();
            if max_optional.is_some() {
                options.max_optional_mods = max_optional;
            }
            create_combinations(CreateCombinationsArgs {
                store_path,
                mod_name,
                options,
            })
        }
        Commands::Parents { combination } => show_parents(ShowParentsArgs {
            store_path,
            combination,
        }),
        Commands::Reduce {
            combinations,
            all,
            merge_parents,
        } => {
            let mut options = config.reducer_options();
            options.merge_parents |= merge_parents;
            reduce_combinations(ReduceCombinationsArgs {
                store_path,
                combinations,
                all,
                options,
            })
        }
    }
}
