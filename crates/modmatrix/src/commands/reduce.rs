use crate::errors::CliError;
use crate::println_pad;
use crate::utils::{open_store, save_store};
use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;
use mmx_combination::{CombinationRepository, EntityKind};
use mmx_reduce::{ReducerManager, ReducerOptions, ReductionStage};

pub struct ReduceCombinationsArgs {
    pub store_path: Utf8PathBuf,
    pub combinations: Vec<String>,
    pub all: bool,
    pub options: ReducerOptions,
}

pub fn reduce_combinations(args: ReduceCombinationsArgs) -> Result<()> {
    let mut store = open_store(&args.store_path)?;

    let names: Vec<String> = if args.all {
        store.combinations.names().map(str::to_string).collect()
    } else {
        args.combinations
    };
    if names.is_empty() {
        return Err(CliError::NothingToReduce.into());
    }
    if let Some(missing) = names
        .iter()
        .find(|name| store.combinations.get(name).is_none())
    {
        return Err(CliError::combination_not_found(missing.clone()).into());
    }

    let reduced = {
        let manager = ReducerManager::new(&store.mods, &store.combinations, &store.raw)
            .with_options(args.options)
            .with_progress(|progress| {
                if progress.stage == ReductionStage::Reducing {
                    tracing::debug!(
                        "[{}/{}] {}",
                        progress.current,
                        progress.total,
                        progress.current_combination.unwrap_or_default()
                    );
                }
            });
        manager
            .reduce_all(&names, &mut store.reduced)
            .map_err(CliError::from)?
    };

    println_pad!(
        "{} {}",
        "🗜️ Reduced:".bright_blue().bold(),
        format!("{} combination(s)", reduced.len()).bright_cyan().bold()
    );
    for combination in &reduced {
        let nearest = combination
            .parent_combinations
            .last()
            .map(String::as_str)
            .unwrap_or("none");
        let counts = EntityKind::ALL
            .iter()
            .map(|kind| {
                let before = store
                    .combinations
                    .get(&combination.name)
                    .map_or(0, |c| c.hashes(*kind).len());
                format!("{kind}s {before}→{}", combination.hashes(*kind).len())
            })
            .collect::<Vec<_>>()
            .join(", ");
        println_pad!(
            "   {} {} {} {}",
            "•".bright_cyan(),
            combination.name.bright_white().bold(),
            format!("(parent: {nearest})").dimmed(),
            counts.dimmed()
        );
    }

    store.record_reduced(reduced);
    save_store(&store)?;
    Ok(())
}
