use crate::errors::CliError;
use crate::println_pad;
use crate::utils::open_store;
use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;
use mmx_combination::{CombinationRepository, ParentCombinationFinder};

pub struct ShowParentsArgs {
    pub store_path: Utf8PathBuf,
    pub combination: String,
}

pub fn show_parents(args: ShowParentsArgs) -> Result<()> {
    let store = open_store(&args.store_path)?;
    let Some(combination) = store.combinations.get(&args.combination) else {
        return Err(CliError::combination_not_found(args.combination).into());
    };

    let finder = ParentCombinationFinder::new(&store.mods, &store.combinations);
    let parents = finder.find_parents_of_persisted(combination);

    println_pad!(
        "{} {}",
        "🧬 Combination:".bright_blue().bold(),
        combination.name.bright_cyan().bold()
    );
    println_pad!(
        "{} {}",
        "📚 Loaded mods:".bright_green(),
        combination
            .loaded_mod_names
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
            .bright_white()
    );

    println_pad!(
        "\n{} {}",
        "🔗 Parents:".bright_magenta().bold(),
        "(most general first)".dimmed()
    );
    if parents.is_empty() {
        println_pad!("   {}", "none".dimmed());
    }
    let nearest = parents.len().saturating_sub(1);
    for (idx, parent) in parents.iter().enumerate() {
        let marker = if idx == nearest {
            "nearest".bright_green()
        } else {
            "".normal()
        };
        println_pad!(
            "   {} {} {} {}",
            format!("{:>3}.", idx + 1).dimmed(),
            parent.name.bright_white().bold(),
            format!("({} mods)", parent.loaded_mod_names.len()).dimmed(),
            marker
        );
    }

    Ok(())
}
