use crate::errors::CliError;
use crate::println_pad;
use crate::utils::{open_store, save_store};
use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;
use mmx_combination::{CombinationCreator, CreatorOptions};
use mmx_mod::ModRepository;

pub struct CreateCombinationsArgs {
    pub store_path: Utf8PathBuf,
    pub mod_name: String,
    pub options: CreatorOptions,
}

pub fn create_combinations(args: CreateCombinationsArgs) -> Result<()> {
    let mut store = open_store(&args.store_path)?;
    let Some(main_mod) = store.mods.get(&args.mod_name).cloned() else {
        return Err(CliError::mod_not_found(args.mod_name).into());
    };

    let combinations = CombinationCreator::new(&store.mods, &store.combinations)
        .with_options(args.options)
        .create_combinations(&main_mod);

    println_pad!(
        "{} {} {}",
        "🧮 Combinations of".bright_blue().bold(),
        main_mod.name.bright_cyan().bold(),
        format!("({})", combinations.len()).dimmed()
    );
    for combination in &combinations {
        let parents = if combination.parent_combinations.is_empty() {
            "no parents".to_string()
        } else {
            format!("parents: {}", combination.parent_combinations.join(", "))
        };
        println_pad!(
            "   {} {} {}",
            "•".bright_cyan(),
            combination.name.bright_white().bold(),
            parents.dimmed()
        );
    }

    store.register_combinations(combinations);
    save_store(&store)?;
    Ok(())
}
