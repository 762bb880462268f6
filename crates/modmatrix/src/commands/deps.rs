use crate::errors::CliError;
use crate::println_pad;
use crate::utils::open_store;
use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;
use mmx_mod::{DependencyResolver, ModRepository};

pub struct ShowDependenciesArgs {
    pub store_path: Utf8PathBuf,
    pub mod_name: String,
}

pub fn show_dependencies(args: ShowDependenciesArgs) -> Result<()> {
    let store = open_store(&args.store_path)?;
    if store.mods.get(&args.mod_name).is_none() {
        return Err(CliError::mod_not_found(args.mod_name).into());
    }

    let resolver = DependencyResolver::new(&store.mods);
    let mandatory = resolver.resolve_mandatory_dependencies([args.mod_name.as_str()]);
    let mut optional: Vec<String> = resolver
        .resolve_optional_mods(&mandatory)
        .into_iter()
        .collect();
    optional.sort_by_key(|name| store.mods.order_of(name).unwrap_or(u32::MAX));

    println_pad!(
        "{} {}",
        "🧩 Mod:".bright_blue().bold(),
        args.mod_name.bright_cyan().bold()
    );

    println_pad!(
        "\n{} {}",
        "🔒 Mandatory:".bright_magenta().bold(),
        format!("({})", mandatory.len()).dimmed()
    );
    for name in &mandatory {
        println_pad!("   {} {}", "•".bright_cyan(), name.bright_white());
    }

    println_pad!(
        "\n{} {}",
        "🔓 Optional:".bright_magenta().bold(),
        format!("({})", optional.len()).dimmed()
    );
    if optional.is_empty() {
        println_pad!("   {}", "none".dimmed());
    }
    for name in &optional {
        let order = store
            .mods
            .order_of(name)
            .map(|o| format!("(order: {o})"))
            .unwrap_or_default();
        println_pad!(
            "   {} {} {}",
            "•".bright_cyan(),
            name.bright_white(),
            order.dimmed()
        );
    }

    Ok(())
}
