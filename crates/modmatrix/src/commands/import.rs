use crate::errors::CliError;
use crate::println_pad;
use crate::utils::{open_store, save_store};
use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;
use mmx_mod::ModRepository;

pub struct ImportModsArgs {
    pub store_path: Utf8PathBuf,
    pub mods_dir: Utf8PathBuf,
}

pub fn import_mods(args: ImportModsArgs) -> Result<()> {
    if !args.mods_dir.as_std_path().is_dir() {
        return Err(CliError::DirectoryNotFound {
            path: args.mods_dir,
        }
        .into());
    }

    let mut store = open_store(&args.store_path)?;
    let imported = store
        .import_mod_infos(&args.mods_dir)
        .map_err(CliError::from)?;
    save_store(&store)?;

    println_pad!(
        "{} {}",
        "📦 Imported:".bright_blue().bold(),
        format!("{} mod(s)", imported.len()).bright_cyan().bold()
    );
    println_pad!("\n{}", "🔢 Load order:".bright_magenta().bold());
    for m in store.mods.all() {
        println_pad!(
            "   {} {} {} {}",
            format!("{:>4}", m.order).dimmed(),
            m.name.bright_cyan().bold(),
            m.version.bright_white(),
            format!("({} dependencies)", m.dependencies.len()).dimmed()
        );
    }

    Ok(())
}
