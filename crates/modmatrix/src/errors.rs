use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(config::not_found),
        help("Pass an existing file to --config, or omit it to use modmatrix.toml next to the executable")
    )]
    ConfigNotFound { path: Utf8PathBuf },

    #[error("Configuration file error: {path}")]
    #[diagnostic(
        code(config::parse_error),
        help("Check modmatrix.toml for syntax errors and unknown keys")
    )]
    ConfigParseError {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Directory not found: {path}")]
    #[diagnostic(
        code(fs::directory_missing),
        help("Point the command at the directory holding one sub-directory per mod with an info.json")
    )]
    DirectoryNotFound { path: Utf8PathBuf },

    #[error("Mod not found: {name}")]
    #[diagnostic(
        code(mods::not_found),
        help("Import the mod first with `modmatrix import <mods-dir>`")
    )]
    ModNotFound { name: String },

    #[error("Combination not found: {name}")]
    #[diagnostic(
        code(combination::not_found),
        help("Create the combinations of its main mod with `modmatrix combinations <mod>`")
    )]
    CombinationNotFound { name: String },

    #[error("No combinations to reduce")]
    #[diagnostic(
        code(reduce::nothing_selected),
        help("Pass one or more combination names, or --all")
    )]
    NothingToReduce,

    #[error("Store operation failed")]
    #[diagnostic(code(store::operation_failed))]
    Store {
        #[from]
        source: mmx_store::Error,
    },

    #[error("Reduction failed")]
    #[diagnostic(
        code(reduce::failed),
        help("The exported data does not match the parent combinations; re-export the combination and its parents")
    )]
    Reduce {
        #[from]
        source: mmx_reduce::Error,
    },
}

impl CliError {
    pub fn mod_not_found(name: impl Into<String>) -> Self {
        Self::ModNotFound { name: name.into() }
    }

    pub fn combination_not_found(name: impl Into<String>) -> Self {
        Self::CombinationNotFound { name: name.into() }
    }
}
