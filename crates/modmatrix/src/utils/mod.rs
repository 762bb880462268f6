use crate::errors::CliError;
use camino::Utf8Path;
use miette::Result;
use mmx_store::Store;

pub mod config;

#[macro_export]
macro_rules! println_pad {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        for __line in __s.lines() {
            println!("    {}", __line);
        }
    }};
}

/// Open the store, turning failures into a diagnostic.
pub fn open_store(path: &Utf8Path) -> Result<Store> {
    Ok(Store::open(path).map_err(CliError::from)?)
}

/// Save the store, turning failures into a diagnostic.
pub fn save_store(store: &Store) -> Result<()> {
    Ok(store.save().map_err(CliError::from)?)
}
