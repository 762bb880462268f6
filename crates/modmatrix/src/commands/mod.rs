mod combinations;
mod deps;
mod import;
mod parents;
mod reduce;

pub use combinations::*;
pub use deps::*;
pub use import::*;
pub use parents::*;
pub use reduce::*;
