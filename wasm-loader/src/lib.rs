#[macro_use]
mod macros;

/// Loader errors.
pub mod errors;
/// Export descriptors reported by a compiled module.
pub mod export;
/// Module fetching by locator.
pub mod fetch;
/// The loaded module handle.
pub mod handle;
/// Module loader, the entry point of this crate.
pub mod loader;
/// Host runtime capabilities the loader is built on.
pub mod traits;
/// Commonly used types.
pub mod types;
/// Wasmi-backed compiler and instantiator.
pub mod wasm;

pub use errors::*;
pub use export::*;
pub use fetch::*;
pub use handle::*;
pub use loader::*;
pub use traits::*;
