mod config;
mod imports;
mod wasmi;

pub use self::wasmi::*;
pub use config::*;
pub use imports::*;
pub use ::wasmi::core::ValType;
pub use ::wasmi::{FuncType, Val};

use crate::handle::LoadedModule;

pub type WasmiLoadedModule = LoadedModule<WasmiModule, WasmiInstance>;
