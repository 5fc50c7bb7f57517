pub use crate::errors::*;
pub use crate::export::*;
pub use indexmap::IndexMap;
pub use std::fmt;
pub use std::fmt::Debug;
pub use std::future::Future;
pub use std::path::{Path, PathBuf};
pub use std::string::String;
pub use std::string::ToString;
pub use std::sync::{Arc, Mutex};
pub use std::vec::Vec;
