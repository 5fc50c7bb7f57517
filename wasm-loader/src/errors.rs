use crate::types::*;

/// Represents an error when retrieving module bytes by locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The locator is empty or uses a scheme the fetcher cannot resolve.
    InvalidLocator(String),
    /// Nothing exists at the resolved location.
    NotFound(String),
    /// The transport failed while reading.
    IoError { locator: String, reason: String },
}

/// Represents an error when the host runtime compiles a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The bytes failed to decode or validate as a WebAssembly module.
    /// See https://webassembly.github.io/spec/core/valid/index.html
    InvalidModule(String),
}

/// Represents an error when binding a compiled module to its imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstantiationError {
    /// The module declares an import the configuration does not provide.
    MissingImport { module: String, name: String },
    /// The configuration provides the import, but it could not be created in the store
    /// or does not match the declared type.
    IncompatibleImport {
        module: String,
        name: String,
        reason: String,
    },
    /// Linking failed for a reason not tied to a single import.
    LinkError(String),
    /// The module's start function trapped.
    StartFunctionTrapped(String),
    /// The host reported an export which the live instance does not provide.
    ExportUnavailable(String),
}

/// Represents an error when loading a module, by either path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    FetchError(FetchError),
    CompileError(CompileError),
    InstantiationError(InstantiationError),
}

/// Represents an error when invoking a bound export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    SignatureMismatch(String),
    Trap(String),
    MemoryAccessError,
}

impl From<FetchError> for LoadError {
    fn from(error: FetchError) -> Self {
        LoadError::FetchError(error)
    }
}

impl From<CompileError> for LoadError {
    fn from(error: CompileError) -> Self {
        LoadError::CompileError(error)
    }
}

impl From<InstantiationError> for LoadError {
    fn from(error: InstantiationError) -> Self {
        LoadError::InstantiationError(error)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FetchError::InvalidLocator(locator) => write!(f, "invalid locator `{}`", locator),
            FetchError::NotFound(locator) => write!(f, "no module found at `{}`", locator),
            FetchError::IoError { locator, reason } => {
                write!(f, "failed to read `{}`: {}", locator, reason)
            }
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompileError::InvalidModule(reason) => write!(f, "invalid module: {}", reason),
        }
    }
}

impl fmt::Display for InstantiationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InstantiationError::MissingImport { module, name } => {
                write!(f, "missing import `{}::{}`", module, name)
            }
            InstantiationError::IncompatibleImport {
                module,
                name,
                reason,
            } => write!(f, "incompatible import `{}::{}`: {}", module, name, reason),
            InstantiationError::LinkError(reason) => write!(f, "link error: {}", reason),
            InstantiationError::StartFunctionTrapped(reason) => {
                write!(f, "start function trapped: {}", reason)
            }
            InstantiationError::ExportUnavailable(name) => {
                write!(f, "export `{}` is not available on the instance", name)
            }
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::FetchError(e) => write!(f, "fetch error: {}", e),
            LoadError::CompileError(e) => write!(f, "compile error: {}", e),
            LoadError::InstantiationError(e) => write!(f, "instantiation error: {}", e),
        }
    }
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for FetchError {}

impl std::error::Error for CompileError {}

impl std::error::Error for InstantiationError {}

impl std::error::Error for InvokeError {}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::FetchError(e) => Some(e),
            LoadError::CompileError(e) => Some(e),
            LoadError::InstantiationError(e) => Some(e),
        }
    }
}
