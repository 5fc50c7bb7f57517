use crate::types::*;

/// Compiles module bytes and reports the compiled module's exports.
pub trait ModuleCompiler {
    type Module;

    /// Decodes, validates and compiles a module.
    fn compile(&self, code: &[u8]) -> Result<Self::Module, CompileError>;

    /// Lists the exports of a compiled module, in declaration order.
    fn exports(&self, module: &Self::Module) -> Vec<ExportDescriptor>;
}

/// Binds a compiled module to an import configuration, producing a live instance.
///
/// Every call must produce an instance which shares no mutable state with any
/// instance produced earlier.
pub trait ModuleInstantiator: ModuleCompiler {
    type Imports;
    type Instance: ModuleInstance;

    fn instantiate(
        &self,
        module: &Self::Module,
        imports: Self::Imports,
    ) -> Result<Self::Instance, InstantiationError>;
}

/// Represents an instantiated module, whose exports can be bound by name.
pub trait ModuleInstance {
    type Function: Clone;
    type Memory: Clone;

    /// Binds the exported function `name`, if there is one.
    fn function(&self, name: &str) -> Option<Self::Function>;

    /// Binds the exported memory `name`, if there is one.
    fn memory(&self, name: &str) -> Option<Self::Memory>;
}

/// Retrieves module bytes by locator.
pub trait ModuleFetcher {
    fn fetch(&self, locator: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>>;
}
