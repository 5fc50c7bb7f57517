use crate::traits::*;
use crate::types::*;

/// A loaded module: its compiled form, its live instance, and the instance's functions
/// and memories indexed by export name.
///
/// Built once by the loader and never mutated afterwards. Dropping the handle releases
/// the instance and its store.
pub struct LoadedModule<M, I: ModuleInstance> {
    name: String,
    module: M,
    instance: I,
    exports: Vec<ExportDescriptor>,
    functions: IndexMap<String, I::Function>,
    memory: IndexMap<String, I::Memory>,
}

impl<M, I: ModuleInstance> LoadedModule<M, I> {
    pub(crate) fn new(
        name: String,
        module: M,
        instance: I,
        exports: Vec<ExportDescriptor>,
        functions: IndexMap<String, I::Function>,
        memory: IndexMap<String, I::Memory>,
    ) -> Self {
        Self {
            name,
            module,
            instance,
            exports,
            functions,
            memory,
        }
    }

    /// The name the module was loaded under: the caller-supplied name, or the locator.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All export descriptors, including those of kinds which are not indexed.
    pub fn exports(&self) -> &[ExportDescriptor] {
        &self.exports
    }

    pub fn functions(&self) -> &IndexMap<String, I::Function> {
        &self.functions
    }

    pub fn memory(&self) -> &IndexMap<String, I::Memory> {
        &self.memory
    }

    /// Returns the exported function `name`, or `None` if the module exports no such
    /// function. Absence is not an error, so callers may look up optional exports.
    pub fn get_function(&self, name: &str) -> Option<&I::Function> {
        self.functions.get(name)
    }

    pub fn get_memory(&self, name: &str) -> Option<&I::Memory> {
        self.memory.get(name)
    }

    pub fn module(&self) -> &M {
        &self.module
    }

    pub fn instance(&self) -> &I {
        &self.instance
    }
}

impl<M, I: ModuleInstance> fmt::Debug for LoadedModule<M, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModule")
            .field("name", &self.name)
            .field("exports", &self.exports)
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("memory", &self.memory.keys().collect::<Vec<_>>())
            .finish()
    }
}
