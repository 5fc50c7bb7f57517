use crate::fetch::FileFetcher;
use crate::handle::LoadedModule;
use crate::traits::*;
use crate::types::*;
use crate::wasm::{WasmiEngine, WasmiImports, WasmiLoadedModule};

/// The handle type produced by a loader over engine `E`.
pub type LoadedModuleOf<E> =
    LoadedModule<<E as ModuleCompiler>::Module, <E as ModuleInstantiator>::Instance>;

pub type DefaultModuleLoader = ModuleLoader<WasmiEngine, FileFetcher>;

/// Loads modules from bytes or from a locator, and indexes their exports.
///
/// The loader holds no state between loads: every load compiles and instantiates from
/// scratch, and the returned handles are independent of each other.
pub struct ModuleLoader<E, F> {
    engine: E,
    fetcher: F,
}

impl<E, F> ModuleLoader<E, F> {
    pub fn new(engine: E, fetcher: F) -> Self {
        Self { engine, fetcher }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

impl Default for DefaultModuleLoader {
    fn default() -> Self {
        Self::new(WasmiEngine::default(), FileFetcher::default())
    }
}

impl<E: ModuleInstantiator, F> ModuleLoader<E, F> {
    /// Compiles and instantiates `code`, naming the module `name`.
    ///
    /// The name is kept verbatim and is not required to be unique.
    pub fn load_from_bytes<S: Into<String>>(
        &self,
        name: S,
        code: &[u8],
        imports: E::Imports,
    ) -> Result<LoadedModuleOf<E>, LoadError> {
        let name = name.into();
        trace!("load_from_bytes({}) starts, {} bytes", name, code.len());

        let module = self.engine.compile(code)?;
        let exports = self.engine.exports(&module);
        let instance = self.engine.instantiate(&module, imports)?;
        let (functions, memory) = index_exports(&exports, &instance)?;

        trace!(
            "load_from_bytes({}) ends, {} exports, {} functions, {} memories",
            name,
            exports.len(),
            functions.len(),
            memory.len()
        );

        Ok(LoadedModule::new(
            name, module, instance, exports, functions, memory,
        ))
    }
}

impl<E: ModuleInstantiator, F: ModuleFetcher> ModuleLoader<E, F> {
    /// Fetches the module at `locator`, then loads it as [`ModuleLoader::load_from_bytes`]
    /// does, naming it after the locator.
    pub async fn load_from_source(
        &self,
        locator: &str,
        imports: E::Imports,
    ) -> Result<LoadedModuleOf<E>, LoadError> {
        trace!("load_from_source({}) starts", locator);
        let code = self.fetcher.fetch(locator).await?;
        self.load_from_bytes(locator, &code, imports)
    }
}

/// Binds every function and memory export of `instance` under its export name.
///
/// Other kinds are left out. On duplicate names the last descriptor wins.
pub fn index_exports<I: ModuleInstance>(
    exports: &[ExportDescriptor],
    instance: &I,
) -> Result<(IndexMap<String, I::Function>, IndexMap<String, I::Memory>), InstantiationError> {
    let mut functions = IndexMap::new();
    let mut memory = IndexMap::new();

    for export in exports {
        match export.kind {
            ExportKind::Function => {
                let function = instance
                    .function(&export.name)
                    .ok_or_else(|| InstantiationError::ExportUnavailable(export.name.clone()))?;
                functions.insert(export.name.clone(), function);
            }
            ExportKind::Memory => {
                let region = instance
                    .memory(&export.name)
                    .ok_or_else(|| InstantiationError::ExportUnavailable(export.name.clone()))?;
                memory.insert(export.name.clone(), region);
            }
            ExportKind::Other(_) => {}
        }
    }

    Ok((functions, memory))
}

/// Loads `code` with the default wasmi engine.
pub fn load_from_bytes<S: Into<String>>(
    name: S,
    code: &[u8],
    imports: WasmiImports,
) -> Result<WasmiLoadedModule, LoadError> {
    DefaultModuleLoader::default().load_from_bytes(name, code, imports)
}

/// Reads the module at `locator` from the filesystem and loads it with the default
/// wasmi engine.
pub async fn load_from_source(
    locator: &str,
    imports: WasmiImports,
) -> Result<WasmiLoadedModule, LoadError> {
    DefaultModuleLoader::default()
        .load_from_source(locator, imports)
        .await
}
