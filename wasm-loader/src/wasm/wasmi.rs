use wasmi::core::ValType;
use wasmi::{
    Engine, ExternType, Func, FuncType, Instance, Linker, Memory, Module, Store, Val, WasmParams,
    WasmResults,
};

use super::config::WasmiEngineConfig;
use super::imports::{HostState, WasmiImports};
use crate::traits::*;
use crate::types::*;

pub const WASM_PAGE_SIZE: usize = 64 * 1024;

/// A `WasmiEngine` compiles modules and instantiates them, each instance in a store of
/// its own.
pub struct WasmiEngine {
    engine: Engine,
    config: WasmiEngineConfig,
}

/// A compiled module, which is a template that can be instantiated any number of times.
pub struct WasmiModule {
    module: Module,
    code_size_bytes: usize,
}

/// A live instance. Cloning shares the instance; it does not instantiate again.
#[derive(Clone)]
pub struct WasmiInstance {
    instance: Instance,
    store: Arc<Mutex<Store<HostState>>>,
}

/// An exported function bound to the store of the instance it came from.
#[derive(Clone)]
pub struct WasmiFunction {
    func: Func,
    store: Arc<Mutex<Store<HostState>>>,
}

/// An exported linear memory bound to the store of the instance it came from.
#[derive(Clone)]
pub struct WasmiMemory {
    memory: Memory,
    store: Arc<Mutex<Store<HostState>>>,
}

impl Default for WasmiEngine {
    fn default() -> Self {
        Self::new(WasmiEngineConfig::default())
    }
}

impl WasmiEngine {
    pub fn new(config: WasmiEngineConfig) -> Self {
        Self {
            engine: Engine::new(&config.to_wasmi_config()),
            config,
        }
    }

    pub fn config(&self) -> &WasmiEngineConfig {
        &self.config
    }
}

impl WasmiModule {
    pub fn code_size_bytes(&self) -> usize {
        self.code_size_bytes
    }

    /// The `(module, name)` pairs of all declared imports.
    pub fn imports(&self) -> Vec<(String, String)> {
        self.module
            .imports()
            .map(|import| (import.module().to_string(), import.name().to_string()))
            .collect()
    }
}

impl ModuleCompiler for WasmiEngine {
    type Module = WasmiModule;

    fn compile(&self, code: &[u8]) -> Result<WasmiModule, CompileError> {
        let module =
            Module::new(&self.engine, code).map_err(|e| CompileError::InvalidModule(e.to_string()))?;

        Ok(WasmiModule {
            module,
            code_size_bytes: code.len(),
        })
    }

    fn exports(&self, module: &WasmiModule) -> Vec<ExportDescriptor> {
        module
            .module
            .exports()
            .map(|export| {
                let kind = match export.ty() {
                    ExternType::Func(_) => ExportKind::Function,
                    ExternType::Memory(_) => ExportKind::Memory,
                    ExternType::Table(_) => ExportKind::Other(OtherExportKind::Table),
                    ExternType::Global(_) => ExportKind::Other(OtherExportKind::Global),
                };
                ExportDescriptor::new(export.name(), kind)
            })
            .collect()
    }
}

impl ModuleInstantiator for WasmiEngine {
    type Imports = WasmiImports;
    type Instance = WasmiInstance;

    fn instantiate(
        &self,
        module: &WasmiModule,
        imports: WasmiImports,
    ) -> Result<WasmiInstance, InstantiationError> {
        let mut declared = IndexMap::new();
        for import in module.module.imports() {
            if !imports.contains(import.module(), import.name()) {
                return Err(InstantiationError::MissingImport {
                    module: import.module().to_string(),
                    name: import.name().to_string(),
                });
            }
            declared.insert(
                (import.module().to_string(), import.name().to_string()),
                import.ty().clone(),
            );
        }

        let mut store = Store::new(&self.engine, ());
        let mut linker = <Linker<HostState>>::new(&self.engine);

        // Entries the module does not declare are never created.
        for (key, factory) in imports.into_entries() {
            let Some(expected) = declared.get(&key) else {
                continue;
            };
            let (module_name, name) = &key;
            let incompatible = |reason: String| InstantiationError::IncompatibleImport {
                module: module_name.clone(),
                name: name.clone(),
                reason,
            };

            let item = factory(&mut store).map_err(incompatible)?;
            check_import_type(expected, &item.ty(&store)).map_err(incompatible)?;

            linker
                .define(module_name, name, item)
                .map_err(|e| InstantiationError::LinkError(e.to_string()))?;
        }

        let pre_instance = linker
            .instantiate(&mut store, &module.module)
            .map_err(|e| InstantiationError::LinkError(e.to_string()))?;
        let instance = pre_instance
            .start(&mut store)
            .map_err(|e| InstantiationError::StartFunctionTrapped(e.to_string()))?;

        trace!(
            "instantiated module of {} bytes with {} imports",
            module.code_size_bytes,
            declared.len()
        );

        Ok(WasmiInstance {
            instance,
            store: Arc::new(Mutex::new(store)),
        })
    }
}

fn extern_kind(ty: &ExternType) -> &'static str {
    match ty {
        ExternType::Func(_) => "function",
        ExternType::Memory(_) => "memory",
        ExternType::Table(_) => "table",
        ExternType::Global(_) => "global",
    }
}

/// Checks the kind of a provided extern, and the signature of a provided function.
/// Limits of memories and tables, and global types, are left to the linker.
fn check_import_type(expected: &ExternType, found: &ExternType) -> Result<(), String> {
    match (expected, found) {
        (ExternType::Func(expected), ExternType::Func(found)) if expected != found => Err(
            format!("expected function {:?}, found {:?}", expected, found),
        ),
        (ExternType::Func(_), ExternType::Func(_))
        | (ExternType::Memory(_), ExternType::Memory(_))
        | (ExternType::Table(_), ExternType::Table(_))
        | (ExternType::Global(_), ExternType::Global(_)) => Ok(()),
        _ => Err(format!(
            "expected {}, found {}",
            extern_kind(expected),
            extern_kind(found)
        )),
    }
}

impl ModuleInstance for WasmiInstance {
    type Function = WasmiFunction;
    type Memory = WasmiMemory;

    fn function(&self, name: &str) -> Option<WasmiFunction> {
        let store = self.store.lock().expect("Failed to lock WASM store");
        self.instance
            .get_func(&*store, name)
            .map(|func| WasmiFunction {
                func,
                store: self.store.clone(),
            })
    }

    fn memory(&self, name: &str) -> Option<WasmiMemory> {
        let store = self.store.lock().expect("Failed to lock WASM store");
        self.instance
            .get_memory(&*store, name)
            .map(|memory| WasmiMemory {
                memory,
                store: self.store.clone(),
            })
    }
}

impl WasmiInstance {
    /// Whether both values refer to the same instance, in the same store.
    pub fn same_instance(&self, other: &WasmiInstance) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }
}

impl WasmiFunction {
    pub fn ty(&self) -> FuncType {
        let store = self.store.lock().expect("Failed to lock WASM store");
        self.func.ty(&*store)
    }

    /// Calls the function with dynamically typed arguments.
    pub fn call(&self, args: &[Val]) -> Result<Vec<Val>, InvokeError> {
        let mut store = self.store.lock().expect("Failed to lock WASM store");
        let ty = self.func.ty(&*store);

        let arg_types: Vec<ValType> = args.iter().map(Val::ty).collect();
        if ty.params() != &arg_types[..] {
            return Err(InvokeError::SignatureMismatch(format!(
                "expected parameters {:?}, found {:?}",
                ty.params(),
                arg_types
            )));
        }

        let mut results: Vec<Val> = ty.results().iter().copied().map(Val::default).collect();
        self.func
            .call(&mut *store, args, &mut results)
            .map_err(|e| InvokeError::Trap(e.to_string()))?;

        Ok(results)
    }

    /// Calls the function with statically typed arguments, e.g.
    /// `function.call_typed::<(i32, i32), i32>((1, 2))`.
    pub fn call_typed<P: WasmParams, R: WasmResults>(&self, params: P) -> Result<R, InvokeError> {
        let mut store = self.store.lock().expect("Failed to lock WASM store");
        let typed = self
            .func
            .typed::<P, R>(&*store)
            .map_err(|e| InvokeError::SignatureMismatch(e.to_string()))?;

        typed
            .call(&mut *store, params)
            .map_err(|e| InvokeError::Trap(e.to_string()))
    }

    /// Whether both bindings belong to the same instance.
    pub fn same_instance(&self, other: &WasmiFunction) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }
}

impl WasmiMemory {
    pub fn data_size(&self) -> usize {
        let store = self.store.lock().expect("Failed to lock WASM store");
        self.memory.data(&*store).len()
    }

    pub fn size_pages(&self) -> usize {
        self.data_size() / WASM_PAGE_SIZE
    }

    pub fn read(&self, offset: usize, buffer: &mut [u8]) -> Result<(), InvokeError> {
        let store = self.store.lock().expect("Failed to lock WASM store");
        self.memory
            .read(&*store, offset, buffer)
            .map_err(|_| InvokeError::MemoryAccessError)
    }

    pub fn read_vec(&self, offset: usize, len: usize) -> Result<Vec<u8>, InvokeError> {
        let mut buffer = vec![0u8; len];
        self.read(offset, &mut buffer)?;
        Ok(buffer)
    }

    pub fn write(&self, offset: usize, data: &[u8]) -> Result<(), InvokeError> {
        let mut store = self.store.lock().expect("Failed to lock WASM store");
        self.memory
            .write(&mut *store, offset, data)
            .map_err(|_| InvokeError::MemoryAccessError)
    }

    /// Whether both bindings belong to the same instance.
    pub fn same_instance(&self, other: &WasmiMemory) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }
}

impl fmt::Debug for WasmiModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WasmiModule")
            .field("code_size_bytes", &self.code_size_bytes)
            .finish()
    }
}
