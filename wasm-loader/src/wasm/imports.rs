use crate::types::*;
use wasmi::{Extern, Func, Global, IntoFunc, Memory, MemoryType, Mutability, Store, Val};

/// Host data attached to every store the loader creates.
pub type HostState = ();

type ExternFactory = Box<dyn FnOnce(&mut Store<HostState>) -> Result<Extern, String>>;

fn factory<F>(f: F) -> ExternFactory
where
    F: FnOnce(&mut Store<HostState>) -> Result<Extern, String> + 'static,
{
    Box::new(f)
}

/// The import configuration for the wasmi engine: externs keyed by `(module, name)`.
///
/// Externs live in a store, which does not exist until instantiation, so each entry
/// records how to create its extern rather than the extern itself. Defining the same
/// `(module, name)` twice replaces the earlier entry.
#[derive(Default)]
pub struct WasmiImports {
    entries: IndexMap<(String, String), ExternFactory>,
}

impl WasmiImports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provides a host function, e.g. `|a: i32, b: i32| a + b`.
    pub fn func<Params, Results, F>(self, module: &str, name: &str, func: F) -> Self
    where
        Params: 'static,
        Results: 'static,
        F: IntoFunc<HostState, Params, Results> + 'static,
    {
        self.define(
            module,
            name,
            factory(move |store| Ok(Extern::Func(Func::wrap(store, func)))),
        )
    }

    pub fn global(self, module: &str, name: &str, value: Val, mutable: bool) -> Self {
        let mutability = if mutable {
            Mutability::Var
        } else {
            Mutability::Const
        };
        self.define(
            module,
            name,
            factory(move |store| Ok(Extern::Global(Global::new(store, value, mutability)))),
        )
    }

    pub fn memory(
        self,
        module: &str,
        name: &str,
        initial_pages: u32,
        maximum_pages: Option<u32>,
    ) -> Self {
        self.define(
            module,
            name,
            factory(move |store| {
                let ty = MemoryType::new(initial_pages, maximum_pages).map_err(|e| e.to_string())?;
                Memory::new(store, ty)
                    .map(Extern::Memory)
                    .map_err(|e| e.to_string())
            }),
        )
    }

    pub fn contains(&self, module: &str, name: &str) -> bool {
        self.entries
            .contains_key(&(module.to_string(), name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn define(mut self, module: &str, name: &str, factory: ExternFactory) -> Self {
        self.entries
            .insert((module.to_string(), name.to_string()), factory);
        self
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = ((String, String), ExternFactory)> {
        self.entries.into_iter()
    }
}

impl fmt::Debug for WasmiImports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.entries
                    .keys()
                    .map(|(module, name)| format!("{}::{}", module, name)),
            )
            .finish()
    }
}
