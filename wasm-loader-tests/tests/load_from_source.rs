use std::fs;
use std::task::Poll;
use wasm_loader::wasm::*;
use wasm_loader::*;
use wasm_loader_tests::common::*;
use wasm_loader_tests::local_wasm;

fn write_module(dir: &tempfile::TempDir, file_name: &str, code: &[u8]) -> String {
    let path = dir.path().join(file_name);
    fs::write(&path, code).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_load_from_source_names_module_after_locator() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let locator = write_module(&dir, "math.wasm", &local_wasm!("math.wat"));

    // Act
    let module = block_on(load_from_source(&locator, WasmiImports::default())).unwrap();

    // Assert
    assert_eq!(module.name(), locator);
    assert_eq!(
        module.functions().keys().collect::<Vec<_>>(),
        vec!["add", "sub"]
    );
    assert_eq!(module.memory().keys().collect::<Vec<_>>(), vec!["memory"]);
    assert_eq!(module.exports().len(), 5);
}

#[test]
fn test_load_from_source_needs_no_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let locator = write_module(&dir, "math.wasm", &local_wasm!("math.wat"));

    let module = match poll_once(load_from_source(&locator, WasmiImports::default())) {
        Poll::Ready(result) => result.unwrap(),
        Poll::Pending => panic!("loading from a file should not wait on a runtime"),
    };

    assert_eq!(module.name(), locator);
    assert_eq!(
        module
            .get_function("add")
            .unwrap()
            .call_typed::<(i32, i32), i32>((2, 3))
            .unwrap(),
        5
    );
}

#[test]
fn test_load_from_source_matches_load_from_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let code = local_wasm!("counter.wat");
    let locator = write_module(&dir, "counter.wasm", &code);

    let from_source = block_on(load_from_source(&locator, WasmiImports::default())).unwrap();
    let from_bytes = load_from_bytes(locator.as_str(), &code, WasmiImports::default()).unwrap();

    assert_eq!(from_source.name(), from_bytes.name());
    assert_eq!(from_source.exports(), from_bytes.exports());
    for name in ["increment", "peek"] {
        let a = from_source.get_function(name).unwrap();
        let b = from_bytes.get_function(name).unwrap();
        assert_eq!(a.ty(), b.ty());
        assert!(!a.same_instance(b));
    }
}

#[test]
fn test_file_fetcher_resolves_relative_to_root() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("lib")).unwrap();
    write_module(&dir, "lib/greeting.wasm", &local_wasm!("greeting.wat"));
    let loader = ModuleLoader::new(WasmiEngine::default(), FileFetcher::with_root(dir.path()));

    for locator in ["lib/greeting.wasm", "file://lib/greeting.wasm"] {
        let module = block_on(loader.load_from_source(locator, WasmiImports::default())).unwrap();
        assert_eq!(module.name(), locator);
        assert!(module.get_function("greeting_ptr").is_some());
    }
}

#[test]
fn test_missing_source_is_a_fetch_error() {
    let dir = tempfile::tempdir().unwrap();
    let loader = ModuleLoader::new(WasmiEngine::default(), FileFetcher::with_root(dir.path()));

    assert_eq!(
        block_on(loader.load_from_source("nowhere.wasm", WasmiImports::default())).unwrap_err(),
        LoadError::FetchError(FetchError::NotFound("nowhere.wasm".to_string()))
    );
    assert_eq!(
        block_on(loader.load_from_source("", WasmiImports::default())).unwrap_err(),
        LoadError::FetchError(FetchError::InvalidLocator("".to_string()))
    );
    assert_eq!(
        block_on(loader.load_from_source("https://example.com/a.wasm", WasmiImports::default()))
            .unwrap_err(),
        LoadError::FetchError(FetchError::InvalidLocator(
            "https://example.com/a.wasm".to_string()
        ))
    );
}

#[test]
fn test_directory_source_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let locator = dir.path().to_str().unwrap().to_string();

    assert!(matches!(
        block_on(load_from_source(&locator, WasmiImports::default())),
        Err(LoadError::FetchError(FetchError::IoError { .. }))
    ));
}

#[test]
fn test_invalid_source_is_a_compile_error() {
    let dir = tempfile::tempdir().unwrap();
    let broken = write_module(&dir, "broken.wasm", b"\0asm\x01\0\0\0\x05");
    let good = write_module(&dir, "math.wasm", &local_wasm!("math.wat"));
    let loader = DefaultModuleLoader::default();

    assert!(matches!(
        block_on(loader.load_from_source(&broken, WasmiImports::default())),
        Err(LoadError::CompileError(_))
    ));
    assert!(block_on(loader.load_from_source(&good, WasmiImports::default())).is_ok());
}

#[test]
fn test_source_with_unsatisfied_imports_is_an_instantiation_error() {
    let dir = tempfile::tempdir().unwrap();
    let locator = write_module(&dir, "host_imports.wasm", &local_wasm!("host_imports.wat"));

    assert!(matches!(
        block_on(load_from_source(&locator, WasmiImports::default())),
        Err(LoadError::InstantiationError(InstantiationError::MissingImport { .. }))
    ));
}

#[test]
fn test_repeated_source_loads_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let locator = write_module(&dir, "counter.wasm", &local_wasm!("counter.wat"));
    let loader = DefaultModuleLoader::default();

    let (first, second) = block_on(async {
        let first = loader.load_from_source(&locator, WasmiImports::default());
        let second = loader.load_from_source(&locator, WasmiImports::default());
        (first.await, second.await)
    });
    let (first, second) = (first.unwrap(), second.unwrap());

    let increment = first.get_function("increment").unwrap();
    increment.call_typed::<(), i32>(()).unwrap();
    increment.call_typed::<(), i32>(()).unwrap();
    assert_eq!(
        second
            .get_function("peek")
            .unwrap()
            .call_typed::<(), i32>(())
            .unwrap(),
        0
    );
}
