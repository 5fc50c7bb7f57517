use crate::traits::ModuleFetcher;
use crate::types::*;
use std::fs;
use std::io::ErrorKind;

const FILE_SCHEME: &str = "file://";

/// Fetches modules from the local filesystem.
///
/// A locator is a path, optionally prefixed with `file://`. Relative paths are resolved
/// against `root` when one is configured, else against the working directory. Any other
/// URL scheme is rejected.
///
/// The read is a plain blocking file read performed when the returned future is first
/// polled, so the future completes on any executor and needs no runtime of its own.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    root: Option<PathBuf>,
}

impl FileFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Maps a locator to the path it names.
    pub fn resolve(&self, locator: &str) -> Result<PathBuf, FetchError> {
        let path = match locator.strip_prefix(FILE_SCHEME) {
            Some(path) => path,
            None if locator.contains("://") => {
                return Err(FetchError::InvalidLocator(locator.to_string()))
            }
            None => locator,
        };
        if path.is_empty() {
            return Err(FetchError::InvalidLocator(locator.to_string()));
        }

        let path = Path::new(path);
        Ok(match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        })
    }
}

impl ModuleFetcher for FileFetcher {
    fn fetch(&self, locator: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> {
        let locator = locator.to_string();
        let resolved = self.resolve(&locator);
        async move {
            let path = resolved?;
            trace!("fetching {} from {}", locator, path.display());
            fs::read(&path).map_err(|e| match e.kind() {
                ErrorKind::NotFound => FetchError::NotFound(locator),
                _ => FetchError::IoError {
                    locator,
                    reason: e.to_string(),
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::task::{Context, Poll, Wake, Waker};

    struct NoopWaker;

    impl Wake for NoopWaker {
        fn wake(self: Arc<Self>) {}
    }

    fn poll_once<T>(future: impl Future<Output = T>) -> Poll<T> {
        let waker = Waker::from(Arc::new(NoopWaker));
        let mut cx = Context::from_waker(&waker);
        let mut future = std::pin::pin!(future);
        future.as_mut().poll(&mut cx)
    }

    fn block_on<T>(future: impl Future<Output = T>) -> T {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn test_resolve_relative_to_root() {
        let fetcher = FileFetcher::with_root("/srv/modules");
        assert_eq!(
            fetcher.resolve("math.wasm").unwrap(),
            PathBuf::from("/srv/modules/math.wasm")
        );
        assert_eq!(
            fetcher.resolve("file://lib/math.wasm").unwrap(),
            PathBuf::from("/srv/modules/lib/math.wasm")
        );
        assert_eq!(
            fetcher.resolve("/opt/math.wasm").unwrap(),
            PathBuf::from("/opt/math.wasm")
        );
    }

    #[test]
    fn test_resolve_without_root() {
        let fetcher = FileFetcher::new();
        assert_eq!(fetcher.root(), None);
        assert_eq!(
            fetcher.resolve("math.wasm").unwrap(),
            PathBuf::from("math.wasm")
        );
    }

    #[test]
    fn test_invalid_locators() {
        let fetcher = FileFetcher::new();
        assert_eq!(
            fetcher.resolve("").unwrap_err(),
            FetchError::InvalidLocator("".to_string())
        );
        assert_eq!(
            fetcher.resolve("file://").unwrap_err(),
            FetchError::InvalidLocator("file://".to_string())
        );
        assert_eq!(
            fetcher.resolve("https://example.com/math.wasm").unwrap_err(),
            FetchError::InvalidLocator("https://example.com/math.wasm".to_string())
        );
    }

    #[test]
    fn test_fetch_missing_file() {
        let root = std::env::temp_dir().join("wasm-loader-fetch-test-does-not-exist");
        let fetcher = FileFetcher::with_root(root);
        assert_eq!(
            block_on(fetcher.fetch("missing.wasm")).unwrap_err(),
            FetchError::NotFound("missing.wasm".to_string())
        );
    }

    #[test]
    fn test_fetch_invalid_locator_fails_without_io() {
        let fetcher = FileFetcher::new();
        assert_eq!(
            block_on(fetcher.fetch("")).unwrap_err(),
            FetchError::InvalidLocator("".to_string())
        );
    }

    #[test]
    fn test_fetch_completes_without_a_runtime() {
        let root = std::env::temp_dir().join(format!("wasm-loader-fetch-{}", std::process::id()));
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("module.wasm"), b"\0asm\x01\0\0\0").unwrap();
        let fetcher = FileFetcher::with_root(&root);

        let fetched = poll_once(fetcher.fetch("module.wasm"));
        let missing = poll_once(fetcher.fetch("missing.wasm"));
        fs::remove_dir_all(&root).unwrap();

        assert_eq!(fetched, Poll::Ready(Ok(b"\0asm\x01\0\0\0".to_vec())));
        assert_eq!(
            missing,
            Poll::Ready(Err(FetchError::NotFound("missing.wasm".to_string())))
        );
    }
}
