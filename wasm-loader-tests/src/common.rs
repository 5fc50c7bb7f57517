use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};

pub use wabt::wat2wasm;

#[macro_export]
macro_rules! include_local_wasm_str {
    ($name: expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/", $name))
    };
}

/// Compiles a `.wat` asset of this crate to WASM bytes.
#[macro_export]
macro_rules! local_wasm {
    ($name: expr) => {
        $crate::common::wat2wasm($crate::include_local_wasm_str!($name)).unwrap()
    };
}

pub fn assets_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// Runs a future to completion on a fresh current-thread runtime.
pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

struct NoopWaker;

impl Wake for NoopWaker {
    fn wake(self: Arc<Self>) {}
}

/// Polls a future once with a waker that does nothing, outside of any runtime.
pub fn poll_once<F: Future>(future: F) -> Poll<F::Output> {
    let waker = Waker::from(Arc::new(NoopWaker));
    let mut cx = Context::from_waker(&waker);
    let mut future = std::pin::pin!(future);
    future.as_mut().poll(&mut cx)
}
