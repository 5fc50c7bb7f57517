macro_rules! trace {
    ($($arg:expr),*) => {{
        #[cfg(feature = "trace")]
        println!("[wasm-loader] {}", format!($($arg),*));
    }};
}
