// Console diagnostics that work in both WASM and native builds.
// The widgets recover from bad config, failed fetches, and render errors;
// these macros are how those recoveries stay visible.

/// Warning log macro. Browser console on wasm32, stderr natively.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::warn_1(&format!($($arg)*).into());
        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("[WARN] {}", format!($($arg)*));
    }};
}

/// Error log macro. Browser console on wasm32, stderr natively.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::error_1(&format!($($arg)*).into());
        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("[ERROR] {}", format!($($arg)*));
    }};
}
