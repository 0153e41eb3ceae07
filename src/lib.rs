// widget_core: Q&A page widgets as a Rust/WASM engine.
// All widget logic lives here; JS is plumbing that forwards DOM events and
// applies the returned view commands.

mod error;
mod logging;
mod markup;
mod paginator;
mod request;
mod search;
mod source;
mod timeago;
mod types;
mod window;

use wasm_bindgen::prelude::*;

pub use error::WidgetError;
pub use paginator::{PageLoad, Paginator};
pub use request::{PageRequest, Transport};
pub use search::{LiveSearch, SearchEvent};
pub use source::{patch_query_string, HtmlSource, PageSource, QuestionListSource};
pub use timeago::{
    format_timeago, in_words, parse_timestamp, timeago_refresh_millis, REFRESH_MILLIS,
};
pub use types::*;
pub use window::{incremental_disabled, incremental_targets, page_window, EdgeBlocks};

#[cfg(target_arch = "wasm32")]
pub use paginator::WasmPaginator;
#[cfg(target_arch = "wasm32")]
pub use request::HttpTransport;
#[cfg(target_arch = "wasm32")]
pub use search::WasmLiveSearch;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Serialize a command batch and push it through a JS callback sink.
/// Sink failures are logged; widgets never unwind into the page.
#[cfg(target_arch = "wasm32")]
pub(crate) fn deliver_commands<T: serde::Serialize>(sink: &js_sys::Function, commands: &[T]) {
    let json = match serde_json::to_string(commands) {
        Ok(json) => json,
        Err(err) => {
            crate::error_log!("command serialization failed: {}", err);
            return;
        }
    };
    if let Err(err) = sink.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
        crate::error_log!("command sink threw: {:?}", err);
    }
}
