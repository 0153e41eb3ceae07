// Live-search debounce machine. The environment owns the input element and
// the timer; this state machine decides when a query is worth sending.

use crate::error::WidgetError;
use crate::markup;
use crate::request::PageRequest;
use crate::types::{QuestionSummary, SearchCommand, SearchConfig};

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// What the machine wants done after evaluating the input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// Fire a query for this (trimmed) text.
    StartQuery(String),
    /// The input emptied out; reset the result list.
    Clear,
}

/// Debounced as-you-type search over question titles.
///
/// Keystrokes re-arm a quiet-period timer; when it fires the input is
/// evaluated once. While a query runs, keystrokes and evaluations are
/// suppressed, and completion re-evaluates so text typed meanwhile is not
/// lost. Queries repeat neither the previous text nor anything under the
/// length threshold.
pub struct LiveSearch {
    config: SearchConfig,
    prev_text: String,
    running: bool,
}

impl LiveSearch {
    pub fn new(config: SearchConfig) -> Self {
        LiveSearch {
            config,
            prev_text: String::new(),
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// A keystroke arrived. Re-arms the debounce timer unless a query is
    /// already running; completion re-evaluates on its own.
    pub fn on_keystroke(&self) -> Option<SearchCommand> {
        if self.running {
            return None;
        }
        Some(SearchCommand::Debounce {
            delay_ms: self.config.debounce_ms,
        })
    }

    /// The debounce timer fired, or a settled query asked for another look.
    pub fn evaluate(&mut self, text: &str) -> Option<SearchEvent> {
        let current = text.trim();
        if current == self.prev_text || self.running {
            return None;
        }
        if current.chars().count() >= self.config.min_query_length {
            self.prev_text = current.to_string();
            self.running = true;
            Some(SearchEvent::StartQuery(current.to_string()))
        } else if current.is_empty() {
            self.prev_text.clear();
            Some(SearchEvent::Clear)
        } else {
            None
        }
    }

    /// The fetch for a started query: the text as `query`, cache busted.
    pub fn query_request(&self, text: &str) -> PageRequest {
        PageRequest::new(
            self.config.search_url.clone(),
            vec![("query".to_string(), text.to_string())],
        )
    }

    /// The reset command for an emptied input.
    pub fn clear_command(&self) -> SearchCommand {
        SearchCommand::ClearResults {
            target: self.config.result_selector.clone(),
        }
    }

    /// The query settled. Hits become a rendered listing; a hitless response
    /// clears whatever the previous query left showing; failures are logged.
    /// Either way the machine asks for a re-evaluation, so text typed during
    /// the request is picked up.
    pub fn complete(
        &mut self,
        outcome: Result<Vec<QuestionSummary>, WidgetError>,
    ) -> Vec<SearchCommand> {
        self.running = false;
        let mut commands = Vec::new();
        match outcome {
            Ok(questions) if !questions.is_empty() => {
                commands.push(SearchCommand::ShowResults {
                    target: self.config.result_selector.clone(),
                    html: markup::question_list_markup(&questions),
                    scrollable: questions.len() > self.config.max_visible_results,
                });
            }
            Ok(_) => commands.push(self.clear_command()),
            Err(err) => crate::warn_log!("live search failed: {}", err),
        }
        commands.push(SearchCommand::Reevaluate);
        commands
    }
}

// ===== WASM Bindings =====

/// Live-search handle exposed to JS.
///
/// The environment forwards keystrokes and timer expiries; commands flow back
/// as JSON batches through the `on_commands` callback.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct WasmLiveSearch {
    inner: Rc<RefCell<LiveSearch>>,
    transport: Rc<crate::request::HttpTransport>,
    on_commands: Rc<js_sys::Function>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl WasmLiveSearch {
    /// Create a live search from a JSON configuration string.
    ///
    /// # Arguments
    /// * `config_json` - JSON-serialized `SearchConfig`
    /// * `on_commands` - callback receiving JSON command batches
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: &str,
        on_commands: js_sys::Function,
    ) -> Result<WasmLiveSearch, JsValue> {
        let config: SearchConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
        Ok(WasmLiveSearch {
            inner: Rc::new(RefCell::new(LiveSearch::new(config))),
            transport: Rc::new(crate::request::HttpTransport::new()),
            on_commands: Rc::new(on_commands),
        })
    }

    /// A keystroke arrived in the search box.
    pub fn on_keystroke(&self) {
        let command = self.inner.borrow().on_keystroke();
        if let Some(command) = command {
            crate::deliver_commands(&self.on_commands, &[command]);
        }
    }

    /// The debounce timer fired (or a `reevaluate` command asked for another
    /// look); `text` is the input's current value.
    pub fn on_timer(&self, text: &str) {
        let event = self.inner.borrow_mut().evaluate(text);
        match event {
            Some(SearchEvent::StartQuery(query)) => self.run_query(query),
            Some(SearchEvent::Clear) => {
                let command = self.inner.borrow().clear_command();
                crate::deliver_commands(&self.on_commands, &[command]);
            }
            None => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().is_running()
    }

    fn run_query(&self, query: String) {
        let request = self.inner.borrow().query_request(&query);
        let inner = Rc::clone(&self.inner);
        let transport = Rc::clone(&self.transport);
        let on_commands = Rc::clone(&self.on_commands);
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = match transport.get_json(&request).await {
                Ok(payload) => {
                    serde_json::from_value::<Vec<QuestionSummary>>(payload).map_err(WidgetError::from)
                }
                Err(err) => Err(err),
            };
            let commands = inner.borrow_mut().complete(outcome);
            crate::deliver_commands(&on_commands, &commands);
        });
    }
}
