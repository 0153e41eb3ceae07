// Paginator request lifecycle. At most one fetch in flight; the strip updates
// optimistically and rolls back when the fetch fails.

use crate::error::WidgetError;
use crate::request::{PageRequest, Transport};
use crate::source::{source_from_config, PageSource};
use crate::types::{PageData, PaginatorConfig, ViewCommand};
use crate::window::{incremental_disabled, incremental_targets, page_window, EdgeBlocks};

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// An accepted navigation: the fetch to run plus the optimistic strip update
/// to apply while it is in flight.
#[derive(Debug)]
pub struct PageLoad {
    pub request: PageRequest,
    pub commands: Vec<ViewCommand>,
}

/// Page-strip state machine with an at-most-one-in-flight fetch discipline.
///
/// The paginator owns no DOM and runs no I/O. It accepts navigations, hands
/// back view-command batches, and expects its caller to drive the fetch
/// through [`Paginator::finish_page_load`] (or use the composed
/// [`Paginator::go_to_page`]).
pub struct Paginator {
    current_page: u32,
    num_pages: u32,
    main_window_length: u32,
    is_loading: bool,
    pending_rollback: Option<u32>,
    source: Box<dyn PageSource>,
}

impl Paginator {
    /// Build a paginator over an injected page source.
    ///
    /// `current_page` comes from the button marked active in the pre-rendered
    /// strip and is clamped into `[1, num_pages]`.
    pub fn new(
        num_pages: u32,
        main_window_length: u32,
        current_page: u32,
        source: Box<dyn PageSource>,
    ) -> Result<Self, WidgetError> {
        if num_pages == 0 {
            return Err(WidgetError::InvalidConfig(
                "num_pages must be at least 1".to_string(),
            ));
        }
        if main_window_length == 0 {
            return Err(WidgetError::InvalidConfig(
                "main_window_length must be at least 1".to_string(),
            ));
        }
        Ok(Paginator {
            current_page: current_page.clamp(1, num_pages),
            num_pages,
            main_window_length,
            is_loading: false,
            pending_rollback: None,
            source,
        })
    }

    /// Build a paginator and its page source from a JS-provided config.
    pub fn from_config(config: &PaginatorConfig) -> Result<Self, WidgetError> {
        let source = source_from_config(config)?;
        Paginator::new(
            config.num_pages,
            config.main_window_length,
            config.current_page,
            source,
        )
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Page the next button targets: one forward, clamped to the last page.
    pub fn next_page_target(&self) -> u32 {
        incremental_targets(self.current_page, self.num_pages).1
    }

    /// Page the previous button targets: one back, clamped to the first page.
    pub fn previous_page_target(&self) -> u32 {
        incremental_targets(self.current_page, self.num_pages).0
    }

    /// The full strip update for the current state, in application order:
    /// button labels, current marker, incremental targets, incremental
    /// disabled state, edge-block visibility.
    pub fn strip_commands(&self) -> Vec<ViewCommand> {
        let window = page_window(self.current_page, self.num_pages, self.main_window_length);
        let edges = EdgeBlocks::for_window(&window, self.num_pages);
        let (prev, next) = incremental_targets(self.current_page, self.num_pages);
        let (prev_disabled, next_disabled) =
            incremental_disabled(self.current_page, self.num_pages);
        vec![
            ViewCommand::RelabelPages { pages: window },
            ViewCommand::MarkCurrent {
                page: self.current_page,
            },
            ViewCommand::SetNavTargets { prev, next },
            ViewCommand::SetNavDisabled {
                prev: prev_disabled,
                next: next_disabled,
            },
            ViewCommand::SetEdgeVisibility {
                first_block: edges.first_block,
                last_block: edges.last_block,
                leading_ellipsis: edges.leading_ellipsis,
                trailing_ellipsis: edges.trailing_ellipsis,
            },
        ]
    }

    /// Accept a navigation to `page_no`, unless a fetch is already in flight.
    ///
    /// On acceptance the strip moves to `page_no` immediately and the returned
    /// request must be settled through [`Paginator::finish_page_load`]. Page
    /// numbers are taken as-is: button values are trusted, and incremental
    /// callers clamp through the target helpers. While loading, navigations
    /// are dropped, not queued.
    pub fn begin_page_load(&mut self, page_no: u32) -> Option<PageLoad> {
        if self.is_loading {
            return None;
        }
        self.pending_rollback = Some(self.current_page);
        self.is_loading = true;
        self.current_page = page_no;
        let request = PageRequest::new(
            self.source.data_url(page_no),
            self.source.request_params(page_no),
        );
        Some(PageLoad {
            request,
            commands: self.strip_commands(),
        })
    }

    /// Settle the in-flight navigation with the transport's outcome.
    ///
    /// Success hands the payload to the page source's renderer; renderer
    /// failures are logged, never propagated, and cannot leave the loading
    /// flag stuck because the flag clears before the renderer runs. Transport
    /// failure rolls the strip back to the page that was current before the
    /// call; already-rendered content is left alone.
    pub fn finish_page_load(
        &mut self,
        outcome: Result<serde_json::Value, WidgetError>,
    ) -> Vec<ViewCommand> {
        let rollback_page = match self.pending_rollback.take() {
            Some(page) => page,
            None => {
                crate::warn_log!("page load settled with none in flight; ignoring");
                return Vec::new();
            }
        };
        self.is_loading = false;
        match outcome {
            Ok(payload) => match serde_json::from_value::<PageData>(payload) {
                Ok(data) => match self.source.render_page(&data) {
                    Ok(commands) => commands,
                    Err(err) => {
                        crate::error_log!("page renderer failed: {}", err);
                        Vec::new()
                    }
                },
                Err(err) => {
                    crate::error_log!("page payload malformed: {}", err);
                    Vec::new()
                }
            },
            Err(err) => {
                crate::warn_log!("page fetch failed: {}; restoring page {}", err, rollback_page);
                self.current_page = rollback_page;
                self.strip_commands()
            }
        }
    }

    /// Navigate to `page_no` as one task: the optimistic strip update and the
    /// settled outcome both flow through `apply`, in order. Returns false when
    /// the navigation was dropped.
    ///
    /// The WASM wrapper drives the two phases itself instead, so the JS
    /// boundary can re-enter between them.
    pub async fn go_to_page<T: Transport>(
        &mut self,
        transport: &T,
        page_no: u32,
        apply: &mut dyn FnMut(&[ViewCommand]),
    ) -> bool {
        let load = match self.begin_page_load(page_no) {
            Some(load) => load,
            None => return false,
        };
        apply(&load.commands);
        let outcome = transport.get_json(&load.request).await;
        let commands = self.finish_page_load(outcome);
        if !commands.is_empty() {
            apply(&commands);
        }
        true
    }

    /// Navigate one page forward, clamped to the last page.
    pub async fn go_next<T: Transport>(
        &mut self,
        transport: &T,
        apply: &mut dyn FnMut(&[ViewCommand]),
    ) -> bool {
        self.go_to_page(transport, self.next_page_target(), apply)
            .await
    }

    /// Navigate one page back, clamped to the first page.
    pub async fn go_previous<T: Transport>(
        &mut self,
        transport: &T,
        apply: &mut dyn FnMut(&[ViewCommand]),
    ) -> bool {
        self.go_to_page(transport, self.previous_page_target(), apply)
            .await
    }
}

// ===== WASM Bindings =====

/// Paginator handle exposed to JS.
///
/// Command batches are delivered as JSON strings through the `on_commands`
/// callback: once synchronously when a navigation is accepted (the optimistic
/// strip update) and once more when its fetch settles.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct WasmPaginator {
    inner: Rc<RefCell<Paginator>>,
    transport: Rc<crate::request::HttpTransport>,
    on_commands: Rc<js_sys::Function>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl WasmPaginator {
    /// Create a paginator from a JSON configuration string.
    ///
    /// # Arguments
    /// * `config_json` - JSON-serialized `PaginatorConfig`
    /// * `on_commands` - callback receiving JSON command batches
    ///
    /// # Errors
    /// Returns a JS error when the config is malformed or inconsistent.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, on_commands: js_sys::Function) -> Result<WasmPaginator, JsValue> {
        let config: PaginatorConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
        let paginator =
            Paginator::from_config(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmPaginator {
            inner: Rc::new(RefCell::new(paginator)),
            transport: Rc::new(crate::request::HttpTransport::new()),
            on_commands: Rc::new(on_commands),
        })
    }

    /// Emit the strip commands for the current state, for first paint.
    pub fn render(&self) {
        let commands = self.inner.borrow().strip_commands();
        crate::deliver_commands(&self.on_commands, &commands);
    }

    /// Navigate to `page_no`.
    ///
    /// # Returns
    /// False when a fetch is already in flight and the navigation was dropped.
    pub fn go_to_page(&self, page_no: u32) -> bool {
        let load = match self.inner.borrow_mut().begin_page_load(page_no) {
            Some(load) => load,
            None => return false,
        };
        crate::deliver_commands(&self.on_commands, &load.commands);

        let inner = Rc::clone(&self.inner);
        let transport = Rc::clone(&self.transport);
        let on_commands = Rc::clone(&self.on_commands);
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = transport.get_json(&load.request).await;
            let commands = inner.borrow_mut().finish_page_load(outcome);
            if !commands.is_empty() {
                crate::deliver_commands(&on_commands, &commands);
            }
        });
        true
    }

    /// Handle a page-button click. Clicks on the current page are ignored;
    /// everything else behaves like [`WasmPaginator::go_to_page`].
    pub fn click_page(&self, page_no: u32) -> bool {
        if self.inner.borrow().current_page() == page_no {
            return false;
        }
        self.go_to_page(page_no)
    }

    /// Navigate one page forward, clamped to the last page.
    pub fn go_next(&self) -> bool {
        let target = self.inner.borrow().next_page_target();
        self.go_to_page(target)
    }

    /// Navigate one page back, clamped to the first page.
    pub fn go_previous(&self) -> bool {
        let target = self.inner.borrow().previous_page_target();
        self.go_to_page(target)
    }

    pub fn current_page(&self) -> u32 {
        self.inner.borrow().current_page()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.borrow().is_loading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::HtmlSource;
    use serde_json::json;

    fn paginator_at(current_page: u32, num_pages: u32) -> Paginator {
        Paginator::new(
            num_pages,
            5,
            current_page,
            Box::new(HtmlSource::new("/questions/", "#questions", Vec::new())),
        )
        .unwrap()
    }

    #[test]
    fn construction_rejects_empty_dimensions() {
        let source = || Box::new(HtmlSource::new("/q/", "#q", Vec::new()));
        assert!(Paginator::new(0, 5, 1, source()).is_err());
        assert!(Paginator::new(10, 0, 1, source()).is_err());
    }

    #[test]
    fn construction_clamps_the_starting_page() {
        assert_eq!(paginator_at(99, 10).current_page(), 10);
        assert_eq!(paginator_at(0, 10).current_page(), 1);
    }

    #[test]
    fn strip_commands_come_in_application_order() {
        let commands = paginator_at(1, 20).strip_commands();
        assert_eq!(commands.len(), 5);
        assert_eq!(
            commands[0],
            ViewCommand::RelabelPages {
                pages: vec![1, 2, 3, 4, 5]
            }
        );
        assert_eq!(commands[1], ViewCommand::MarkCurrent { page: 1 });
        assert_eq!(commands[2], ViewCommand::SetNavTargets { prev: 1, next: 2 });
        assert_eq!(
            commands[3],
            ViewCommand::SetNavDisabled {
                prev: true,
                next: false
            }
        );
        assert_eq!(
            commands[4],
            ViewCommand::SetEdgeVisibility {
                first_block: false,
                last_block: true,
                leading_ellipsis: false,
                trailing_ellipsis: true,
            }
        );
    }

    #[test]
    fn single_page_strip_disables_both_nav_buttons() {
        let commands = paginator_at(1, 1).strip_commands();
        assert!(commands.contains(&ViewCommand::SetNavDisabled {
            prev: true,
            next: true
        }));
    }

    #[test]
    fn begin_moves_the_strip_before_the_fetch_settles() {
        let mut paginator = paginator_at(1, 20);
        let load = paginator.begin_page_load(3).unwrap();
        assert!(paginator.is_loading());
        assert_eq!(paginator.current_page(), 3);
        assert!(load.commands.contains(&ViewCommand::MarkCurrent { page: 3 }));
        let url = load.request.full_url().unwrap();
        assert!(url.contains("page_number=3"));
    }

    #[test]
    fn second_begin_while_loading_is_dropped() {
        let mut paginator = paginator_at(1, 20);
        assert!(paginator.begin_page_load(3).is_some());
        assert!(paginator.begin_page_load(4).is_none());
        assert_eq!(paginator.current_page(), 3);
    }

    #[test]
    fn successful_settle_renders_and_clears_the_flag() {
        let mut paginator = paginator_at(1, 20);
        paginator.begin_page_load(2);
        let commands = paginator.finish_page_load(Ok(json!({ "html": "<p>two</p>" })));
        assert!(!paginator.is_loading());
        assert_eq!(paginator.current_page(), 2);
        assert_eq!(
            commands,
            vec![ViewCommand::ReplaceContent {
                target: "#questions".to_string(),
                html: "<p>two</p>".to_string(),
            }]
        );
    }

    #[test]
    fn failed_settle_rolls_the_strip_back() {
        let mut paginator = paginator_at(3, 20);
        paginator.begin_page_load(5);
        let commands =
            paginator.finish_page_load(Err(WidgetError::Transport("timeout".to_string())));
        assert!(!paginator.is_loading());
        assert_eq!(paginator.current_page(), 3);
        assert!(commands.contains(&ViewCommand::MarkCurrent { page: 3 }));
    }

    #[test]
    fn renderer_failure_is_swallowed_and_never_sticks_the_flag() {
        let mut paginator = paginator_at(1, 20);
        paginator.begin_page_load(2);
        // No html field: the source's renderer reports an error.
        let commands = paginator.finish_page_load(Ok(json!({})));
        assert!(commands.is_empty());
        assert!(!paginator.is_loading());
        assert_eq!(paginator.current_page(), 2);
        // The machine accepts navigations again.
        assert!(paginator.begin_page_load(3).is_some());
    }

    #[test]
    fn malformed_payload_is_swallowed_too() {
        let mut paginator = paginator_at(1, 20);
        paginator.begin_page_load(2);
        let commands = paginator.finish_page_load(Ok(json!({ "html": 17 })));
        assert!(commands.is_empty());
        assert!(!paginator.is_loading());
    }

    #[test]
    fn settle_without_a_load_in_flight_is_ignored() {
        let mut paginator = paginator_at(4, 20);
        let commands = paginator.finish_page_load(Ok(json!({ "html": "<p>stray</p>" })));
        assert!(commands.is_empty());
        assert_eq!(paginator.current_page(), 4);
        assert!(!paginator.is_loading());
    }

    // The composed navigation runs on the tokio test runner, which only
    // exists natively; the wasm profile covers the wrappers through
    // tests/wasm_interop.rs instead.
    #[cfg(not(target_arch = "wasm32"))]
    mod navigation_tests {
        use super::*;
        use std::cell::RefCell;

        /// Serves a fixed payload and records every request it sees.
        struct FixedTransport {
            payload: serde_json::Value,
            requests: RefCell<Vec<PageRequest>>,
        }

        impl FixedTransport {
            fn html(fragment: &str) -> Self {
                FixedTransport {
                    payload: json!({ "html": fragment }),
                    requests: RefCell::new(Vec::new()),
                }
            }
        }

        #[async_trait::async_trait(?Send)]
        impl Transport for FixedTransport {
            async fn get_json(
                &self,
                request: &PageRequest,
            ) -> Result<serde_json::Value, WidgetError> {
                self.requests.borrow_mut().push(request.clone());
                Ok(self.payload.clone())
            }
        }

        struct FailingTransport;

        #[async_trait::async_trait(?Send)]
        impl Transport for FailingTransport {
            async fn get_json(
                &self,
                _request: &PageRequest,
            ) -> Result<serde_json::Value, WidgetError> {
                Err(WidgetError::Transport("connection reset".to_string()))
            }
        }

        #[tokio::test]
        async fn navigation_applies_strip_then_content() {
            let transport = FixedTransport::html("<div>page three</div>");
            let mut paginator = paginator_at(1, 20);
            let mut batches: Vec<Vec<ViewCommand>> = Vec::new();
            let accepted = paginator
                .go_to_page(&transport, 3, &mut |commands| batches.push(commands.to_vec()))
                .await;
            assert!(accepted);
            assert_eq!(batches.len(), 2);
            assert!(batches[0].contains(&ViewCommand::MarkCurrent { page: 3 }));
            assert_eq!(
                batches[1],
                vec![ViewCommand::ReplaceContent {
                    target: "#questions".to_string(),
                    html: "<div>page three</div>".to_string(),
                }]
            );
            assert_eq!(paginator.current_page(), 3);
            assert!(!paginator.is_loading());
        }

        #[tokio::test]
        async fn navigating_to_the_current_page_still_fetches() {
            let transport = FixedTransport::html("<div>page one again</div>");
            let mut paginator = paginator_at(1, 20);
            let accepted = paginator.go_to_page(&transport, 1, &mut |_| {}).await;
            assert!(accepted);
            assert_eq!(transport.requests.borrow().len(), 1);
        }

        #[tokio::test]
        async fn failed_navigation_rolls_back_through_the_sink() {
            let mut paginator = paginator_at(3, 20);
            let mut batches: Vec<Vec<ViewCommand>> = Vec::new();
            let accepted = paginator
                .go_to_page(&FailingTransport, 5, &mut |commands| {
                    batches.push(commands.to_vec())
                })
                .await;
            assert!(accepted);
            assert_eq!(batches.len(), 2);
            assert!(batches[0].contains(&ViewCommand::MarkCurrent { page: 5 }));
            assert!(batches[1].contains(&ViewCommand::MarkCurrent { page: 3 }));
            assert_eq!(paginator.current_page(), 3);
            assert!(!paginator.is_loading());
        }

        #[tokio::test]
        async fn navigation_while_loading_is_dropped() {
            let transport = FixedTransport::html("<div></div>");
            let mut paginator = paginator_at(1, 20);
            paginator.begin_page_load(2);
            let accepted = paginator.go_to_page(&transport, 3, &mut |_| {}).await;
            assert!(!accepted);
            assert!(transport.requests.borrow().is_empty());
            assert_eq!(paginator.current_page(), 2);
        }

        #[tokio::test]
        async fn incremental_navigation_refetches_at_the_boundary() {
            let transport = FixedTransport::html("<div>last</div>");
            let mut paginator = paginator_at(10, 10);
            let accepted = paginator.go_next(&transport, &mut |_| {}).await;
            assert!(accepted);
            let requests = transport.requests.borrow();
            assert!(requests[0].full_url().unwrap().contains("page_number=10"));
        }

        #[tokio::test]
        async fn stored_params_ride_along_on_every_fetch() {
            let transport = FixedTransport::html("<div></div>");
            let source = HtmlSource::new(
                "/widgets/questions/",
                "#questions",
                vec![("tags".to_string(), "rust".to_string())],
            );
            let mut paginator = Paginator::new(8, 5, 1, Box::new(source)).unwrap();
            paginator.go_to_page(&transport, 2, &mut |_| {}).await;
            let requests = transport.requests.borrow();
            let url = requests[0].full_url().unwrap();
            assert!(url.starts_with("/widgets/questions/?tags=rust&page_number=2&_="));
        }
    }
}
