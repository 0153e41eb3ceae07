// Shared types crossing the JS↔WASM boundary. Config JSON in, command batches out.

use serde::{Deserialize, Serialize};

/// Paginator configuration passed from JS.
/// The glue script assembles this from the widget element's data attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatorConfig {
    /// Total number of pages.
    pub num_pages: u32,
    /// Page marked active in the pre-rendered strip.
    #[serde(default = "default_current_page")]
    pub current_page: u32,
    /// Number of main-strip page buttons.
    pub main_window_length: u32,
    /// Endpoint the widget fetches page data from.
    pub data_url: String,
    /// Selector of the element receiving rendered results.
    pub result_selector: String,
    /// Extra query parameters sent with every page fetch (string map).
    /// Anything unparseable degrades to an empty map with a logged warning.
    #[serde(default)]
    pub request_params: serde_json::Value,
    /// Which renderer consumes the response.
    #[serde(default)]
    pub renderer: RendererKind,
    /// Settings for the question-list renderer.
    #[serde(default)]
    pub question_list: Option<QuestionListSettings>,
}

fn default_current_page() -> u32 {
    1
}

/// Renderer variant selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    /// Replace the result target with the response's `html` fragment.
    #[default]
    Html,
    /// Rebuild a question listing and re-activate its fuzzy timestamps.
    QuestionList,
}

/// Question-list renderer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionListSettings {
    /// Author whose questions the listing shows.
    pub user_id: u64,
    /// Page size patched into the data URL.
    pub page_size: u32,
}

/// Live-search configuration passed from JS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Endpoint queried with the typed text.
    pub search_url: String,
    /// Queries shorter than this many characters do not fire.
    #[serde(default = "default_min_query_length")]
    pub min_query_length: usize,
    /// Quiet period after the last keystroke before evaluating (milliseconds).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
    /// Selector of the element receiving the result list.
    pub result_selector: String,
    /// Result rows shown before the list starts scrolling.
    #[serde(default = "default_max_visible_results")]
    pub max_visible_results: usize,
}

fn default_min_query_length() -> usize {
    4
}

fn default_debounce_ms() -> u32 {
    400
}

fn default_max_visible_results() -> usize {
    5
}

/// One page of fetched data, as the server returns it.
/// Which fields are present depends on the endpoint; each renderer picks its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageData {
    /// Rendered HTML fragment (generic endpoints).
    #[serde(default)]
    pub html: Option<String>,
    /// Rendered question listing (question-list endpoints).
    #[serde(default)]
    pub questions: Option<String>,
    /// Question summaries, when the endpoint returns structured data instead.
    #[serde(default)]
    pub question_list: Vec<QuestionSummary>,
}

/// One question in a search result or structured listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub answer_count: u32,
}

/// One DOM update for the environment to apply. Ordered batches cross the
/// boundary as JSON; Rust never touches the document itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ViewCommand {
    /// Relabel the main-strip page buttons, in order.
    RelabelPages { pages: Vec<u32> },
    /// Move the current-page highlight.
    MarkCurrent { page: u32 },
    /// Update the pages the previous/next buttons navigate to.
    SetNavTargets { prev: u32, next: u32 },
    /// Enable or disable the previous/next buttons.
    SetNavDisabled { prev: bool, next: bool },
    /// Show or hide the first/last page blocks and their gap ellipses.
    SetEdgeVisibility {
        first_block: bool,
        last_block: bool,
        leading_ellipsis: bool,
        trailing_ellipsis: bool,
    },
    /// Replace the contents of the element at `target`.
    ReplaceContent { target: String, html: String },
    /// Re-activate fuzzy timestamps inside freshly replaced content.
    RefreshTimestamps,
}

/// One live-search side effect for the environment to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SearchCommand {
    /// Re-arm the debounce timer, replacing any pending one.
    Debounce { delay_ms: u32 },
    /// Empty the result list at `target` and collapse it.
    ClearResults { target: String },
    /// Show the rendered result list at `target`; scrollable when it
    /// overflows the configured row limit.
    ShowResults {
        target: String,
        html: String,
        scrollable: bool,
    },
    /// Call back with the current input text, without waiting for a keystroke.
    Reevaluate,
}
