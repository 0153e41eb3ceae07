// Pluggable page sources. Each variant knows where its data lives, what to
// send along, and how a response becomes view updates.

use crate::error::WidgetError;
use crate::markup;
use crate::types::{PageData, PaginatorConfig, RendererKind, ViewCommand};

/// What a paginator needs from its page variant: where to fetch, what to
/// send, and how to turn a response into view updates.
pub trait PageSource {
    /// Endpoint for `page_no`.
    fn data_url(&self, page_no: u32) -> String;

    /// Query parameters for `page_no`, merged fresh on every request.
    fn request_params(&self, page_no: u32) -> Vec<(String, String)>;

    /// Turn a page of data into view updates.
    ///
    /// Failures are values, not panics; the paginator logs them and carries on.
    fn render_page(&self, data: &PageData) -> Result<Vec<ViewCommand>, WidgetError>;
}

/// Generic page source: fixed endpoint, stored params plus `page_number`,
/// response `html` straight into the result target.
pub struct HtmlSource {
    data_url: String,
    result_selector: String,
    request_params: Vec<(String, String)>,
}

impl HtmlSource {
    pub fn new(
        data_url: impl Into<String>,
        result_selector: impl Into<String>,
        request_params: Vec<(String, String)>,
    ) -> Self {
        HtmlSource {
            data_url: data_url.into(),
            result_selector: result_selector.into(),
            request_params,
        }
    }
}

impl PageSource for HtmlSource {
    fn data_url(&self, _page_no: u32) -> String {
        self.data_url.clone()
    }

    fn request_params(&self, page_no: u32) -> Vec<(String, String)> {
        let mut params = self.request_params.clone();
        params.push(("page_number".to_string(), page_no.to_string()));
        params
    }

    fn render_page(&self, data: &PageData) -> Result<Vec<ViewCommand>, WidgetError> {
        let html = data
            .html
            .as_ref()
            .ok_or_else(|| WidgetError::Render("response carries no html field".to_string()))?;
        Ok(vec![ViewCommand::ReplaceContent {
            target: self.result_selector.clone(),
            html: html.clone(),
        }])
    }
}

/// Sort order the question listing is fetched in.
const QUESTION_SORT: &str = "votes-desc";

/// Question-list source: page selection rides in the URL as patched
/// `key:value` segments, and freshly rendered listings need their fuzzy
/// timestamps re-activated.
pub struct QuestionListSource {
    questions_url: String,
    result_selector: String,
    user_id: u64,
    page_size: u32,
}

impl QuestionListSource {
    pub fn new(
        questions_url: impl Into<String>,
        result_selector: impl Into<String>,
        user_id: u64,
        page_size: u32,
    ) -> Self {
        QuestionListSource {
            questions_url: questions_url.into(),
            result_selector: result_selector.into(),
            user_id,
            page_size,
        }
    }
}

impl PageSource for QuestionListSource {
    fn data_url(&self, page_no: u32) -> String {
        let mut query = patch_query_string("", &format!("author:{}", self.user_id));
        query = patch_query_string(&query, &format!("sort:{}", QUESTION_SORT));
        query = patch_query_string(&query, &format!("page:{}", page_no));
        query = patch_query_string(&query, &format!("page-size:{}", self.page_size));
        format!("{}{}", self.questions_url, query)
    }

    fn request_params(&self, _page_no: u32) -> Vec<(String, String)> {
        Vec::new()
    }

    fn render_page(&self, data: &PageData) -> Result<Vec<ViewCommand>, WidgetError> {
        let html = if let Some(questions) = &data.questions {
            questions.clone()
        } else if !data.question_list.is_empty() {
            markup::question_list_markup(&data.question_list)
        } else {
            return Err(WidgetError::Render(
                "response carries neither a questions fragment nor question summaries".to_string(),
            ));
        };
        Ok(vec![
            ViewCommand::ReplaceContent {
                target: self.result_selector.clone(),
                html,
            },
            ViewCommand::RefreshTimestamps,
        ])
    }
}

/// Patch one `key:value` segment into a `/`-separated query string.
///
/// The new segment goes in front; any existing segment with the same key is
/// dropped, everything else keeps its order.
pub fn patch_query_string(query: &str, patch: &str) -> String {
    let patch_key = patch.split(':').next().unwrap_or(patch);
    let mut patched = String::with_capacity(query.len() + patch.len() + 1);
    patched.push_str(patch);
    patched.push('/');
    for segment in query.split('/') {
        if segment.is_empty() {
            continue;
        }
        let key = segment.split(':').next().unwrap_or(segment);
        if key != patch_key {
            patched.push_str(segment);
            patched.push('/');
        }
    }
    patched
}

/// Build the page source a config asks for.
pub(crate) fn source_from_config(
    config: &PaginatorConfig,
) -> Result<Box<dyn PageSource>, WidgetError> {
    match config.renderer {
        RendererKind::Html => Ok(Box::new(HtmlSource::new(
            &config.data_url,
            &config.result_selector,
            parse_request_params(&config.request_params),
        ))),
        RendererKind::QuestionList => {
            let settings = config.question_list.as_ref().ok_or_else(|| {
                WidgetError::InvalidConfig(
                    "question_list renderer needs question_list settings".to_string(),
                )
            })?;
            Ok(Box::new(QuestionListSource::new(
                &config.data_url,
                &config.result_selector,
                settings.user_id,
                settings.page_size,
            )))
        }
    }
}

/// Interpret the config's free-form `request_params` as a string map.
///
/// The attribute is authored by hand in templates, so anything that is not a
/// flat object of scalars (or a JSON string holding one) degrades to an empty
/// map with a logged warning instead of failing the widget.
pub(crate) fn parse_request_params(raw: &serde_json::Value) -> Vec<(String, String)> {
    match raw {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::Object(map) => {
            let mut params = Vec::with_capacity(map.len());
            for (key, value) in map {
                let rendered = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    _ => {
                        crate::warn_log!(
                            "request params entry {:?} is not a scalar; using no params",
                            key
                        );
                        return Vec::new();
                    }
                };
                params.push((key.clone(), rendered));
            }
            params
        }
        serde_json::Value::String(text) if text.trim().is_empty() => Vec::new(),
        serde_json::Value::String(text) => match serde_json::from_str(text) {
            Ok(inner @ serde_json::Value::Object(_)) => parse_request_params(&inner),
            _ => {
                crate::warn_log!("request params {:?} are not a JSON object; using no params", text);
                Vec::new()
            }
        },
        other => {
            crate::warn_log!("request params {:?} are not a JSON object; using no params", other);
            Vec::new()
        }
    }
}
