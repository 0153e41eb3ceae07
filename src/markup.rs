// Result-list markup assembly. The one place Rust builds HTML strings.

use crate::types::QuestionSummary;

/// Escape text for interpolation into HTML content or attribute values.
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Build listing markup for question summaries: one heading per question with
/// an answer-count badge and a new-tab title link.
pub(crate) fn question_list_markup(questions: &[QuestionSummary]) -> String {
    let mut html = String::new();
    for question in questions {
        html.push_str("<h2><span class=\"item-count\">");
        html.push_str(&question.answer_count.to_string());
        html.push_str("</span><a href=\"");
        html.push_str(&escape_html(&question.url));
        html.push_str("\" target=\"_blank\">");
        html.push_str(&escape_html(&question.title));
        html.push_str("</a></h2>");
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(title: &str, url: &str, answer_count: u32) -> QuestionSummary {
        QuestionSummary {
            url: url.to_string(),
            title: title.to_string(),
            answer_count,
        }
    }

    #[test]
    fn escapes_markup_significant_characters() {
        assert_eq!(
            escape_html(r#"<b>"cats" & 'dogs'</b>"#),
            "&lt;b&gt;&quot;cats&quot; &amp; &#39;dogs&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn builds_one_heading_per_question() {
        let html = question_list_markup(&[
            summary("How do I flair?", "/questions/42/", 3),
            summary("Why is the sky blue?", "/questions/43/", 0),
        ]);
        assert_eq!(html.matches("<h2>").count(), 2);
        assert!(html.contains("<span class=\"item-count\">3</span>"));
        assert!(html.contains("<a href=\"/questions/42/\" target=\"_blank\">How do I flair?</a>"));
    }

    #[test]
    fn question_titles_cannot_inject_markup() {
        let html = question_list_markup(&[summary("<script>alert(1)</script>", "/q/1/", 1)]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_listing_renders_nothing() {
        assert!(question_list_markup(&[]).is_empty());
    }
}
