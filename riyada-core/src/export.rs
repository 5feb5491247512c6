//! Word-compatible HTML export.
//!
//! Word opens a right-to-left HTML file with the Office namespaces as a
//! normal document, so no binary format is involved.

use std::fmt::Write as _;

use crate::exam::ExamSession;

/// Shown in place of a section that has no text.
pub const EMPTY_PLACEHOLDER: &str = "(not filled in)";

const DOC_HEAD: &str = "<html xmlns:o='urn:schemas-microsoft-com:office:office' \
xmlns:w='urn:schemas-microsoft-com:office:word' xmlns='http://www.w3.org/TR/REC-html40'>";

const BASE_STYLE: &str = "body { font-family: 'Arial', sans-serif; direction: rtl; text-align: right; } \
h1 { color: #2e3b55; border-bottom: 2px solid #ddd; padding-bottom: 10px; } \
p { line-height: 1.6; margin-bottom: 15px; } \
.question { margin-bottom: 20px; border-bottom: 1px solid #eee; padding-bottom: 10px; } \
.correct { color: green; font-weight: bold; } \
.wrong { color: red; text-decoration: line-through; }";

/// Escapes the five HTML special characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes `text` and turns line breaks into `<br>`.
fn paragraph_html(text: &str) -> String {
    escape_html(text)
        .replace("\r\n", "\n")
        .replace('\n', "<br>")
}

fn open_document(title: &str) -> String {
    let title = escape_html(title);
    format!(
        "{DOC_HEAD}<head><meta charset='utf-8'><title>{title}</title>\
         <style>{BASE_STYLE}</style></head><body><h1>{title}</h1>"
    )
}

fn close_document(mut html: String) -> String {
    html.push_str("</body></html>");
    html
}

/// Renders ordered `(heading, text)` pairs under a title.
pub fn render_document<H, T>(
    title: &str,
    sections: &[(H, T)],
) -> String
where
    H: AsRef<str>,
    T: AsRef<str>,
{
    let mut html = open_document(title);
    html.push_str("<hr/>");
    for (heading, text) in sections {
        let text = text.as_ref();
        let body = if text.trim().is_empty() {
            escape_html(EMPTY_PLACEHOLDER)
        } else {
            paragraph_html(text)
        };
        let _ = write!(
            html,
            "<h2>{}</h2><p>{}</p><br/>",
            escape_html(heading.as_ref()),
            body
        );
    }
    close_document(html)
}

/// Renders every question of a session with the correct option marked and
/// a wrong answer struck through, followed by the score.
pub fn render_exam(
    title: &str,
    session: &ExamSession,
) -> String {
    let mut html = open_document(title);
    let total = session.questions().len();
    let _ = write!(
        html,
        "<p><strong>Score: {} / {}</strong></p><hr/>",
        session.score(),
        total
    );

    for (number, question) in session.questions().iter().enumerate() {
        let user_answer = session.answers().get(&question.id);
        let _ = write!(
            html,
            "<div class='question'><h3>{}. {} <small>({})</small></h3><ul>",
            number + 1,
            escape_html(&question.text),
            question.kind.label()
        );
        for option in &question.options {
            let is_correct = *option == question.correct_answer;
            let is_chosen = user_answer == Some(option);
            let (class, suffix) = match (is_correct, is_chosen) {
                (true, true) => (" class='correct'", " (correct answer, your answer)"),
                (true, false) => (" class='correct'", " (correct answer)"),
                (false, true) => (" class='wrong'", " (your answer)"),
                (false, false) => ("", ""),
            };
            let _ = write!(html, "<li{class}>{}{suffix}</li>", escape_html(option));
        }
        html.push_str("</ul>");
        if user_answer.is_none() {
            html.push_str("<p>(not answered)</p>");
        }
        html.push_str("</div>");
    }
    close_document(html)
}

/// File name for an exported document: the title with whitespace collapsed
/// to underscores and a `.doc` extension.
pub fn document_file_name(title: &str) -> String {
    let stem: Vec<&str> = title.split_whitespace().collect();
    if stem.is_empty() {
        "document.doc".to_string()
    } else {
        format!("{}.doc", stem.join("_").to_lowercase())
    }
}
