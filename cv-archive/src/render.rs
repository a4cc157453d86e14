//! Output rendering
//!
//! Markdown payloads become a standalone HTML page; rich-text payloads
//! become plain text.

use pulldown_cmark::{html, Options, Parser};
use serde::Deserialize;

const DEFAULT_TITLE: &str = "Untitled";

/// Standalone HTML page for a post
///
/// One element per line: head with title, optional cover image, `<h1>`
/// title, optional `<h2>` subtitle, then the rendered Markdown.
pub fn render_html(
    markdown: &str,
    title: Option<&str>,
    subtitle: Option<&str>,
    cover_src: Option<&str>,
) -> String {
    let title = escape_html(title.unwrap_or(DEFAULT_TITLE));

    let mut parts: Vec<String> = ["<!DOCTYPE html>", "<html>", "<head>", "<title>"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    parts.push(title.clone());
    parts.extend(
        ["</title>", "</head>", "<body>"]
            .iter()
            .map(|s| s.to_string()),
    );

    if let Some(src) = cover_src.filter(|s| !s.is_empty()) {
        parts.push(format!(
            r#"<img src="{}" alt="Cover Image" style="width:100%; max-width:600px;">"#,
            escape_html(src)
        ));
    }

    parts.push(format!("<h1>{}</h1>", title));

    if let Some(subtitle) = subtitle.filter(|s| !s.is_empty()) {
        parts.push(format!("<h2>{}</h2>", escape_html(subtitle)));
    }

    parts.push(markdown_to_html(markdown));
    parts.push("</body>".to_string());
    parts.push("</html>".to_string());

    parts.join("\n")
}

fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out.trim_end().to_string()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Node of a rich-text document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocNode {
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub text: Option<String>,
    pub content: Option<Vec<DocNode>>,
}

/// Human-readable text of a rich-text document
///
/// Top-level nodes contribute their own text, or for paragraphs the texts
/// of their children joined by spaces. Parts are separated by a blank line.
pub fn extract_human_text(document: &DocNode) -> String {
    let nodes = document.content.as_deref().unwrap_or_default();

    let parts: Vec<String> = nodes
        .iter()
        .filter_map(|node| {
            if let Some(text) = &node.text {
                Some(text.clone())
            } else if node.node_type.as_deref() == Some("paragraph") {
                let children = node.content.as_deref().unwrap_or_default();
                Some(
                    children
                        .iter()
                        .map(|child| child.text.as_deref().unwrap_or(""))
                        .collect::<Vec<_>>()
                        .join(" "),
                )
            } else {
                None
            }
        })
        .collect();

    parts.join("\n\n")
}
