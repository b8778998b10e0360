// News-article text extraction from saved HTML pages.
use scraper::{Html, Selector};

/// Pulls the readable paragraph text out of an article page.
///
/// Paragraphs inside the main content container are preferred; pages without
/// one fall back to every paragraph in the document.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let content_selector = Selector::parse("div#maincontent p, article p").unwrap();
    let fallback_selector = Selector::parse("p").unwrap();

    let mut text = String::new();
    for node in document.select(&content_selector) {
        push_paragraph(&mut text, node.text().collect::<String>());
    }
    if text.is_empty() {
        for node in document.select(&fallback_selector) {
            push_paragraph(&mut text, node.text().collect::<String>());
        }
    }
    text
}

fn push_paragraph(text: &mut String, paragraph: String) {
    let trimmed = paragraph.trim();
    if trimmed.is_empty() {
        return;
    }
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(trimmed);
}
