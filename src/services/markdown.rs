//! Job descriptions arrive as markdown from the scraper; the UI shows them as
//! sanitized HTML.

use pulldown_cmark::{Options, Parser, html};

/// Renders `markdown` to HTML and strips anything unsafe: scripts, event
/// handlers and `javascript:` links. Links get `rel="noopener noreferrer nofollow"`.
#[must_use]
pub fn render_description(markdown: &str) -> String {
    if markdown.trim().is_empty() {
        return String::new();
    }

    let parser = Parser::new_ext(
        markdown,
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
    );
    let mut raw = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut raw, parser);

    ammonia::Builder::default()
        .link_rel(Some("noopener noreferrer nofollow"))
        .clean(&raw)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_formatting_is_kept() {
        let html = render_description("**Lead** the PMO\n\n- budgets\n- reporting");
        assert!(html.contains("<strong>Lead</strong>"));
        assert!(html.contains("<li>budgets</li>"));
    }

    #[test]
    fn test_scripts_and_handlers_are_stripped() {
        let html = render_description(
            "Hi <script>alert(1)</script><img src=\"x.png\" onerror=\"alert(2)\">",
        );
        assert!(!html.contains("<script"));
        assert!(!html.contains("onerror"));
        assert!(html.contains("Hi"));
    }

    #[test]
    fn test_links_are_safe() {
        let html = render_description("[apply](https://example.com/apply) [x](javascript:alert(1))");
        assert!(html.contains("href=\"https://example.com/apply\""));
        assert!(html.contains("rel=\"noopener noreferrer nofollow\""));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn test_blank_description_renders_nothing() {
        assert_eq!(render_description("  \n"), "");
    }
}
