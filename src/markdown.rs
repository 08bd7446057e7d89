// src/markdown.rs
use pulldown_cmark::{html, Options, Parser};

/// Renders authored markdown (group intros, hotspot descriptions) to an HTML
/// fragment for injection into the viewer. Tour content is authored, not
/// user-submitted, so no sanitizing pass is applied.
pub fn markdown_to_html(input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(input, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_paragraph() {
        assert_eq!(markdown_to_html("hello"), "<p>hello</p>\n");
    }

    #[test]
    fn test_emphasis_and_lists() {
        let html = markdown_to_html("Click **Save**\n\n- one\n- two");
        assert!(html.contains("<strong>Save</strong>"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn test_empty_input_renders_empty() {
        assert_eq!(markdown_to_html(""), "");
    }
}
