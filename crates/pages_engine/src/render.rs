use pulldown_cmark::{html, Options, Parser};

/// Turns response Markdown into HTML for display. Used for both the output
/// regions and history entries so they always match.
pub trait MarkdownRenderer: Send + Sync {
    fn to_html(&self, markdown: &str) -> String;
}

#[derive(Debug, Clone, Copy)]
pub struct CommonMarkRenderer {
    options: Options,
}

impl Default for CommonMarkRenderer {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
        }
    }
}

impl MarkdownRenderer for CommonMarkRenderer {
    fn to_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{CommonMarkRenderer, MarkdownRenderer};

    #[test]
    fn bold_becomes_strong() {
        let html = CommonMarkRenderer::default().to_html("**Hi**");
        assert_eq!(html, "<p><strong>Hi</strong></p>\n");
    }

    #[test]
    fn fenced_code_keeps_language_class() {
        let html = CommonMarkRenderer::default().to_html("```rust\nfn main() {}\n```\n");
        assert!(html.contains("<code class=\"language-rust\">"));
        assert!(html.contains("fn main() {}"));
    }

    #[test]
    fn tables_and_strikethrough_enabled() {
        let renderer = CommonMarkRenderer::default();
        let html = renderer.to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(renderer.to_html("~~gone~~").contains("<del>gone</del>"));
    }

    #[test]
    fn placeholder_text_renders_as_paragraph() {
        let html = CommonMarkRenderer::default().to_html("(No summary)");
        assert_eq!(html, "<p>(No summary)</p>\n");
    }
}
