use pulldown_cmark::{html, Event, Options, Parser};

use crate::application::MarkdownRenderer;

/// Renders CommonMark (plus tables, strikethrough and task lists) to HTML.
///
/// Raw HTML embedded in the markdown is emitted as escaped text, since bot
/// output is untrusted.
pub struct PulldownMarkdownRenderer {
    options: Options,
}

impl PulldownMarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        Self { options }
    }
}

impl Default for PulldownMarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for PulldownMarkdownRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options).map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });

        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }
}
