/// Converts bot output (markdown) into display markup.
///
/// Pure: identical input yields identical output. Escaping of the produced
/// markup is the renderer's concern, not the caller's.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}
