//! Converts the text of a source document into HTML lines. The pipeline only
//! depends on the [`Converter`] trait; [`MarkdownConverter`] is the converter
//! used by the command line.

use pulldown_cmark::{html, Options, Parser};

/// Turns the lines of one source document into lines of HTML. Conversion
/// can't fail: any text is valid markup.
pub trait Converter {
    fn convert(&self, lines: &[String]) -> Vec<String>;
}

/// Converts markdown with [`pulldown_cmark`]. Smart punctuation stays off so
/// the straight quotes of tag declarations (`@@NAME:"value"`) reach the tag
/// resolver unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkdownConverter;

impl MarkdownConverter {
    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        options
    }
}

impl Converter for MarkdownConverter {
    fn convert(&self, lines: &[String]) -> Vec<String> {
        let markdown = lines.join("\n");
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, Parser::new_ext(&markdown, Self::options()));
        out.lines().map(str::to_owned).collect()
    }
}
