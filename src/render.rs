use crate::config::FenceConfig;
use crate::processor::FencedBlockProcessor;
use crate::stash::PlaceholderStash;
use anyhow::Result;
use pulldown_cmark::{html, Options, Parser};

/// Renders a Markdown document to HTML with fenced blocks handled by
/// [`FencedBlockProcessor`] instead of the Markdown parser.
///
/// Blocks are swapped for placeholders before parsing, so pulldown-cmark
/// only ever sees them as plain paragraphs. The stored fragments are put
/// back into the finished HTML.
pub fn render_markdown(input: &str, config: &FenceConfig) -> Result<String> {
    let processor = FencedBlockProcessor::new(config.clone());
    let mut stash = PlaceholderStash::new();
    let transformed = processor.transform(input, &mut stash)?;

    log::debug!("Rendering document with {} fenced block(s)", stash.len());

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(&transformed.text, options);
    let mut output = String::with_capacity(transformed.text.len() * 3 / 2);
    html::push_html(&mut output, parser);

    Ok(stash.restore(&output))
}
