use crate::config::FenceConfig;
use crate::processor::FencedBlockProcessor;
use crate::reporting::{self, BlockStats};
use crate::stash::PlaceholderStash;
use anyhow::Result;
use mdbook::book::{Book, BookItem};
use mdbook::preprocess::{Preprocessor, PreprocessorContext};

/// An mdBook preprocessor that renders fenced code blocks to HTML.
///
/// # Overview
///
/// Each fenced block in a chapter is replaced by a `<pre><code>` fragment
/// carrying the id, classes, title and options from the block's attribute
/// list. The renderer receives the fragment as a raw HTML block and leaves
/// its contents alone.
///
/// # Configuration
///
/// Options are read from `[preprocessor.fenced-code]` in `book.toml`.
///
/// # Example
///
/// ```toml
/// [preprocessor.fenced-code]
/// lang_prefix = "language-"
/// pre_title_prefix = "data-title"
/// use_attr_list = true
/// ```
pub struct FencedCodePreprocessor;

impl FencedCodePreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FencedCodePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor for FencedCodePreprocessor {
    fn name(&self) -> &str {
        "fenced-code"
    }

    fn run(&self, ctx: &PreprocessorContext, mut book: Book) -> Result<Book> {
        let config = FenceConfig::from_preprocessor_context(ctx)?;
        let processor = FencedBlockProcessor::new(config);

        let mut stats = BlockStats::default();
        let mut failures = Vec::new();

        book.for_each_mut(|item| {
            if let BookItem::Chapter(chapter) = item {
                log::info!("Processing chapter: {}", chapter.name);

                match process_chapter(&processor, &chapter.content, &mut stats) {
                    Ok(content) => chapter.content = content,
                    Err(e) => {
                        let location = chapter
                            .path
                            .as_ref()
                            .map(|p| format!("{} ({})", chapter.name, p.display()))
                            .unwrap_or_else(|| chapter.name.clone());
                        log::error!("Failed to process {}: {:#}", location, e);
                        failures.push((location, format!("{:#}", e)));
                    }
                }
            }
        });

        if !failures.is_empty() {
            reporting::report_failed_chapters(&failures);
            let details = failures
                .iter()
                .map(|(chapter, error)| format!("{}: {}", chapter, error))
                .collect::<Vec<_>>()
                .join("; ");
            anyhow::bail!("Failed to process fenced code blocks in {}", details);
        }

        reporting::print_statistics(&stats);
        Ok(book)
    }

    fn supports_renderer(&self, renderer: &str) -> bool {
        renderer != "not-supported"
    }
}

/// Replace every fenced block in a chapter with its rendered fragment
fn process_chapter(
    processor: &FencedBlockProcessor,
    content: &str,
    stats: &mut BlockStats,
) -> Result<String> {
    let mut stash = PlaceholderStash::new();
    let transformed = processor.transform(content, &mut stash)?;

    if stash.is_empty() {
        return Ok(content.to_string());
    }

    log::debug!("  Replaced {} fenced block(s)", stash.len());
    stats.record(&transformed.languages);

    Ok(stash.restore(&transformed.text))
}
