use crate::attributes::{classify, tokenize};
use crate::config::FenceConfig;
use crate::error::Result;
use crate::fence::{find_fence, FenceMatch};
use crate::markup::{render_fragment, FenceBlock};
use crate::stash::HtmlStash;

/// Result of [`FencedBlockProcessor::transform`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transformed {
    /// The document with every fenced block replaced by its placeholder
    pub text: String,
    /// Language of each replaced block, in document order
    pub languages: Vec<Option<String>>,
}

impl Transformed {
    pub fn block_count(&self) -> usize {
        self.languages.len()
    }
}

/// Replaces fenced code blocks with opaque placeholders.
///
/// Each block is rendered to HTML, handed to an [`HtmlStash`], and the
/// returned placeholder is put on its own line where the block was.
///
/// # Example
///
/// ```
/// use mdbook_fenced_code::{FenceConfig, FencedBlockProcessor, PlaceholderStash};
///
/// let processor = FencedBlockProcessor::new(FenceConfig::default());
/// let mut stash = PlaceholderStash::new();
/// let lines = vec!["```python".to_string(), "print(1)".to_string(), "```".to_string()];
///
/// let output = processor.run(&lines, &mut stash).unwrap();
/// assert_eq!(output, vec!["", PlaceholderStash::placeholder(0).as_str(), ""]);
/// assert_eq!(
///     stash.get(0),
///     Some("<pre><code class=\"language-python\">print(1)</code></pre>")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct FencedBlockProcessor {
    config: FenceConfig,
}

impl FencedBlockProcessor {
    pub fn new(config: FenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FenceConfig {
        &self.config
    }

    /// Transforms a document given as lines and returns the new lines.
    ///
    /// # Errors
    ///
    /// Fails only on an unparseable boolean option with
    /// `fail_on_bool_errors` set. Nothing is returned in that case, but
    /// fragments of earlier blocks may already be in `stash`.
    pub fn run<S: AsRef<str>>(&self, lines: &[S], stash: &mut dyn HtmlStash) -> Result<Vec<String>> {
        let text = lines
            .iter()
            .map(|line| line.as_ref())
            .collect::<Vec<&str>>()
            .join("\n");
        let transformed = self.transform(&text, stash)?;
        Ok(transformed.text.split('\n').map(str::to_string).collect())
    }

    /// Transforms a whole document held in a single string.
    pub fn transform(&self, text: &str, stash: &mut dyn HtmlStash) -> Result<Transformed> {
        let mut output = String::with_capacity(text.len());
        let mut languages = Vec::new();
        let mut pos = 0;

        while let Some(found) = find_fence(text, pos) {
            let block = self.block_from_match(&found)?;
            log::debug!(
                "Replacing fenced block at byte {} (language: {})",
                found.start,
                block.lang.as_deref().unwrap_or("none")
            );

            let placeholder = stash.store(render_fragment(&block, &self.config));
            output.push_str(&text[pos..found.start]);
            output.push('\n');
            output.push_str(&placeholder);
            output.push('\n');

            languages.push(block.lang);
            pos = found.end;
        }
        output.push_str(&text[pos..]);

        Ok(Transformed {
            text: output,
            languages,
        })
    }

    fn block_from_match(&self, found: &FenceMatch) -> Result<FenceBlock> {
        let mut block = FenceBlock {
            body: found.body.clone(),
            ..FenceBlock::default()
        };

        if let Some(raw) = &found.attrs {
            let attrs = classify(
                tokenize(raw),
                &self.config.bool_options,
                self.config.fail_on_bool_errors,
            )?;
            let mut classes = attrs.classes;
            if !classes.is_empty() {
                block.lang = Some(classes.remove(0));
            }
            block.id = attrs.id;
            block.title = attrs.title;
            block.classes = classes;
            block.options = attrs.options;
        } else {
            block.lang = found.lang.clone();
        }

        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FenceError;
    use crate::stash::PlaceholderStash;
    use pretty_assertions::assert_eq;

    /// Records every stored fragment with a recognisable placeholder
    #[derive(Default)]
    struct RecordingStash {
        stored: Vec<String>,
    }

    impl HtmlStash for RecordingStash {
        fn store(&mut self, fragment: String) -> String {
            self.stored.push(fragment);
            format!("@@{}@@", self.stored.len() - 1)
        }
    }

    fn lines(text: &str) -> Vec<String> {
        text.split('\n').map(str::to_string).collect()
    }

    #[test]
    fn test_shorthand_language() {
        let processor = FencedBlockProcessor::default();
        let mut stash = RecordingStash::default();

        let output = processor
            .run(&lines("```python\nprint(1)\n```"), &mut stash)
            .unwrap();

        assert_eq!(output, vec!["", "@@0@@", ""]);
        assert_eq!(
            stash.stored,
            vec!["<pre><code class=\"language-python\">print(1)</code></pre>"]
        );
    }

    #[test]
    fn test_attribute_block_with_attr_list() {
        let processor = FencedBlockProcessor::new(FenceConfig {
            use_attr_list: true,
            ..FenceConfig::default()
        });
        let mut stash = RecordingStash::default();

        processor
            .run(
                &lines("```{.bash id=\"x\" linenums=\"true\"} \necho hi\n```"),
                &mut stash,
            )
            .unwrap();

        assert_eq!(
            stash.stored,
            vec!["<pre id=\"x\"><code class=\"language-bash\" linenums=\"True\">echo hi</code></pre>"]
        );
    }

    #[test]
    fn test_attribute_block_without_attr_list_drops_options() {
        let processor = FencedBlockProcessor::default();
        let mut stash = RecordingStash::default();

        processor
            .run(&lines("```{.bash .wide #x :run.sh data=1}\necho hi\n```"), &mut stash)
            .unwrap();

        assert_eq!(
            stash.stored,
            vec!["<pre id=\"x\" class=\"wide\" pre_title=\"run.sh\"><code class=\"language-bash\">echo hi</code></pre>"]
        );
    }

    #[test]
    fn test_attribute_block_without_classes_has_no_language() {
        let processor = FencedBlockProcessor::default();
        let mut stash = RecordingStash::default();

        let transformed = processor.transform("```{#only}\nx\n```", &mut stash).unwrap();

        assert_eq!(transformed.languages, vec![None::<String>]);
        assert_eq!(stash.stored, vec!["<pre id=\"only\"><code>x</code></pre>"]);
    }

    #[test]
    fn test_body_is_escaped() {
        let processor = FencedBlockProcessor::default();
        let mut stash = RecordingStash::default();

        processor
            .run(&lines("```html\n<b>&\"</b>\n```"), &mut stash)
            .unwrap();

        assert_eq!(
            stash.stored,
            vec!["<pre><code class=\"language-html\">&lt;b&gt;&amp;&quot;&lt;/b&gt;</code></pre>"]
        );
    }

    #[test]
    fn test_unterminated_fence_is_left_alone() {
        let processor = FencedBlockProcessor::default();
        let mut stash = RecordingStash::default();
        let input = lines("text\n```python\nprint(1)\nmore");

        let output = processor.run(&input, &mut stash).unwrap();

        assert_eq!(output, input);
        assert!(stash.stored.is_empty());
    }

    #[test]
    fn test_text_without_fences_is_unchanged() {
        let processor = FencedBlockProcessor::default();
        let mut stash = RecordingStash::default();
        let input = lines("# Title\n\nSome `inline` code.\n\n    indented\n``not a fence``");

        let once = processor.run(&input, &mut stash).unwrap();
        let twice = processor.run(&once, &mut stash).unwrap();

        assert_eq!(once, input);
        assert_eq!(twice, input);
        assert!(stash.stored.is_empty());
    }

    #[test]
    fn test_two_blocks_in_order() {
        let processor = FencedBlockProcessor::default();
        let mut stash = RecordingStash::default();
        let input = lines("a\n```js\n1\n```\nb\n~~~ruby\n2\n~~~\nc");

        let output = processor.run(&input, &mut stash).unwrap();

        assert_eq!(output, vec!["a", "", "@@0@@", "", "b", "", "@@1@@", "", "c"]);
        assert_eq!(
            stash.stored,
            vec![
                "<pre><code class=\"language-js\">1</code></pre>",
                "<pre><code class=\"language-ruby\">2</code></pre>",
            ]
        );
    }

    #[test]
    fn test_placeholders_from_placeholder_stash_are_distinct() {
        let processor = FencedBlockProcessor::default();
        let mut stash = PlaceholderStash::new();

        let transformed = processor
            .transform("```\n1\n```\n```\n2\n```", &mut stash)
            .unwrap();

        assert_eq!(transformed.block_count(), 2);
        assert_eq!(
            transformed.text,
            format!(
                "\n{}\n\n\n{}\n",
                PlaceholderStash::placeholder(0),
                PlaceholderStash::placeholder(1)
            )
        );
    }

    #[test]
    fn test_strict_bool_error_propagates() {
        let processor = FencedBlockProcessor::new(FenceConfig {
            fail_on_bool_errors: true,
            ..FenceConfig::default()
        });
        let mut stash = RecordingStash::default();

        let err = processor
            .run(&lines("```{.py linenums=sometimes}\nx\n```"), &mut stash)
            .unwrap_err();

        assert_eq!(err, FenceError::InvalidBool("sometimes".to_string()));
    }

    #[test]
    fn test_lenient_bool_error_drops_option() {
        let processor = FencedBlockProcessor::new(FenceConfig {
            use_attr_list: true,
            ..FenceConfig::default()
        });
        let mut stash = RecordingStash::default();

        processor
            .run(&lines("```{.py linenums=sometimes k=v}\nx\n```"), &mut stash)
            .unwrap();

        assert_eq!(
            stash.stored,
            vec!["<pre><code class=\"language-py\" k=\"v\">x</code></pre>"]
        );
    }
}
