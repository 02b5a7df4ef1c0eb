use crate::attributes::OptionValue;
use crate::config::FenceConfig;
use indexmap::IndexMap;

/// Option that requests an external highlighter. It suppresses the
/// key/value attributes and is never emitted itself.
pub const HIGHLIGHTER_KEY: &str = "use_pygments";

/// Everything the emitter needs to know about one fenced block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FenceBlock {
    pub id: Option<String>,
    pub lang: Option<String>,
    /// Classes other than the language
    pub classes: Vec<String>,
    pub title: Option<String>,
    pub options: IndexMap<String, OptionValue>,
    /// Raw, unescaped block contents
    pub body: String,
}

/// Escapes the characters that would otherwise be read as markup.
///
/// `&` goes first so the entities produced for the others are left intact.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders a block as `<pre><code>...</code></pre>`.
pub fn render_fragment(block: &FenceBlock, config: &FenceConfig) -> String {
    let mut pre_attrs = String::new();
    if let Some(id) = block.id.as_deref().filter(|id| !id.is_empty()) {
        pre_attrs.push_str(&format!(" id=\"{}\"", id));
    }
    if !block.classes.is_empty() {
        pre_attrs.push_str(&format!(" class=\"{}\"", block.classes.join(" ")));
    }
    if let Some(title) = block.title.as_deref().filter(|t| !t.is_empty()) {
        pre_attrs.push_str(&format!(" {}=\"{}\"", config.pre_title_prefix, title));
    }

    let mut code_attrs = String::new();
    if let Some(lang) = block.lang.as_deref().filter(|l| !l.is_empty()) {
        code_attrs.push_str(&format!(" class=\"{}{}\"", config.lang_prefix, lang));
    }
    if config.use_attr_list && !wants_highlighter(&block.options) {
        let pairs = block
            .options
            .iter()
            .filter(|(key, _)| key.as_str() != HIGHLIGHTER_KEY)
            .map(|(key, value)| format!("{}=\"{}\"", key, value))
            .collect::<Vec<_>>();
        if !pairs.is_empty() {
            code_attrs.push(' ');
            code_attrs.push_str(&pairs.join(" "));
        }
    }

    format!(
        "<pre{}><code{}>{}</code></pre>",
        pre_attrs,
        code_attrs,
        escape_html(&block.body)
    )
}

fn wants_highlighter(options: &IndexMap<String, OptionValue>) -> bool {
    options.get(HIGHLIGHTER_KEY).is_some_and(OptionValue::is_true)
}
