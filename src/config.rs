use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the preprocessor table in `book.toml`.
pub const CONFIG_SECTION: &str = "preprocessor.fenced-code";

/// Configuration for the fenced code preprocessor.
///
/// This structure is deserialized from the `[preprocessor.fenced-code]` section
/// of `book.toml`, or from a standalone TOML file for the `render` command.
///
/// # Example
///
/// ```toml
/// [preprocessor.fenced-code]
/// lang_prefix = "lang-"
/// pre_title_prefix = "data-title"
/// use_attr_list = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FenceConfig {
    /// Prefix of the language class on the `code` element
    pub lang_prefix: String,

    /// Attribute name carrying the `:file_name` title on the `pre` element
    pub pre_title_prefix: String,

    /// Emit remaining key/value options as attributes of the `code` element
    pub use_attr_list: bool,

    /// Fail on unparseable boolean options instead of dropping them
    pub fail_on_bool_errors: bool,

    /// Option keys whose values are parsed as booleans
    pub bool_options: Vec<String>,
}

impl Default for FenceConfig {
    fn default() -> Self {
        Self {
            lang_prefix: "language-".to_string(),
            pre_title_prefix: "pre_title".to_string(),
            use_attr_list: false,
            fail_on_bool_errors: false,
            bool_options: default_bool_options(),
        }
    }
}

fn default_bool_options() -> Vec<String> {
    ["linenums", "guess_lang", "noclasses", "use_pygments"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl FenceConfig {
    /// Validate that the configured names can be written into HTML verbatim
    pub fn validate(&self) -> Result<()> {
        if !is_attribute_name(&self.pre_title_prefix) {
            anyhow::bail!(
                "pre_title_prefix is not a valid attribute name: '{}'",
                self.pre_title_prefix
            );
        }

        let forbidden = ['"', '<', '>'];
        if let Some(ch) = self
            .lang_prefix
            .chars()
            .find(|c| forbidden.contains(c) || c.is_whitespace())
        {
            anyhow::bail!(
                "lang_prefix contains invalid character '{}': {}",
                ch.escape_default(),
                self.lang_prefix
            );
        }

        Ok(())
    }

    /// Parse configuration from mdbook PreprocessorContext
    pub fn from_preprocessor_context(
        ctx: &mdbook::preprocess::PreprocessorContext,
    ) -> Result<Self> {
        let config: FenceConfig = if let Some(config_value) = ctx.config.get(CONFIG_SECTION) {
            config_value
                .clone()
                .try_into()
                .with_context(|| format!("Invalid [{}] table in book.toml", CONFIG_SECTION))?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file holding the fields at top level
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: FenceConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }
}

fn is_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && !"\"'<>/=".contains(c))
}
