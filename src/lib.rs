//! mdbook-fenced-code library
//!
//! This library renders fenced code blocks with attribute lists
//! (```` ```{.python #id :file.py linenums="1"} ````) to escaped HTML
//! fragments and keeps them away from later Markdown processing behind
//! opaque placeholders. The primary interface is the mdbook-fenced-code
//! binary, but the library can be used directly by any Markdown pipeline.
//!
//! ## Public API
//!
//! - [`FencedBlockProcessor`] - The replacement loop over a whole document
//! - [`FencedCodePreprocessor`] - mdBook `Preprocessor` implementation
//! - [`render_markdown`] - Markdown to HTML with fenced blocks handled here
//! - [`HtmlStash`] / [`PlaceholderStash`] - Storage for rendered fragments
//!
//! Building blocks:
//! - [`tokenize`] and [`classify`] - Attribute list parsing
//! - [`find_fence`] - Locating the next fenced block
//! - [`render_fragment`] and [`escape_html`] - HTML output
//! - [`parse_bool_value`] - Tri-state boolean parsing

mod attributes;
mod boolean;
mod config;
mod error;
mod fence;
mod markup;
mod preprocessor;
mod processor;
mod render;
mod reporting;
mod stash;

pub use attributes::{classify, tokenize, AttributeToken, FenceAttributes, OptionValue};
pub use boolean::parse_bool_value;
pub use config::{FenceConfig, CONFIG_SECTION};
pub use error::FenceError;
pub use fence::{find_fence, FenceMatch};
pub use markup::{escape_html, render_fragment, FenceBlock};
pub use preprocessor::FencedCodePreprocessor;
pub use processor::{FencedBlockProcessor, Transformed};
pub use render::render_markdown;
pub use stash::{HtmlStash, PlaceholderStash};
