//! Attribute lists of the form `{.python #main :app.py linenums="1" data=x}`.
//!
//! Parsing happens in two steps: [`tokenize`] splits the raw string into
//! ordered key/value tokens and [`classify`] folds them into
//! [`FenceAttributes`].

use crate::boolean::parse_bool_value;
use crate::error::{FenceError, Result};
use indexmap::IndexMap;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Key of a class token (`.name`).
pub const CLASS_KEY: &str = ".";
/// Key of an id token (`#name`).
pub const ID_KEY: &str = "id";
/// Key of a title token (`:name`).
pub const FILE_NAME_KEY: &str = "file_name";

/// One `(key, value)` pair of an attribute list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeToken {
    pub key: String,
    pub value: String,
}

impl AttributeToken {
    fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

type Handler = fn(&str) -> AttributeToken;

/// A scanner rule. Rules without a handler consume input silently.
struct Rule {
    pattern: Regex,
    handler: Option<Handler>,
}

fn rule(pattern: &str, handler: Option<Handler>) -> Rule {
    Rule {
        pattern: Regex::new(&format!("^(?:{pattern})")).expect("invalid tokenizer rule"),
        handler,
    }
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        rule(r#"[^ =]+=".*?""#, Some(handle_double_quote)),
        rule(r"[^ =]+='.*?'", Some(handle_single_quote)),
        rule(r"[^ =]+=[^ =]+", Some(handle_key_value)),
        rule(r"[^ =]+", Some(handle_word)),
        rule(r" ", None),
    ]
});

fn split_pair(token: &str) -> (&str, &str) {
    token.split_once('=').unwrap_or((token, ""))
}

fn handle_double_quote(token: &str) -> AttributeToken {
    let (key, value) = split_pair(token);
    AttributeToken::new(key, value.trim_matches('"'))
}

fn handle_single_quote(token: &str) -> AttributeToken {
    let (key, value) = split_pair(token);
    AttributeToken::new(key, value.trim_matches('\''))
}

fn handle_key_value(token: &str) -> AttributeToken {
    let (key, value) = split_pair(token);
    AttributeToken::new(key, value)
}

fn handle_word(token: &str) -> AttributeToken {
    if let Some(class) = token.strip_prefix('.') {
        AttributeToken::new(CLASS_KEY, class)
    } else if let Some(id) = token.strip_prefix('#') {
        AttributeToken::new(ID_KEY, id)
    } else if let Some(file_name) = token.strip_prefix(':') {
        AttributeToken::new(FILE_NAME_KEY, file_name)
    } else {
        AttributeToken::new(token, token)
    }
}

/// Splits an attribute string into tokens.
///
/// At each position the first rule that matches wins. Scanning stops at
/// the first position no rule matches; anything after it is ignored.
pub fn tokenize(input: &str) -> Vec<AttributeToken> {
    let mut tokens = Vec::new();
    let mut rest = input;

    'scan: while !rest.is_empty() {
        for rule in RULES.iter() {
            let Some(m) = rule.pattern.find(rest) else {
                continue;
            };
            if m.is_empty() {
                break 'scan;
            }
            if let Some(handler) = rule.handler {
                tokens.push(handler(m.as_str()));
            }
            rest = &rest[m.end()..];
            continue 'scan;
        }
        log::debug!("Stopped tokenizing attribute list at {:?}", rest);
        break;
    }

    tokens
}

/// Value of a non-class, non-id option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Text(String),
    /// Value of a recognised boolean option. `None` means the value was
    /// present but explicitly undetermined (`none`).
    Flag(Option<bool>),
}

impl OptionValue {
    pub fn is_true(&self) -> bool {
        matches!(self, OptionValue::Flag(Some(true)))
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Text(text) => f.write_str(text),
            OptionValue::Flag(Some(true)) => f.write_str("True"),
            OptionValue::Flag(Some(false)) => f.write_str("False"),
            OptionValue::Flag(None) => f.write_str("None"),
        }
    }
}

/// Structured form of an attribute list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FenceAttributes {
    pub id: Option<String>,
    pub title: Option<String>,
    pub classes: Vec<String>,
    pub options: IndexMap<String, OptionValue>,
}

/// Folds tokens into [`FenceAttributes`].
///
/// Keys listed in `bool_options` are parsed as tri-state booleans. An
/// unparseable boolean is dropped, or reported as an error when `strict`.
pub fn classify(
    tokens: impl IntoIterator<Item = AttributeToken>,
    bool_options: &[String],
    strict: bool,
) -> Result<FenceAttributes> {
    let mut attrs = FenceAttributes::default();

    for AttributeToken { key, value } in tokens {
        match key.as_str() {
            ID_KEY => attrs.id = Some(value),
            FILE_NAME_KEY => attrs.title = Some(value),
            CLASS_KEY => attrs.classes.push(value),
            _ if bool_options.contains(&key) => match parse_bool_value(&value, true, true) {
                Ok(flag) => {
                    attrs.options.insert(key, OptionValue::Flag(flag));
                }
                Err(e) if strict => return Err(e),
                Err(FenceError::InvalidBool(value)) => {
                    log::warn!("Ignoring option '{}': not a boolean: '{}'", key, value);
                }
            },
            _ => {
                attrs.options.insert(key, OptionValue::Text(value));
            }
        }
    }

    Ok(attrs)
}
