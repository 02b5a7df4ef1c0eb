use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Opening line of a fenced block: the fence, then either `{attrs}` or an
/// optional `(.)lang` with an optional `hl_lines` spec, then a newline.
static OPENING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?mx)
        ^(?P<fence>~{3,}|`{3,})[\ ]*
        (?:
            \{(?P<attrs>[^}\n]*)\}
          |
            (?:\.?(?P<lang>[\w\#.+-]*))?[\ ]*
            (?:hl_lines=(?:"(?P<hl_dq>[^"\n]*)"|'(?P<hl_sq>[^'\n]*)'))?
        )
        [\ ]*\n
        "#,
    )
    .expect("invalid opening fence pattern")
});

/// A fenced code block located in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceMatch {
    /// Byte offset of the opening fence.
    pub start: usize,
    /// Byte offset just past the closing fence line, before its newline.
    pub end: usize,
    /// The opening fence run, e.g. "```" or "~~~~".
    pub fence: String,
    /// Contents of a `{...}` attribute list.
    pub attrs: Option<String>,
    /// Language given in the `lang` or `.lang` shorthand form.
    pub lang: Option<String>,
    /// Quoted value of an `hl_lines=` spec in the shorthand form.
    pub hl_lines: Option<String>,
    /// Block contents, without the newline preceding the closing fence.
    pub body: String,
}

impl FenceMatch {
    fn from_opening(caps: &Captures<'_>, start: usize, end: usize, body: &str) -> Self {
        let non_empty = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            start,
            end,
            fence: caps["fence"].to_string(),
            attrs: non_empty("attrs"),
            lang: non_empty("lang"),
            hl_lines: caps
                .name("hl_dq")
                .or_else(|| caps.name("hl_sq"))
                .map(|m| m.as_str().to_string()),
            body: body.to_string(),
        }
    }
}

/// Finds the first fenced block starting at or after byte offset `from`.
///
/// An opening fence without a matching closing line is skipped and the
/// search continues with the following line. Returns `None` when the rest
/// of `text` holds no complete block.
pub fn find_fence(text: &str, from: usize) -> Option<FenceMatch> {
    let mut pos = from;

    while let Some(caps) = OPENING_FENCE.captures_at(text, pos) {
        let opening = caps.get(0)?;
        let fence = &caps["fence"];

        if let Some((closing_start, closing_end)) = find_closing(text, opening.end(), fence) {
            let body = if closing_start > opening.end() {
                // drop the newline ending the last body line
                &text[opening.end()..closing_start - 1]
            } else {
                ""
            };
            return Some(FenceMatch::from_opening(
                &caps,
                opening.start(),
                closing_end,
                body,
            ));
        }

        log::debug!(
            "Unterminated fence {:?} at byte {}, skipping",
            fence,
            opening.start()
        );
        pos = opening.end();
    }

    None
}

/// Finds the first line at or after `body_start` that closes `fence`.
///
/// A closing line starts with the fence character repeated at least as many
/// times as the opening run, followed only by whitespace. Returns the byte
/// range of the line without its newline.
fn find_closing(text: &str, body_start: usize, fence: &str) -> Option<(usize, usize)> {
    let fence_char = fence.chars().next()?;
    let min_len = fence.len();
    let mut line_start = body_start;

    while line_start <= text.len() {
        let line_end = text[line_start..]
            .find('\n')
            .map_or(text.len(), |i| line_start + i);
        let line = &text[line_start..line_end];

        let run = line.len() - line.trim_start_matches(fence_char).len();
        if run >= min_len && line[run..].trim().is_empty() {
            return Some((line_start, line_end));
        }

        if line_end == text.len() {
            break;
        }
        line_start = line_end + 1;
    }

    None
}
