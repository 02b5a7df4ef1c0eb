use chrono::Local;
use std::collections::BTreeMap;

/// Label used for blocks without a language.
const PLAIN: &str = "plain";

/// Formats a message with mdBook-style timestamp and prefix.
fn format_line(level: &str, message: &str) -> String {
    format!(
        "{} [{}] (mdbook_fenced_code): {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        level,
        message
    )
}

/// Per-language count of replaced blocks.
#[derive(Debug, Default)]
pub struct BlockStats {
    counts: BTreeMap<String, usize>,
}

impl BlockStats {
    pub fn record<'a>(&mut self, languages: impl IntoIterator<Item = &'a Option<String>>) {
        for lang in languages {
            let key = lang.as_deref().unwrap_or(PLAIN).to_string();
            *self.counts.entry(key).or_insert(0) += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Format: "bash: 1, plain: 2, python: 3"
    pub fn summary(&self) -> String {
        self.counts
            .iter()
            .map(|(lang, count)| format!("{}: {}", lang, count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Prints the block statistics to stderr in mdBook log format.
pub fn print_statistics(stats: &BlockStats) {
    if stats.total() > 0 {
        eprintln!(
            "{}",
            format_line(
                "INFO",
                &format!(
                    "Rendered {} fenced code block(s) ({})",
                    stats.total(),
                    stats.summary()
                )
            )
        );
    } else {
        eprintln!("{}", format_line("INFO", "No fenced code blocks found"));
    }
}

/// Reports chapters that failed to process, one line per error line.
pub fn report_failed_chapters(failures: &[(String, String)]) {
    eprintln!(
        "{}",
        format_line("ERROR", "Failed to process fenced code in the following chapters:")
    );
    for (chapter, error) in failures {
        eprintln!("{}", format_line("ERROR", &format!("  {}", chapter)));
        for line in error.lines() {
            eprintln!("{}", format_line("ERROR", &format!("    {}", line)));
        }
    }
}
