/// Storage for rendered fragments that later stages must not touch.
///
/// `store` hands back a placeholder to substitute into the document. The
/// placeholder must not be matched by the fence matcher or any Markdown rule.
pub trait HtmlStash {
    fn store(&mut self, fragment: String) -> String;
}

const STX: char = '\u{2}';
const ETX: char = '\u{3}';

/// An [`HtmlStash`] issuing numbered `STX wzxhzdk:N ETX` placeholders.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderStash {
    fragments: Vec<String>,
}

impl PlaceholderStash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placeholder(index: usize) -> String {
        format!("{}wzxhzdk:{}{}", STX, index, ETX)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fragments.get(index).map(String::as_str)
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Puts the stored fragments back in place of their placeholders.
    ///
    /// A placeholder that a Markdown renderer wrapped in a paragraph is
    /// replaced together with its `<p>` tags.
    pub fn restore(&self, text: &str) -> String {
        let mut restored = text.to_string();
        for (index, fragment) in self.fragments.iter().enumerate() {
            let placeholder = Self::placeholder(index);
            restored = restored
                .replace(&format!("<p>{}</p>", placeholder), fragment)
                .replace(&placeholder, fragment);
        }
        restored
    }
}

impl HtmlStash for PlaceholderStash {
    fn store(&mut self, fragment: String) -> String {
        let placeholder = Self::placeholder(self.fragments.len());
        self.fragments.push(fragment);
        placeholder
    }
}
