//! Common test utilities for integration tests
//!
//! This module contains shared test fixtures and helper functions used across
//! integration tests. These utilities are not compiled into the library.

use anyhow::{Context, Result};
use mdbook::book::{Book, BookItem, Chapter};
use mdbook::preprocess::{CmdPreprocessor, Preprocessor};
use mdbook::MDBook;
use mdbook_fenced_code::FencedCodePreprocessor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test fixture with automatic cleanup
///
/// Creates a temporary copy of a test fixture book, allowing tests to run
/// in parallel without interfering with each other.
pub struct TestFixture {
    _book_dir: TempDir,
    book_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture from the default book directory
    pub fn new() -> Result<Self> {
        Self::new_from("tests/fixtures/book")
    }

    /// Create a new test fixture from a specific source directory
    pub fn new_from(source: impl AsRef<Path>) -> Result<Self> {
        let book_dir = TempDir::new()?;

        // Copy fixture to temp location
        copy_dir_all(source.as_ref(), book_dir.path())?;

        Ok(Self {
            book_path: book_dir.path().to_path_buf(),
            _book_dir: book_dir,
        })
    }

    /// Get the path to the book directory
    pub fn book_path(&self) -> &Path {
        &self.book_path
    }
}

/// Helper to run the preprocessor on a test book
///
/// Wraps an MDBook instance and feeds it through the same JSON round trip
/// mdBook uses when invoking a preprocessor command.
pub struct PreprocessorTest {
    book: MDBook,
}

impl PreprocessorTest {
    /// Create a preprocessor test from a fixture
    pub fn from_fixture(fixture: &TestFixture) -> Result<Self> {
        let book = MDBook::load(fixture.book_path())?;
        Ok(Self { book })
    }

    /// The book as loaded, before preprocessing
    pub fn original(&self) -> &Book {
        &self.book.book
    }

    /// Run the preprocessor on the test book
    pub fn run(&self) -> Result<Book> {
        // Create JSON input like mdbook would send
        let input_json = serde_json::json!([
            {
                "root": self.book.root,
                "config": self.book.config,
                "renderer": "html",
                "mdbook_version": mdbook::MDBOOK_VERSION,
            },
            self.book.book
        ]);

        let input_str = serde_json::to_string(&input_json)?;
        let (ctx, book) = CmdPreprocessor::parse_input(input_str.as_bytes())?;

        FencedCodePreprocessor::new().run(&ctx, book)
    }
}

/// Find a chapter by its source path relative to `src`
pub fn chapter<'a>(book: &'a Book, path: &str) -> Result<&'a Chapter> {
    book.iter()
        .find_map(|item| match item {
            BookItem::Chapter(ch) if ch.path.as_deref() == Some(Path::new(path)) => Some(ch),
            _ => None,
        })
        .with_context(|| format!("chapter {} not found", path))
}

/// Recursively copy all files and directories from src to dst
fn copy_dir_all(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    std::fs::create_dir_all(&dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        if ty.is_dir() {
            copy_dir_all(entry.path(), dst.as_ref().join(entry.file_name()))?;
        } else {
            std::fs::copy(entry.path(), dst.as_ref().join(entry.file_name()))?;
        }
    }
    Ok(())
}
