//! Set of known target-script words.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use cyrtype_core::error::{CyrtypeError, Result};

/// Known words in lowercase canonical form. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<Arc<str>>,
}

impl Dictionary {
    /// Load a UTF-8 word list with one word per line.
    ///
    /// Lines are trimmed and blank lines skipped. A missing file is reported
    /// as [`CyrtypeError::DictionaryNotFound`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CyrtypeError::DictionaryNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return Err(CyrtypeError::Dictionary(format!(
                    "{} is not valid UTF-8",
                    path.display()
                )))
            }
            Err(e) => return Err(e.into()),
        };

        let dictionary = Self::from_words(content.lines());
        tracing::info!(
            path = %path.display(),
            words = dictionary.len(),
            "Dictionary loaded"
        );
        Ok(dictionary)
    }

    /// Build a dictionary from an iterator of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .map(Arc::<str>::from)
            .collect();
        Self { words }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        if self.words.contains(word) {
            return true;
        }
        let lower = word.to_lowercase();
        lower != word && self.words.contains(lower.as_str())
    }

    /// All words, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<str>> {
        self.words.iter()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_words_normalizes() {
        let dictionary = Dictionary::from_words(["Привет", "  мир ", "", "мир"]);
        assert_eq!(dictionary.len(), 2);
        assert!(dictionary.contains("привет"));
        assert!(dictionary.contains("ПРИВЕТ"));
        assert!(dictionary.contains("мир"));
        assert!(!dictionary.contains("пока"));
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all("привет\n\n   \nмир\r\nшапка\n".as_bytes())
            .unwrap();

        let dictionary = Dictionary::load(file.path()).unwrap();
        assert_eq!(dictionary.len(), 3);
        assert!(dictionary.contains("шапка"));
        assert!(dictionary.contains("мир"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Dictionary::load(Path::new("/nonexistent/russian_words.txt")).unwrap_err();
        match err {
            CyrtypeError::DictionaryNotFound { path } => {
                assert_eq!(path, Path::new("/nonexistent/russian_words.txt"));
            }
            other => panic!("Expected DictionaryNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, b'\n']).unwrap();
        let err = Dictionary::load(file.path()).unwrap_err();
        assert!(matches!(err, CyrtypeError::Dictionary(_)));
    }

    #[test]
    fn test_empty_dictionary() {
        let dictionary = Dictionary::default();
        assert!(dictionary.is_empty());
        assert!(!dictionary.contains(""));
    }
}
