use std::collections::HashMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Ordered set of label symbols. The position of a symbol is its class index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Vocabulary {
    pub fn new(symbols: impl IntoIterator<Item = char>) -> Result<Self, DomainError> {
        let symbols: Vec<char> = symbols.into_iter().collect();
        let mut index = HashMap::with_capacity(symbols.len());
        for (position, symbol) in symbols.iter().enumerate() {
            if index.insert(*symbol, position).is_some() {
                return Err(DomainError::invalid_argument(format!(
                    "vocabulary symbol {symbol:?} appears more than once"
                )));
            }
        }
        Ok(Self { symbols, index })
    }

    pub fn from_chars(symbols: &str) -> Result<Self, DomainError> {
        Self::new(symbols.chars())
    }

    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.index.get(&symbol).copied()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Symbols(Vec<char>),
    Indices(Vec<i64>),
}

impl Label {
    pub fn symbols(text: &str) -> Self {
        Self::Symbols(text.chars().collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Label::Symbols(symbols) => symbols.len(),
            Label::Indices(indices) => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Label::Symbols(_) => "symbols",
            Label::Indices(_) => "indices",
        }
    }
}

/// A `(features, label)` pair; features are laid out as `(time_steps, channels)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: Array2<f32>,
    pub label: Label,
}

impl Sample {
    pub fn new(features: Array2<f32>, label: Label) -> Self {
        Self { features, label }
    }

    pub fn time_steps(&self) -> usize {
        self.features.nrows()
    }

    pub fn channels(&self) -> usize {
        self.features.ncols()
    }
}

#[derive(Debug, Clone)]
pub struct ArchiveDownloadRequest {
    pub url: String,
    pub chunk_size: usize,
}

#[derive(Debug, Clone)]
pub struct ArchiveDownload {
    pub bytes: Vec<u8>,
    pub declared_length: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchOutcome {
    AlreadyPresent,
    Fetched { archive_bytes: usize },
}

#[cfg(test)]
mod tests {
    use super::{Label, Vocabulary};

    #[test]
    fn vocabulary_indexes_by_position() {
        let vocab = Vocabulary::from_chars("abc").expect("vocab");
        assert_eq!(vocab.index_of('a'), Some(0));
        assert_eq!(vocab.index_of('c'), Some(2));
        assert_eq!(vocab.index_of('x'), None);
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn vocabulary_rejects_duplicate_symbols() {
        let err = Vocabulary::from_chars("abca").expect_err("duplicate must fail");
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn label_reports_kind_and_length() {
        let label = Label::symbols("hey");
        assert_eq!(label.kind(), "symbols");
        assert_eq!(label.len(), 3);
        assert!(Label::Indices(Vec::new()).is_empty());
    }
}
