use std::path::{Path, PathBuf};

/// Errors produced while loading, remapping, or rewriting the opcode catalog.
#[derive(thiserror::Error, Debug)]
pub enum RemapError {
    #[error("{}: invalid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{}: unexpected document shape: {source}", path.display())]
    Shape {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("diff entry {index}: `{field}` must hold at least one element")]
    EmptyDiffField { index: usize, field: &'static str },

    #[error("diff entry {index}: bad integer literal {literal:?}")]
    BadLiteral {
        index: usize,
        literal: String,
        source: std::num::ParseIntError,
    },

    #[error("category {category:?}: expected an array of opcode records")]
    NotAnArray { category: String },

    #[error("category {category:?}, record {index}: expected an integer `opcode` field")]
    MissingOpcode { category: String, index: usize },

    #[error("category {category:?}, record {index}: expected a string `name` field")]
    MissingName { category: String, index: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RemapError {
    /// Splits a serde_json failure between the parse and shape variants:
    /// syntax and eof categories mean the document is not JSON at all, a data
    /// category means the JSON lacks the expected structure.
    pub fn from_json(path: &Path, source: serde_json::Error) -> Self {
        let path = path.to_owned();
        match source.classify() {
            serde_json::error::Category::Data => Self::Shape { path, source },
            _ => Self::Parse { path, source },
        }
    }
}
