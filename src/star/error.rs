use thiserror::Error;

/// Errors raised while building or parsing STAR documents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unterminated quoted string starting at line {line}")]
    UnterminatedQuote { line: usize },

    #[error("unterminated semicolon text field starting at line {line}")]
    UnterminatedTextField { line: usize },

    #[error("unexpected {found} at line {line}: {context}")]
    Unexpected {
        line: usize,
        found: String,
        context: &'static str,
    },

    #[error("no data block (data_<name>) found")]
    MissingDataBlock,

    #[error("tag '{tag}' is not in category '{category}' at line {line}")]
    ForeignTag {
        line: usize,
        category: String,
        tag: String,
    },

    #[error(
        "loop '{category}' ending at line {line} has {values} values, which is not a multiple of its {tags} tags"
    )]
    LoopValueCount {
        line: usize,
        category: String,
        tags: usize,
        values: usize,
    },

    #[error("row for loop '{category}' has {found} values but the loop has {expected} tags")]
    RowLength {
        category: String,
        expected: usize,
        found: usize,
    },

    #[error("loop '{category}' already has a tag named '{tag}'")]
    DuplicateTag { category: String, tag: String },

    #[error("cannot add tag '{tag}' to loop '{category}' after rows were added")]
    TagAfterRows { category: String, tag: String },
}
