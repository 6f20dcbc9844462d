use std::fmt;

/// Caller-contract violations detected by the table renderer.
///
/// These are checked before anything is drawn, so a failing report never
/// leaves a half-built document behind.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    NonPositiveColumnWidth { column: usize, width: f32 },
    RowArity { row: usize, expected: usize, found: usize },
    TableClosed,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::NonPositiveColumnWidth { column, width } => {
                write!(f, "column {column} has non-positive width {width}")
            }
            LayoutError::RowArity {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            LayoutError::TableClosed => write!(f, "table already finished"),
        }
    }
}

impl std::error::Error for LayoutError {}

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Layout(LayoutError),
    Asset(String),
    Input(String),
    Pdf(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Layout(e) => write!(f, "layout error: {e}"),
            Error::Asset(msg) => write!(f, "asset error: {msg}"),
            Error::Input(msg) => write!(f, "invalid input: {msg}"),
            Error::Pdf(msg) => write!(f, "PDF error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Layout(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<LayoutError> for Error {
    fn from(e: LayoutError) -> Self {
        Error::Layout(e)
    }
}
