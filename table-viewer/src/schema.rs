//! Types shared between the gateway, the renderer and the handlers

use serde::Deserialize;

/// Query parameters accepted by the page endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableQuery {
    /// Requested table or view name
    #[serde(rename = "tabla")]
    pub table: Option<String>,
}

/// A single fetched row, one nullable text value per column
pub type Row = Vec<Option<String>>;

/// Result of one `SELECT *`
///
/// Values are positional: `rows[i][j]` belongs to `columns[j]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    /// Column names in the order the database reported them
    ///
    /// Names are read from the first fetched row, so an empty table yields
    /// no columns even though PostgreSQL knows its fields.
    pub columns: Vec<String>,

    /// Fetched rows, never absent; an empty table is an empty vector
    pub rows: Vec<Row>,
}

impl QueryResult {
    /// Build a result, checking every row has one value per column
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Option<Self> {
        if rows.iter().all(|row| row.len() == columns.len()) {
            Some(Self { columns, rows })
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome classification driving the status banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Warning,
    Error,
}

impl StatusKind {
    /// CSS class applied to the banner
    pub fn css_class(self) -> &'static str {
        match self {
            StatusKind::Success => "success",
            StatusKind::Warning => "warning",
            StatusKind::Error => "error",
        }
    }
}

/// Connection status shown to the user
///
/// The message is raw text; it is escaped when rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub kind: StatusKind,
    pub message: String,
}

impl ConnectionStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    /// Append an error to the current message and mark the status as failed
    pub fn append_error(&mut self, message: &str) {
        if !self.message.is_empty() {
            self.message.push(' ');
        }
        self.message.push_str(message);
        self.kind = StatusKind::Error;
    }
}
