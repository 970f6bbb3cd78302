//! Table registry and request resolution
//!
//! The registry is the fixed whitelist of tables and views the viewer may
//! query. Every request resolves to exactly one of its entries or is
//! rejected before the database is touched.

use crate::{Error, Result};
use std::fmt;

/// Prefix marking an entry as a view rather than a base table
const VIEW_PREFIX: &str = "v_";

/// A table or view name taken from the registry
///
/// Values of this type can only be obtained through [`TableRegistry`], so
/// holding one means the name has already been validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable label for navigation and headings
    pub fn display_name(&self) -> String {
        display_name(&self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Ordered, non-empty whitelist of queryable names
#[derive(Debug, Clone)]
pub struct TableRegistry {
    tables: Vec<TableName>,
}

impl TableRegistry {
    /// Create a registry from the given names, keeping their order
    ///
    /// The first entry is the default selection. Duplicates are dropped.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tables: Vec<TableName> = Vec::new();
        for name in names {
            let name = TableName(name.into());
            if !tables.contains(&name) {
                tables.push(name);
            }
        }

        if tables.is_empty() {
            return Err(Error::Configuration(
                "table registry must contain at least one entry".to_string(),
            ));
        }

        Ok(Self { tables })
    }

    /// The default selection used when a request names no table
    pub fn default_table(&self) -> &TableName {
        &self.tables[0]
    }

    pub fn tables(&self) -> &[TableName] {
        &self.tables
    }

    /// Resolve the table a request asks for
    ///
    /// `None` selects the first entry. A supplied name must match an entry
    /// exactly (case-sensitive, no trimming); anything else is
    /// [`Error::InvalidTable`].
    pub fn resolve(&self, requested: Option<&str>) -> Result<&TableName> {
        match requested {
            None => Ok(self.default_table()),
            Some(name) => self
                .tables
                .iter()
                .find(|table| table.as_str() == name)
                .ok_or_else(|| Error::InvalidTable(name.to_string())),
        }
    }
}

/// Turn a table or view identifier into a display label
///
/// Strips the view prefix, then applies [`column_label`]:
/// `v_empleados_completos` becomes `Empleados Completos`.
pub fn display_name(identifier: &str) -> String {
    let stripped = identifier
        .strip_prefix(VIEW_PREFIX)
        .filter(|rest| !rest.is_empty())
        .unwrap_or(identifier);

    column_label(stripped)
}

/// Label for a column header: underscores become spaces, words are capitalised
pub fn column_label(identifier: &str) -> String {
    identifier
        .split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut characters = word.chars();
    match characters.next() {
        Some(first) => first.to_uppercase().chain(characters).collect(),
        None => String::new(),
    }
}
