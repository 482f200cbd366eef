//! Registry of USB class, subclass and protocol names.

use super::data::CLASS_TABLE;
use std::collections::HashMap;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Errors that can occur while parsing the embedded class table.
///
/// The table is a build-time constant, so any of these indicates a
/// transcription error in the table itself. The error is cloneable so a
/// cached parse failure can be returned to every lookup that races on
/// the first load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassDataError {
    #[error("class table line {line}: unrecognized entry {text:?}")]
    UnrecognizedLine { line: usize, text: String },
    #[error("class table line {line}: invalid hex code {token:?}")]
    InvalidCode { line: usize, token: String },
    #[error("class table line {line}: entry has no name")]
    MissingName { line: usize },
}

/// Lookup tables built from the class table text.
#[derive(Debug, Default)]
struct Tables {
    classes: HashMap<u8, String>,
    subclasses: HashMap<(u8, u8), String>,
    protocols: HashMap<(u8, u8, u8), String>,
}

/// Resolves USB class/subclass/protocol codes to human-readable names.
///
/// The embedded table is parsed lazily on the first lookup and at most
/// once, even under concurrent lookups from multiple threads. After the
/// load, lookups are read-only. A parse failure is cached and surfaced
/// to every lookup; no partially loaded state is ever observable.
pub struct ClassRegistry {
    table: &'static str,
    tables: OnceLock<Result<Tables, ClassDataError>>,
    parses: AtomicUsize,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// Create a registry backed by the embedded class table.
    pub const fn new() -> Self {
        Self {
            table: CLASS_TABLE,
            tables: OnceLock::new(),
            parses: AtomicUsize::new(0),
        }
    }

    /// Create a registry backed by an alternate table (for testing).
    #[cfg(test)]
    pub(crate) const fn with_table(table: &'static str) -> Self {
        Self {
            table,
            tables: OnceLock::new(),
            parses: AtomicUsize::new(0),
        }
    }

    /// Name of the given USB class, if known.
    pub fn class_name(&self, class: u8) -> Result<Option<&str>, ClassDataError> {
        Ok(self.tables()?.classes.get(&class).map(String::as_str))
    }

    /// Name of the given USB subclass, if known.
    pub fn subclass_name(&self, class: u8, subclass: u8) -> Result<Option<&str>, ClassDataError> {
        Ok(self
            .tables()?
            .subclasses
            .get(&(class, subclass))
            .map(String::as_str))
    }

    /// Name of the given USB protocol, if known.
    pub fn protocol_name(
        &self,
        class: u8,
        subclass: u8,
        protocol: u8,
    ) -> Result<Option<&str>, ClassDataError> {
        Ok(self
            .tables()?
            .protocols
            .get(&(class, subclass, protocol))
            .map(String::as_str))
    }

    /// Number of times the table has been parsed (0 or 1).
    #[cfg(test)]
    pub(crate) fn parse_count(&self) -> usize {
        self.parses.load(Ordering::Relaxed)
    }

    fn tables(&self) -> Result<&Tables, ClassDataError> {
        self.tables
            .get_or_init(|| {
                self.parses.fetch_add(1, Ordering::Relaxed);
                parse_table(self.table)
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

/// Parse the class table text into lookup maps.
///
/// Line roles are determined by indentation depth, top to bottom, with
/// the current class and subclass codes carried across lines until a
/// less-indented line replaces them. Duplicate keys take the last value.
fn parse_table(text: &str) -> Result<Tables, ClassDataError> {
    let mut tables = Tables::default();
    let mut class = 0u8;
    let mut subclass = 0u8;

    for (idx, line) in text.trim().lines().enumerate() {
        let lineno = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("\t\t") {
            let (protocol, name) = parse_entry(rest, lineno)?;
            tables.protocols.insert((class, subclass, protocol), name);
        } else if let Some(rest) = line.strip_prefix('\t') {
            let (code, name) = parse_entry(rest, lineno)?;
            subclass = code;
            tables.subclasses.insert((class, subclass), name);
        } else if let Some(rest) = line.strip_prefix("C ") {
            let (code, name) = parse_entry(rest, lineno)?;
            class = code;
            tables.classes.insert(class, name);
        } else {
            return Err(ClassDataError::UnrecognizedLine {
                line: lineno,
                text: line.to_string(),
            });
        }
    }

    Ok(tables)
}

/// Split an entry body into its hex code and name.
///
/// The name starts after the whitespace run following the code token,
/// rather than at a fixed column, so the table survives reformatting.
fn parse_entry(body: &str, lineno: usize) -> Result<(u8, String), ClassDataError> {
    let (token, rest) = body.split_once(' ').ok_or(ClassDataError::MissingName { line: lineno })?;
    let code =
        u8::from_str_radix(token, 16).map_err(|_| ClassDataError::InvalidCode {
            line: lineno,
            token: token.to_string(),
        })?;
    let name = rest.trim_start();
    if name.is_empty() {
        return Err(ClassDataError::MissingName { line: lineno });
    }
    Ok((code, name.to_string()))
}
