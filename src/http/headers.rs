//! Response header accumulation.
//!
//! # Responsibilities
//! - Turn raw header lines into `(name, value)` pairs
//! - Store them under lowercased names (last write wins)
//! - Answer case-insensitive lookups
//!
//! # Design Decisions
//! - Header bytes are read as ISO-8859-1, so any byte sequence is accepted
//! - Lines without a colon (status line, blank terminator) are dropped silently
//! - No multi-value aggregation; a repeated header replaces the earlier value

use std::collections::HashMap;

/// Decode bytes as ISO-8859-1: every byte is the code point of the same value.
pub(crate) fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// One parsed header line, with the name as it was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    pub name: String,
    pub value: String,
}

impl HeaderLine {
    /// Parse a raw header line. Returns `None` if there is no colon.
    pub fn parse(raw: &[u8]) -> Option<Self> {
        let line = latin1_to_string(raw);
        // values may contain colons themselves (timestamps, URLs)
        let (name, value) = line.split_once(':')?;
        Some(Self {
            name: name.trim().to_string(),
            value: value.trim().to_string(),
        })
    }
}

/// Case-insensitive map of the headers of one response.
#[derive(Debug, Clone, Default)]
pub struct HeaderStore {
    headers: HashMap<String, String>,
    frozen: bool,
}

impl HeaderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw header line.
    ///
    /// Returns the parsed line (original-case name) when it was stored, so
    /// the caller can echo it. Lines without a colon and lines arriving
    /// after [`freeze`](Self::freeze) are ignored.
    pub fn record(&mut self, raw: &[u8]) -> Option<HeaderLine> {
        if self.frozen {
            tracing::trace!(len = raw.len(), "Header line after body start ignored");
            return None;
        }

        let line = HeaderLine::parse(raw)?;
        self.headers
            .insert(line.name.to_lowercase(), line.value.clone());
        Some(line)
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Mark the header block complete. The store is read-only afterwards.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    #[cfg(test)]
    pub(crate) fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Iterate over `(lowercased name, value)` pairs in no particular order.
    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
