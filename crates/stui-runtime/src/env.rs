#![forbid(unsafe_code)]

//! Per-session environment shared with the transport.
//!
//! The transport fills `LINES` / `COLUMNS` when the client connects and
//! updates them when the window changes; the interpreter reads them on the
//! resize sentinel.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

pub const LINES: &str = "LINES";
pub const COLUMNS: &str = "COLUMNS";

/// Cloneable handle to a string map.
#[derive(Debug, Clone, Default)]
pub struct SessionEnv {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl SessionEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// An environment with `COLUMNS` and `LINES` set.
    pub fn with_size(width: u16, height: u16) -> Self {
        let env = Self::new();
        env.set_size(width, height);
        env
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    pub fn set_size(&self, width: u16, height: u16) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(COLUMNS.to_owned(), width.to_string());
        map.insert(LINES.to_owned(), height.to_string());
    }

    /// `(COLUMNS, LINES)` if both are present and parse.
    ///
    /// A value that is present but unparsable is logged.
    pub fn dimensions(&self) -> Option<(u16, u16)> {
        let width = self.parse(COLUMNS)?;
        let height = self.parse(LINES)?;
        Some((width, height))
    }

    fn parse(&self, key: &str) -> Option<u16> {
        let raw = self.get(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, value = %raw, error = %e, "unparsable terminal dimension");
                None
            }
        }
    }
}
