#![forbid(unsafe_code)]

//! Raw per-session traces on stderr, for when no subscriber is installed.
//!
//! `STUI_DEBUG_TRACE` selects which sessions are traced:
//!
//! - `1`, `true` or `all`: every session;
//! - a comma-separated list of ids (`3,7`): only those sessions;
//! - anything else, or unset: nothing.
//!
//! The variable is read once. A disabled [`session_trace!`] costs one
//! filter lookup and never formats its event.
//!
//! ```text
//! [stui     12ms #3] read 3 bytes
//! [stui     12ms #3] dispatch ArrowDown
//! [stui     40ms #3] exit ctrl-c
//! ```

use std::fmt;
use std::sync::LazyLock;
use std::time::Instant;

use crate::session::ExitReason;

/// Which sessions get traced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceFilter {
    Off,
    All,
    Sessions(Vec<u64>),
}

impl TraceFilter {
    /// Parse a `STUI_DEBUG_TRACE` value.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("all")
        {
            return Self::All;
        }
        let ids: Vec<u64> = value
            .split(',')
            .filter_map(|part| part.trim().parse().ok())
            .collect();
        if ids.is_empty() {
            Self::Off
        } else {
            Self::Sessions(ids)
        }
    }

    pub fn traces(&self, session: u64) -> bool {
        match self {
            Self::Off => false,
            Self::All => true,
            Self::Sessions(ids) => ids.contains(&session),
        }
    }
}

static FILTER: LazyLock<TraceFilter> = LazyLock::new(|| {
    std::env::var("STUI_DEBUG_TRACE").map_or(TraceFilter::Off, |v| TraceFilter::parse(&v))
});

static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);

#[inline]
pub fn is_enabled(session: u64) -> bool {
    FILTER.traces(session)
}

/// Milliseconds since the first trace.
#[inline]
pub fn elapsed_ms() -> u64 {
    u64::try_from(EPOCH.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// One step in a session's life.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Spawned,
    Read(usize),
    Dispatch(String),
    Resized(u16, u16),
    Frame,
    Exit(ExitReason),
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawned => f.write_str("spawned"),
            Self::Read(n) => write!(f, "read {n} bytes"),
            Self::Dispatch(key) => write!(f, "dispatch {key}"),
            Self::Resized(w, h) => write!(f, "resized {w}x{h}"),
            Self::Frame => f.write_str("frame"),
            Self::Exit(reason) => write!(f, "exit {reason}"),
        }
    }
}

/// Format one trace line.
pub fn line(elapsed_ms: u64, session: u64, event: &SessionEvent) -> String {
    format!("[stui {elapsed_ms:>6}ms #{session}] {event}")
}

/// Print a [`SessionEvent`] to stderr when `STUI_DEBUG_TRACE` selects the session.
#[macro_export]
macro_rules! session_trace {
    ($session:expr, $event:expr) => {{
        let session: u64 = $session;
        if $crate::debug_trace::is_enabled(session) {
            eprintln!(
                "{}",
                $crate::debug_trace::line($crate::debug_trace::elapsed_ms(), session, &$event)
            );
        }
    }};
}
