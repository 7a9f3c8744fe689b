#![forbid(unsafe_code)]

//! Error types for sessions and the listening server.

use std::fmt;
use std::io;

use stui_widgets::WidgetError;

/// Failure inside one session. Ends that session only.
#[derive(Debug)]
pub enum SessionError {
    /// Reading input or writing a frame failed.
    Io(io::Error),
    /// A widget action failed.
    Widget(WidgetError),
    /// A worker thread could not be started.
    Spawn(io::Error),
    /// The interpreter panicked; carries the panic message.
    Panic(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Io(e) => write!(f, "I/O error: {e}"),
            SessionError::Widget(e) => write!(f, "{e}"),
            SessionError::Spawn(e) => write!(f, "failed to spawn session thread: {e}"),
            SessionError::Panic(msg) => write!(f, "interpreter panicked: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Io(e) | SessionError::Spawn(e) => Some(e),
            SessionError::Widget(e) => Some(e),
            SessionError::Panic(_) => None,
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        SessionError::Io(e)
    }
}

impl From<WidgetError> for SessionError {
    fn from(e: WidgetError) -> Self {
        SessionError::Widget(e)
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Failure of the listening socket itself.
#[derive(Debug)]
pub enum ServerError {
    /// Binding the listen address failed.
    Bind {
        addr: std::net::SocketAddr,
        source: io::Error,
    },
    /// Accepting or configuring the listener failed.
    Io(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Bind { addr, source } => write!(f, "cannot bind {addr}: {source}"),
            ServerError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Bind { source, .. } => Some(source),
            ServerError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for ServerError {
    fn from(e: io::Error) -> Self {
        ServerError::Io(e)
    }
}

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
