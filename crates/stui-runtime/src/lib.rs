#![forbid(unsafe_code)]

//! stui Runtime
//!
//! Ties the decoder from `stui-core`, the layered grid from `stui-render`,
//! and the tabs and widgets from `stui-widgets` into a server that hosts one
//! independent UI per connected client.
//!
//! # Key Components
//!
//! - [`Manager`] - Owns the screen and the tabs; routes keys, applies
//!   widget commands, renders frames
//! - [`Session`] - Receiver and interpreter threads for one client
//! - [`SessionEnv`] - Shared `LINES` / `COLUMNS` map filled by the transport
//! - [`TelnetReader`] - Strips Telnet protocol bytes and turns NAWS reports
//!   into resize signals
//! - [`Server`] - Accept loop spawning a session per connection
//!
//! # Role in stui
//! The runtime is the only crate that spawns threads or touches sockets.
//! Everything below it is single-threaded UI state, mutated only by a
//! session's interpreter thread.

pub mod debug_trace;
pub mod env;
pub mod error;
pub mod manager;
pub mod server;
pub mod session;
pub mod telnet;

pub use env::SessionEnv;
pub use error::{ServerError, ServerResult, SessionError, SessionResult};
pub use manager::Manager;
pub use server::{Server, ServerConfig, ShutdownHandle};
pub use session::{
    ExitReason, Inbound, ResizeNotifier, Session, SessionConfig, Teardown, Transport,
};
pub use telnet::TelnetReader;
