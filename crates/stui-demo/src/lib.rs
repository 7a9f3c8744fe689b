#![forbid(unsafe_code)]

//! stui demo: a financial calculator served to Telnet clients.
//!
//! `app` builds the per-session UI, `finance` holds the calculators behind
//! it, and `cli` reads the server options.

pub mod app;
pub mod cli;
pub mod finance;
