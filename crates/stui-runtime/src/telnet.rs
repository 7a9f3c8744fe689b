#![forbid(unsafe_code)]

//! Minimal Telnet server side: option negotiation and an input filter.
//!
//! The server asks the client for character-at-a-time mode with server-side
//! echo and for window-size reports (NAWS, RFC 1073). [`TelnetReader`]
//! strips protocol bytes from the input so that the session sees only
//! keystrokes, and turns each window-size report into an update of the
//! session environment followed by the resize sentinel, delivered as a read
//! of its own.

use std::collections::VecDeque;
use std::io::{self, Read, Write};

use stui_core::RESIZE_SENTINEL;

use crate::env::SessionEnv;

pub const IAC: u8 = 255;
pub const DONT: u8 = 254;
pub const DO: u8 = 253;
pub const WONT: u8 = 252;
pub const WILL: u8 = 251;
pub const SB: u8 = 250;
pub const SE: u8 = 240;

pub const OPT_ECHO: u8 = 1;
pub const OPT_SGA: u8 = 3;
pub const OPT_NAWS: u8 = 31;
pub const OPT_LINEMODE: u8 = 34;

const CR: u8 = b'\r';
const NUL: u8 = 0;

/// Longest subnegotiation payload kept; anything longer is truncated.
const MAX_SUBNEGOTIATION: usize = 64;

/// Bytes sent to every client on connect.
pub const PREAMBLE: [u8; 15] = [
    IAC, WILL, OPT_ECHO, // server echoes
    IAC, WILL, OPT_SGA, // no go-ahead
    IAC, DO, OPT_SGA, //
    IAC, DONT, OPT_LINEMODE, // character at a time
    IAC, DO, OPT_NAWS, // report window size
];

/// Write [`PREAMBLE`] and flush.
pub fn negotiate<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(&PREAMBLE)?;
    out.flush()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Data,
    /// Saw IAC.
    Command,
    /// Saw IAC WILL/WONT/DO/DONT; the next byte is the option.
    Option,
    /// Inside IAC SB ... IAC SE.
    Sub,
    /// Saw IAC inside a subnegotiation.
    SubCommand,
}

/// Wraps a client stream and yields keystroke bytes only.
///
/// Parser state survives across reads, so commands split over TCP segments
/// are still recognized.
#[derive(Debug)]
pub struct TelnetReader<R> {
    inner: R,
    env: SessionEnv,
    state: State,
    after_cr: bool,
    sub: Vec<u8>,
    current: Vec<u8>,
    ready: VecDeque<Vec<u8>>,
    scratch: Vec<u8>,
}

impl<R: Read> TelnetReader<R> {
    pub fn new(inner: R, env: SessionEnv) -> Self {
        Self::with_capacity(inner, env, 1024)
    }

    pub fn with_capacity(inner: R, env: SessionEnv, capacity: usize) -> Self {
        Self {
            inner,
            env,
            state: State::Data,
            after_cr: false,
            sub: Vec::new(),
            current: Vec::new(),
            ready: VecDeque::new(),
            scratch: vec![0; capacity.max(16)],
        }
    }

    pub fn env(&self) -> &SessionEnv {
        &self.env
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state = match self.state {
                State::Data => self.data(byte),
                State::Command => match byte {
                    IAC => {
                        self.push(IAC);
                        State::Data
                    }
                    WILL | WONT | DO | DONT => State::Option,
                    SB => {
                        self.sub.clear();
                        State::Sub
                    }
                    _ => State::Data,
                },
                State::Option => State::Data,
                State::Sub => {
                    if byte == IAC {
                        State::SubCommand
                    } else {
                        self.push_sub(byte);
                        State::Sub
                    }
                }
                State::SubCommand => match byte {
                    SE => {
                        self.finish_subnegotiation();
                        State::Data
                    }
                    IAC => {
                        self.push_sub(IAC);
                        State::Sub
                    }
                    _ => State::Data,
                },
            };
        }
        self.flush_current();
    }

    fn data(&mut self, byte: u8) -> State {
        if byte == IAC {
            return State::Command;
        }
        let after_cr = std::mem::replace(&mut self.after_cr, byte == CR);
        if !(byte == NUL && after_cr) {
            self.push(byte);
        }
        State::Data
    }

    fn push(&mut self, byte: u8) {
        self.current.push(byte);
    }

    fn push_sub(&mut self, byte: u8) {
        if self.sub.len() < MAX_SUBNEGOTIATION {
            self.sub.push(byte);
        }
    }

    fn flush_current(&mut self) {
        if !self.current.is_empty() {
            self.ready.push_back(std::mem::take(&mut self.current));
        }
    }

    fn finish_subnegotiation(&mut self) {
        let [OPT_NAWS, w_hi, w_lo, h_hi, h_lo, ..] = self.sub[..] else {
            tracing::trace!(sub = ?self.sub, "ignoring subnegotiation");
            return;
        };
        let width = u16::from_be_bytes([w_hi, w_lo]);
        let height = u16::from_be_bytes([h_hi, h_lo]);
        tracing::debug!(width, height, "client window size");
        self.env.set_size(width, height);
        self.flush_current();
        self.ready.push_back(RESIZE_SENTINEL.to_vec());
    }
}

impl<R: Read> Read for TelnetReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            if let Some(mut chunk) = self.ready.pop_front() {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    chunk.drain(..n);
                    self.ready.push_front(chunk);
                }
                return Ok(n);
            }
            let n = self.inner.read(&mut self.scratch)?;
            if n == 0 {
                return Ok(0);
            }
            let raw = self.scratch[..n].to_vec();
            self.feed(&raw);
        }
    }
}
