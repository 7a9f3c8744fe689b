#![forbid(unsafe_code)]

//! One connected client: a receiver thread, an interpreter thread, and the
//! queue between them.
//!
//! ```text
//!  transport ──read──▶ receiver ──Inbound──▶ interpreter ──frame──▶ sink
//!                                  ▲  ▲
//!             ResizeNotifier ──────┘  └────── Teardown (Interrupt)
//! ```
//!
//! The receiver only moves bytes. Everything that touches UI state happens
//! on the interpreter, which handles messages strictly in arrival order:
//! decode, dispatch to the [`Manager`], then render if anything changed.
//!
//! # Teardown
//!
//! CTRL_C, transport EOF or error, an interpreter error or panic, and
//! [`Session::disconnect`] all end up in [`Teardown::fire`]. The first call
//! wins: it runs the transport's interrupt hook to unblock the receiver,
//! wakes the interpreter, and invokes the exit callback. Every later call is
//! a no-op, so the callback runs exactly once.

use std::any::Any;
use std::fmt;
use std::io::{self, Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use stui_core::{KeyDecoder, KeyLabel, RESIZE_SENTINEL};
use stui_render::ansi;

use crate::debug_trace::SessionEvent;
use crate::session_trace;
use crate::env::SessionEnv;
use crate::error::{SessionError, SessionResult};
use crate::manager::Manager;

/// Messages on a session's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// One successful read from the transport.
    Chunk(Vec<u8>),
    /// The receiver hit EOF or an error and stopped.
    Closed,
    /// Teardown wake-up for the interpreter.
    Interrupt,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitReason {
    /// The client pressed CTRL_C.
    CtrlC,
    /// The transport reached EOF or failed.
    Disconnected,
    /// A widget action, a frame write, or the interpreter itself failed.
    Failed,
    /// [`Session::disconnect`] was called.
    Requested,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExitReason::CtrlC => "ctrl-c",
            ExitReason::Disconnected => "disconnected",
            ExitReason::Failed => "failed",
            ExitReason::Requested => "requested",
        })
    }
}

/// Unblocks a receiver stuck in `read`, e.g. by shutting a socket down.
pub type InterruptHook = Box<dyn Fn() + Send + Sync>;

/// Called once when the session ends.
pub type ExitCallback = Box<dyn FnOnce(ExitReason) + Send>;

/// Per-session settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Screen width used when the client has not reported one.
    pub default_width: u16,
    /// Screen height used when the client has not reported one.
    pub default_height: u16,
    /// Bytes requested per transport read.
    pub read_buffer_size: usize,
    /// Worker threads are named `<prefix>-recv-<id>` / `<prefix>-interp-<id>`.
    pub thread_name_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_width: 1200,
            default_height: 800,
            read_buffer_size: 1024,
            thread_name_prefix: "stui".to_owned(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_default_size(mut self, width: u16, height: u16) -> Self {
        self.default_width = width;
        self.default_height = height;
        self
    }

    /// Clamped to at least one byte.
    #[must_use]
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    #[must_use]
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// The size to start with: the client's, else the defaults.
    pub fn initial_size(&self, env: &SessionEnv) -> (u16, u16) {
        env.dimensions()
            .unwrap_or((self.default_width, self.default_height))
    }
}

/// The transport side of a session.
pub struct Transport<R, W> {
    pub input: R,
    pub output: W,
    pub env: SessionEnv,
    pub interrupt: Option<InterruptHook>,
}

impl<R, W> Transport<R, W> {
    pub fn new(input: R, output: W, env: SessionEnv) -> Self {
        Self {
            input,
            output,
            env,
            interrupt: None,
        }
    }

    #[must_use]
    pub fn with_interrupt<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.interrupt = Some(Box::new(hook));
        self
    }
}

/// Idempotent shutdown latch shared by both workers and the handle.
pub struct Teardown {
    session: u64,
    fired: AtomicBool,
    interrupt: Option<InterruptHook>,
    wake: Sender<Inbound>,
    on_exit: Mutex<Option<ExitCallback>>,
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Teardown")
            .field("session", &self.session)
            .field("fired", &self.is_fired())
            .finish()
    }
}

impl Teardown {
    fn new(
        session: u64,
        interrupt: Option<InterruptHook>,
        wake: Sender<Inbound>,
        on_exit: ExitCallback,
    ) -> Self {
        Self {
            session,
            fired: AtomicBool::new(false),
            interrupt,
            wake,
            on_exit: Mutex::new(Some(on_exit)),
        }
    }

    /// End the session. Returns `false` if it had already ended.
    pub fn fire(&self, reason: ExitReason) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            tracing::trace!(session = self.session, %reason, "teardown already fired");
            return false;
        }
        tracing::info!(session = self.session, %reason, "session teardown");
        if let Some(hook) = &self.interrupt {
            hook();
        }
        let _ = self.wake.send(Inbound::Interrupt);
        let callback = self
            .on_exit
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(callback) = callback {
            callback(reason);
        }
        true
    }

    #[inline]
    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

/// Injects the resize sentinel into a session's queue, in order with the
/// keystrokes already queued.
#[derive(Debug, Clone)]
pub struct ResizeNotifier {
    tx: Sender<Inbound>,
}

impl ResizeNotifier {
    /// Returns `false` once the session is gone.
    pub fn notify(&self) -> bool {
        self.tx.send(Inbound::Chunk(RESIZE_SENTINEL.to_vec())).is_ok()
    }
}

/// Handle to a running session.
#[derive(Debug)]
pub struct Session {
    id: u64,
    tx: Sender<Inbound>,
    teardown: Arc<Teardown>,
    receiver: Option<JoinHandle<()>>,
    interpreter: Option<JoinHandle<()>>,
}

impl Session {
    /// Start both workers for one connection.
    ///
    /// `on_exit` runs exactly once, on whichever thread ends the session.
    pub fn spawn<R, W, F>(
        id: u64,
        transport: Transport<R, W>,
        manager: Manager,
        config: &SessionConfig,
        on_exit: F,
    ) -> SessionResult<Self>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
        F: FnOnce(ExitReason) + Send + 'static,
    {
        let Transport {
            input,
            output,
            env,
            interrupt,
        } = transport;
        let (tx, rx) = mpsc::channel();
        let teardown = Arc::new(Teardown::new(id, interrupt, tx.clone(), Box::new(on_exit)));
        let prefix = &config.thread_name_prefix;

        let interp = Interpreter {
            session: id,
            rx,
            decoder: KeyDecoder::new(),
            manager,
            output,
            env,
        };
        let interp_teardown = Arc::clone(&teardown);
        let interpreter = thread::Builder::new()
            .name(format!("{prefix}-interp-{id}"))
            .spawn(move || interp.run_guarded(&interp_teardown))
            .map_err(|e| {
                teardown.fire(ExitReason::Failed);
                SessionError::Spawn(e)
            })?;

        let recv_tx = tx.clone();
        let recv_teardown = Arc::clone(&teardown);
        let buffer_size = config.read_buffer_size.max(1);
        let receiver = thread::Builder::new()
            .name(format!("{prefix}-recv-{id}"))
            .spawn(move || receive(id, input, &recv_tx, buffer_size, &recv_teardown))
            .map_err(|e| {
                teardown.fire(ExitReason::Failed);
                SessionError::Spawn(e)
            })?;

        tracing::info!(session = id, "session started");
        session_trace!(id, SessionEvent::Spawned);
        Ok(Self {
            id,
            tx,
            teardown,
            receiver: Some(receiver),
            interpreter: Some(interpreter),
        })
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn resize_notifier(&self) -> ResizeNotifier {
        ResizeNotifier {
            tx: self.tx.clone(),
        }
    }

    /// End the session from outside. Returns `false` if it had already ended.
    pub fn disconnect(&self) -> bool {
        self.teardown.fire(ExitReason::Requested)
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.teardown.is_fired()
    }

    /// Wait for both workers to exit.
    pub fn join(mut self) {
        for handle in [self.interpreter.take(), self.receiver.take()]
            .into_iter()
            .flatten()
        {
            let name = handle.thread().name().unwrap_or("session").to_owned();
            if handle.join().is_err() {
                tracing::warn!(session = self.id, thread = %name, "worker panicked outside its guard");
            }
        }
    }
}

/// Read until EOF, an error, or teardown. Always ends with `Closed`.
fn receive<R: Read>(
    session: u64,
    mut input: R,
    tx: &Sender<Inbound>,
    buffer_size: usize,
    teardown: &Teardown,
) {
    let mut buf = vec![0u8; buffer_size];
    while !teardown.is_fired() {
        match input.read(&mut buf) {
            Ok(0) => {
                tracing::debug!(session, "transport EOF");
                break;
            }
            Ok(n) => {
                session_trace!(session, SessionEvent::Read(n));
                if tx.send(Inbound::Chunk(buf[..n].to_vec())).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                if !teardown.is_fired() {
                    tracing::debug!(session, error = %e, "transport read failed");
                }
                break;
            }
        }
    }
    let _ = tx.send(Inbound::Closed);
}

struct Interpreter<W> {
    session: u64,
    rx: Receiver<Inbound>,
    decoder: KeyDecoder,
    manager: Manager,
    output: W,
    env: SessionEnv,
}

impl<W: Write> Interpreter<W> {
    /// Run the loop, turning errors and panics into a teardown.
    fn run_guarded(mut self, teardown: &Teardown) {
        let session = self.session;
        let reason = match panic::catch_unwind(AssertUnwindSafe(|| self.run())) {
            Ok(Ok(reason)) => reason,
            Ok(Err(e)) => {
                tracing::error!(session, error = %e, "session failed");
                ExitReason::Failed
            }
            Err(payload) => {
                let e = SessionError::Panic(panic_message(payload.as_ref()));
                tracing::error!(session, error = %e, "session failed");
                ExitReason::Failed
            }
        };
        if let Err(e) = self.restore_terminal() {
            tracing::trace!(session, error = %e, "could not restore client terminal");
        }
        session_trace!(session, SessionEvent::Exit(reason));
        teardown.fire(reason);
    }

    /// Blank the client's screen and hide its cursor before the first frame.
    fn prepare_terminal(&mut self) -> io::Result<()> {
        ansi::erase_display(&mut self.output)?;
        ansi::cursor_hide(&mut self.output)?;
        self.output.flush()
    }

    /// Leave the client's terminal usable after the session.
    fn restore_terminal(&mut self) -> io::Result<()> {
        ansi::sgr_reset(&mut self.output)?;
        ansi::erase_display(&mut self.output)?;
        ansi::cursor_show(&mut self.output)?;
        self.output.flush()
    }

    fn run(&mut self) -> SessionResult<ExitReason> {
        if let Some((width, height)) = self.env.dimensions()
            && (width, height) != self.manager.size()
        {
            self.manager.resize_ui(width, height);
        }
        self.manager.initialize();
        self.prepare_terminal()?;
        self.manager.render_if_dirty(&mut self.output)?;

        while let Ok(message) = self.rx.recv() {
            match message {
                Inbound::Chunk(bytes) => {
                    if let Some(reason) = self.handle_chunk(&bytes)? {
                        return Ok(reason);
                    }
                }
                Inbound::Closed => return Ok(ExitReason::Disconnected),
                Inbound::Interrupt => return Ok(ExitReason::Requested),
            }
        }
        Ok(ExitReason::Disconnected)
    }

    fn handle_chunk(&mut self, bytes: &[u8]) -> SessionResult<Option<ExitReason>> {
        let event = self.decoder.decode(bytes);
        match event.label() {
            KeyLabel::CtrlC => return Ok(Some(ExitReason::CtrlC)),
            KeyLabel::WindowResize => self.resize(),
            KeyLabel::Unknown => {
                tracing::warn!(
                    session = self.session,
                    bytes = ?bytes,
                    "unrecognized input sequence"
                );
                return Ok(None);
            }
            _ => {
                session_trace!(self.session, SessionEvent::Dispatch(event.to_string()));
                self.manager.dispatch(&event)?;
            }
        }
        if self.manager.render_if_dirty(&mut self.output)? {
            tracing::trace!(session = self.session, "frame written");
            session_trace!(self.session, SessionEvent::Frame);
        }
        Ok(None)
    }

    fn resize(&mut self) {
        match self.env.dimensions() {
            Some((width, height)) if (width, height) != self.manager.size() => {
                tracing::debug!(session = self.session, width, height, "window resized");
                session_trace!(self.session, SessionEvent::Resized(width, height));
                self.manager.resize_ui(width, height);
            }
            Some(_) => {}
            None => tracing::warn!(
                session = self.session,
                "resize signal without usable LINES/COLUMNS, keeping previous size"
            ),
        }
    }
}

/// Best-effort text of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn config_defaults_and_builders() {
        let config = SessionConfig::default();
        assert_eq!((config.default_width, config.default_height), (1200, 800));
        assert_eq!(config.read_buffer_size, 1024);
        let config = config
            .with_default_size(80, 24)
            .with_read_buffer_size(0)
            .with_thread_name_prefix("t");
        assert_eq!(config.read_buffer_size, 1);
        assert_eq!(config.thread_name_prefix, "t");
        assert_eq!(config.initial_size(&SessionEnv::new()), (80, 24));
        assert_eq!(config.initial_size(&SessionEnv::with_size(100, 30)), (100, 30));
    }

    #[test]
    fn teardown_fires_once() {
        let (tx, rx) = mpsc::channel();
        let calls = Arc::new(AtomicU32::new(0));
        let hooks = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let hook_counter = Arc::clone(&hooks);
        let teardown = Teardown::new(
            1,
            Some(Box::new(move || {
                hook_counter.fetch_add(1, Ordering::Relaxed);
            })),
            tx,
            Box::new(move |reason| {
                assert_eq!(reason, ExitReason::CtrlC);
                counter.fetch_add(1, Ordering::Relaxed);
            }),
        );
        assert!(teardown.fire(ExitReason::CtrlC));
        assert!(!teardown.fire(ExitReason::Failed));
        assert!(teardown.is_fired());
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(hooks.load(Ordering::Relaxed), 1);
        assert_eq!(rx.try_recv(), Ok(Inbound::Interrupt));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn receiver_forwards_chunks_then_closed() {
        let (tx, rx) = mpsc::channel();
        let (wake, _wake_rx) = mpsc::channel();
        let teardown = Teardown::new(1, None, wake, Box::new(|_| {}));
        let input = io::Cursor::new(vec![1u8, 2, 3, 4, 5]);
        receive(1, input, &tx, 2, &teardown);
        let got: Vec<Inbound> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![
                Inbound::Chunk(vec![1, 2]),
                Inbound::Chunk(vec![3, 4]),
                Inbound::Chunk(vec![5]),
                Inbound::Closed,
            ]
        );
    }

    #[test]
    fn receiver_stops_after_teardown() {
        let (tx, rx) = mpsc::channel();
        let (wake, _wake_rx) = mpsc::channel();
        let teardown = Teardown::new(1, None, wake, Box::new(|_| {}));
        teardown.fire(ExitReason::Requested);
        receive(1, io::Cursor::new(vec![9u8; 8]), &tx, 4, &teardown);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![Inbound::Closed]);
    }

    #[test]
    fn panic_payloads_become_text() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    #[test]
    fn exit_reasons_display() {
        assert_eq!(ExitReason::CtrlC.to_string(), "ctrl-c");
        assert_eq!(ExitReason::Disconnected.to_string(), "disconnected");
    }
}
