#![forbid(unsafe_code)]

//! Telnet listener: one [`Session`] per accepted connection.
//!
//! The accept loop runs on the caller's thread. Each connection gets a fresh
//! [`Manager`] from the factory, the Telnet preamble, and a session whose
//! interrupt hook shuts the socket down. Stopping is done through a
//! [`ShutdownHandle`], which flags the loop and pokes the listener with a
//! throwaway connection so the blocking `accept` returns.

use std::io::{self, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::env::SessionEnv;
use crate::error::{ServerError, ServerResult};
use crate::manager::Manager;
use crate::session::{Session, SessionConfig, Transport};
use crate::telnet::{self, TelnetReader};

/// Default listen port. Port 23 needs privileges on most systems.
pub const DEFAULT_PORT: u16 = 2323;

/// Line sent to clients turned away at capacity.
pub const BUSY_MESSAGE: &[u8] = b"Server busy, try again later.\r\n";

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Concurrent session limit. `None` accepts everyone.
    pub max_sessions: Option<usize>,
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            max_sessions: None,
            session: SessionConfig::default(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.bind_addr.set_port(port);
        self
    }

    #[must_use]
    pub fn with_max_sessions(mut self, max: Option<usize>) -> Self {
        self.max_sessions = max;
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }
}

/// Stops a running [`Server::serve`] from another thread.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    /// Request shutdown. Returns `false` if it was already requested.
    pub fn shutdown(&self) -> bool {
        if self.flag.swap(true, Ordering::AcqRel) {
            return false;
        }
        tracing::info!(addr = %self.wake_addr, "server shutdown requested");
        // Unblock accept(); the loop sees the flag and drops this stream.
        if let Err(e) = TcpStream::connect(self.wake_addr) {
            tracing::debug!(error = %e, "shutdown wake-up connect failed");
        }
        true
    }

    #[inline]
    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// A bound listener.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    local_addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
    next_id: u64,
}

impl Server {
    pub fn bind(config: ServerConfig) -> ServerResult<Self> {
        let addr = config.bind_addr;
        let listener = TcpListener::bind(addr).map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, max_sessions = ?config.max_sessions, "listening");
        Ok(Self {
            listener,
            config,
            local_addr,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
            next_id: 1,
        })
    }

    #[inline]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    #[inline]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Sessions currently running.
    pub fn active_sessions(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            wake_addr: wake_addr(self.local_addr),
        }
    }

    /// Accept connections until shut down, then disconnect and join every
    /// remaining session.
    ///
    /// `factory` receives the initial screen size. Failures on a single
    /// connection are logged and do not stop the loop.
    pub fn serve<F>(&mut self, mut factory: F) -> ServerResult<()>
    where
        F: FnMut(u16, u16) -> Manager,
    {
        let mut sessions: Vec<Session> = Vec::new();
        while !self.shutdown.load(Ordering::Acquire) {
            let (stream, peer) = match self.listener.accept() {
                Ok(accepted) => accepted,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                    continue;
                }
            };
            if self.shutdown.load(Ordering::Acquire) {
                break;
            }

            sessions.retain(|s| !s.is_closed());
            if let Some(max) = self.config.max_sessions
                && self.active.load(Ordering::Acquire) >= max
            {
                tracing::warn!(%peer, max, "session limit reached, refusing client");
                refuse(stream);
                continue;
            }

            let id = self.next_id;
            self.next_id += 1;
            match self.start_session(id, stream, peer, &mut factory) {
                Ok(session) => sessions.push(session),
                Err(e) => tracing::warn!(session = id, %peer, error = %e, "could not start session"),
            }
        }

        tracing::info!(remaining = sessions.len(), "stopping sessions");
        for session in sessions {
            session.disconnect();
            session.join();
        }
        Ok(())
    }

    fn start_session<F>(
        &self,
        id: u64,
        mut stream: TcpStream,
        peer: SocketAddr,
        factory: &mut F,
    ) -> crate::error::SessionResult<Session>
    where
        F: FnMut(u16, u16) -> Manager,
    {
        let env = SessionEnv::new();
        let (width, height) = self.config.session.initial_size(&env);
        let manager = factory(width, height);

        stream.set_nodelay(true)?;
        telnet::negotiate(&mut stream)?;

        let input = TelnetReader::with_capacity(
            stream.try_clone()?,
            env.clone(),
            self.config.session.read_buffer_size,
        );
        let output = stream.try_clone()?;
        let transport = Transport::new(input, output, env).with_interrupt(move || {
            let _ = stream.shutdown(Shutdown::Both);
        });

        let active = Arc::clone(&self.active);
        active.fetch_add(1, Ordering::AcqRel);
        tracing::info!(session = id, %peer, "client connected");
        Session::spawn(id, transport, manager, &self.config.session, move |reason| {
            active.fetch_sub(1, Ordering::AcqRel);
            tracing::info!(session = id, %peer, %reason, "client disconnected");
        })
    }
}

fn refuse(mut stream: TcpStream) {
    let _ = stream.write_all(BUSY_MESSAGE);
    let _ = stream.flush();
    let _ = stream.shutdown(Shutdown::Both);
}

/// Address a local client can reach the listener on.
fn wake_addr(local: SocketAddr) -> SocketAddr {
    match local.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), local.port())
        }
        IpAddr::V6(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), local.port())
        }
        _ => local,
    }
}
