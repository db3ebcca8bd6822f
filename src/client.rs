//! A client for the remote-control (batch) port of a running IGV.
//!
//! Every command opens a fresh connection, writes the command, reads the
//! response, and closes the connection again. There is no persistent
//! connection, no retry, and no reconnection policy: each call either
//! completes within its timeout or fails with a [`TransportError`].
//!
//! The client distinguishes between two kinds of failure:
//!
//! - The application answered, but not with the expected response. This is
//!   reported as `Ok(false)`.
//! - The application could not be reached or did not answer in time. This is
//!   reported as an [`Error::Transport`]. IGV is known to hang while it is
//!   busy, so a timeout means the state of the application is unknown, not
//!   that the command failed.
//!
//! ```no_run
//! use igvcontrol::Client;
//!
//! let client = Client::default();
//!
//! if client.is_alive()? {
//!     client.load_file("path/to/file.bam")?;
//!     client.jump_to("chr1:123456")?;
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod command;
pub mod connection;

use std::io;
use std::time::Duration;

pub use builder::Builder;
pub use command::Command;
use connection::Connect;
use connection::Connection;
pub use connection::Tcp;
use tracing::debug;

use crate::Variant;

/// The default host.
pub const DEFAULT_HOST: &str = "localhost";

/// The default port of the IGV batch port.
pub const DEFAULT_PORT: u16 = 60151;

/// The default timeout for connecting and for each read or write.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// The default timeout for the liveness probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// A failure at the socket level during a command exchange.
#[derive(Debug)]
pub enum TransportError {
    /// The connection could not be opened.
    Connect(io::Error),

    /// The command could not be written.
    Write(io::Error),

    /// The response could not be read.
    Read(io::Error),
}

impl TransportError {
    /// Gets the underlying I/O error.
    pub fn inner(&self) -> &io::Error {
        match self {
            TransportError::Connect(err) | TransportError::Write(err) | TransportError::Read(err) => {
                err
            }
        }
    }

    /// Whether or not the failure was a timeout.
    ///
    /// A timed out command may still have been carried out by the application.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self.inner().kind(),
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
        )
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Connect(err) => write!(f, "connect error: {err}"),
            TransportError::Write(err) => write!(f, "write error: {err}"),
            TransportError::Read(err) => write!(f, "read error: {err}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// An error related to a [`Client`].
#[derive(Debug)]
pub enum Error {
    /// The command is not plain ASCII.
    InvalidCommand(String),

    /// A transport error.
    Transport(TransportError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidCommand(command) => {
                write!(f, "invalid command: `{command}` is not ASCII")
            }
            Error::Transport(err) => write!(f, "transport error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Error::Transport(err)
    }
}

/// A [`Result`](std::result::Result) with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Client
////////////////////////////////////////////////////////////////////////////////////////

/// A client for the IGV batch port.
///
/// A [`Client`] holds no connection and no mutable state, so calls are
/// independent of one another. Callers that issue commands from more than one
/// thread must serialize them themselves.
#[derive(Clone, Debug)]
pub struct Client<C = Tcp>
where
    C: Connect,
{
    /// The host.
    host: String,

    /// The port.
    port: u16,

    /// The timeout for commands.
    timeout: Duration,

    /// The timeout for the liveness probe.
    probe_timeout: Duration,

    /// Whether or not to end every command with a new line.
    newline: bool,

    /// The connector.
    connector: C,
}

impl<C> Client<C>
where
    C: Connect,
{
    /// Gets the host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Gets the port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Gets the timeout for commands.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Gets the timeout for the liveness probe.
    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// Sends a raw command and returns the raw response.
    ///
    /// The connection is closed before this returns, whether or not the
    /// exchange succeeded.
    pub fn send_command(&self, command: &str) -> Result<String> {
        self.exchange(command, self.timeout)
    }

    /// Sends a [`Command`] and returns whether the response reports success.
    ///
    /// The liveness probe ([`Command::Echo`]) uses the probe timeout; every
    /// other command uses the regular timeout.
    pub fn command(&self, command: &Command) -> Result<bool> {
        let timeout = match command {
            Command::Echo => self.probe_timeout,
            _ => self.timeout,
        };

        let response = self.exchange(&command.to_string(), timeout)?;
        Ok(command.is_success(&response))
    }

    /// Checks whether the application is reachable and answering.
    ///
    /// Sends `echo` and returns `true` if the response starts with `echo`.
    pub fn is_alive(&self) -> Result<bool> {
        self.command(&Command::Echo)
    }

    /// Moves the viewport to `locus` (e.g., `chr1:123456`).
    ///
    /// Sends `goto <locus>` and returns `true` if the response starts with
    /// `OK`.
    pub fn jump_to(&self, locus: &str) -> Result<bool> {
        self.command(&Command::Goto(locus.to_string()))
    }

    /// Moves the viewport to a [`Variant`].
    pub fn goto_variant(&self, variant: &Variant) -> Result<bool> {
        self.jump_to(&variant.locus())
    }

    /// Loads the file at `path`.
    ///
    /// Sends `load <path>` and returns `true` if the response starts with `OK`.
    pub fn load_file(&self, path: &str) -> Result<bool> {
        self.command(&Command::Load(path.to_string()))
    }

    /// Carries out a single exchange on a fresh connection.
    fn exchange(&self, command: &str, timeout: Duration) -> Result<String> {
        if !command.is_ascii() {
            return Err(Error::InvalidCommand(command.to_string()));
        }

        debug!("{}:{}: sending `{command}`", self.host, self.port);

        let mut payload = command.as_bytes().to_vec();
        if self.newline {
            payload.push(b'\n');
        }

        let mut connection = Connection::open(&self.connector, &self.host, self.port, timeout)
            .map_err(TransportError::Connect)?;
        let response = connection.exchange(&payload)?;
        drop(connection);

        debug!(
            "{}:{}: received `{}`",
            self.host,
            self.port,
            response.trim_end()
        );

        Ok(response)
    }
}

impl Default for Client<Tcp> {
    fn default() -> Self {
        Builder::default().build()
    }
}
