//! Connections scoped to a single command/response exchange.
//!
//! A [`Connection`] is opened right before a command is sent and is closed
//! when it goes out of scope, whether the exchange succeeded or not. Nothing is
//! kept open between commands.

use std::io;
use std::io::Read;
use std::io::Write;
use std::net::Shutdown;
use std::net::TcpStream;
use std::net::ToSocketAddrs as _;
use std::time::Duration;

use tracing::trace;

use crate::client::TransportError;

/// The maximum number of bytes read as a response.
pub const RESPONSE_BUFFER_SIZE: usize = 1024;

/// A bidirectional stream that can be closed.
pub trait Stream: Read + Write {
    /// Closes the stream.
    fn close(&mut self) -> io::Result<()>;
}

impl Stream for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}

/// A facility for opening [`Stream`]s.
pub trait Connect {
    /// The type of stream opened.
    type Stream: Stream;

    /// Opens a stream to `host:port`.
    ///
    /// Both connecting and every subsequent read or write on the stream must
    /// give up after `timeout`.
    fn connect(&self, host: &str, port: u16, timeout: Duration) -> io::Result<Self::Stream>;
}

/// Opens plain TCP connections.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tcp;

impl Connect for Tcp {
    type Stream = TcpStream;

    fn connect(&self, host: &str, port: u16, timeout: Duration) -> io::Result<TcpStream> {
        let mut last_err = None;

        for addr in (host, port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(timeout))?;
                    stream.set_write_timeout(Some(timeout))?;
                    stream.set_nodelay(true)?;
                    return Ok(stream);
                }
                Err(err) => {
                    trace!("connecting to {addr}: {err}");
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("no addresses found for {host}:{port}"),
            )
        }))
    }
}

/// A connection that lives for exactly one exchange.
///
/// The underlying stream is closed when the connection is dropped.
#[derive(Debug)]
pub struct Connection<S>
where
    S: Stream,
{
    /// The stream.
    stream: S,
}

impl<S> Connection<S>
where
    S: Stream,
{
    /// Opens a connection with `connector`.
    pub fn open<C>(connector: &C, host: &str, port: u16, timeout: Duration) -> io::Result<Self>
    where
        C: Connect<Stream = S>,
    {
        connector
            .connect(host, port, timeout)
            .map(|stream| Self { stream })
    }

    /// Writes `payload` and reads the response.
    ///
    /// The response is whatever a single read returns, up to
    /// [`RESPONSE_BUFFER_SIZE`] bytes. An empty response means the peer hung up
    /// without answering. Bytes that are not valid UTF-8 are replaced rather
    /// than rejected.
    pub fn exchange(&mut self, payload: &[u8]) -> Result<String, TransportError> {
        self.stream
            .write_all(payload)
            .and_then(|_| self.stream.flush())
            .map_err(TransportError::Write)?;

        let mut buffer = [0u8; RESPONSE_BUFFER_SIZE];

        let n = loop {
            match self.stream.read(&mut buffer) {
                Ok(n) => break n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(TransportError::Read(err)),
            }
        };

        Ok(String::from_utf8_lossy(&buffer[..n]).into_owned())
    }
}

impl<S> Drop for Connection<S>
where
    S: Stream,
{
    fn drop(&mut self) {
        // The peer often hangs up first, so a failed close is expected.
        if let Err(err) = self.stream.close() {
            trace!("closing connection: {err}");
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! An in-memory [`Connect`] implementation for tests.

    use std::cell::Cell;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;

    use super::*;

    /// What the mock peer does once it receives a command.
    #[derive(Clone, Debug)]
    pub(crate) enum Behavior {
        /// Replies with the given bytes.
        Reply(&'static [u8]),

        /// Fails the read with the given error kind.
        FailRead(io::ErrorKind),

        /// Refuses the connection.
        Refuse,
    }

    /// The shared state of a mock peer.
    #[derive(Debug, Default)]
    pub(crate) struct State {
        /// Every payload written, one per connection.
        pub(crate) written: RefCell<Vec<Vec<u8>>>,

        /// The number of connections opened.
        pub(crate) opened: Cell<usize>,

        /// The number of connections closed.
        pub(crate) closed: Cell<usize>,
    }

    /// A mock connector.
    #[derive(Clone, Debug)]
    pub(crate) struct MockConnector {
        /// The peer behavior.
        pub(crate) behavior: Behavior,

        /// The shared state.
        pub(crate) state: Rc<State>,
    }

    impl MockConnector {
        /// Creates a new [`MockConnector`].
        pub(crate) fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                state: Rc::new(State::default()),
            }
        }
    }

    /// A mock stream.
    #[derive(Debug)]
    pub(crate) struct MockStream {
        /// The bytes the peer replies with.
        reply: Cursor<&'static [u8]>,

        /// The read failure, if any.
        fail_read: Option<io::ErrorKind>,

        /// The bytes written on this connection.
        written: Vec<u8>,

        /// The shared state.
        state: Rc<State>,
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.fail_read {
                Some(kind) => Err(io::Error::from(kind)),
                None => self.reply.read(buf),
            }
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Stream for MockStream {
        fn close(&mut self) -> io::Result<()> {
            self.state
                .written
                .borrow_mut()
                .push(std::mem::take(&mut self.written));
            self.state.closed.set(self.state.closed.get() + 1);
            Ok(())
        }
    }

    impl Connect for MockConnector {
        type Stream = MockStream;

        fn connect(&self, _: &str, _: u16, _: Duration) -> io::Result<MockStream> {
            let (reply, fail_read): (&'static [u8], _) = match self.behavior {
                Behavior::Reply(reply) => (reply, None),
                Behavior::FailRead(kind) => (b"", Some(kind)),
                Behavior::Refuse => return Err(io::Error::from(io::ErrorKind::ConnectionRefused)),
            };

            self.state.opened.set(self.state.opened.get() + 1);

            Ok(MockStream {
                reply: Cursor::new(reply),
                fail_read,
                written: Vec::new(),
                state: self.state.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::Behavior;
    use super::mock::MockConnector;
    use super::*;

    fn open(connector: &MockConnector) -> Connection<mock::MockStream> {
        Connection::open(connector, "localhost", 60151, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_exchange_closes_on_drop() -> Result<(), Box<dyn std::error::Error>> {
        let connector = MockConnector::new(Behavior::Reply(b"echo"));

        {
            let mut connection = open(&connector);
            assert_eq!(connection.exchange(b"echo")?, "echo");
            assert_eq!(connector.state.closed.get(), 0);
        }

        assert_eq!(connector.state.closed.get(), 1);
        assert_eq!(*connector.state.written.borrow(), vec![b"echo".to_vec()]);

        Ok(())
    }

    #[test]
    fn test_exchange_closes_on_error() {
        let connector = MockConnector::new(Behavior::FailRead(io::ErrorKind::ConnectionReset));

        {
            let mut connection = open(&connector);
            let err = connection.exchange(b"echo").unwrap_err();
            assert!(matches!(err, TransportError::Read(_)));
        }

        assert_eq!(connector.state.opened.get(), 1);
        assert_eq!(connector.state.closed.get(), 1);
    }

    #[test]
    fn test_empty_response_on_hang_up() -> Result<(), Box<dyn std::error::Error>> {
        let connector = MockConnector::new(Behavior::Reply(b""));
        let mut connection = open(&connector);
        assert_eq!(connection.exchange(b"goto chr1:1")?, "");
        Ok(())
    }

    #[test]
    fn test_response_is_bounded() -> Result<(), Box<dyn std::error::Error>> {
        static LONG: [u8; 2048] = [b'x'; 2048];

        let connector = MockConnector::new(Behavior::Reply(&LONG));
        let mut connection = open(&connector);
        assert_eq!(connection.exchange(b"echo")?.len(), RESPONSE_BUFFER_SIZE);
        Ok(())
    }

    #[test]
    fn test_refused_connection_opens_nothing() {
        let connector = MockConnector::new(Behavior::Refuse);
        let err = Connection::open(&connector, "localhost", 1, Duration::from_secs(1)).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::ConnectionRefused);
        assert_eq!(connector.state.opened.get(), 0);
        assert_eq!(connector.state.closed.get(), 0);
    }
}
