//! A builder for a [`Client`].

use std::time::Duration;

use crate::client::Client;
use crate::client::DEFAULT_HOST;
use crate::client::DEFAULT_PORT;
use crate::client::DEFAULT_PROBE_TIMEOUT;
use crate::client::DEFAULT_TIMEOUT;
use crate::client::Tcp;
use crate::client::connection::Connect;

/// A builder for a [`Client`].
///
/// Every field is optional. Unset fields fall back to
/// [`DEFAULT_HOST`], [`DEFAULT_PORT`], [`DEFAULT_TIMEOUT`], and
/// [`DEFAULT_PROBE_TIMEOUT`].
#[derive(Clone, Debug, Default)]
pub struct Builder {
    /// The host.
    host: Option<String>,

    /// The port.
    port: Option<u16>,

    /// The timeout for commands.
    timeout: Option<Duration>,

    /// The timeout for the liveness probe.
    probe_timeout: Option<Duration>,

    /// Whether or not to end every command with a new line.
    newline: bool,
}

impl Builder {
    /// Sets the host.
    ///
    /// An empty host means [`DEFAULT_HOST`].
    ///
    /// # Examples
    ///
    /// ```
    /// use igvcontrol::client::Builder;
    ///
    /// let client = Builder::default().host("").build();
    /// assert_eq!(client.host(), "localhost");
    ///
    /// let client = Builder::default().host("10.0.0.2").build();
    /// assert_eq!(client.host(), "10.0.0.2");
    /// ```
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the timeout for connecting and for each read or write.
    ///
    /// A zero timeout is ignored.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout used by the liveness probe.
    ///
    /// This is usually longer than the regular timeout so that a
    /// cold-starting application has time to answer. A zero timeout is
    /// ignored.
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = Some(timeout);
        self
    }

    /// Sets whether or not every command is terminated with a new line.
    ///
    /// Commands are sent without any framing by default.
    pub fn newline(mut self, value: bool) -> Self {
        self.newline = value;
        self
    }

    /// Builds a [`Client`] that connects over plain TCP.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use igvcontrol::client::Builder;
    ///
    /// let client = Builder::default()
    ///     .port(60152)
    ///     .timeout(Duration::from_millis(500))
    ///     .build();
    ///
    /// assert_eq!(client.host(), "localhost");
    /// assert_eq!(client.port(), 60152);
    /// assert_eq!(client.timeout(), Duration::from_millis(500));
    /// assert_eq!(client.probe_timeout(), Duration::from_secs(5));
    /// ```
    pub fn build(self) -> Client<Tcp> {
        self.build_with(Tcp)
    }

    /// Builds a [`Client`] that opens its connections with `connector`.
    pub fn build_with<C>(self, connector: C) -> Client<C>
    where
        C: Connect,
    {
        let host = self
            .host
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        Client {
            host,
            port: self.port.unwrap_or(DEFAULT_PORT),
            timeout: non_zero(self.timeout).unwrap_or(DEFAULT_TIMEOUT),
            probe_timeout: non_zero(self.probe_timeout).unwrap_or(DEFAULT_PROBE_TIMEOUT),
            newline: self.newline,
            connector,
        }
    }
}

/// Filters out zero durations, which sockets reject as timeouts.
fn non_zero(duration: Option<Duration>) -> Option<Duration> {
    duration.filter(|duration| !duration.is_zero())
}
