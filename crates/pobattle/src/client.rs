//! `Client` builder and receive loop.
//!
//! This is the entry point for talking to a battle server. It ties the
//! layers together: transport → dispatcher → state → observer.

use std::time::Duration;

use pobattle_protocol::Profile;
use pobattle_transport::{Connection, TcpConnection};

use crate::command::Command;
use crate::config::ClientConfig;
use crate::dispatch::Dispatcher;
use crate::event::NetworkEvent;
use crate::observer::NetworkObserver;
use crate::state::ClientState;
use crate::ClientError;

/// Builder for configuring and connecting a [`Client`].
///
/// # Example
///
/// ```rust,no_run
/// use pobattle::prelude::*;
///
/// # async fn demo() -> Result<(), ClientError> {
/// let mut client = Client::builder()
///     .addr("127.0.0.1:5080")
///     .connect()
///     .await?;
/// client.login("Red").await?;
/// client.run(&mut NullObserver).await
/// # }
/// ```
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Replaces every setting with `config`.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the server address, `host:port`.
    pub fn addr(mut self, addr: &str) -> Self {
        self.config.addr = addr.to_string();
        self
    }

    /// Sets the wire profile.
    pub fn profile(mut self, profile: Profile) -> Self {
        self.config.profile = profile;
        self
    }

    /// Sets how long the receive loop waits for a frame.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Opens the TCP connection.
    pub async fn connect(self) -> Result<Client, ClientError> {
        let conn = TcpConnection::connect(&self.config.addr, self.config.profile).await?;
        Ok(Client::from_connection(conn, self.config))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A connected client.
///
/// Commands go out through [`send`](Self::send). Inbound frames are
/// handled by [`run`](Self::run), which keeps [`state`](Self::state) up to
/// date and reports every frame to an observer.
pub struct Client<C: Connection = TcpConnection> {
    conn: C,
    dispatcher: Dispatcher,
    config: ClientConfig,
    state: ClientState,
}

impl Client {
    /// Creates a new builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl<C> Client<C>
where
    C: Connection,
    ClientError: From<C::Error>,
{
    /// Wraps an open connection. The connection must frame traffic with
    /// the same profile as `config`.
    pub fn from_connection(conn: C, config: ClientConfig) -> Self {
        Self {
            conn,
            dispatcher: Dispatcher::new(config.profile),
            config,
            state: ClientState::new(),
        }
    }

    pub fn profile(&self) -> Profile {
        self.config.profile
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// What the client has learned from the events seen so far.
    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// Encodes and sends one command.
    ///
    /// # Errors
    /// A command that can't be encoded is returned as
    /// [`ClientError::Protocol`] and nothing is sent.
    pub async fn send(&self, command: &Command) -> Result<(), ClientError> {
        let envelope = command.encode(self.config.profile)?;
        tracing::debug!(command = %command.kind(), len = envelope.payload.len(), "sending");
        self.conn.send(&envelope.to_body()).await?;
        Ok(())
    }

    /// Logs in as `name` with the configured client identity.
    pub async fn login(&self, name: &str) -> Result<(), ClientError> {
        self.send(&Command::login(self.config.login_request(name)))
            .await
    }

    /// Receives and dispatches frames until the server closes the
    /// connection.
    ///
    /// Each decoded event is folded into [`state`](Self::state) before
    /// the observer hears about it. Frames that don't decode are reported
    /// to the observer and skipped.
    ///
    /// # Errors
    /// Returns [`ClientError::IdleTimeout`] if nothing arrives within the
    /// idle timeout, or the transport error that ended the stream.
    pub async fn run<O>(&mut self, observer: &mut O) -> Result<(), ClientError>
    where
        O: NetworkObserver + ?Sized,
    {
        let conn_id = self.conn.id();
        let idle = self.config.idle_timeout();
        tracing::info!(%conn_id, "client running");

        loop {
            let data = match tokio::time::timeout(idle, self.conn.recv()).await {
                Ok(Ok(Some(data))) => data,
                Ok(Ok(None)) => {
                    tracing::info!(%conn_id, "connection closed cleanly");
                    return Ok(());
                }
                Ok(Err(e)) => {
                    tracing::debug!(%conn_id, error = %e, "recv error");
                    return Err(e.into());
                }
                Err(_) => {
                    tracing::info!(%conn_id, "connection timed out");
                    return Err(ClientError::IdleTimeout(idle));
                }
            };
            self.handle_frame(&data, observer);
        }
    }

    /// Decodes one frame body, updates the state and notifies `observer`.
    pub fn handle_frame<O>(&mut self, body: &[u8], observer: &mut O) -> Option<NetworkEvent>
    where
        O: NetworkObserver + ?Sized,
    {
        match self.dispatcher.decode_frame(body) {
            Ok(event) => {
                if let NetworkEvent::VersionControl(info) = &event {
                    for warning in info.compat_warnings(self.config.protocol_version) {
                        tracing::warn!(server = %info.server_name, "{warning}");
                    }
                }
                self.state.apply(&event);
                self.dispatcher.notify(&event, observer);
                Some(event)
            }
            Err(err) => {
                self.dispatcher.report(&err, observer);
                None
            }
        }
    }

    /// Shuts down our side of the connection.
    pub async fn close(&self) -> Result<(), ClientError> {
        self.conn.close().await?;
        Ok(())
    }
}
