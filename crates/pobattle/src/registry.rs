//! Server-list registry.
//!
//! The registry speaks a three-event subset of the protocol over the same
//! framing: an announcement, one `PlayersList` frame per listed server,
//! and `ServerListEnd` once the list is complete.

use pobattle_protocol::{Cursor, EventKind, Profile, ProtocolResult, WireCodec, Writer};
use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

/// One server as listed by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    pub name: String,
    pub description: String,
    pub players: i16,
    pub ip: String,
    pub max_players: i16,
    pub port: i16,
    pub password_protected: bool,
}

impl WireCodec for ServerEntry {
    fn decode(c: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            name: c.read_string()?,
            description: c.read_string()?,
            players: c.read_i16()?,
            ip: c.read_string()?,
            max_players: c.read_i16()?,
            port: c.read_i16()?,
            password_protected: c.read_i8()? != 0,
        })
    }

    fn encode(&self, w: &mut Writer) -> ProtocolResult<()> {
        w.write_string(&self.name)?;
        w.write_string(&self.description)?;
        w.write_i16(self.players);
        w.write_string(&self.ip)?;
        w.write_i16(self.max_players);
        w.write_i16(self.port);
        w.write_i8(i8::from(self.password_protected));
        Ok(())
    }
}

impl ServerEntry {
    /// The port as the unsigned number it really is.
    pub fn port(&self) -> u16 {
        self.port as u16
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    Announcement(String),
    Server(ServerEntry),
    ServerListEnd,
}

#[allow(unused_variables)]
pub trait RegistryObserver {
    fn on_announcement(&mut self, text: &str) {}
    fn on_server(&mut self, server: &ServerEntry) {}
    fn on_server_list_end(&mut self) {}
    /// A frame the registry protocol doesn't define, or a malformed one.
    fn on_registry_error(&mut self, error: &DispatchError) {}
}

/// Decodes registry frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryDispatcher {
    profile: Profile,
}

impl RegistryDispatcher {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }

    pub fn decode_frame(&self, body: &[u8]) -> Result<RegistryEvent, DispatchError> {
        let (&id, payload) = body.split_first().ok_or(DispatchError::EmptyFrame)?;
        let kind = EventKind::from_id(id).ok_or_else(|| DispatchError::UnknownEvent {
            id,
            payload: payload.to_vec(),
        })?;
        let mut c = Cursor::new(payload, self.profile);
        let malformed = |source| DispatchError::Malformed { event: kind, source };
        match kind {
            EventKind::Announcement => Ok(RegistryEvent::Announcement(
                c.read_string().map_err(malformed)?,
            )),
            EventKind::PlayersList => Ok(RegistryEvent::Server(
                ServerEntry::decode(&mut c).map_err(malformed)?,
            )),
            EventKind::ServerListEnd => Ok(RegistryEvent::ServerListEnd),
            _ => Err(DispatchError::NotImplemented {
                event: kind,
                payload: payload.to_vec(),
            }),
        }
    }

    pub fn on_frame<O>(&self, body: &[u8], observer: &mut O) -> Result<RegistryEvent, DispatchError>
    where
        O: RegistryObserver + ?Sized,
    {
        let result = self.decode_frame(body);
        match &result {
            Ok(RegistryEvent::Announcement(text)) => observer.on_announcement(text),
            Ok(RegistryEvent::Server(server)) => observer.on_server(server),
            Ok(RegistryEvent::ServerListEnd) => observer.on_server_list_end(),
            Err(e) => {
                tracing::debug!(error = %e, "registry frame not dispatched");
                observer.on_registry_error(e);
            }
        }
        result
    }
}
