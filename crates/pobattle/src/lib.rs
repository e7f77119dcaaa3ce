//! # pobattle
//!
//! Client for the Pokemon Online battle server.
//!
//! The client connects over TCP, sends [`Command`]s, and turns every
//! inbound frame into a [`NetworkEvent`]. Events are reported to a
//! [`NetworkObserver`] the application implements; battle traffic is
//! decoded a second time into [`BattleCommand`]s and reported through
//! the [`BattleObserver`] half of the same trait.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pobattle::prelude::*;
//!
//! struct Printer;
//!
//! impl BattleObserver for Printer {
//!     fn on_battle_use_attack(&mut self, battle: BattleId, spot: u8, attack: u16) {
//!         println!("{battle}: spot {spot} used move {attack}");
//!     }
//! }
//!
//! impl NetworkObserver for Printer {
//!     fn on_announcement(&mut self, text: &str) {
//!         println!("{text}");
//!     }
//! }
//!
//! # async fn demo() -> Result<(), ClientError> {
//! let mut client = Client::builder().addr("127.0.0.1:5080").connect().await?;
//! client.login("Red").await?;
//! client.run(&mut Printer).await
//! # }
//! ```
//!
//! The wire layer lives in [`protocol`] and can be used on its own.

mod client;
mod error;

pub mod battle;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod event;
pub mod observer;
pub mod registry;
pub mod state;

pub use pobattle_protocol as protocol;

pub use battle::{BattleCommand, BattleMessage, TempPokeChange};
pub use client::{Client, ClientBuilder};
pub use command::{Command, LoginRequest};
pub use config::ClientConfig;
pub use dispatch::Dispatcher;
pub use error::{ClientError, DispatchError};
pub use event::NetworkEvent;
pub use observer::{BattleObserver, NetworkObserver, NullObserver};
pub use pobattle_protocol::ProtocolError;
pub use registry::{RegistryDispatcher, RegistryEvent, RegistryObserver, ServerEntry};
pub use state::ClientState;

/// Convenience re-exports for writing a client.
pub mod prelude {
    pub use crate::{
        BattleCommand, BattleObserver, Client, ClientBuilder, ClientConfig, ClientError,
        ClientState, Command, DispatchError, LoginRequest, NetworkEvent, NetworkObserver,
        NullObserver,
    };
    pub use pobattle_protocol::{
        BattleChoice, BattleId, BattleResult, ChannelId, ChoiceAction, EventKind, PlayerId,
        Profile,
    };
}
