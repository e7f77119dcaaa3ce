//! Client configuration.

use std::time::Duration;

use pobattle_protocol::{Profile, ProtocolVersion};
use serde::{Deserialize, Deserializer, Serialize};

use crate::command::{
    LoginRequest, DEFAULT_CHANNEL, DEFAULT_CLIENT_TYPE, DEFAULT_CLIENT_VERSION,
};
use crate::ClientError;

/// Settings for connecting and logging in.
///
/// Every field has a default, so a config file only needs the values it
/// changes. `profile` may be given by name (`"current"`, `"legacy"`) or
/// spelled out field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server address, `host:port`.
    pub addr: String,
    #[serde(deserialize_with = "profile_by_name_or_value")]
    pub profile: Profile,
    pub client_type: String,
    pub client_version: u16,
    pub protocol_version: ProtocolVersion,
    /// Channel to join at login. `null` lets the server pick.
    pub default_channel: Option<String>,
    pub additional_channels: Vec<String>,
    /// Milliseconds without any frame before the client gives up. The
    /// server sends keep-alives, so silence means the link is dead.
    pub idle_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:5080".to_string(),
            profile: Profile::current(),
            client_type: DEFAULT_CLIENT_TYPE.to_string(),
            client_version: DEFAULT_CLIENT_VERSION,
            protocol_version: ProtocolVersion::default(),
            default_channel: Some(DEFAULT_CHANNEL.to_string()),
            additional_channels: Vec::new(),
            idle_timeout_ms: 60_000,
        }
    }
}

impl ClientConfig {
    /// Parses a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, ClientError> {
        serde_json::from_str(json).map_err(|e| ClientError::Config(e.to_string()))
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    /// A login request for `name` carrying this config's client identity
    /// and channels.
    pub fn login_request(&self, name: impl Into<String>) -> LoginRequest {
        let mut request = LoginRequest::new(name);
        request.version = self.protocol_version;
        request.client_type = Some(self.client_type.clone());
        request.client_version = Some(self.client_version);
        request.default_channel = self.default_channel.clone();
        request.additional_channels = self.additional_channels.clone();
        request
    }
}

fn profile_by_name_or_value<'de, D>(deserializer: D) -> Result<Profile, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Setting {
        Named(String),
        Explicit(Profile),
    }

    match Setting::deserialize(deserializer)? {
        Setting::Named(name) => Profile::by_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown profile {name:?}"))),
        Setting::Explicit(profile) => Ok(profile),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pobattle_protocol::{LengthPrefix, TextEncoding};

    #[test]
    fn test_empty_document_gives_defaults() {
        assert_eq!(
            ClientConfig::from_json_str("{}").unwrap(),
            ClientConfig::default()
        );
    }

    #[test]
    fn test_profile_by_name() {
        let config = ClientConfig::from_json_str(r#"{"profile": "legacy"}"#).unwrap();
        assert_eq!(config.profile, Profile::legacy());
        assert_eq!(config.profile.text_encoding, TextEncoding::Utf16Be);
    }

    #[test]
    fn test_profile_spelled_out() {
        let config =
            ClientConfig::from_json_str(r#"{"profile": {"frame_length": "u16"}}"#).unwrap();
        assert_eq!(config.profile.frame_length, LengthPrefix::U16);
        assert_eq!(config.profile.text_encoding, TextEncoding::Utf8);
    }

    #[test]
    fn test_unknown_profile_name_is_rejected() {
        let err = ClientConfig::from_json_str(r#"{"profile": "ancient"}"#).unwrap_err();
        assert!(err.to_string().contains("ancient"));
    }

    #[test]
    fn test_default_login_asks_for_default_channel() {
        let req = ClientConfig::default().login_request("Gold");
        assert_eq!(req.default_channel.as_deref(), Some(DEFAULT_CHANNEL));

        let config = ClientConfig::from_json_str(r#"{"default_channel": null}"#).unwrap();
        assert_eq!(config.login_request("Gold").default_channel, None);
    }

    #[test]
    fn test_login_request_uses_config() {
        let config = ClientConfig {
            default_channel: Some("Lobby".into()),
            ..ClientConfig::default()
        };
        let req = config.login_request("Gold");
        assert_eq!(req.name, "Gold");
        assert_eq!(req.default_channel.as_deref(), Some("Lobby"));
        assert_eq!(req.client_type.as_deref(), Some(DEFAULT_CLIENT_TYPE));
    }
}
