//! Frames and envelopes.
//!
//! A frame is `length | body` where the length prefix width comes from the
//! [`Profile`]. The body of every frame is an [`Envelope`]: one event id
//! byte followed by that event's arguments.

use serde::{Deserialize, Serialize};

use crate::profile::LengthPrefix;
use crate::{Profile, ProtocolError, ProtocolResult, Writer};

/// Event id plus the bytes that follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub event_id: u8,
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn new(event_id: u8, payload: Vec<u8>) -> Self {
        Self { event_id, payload }
    }

    /// Splits a frame body into its event id and payload.
    pub fn from_body(body: &[u8]) -> ProtocolResult<Self> {
        let (&event_id, payload) = body.split_first().ok_or(ProtocolError::BufferUnderrun {
            needed: 1,
            available: 0,
        })?;
        Ok(Self {
            event_id,
            payload: payload.to_vec(),
        })
    }

    /// The frame body: event id followed by the payload.
    pub fn to_body(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(1 + self.payload.len());
        body.push(self.event_id);
        body.extend_from_slice(&self.payload);
        body
    }

    /// Prefixes the body with its length, ready for the transport.
    pub fn to_frame(&self, profile: Profile) -> ProtocolResult<Vec<u8>> {
        encode_frame(profile, &self.to_body())
    }
}

/// Largest body a frame may carry under `profile`.
pub fn max_body_len(profile: Profile) -> usize {
    profile.frame_length.max_len().min(profile.max_frame_len)
}

/// Prefixes `body` with its length in the profile's prefix width.
pub fn encode_frame(profile: Profile, body: &[u8]) -> ProtocolResult<Vec<u8>> {
    let max = max_body_len(profile);
    if body.len() > max {
        return Err(ProtocolError::FrameTooLarge {
            len: body.len(),
            max,
        });
    }
    let mut w = Writer::with_capacity(profile, profile.frame_length.width() + body.len());
    // Both casts are bounded by the check above.
    match profile.frame_length {
        LengthPrefix::U16 => w.write_u16(body.len() as u16),
        LengthPrefix::U32 => w.write_u32(body.len() as u32),
    }
    w.write_raw(body);
    Ok(w.into_bytes())
}

/// Parses a length prefix of exactly `profile.frame_length.width()` bytes
/// and checks it against the frame size limit.
pub fn decode_frame_len(profile: Profile, header: &[u8]) -> ProtocolResult<usize> {
    let width = profile.frame_length.width();
    if header.len() < width {
        return Err(ProtocolError::BufferUnderrun {
            needed: width,
            available: header.len(),
        });
    }
    let len = match profile.frame_length {
        LengthPrefix::U16 => usize::from(u16::from_be_bytes([header[0], header[1]])),
        LengthPrefix::U32 => {
            u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize
        }
    };
    let max = max_body_len(profile);
    if len > max {
        return Err(ProtocolError::FrameTooLarge { len, max });
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_profile_uses_four_byte_prefix() {
        let frame = Envelope::new(12, vec![]).to_frame(Profile::current()).unwrap();
        assert_eq!(frame, vec![0, 0, 0, 1, 12]);
    }

    #[test]
    fn test_legacy_profile_uses_two_byte_prefix() {
        let frame = encode_frame(Profile::legacy(), &[3, 0, 0, 0, 9]).unwrap();
        assert_eq!(frame, vec![0, 5, 3, 0, 0, 0, 9]);
        assert_eq!(decode_frame_len(Profile::legacy(), &frame[..2]).unwrap(), 5);
    }

    #[test]
    fn test_oversized_length_is_rejected() {
        let profile = Profile {
            max_frame_len: 16,
            ..Profile::current()
        };
        assert_eq!(
            decode_frame_len(profile, &[0, 0, 0, 17]),
            Err(ProtocolError::FrameTooLarge { len: 17, max: 16 })
        );
        assert!(encode_frame(profile, &[0; 17]).is_err());
    }

    #[test]
    fn test_envelope_from_body() {
        let env = Envelope::from_body(&[38, 1, 2]).unwrap();
        assert_eq!(env.event_id, 38);
        assert_eq!(env.payload, vec![1, 2]);
        assert_eq!(env.to_body(), vec![38, 1, 2]);
        assert!(Envelope::from_body(&[]).is_err());
    }
}
