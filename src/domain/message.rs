//! Wire messages: the sanitized client payload and server notices.
//!
//! Every frame on the socket is a single JSON object. Clients may send any
//! object; only the whitelisted fields of [`SanitizedMessage`] survive and
//! are relayed field-for-field to other sessions.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::session_id::{SERVER_ID, SessionId};
use crate::error::RelayError;

/// `event` value marking a chat line.
pub const CHAT_EVENT: &str = "chatMessage";

/// Display name used on server-authored chat lines.
pub const SERVER_NAME: &str = "[Server]";

/// Projection of an inbound payload onto the recognized fields.
///
/// A field is `Some` exactly when the key was present in the input, even
/// if its value was `null`. Values are carried as-is, with no type
/// coercion or range checks. Unknown keys are discarded during
/// deserialization and absent keys are omitted when serializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedMessage {
    /// Event kind; decides the delivery scope.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub event: Option<Value>,
    /// Position.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub pos: Option<Value>,
    /// Velocity.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub vel: Option<Value>,
    /// Acceleration.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub accl: Option<Value>,
    /// Rotation.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub rot: Option<Value>,
    /// Angular velocity.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub rotv: Option<Value>,
    /// Whether the player is flying.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub is_plane: Option<Value>,
    /// Roll angle.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub roll: Option<Value>,
    /// Pitch angle.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub pitch: Option<Value>,
    /// Pressed input keys.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub keys: Option<Value>,
    /// Client-claimed identifier (relayed untouched).
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Team side.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub side: Option<Value>,
    /// Display name; also renames the sending session.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub net_name: Option<Value>,
    /// Chat text.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

/// Keeps explicit `null` distinguishable from an absent key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl SanitizedMessage {
    /// Parses a text frame and keeps only the whitelisted fields.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Serialization`] if the frame is not JSON and
    /// [`RelayError::MalformedMessage`] if it is JSON but not an object.
    pub fn sanitize(text: &str) -> Result<Self, RelayError> {
        let payload: Value = serde_json::from_str(text)?;
        Self::from_payload(payload)
    }

    /// Projects an already parsed payload onto the whitelist.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::MalformedMessage`] if the payload is not a
    /// JSON object.
    pub fn from_payload(payload: Value) -> Result<Self, RelayError> {
        if !payload.is_object() {
            return Err(RelayError::MalformedMessage(
                "payload must be a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(payload)?)
    }

    /// Returns `true` for chat lines, which are echoed back to the sender.
    #[must_use]
    pub fn is_chat(&self) -> bool {
        matches!(&self.event, Some(Value::String(event)) if event == CHAT_EVENT)
    }

    /// Returns the display name carried by the message, if any.
    ///
    /// Strings are taken verbatim; any other JSON value is rendered as its
    /// JSON text.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.net_name.as_ref().map(|name| match name {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Messages authored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Handshake sent to a newly admitted session alone.
    Hi {
        /// Identifier assigned to the recipient.
        id: SessionId,
    },
    /// Rejection sent when the population cap is reached. No identifier
    /// is ever assigned, so none is sent.
    ServerFull,
    /// System chat line (join/leave announcements).
    ChatMessage {
        /// Always [`SERVER_ID`].
        id: u64,
        /// Always [`SERVER_NAME`].
        #[serde(rename = "netName")]
        net_name: String,
        /// Announcement text.
        message: String,
    },
}

impl ServerMessage {
    /// Builds a server-authored chat announcement.
    #[must_use]
    pub fn announcement(message: String) -> Self {
        Self::ChatMessage {
            id: SERVER_ID,
            net_name: SERVER_NAME.to_string(),
            message,
        }
    }
}
