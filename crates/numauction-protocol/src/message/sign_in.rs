//! Sign-in: the client names itself and the server acknowledges.

use serde::de::{self, Deserializer, Unexpected};
use serde::{Deserialize, Serialize};

use super::HasRequestId;
use crate::ids::{RequestId, PLAYER_NAME_MAX_LENGTH};

/// Returns `true` if `name` is 1 to [`PLAYER_NAME_MAX_LENGTH`] UTF-16 code
/// units long.
pub fn is_valid_player_name(name: &str) -> bool {
    !name.is_empty() && name.encode_utf16().count() <= PLAYER_NAME_MAX_LENGTH
}

fn bounded_player_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    if !is_valid_player_name(&name) {
        return Err(de::Error::invalid_value(
            Unexpected::Str(&name),
            &"1 to 64 UTF-16 code units",
        ));
    }
    Ok(name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSignIn {
    pub request_id: RequestId,
    #[serde(deserialize_with = "bounded_player_name")]
    pub player_name: String,
}

impl RequestSignIn {
    /// The name is not checked here; an out-of-bound name simply fails to
    /// parse on the receiving side.
    pub fn new(request_id: RequestId, player_name: impl Into<String>) -> Self {
        Self {
            request_id,
            player_name: player_name.into(),
        }
    }
}

impl HasRequestId for RequestSignIn {
    fn request_id(&self) -> &RequestId {
        &self.request_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSignIn {
    pub request_id: RequestId,
}

impl ResponseSignIn {
    pub fn new(request_id: RequestId) -> Self {
        Self { request_id }
    }
}

impl HasRequestId for ResponseSignIn {
    fn request_id(&self) -> &RequestId {
        &self.request_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Variant;
    use serde_json::{json, Value};

    fn sign_in(name: &str) -> Value {
        json!({"type": "ReQsIgNiN", "requestId": 1, "playerName": name})
    }

    #[test]
    fn test_request_sign_in_wire_shape() {
        assert_eq!(
            RequestSignIn::new(RequestId::new(1), "Alice").to_plain(),
            sign_in("Alice")
        );
    }

    #[test]
    fn test_request_sign_in_round_trip() {
        let msg = RequestSignIn::new(RequestId::new(1), "Alice");
        assert_eq!(RequestSignIn::parse(&msg.to_plain()), Some(msg));
    }

    #[test]
    fn test_request_sign_in_name_bounds() {
        assert!(!RequestSignIn::is_valid(&sign_in("")));
        assert!(RequestSignIn::is_valid(&sign_in("a")));
        assert!(RequestSignIn::is_valid(&sign_in(&"a".repeat(64))));
        assert!(!RequestSignIn::is_valid(&sign_in(&"a".repeat(65))));
    }

    #[test]
    fn test_player_name_bound_counts_utf16_units() {
        // U+1F600 is one char but two UTF-16 code units.
        let emoji = "\u{1F600}";
        assert!(is_valid_player_name(&emoji.repeat(32)));
        assert!(!is_valid_player_name(&emoji.repeat(33)));
        // 'é' is two UTF-8 bytes but one UTF-16 unit.
        assert!(is_valid_player_name(&"é".repeat(64)));
    }

    #[test]
    fn test_request_sign_in_requires_request_id() {
        let plain = json!({"type": "ReQsIgNiN", "playerName": "Alice"});
        assert!(!RequestSignIn::is_valid(&plain));
        let plain = json!({"type": "ReQsIgNiN", "requestId": "1", "playerName": "Alice"});
        assert!(!RequestSignIn::is_valid(&plain));
        let plain = json!({"type": "ReQsIgNiN", "requestId": null, "playerName": "Alice"});
        assert!(!RequestSignIn::is_valid(&plain));
    }

    #[test]
    fn test_request_id_may_be_negative_or_fractional() {
        for id in [json!(-1), json!(1.5), json!(4294967296u64)] {
            let plain = json!({"type": "ReQsIgNiN", "requestId": id, "playerName": "Alice"});
            let msg = RequestSignIn::parse(&plain).expect("any number is a request id");
            assert_eq!(msg.to_plain(), plain);
        }
    }

    #[test]
    fn test_response_sign_in_wire_shape() {
        let msg = ResponseSignIn::new(RequestId::new(12));
        assert_eq!(msg.to_plain(), json!({"type": "ReSsIgNiN", "requestId": 12}));
        assert_eq!(ResponseSignIn::parse(&msg.to_plain()), Some(msg));
    }

    #[test]
    fn test_response_sign_in_negative_request_id() {
        let plain = json!({"type": "ReSsIgNiN", "requestId": -1});
        let msg = ResponseSignIn::parse(&plain).unwrap();
        assert_eq!(msg.request_id.as_number().as_i64(), Some(-1));
    }
}
