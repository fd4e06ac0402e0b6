//! Handshake: the server greets every new connection with `Hello` and uses
//! `Error` to reject anything it cannot act on.

use serde::{Deserialize, Serialize};

use crate::ids::ErrorId;
use crate::ProtocolError;

/// Server greeting. Carries a fixed identify string so a client can tell it
/// reached the right kind of server.
///
/// `Hello` has no data of its own, so serde goes through the private
/// [`Greeting`] shape: `into` writes the constant, `try_from` refuses any
/// other string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Greeting", into = "Greeting")]
pub struct Hello;

impl Hello {
    pub const IDENTIFY: &'static str = "WeLcOmE NuMaUcTiOn SeRvEr";
}

#[derive(Serialize, Deserialize)]
struct Greeting {
    identify: String,
}

impl TryFrom<Greeting> for Hello {
    type Error = ProtocolError;

    fn try_from(greeting: Greeting) -> Result<Self, Self::Error> {
        if greeting.identify == Hello::IDENTIFY {
            Ok(Hello)
        } else {
            Err(ProtocolError::InvalidMessage(format!(
                "unexpected identify {:?}",
                greeting.identify
            )))
        }
    }
}

impl From<Hello> for Greeting {
    fn from(_: Hello) -> Self {
        Self {
            identify: Hello::IDENTIFY.into(),
        }
    }
}

/// Tells a client why a prior request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    pub error_id: ErrorId,
}

impl Error {
    pub fn new(error_id: ErrorId) -> Self {
        Self { error_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Variant;
    use serde_json::json;

    #[test]
    fn test_hello_wire_shape() {
        assert_eq!(
            Hello.to_plain(),
            json!({"type": "HeLlO", "identify": "WeLcOmE NuMaUcTiOn SeRvEr"})
        );
    }

    #[test]
    fn test_hello_rejects_wrong_identify() {
        assert!(Hello::parse(&json!({"type": "HeLlO", "identify": "WRONG"})).is_none());
        assert!(Hello::parse(&json!({"type": "HeLlO"})).is_none());
        assert!(Hello::parse(&json!({"type": "HeLlO", "identify": 1})).is_none());
    }

    #[test]
    fn test_hello_mismatch_reason_names_the_string() {
        let err = Hello::try_parse(&json!({"type": "HeLlO", "identify": "WRONG"})).unwrap_err();
        assert!(err.to_string().contains("WRONG"));
    }

    #[test]
    fn test_error_wire_shape() {
        assert_eq!(
            Error::new(ErrorId::InvalidMessage).to_plain(),
            json!({"type": "ErRoR", "errorId": -2})
        );
    }

    #[test]
    fn test_error_accepts_only_declared_ids() {
        let ok = Error::parse(&json!({"type": "ErRoR", "errorId": 0}));
        assert_eq!(ok, Some(Error::new(ErrorId::Unknown)));

        assert!(Error::parse(&json!({"type": "ErRoR", "errorId": 999})).is_none());
        assert!(Error::parse(&json!({"type": "ErRoR", "errorId": "0"})).is_none());
        assert!(Error::parse(&json!({"type": "ErRoR", "errorId": -1.5})).is_none());
    }

    #[test]
    fn test_error_is_checked_against_its_own_tag() {
        assert!(Error::parse(&json!({"type": "HeLlO", "errorId": 0})).is_none());
    }
}
