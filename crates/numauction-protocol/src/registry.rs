//! Maps wire tags to the variant that parses them.
//!
//! [`Registry::standard`] knows every built-in message and is what the
//! default codec uses. A peer that only wants to accept what it can legally
//! receive builds a narrower one, e.g. a client registry holding just the
//! server-to-client messages:
//!
//! ```rust
//! use numauction_protocol::{Direction, Registry};
//!
//! let client = Registry::builder()
//!     .with_standard_direction(Direction::ServerToClient)
//!     .expect("built-in tags are unique")
//!     .build();
//! assert!(client.contains("HeLlO"));
//! assert!(!client.contains("ReQsIgNiN"));
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use serde_json::Value;

use crate::codec::Rejection;
use crate::message::{parse_into, Direction, Message, ParseFn, Variant, STANDARD_VARIANTS, TYPE_FIELD};
use crate::ProtocolError;

static STANDARD: LazyLock<Registry> = LazyLock::new(|| Registry {
    parsers: STANDARD_VARIANTS
        .iter()
        .map(|&(tag, _, parse)| (tag, parse))
        .collect(),
});

/// An exact tag → parser mapping. Read-only once built.
#[derive(Debug, Clone)]
pub struct Registry {
    parsers: HashMap<&'static str, ParseFn>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The process-wide registry of every built-in variant.
    pub fn standard() -> &'static Registry {
        &STANDARD
    }

    /// The parser registered for `tag`. Unknown tags get `None`, never a
    /// best guess.
    pub fn resolve(&self, tag: &str) -> Option<ParseFn> {
        self.parsers.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.parsers.contains_key(tag)
    }

    /// Registered tags, in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.parsers.keys().copied()
    }

    /// Number of registered variants. The standard registry has 16.
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// Only a builder that registered nothing produces an empty registry.
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Dispatches a decoded payload object to its variant, or says why it
    /// could not.
    ///
    /// Requires a non-empty string `type` naming a registered tag;
    /// everything else is up to the variant. This is the one place inbound
    /// payloads are routed, and the codec logs whatever [`Rejection`] comes
    /// back.
    ///
    /// # Errors
    /// `MissingType` for a payload without a usable `type`, `UnknownType`
    /// for a tag nobody registered, and `Malformed` when the variant's own
    /// check fails.
    pub fn dispatch(&self, candidate: &Value) -> Result<Message, Rejection> {
        let tag = candidate
            .get(TYPE_FIELD)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or(Rejection::MissingType)?;
        let (&tag, &parse) = self
            .parsers
            .get_key_value(tag)
            .ok_or_else(|| Rejection::UnknownType(tag.to_owned()))?;
        parse(candidate).map_err(|source| Rejection::Malformed { tag, source })
    }

    /// [`dispatch`](Self::dispatch) without the reason.
    pub fn parse(&self, candidate: &Value) -> Option<Message> {
        self.dispatch(candidate).ok()
    }
}

/// Collects variants into a [`Registry`], refusing duplicate tags.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    parsers: HashMap<&'static str, ParseFn>,
}

impl RegistryBuilder {
    /// Adds one variant.
    ///
    /// # Errors
    /// Returns `ProtocolError::DuplicateTag` if `V::TAG` is already taken.
    pub fn register<V: Variant>(self) -> Result<Self, ProtocolError> {
        self.insert(V::TAG, parse_into::<V>)
    }

    /// Adds every built-in variant.
    pub fn with_standard(self) -> Result<Self, ProtocolError> {
        self.with_standard_where(|_| true)
    }

    /// Adds the built-in variants sent in `direction`.
    pub fn with_standard_direction(self, direction: Direction) -> Result<Self, ProtocolError> {
        self.with_standard_where(|d| d == direction)
    }

    pub fn build(self) -> Registry {
        Registry {
            parsers: self.parsers,
        }
    }

    fn with_standard_where(
        self,
        keep: impl Fn(Direction) -> bool,
    ) -> Result<Self, ProtocolError> {
        STANDARD_VARIANTS
            .iter()
            .filter(|(_, direction, _)| keep(*direction))
            .try_fold(self, |builder, &(tag, _, parse)| builder.insert(tag, parse))
    }

    fn insert(mut self, tag: &'static str, parse: ParseFn) -> Result<Self, ProtocolError> {
        if self.parsers.contains_key(tag) {
            return Err(ProtocolError::DuplicateTag(tag));
        }
        self.parsers.insert(tag, parse);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Hello, RequestSignIn, Variant};
    use crate::RequestId;
    use serde_json::json;

    #[test]
    fn test_standard_registry_holds_every_variant() {
        let registry = Registry::standard();
        assert_eq!(registry.len(), 16);
        for tag in [
            "ErRoR",
            "HeLlO",
            "ReQsIgNiN",
            "ReSsIgNiN",
            "MaTcH_ReQjOiN",
            "MaTcH_ReSjOiN",
            "MaTcH_UpDaTePlaYeRs",
            "MaTcH_ReQrEaDy",
            "MaTcH_ReSrEaDy",
            "MaTcH_GaMeStArT",
            "GaMe_ReQbId",
            "GaMe_ReSbId",
            "GaMe_UpDaTePlAyErBiD",
            "GaMe_FiNiShTuRn",
            "GaMe_StArTtUrN",
            "GaMe_FiNiShGaMe",
        ] {
            assert!(registry.contains(tag), "{tag} should be registered");
        }
    }

    #[test]
    fn test_unknown_tag_resolves_to_nothing() {
        let registry = Registry::standard();
        assert!(registry.resolve("NoSuchType").is_none());
        // Tags are matched exactly, case included.
        assert!(registry.resolve("hello").is_none());
        assert!(registry.parse(&json!({"type": "NoSuchType", "identify": "x"})).is_none());
    }

    #[test]
    fn test_parse_requires_non_empty_string_type() {
        let registry = Registry::standard();
        assert!(registry.parse(&json!({"type": ""})).is_none());
        assert!(registry.parse(&json!({"type": 1})).is_none());
        assert!(registry.parse(&json!({})).is_none());
        assert!(registry.parse(&json!("HeLlO")).is_none());
    }

    #[test]
    fn test_dispatch_reports_why() {
        let registry = Registry::standard();
        assert!(matches!(
            registry.dispatch(&json!({"type": ""})),
            Err(Rejection::MissingType)
        ));
        assert!(matches!(
            registry.dispatch(&json!([1, 2])),
            Err(Rejection::MissingType)
        ));
        assert!(matches!(
            registry.dispatch(&json!({"type": "NoSuchType"})),
            Err(Rejection::UnknownType(tag)) if tag == "NoSuchType"
        ));
        assert!(matches!(
            registry.dispatch(&json!({"type": "ErRoR", "errorId": 999})),
            Err(Rejection::Malformed { tag: "ErRoR", .. })
        ));
    }

    #[test]
    fn test_parse_dispatches_to_matching_variant() {
        let plain = Hello.to_plain();
        assert_eq!(Registry::standard().parse(&plain), Some(Message::Hello(Hello)));
    }

    #[test]
    fn test_register_rejects_duplicate_tag() {
        let err = Registry::builder()
            .register::<Hello>()
            .and_then(|b| b.register::<Hello>())
            .unwrap_err();
        assert!(matches!(err, ProtocolError::DuplicateTag("HeLlO")));
    }

    #[test]
    fn test_with_standard_after_register_is_a_duplicate() {
        let result = Registry::builder()
            .register::<RequestSignIn>()
            .and_then(RegistryBuilder::with_standard);
        assert!(matches!(result, Err(ProtocolError::DuplicateTag("ReQsIgNiN"))));
    }

    #[test]
    fn test_direction_filtered_registries_partition_the_standard_set() {
        let client = Registry::builder()
            .with_standard_direction(Direction::ServerToClient)
            .unwrap()
            .build();
        let server = Registry::builder()
            .with_standard_direction(Direction::ClientToServer)
            .unwrap()
            .build();

        assert_eq!(client.len() + server.len(), Registry::standard().len());
        assert!(client.tags().all(|tag| !server.contains(tag)));
        assert_eq!(server.len(), 4);

        let sign_in = RequestSignIn::new(RequestId::new(1), "Alice").to_plain();
        assert!(server.parse(&sign_in).is_some());
        assert!(client.parse(&sign_in).is_none());
    }

    #[test]
    fn test_custom_registry_only_knows_what_was_registered() {
        let registry = Registry::builder().register::<Hello>().unwrap().build();
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
        assert!(registry.parse(&Hello.to_plain()).is_some());
        assert!(registry.parse(&RequestSignIn::new(RequestId::new(1), "A").to_plain()).is_none());
    }
}
