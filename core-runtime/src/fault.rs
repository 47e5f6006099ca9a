//! Error Taxonomy
//!
//! The closed set of error codes reported on failure events, and the rules
//! for deriving a code and message from any platform failure.
//!
//! Codes are stable integers consumed across the host boundary; hosts switch
//! on the code and show the message. A platform failure that fits no specific
//! kind is reported as [`FaultKind::Unknown`] with the native code and
//! description preserved verbatim.

use bridge_traits::error::SdkError;
use serde::{Deserialize, Serialize};

/// The closed set of failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    /// Unclassified failure; the message carries whatever the platform said.
    Unknown,
    /// A precondition-checked request was issued with no authenticated player.
    NotAuthenticated,
    /// The capability (typically an overlay UI surface) does not exist on
    /// this platform or build.
    NotAvailable,
    /// The platform sign-in flow failed.
    FailedToAuthenticate,
    /// A player photo could not be loaded.
    FailedToLoadPicture,
    /// A request that is keyed by an identifier arrived without one.
    MissingIdentifier,
}

impl FaultKind {
    /// The stable numeric code for this kind.
    pub fn code(self) -> i64 {
        match self {
            FaultKind::Unknown => 1,
            FaultKind::NotAuthenticated => 2,
            FaultKind::NotAvailable => 3,
            FaultKind::FailedToAuthenticate => 4,
            FaultKind::FailedToLoadPicture => 5,
            FaultKind::MissingIdentifier => 6,
        }
    }
}

/// A code/message pair as placed on a failure event.
///
/// `code` is either a [`FaultKind`] code or a native platform code preserved
/// verbatim; `message` is free-text diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    pub code: i64,
    pub message: String,
}

impl Fault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            code: kind.code(),
            message: message.into(),
        }
    }

    /// The synchronous precondition failure: no authenticated player.
    pub fn not_authenticated() -> Self {
        Self::new(FaultKind::NotAuthenticated, "player is not authenticated")
    }

    /// A required identifier was empty.
    pub fn missing_identifier(what: &str) -> Self {
        Self::new(
            FaultKind::MissingIdentifier,
            format!("no {} identifier supplied", what),
        )
    }

    /// Classify an arbitrary platform failure.
    ///
    /// Native codes and descriptions pass through untouched; a missing UI
    /// surface maps to [`FaultKind::NotAvailable`]; everything else is
    /// [`FaultKind::Unknown`] with the error's display text.
    pub fn from_sdk(err: &SdkError) -> Self {
        match err {
            SdkError::Native { code, description } => Self {
                code: *code,
                message: description.clone(),
            },
            SdkError::NotSupported(message) => Self::new(FaultKind::NotAvailable, message.clone()),
            other => Self::new(FaultKind::Unknown, other.to_string()),
        }
    }

    /// Classify a sign-in failure: native codes pass through, anything else
    /// is [`FaultKind::FailedToAuthenticate`].
    pub fn from_authentication(err: &SdkError) -> Self {
        match err {
            SdkError::Native { code, description } => Self {
                code: *code,
                message: description.clone(),
            },
            other => Self::new(FaultKind::FailedToAuthenticate, other.to_string()),
        }
    }

    /// A photo-load failure is always reported under
    /// [`FaultKind::FailedToLoadPicture`]; the platform's text is kept as the
    /// message.
    pub fn from_photo_load(err: &SdkError) -> Self {
        Self::new(
            FaultKind::FailedToLoadPicture,
            format!("failed to load player photo: {}", err),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(FaultKind::Unknown.code(), 1);
        assert_eq!(FaultKind::NotAuthenticated.code(), 2);
        assert_eq!(FaultKind::NotAvailable.code(), 3);
        assert_eq!(FaultKind::FailedToAuthenticate.code(), 4);
        assert_eq!(FaultKind::FailedToLoadPicture.code(), 5);
        assert_eq!(FaultKind::MissingIdentifier.code(), 6);
    }

    #[test]
    fn native_failures_pass_through_verbatim() {
        let err = SdkError::Native {
            code: -1009,
            description: "The Internet connection appears to be offline.".to_string(),
        };
        let fault = Fault::from_sdk(&err);
        assert_eq!(fault.code, -1009);
        assert_eq!(
            fault.message,
            "The Internet connection appears to be offline."
        );
    }

    #[test]
    fn missing_surface_maps_to_not_available() {
        let err = SdkError::NotSupported("no overlay on this build".to_string());
        let fault = Fault::from_sdk(&err);
        assert_eq!(fault.code, FaultKind::NotAvailable.code());
    }

    #[test]
    fn adapter_failures_map_to_unknown() {
        let err = SdkError::OperationFailed("socket closed".to_string());
        let fault = Fault::from_sdk(&err);
        assert_eq!(fault.code, FaultKind::Unknown.code());
        assert!(fault.message.contains("socket closed"));
    }

    #[test]
    fn sign_in_failure_without_native_code() {
        let err = SdkError::OperationFailed("user cancelled".to_string());
        let fault = Fault::from_authentication(&err);
        assert_eq!(fault.code, FaultKind::FailedToAuthenticate.code());
    }

    #[test]
    fn sign_in_failure_keeps_native_code() {
        let err = SdkError::Native {
            code: 7,
            description: "underage account".to_string(),
        };
        let fault = Fault::from_authentication(&err);
        assert_eq!(fault.code, 7);
    }

    #[test]
    fn photo_failures_always_use_picture_code() {
        let err = SdkError::Native {
            code: 404,
            description: "not found".to_string(),
        };
        let fault = Fault::from_photo_load(&err);
        assert_eq!(fault.code, FaultKind::FailedToLoadPicture.code());
        assert!(fault.message.contains("not found"));
    }
}
