//! Mapping of the web API's status block to [`VvoError`].
//!
//! The provider reports semantic failures ("stop invalid", "no route found")
//! with the same `{"Status": {"Code", "Message"}}` block whether the HTTP
//! status is 200 or an error. Both paths end up as [`VvoError::Service`].

use reqwest::StatusCode;

use super::error::{GENERIC_ERROR, VALIDATION_ERROR, VvoError};
use super::types::{Status, StatusEnvelope};

/// How much of an unreadable error body to keep in [`VvoError::Api`].
const BODY_PREVIEW_CHARS: usize = 500;

/// Fail unless the response carries a status block with code `"Ok"`.
pub fn check_status(status: Option<&Status>) -> Result<(), VvoError> {
    let status = status.ok_or_else(|| VvoError::Unexpected("response has no status".into()))?;

    if status.is_ok() {
        return Ok(());
    }

    Err(construct_error(
        Some(&status.code),
        status.message.as_deref().unwrap_or_default(),
    ))
}

/// Build an error of the given kind. A missing kind means the generic `"Error"`.
pub fn construct_error(kind: Option<&str>, message: &str) -> VvoError {
    match kind.unwrap_or(GENERIC_ERROR) {
        GENERIC_ERROR => VvoError::Unexpected(message.to_string()),
        VALIDATION_ERROR => VvoError::Validation(message.to_string()),
        code => VvoError::Service {
            code: code.to_string(),
            message: message.to_string(),
        },
    }
}

/// Interpret a non-success HTTP response.
///
/// If the body is a status block, the provider's code and message win.
/// Otherwise the HTTP status and a prefix of the body are reported.
pub fn convert_error(status: StatusCode, body: &str) -> VvoError {
    if let Ok(StatusEnvelope {
        status: Some(envelope),
    }) = serde_json::from_str::<StatusEnvelope>(body)
    {
        return construct_error(
            Some(&envelope.code),
            envelope.message.as_deref().unwrap_or_default(),
        );
    }

    VvoError::Api {
        status: status.as_u16(),
        message: body.chars().take(BODY_PREVIEW_CHARS).collect(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any code other than "Ok" fails with that code and message.
        #[test]
        fn non_ok_always_fails(code in "[A-Za-z]{1,16}", message in "[ -~]{0,40}") {
            prop_assume!(code != "Ok");
            let status = Status { code: code.clone(), message: Some(message.clone()) };
            let err = check_status(Some(&status)).unwrap_err();
            match err {
                VvoError::Unexpected(m) => {
                    prop_assert_eq!(code.as_str(), GENERIC_ERROR);
                    prop_assert_eq!(m, message);
                }
                VvoError::Validation(m) => {
                    prop_assert_eq!(code.as_str(), VALIDATION_ERROR);
                    prop_assert_eq!(m, message);
                }
                VvoError::Service { code: c, message: m } => {
                    prop_assert_eq!(c, code);
                    prop_assert_eq!(m, message);
                }
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }

        #[test]
        fn ok_never_fails(message in proptest::option::of("[ -~]{0,40}")) {
            let status = Status { code: "Ok".into(), message };
            prop_assert!(check_status(Some(&status)).is_ok());
        }
    }
}
