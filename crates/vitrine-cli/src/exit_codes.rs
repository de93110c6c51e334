//! Exit codes for the vitrine CLI.
//! These codes are part of the public contract; scripts branch on them.

use vitrine_catalog::CatalogError;
use vitrine_gs1::Gs1Error;

pub const SUCCESS: i32 = 0;
pub const NEGATIVE: i32 = 1; // Invalid checksum, identifier or record not found
pub const CONFIG_ERROR: i32 = 2; // Bad input or missing configuration
pub const AUTH_FAILURE: i32 = 3;
pub const REGISTRY_ERROR: i32 = 4; // Registry answered and declined
pub const TRANSPORT_ERROR: i32 = 5;
pub const PROTOCOL_ERROR: i32 = 6;

/// Exit code for an error that reached the top level.
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(e) = err.downcast_ref::<Gs1Error>() {
        return e.exit_code();
    }
    if let Some(e) = err.downcast_ref::<CatalogError>() {
        return e.exit_code();
    }
    CONFIG_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_error_kind() {
        let cases = [
            (Gs1Error::validation("x"), CONFIG_ERROR),
            (Gs1Error::AuthFailure { message: "x".into() }, AUTH_FAILURE),
            (
                Gs1Error::Registry {
                    status: 409,
                    message: "x".into(),
                },
                REGISTRY_ERROR,
            ),
            (Gs1Error::Transport { message: "x".into() }, TRANSPORT_ERROR),
            (Gs1Error::protocol("x", "<html>"), PROTOCOL_ERROR),
        ];
        for (err, code) in cases {
            assert_eq!(for_error(&anyhow::Error::new(err)), code);
        }
    }

    #[test]
    fn test_context_is_transparent() {
        let err = anyhow::Error::new(CatalogError::NotFound {
            id: uuid::Uuid::nil(),
        })
        .context("loading record");
        assert_eq!(for_error(&err), NEGATIVE);
        assert_eq!(for_error(&anyhow::anyhow!("boom")), CONFIG_ERROR);
    }
}
