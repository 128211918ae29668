//! Token claim structure.

use serde::{Deserialize, Serialize};

/// Claims embedded in identity tokens.
///
/// - `sub`: identity ID (subject)
/// - `iat`: issued-at timestamp
/// - `exp`: expiration timestamp (`iat` + the configured validity window)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity ID (subject claim)
    pub sub: String,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "user-id-123".to_string(),
            iat: 1234567800,
            exp: 1234567890,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"user-id-123""#));
        assert!(!serialized.contains("role"));
    }

    #[test]
    fn test_claims_deserialize_ignores_extra_fields() {
        let json = r#"{"sub":"user-id-456","iat":9999999900,"exp":9999999999,"role":"admin"}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "user-id-456");
        assert_eq!(claims.exp, 9999999999);
    }
}
