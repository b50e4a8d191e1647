use serde::{Deserialize, Serialize};
use validator::Validate;

/// Token pair returned by login: `{access, refresh}` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_login_request_rejects_bad_email() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_enforces_password_length() {
        let request = RegisterRequest {
            username: "cook".to_string(),
            email: "cook@example.com".to_string(),
            password: "short".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_token_pair_wire_names() {
        let pair: TokenPair =
            serde_json::from_str(r#"{"access":"A","refresh":"R"}"#).unwrap();
        assert_eq!(pair.access, "A");
        assert_eq!(pair.refresh, "R");
    }
}
