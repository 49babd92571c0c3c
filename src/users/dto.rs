use serde::Deserialize;

/// Signup payload. Fields are optional so presence is checked in the handler
/// and a missing field yields the validation message, not a decode rejection.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_tolerates_missing_fields() {
        let req: CreateUserRequest = serde_json::from_str(r#"{"email": "a@b.c"}"#).unwrap();
        assert!(req.name.is_none());
        assert_eq!(req.email.as_deref(), Some("a@b.c"));
        assert!(req.password.is_none());
    }

    #[test]
    fn update_request_accepts_empty_object() {
        let req: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(req.name.is_none() && req.email.is_none() && req.password.is_none());
    }
}
