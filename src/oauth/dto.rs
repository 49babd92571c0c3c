use serde::Deserialize;

/// Query string Google appends when redirecting back to the callback route.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Present instead of `code` when the user cancels the consent screen.
    pub error: Option<String>,
}

/// The slice of the Google userinfo response this service reads.
#[derive(Debug, Deserialize)]
pub struct GoogleProfile {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub verified_email: bool,
}
