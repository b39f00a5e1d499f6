//! Bearer-token acquisition for the Sheets API.

use insights_core::GoogleCredentials;
use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::ServiceAccountAuthenticator;

use crate::error::SheetsError;

/// OAuth scope granting read/write access to spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Source of the bearer token attached to every Sheets request.
pub enum SheetsAuth {
    /// Service-account flow; tokens are cached and refreshed by `yup-oauth2`.
    ServiceAccount(Box<DefaultAuthenticator>),
    /// A pre-issued token, used against mock servers in tests.
    Static(String),
}

impl std::fmt::Debug for SheetsAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetsAuth::ServiceAccount(_) => f.write_str("ServiceAccount"),
            SheetsAuth::Static(_) => f.write_str("Static([redacted])"),
        }
    }
}

impl SheetsAuth {
    /// Build a service-account authenticator from inline JSON or a key file.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Credentials`] if the key cannot be read or
    /// parsed, or if the authenticator cannot be constructed.
    pub async fn service_account(credentials: &GoogleCredentials) -> Result<Self, SheetsError> {
        let key = match credentials {
            GoogleCredentials::Inline(json) => {
                yup_oauth2::parse_service_account_key(json).map_err(SheetsError::Credentials)?
            }
            GoogleCredentials::Path(path) => yup_oauth2::read_service_account_key(path)
                .await
                .map_err(SheetsError::Credentials)?,
        };

        tracing::debug!(client_email = %key.client_email, "building service account authenticator");

        let authenticator = ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(SheetsError::Credentials)?;

        Ok(SheetsAuth::ServiceAccount(Box::new(authenticator)))
    }

    /// Returns a bearer token valid for [`SPREADSHEETS_SCOPE`].
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Auth`] when the token exchange fails or yields
    /// no access token.
    pub(crate) async fn bearer_token(&self) -> Result<String, SheetsError> {
        match self {
            SheetsAuth::Static(token) => Ok(token.clone()),
            SheetsAuth::ServiceAccount(authenticator) => {
                let token = authenticator
                    .token(&[SPREADSHEETS_SCOPE])
                    .await
                    .map_err(|e| SheetsError::Auth(e.to_string()))?;
                token
                    .token()
                    .map(ToString::to_string)
                    .ok_or_else(|| SheetsError::Auth("token response had no access token".into()))
            }
        }
    }
}
