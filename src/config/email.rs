//! Email configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration (Resend)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    pub resend_api_key: Secret<String>,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Company name used in subjects and greetings
    #[serde(default = "default_company_name")]
    pub company_name: String,

    /// Base URL of the portal, used for registration and sign-in links
    #[serde(default = "default_portal_url")]
    pub portal_url: String,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Portal URL without a trailing slash
    pub fn portal_base(&self) -> &str {
        self.portal_url.trim_end_matches('/')
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.resend_api_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired("EMAIL__RESEND_API_KEY"));
        }
        if !key.starts_with("re_") {
            return Err(ValidationError::InvalidResendKey);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if !self.portal_url.starts_with("http://") && !self.portal_url.starts_with("https://") {
            return Err(ValidationError::InvalidPortalUrl);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: Secret::new(String::new()),
            from_email: default_from_email(),
            from_name: default_from_name(),
            company_name: default_company_name(),
            portal_url: default_portal_url(),
        }
    }
}

fn default_from_email() -> String {
    "noreply@portal.example.com".to_string()
}

fn default_from_name() -> String {
    "Vendor Portal".to_string()
}

fn default_company_name() -> String {
    "Williams Diversified".to_string()
}

fn default_portal_url() -> String {
    "http://localhost:3000".to_string()
}
