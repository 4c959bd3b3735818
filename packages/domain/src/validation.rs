//! Local email checks run before any auth call reaches the network.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// Syntax check plus a denylist of placeholder domains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRules {
    #[serde(default = "default_placeholder_domains")]
    pub placeholder_domains: Vec<String>,
}

fn default_placeholder_domains() -> Vec<String> {
    [
        "example.com",
        "example.org",
        "example.net",
        "test.com",
        "domain.com",
        "email.com",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for EmailRules {
    fn default() -> Self {
        Self {
            placeholder_domains: default_placeholder_domains(),
        }
    }
}

impl EmailRules {
    /// Validate `email`, returning the trimmed address on success.
    pub fn check<'a>(&self, email: &'a str) -> Result<&'a str, ValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::Empty);
        }
        if !EMAIL_RE.is_match(email) {
            return Err(ValidationError::Malformed(email.to_string()));
        }
        // The regex guarantees exactly one '@'.
        let domain = email.rsplit('@').next().unwrap_or_default().to_lowercase();
        if self
            .placeholder_domains
            .iter()
            .any(|d| d.eq_ignore_ascii_case(&domain))
        {
            return Err(ValidationError::PlaceholderDomain(domain));
        }
        Ok(email)
    }
}
