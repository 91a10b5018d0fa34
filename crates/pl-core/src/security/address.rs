use std::fmt;

/// Address of one secret in the platform credential store.
///
/// Current entries carry both a service and an account. Entries written by
/// early builds were stored under the account alone; [`SecretAddress::legacy`]
/// addresses those for one-time migration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretAddress {
    pub service: Option<String>,
    pub account: String,
}

impl SecretAddress {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: Some(service.into()),
            account: account.into(),
        }
    }

    pub fn legacy(account: impl Into<String>) -> Self {
        Self {
            service: None,
            account: account.into(),
        }
    }
}

impl fmt::Display for SecretAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.service {
            Some(service) => write!(f, "{}/{}", service, self.account),
            None => write!(f, "<legacy>/{}", self.account),
        }
    }
}
