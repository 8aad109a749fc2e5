use secrecy::{ExposeSecret, SecretString};

/// Login credentials for a Junos device.
///
/// Used as HTTP basic auth by the REST client. The on-box CLI client
/// runs as the invoking user and ignores them.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Attach these credentials to a request as HTTP basic auth.
    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(&self.username, Some(self.password.expose_secret()))
    }
}
