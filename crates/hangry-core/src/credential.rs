/// A credential returned by a provider client's `authenticate` call.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Static key sent in a provider-specific header.
    ApiKey(String),
    /// OAuth2 bearer token sent as `Authorization: Bearer <token>`.
    Bearer(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::ApiKey(_) => f.write_str("ApiKey([redacted])"),
            Credential::Bearer(_) => f.write_str("Bearer([redacted])"),
        }
    }
}
