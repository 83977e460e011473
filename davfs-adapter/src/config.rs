use serde::{Deserialize, Serialize};

pub const DEFAULT_PREFIX: &str = "/webdav";
pub const DEFAULT_NAMESPACE: &str = "DAV:";

/// A mount as handed over by the host filesystem.
/// Only `attributes.connection` is read here.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Mount {
    #[serde(default)]
    pub attributes: MountAttributes,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MountAttributes {
    pub connection: Option<Connection>,
}

/// Raw connection settings. Every field is optional so that an incomplete
/// mount still loads; it is rejected when an operation is attempted.
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct Connection {
    pub uri: Option<String>,
    pub prefix: Option<String>,
    pub ns: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("uri", &self.uri)
            .field("prefix", &self.prefix)
            .field("ns", &self.ns)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Clone, PartialEq)]
pub enum Credentials {
    Bearer(String),
    Basic { username: String, password: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => write!(f, "Bearer(<redacted>)"),
            Self::Basic { username, .. } => write!(f, "Basic({}:<redacted>)", username),
        }
    }
}

/// Connection settings with every default applied, built once per mount.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConnection {
    pub uri: String,
    pub prefix: String,
    pub ns: String,
    pub credentials: Credentials,
}

impl ResolvedConnection {
    /// `None` when the mount has no connection settings or no `uri`.
    pub fn from_mount(mount: &Mount) -> Option<Self> {
        let conn = mount.attributes.connection.as_ref()?;
        let uri = non_empty(&conn.uri)?.to_string();

        let credentials = match non_empty(&conn.access_token) {
            Some(token) => Credentials::Bearer(token.to_string()),
            None => Credentials::Basic {
                username: conn.username.clone().unwrap_or_default(),
                password: conn.password.clone().unwrap_or_default(),
            },
        };

        Some(Self {
            uri,
            prefix: non_empty(&conn.prefix).unwrap_or(DEFAULT_PREFIX).to_string(),
            ns: non_empty(&conn.ns).unwrap_or(DEFAULT_NAMESPACE).to_string(),
            credentials,
        })
    }
}

// an empty string counts as unset
fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}
