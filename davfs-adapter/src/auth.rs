use base64::Engine;

use crate::config::Credentials;

/// Value of the `Authorization` header sent with every request.
///
/// A mount without any credential still gets a Basic header with an empty
/// user and password, the server decides what to do with it.
pub fn authorization(credentials: &Credentials) -> String {
    match credentials {
        Credentials::Bearer(token) => format!("Bearer {}", token),
        Credentials::Basic { username, password } => {
            let creds = format!("{}:{}", username, password);
            format!(
                "Basic {}",
                base64::engine::general_purpose::STANDARD.encode(creds)
            )
        }
    }
}
