use bytes::Bytes;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Response};

use davfs_xml::XmlBody;

use crate::auth::authorization;
use crate::config::ResolvedConnection;
use crate::error::Result;

/// HTTP methods used against the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DavMethod {
    Get,
    Put,
    Delete,
    Copy,
    Move,
    Propfind,
    Mkcol,
}

impl DavMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Copy => "COPY",
            Self::Move => "MOVE",
            Self::Propfind => "PROPFIND",
            Self::Mkcol => "MKCOL",
        }
    }

    fn to_http(self) -> Result<Method> {
        Ok(match self {
            Self::Get => Method::GET,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
            other => Method::from_bytes(other.as_str().as_bytes())?,
        })
    }
}

impl std::fmt::Display for DavMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call additions to a request
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Bytes>,
}

impl RequestOptions {
    pub fn destination(url: String) -> Self {
        Self {
            headers: vec![("Destination", url)],
            body: None,
        }
    }

    pub fn body(body: Bytes) -> Self {
        Self {
            headers: vec![],
            body: Some(body),
        }
    }
}

/// Issue one request and hand back the response untouched.
/// A non-2xx status is an error.
pub async fn execute(
    client: &Client,
    conn: &ResolvedConnection,
    method: DavMethod,
    url: &str,
    options: RequestOptions,
) -> Result<Response> {
    let mut auth = HeaderValue::from_str(&authorization(&conn.credentials))?;
    auth.set_sensitive(true);

    let mut req = client.request(method.to_http()?, url).header(AUTHORIZATION, auth);
    for (name, value) in options.headers {
        req = req.header(name, value);
    }
    if let Some(body) = options.body {
        req = req.body(body);
    }

    tracing::debug!(method=%method, url=%url, "webdav request");
    let response = req.send().await?.error_for_status()?;
    tracing::debug!(method=%method, url=%url, status=%response.status(), "webdav response");
    Ok(response)
}

/// Same as [`execute`], the body is then read fully and parsed as XML.
pub async fn execute_xml(
    client: &Client,
    conn: &ResolvedConnection,
    method: DavMethod,
    url: &str,
    options: RequestOptions,
) -> Result<XmlBody> {
    let response = execute(client, conn, method, url, options).await?;
    let body = response.bytes().await?;
    Ok(davfs_xml::parse(&body).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_methods() {
        for m in [
            DavMethod::Get,
            DavMethod::Put,
            DavMethod::Delete,
            DavMethod::Copy,
            DavMethod::Move,
            DavMethod::Propfind,
            DavMethod::Mkcol,
        ] {
            assert_eq!(m.to_http().unwrap().as_str(), m.as_str());
        }
    }

    #[test]
    fn destination_header() {
        let opts = RequestOptions::destination("https://h/webdav/b?".into());
        assert_eq!(opts.headers, vec![("Destination", "https://h/webdav/b?".to_string())]);
        assert!(opts.body.is_none());
    }
}
