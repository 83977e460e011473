use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::config::ResolvedConnection;

/// Drop the mount segment of a virtual path: `home:/a/b` becomes `/a/b`.
pub fn without_mount(path: &str) -> String {
    let rest = path.split('/').skip(1).collect::<Vec<_>>().join("/");
    match rest.starts_with('/') {
        true => rest,
        false => format!("/{}", rest),
    }
}

/// Server URL for a virtual path.
///
/// The query section is always present, so the result ends with a bare `?`
/// when there is no parameter.
pub fn dav_url(conn: &ResolvedConnection, path: &str) -> String {
    dav_url_with(conn, path, &[])
}

pub fn dav_url_with(conn: &ResolvedConnection, path: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, NON_ALPHANUMERIC),
                utf8_percent_encode(v, NON_ALPHANUMERIC)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}{}{}?{}",
        conn.uri,
        conn.prefix,
        without_mount(path),
        query
    )
}
