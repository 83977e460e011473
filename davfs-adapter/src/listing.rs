use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;
use serde::Serialize;

use davfs_xml::{Element, XmlBody};

use crate::config::ResolvedConnection;

pub const DEFAULT_MIME: &str = "application/octet-stream";

/// One immediate child of a listed directory
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DirEntry {
    pub is_directory: bool,
    pub is_file: bool,
    /// ETag, when the server sent one
    pub id: Option<String>,
    pub size: u64,
    /// Always `None` for directories
    pub mime: Option<String>,
    /// Virtual path, usable for subsequent operations
    pub path: String,
    pub filename: String,
    /// Reserved for extension metadata
    pub stat: BTreeMap<String, String>,
}

/// Reduce a PROPFIND multistatus to the immediate children of `root`.
///
/// The self entry of the listed directory is dropped, as is everything deeper
/// than one level: some servers answer with `Depth: infinity`.
/// Entries keep the order the server sent them in.
pub fn transform_readdir(conn: &ResolvedConnection, root: &str, body: &XmlBody) -> Vec<DirEntry> {
    let doc = match body {
        XmlBody::Document(doc) => doc,
        XmlBody::Empty | XmlBody::Unparsable(_) => {
            tracing::debug!(root=%root, "no multistatus document, empty listing");
            return vec![];
        }
    };

    let ns = conn.ns.as_str();
    let dir = root.rsplit(':').next().unwrap_or_default();
    let prefix = format!("{}{}", conn.prefix, dir);

    doc.elements_by_tag_name_ns(ns, "response")
        .into_iter()
        .filter_map(|child| {
            let path = query_path(child, ns);
            let is_directory = path.ends_with('/');

            let Some(relative) = relative_to(&path, &prefix) else {
                tracing::debug!(href=%path, prefix=%prefix, "entry outside of the listed directory");
                return None;
            };
            let filename = relative.strip_suffix('/').unwrap_or(relative);
            if filename.is_empty() {
                return None;
            }
            if relative.split('/').filter(|s| !s.is_empty()).count() != 1 {
                return None;
            }

            Some(DirEntry {
                is_directory,
                is_file: !is_directory,
                id: query_text(child, ns, "getetag"),
                size: query_size(child, ns),
                mime: match is_directory {
                    true => None,
                    false => Some(
                        query_text(child, ns, "getcontenttype")
                            .unwrap_or_else(|| DEFAULT_MIME.to_string()),
                    ),
                },
                path: format!("{}{}", root, filename),
                filename: filename.trim_start_matches('/').to_string(),
                stat: BTreeMap::new(),
            })
        })
        .collect()
}

/// Part of `path` below `prefix`, `None` when `path` is not below it.
fn relative_to<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    // "/webdav/dirx" is a sibling of "/webdav/dir", not a child
    match prefix.ends_with('/') || rest.is_empty() || rest.starts_with('/') {
        true => Some(rest),
        false => None,
    }
}

fn query_text(child: &Element, ns: &str, attr: &str) -> Option<String> {
    child.find_ns(ns, attr).map(Element::text_content)
}

/// Decoded path of the `href`, absolute URLs reduced to their path
fn query_path(child: &Element, ns: &str) -> String {
    let href = query_text(child, ns, "href").unwrap_or_default();
    let href = href.trim();
    let encoded = match url::Url::parse(href) {
        Ok(u) if u.has_host() => u.path().to_string(),
        _ => href.to_string(),
    };
    percent_decode_str(&encoded).decode_utf8_lossy().into_owned()
}

fn query_size(child: &Element, ns: &str) -> u64 {
    let Some(raw) = query_text(child, ns, "getcontentlength") else {
        return 0;
    };
    match raw.trim().parse::<u64>() {
        Ok(size) => size,
        Err(e) => {
            tracing::warn!(value=%raw, err=%e, "invalid getcontentlength, using 0");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, DEFAULT_NAMESPACE, DEFAULT_PREFIX};

    fn conn() -> ResolvedConnection {
        ResolvedConnection {
            uri: "https://h".into(),
            prefix: DEFAULT_PREFIX.into(),
            ns: DEFAULT_NAMESPACE.into(),
            credentials: Credentials::Bearer("T".into()),
        }
    }

    const NESTED: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<D:multistatus xmlns:D="DAV:">
  <D:response>
    <D:href>/webdav/dir/</D:href>
    <D:propstat><D:prop><D:getetag>"root"</D:getetag></D:prop></D:propstat>
  </D:response>
  <D:response>
    <D:href>/webdav/dir/a.txt</D:href>
    <D:propstat>
      <D:prop>
        <D:getetag>"etag-a"</D:getetag>
        <D:getcontentlength>42</D:getcontentlength>
        <D:getcontenttype>text/plain</D:getcontenttype>
      </D:prop>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/webdav/dir/sub/</D:href>
    <D:propstat>
      <D:prop>
        <D:getetag>"etag-sub"</D:getetag>
        <D:getcontenttype>httpd/unix-directory</D:getcontenttype>
      </D:prop>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/webdav/dir/sub/b.txt</D:href>
    <D:propstat><D:prop><D:getcontentlength>1</D:getcontentlength></D:prop></D:propstat>
  </D:response>
</D:multistatus>"#;

    async fn body(src: &str) -> XmlBody {
        davfs_xml::parse(src.as_bytes()).await
    }

    #[tokio::test]
    async fn immediate_children_only() {
        let got = transform_readdir(&conn(), "m:/dir", &body(NESTED).await);

        assert_eq!(
            got,
            vec![
                DirEntry {
                    is_directory: false,
                    is_file: true,
                    id: Some("\"etag-a\"".into()),
                    size: 42,
                    mime: Some("text/plain".into()),
                    path: "m:/dir/a.txt".into(),
                    filename: "a.txt".into(),
                    stat: BTreeMap::new(),
                },
                DirEntry {
                    is_directory: true,
                    is_file: false,
                    id: Some("\"etag-sub\"".into()),
                    size: 0,
                    mime: None,
                    path: "m:/dir/sub".into(),
                    filename: "sub".into(),
                    stat: BTreeMap::new(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn listing_is_stable() {
        let parsed = body(NESTED).await;
        let first = transform_readdir(&conn(), "m:/dir", &parsed);
        let second = transform_readdir(&conn(), "m:/dir", &parsed);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn root_with_trailing_slash() {
        let got = transform_readdir(&conn(), "m:/dir/", &body(NESTED).await);
        let paths = got.iter().map(|e| e.path.as_str()).collect::<Vec<_>>();
        assert_eq!(paths, vec!["m:/dir/a.txt", "m:/dir/sub"]);
    }

    #[tokio::test]
    async fn mount_root() {
        let src = r#"<d:multistatus xmlns:d="DAV:">
  <d:response><d:href>/webdav/</d:href></d:response>
  <d:response><d:href>/webdav/dir/</d:href></d:response>
  <d:response><d:href>/webdav/top.bin</d:href></d:response>
</d:multistatus>"#;
        let got = transform_readdir(&conn(), "m:/", &body(src).await);
        let names = got
            .iter()
            .map(|e| (e.filename.as_str(), e.path.as_str(), e.is_directory))
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![("dir", "m:/dir", true), ("top.bin", "m:/top.bin", false)]
        );
        assert_eq!(got[1].mime.as_deref(), Some(DEFAULT_MIME));
        assert_eq!(got[1].id, None);
    }

    #[tokio::test]
    async fn encoded_and_absolute_hrefs() {
        let src = r#"<d:multistatus xmlns:d="DAV:">
  <d:response><d:href>https://h/webdav/dir/my%20file.txt</d:href></d:response>
  <d:response><d:href>/webdav/dir/%C3%A9t%C3%A9/</d:href></d:response>
</d:multistatus>"#;
        let got = transform_readdir(&conn(), "m:/dir", &body(src).await);
        let names = got.iter().map(|e| e.filename.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["my file.txt", "été"]);
        assert_eq!(got[0].path, "m:/dir/my file.txt");
    }

    #[tokio::test]
    async fn siblings_sharing_a_name_prefix() {
        let src = r#"<d:multistatus xmlns:d="DAV:">
  <d:response><d:href>/webdav/dir/</d:href></d:response>
  <d:response><d:href>/webdav/dirx</d:href></d:response>
  <d:response><d:href>/elsewhere/dir/a</d:href></d:response>
  <d:response><d:href>/webdav/dir/a</d:href></d:response>
</d:multistatus>"#;
        let got = transform_readdir(&conn(), "m:/dir", &body(src).await);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].filename, "a");
    }

    #[tokio::test]
    async fn custom_namespace() {
        let src = r#"<x:multistatus xmlns:x="urn:custom" xmlns:d="DAV:">
  <x:response><x:href>/webdav/dir/a</x:href></x:response>
  <d:response><d:href>/webdav/dir/b</d:href></d:response>
</x:multistatus>"#;
        let mut custom = conn();
        custom.ns = "urn:custom".into();
        let got = transform_readdir(&custom, "m:/dir", &body(src).await);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].filename, "a");
    }

    #[tokio::test]
    async fn invalid_content_length() {
        let src = r#"<d:multistatus xmlns:d="DAV:">
  <d:response><d:href>/webdav/dir/a</d:href><d:getcontentlength>lots</d:getcontentlength></d:response>
</d:multistatus>"#;
        let got = transform_readdir(&conn(), "m:/dir", &body(src).await);
        assert_eq!(got[0].size, 0);
    }

    #[tokio::test]
    async fn nothing_to_list() {
        assert!(transform_readdir(&conn(), "m:/dir", &body("").await).is_empty());
        assert!(transform_readdir(&conn(), "m:/dir", &body("<oops").await).is_empty());
        let empty = r#"<d:multistatus xmlns:d="DAV:"/>"#;
        assert!(transform_readdir(&conn(), "m:/dir", &body(empty).await).is_empty());
    }

    #[tokio::test]
    async fn serialized_shape() {
        let got = transform_readdir(&conn(), "m:/dir", &body(NESTED).await);
        let out = toml::to_string(&got[0]).unwrap();
        assert!(out.contains("isDirectory = false"));
        assert!(out.contains("isFile = true"));
    }
}
