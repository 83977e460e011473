use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use reqwest::Client;

use davfs_xml::XmlBody;

use crate::config::{Mount, ResolvedConnection};
use crate::error::{Error, Result};
use crate::listing::{transform_readdir, DirEntry};
use crate::path::dav_url;
use crate::request::{execute, execute_xml, DavMethod, RequestOptions};

pub type FileStream = BoxStream<'static, Result<Bytes>>;

/// Operations a virtual filesystem dispatches to a mounted backend.
/// Every path is mount-qualified (`home:/docs/a.txt`).
#[async_trait]
pub trait VfsAdapter: Send + Sync {
    /// Content of a file, streamed as it arrives
    async fn readfile(&self, file: &str) -> Result<FileStream>;
    async fn writefile(&self, file: &str, data: Bytes) -> Result<XmlBody>;
    async fn unlink(&self, file: &str) -> Result<XmlBody>;
    async fn copy(&self, src: &str, dest: &str) -> Result<XmlBody>;
    async fn rename(&self, src: &str, dest: &str) -> Result<XmlBody>;
    /// `Ok(true)` when the server answered; any failure is an error,
    /// never `Ok(false)`
    async fn exists(&self, file: &str) -> Result<bool>;
    async fn mkdir(&self, file: &str) -> Result<XmlBody>;
    async fn readdir(&self, root: &str) -> Result<Vec<DirEntry>>;
}

/// Build the adapter of a mount. Configuration problems are reported by each
/// operation, not here.
pub fn adapter(mount: &Mount) -> Result<WebDavAdapter> {
    WebDavAdapter::new(mount)
}

pub struct WebDavAdapter {
    client: Client,
    connection: Option<ResolvedConnection>,
}

impl WebDavAdapter {
    pub fn new(mount: &Mount) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(mount, client))
    }

    /// Share one HTTP client (and its connection pool) between mounts
    pub fn with_client(mount: &Mount, client: Client) -> Self {
        Self {
            client,
            connection: ResolvedConnection::from_mount(mount),
        }
    }

    pub fn connection(&self) -> Option<&ResolvedConnection> {
        self.connection.as_ref()
    }

    /// Check we can make a request with what we have
    fn before(&self) -> Result<&ResolvedConnection> {
        self.connection
            .as_ref()
            .ok_or_else(|| Error::Configuration("no server uri".into()))
    }

    async fn xml_request(
        &self,
        method: DavMethod,
        file: &str,
        options: RequestOptions,
    ) -> Result<XmlBody> {
        let conn = self.before()?;
        execute_xml(&self.client, conn, method, &dav_url(conn, file), options).await
    }

    async fn transfer(&self, method: DavMethod, src: &str, dest: &str) -> Result<XmlBody> {
        let conn = self.before()?;
        let options = RequestOptions::destination(dav_url(conn, dest));
        execute_xml(&self.client, conn, method, &dav_url(conn, src), options).await
    }
}

#[async_trait]
impl VfsAdapter for WebDavAdapter {
    async fn readfile(&self, file: &str) -> Result<FileStream> {
        let conn = self.before()?;
        let url = dav_url(conn, file);
        let response = execute(
            &self.client,
            conn,
            DavMethod::Get,
            &url,
            RequestOptions::default(),
        )
        .await?;
        Ok(response.bytes_stream().map_err(Error::from).boxed())
    }

    async fn writefile(&self, file: &str, data: Bytes) -> Result<XmlBody> {
        self.xml_request(DavMethod::Put, file, RequestOptions::body(data))
            .await
    }

    async fn unlink(&self, file: &str) -> Result<XmlBody> {
        self.xml_request(DavMethod::Delete, file, RequestOptions::default())
            .await
    }

    async fn copy(&self, src: &str, dest: &str) -> Result<XmlBody> {
        self.transfer(DavMethod::Copy, src, dest).await
    }

    async fn rename(&self, src: &str, dest: &str) -> Result<XmlBody> {
        self.transfer(DavMethod::Move, src, dest).await
    }

    async fn exists(&self, file: &str) -> Result<bool> {
        self.xml_request(DavMethod::Propfind, file, RequestOptions::default())
            .await?;
        Ok(true)
    }

    async fn mkdir(&self, file: &str) -> Result<XmlBody> {
        self.xml_request(DavMethod::Mkcol, file, RequestOptions::default())
            .await
    }

    async fn readdir(&self, root: &str) -> Result<Vec<DirEntry>> {
        let conn = self.before()?;
        let body = execute_xml(
            &self.client,
            conn,
            DavMethod::Propfind,
            &dav_url(conn, root),
            RequestOptions::default(),
        )
        .await?;
        let entries = transform_readdir(conn, root, &body);
        tracing::debug!(root=%root, count=entries.len(), "directory listed");
        Ok(entries)
    }
}
