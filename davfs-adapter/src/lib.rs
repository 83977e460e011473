//! A WebDAV server seen as a virtual filesystem backend.
//!
//! Filesystem operations become WebDAV requests against the mount's server:
//!
//! | operation   | method   |
//! |-------------|----------|
//! | `readfile`  | GET      |
//! | `writefile` | PUT      |
//! | `unlink`    | DELETE   |
//! | `copy`      | COPY     |
//! | `rename`    | MOVE     |
//! | `exists`    | PROPFIND |
//! | `mkdir`     | MKCOL    |
//! | `readdir`   | PROPFIND |
//!
//! Paths are mount-qualified (`home:/docs/a.txt`), the mount segment is
//! replaced by the server uri and prefix (`https://dav.example.com/webdav/docs/a.txt`).

pub mod auth;
pub mod config;
pub mod error;
pub mod listing;
pub mod path;
pub mod request;

mod adapter;

pub use adapter::{adapter, FileStream, VfsAdapter, WebDavAdapter};
pub use config::{Connection, Mount, MountAttributes, ResolvedConnection};
pub use davfs_xml::XmlBody;
pub use error::{Error, Result};
pub use listing::DirEntry;
