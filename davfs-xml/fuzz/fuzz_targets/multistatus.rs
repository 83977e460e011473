#![no_main]

use libfuzzer_sys::fuzz_target;
use tokio::runtime::Builder;

use davfs_adapter::config::{Credentials, ResolvedConnection, DEFAULT_NAMESPACE, DEFAULT_PREFIX};
use davfs_adapter::listing::transform_readdir;

fuzz_target!(|data: &[u8]| {
    let rt = Builder::new_current_thread()
        .build()
        .expect("runtime");
    let body = rt.block_on(davfs_xml::parse(data));

    let conn = ResolvedConnection {
        uri: "http://localhost".into(),
        prefix: DEFAULT_PREFIX.into(),
        ns: DEFAULT_NAMESPACE.into(),
        credentials: Credentials::Bearer("fuzz".into()),
    };
    for root in ["m:", "m:/", "m:/dir", "m:/dir/"] {
        for entry in transform_readdir(&conn, root, &body) {
            assert!(!entry.filename.is_empty());
            assert!(!entry.filename.starts_with('/'));
            assert_eq!(entry.is_file, !entry.is_directory);
            assert!(entry.path.starts_with(root));
        }
    }
});
