use std::path::{Component, Path};

use crate::TransferError;

/// Checks that a `/`-separated relative path stays inside the directory it is
/// joined onto.
///
/// Object keys from the remote side are mapped onto a local root, so empty
/// keys, absolute paths, drive or UNC prefixes and any `..` component are
/// rejected.
pub fn validate_relative_path(relative: &str) -> Result<(), TransferError> {
    let reject = |reason: &str| Err(TransferError::InvalidPath(format!("{reason}: {relative}")));

    if relative.is_empty() {
        return Err(TransferError::InvalidPath("empty path".into()));
    }

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return reject("parent directory traversal not allowed"),
            Component::RootDir | Component::Prefix(_) => {
                return reject("absolute path not allowed");
            }
        }
    }
    Ok(())
}
