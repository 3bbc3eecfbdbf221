//! Transient asset registry.
//!
//! The engine core never performs file I/O: it receives ready handles and
//! releases them through a [`ResourceReclaimer`]. [`FileLibrary`] is the
//! CLI's allocator: `create` registers a path under a fresh token, and
//! `revoke` forgets it. Clones share the same registry, so the surface
//! can resolve handles the command created.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use resona_engine::{AssetHandle, ResourceReclaimer};
use tracing::debug;

/// Shared handle-to-path registry for loaded assets.
#[derive(Clone, Default)]
pub struct FileLibrary {
    inner: Rc<RefCell<LibraryInner>>,
}

#[derive(Default)]
struct LibraryInner {
    entries: HashMap<String, PathBuf>,
    next_id: u64,
}

impl FileLibrary {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a path and return its transient handle.
    pub fn create(&self, path: impl AsRef<Path>) -> AssetHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let token = format!("asset-{}", inner.next_id);
        inner.entries.insert(token.clone(), path.as_ref().to_path_buf());
        AssetHandle::new(token)
    }

    /// Resolve a handle back to its path, if it is still live.
    pub fn resolve(&self, handle: &AssetHandle) -> Option<PathBuf> {
        self.inner.borrow().entries.get(handle.as_str()).cloned()
    }
}

impl ResourceReclaimer for FileLibrary {
    fn revoke(&mut self, handle: AssetHandle) {
        debug!(handle = handle.as_str(), "revoking transient asset");
        self.inner.borrow_mut().entries.remove(handle.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_resolve_revoke() {
        let library = FileLibrary::new();
        let handle = library.create("/tmp/a.wav");
        assert!(library.resolve(&handle).is_some());

        let mut clone = library.clone();
        clone.revoke(handle.clone());
        assert!(library.resolve(&handle).is_none());
    }

    #[test]
    fn handles_are_unique() {
        let library = FileLibrary::new();
        let a = library.create("/tmp/a.wav");
        let b = library.create("/tmp/a.wav");
        assert_ne!(a, b);
    }
}
