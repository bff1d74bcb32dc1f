//! Where tileset pixels come from.

use crate::error::MapError;
use image::RgbaImage;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Turns an image path into pixels.
///
/// The renderer asks again on every render and does not rely on getting the
/// same allocation back, so implementations may cache, reload or evict as
/// they like.
pub trait ResourceLocator {
    fn locate(&self, path: &Path) -> Result<Rc<RgbaImage>, MapError>;
}

impl<L: ResourceLocator + ?Sized> ResourceLocator for &L {
    fn locate(&self, path: &Path) -> Result<Rc<RgbaImage>, MapError> {
        (**self).locate(path)
    }
}

/// Decodes png, jpeg and gif files straight from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesystemLocator;

impl ResourceLocator for FilesystemLocator {
    fn locate(&self, path: &Path) -> Result<Rc<RgbaImage>, MapError> {
        let decoded = image::open(path).map_err(|source| MapError::Resource {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Rc::new(decoded.into_rgba8()))
    }
}

/// Remembers every image the wrapped locator produced, so each path is
/// loaded at most once until it is [unset](CachingLocator::unset).
#[derive(Debug, Default)]
pub struct CachingLocator<L> {
    inner: L,
    cache: RefCell<HashMap<PathBuf, Rc<RgbaImage>>>,
}

impl<L: ResourceLocator> CachingLocator<L> {
    pub fn new(inner: L) -> Self {
        CachingLocator {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Forgets `path`; the next lookup goes to the wrapped locator again.
    pub fn unset(&self, path: &Path) -> bool {
        self.cache.borrow_mut().remove(path).is_some()
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }

    pub fn is_cached(&self, path: &Path) -> bool {
        self.cache.borrow().contains_key(path)
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: ResourceLocator> ResourceLocator for CachingLocator<L> {
    fn locate(&self, path: &Path) -> Result<Rc<RgbaImage>, MapError> {
        if let Some(hit) = self.cache.borrow().get(path) {
            return Ok(Rc::clone(hit));
        }

        let loaded = self.inner.locate(path)?;
        debug!("cached tileset image {}", path.display());
        self.cache
            .borrow_mut()
            .insert(path.to_path_buf(), Rc::clone(&loaded));
        Ok(loaded)
    }
}
