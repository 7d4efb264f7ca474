use std::collections::HashMap;
use std::sync::Arc;

use glitch_core::{Fingerprint, Image8};
use tracing::debug;

/// In-memory preview cache keyed by effects fingerprint.
///
/// Unbounded: entries live until [`PreviewCache::clear`] or until the cache
/// is dropped with its session.
#[derive(Debug, Default)]
pub struct PreviewCache {
    entries: HashMap<Fingerprint, Arc<Image8>>,
}

impl PreviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &Fingerprint) -> Option<Arc<Image8>> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &Fingerprint) -> bool {
        self.entries.contains_key(key)
    }

    /// Store a rendered preview, replacing any previous entry for `key`.
    pub fn insert(&mut self, key: Fingerprint, image: Arc<Image8>) {
        debug!(fingerprint = %key, entries = self.entries.len() + 1, "cached preview");
        self.entries.insert(key, image);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glitch_core::{EffectSpec, fingerprint};
    use glitch_core::effects::{BoxBlur, Effect};

    fn key(kernel_size: u32) -> Fingerprint {
        fingerprint(&EffectSpec::default().with(Effect::BoxBlur(BoxBlur { kernel_size })))
    }

    #[test]
    fn store_and_get() {
        let mut cache = PreviewCache::new();
        assert!(cache.is_empty());

        let img = Arc::new(Image8::filled(2, 2, 3, 7).unwrap());
        cache.insert(key(3), img.clone());
        assert!(cache.contains(&key(3)));
        assert_eq!(cache.get(&key(3)).unwrap(), img);
        assert!(cache.get(&key(5)).is_none());
    }

    #[test]
    fn overwrite_existing_entry() {
        let mut cache = PreviewCache::new();
        cache.insert(key(3), Arc::new(Image8::filled(1, 1, 1, 1).unwrap()));
        cache.insert(key(3), Arc::new(Image8::filled(1, 1, 1, 2).unwrap()));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key(3)).unwrap().data, vec![2]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut cache = PreviewCache::new();
        for k in [3, 5, 7] {
            cache.insert(key(k), Arc::new(Image8::filled(1, 1, 1, 0).unwrap()));
        }
        assert_eq!(cache.len(), 3);
        cache.clear();
        assert!(cache.is_empty());
    }
}
