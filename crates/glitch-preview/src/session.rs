use std::sync::Arc;
use std::time::{Duration, Instant};

use glitch_core::{EffectSpec, Fingerprint, Image8, Pipeline, Result, fingerprint};
use rand::RngCore;
use tracing::{debug, info};

use crate::cache::PreviewCache;
use crate::scaler::{PreviewMode, scale_for_preview};

/// Result of a preview render.
#[derive(Clone, Debug)]
pub struct PreviewOutcome {
    pub image: Arc<Image8>,
    pub fingerprint: Fingerprint,
    /// True when the image came from the cache and no filter ran.
    pub cached: bool,
    pub elapsed: Duration,
}

/// Interactive editing session over one source image.
///
/// Owns the downscaled preview source and the preview cache. The cache is
/// keyed by effects fingerprint only, so it is cleared whenever the preview
/// source changes.
pub struct PreviewSession {
    pipeline: Pipeline,
    source: Image8,
    mode: PreviewMode,
    preview_source: Image8,
    cache: PreviewCache,
    last_fingerprint: Option<Fingerprint>,
}

impl PreviewSession {
    pub fn new(source: Image8, mode: PreviewMode) -> Result<Self> {
        let preview_source = scale_for_preview(&source, mode)?;
        info!(
            source = ?source.dims(),
            preview = ?preview_source.dims(),
            mode = mode.label(),
            "preview session started"
        );
        Ok(Self {
            pipeline: Pipeline::new(),
            source,
            mode,
            preview_source,
            cache: PreviewCache::new(),
            last_fingerprint: None,
        })
    }

    pub fn mode(&self) -> PreviewMode {
        self.mode
    }

    pub fn source(&self) -> &Image8 {
        &self.source
    }

    pub fn preview_source(&self) -> &Image8 {
        &self.preview_source
    }

    pub fn cache(&self) -> &PreviewCache {
        &self.cache
    }

    /// Fingerprint of the most recent preview render, cached or not.
    pub fn last_fingerprint(&self) -> Option<&Fingerprint> {
        self.last_fingerprint.as_ref()
    }

    /// Switch preview quality. Re-scales the source and empties the cache.
    pub fn set_mode(&mut self, mode: PreviewMode) -> Result<()> {
        if mode == self.mode {
            return Ok(());
        }
        self.preview_source = scale_for_preview(&self.source, mode)?;
        self.mode = mode;
        self.cache.clear();
        self.last_fingerprint = None;
        debug!(mode = mode.label(), "preview mode changed");
        Ok(())
    }

    /// Render `spec` on the preview source, reusing a cached result when the
    /// fingerprint has been seen before.
    pub fn render(&mut self, spec: &EffectSpec, rng: &mut dyn RngCore) -> Result<PreviewOutcome> {
        let started = Instant::now();
        let fp = fingerprint(spec);

        if let Some(image) = self.cache.get(&fp) {
            debug!(fingerprint = %fp, "preview cache hit");
            self.last_fingerprint = Some(fp.clone());
            return Ok(PreviewOutcome {
                image,
                fingerprint: fp,
                cached: true,
                elapsed: started.elapsed(),
            });
        }

        self.compute(fp, spec, rng, started)
    }

    /// Re-render `spec` even when a cached preview exists, replacing the
    /// cache entry. Re-rolls the random effects for an unchanged spec.
    pub fn refresh(&mut self, spec: &EffectSpec, rng: &mut dyn RngCore) -> Result<PreviewOutcome> {
        let started = Instant::now();
        let fp = fingerprint(spec);
        debug!(fingerprint = %fp, replaces = self.cache.contains(&fp), "preview refresh");
        self.compute(fp, spec, rng, started)
    }

    fn compute(
        &mut self,
        fp: Fingerprint,
        spec: &EffectSpec,
        rng: &mut dyn RngCore,
        started: Instant,
    ) -> Result<PreviewOutcome> {
        let image = Arc::new(self.pipeline.apply(&self.preview_source, spec, rng)?);
        self.cache.insert(fp.clone(), image.clone());
        self.last_fingerprint = Some(fp.clone());

        let elapsed = started.elapsed();
        debug!(
            fingerprint = %fp,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "preview rendered"
        );
        Ok(PreviewOutcome {
            image,
            fingerprint: fp,
            cached: false,
            elapsed,
        })
    }

    /// Full-resolution render. Always recomputed, never cached.
    pub fn render_full(&self, spec: &EffectSpec, rng: &mut dyn RngCore) -> Result<Image8> {
        let started = Instant::now();
        let out = self.pipeline.apply(&self.source, spec, rng)?;
        info!(
            effects = ?spec.active_effect_names(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "full quality render"
        );
        Ok(out)
    }
}
