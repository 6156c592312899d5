//! Responsive rendering: chunk streams to final CSS for one device.
//!
//! A [`StyleEngine`] renders compiled stylesheets against the current
//! [`DeviceProfile`] and caches the text per `(file, variant)`. Every cache
//! entry remembers how it was produced, so swapping in a new profile
//! re-renders all of them in the order they were first requested.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tokio::sync::watch;

use crate::chunk::{Chunk, UnitKind};
use crate::device::{DeviceMetrics, DeviceProfile};
use crate::error::RenderError;
use crate::package::Package;

/// Cache slot of one rendered stylesheet variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: PathBuf,
    pub suffix: String,
}

impl CacheKey {
    pub fn new(path: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            suffix: suffix.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.path.display(), self.suffix)
    }
}

/// Walks the chunk stream of one stylesheet.
///
/// Renderers hold no output; the stream is walked again on every call.
#[derive(Debug)]
pub struct SheetRenderer {
    path: PathBuf,
}

impl SheetRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Produces the CSS text of this stylesheet, imports inlined.
    pub fn render(&self, package: &Package, profile: &DeviceProfile) -> Result<String, RenderError> {
        let mut makeup = Makeup {
            package,
            profile,
            reference_width: package.options().reference_width,
            active: Vec::new(),
            output: String::new(),
        };
        makeup.walk(&self.path)?;

        log::trace!(
            "RENDER: {} -> {} byte(s) at width {}",
            self.path.display(),
            makeup.output.len(),
            profile.width()
        );
        Ok(makeup.output)
    }
}

struct Makeup<'a> {
    package: &'a Package,
    profile: &'a DeviceProfile,
    reference_width: f64,
    /// Stylesheets currently being inlined, outermost first.
    active: Vec<&'a Path>,
    output: String,
}

impl<'a> Makeup<'a> {
    fn walk(&mut self, path: &Path) -> Result<(), RenderError> {
        let package = self.package;
        let sheet = package
            .get(path)
            .ok_or_else(|| RenderError::UnknownStylesheet(package.locate(path)))?;

        if self.active.contains(&sheet.path()) {
            return Err(RenderError::CyclicImport(sheet.path().to_path_buf()));
        }
        self.active.push(sheet.path());

        for chunk in sheet.chunks() {
            match chunk {
                Chunk::Text(text) => self.output.push_str(text),
                Chunk::Unit {
                    kind: UnitKind::Pixel,
                    raw,
                } => {
                    let pixels = self
                        .profile
                        .resolve_unit_against(*raw, self.reference_width);
                    self.output.push_str(&pixels.to_string());
                    self.output.push_str("px");
                }
                Chunk::Unit {
                    kind: UnitKind::Suffix,
                    ..
                } => {}
                Chunk::Nested(target) => self.walk(target)?,
            }
        }

        self.active.pop();
        Ok(())
    }
}

/// How a cache entry is regenerated after a profile change.
#[derive(Clone)]
struct Recalculation {
    key: CacheKey,
    renderer: Arc<SheetRenderer>,
}

type Listener = Arc<dyn Fn(&CacheKey, &str) + Send + Sync>;

/// Renders stylesheets of one package for the current device.
pub struct StyleEngine {
    package: Arc<Package>,
    /// Held for reading by renders and for writing by profile changes.
    profile: RwLock<Arc<DeviceProfile>>,
    renderers: Mutex<HashMap<PathBuf, Arc<SheetRenderer>>>,
    sheets: Mutex<HashMap<CacheKey, String>>,
    recalculations: Mutex<Vec<Recalculation>>,
    listeners: Mutex<Vec<Listener>>,
}

impl StyleEngine {
    pub fn new(package: Arc<Package>, profile: DeviceProfile) -> Self {
        Self {
            package,
            profile: RwLock::new(Arc::new(profile)),
            renderers: Mutex::new(HashMap::new()),
            sheets: Mutex::new(HashMap::new()),
            recalculations: Mutex::new(Vec::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    /// The profile renders currently use.
    pub fn profile(&self) -> Arc<DeviceProfile> {
        Arc::clone(&self.profile.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Renders the stylesheet at `path` and caches it under `suffix`.
    ///
    /// The first render of a `(path, suffix)` pair also registers it for
    /// recalculation on every later profile change.
    pub fn render(&self, path: impl AsRef<Path>, suffix: &str) -> Result<String, RenderError> {
        let path = path.as_ref();
        let sheet = self
            .package
            .get(path)
            .ok_or_else(|| RenderError::UnknownStylesheet(self.package.locate(path)))?;

        let profile = self.profile.read().unwrap_or_else(PoisonError::into_inner);
        let renderer = self.renderer_for(sheet.path());
        let css = renderer.render(&self.package, &profile)?;

        let key = CacheKey::new(sheet.path(), suffix);
        let fresh = lock(&self.sheets)
            .insert(key.clone(), css.clone())
            .is_none();
        if fresh {
            log::debug!("RENDER: registered recalculation for {}", key);
            lock(&self.recalculations).push(Recalculation { key, renderer });
        }
        Ok(css)
    }

    /// The last text rendered for `(path, suffix)`.
    pub fn cached(&self, path: impl AsRef<Path>, suffix: &str) -> Option<String> {
        let key = CacheKey::new(self.package.locate(path), suffix);
        lock(&self.sheets).get(&key).cloned()
    }

    /// The renderer already created for `path`, if any.
    pub fn renderer(&self, path: impl AsRef<Path>) -> Option<Arc<SheetRenderer>> {
        lock(&self.renderers)
            .get(&self.package.locate(path))
            .cloned()
    }

    /// Number of `(file, variant)` pairs kept up to date.
    pub fn recalculation_count(&self) -> usize {
        lock(&self.recalculations).len()
    }

    /// Calls `listener` with the key and new text of every cache entry
    /// regenerated by a profile change.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&CacheKey, &str) + Send + Sync + 'static,
    {
        lock(&self.listeners).push(Arc::new(listener));
    }

    /// Swaps in `profile` and re-renders every cached entry.
    ///
    /// Entries are regenerated in registration order while renders are
    /// held off; listeners run once all of them are done. Every entry
    /// rendered once against the same package, so a failure here stops the
    /// pass and leaves the remaining entries untouched.
    pub fn apply_profile(&self, profile: DeviceProfile) -> Result<(), RenderError> {
        let mut updated = Vec::new();
        {
            let mut current = self.profile.write().unwrap_or_else(PoisonError::into_inner);
            *current = Arc::new(profile);

            let recalculations = lock(&self.recalculations).clone();
            for recalculation in recalculations {
                let css = recalculation.renderer.render(&self.package, &current)?;
                lock(&self.sheets).insert(recalculation.key.clone(), css.clone());
                updated.push((recalculation.key, css));
            }

            log::info!(
                "RENDER: applied profile {}x{}@{}, {} entr(ies) updated",
                current.width(),
                current.height(),
                current.pixel_ratio(),
                updated.len()
            );
        }

        let listeners = lock(&self.listeners).clone();
        for (key, css) in &updated {
            for listener in &listeners {
                listener(key, css);
            }
        }

        Ok(())
    }

    fn renderer_for(&self, path: &Path) -> Arc<SheetRenderer> {
        let mut renderers = lock(&self.renderers);
        Arc::clone(
            renderers
                .entry(path.to_path_buf())
                .or_insert_with(|| Arc::new(SheetRenderer::new(path))),
        )
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Applies every metrics update published on `metrics` to `engine`.
///
/// Returns once the sender is dropped. Failed recalculations are logged and
/// do not stop the pump.
pub async fn watch_device(engine: Arc<StyleEngine>, mut metrics: watch::Receiver<DeviceMetrics>) {
    while metrics.changed().await.is_ok() {
        let profile = DeviceProfile::from_metrics(&metrics.borrow_and_update());
        if let Err(err) = engine.apply_profile(profile) {
            log::warn!("DEVICE: {}", err);
        }
    }
    log::debug!("DEVICE: metrics sender dropped, watch finished");
}

/// Runs [`watch_device`] on a background task.
///
/// The watch is cancelled when the returned handle is dropped.
pub fn spawn_device_watch(
    engine: Arc<StyleEngine>,
    metrics: watch::Receiver<DeviceMetrics>,
) -> DeviceWatchHandle {
    let (cancel_tx, cancel_rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        tokio::select! {
            _ = watch_device(engine, metrics) => {}
            _ = cancel_rx => {}
        }
    });

    DeviceWatchHandle {
        cancel_tx: Some(cancel_tx),
    }
}

/// Handle to a running device watch.
pub struct DeviceWatchHandle {
    cancel_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl DeviceWatchHandle {
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for DeviceWatchHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::BundleOptions;

    fn engine(files: &[(&str, &str)], width: f64) -> StyleEngine {
        let mut package = Package::new("/pkg", BundleOptions::default());
        for (path, source) in files {
            package.insert(path, Some(source.to_string()));
        }
        package.compile_all().unwrap();
        StyleEngine::new(Arc::new(package), DeviceProfile::new("android", width, 800.0, 2.0))
    }

    #[test]
    fn test_cache_key_display() {
        let key = CacheKey::new("/pkg/a.wxss", "dark");
        assert_eq!(key.to_string(), "/pkg/a.wxss-dark");
    }

    #[test]
    fn test_renderer_is_reused() {
        let engine = engine(&[("a.wxss", ".a{width:10rpx}")], 375.0);
        engine.render("a.wxss", "").unwrap();
        let first = engine.renderer("a.wxss").unwrap();
        engine.render("a.wxss", "other").unwrap();
        let second = engine.renderer("a.wxss").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_one_recalculation_per_variant() {
        let engine = engine(&[("a.wxss", ".a{}")], 375.0);
        engine.render("a.wxss", "").unwrap();
        engine.render("a.wxss", "").unwrap();
        engine.render("a.wxss", "x").unwrap();

        assert_eq!(engine.recalculation_count(), 2);
    }

    #[test]
    fn test_unknown_stylesheet() {
        let engine = engine(&[], 375.0);
        assert_eq!(
            engine.render("nope.wxss", "").unwrap_err(),
            RenderError::UnknownStylesheet(PathBuf::from("/pkg/nope.wxss"))
        );
    }

    #[test]
    fn test_cycle_while_rendering_unresolved_package() {
        let engine = engine(
            &[
                ("a.wxss", "@import \"b.wxss\";"),
                ("b.wxss", "@import \"a.wxss\";"),
            ],
            375.0,
        );
        assert_eq!(
            engine.render("a.wxss", "").unwrap_err(),
            RenderError::CyclicImport(PathBuf::from("/pkg/a.wxss"))
        );
    }
}
