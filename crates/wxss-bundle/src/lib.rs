//! Compiles the stylesheets of a mini-app package and renders them for a
//! device.
//!
//! ```
//! use std::sync::Arc;
//! use wxss_bundle::{BundleOptions, DeviceProfile, Package, StyleEngine};
//!
//! let mut package = Package::new("/pkg", BundleOptions::default());
//! package.insert("app.wxss", Some(".a{width:10rpx}".to_string()));
//! package.process().unwrap();
//!
//! let engine = StyleEngine::new(Arc::new(package), DeviceProfile::new("android", 375.0, 667.0, 2.0));
//! assert_eq!(engine.render("app.wxss", "").unwrap(), ".a{width:5px}");
//! ```

pub mod chunk;
pub mod compile;
pub mod device;
pub mod error;
pub mod graph;
mod log_init;
pub mod package;
pub mod path;
pub mod render;
pub mod stylesheet;
pub mod transform;

pub use chunk::{Chunk, ChunkAccumulator, ChunkStream, UnitKind};
pub use compile::{CompileContext, CompiledStylesheet, compile};
pub use device::{DeviceMetrics, DeviceProfile, Orientation};
pub use error::{
    BundleError, CompileError, CompileErrors, CyclicImportError, RenderError, Result,
};
pub use graph::resolve_graph;
pub use log_init::init_logger;
pub use package::{BundleOptions, Package, StylesheetLookup};
pub use render::{
    CacheKey, DeviceWatchHandle, SheetRenderer, StyleEngine, spawn_device_watch, watch_device,
};
pub use stylesheet::{ImportEdge, ImportRef, Stylesheet};
pub use transform::{
    DeclarationOutcome, DeclarationTransform, PassthroughSelector, RpxDeclaration,
    SelectorTransform, TagPrefixSelector, TransformError, Transforms,
};

// Re-export so callers can use wxss_bundle::log::info!, etc.
pub use log;
pub use wxss;
