//! Mini-app stylesheet toolchain.
//!
//! [`wxss`] parses stylesheet source; [`bundle`] compiles whole packages,
//! checks their import graph and renders them for a device.

pub use wxss;
pub use wxss_bundle as bundle;

pub use wxss::parse_stylesheet;
pub use wxss_bundle::{
    BundleError, BundleOptions, DeviceMetrics, DeviceProfile, Package, Result, StyleEngine,
};
