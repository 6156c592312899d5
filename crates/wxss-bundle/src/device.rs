//! Device profiles and `rpx` resolution.
//!
//! A [`DeviceProfile`] is an immutable snapshot of the screen a stylesheet is
//! rendered for. Nothing here reads platform globals: callers sample the
//! device into [`DeviceMetrics`], build a profile, and hand it to the engine.

/// The screen width, in `rpx`, that every device is scaled from.
pub const REFERENCE_WIDTH: f64 = 750.0;

/// Keeps values that land exactly on an integer from flooring one pixel short.
pub const EPSILON: f64 = 1e-4;

pub const DEFAULT_PLATFORM: &str = "android";
pub const DEFAULT_SCREEN_WIDTH: f64 = 375.0;
pub const DEFAULT_SCREEN_HEIGHT: f64 = 375.0;
pub const DEFAULT_PIXEL_RATIO: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Raw device readings. Missing readings fall back to the defaults above.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceMetrics {
    pub platform: Option<String>,
    pub screen_width: Option<f64>,
    pub screen_height: Option<f64>,
    pub pixel_ratio: Option<f64>,
    pub orientation: Orientation,
}

/// Everything a render pass needs to know about the device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceProfile {
    platform: String,
    width: f64,
    height: f64,
    pixel_ratio: f64,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::from_metrics(&DeviceMetrics::default())
    }
}

impl DeviceProfile {
    pub fn new(platform: impl Into<String>, width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            platform: platform.into(),
            width,
            height,
            pixel_ratio,
        }
    }

    /// Builds a profile from raw readings.
    ///
    /// In landscape the viewport width takes the screen height reading, so
    /// `rpx` keeps scaling against the short edge the layout was designed for.
    pub fn from_metrics(metrics: &DeviceMetrics) -> Self {
        let screen_width = metrics.screen_width.unwrap_or(DEFAULT_SCREEN_WIDTH);
        let height = metrics.screen_height.unwrap_or(DEFAULT_SCREEN_HEIGHT);
        let width = match metrics.orientation {
            Orientation::Portrait => screen_width,
            Orientation::Landscape => height,
        };

        Self {
            platform: metrics
                .platform
                .clone()
                .unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
            width,
            height,
            pixel_ratio: metrics.pixel_ratio.unwrap_or(DEFAULT_PIXEL_RATIO),
        }
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn is_ios(&self) -> bool {
        self.platform == "ios"
    }

    /// Converts `raw` rpx to whole device pixels against [`REFERENCE_WIDTH`].
    pub fn resolve_unit(&self, raw: f64) -> i64 {
        self.resolve_unit_against(raw, REFERENCE_WIDTH)
    }

    /// Converts `raw` rpx to whole device pixels.
    ///
    /// A non-zero value that floors to zero becomes a 1px hairline on
    /// low-density screens and on iOS, and disappears everywhere else.
    pub fn resolve_unit_against(&self, raw: f64, reference_width: f64) -> i64 {
        if raw == 0.0 {
            return 0;
        }

        let pixels = (raw / reference_width * self.width + EPSILON).floor() as i64;
        if pixels == 0 {
            if self.pixel_ratio == 1.0 || self.is_ios() {
                1
            } else {
                0
            }
        } else {
            pixels
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn android(width: f64, pixel_ratio: f64) -> DeviceProfile {
        DeviceProfile::new("android", width, 667.0, pixel_ratio)
    }

    #[test]
    fn test_half_width_device() {
        assert_eq!(android(375.0, 2.0).resolve_unit(100.0), 50);
        assert_eq!(android(375.0, 2.0).resolve_unit(10.0), 5);
    }

    #[test]
    fn test_epsilon_saves_exact_boundaries() {
        assert_eq!(android(750.0, 2.0).resolve_unit(7.0), 7);
        assert_eq!(android(414.0, 3.0).resolve_unit(750.0), 414);
    }

    #[test]
    fn test_zero_stays_zero() {
        assert_eq!(android(375.0, 1.0).resolve_unit(0.0), 0);
        assert_eq!(DeviceProfile::new("ios", 375.0, 667.0, 3.0).resolve_unit(0.0), 0);
    }

    #[test]
    fn test_hairline_on_low_density() {
        assert_eq!(android(375.0, 1.0).resolve_unit(1.0), 1);
    }

    #[test]
    fn test_hairline_on_ios() {
        assert_eq!(DeviceProfile::new("ios", 375.0, 667.0, 3.0).resolve_unit(1.0), 1);
    }

    #[test]
    fn test_hairline_vanishes_on_dense_android() {
        assert_eq!(android(375.0, 2.0).resolve_unit(1.0), 0);
    }

    #[test]
    fn test_negative_values_floor_down() {
        assert_eq!(android(375.0, 2.0).resolve_unit(-20.0), -10);
    }

    #[test]
    fn test_custom_reference_width() {
        assert_eq!(android(375.0, 2.0).resolve_unit_against(100.0, 375.0), 100);
    }

    #[test]
    fn test_defaults() {
        let profile = DeviceProfile::default();
        assert_eq!(profile.platform(), "android");
        assert_eq!(profile.width(), 375.0);
        assert_eq!(profile.height(), 375.0);
        assert_eq!(profile.pixel_ratio(), 2.0);
    }

    #[test]
    fn test_landscape_uses_height_reading() {
        let profile = DeviceProfile::from_metrics(&DeviceMetrics {
            platform: Some("ios".into()),
            screen_width: Some(812.0),
            screen_height: Some(375.0),
            pixel_ratio: Some(3.0),
            orientation: Orientation::Landscape,
        });
        assert_eq!(profile.width(), 375.0);
        assert!(profile.is_ios());
    }

    #[test]
    fn test_platform_match_is_exact() {
        assert!(!DeviceProfile::new("iOS", 375.0, 667.0, 3.0).is_ios());
        assert_eq!(DeviceProfile::new("iOS", 375.0, 667.0, 3.0).resolve_unit(1.0), 0);
    }
}
