//! Platform visual-compliance features requested at [`ComplianceLevel::Full`].
//!
//! The engine does not lay anything out. At the full compliance level it asks
//! a [`VisualComplianceProvider`] for the minimum interactive size, standard
//! margin and focus indicator of the target platform and hands the answer to
//! the node untouched.
//!
//! [`PlatformGuidelines`] is the default provider and returns the values
//! published in each platform's human interface guidelines.
//!
//! [`ComplianceLevel::Full`]: crate::ComplianceLevel::Full

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target platform for visual-compliance lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Platform {
    /// iOS and iPadOS.
    Ios,
    /// macOS.
    Macos,
    /// Android.
    Android,
    /// Windows.
    Windows,
    /// Linux desktops.
    Linux,
    /// Web browsers.
    Web,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(target_os = "macos") {
            Self::Macos
        } else if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_family = "wasm") {
            Self::Web
        } else {
            Self::Linux
        }
    }

    /// Lowercase name, as used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Macos => "macos",
            Self::Android => "android",
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Web => "web",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown platform name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown platform '{0}'")]
pub struct ParsePlatformError(pub String);

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" | "ipados" => Ok(Self::Ios),
            "macos" | "osx" => Ok(Self::Macos),
            "android" => Ok(Self::Android),
            "windows" => Ok(Self::Windows),
            "linux" => Ok(Self::Linux),
            "web" | "wasm" => Ok(Self::Web),
            _ => Err(ParsePlatformError(s.to_string())),
        }
    }
}

/// A width/height pair in platform-independent units (points, dp, px).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSize {
    pub width: f32,
    pub height: f32,
}

impl TargetSize {
    /// Create a square size.
    pub const fn square(side: f32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}

/// How keyboard focus is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusStyle {
    /// A ring drawn outside the control bounds.
    Ring,
    /// A highlight behind or over the control.
    Highlight,
    /// A rectangle drawn outside the control bounds.
    Outline,
}

/// Focus indicator styling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusIndicator {
    pub style: FocusStyle,
    pub width: f32,
}

/// Visual-compliance features for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualCompliance {
    /// Platform the values were produced for.
    pub platform: Platform,
    /// Minimum interactive target size.
    pub min_target: TargetSize,
    /// Standard margin around interactive content.
    pub margin: f32,
    /// Focus indicator styling.
    pub focus: FocusIndicator,
}

/// Source of platform visual-compliance values.
///
/// Implemented by the rendering layer when it has its own metrics; the
/// engine only forwards what it returns.
pub trait VisualComplianceProvider: Send + Sync {
    /// Return visual-compliance values for `platform`.
    fn visual_compliance(&self, platform: Platform) -> VisualCompliance;
}

/// Provider returning published platform guideline values.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformGuidelines;

impl VisualComplianceProvider for PlatformGuidelines {
    fn visual_compliance(&self, platform: Platform) -> VisualCompliance {
        // Minimum side, margin, focus style, focus width.
        let (side, margin, style, width) = match platform {
            Platform::Ios => (44.0, 16.0, FocusStyle::Highlight, 2.0),
            Platform::Macos => (28.0, 20.0, FocusStyle::Ring, 3.0),
            Platform::Android => (48.0, 16.0, FocusStyle::Highlight, 2.0),
            Platform::Windows => (40.0, 12.0, FocusStyle::Outline, 2.0),
            Platform::Linux => (34.0, 12.0, FocusStyle::Outline, 2.0),
            Platform::Web => (44.0, 16.0, FocusStyle::Outline, 2.0),
        };

        VisualCompliance {
            platform,
            min_target: TargetSize::square(side),
            margin,
            focus: FocusIndicator { style, width },
        }
    }
}
