//! Internal constants for diagram rendering.

use std::time::Duration;

/// Default HTTP timeout for Kroki requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Prefix of the per-diagram render identifier (`mermaid-<index>`).
pub(crate) const DIAGRAM_ID_PREFIX: &str = "mermaid";

/// Zoom increment applied by the zoom-in and zoom-out buttons.
pub(crate) const ZOOM_STEP: f64 = 0.2;

/// Smallest scale the zoom-out button can reach.
pub(crate) const MIN_ZOOM: f64 = 0.2;
