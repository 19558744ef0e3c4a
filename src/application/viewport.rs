//! Viewport state behind the graph toolbar (zoom, fit, reset).

use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Layout, Position};

pub const ZOOM_STEP: f64 = 1.2;
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 2.0;

/// Canvas the chart is drawn on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    /// Margin kept around the nodes when fitting
    pub padding: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            padding: 50.0,
        }
    }
}

impl CanvasConfig {
    /// Fitting divides by the padded extent, so sizes must be usable.
    pub fn validate(&self) -> ApplicationResult<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(canvas_err(format!(
                    "viewport {name} must be positive and finite, got {value}"
                )));
            }
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(canvas_err(format!(
                "viewport padding must be finite and not negative, got {}",
                self.padding
            )));
        }
        Ok(())
    }
}

fn canvas_err(message: String) -> ApplicationError {
    ApplicationError::Config { message }
}

/// Visible region: the chart point at the canvas middle, and the zoom factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Position,
    pub zoom: f64,
}

impl Viewport {
    pub fn new(center: Position) -> Self {
        Self { center, zoom: 1.0 }
    }

    pub fn zoom_in(self) -> Self {
        self.with_zoom(self.zoom * ZOOM_STEP)
    }

    pub fn zoom_out(self) -> Self {
        self.with_zoom(self.zoom / ZOOM_STEP)
    }

    fn with_zoom(self, zoom: f64) -> Self {
        Self {
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            ..self
        }
    }

    /// Center on the layout's bounding box and zoom so it fits the canvas.
    ///
    /// An empty layout leaves the viewport unchanged.
    pub fn fit(self, layout: &Layout, canvas: &CanvasConfig) -> Self {
        let Some((min, max)) = layout.bounds() else {
            return self;
        };
        let width = (max.x - min.x) + 2.0 * canvas.padding;
        let height = (max.y - min.y) + 2.0 * canvas.padding;
        let zoom = (canvas.width / width).min(canvas.height / height);
        Self {
            center: Position::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Back to zoom 1 around `home`.
    pub fn reset(home: Position) -> Self {
        Self::new(home)
    }
}
