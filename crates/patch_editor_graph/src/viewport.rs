// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pan/zoom transform between content space and the canvas.
//!
//! The mapping is `screen = (content + pan) * zoom`, with screen positions
//! measured from the canvas origin. Updates are incremental and each one is
//! applied to the current state on its own, so a dropped gesture update never
//! leaves the state inconsistent.

use crate::gesture::GestureEvent;
use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// Error for transform updates on an invalid state
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ViewportError {
    /// Zoom must be strictly positive and finite
    #[error("Invalid zoom {0}: zoom must be positive and finite")]
    InvalidZoom(f32),
}

/// Current pan offset and zoom factor, owned by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    /// Content-space translation applied before scaling
    pub pan: Vec2,
    /// Content-to-screen scale factor
    pub zoom: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl ViewportState {
    /// Create a viewport state
    pub fn new(pan: Vec2, zoom: f32) -> Self {
        Self { pan, zoom }
    }

    fn checked_zoom(&self) -> Result<f32, ViewportError> {
        if self.zoom > 0.0 && self.zoom.is_finite() {
            Ok(self.zoom)
        } else {
            Err(ViewportError::InvalidZoom(self.zoom))
        }
    }

    /// Pan by a screen-space delta.
    ///
    /// The delta is divided by zoom so a drag moves content by the same number
    /// of pixels at any zoom level.
    pub fn apply_pan(self, delta: Vec2) -> Result<Self, ViewportError> {
        let zoom = self.checked_zoom()?;
        Ok(Self {
            pan: self.pan + delta / zoom,
            zoom,
        })
    }

    /// Multiply zoom by `scale_factor`, keeping the content under `focal`
    /// (screen space) fixed.
    ///
    /// A non-positive or non-finite factor is rejected and the state is
    /// returned unchanged.
    pub fn apply_zoom(self, focal: Pos2, scale_factor: f32) -> Result<Self, ViewportError> {
        let zoom = self.checked_zoom()?;
        if !(scale_factor > 0.0 && scale_factor.is_finite()) {
            tracing::warn!("Ignoring pinch update with scale factor {scale_factor}");
            return Ok(self);
        }
        Ok(self.zoom_to(focal, zoom * scale_factor))
    }

    /// Set zoom to `new_zoom` around `focal`. Both zooms must be valid.
    fn zoom_to(self, focal: Pos2, new_zoom: f32) -> Self {
        let focal = focal.to_vec2();
        let content_under_focal = focal / self.zoom - self.pan;
        Self {
            pan: focal / new_zoom - content_under_focal,
            zoom: new_zoom,
        }
    }

    /// Map a canvas position into content space
    pub fn screen_to_content(&self, screen: Pos2) -> Pos2 {
        (screen.to_vec2() / self.zoom - self.pan).to_pos2()
    }

    /// Map a content position onto the canvas
    pub fn content_to_screen(&self, content: Pos2) -> Pos2 {
        ((content.to_vec2() + self.pan) * self.zoom).to_pos2()
    }

    /// Scale a content-space length to screen space
    pub fn scale_to_screen(&self, length: f32) -> f32 {
        length * self.zoom
    }

    /// Scale a screen-space length to content space
    pub fn scale_to_content(&self, length: f32) -> f32 {
        length / self.zoom
    }
}

/// Allowed zoom range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    /// Smallest zoom
    pub min: f32,
    /// Largest zoom
    pub max: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self { min: 0.1, max: 4.0 }
    }
}

impl ZoomLimits {
    /// Both bounds finite and `0 < min <= max`
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
    }

    /// Clamp a zoom into the range. Invalid limits leave the zoom untouched.
    pub fn clamp(&self, zoom: f32) -> f32 {
        if self.is_valid() {
            zoom.clamp(self.min, self.max)
        } else {
            zoom
        }
    }
}

/// Applies normalized gesture events to a [`ViewportState`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportController {
    /// Zoom range enforced after each pinch
    pub limits: ZoomLimits,
}

impl ViewportController {
    /// Create a controller with the given limits.
    ///
    /// Invalid limits are replaced by the defaults.
    pub fn new(limits: ZoomLimits) -> Self {
        if limits.is_valid() {
            Self { limits }
        } else {
            tracing::warn!("Invalid zoom limits {}..{}, using defaults", limits.min, limits.max);
            Self::default()
        }
    }

    /// State transition for one gesture event.
    ///
    /// Pinches are clamped to the zoom limits; the pan is computed from the
    /// clamped zoom so the focal point still stays put.
    pub fn apply(&self, state: ViewportState, event: &GestureEvent) -> Result<ViewportState, ViewportError> {
        match *event {
            GestureEvent::Pan { delta } => state.apply_pan(delta),
            GestureEvent::Pinch { focal, scale } => {
                let zoomed = state.apply_zoom(focal, scale)?;
                let clamped = self.limits.clamp(zoomed.zoom);
                if clamped == zoomed.zoom {
                    Ok(zoomed)
                } else {
                    Ok(state.zoom_to(focal, clamped))
                }
            }
        }
    }

    /// Fold a batch of events into the state
    pub fn apply_all<'a>(
        &self,
        state: ViewportState,
        events: impl IntoIterator<Item = &'a GestureEvent>,
    ) -> Result<ViewportState, ViewportError> {
        events
            .into_iter()
            .try_fold(state, |state, event| self.apply(state, event))
    }
}
