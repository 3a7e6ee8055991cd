//! Page transforms and transition timing
//!
//! Pages are positioned by a [`PageTransform`]: a translation relative to
//! the container plus an opacity. Transitions interpolate between two
//! transforms over a [`TransitionTiming`].

use std::time::Duration;

/// Default transition length for push, pop, present and dismiss.
pub const DEFAULT_TRANSITION_MS: u64 = 250;

/// Size of the container pages are laid out in, in host units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Create a viewport of the given size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A 1×1 viewport, for hosts that lay pages out in fractions of the container.
    pub const fn unit() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::unit()
    }
}

/// Direction a page travels when it enters or leaves the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    /// Regular pages enter from the trailing edge.
    Horizontal,
    /// Modal pages rise from the bottom edge.
    Vertical,
}

impl SlideDirection {
    /// Direction used for a page with the given modality.
    pub const fn for_page(is_modal: bool) -> Self {
        if is_modal {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }

    /// Off-screen translation for this direction.
    pub fn offscreen(self, viewport: Viewport) -> (f32, f32) {
        match self {
            Self::Horizontal => (viewport.width, 0.0),
            Self::Vertical => (0.0, viewport.height),
        }
    }
}

/// Visual attributes the navigation stack owns on each page container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub opacity: f32,
}

impl PageTransform {
    /// Fully visible, untranslated.
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        opacity: 1.0,
    };

    /// A visible page translated by `(x, y)`.
    pub const fn translated(x: f32, y: f32) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
            opacity: 1.0,
        }
    }

    /// Same translation with a different opacity.
    pub const fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Check if the page contributes nothing to the rendered output.
    pub fn is_hidden(&self) -> bool {
        self.opacity <= 0.0
    }

    /// Interpolate toward `to` by `t` (clamped to `0.0..=1.0`).
    pub fn lerp(&self, to: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            translate_x: self.translate_x + (to.translate_x - self.translate_x) * t,
            translate_y: self.translate_y + (to.translate_y - self.translate_y) * t,
            opacity: self.opacity + (to.opacity - self.opacity) * t,
        }
    }
}

impl Default for PageTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Easing curve applied to transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseInOutCubic,
}

impl Easing {
    /// Map linear progress to eased progress.
    pub fn apply(self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOutCubic => ease_in_out_cubic(t),
        }
    }
}

/// Easing function - ease in out cubic
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Duration and curve of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTiming {
    pub duration: Duration,
    pub easing: Easing,
}

impl TransitionTiming {
    /// Create a timing with the default easing curve.
    pub fn from_millis(duration_ms: u64) -> Self {
        Self {
            duration: Duration::from_millis(duration_ms),
            easing: Easing::default(),
        }
    }

    /// A plain wait of `duration` without visual change.
    pub fn delay(duration: Duration) -> Self {
        Self {
            duration,
            easing: Easing::Linear,
        }
    }

    /// Override the easing curve.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Eased progress after `elapsed` time.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let linear = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.easing.apply(linear)
    }
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self::from_millis(DEFAULT_TRANSITION_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let timing = TransitionTiming::default();
        assert_eq!(timing.duration, Duration::from_millis(250));
        assert_eq!(timing.easing, Easing::EaseInOutCubic);
    }

    #[test]
    fn test_progress_endpoints() {
        let timing = TransitionTiming::from_millis(200);
        assert_eq!(timing.progress(Duration::ZERO), 0.0);
        assert_eq!(timing.progress(Duration::from_millis(200)), 1.0);
        assert_eq!(timing.progress(Duration::from_secs(5)), 1.0);
    }

    #[test]
    fn test_zero_duration_is_complete() {
        let timing = TransitionTiming::delay(Duration::ZERO);
        assert_eq!(timing.progress(Duration::ZERO), 1.0);
    }

    #[test]
    fn test_ease_in_out_cubic_midpoint() {
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
        assert!(ease_in_out_cubic(0.25) < 0.25);
        assert!(ease_in_out_cubic(0.75) > 0.75);
    }

    #[test]
    fn test_lerp() {
        let from = PageTransform::translated(100.0, 0.0).with_opacity(0.0);
        let mid = from.lerp(&PageTransform::IDENTITY, 0.5);
        assert_eq!(mid.translate_x, 50.0);
        assert_eq!(mid.opacity, 0.5);
        assert_eq!(from.lerp(&PageTransform::IDENTITY, 2.0), PageTransform::IDENTITY);
    }

    #[test]
    fn test_slide_offsets() {
        let viewport = Viewport::new(320.0, 640.0);
        assert_eq!(
            SlideDirection::for_page(false).offscreen(viewport),
            (320.0, 0.0)
        );
        assert_eq!(
            SlideDirection::for_page(true).offscreen(viewport),
            (0.0, 640.0)
        );
    }

    #[test]
    fn test_hidden() {
        assert!(PageTransform::IDENTITY.with_opacity(0.0).is_hidden());
        assert!(!PageTransform::IDENTITY.is_hidden());
    }
}
