//! Navigation stack configuration

use crate::transition::{Easing, TransitionTiming};
use std::time::Duration;

/// Tunables for a navigation stack.
///
/// # Example
///
/// ```
/// use gpui_stack_navigator::NavigationConfig;
/// use std::time::Duration;
///
/// let config = NavigationConfig::new()
///     .transition_duration(Duration::from_millis(300))
///     .animated(false);
/// assert_eq!(config.transition.duration, Duration::from_millis(300));
/// assert!(!config.animated);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationConfig {
    /// Timing of push, pop, present and dismiss transitions.
    pub transition: TransitionTiming,

    /// Fraction of the viewport width a page shifts left while being covered.
    pub covered_parallax: f32,

    /// Hidden pages are translated by this many viewport widths.
    pub hidden_offset_factor: f32,

    /// Whether navigators animate their operations by default.
    pub animated: bool,
}

impl NavigationConfig {
    /// Default covered-page parallax.
    pub const DEFAULT_PARALLAX: f32 = 0.3;

    /// Default hidden offset, in viewport widths.
    pub const DEFAULT_HIDDEN_OFFSET: f32 = 10.0;

    /// Create the default configuration.
    pub fn new() -> Self {
        Self {
            transition: TransitionTiming::default(),
            covered_parallax: Self::DEFAULT_PARALLAX,
            hidden_offset_factor: Self::DEFAULT_HIDDEN_OFFSET,
            animated: true,
        }
    }

    /// Set the transition duration.
    pub fn transition_duration(mut self, duration: Duration) -> Self {
        self.transition.duration = duration;
        self
    }

    /// Set the transition easing curve.
    pub fn easing(mut self, easing: Easing) -> Self {
        self.transition.easing = easing;
        self
    }

    /// Set the covered-page parallax fraction.
    pub fn covered_parallax(mut self, fraction: f32) -> Self {
        self.covered_parallax = fraction;
        self
    }

    /// Set the hidden offset, in viewport widths.
    pub fn hidden_offset_factor(mut self, factor: f32) -> Self {
        self.hidden_offset_factor = factor;
        self
    }

    /// Set whether navigators animate by default.
    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NavigationConfig::default();
        assert_eq!(config.transition.duration, Duration::from_millis(250));
        assert!(config.animated);
        assert_eq!(config.hidden_offset_factor, 10.0);
    }

    #[test]
    fn test_builder() {
        let config = NavigationConfig::new()
            .easing(Easing::Linear)
            .covered_parallax(0.5)
            .hidden_offset_factor(4.0);
        assert_eq!(config.transition.easing, Easing::Linear);
        assert_eq!(config.covered_parallax, 0.5);
        assert_eq!(config.hidden_offset_factor, 4.0);
    }
}
