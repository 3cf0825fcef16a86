//! View-analysis configuration.

use crate::error::ViewError;

/// Configuration for a view-analysis request.
///
/// # Example
///
/// ```
/// use view_analysis::ViewConfig;
///
/// let config = ViewConfig::default()
///     .with_ray_count(5000)
///     .with_height(1.7)
///     .with_max_distance(100.0)
///     .with_fov(50.0, 70.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ViewConfig {
    /// Requested rays per origin, before the field-of-view clamp.
    ray_count: usize,
    /// Offset added to each origin's z before casting (eye height).
    height: f32,
    /// Hits beyond this distance count as misses.
    max_distance: f32,
    /// Permitted elevation above the horizon, degrees.
    up_fov: f32,
    /// Permitted elevation below the horizon, degrees.
    down_fov: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            ray_count: 1000,
            height: 1.7,
            max_distance: f32::INFINITY,
            up_fov: 50.0,
            down_fov: 70.0,
        }
    }
}

impl ViewConfig {
    /// Set the requested rays per origin.
    #[must_use]
    pub const fn with_ray_count(mut self, ray_count: usize) -> Self {
        self.ray_count = ray_count;
        self
    }

    /// Set the eye-height offset.
    #[must_use]
    pub const fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Set the distance beyond which hits count as misses.
    #[must_use]
    pub const fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Set the permitted elevations above and below the horizon.
    #[must_use]
    pub const fn with_fov(mut self, up_fov: f32, down_fov: f32) -> Self {
        self.up_fov = up_fov;
        self.down_fov = down_fov;
        self
    }

    /// Requested rays per origin.
    #[must_use]
    pub const fn ray_count(&self) -> usize {
        self.ray_count
    }

    /// Eye-height offset.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Distance beyond which hits count as misses.
    #[must_use]
    pub const fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Permitted elevation above the horizon, degrees.
    #[must_use]
    pub const fn up_fov(&self) -> f32 {
        self.up_fov
    }

    /// Permitted elevation below the horizon, degrees.
    #[must_use]
    pub const fn down_fov(&self) -> f32 {
        self.down_fov
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// [`ViewError::InvalidConfig`] when the ray count is zero, the
    /// height is not finite, the max distance is not positive, or a
    /// field of view falls outside (0, 90] degrees.
    pub fn validate(&self) -> Result<(), ViewError> {
        if self.ray_count == 0 {
            return Err(ViewError::invalid_config("ray count must be positive"));
        }
        if !self.height.is_finite() {
            return Err(ViewError::invalid_config("height must be finite"));
        }
        if self.max_distance.is_nan() || self.max_distance <= 0.0 {
            return Err(ViewError::invalid_config("max distance must be positive"));
        }
        for fov in [self.up_fov, self.down_fov] {
            if !(fov > 0.0 && fov <= 90.0) {
                return Err(ViewError::invalid_config(
                    "fields of view must lie in (0, 90] degrees",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(ViewConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_rays_rejected() {
        assert!(ViewConfig::default().with_ray_count(0).validate().is_err());
    }

    #[test]
    fn bad_fov_rejected() {
        assert!(ViewConfig::default().with_fov(0.0, 70.0).validate().is_err());
        assert!(ViewConfig::default().with_fov(50.0, 95.0).validate().is_err());
    }

    #[test]
    fn bad_distance_rejected() {
        assert!(ViewConfig::default()
            .with_max_distance(0.0)
            .validate()
            .is_err());
        assert!(ViewConfig::default()
            .with_max_distance(f32::NAN)
            .validate()
            .is_err());
    }
}
