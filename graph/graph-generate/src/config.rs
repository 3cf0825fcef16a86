//! Generator configuration.

use geom_types::{Point3, Vector3};

use crate::error::GenerateError;

/// Configuration for walkable-graph generation.
///
/// # Example
///
/// ```
/// use geom_types::{Point3, Vector3};
/// use graph_generate::GeneratorConfig;
///
/// let config = GeneratorConfig::default()
///     .with_start(Point3::new(0.0, 0.0, 2.0))
///     .with_spacing(Vector3::new(0.5, 0.5, 0.5))
///     .with_steps(0.3, 0.3)
///     .with_slopes(30.0, 30.0)
///     .with_max_nodes(10_000);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed position projected onto the mesh to start expansion.
    start: Point3<f32>,
    /// Grid step between candidate children, per axis.
    spacing: Vector3<f32>,
    /// Upper bound on discovered nodes. 0 means unbounded.
    max_nodes: usize,
    /// Maximum vertical rise across an edge.
    up_step: f32,
    /// Maximum vertical drop across an edge.
    down_step: f32,
    /// Maximum permissible ascending slope, degrees.
    up_slope: f32,
    /// Maximum permissible descending slope, degrees.
    down_slope: f32,
    /// Probe attempts per neighbor direction; attempts beyond the first
    /// raise the probe origin to clear low obstructions.
    max_step_connections: u32,
    /// Minimum outgoing edges a node needs to be retained.
    min_connections: u32,
    /// Worker threads. `None` uses the global pool.
    core_count: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start: Point3::origin(),
            spacing: Vector3::new(1.0, 1.0, 1.0),
            max_nodes: 0,
            up_step: 0.2,
            down_step: 0.2,
            up_slope: 20.0,
            down_slope: 20.0,
            max_step_connections: 1,
            min_connections: 1,
            core_count: None,
        }
    }
}

impl GeneratorConfig {
    /// Set the seed position.
    #[must_use]
    pub const fn with_start(mut self, start: Point3<f32>) -> Self {
        self.start = start;
        self
    }

    /// Set the candidate grid spacing.
    #[must_use]
    pub const fn with_spacing(mut self, spacing: Vector3<f32>) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the node-count bound. 0 means unbounded.
    #[must_use]
    pub const fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Set the maximum vertical rise and drop across an edge.
    #[must_use]
    pub const fn with_steps(mut self, up_step: f32, down_step: f32) -> Self {
        self.up_step = up_step;
        self.down_step = down_step;
        self
    }

    /// Set the maximum ascending and descending slopes, in degrees.
    #[must_use]
    pub const fn with_slopes(mut self, up_slope: f32, down_slope: f32) -> Self {
        self.up_slope = up_slope;
        self.down_slope = down_slope;
        self
    }

    /// Set the probe attempts per neighbor direction.
    #[must_use]
    pub const fn with_max_step_connections(mut self, attempts: u32) -> Self {
        self.max_step_connections = attempts;
        self
    }

    /// Set the minimum outgoing edges a node needs to survive.
    #[must_use]
    pub const fn with_min_connections(mut self, min_connections: u32) -> Self {
        self.min_connections = min_connections;
        self
    }

    /// Pin the worker-thread count. `None` uses the global pool.
    #[must_use]
    pub const fn with_core_count(mut self, core_count: Option<usize>) -> Self {
        self.core_count = core_count;
        self
    }

    /// The seed position.
    #[must_use]
    pub const fn start(&self) -> Point3<f32> {
        self.start
    }

    /// The candidate grid spacing.
    #[must_use]
    pub const fn spacing(&self) -> Vector3<f32> {
        self.spacing
    }

    /// The node-count bound. 0 means unbounded.
    #[must_use]
    pub const fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    /// Maximum vertical rise across an edge.
    #[must_use]
    pub const fn up_step(&self) -> f32 {
        self.up_step
    }

    /// Maximum vertical drop across an edge.
    #[must_use]
    pub const fn down_step(&self) -> f32 {
        self.down_step
    }

    /// Maximum ascending slope, degrees.
    #[must_use]
    pub const fn up_slope(&self) -> f32 {
        self.up_slope
    }

    /// Maximum descending slope, degrees.
    #[must_use]
    pub const fn down_slope(&self) -> f32 {
        self.down_slope
    }

    /// Probe attempts per neighbor direction.
    #[must_use]
    pub const fn max_step_connections(&self) -> u32 {
        self.max_step_connections
    }

    /// Minimum outgoing edges a node needs to survive.
    #[must_use]
    pub const fn min_connections(&self) -> u32 {
        self.min_connections
    }

    /// Pinned worker-thread count, if any.
    #[must_use]
    pub const fn core_count(&self) -> Option<usize> {
        self.core_count
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// [`GenerateError::InvalidConfig`] when spacing is not positive,
    /// steps are negative, slopes fall outside (0, 90], or no probe
    /// attempts are allowed.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.spacing.x <= 0.0 || self.spacing.y <= 0.0 || self.spacing.z <= 0.0 {
            return Err(GenerateError::invalid_config("spacing must be positive"));
        }
        if self.up_step < 0.0 || self.down_step < 0.0 {
            return Err(GenerateError::invalid_config("steps must be non-negative"));
        }
        for slope in [self.up_slope, self.down_slope] {
            if !(slope > 0.0 && slope <= 90.0) {
                return Err(GenerateError::invalid_config(
                    "slopes must lie in (0, 90] degrees",
                ));
            }
        }
        if self.max_step_connections == 0 {
            return Err(GenerateError::invalid_config(
                "max_step_connections must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn invalid_spacing_rejected() {
        let config = GeneratorConfig::default().with_spacing(Vector3::new(0.0, 1.0, 1.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_slope_rejected() {
        let config = GeneratorConfig::default().with_slopes(95.0, 20.0);
        assert!(config.validate().is_err());
        let config = GeneratorConfig::default().with_slopes(20.0, 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_attempts_rejected() {
        let config = GeneratorConfig::default().with_max_step_connections(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn builders_set_fields() {
        let config = GeneratorConfig::default()
            .with_max_nodes(42)
            .with_steps(0.5, 0.6)
            .with_min_connections(3)
            .with_core_count(Some(2));
        assert_eq!(config.max_nodes(), 42);
        assert!((config.up_step() - 0.5).abs() < 1e-6);
        assert!((config.down_step() - 0.6).abs() < 1e-6);
        assert_eq!(config.min_connections(), 3);
        assert_eq!(config.core_count(), Some(2));
    }
}
