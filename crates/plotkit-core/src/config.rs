//! Configuration for PlotKit
//!
//! Every recognized option is an explicit field on a config section; there
//! is no global mutable configuration. Components receive the section they
//! need at construction time.
//!
//! Sections:
//! - Protocol settings (sliding window, timeouts, retries)
//! - Motion settings (feed rates)
//! - Flow settings (duty cycle bounds)
//! - Envelope settings (work area and complexity budgets)
//! - Geometry settings (tessellation and simplification tolerances)

use serde::{Deserialize, Serialize};

/// Sliding-window delivery protocol settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolSettings {
    /// Maximum number of unacknowledged commands in flight
    pub window_size: usize,
    /// Per-command acknowledgement timeout in milliseconds
    pub ack_timeout_ms: u64,
    /// Maximum resends before a command is dropped as failed
    pub max_retries: u32,
}

impl Default for ProtocolSettings {
    fn default() -> Self {
        Self {
            window_size: 32,
            ack_timeout_ms: 250,
            max_retries: 3,
        }
    }
}

/// Feed rates in mm/min
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MotionSettings {
    /// Feed rate for rapid (travel) positioning moves
    pub travel_feed_rate: u32,
    /// Feed rate for productive (draw) moves
    pub draw_feed_rate: u32,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            travel_feed_rate: 3000,
            draw_feed_rate: 600,
        }
    }
}

/// Flow actuator duty-cycle settings (percent)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlowSettings {
    /// Duty cycle used when turning flow on
    pub default_duty: u8,
    /// Lower duty bound for fine detail
    pub min_duty: u8,
    /// Upper duty bound for bold lines
    pub max_duty: u8,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            default_duty: 60,
            min_duty: 20,
            max_duty: 80,
        }
    }
}

impl FlowSettings {
    /// Clamp a requested duty cycle into the configured bounds.
    pub fn clamp_duty(&self, duty: u8) -> u8 {
        duty.clamp(self.min_duty, self.max_duty)
    }
}

/// Work envelope and job complexity budgets
///
/// Violations of these limits are advisory: compilation collects warnings
/// and proceeds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnvelopeSettings {
    /// Radius of the circular safe working area in mm
    pub radius_mm: f64,
    /// Maximum number of paths per job
    pub max_paths: usize,
    /// Maximum combined path length in mm
    pub max_total_length_mm: f64,
    /// Maximum total point count per job
    pub max_points: usize,
}

impl Default for EnvelopeSettings {
    fn default() -> Self {
        Self {
            radius_mm: 110.0,
            max_paths: 100,
            max_total_length_mm: 3000.0,
            max_points: 10_000,
        }
    }
}

/// Curve tessellation and simplification tolerances in mm
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeometrySettings {
    /// Maximum allowed deviation when flattening curves
    pub curve_tolerance_mm: f64,
    /// Douglas-Peucker simplification tolerance
    pub simplify_epsilon_mm: f64,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            curve_tolerance_mm: 0.2,
            simplify_epsilon_mm: 0.15,
        }
    }
}

/// Complete PlotKit configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Delivery protocol settings
    pub protocol: ProtocolSettings,
    /// Feed rates
    pub motion: MotionSettings,
    /// Flow duty-cycle bounds
    pub flow: FlowSettings,
    /// Work envelope and complexity budgets
    pub envelope: EnvelopeSettings,
    /// Tessellation and simplification tolerances
    pub geometry: GeometrySettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.protocol.window_size, 32);
        assert_eq!(config.protocol.ack_timeout_ms, 250);
        assert_eq!(config.protocol.max_retries, 3);
        assert_eq!(config.motion.travel_feed_rate, 3000);
        assert_eq!(config.motion.draw_feed_rate, 600);
        assert_eq!(config.envelope.radius_mm, 110.0);
        assert_eq!(config.geometry.simplify_epsilon_mm, 0.15);
    }

    #[test]
    fn test_duty_clamping() {
        let flow = FlowSettings::default();
        assert_eq!(flow.clamp_duty(60), 60);
        assert_eq!(flow.clamp_duty(5), 20);
        assert_eq!(flow.clamp_duty(100), 80);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.protocol.window_size, config.protocol.window_size);
        assert_eq!(back.flow.max_duty, config.flow.max_duty);
    }
}
