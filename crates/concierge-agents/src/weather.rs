use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub provider: String,
    pub location: String,
    pub temp_c: f64,
    pub summary: String,
    pub humidity: f64,
}

impl WeatherReport {
    /// One-line rendering used as the assistant reply.
    pub fn describe(&self) -> String {
        format!(
            "🌤️ {}: {:.1}°C, {} (humidity {})",
            self.location, self.temp_c, self.summary, self.humidity
        )
    }
}

/// Offline weather source. Always reports the same conditions.
#[derive(Debug, Default, Clone)]
pub struct WeatherAgent;

impl WeatherAgent {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, location: &str) -> WeatherReport {
        tracing::debug!(location, "serving stub weather report");
        WeatherReport {
            provider: "stub".to_string(),
            location: location.to_string(),
            temp_c: 27.0,
            summary: "Partly cloudy".to_string(),
            humidity: 0.68,
        }
    }
}
