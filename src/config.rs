use serde::{Deserialize, Serialize};

/// Leftover free rectangles narrower or shorter than this are not reported as waste pieces.
pub const DEFAULT_MIN_WASTE_SIZE: f64 = 10.0;

pub const DEFAULT_PORT: u16 = 3001;

/// How free rectangles are coalesced after each placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// One pass over all pairs.
    #[default]
    SinglePass,
    /// Repeat passes until nothing merges.
    FixedPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Global rotation switch, AND-ed with each request's `can_rotate`.
    pub allow_rotation: bool,
    pub min_waste_size: f64,
    pub merge_policy: MergePolicy,
    /// Evaluate the sort strategies on the rayon pool.
    pub parallel: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            allow_rotation: true,
            min_waste_size: DEFAULT_MIN_WASTE_SIZE,
            merge_policy: MergePolicy::SinglePass,
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub sentry_dsn: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("PORT").ok().as_deref(),
            std::env::var("SENTRY_DSN").ok().as_deref(),
        )
    }

    fn from_vars(port: Option<&str>, sentry_dsn: Option<&str>) -> Self {
        let port = port
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let sentry_dsn = sentry_dsn
            .map(str::trim)
            .filter(|dsn| !dsn.is_empty())
            .map(str::to_string);
        Self { port, sentry_dsn }
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planner_config_partial_json() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"merge_policy": "fixed_point"}"#).unwrap();
        assert_eq!(config.merge_policy, MergePolicy::FixedPoint);
        assert!(config.allow_rotation);
        assert_eq!(config.min_waste_size, DEFAULT_MIN_WASTE_SIZE);
        assert!(!config.parallel);
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::from_vars(None, Some("  "));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.sentry_dsn, None);
        assert_eq!(config.bind_addr(), "0.0.0.0:3001");
    }

    #[test]
    fn test_server_config_bad_port_falls_back() {
        assert_eq!(ServerConfig::from_vars(Some("8080"), None).port, 8080);
        assert_eq!(ServerConfig::from_vars(Some("nope"), None).port, DEFAULT_PORT);
    }
}
