/// Knobs for the lay-down search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Upper bound on search iterations per decision. Zero skips the search.
    pub iterations: u32,
    /// UCB exploration constant.
    pub exploration: f64,
    /// Wall-clock cap per decision in milliseconds; zero means iterations only.
    pub time_budget_ms: u64,
    /// Iterations always run before the time cap is checked.
    pub min_iterations: u32,
}

pub const DEFAULT_ITERATIONS: u32 = 1000;
pub const DEFAULT_EXPLORATION: f64 = 1.41;
pub const DEFAULT_MIN_ITERATIONS: u32 = 32;

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            exploration: DEFAULT_EXPLORATION,
            time_budget_ms: 0,
            min_iterations: DEFAULT_MIN_ITERATIONS,
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_time_budget_ms(mut self, time_budget_ms: u64) -> Self {
        self.time_budget_ms = time_budget_ms;
        self
    }

    /// Whether the time cap stops the search after `done` iterations and `elapsed_ms`.
    pub fn out_of_time(&self, done: u32, elapsed_ms: u64) -> bool {
        self.time_budget_ms > 0
            && done >= self.min_iterations.min(self.iterations)
            && elapsed_ms >= self.time_budget_ms
    }

    pub fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let iterations = read("RUMMY_MCTS_ITERATIONS")
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_ITERATIONS);

        let exploration = read("RUMMY_MCTS_EXPLORATION")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value >= 0.0)
            .unwrap_or(DEFAULT_EXPLORATION);

        let time_budget_ms = read("RUMMY_MCTS_TIME_MS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0);

        Self {
            iterations,
            exploration,
            time_budget_ms,
            min_iterations: DEFAULT_MIN_ITERATIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SearchConfig;
    use std::collections::HashMap;

    #[test]
    fn from_env_default_fallbacks() {
        let config = SearchConfig::from_reader(|_| None);
        assert_eq!(config, SearchConfig::default());
        assert_eq!(config.iterations, 1000);
        assert!((config.exploration - 1.41).abs() < f64::EPSILON);
    }

    #[test]
    fn from_env_respects_overrides() {
        let mut vars = HashMap::new();
        vars.insert("RUMMY_MCTS_ITERATIONS".to_string(), " 250 ".to_string());
        vars.insert("RUMMY_MCTS_EXPLORATION".to_string(), "0.7".to_string());
        vars.insert("RUMMY_MCTS_TIME_MS".to_string(), "40".to_string());

        let config = SearchConfig::from_reader(|key| vars.get(key).cloned());
        assert_eq!(config.iterations, 250);
        assert!((config.exploration - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.time_budget_ms, 40);
    }

    #[test]
    fn from_env_rejects_garbage() {
        let mut vars = HashMap::new();
        vars.insert("RUMMY_MCTS_ITERATIONS".to_string(), "lots".to_string());
        vars.insert("RUMMY_MCTS_EXPLORATION".to_string(), "-2".to_string());

        let config = SearchConfig::from_reader(|key| vars.get(key).cloned());
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn time_cap_waits_for_minimum_iterations() {
        let config = SearchConfig::default().with_time_budget_ms(5);
        assert!(!config.out_of_time(10, 50));
        assert!(config.out_of_time(32, 50));
        assert!(!config.out_of_time(500, 4));
        assert!(!SearchConfig::default().out_of_time(500, 10_000));
    }
}
