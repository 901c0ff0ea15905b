use std::collections::HashMap;

/// Per-provider success/failure counters for one orchestrator lifetime.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    success_counts: HashMap<String, u64>,
    failure_counts: HashMap<String, u64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, provider_id: &str) {
        *self
            .success_counts
            .entry(provider_id.to_string())
            .or_insert(0) += 1;
    }

    pub fn record_failure(&mut self, provider_id: &str) {
        *self
            .failure_counts
            .entry(provider_id.to_string())
            .or_insert(0) += 1;
    }

    pub fn success_count(&self, provider_id: &str) -> u64 {
        *self.success_counts.get(provider_id).unwrap_or(&0)
    }

    pub fn failure_count(&self, provider_id: &str) -> u64 {
        *self.failure_counts.get(provider_id).unwrap_or(&0)
    }

    pub fn success_rate(&self, provider_id: &str) -> f32 {
        let success = self.success_count(provider_id) as f32;
        let total = success + self.failure_count(provider_id) as f32;

        if total == 0.0 {
            0.0
        } else {
            success / total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_rate() {
        let mut metrics = Metrics::new();
        metrics.record_success("gemini");
        metrics.record_success("gemini");
        metrics.record_failure("gemini");

        assert_eq!(metrics.success_count("gemini"), 2);
        assert_eq!(metrics.failure_count("gemini"), 1);
        assert!((metrics.success_rate("gemini") - 2.0 / 3.0).abs() < f32::EPSILON);
        assert_eq!(metrics.success_rate("openai"), 0.0);
    }
}
