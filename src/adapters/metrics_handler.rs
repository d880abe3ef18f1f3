use prometheus::{
    CounterVec, Encoder, Histogram, HistogramOpts, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::agents::llm::UsageMetadata;

pub struct MetricsCollector {
    registry: Registry,

    // Sandbox metrics
    pub sandbox_turns: CounterVec,
    pub sessions_active: IntGauge,

    // Model call metrics
    pub llm_request_duration: Histogram,
    pub llm_tokens: CounterVec,
}

impl MetricsCollector {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let sandbox_turns = CounterVec::new(
            Opts::new("hangar_sandbox_turns_total", "Total sandbox chat turns"),
            &["outcome"],
        )?;
        registry.register(Box::new(sandbox_turns.clone()))?;

        let sessions_active = IntGauge::new(
            "hangar_sessions_active",
            "Number of open sandbox sessions",
        )?;
        registry.register(Box::new(sessions_active.clone()))?;

        let llm_request_duration = Histogram::with_opts(HistogramOpts::new(
            "hangar_llm_request_duration_seconds",
            "Duration of generateContent calls in seconds",
        ))?;
        registry.register(Box::new(llm_request_duration.clone()))?;

        let llm_tokens = CounterVec::new(
            Opts::new("hangar_llm_tokens_total", "Tokens reported by the model"),
            &["kind"],
        )?;
        registry.register(Box::new(llm_tokens.clone()))?;

        Ok(Self {
            registry,
            sandbox_turns,
            sessions_active,
            llm_request_duration,
            llm_tokens,
        })
    }

    pub fn record_usage(&self, usage: &UsageMetadata) {
        if let Some(n) = usage.prompt_token_count {
            self.llm_tokens.with_label_values(&["prompt"]).inc_by(n as f64);
        }
        if let Some(n) = usage.candidates_token_count {
            self.llm_tokens.with_label_values(&["completion"]).inc_by(n as f64);
        }
    }

    pub fn encode(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct MetricsHandler {
    collector: Arc<MetricsCollector>,
}

impl MetricsHandler {
    pub fn new(collector: Arc<MetricsCollector>) -> Self {
        Self { collector }
    }

    pub async fn metrics(&self) -> String {
        self.collector.encode().unwrap_or_else(|e| {
            tracing::error!("Failed to encode metrics: {}", e);
            String::from("# Error encoding metrics\n")
        })
    }
}
