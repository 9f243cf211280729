//! Canned "test upload" analysis.
//!
//! Nothing is inspected; the analyser waits out a fixed delay to mimic processing time and then
//! hands back the same report every time.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::instrument;

pub const DEFAULT_ANALYSIS_DELAY: Duration = Duration::from_millis(1500);

const FEEDBACK: &str =
    "Great effort! Your vocabulary is strong, but focus on linking words to improve flow.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub score: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub feedback: String,
}

impl Analysis {
    pub fn canned() -> Self {
        Self {
            score: 7.5,
            strengths: vec!["Vocabulary".to_string(), "Task Response".to_string()],
            weaknesses: vec!["Grammar".to_string(), "Cohesion".to_string()],
            feedback: FEEDBACK.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: Analysis,
}

#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    delay: Duration,
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYSIS_DELAY)
    }
}

impl MockAnalyzer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Sleeps for the configured delay, then returns the canned report.
    ///
    /// Dropping the future mid-sleep simply abandons the analysis.
    #[instrument(skip(self), fields(delay_ms = self.delay.as_millis() as u64))]
    pub async fn analyze(&self) -> AnalysisResponse {
        tokio::time::sleep(self.delay).await;
        tracing::debug!("mock analysis finished");

        AnalysisResponse {
            analysis: Analysis::canned(),
        }
    }
}

#[cfg(test)]
mod test {
    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_analysis_waits_for_delay() {
        let analyzer = MockAnalyzer::default();
        let started = Instant::now();

        let response = analyzer.analyze().await;

        assert!(started.elapsed() >= DEFAULT_ANALYSIS_DELAY);
        assert_eq!(response.analysis, Analysis::canned());
    }

    #[tokio::test(start_paused = true)]
    async fn test_analysis_is_always_the_same() {
        let analyzer = MockAnalyzer::new(Duration::from_millis(10));
        let first = analyzer.analyze().await;
        let second = analyzer.analyze().await;
        assert_eq!(first, second);
    }

    #[test]
    fn test_canned_report_shape() {
        let json = serde_json::to_value(AnalysisResponse {
            analysis: Analysis::canned(),
        })
        .unwrap();

        assert_eq!(json["analysis"]["score"], 7.5);
        assert_eq!(
            json["analysis"]["strengths"],
            serde_json::json!(["Vocabulary", "Task Response"])
        );
        assert_eq!(
            json["analysis"]["weaknesses"],
            serde_json::json!(["Grammar", "Cohesion"])
        );
        assert_eq!(json["analysis"]["feedback"], FEEDBACK);
    }
}
