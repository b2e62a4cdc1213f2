use tracing::warn;

use super::request::{AnalysisKind, AnalysisRequest};
use super::result::{
    AnalysisOutcome, ChatReply, Finding, ImageAnalysis, RiskLevel, UrlAnalysis,
    VulnerabilityReport,
};
use super::service::Analyzer;

/// Confidence stamped on every canned result, deliberately low so demo
/// output can never be mistaken for a real verdict.
pub const DEMO_CONFIDENCE: u8 = 25;

const DEMO_NOTICE: &str =
    "GuardianAI is running in demo mode. Configure a Gemini API key for real analysis.";

/// The fixed, clearly-labeled result served when the real analysis path is
/// unavailable.
pub fn demo_result(kind: AnalysisKind) -> AnalysisOutcome {
    match kind {
        AnalysisKind::Url => AnalysisOutcome::Url(UrlAnalysis {
            summary: format!("[Demo] No live reputation data for this URL. {}", DEMO_NOTICE),
            confidence: DEMO_CONFIDENCE,
        }),
        AnalysisKind::Image => AnalysisOutcome::Image(ImageAnalysis {
            contains_qr: false,
            phishing_detected: false,
            confidence: DEMO_CONFIDENCE,
        }),
        AnalysisKind::Vulnerabilities => {
            let finding = |area: &str| Finding {
                is_vulnerable: false,
                description: format!("[Demo] {} was not actually assessed. {}", area, DEMO_NOTICE),
                confidence: DEMO_CONFIDENCE,
            };
            AnalysisOutcome::Vulnerabilities(VulnerabilityReport {
                ssl: finding("Transport security"),
                open_ports: finding("Port exposure"),
                db_interaction: finding("Database interaction"),
                general: finding("General hygiene"),
                overall_risk: RiskLevel::Medium,
            })
        }
        AnalysisKind::Chat => AnalysisOutcome::Chat(ChatReply {
            response: format!("[Demo] {}", DEMO_NOTICE),
        }),
    }
}

/// Run an analysis, substituting the demo result on any failure.
///
/// This is a terminal substitution, not a recovery mechanism: the usual
/// cause is configuration missing for the whole session, so no retry is
/// attempted.
pub async fn analyze_or_demo(analyzer: &Analyzer, request: &AnalysisRequest) -> AnalysisOutcome {
    match analyzer.analyze(request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(kind = %request.kind(), error = %e, "Analysis failed, serving demo result");
            demo_result(request.kind())
        }
    }
}
