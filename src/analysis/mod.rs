pub mod demo;
pub mod normalizer;
pub mod prompt;
pub mod request;
pub mod result;
pub mod service;

pub use demo::{analyze_or_demo, demo_result, DEMO_CONFIDENCE};
pub use request::{AnalysisKind, AnalysisRequest};
pub use result::{
    AnalysisOutcome, ChatReply, Finding, ImageAnalysis, RiskLevel, UrlAnalysis,
    VulnerabilityReport,
};
pub use service::Analyzer;
