use serde::{Deserialize, Serialize};

/// Overall risk rating for a vulnerability assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Membership test against the fixed literal set. Anything else — an
    /// invented level, wrong casing with garbage, a missing field upstream —
    /// degrades to `Medium`.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => RiskLevel::Low,
            "medium" => RiskLevel::Medium,
            "high" => RiskLevel::High,
            "critical" => RiskLevel::Critical,
            _ => RiskLevel::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::Medium
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URL reputation verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlAnalysis {
    pub summary: String,
    pub confidence: u8,
}

/// Image inspection verdict. Wire casing matches the upstream contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub contains_qr: bool,
    pub phishing_detected: bool,
    pub confidence: u8,
}

/// One named sub-finding of a vulnerability assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "isVulnerable")]
    pub is_vulnerable: bool,
    pub description: String,
    pub confidence: u8,
}

/// Website vulnerability assessment across four fixed dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityReport {
    pub ssl: Finding,
    #[serde(rename = "openPorts")]
    pub open_ports: Finding,
    #[serde(rename = "dbInteraction")]
    pub db_interaction: Finding,
    pub general: Finding,
    #[serde(rename = "overallRisk")]
    pub overall_risk: RiskLevel,
}

/// Free-form chat answer. No structure is imposed on the reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// The one value an analysis returns to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Url(UrlAnalysis),
    Image(ImageAnalysis),
    Vulnerabilities(VulnerabilityReport),
    Chat(ChatReply),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_parses_known_literals() {
        assert_eq!(RiskLevel::parse_or_default("low"), RiskLevel::Low);
        assert_eq!(RiskLevel::parse_or_default("  HIGH "), RiskLevel::High);
        assert_eq!(RiskLevel::parse_or_default("Critical"), RiskLevel::Critical);
    }

    #[test]
    fn test_risk_level_unknown_degrades_to_medium() {
        assert_eq!(RiskLevel::parse_or_default("extreme"), RiskLevel::Medium);
        assert_eq!(RiskLevel::parse_or_default(""), RiskLevel::Medium);
    }

    #[test]
    fn test_vulnerability_report_wire_casing() {
        let report = VulnerabilityReport {
            ssl: Finding { is_vulnerable: true, description: "weak cipher".into(), confidence: 80 },
            open_ports: Finding { is_vulnerable: false, description: "none".into(), confidence: 70 },
            db_interaction: Finding { is_vulnerable: false, description: "none".into(), confidence: 70 },
            general: Finding { is_vulnerable: false, description: "none".into(), confidence: 70 },
            overall_risk: RiskLevel::High,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("openPorts").is_some());
        assert!(json.get("dbInteraction").is_some());
        assert_eq!(json["overallRisk"], "high");
        assert_eq!(json["ssl"]["isVulnerable"], true);
    }

    #[test]
    fn test_outcome_serializes_flat() {
        let outcome = AnalysisOutcome::Image(ImageAnalysis {
            contains_qr: true,
            phishing_detected: false,
            confidence: 42,
        });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["contains_qr"], true);
        assert_eq!(json["phishing_detected"], false);
        assert_eq!(json["confidence"], 42);
    }
}
