//! Turns untrusted upstream text into bounded, typed results.
//!
//! The upstream model promises nothing about its output, so every path here
//! is best-effort and total: absent or malformed fields degrade to defaults,
//! and a result of the requested kind always comes back. Partial garbage is
//! expected input, not an error.

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::request::AnalysisKind;
use super::result::{
    AnalysisOutcome, ChatReply, Finding, ImageAnalysis, RiskLevel, UrlAnalysis,
    VulnerabilityReport,
};

pub const URL_DEFAULT_CONFIDENCE: u8 = 75;
pub const IMAGE_DEFAULT_CONFIDENCE: u8 = 70;
pub const VULN_DEFAULT_CONFIDENCE: u8 = 70;

const NO_SUMMARY: &str = "No summary available.";
const NO_ASSESSMENT: &str = "No assessment available.";

/// Normalize one raw upstream reply into the result for its request kind.
pub fn normalize(kind: AnalysisKind, raw: &str) -> AnalysisOutcome {
    match kind {
        AnalysisKind::Url => AnalysisOutcome::Url(normalize_url(raw)),
        AnalysisKind::Image => AnalysisOutcome::Image(normalize_image(raw)),
        AnalysisKind::Vulnerabilities => {
            AnalysisOutcome::Vulnerabilities(normalize_vulnerabilities(raw))
        }
        // Chat replies carry no structure; the raw text is the result.
        AnalysisKind::Chat => AnalysisOutcome::Chat(ChatReply { response: raw.to_string() }),
    }
}

pub fn normalize_url(raw: &str) -> UrlAnalysis {
    if let Some(value) = extract_json(raw) {
        return UrlAnalysis {
            summary: coerce_string(value.get("summary"), NO_SUMMARY),
            confidence: coerce_confidence(value.get("confidence"), URL_DEFAULT_CONFIDENCE),
        };
    }

    debug!("No JSON object in URL analysis reply, using prose fallback");
    let trimmed = raw.trim();
    UrlAnalysis {
        summary: if trimmed.is_empty() { NO_SUMMARY.to_string() } else { trimmed.to_string() },
        confidence: confidence_probe(raw).unwrap_or(URL_DEFAULT_CONFIDENCE),
    }
}

pub fn normalize_image(raw: &str) -> ImageAnalysis {
    if let Some(value) = extract_json(raw) {
        return ImageAnalysis {
            contains_qr: coerce_bool(value.get("contains_qr"), false),
            phishing_detected: coerce_bool(value.get("phishing_detected"), false),
            confidence: coerce_confidence(value.get("confidence"), IMAGE_DEFAULT_CONFIDENCE),
        };
    }

    debug!("No JSON object in image analysis reply, using regex probes");
    ImageAnalysis {
        contains_qr: bool_probe(raw, "contains_qr").unwrap_or(false),
        phishing_detected: bool_probe(raw, "phishing_detected").unwrap_or(false),
        confidence: confidence_probe(raw).unwrap_or(IMAGE_DEFAULT_CONFIDENCE),
    }
}

pub fn normalize_vulnerabilities(raw: &str) -> VulnerabilityReport {
    if let Some(value) = extract_json(raw) {
        return VulnerabilityReport {
            ssl: coerce_finding(value.get("ssl")),
            open_ports: coerce_finding(value.get("openPorts")),
            db_interaction: coerce_finding(value.get("dbInteraction")),
            general: coerce_finding(value.get("general")),
            overall_risk: coerce_risk(value.get("overallRisk")),
        };
    }

    debug!("No JSON object in vulnerability reply, using regex probes");
    let confidence = confidence_probe(raw).unwrap_or(VULN_DEFAULT_CONFIDENCE);
    VulnerabilityReport {
        ssl: probe_finding(raw, "ssl", confidence),
        open_ports: probe_finding(raw, "openPorts", confidence),
        db_interaction: probe_finding(raw, "dbInteraction", confidence),
        general: probe_finding(raw, "general", confidence),
        overall_risk: risk_probe(raw).unwrap_or_default(),
    }
}

/// Locate and parse the JSON object the model wrapped in prose.
///
/// Order of attempts: direct parse after fence stripping, a string-aware
/// balanced scan from the leftmost brace (nested braces inside string values
/// bound correctly), then the greedy first-to-last-brace span with
/// truncation repair as the outer net.
fn extract_json(text: &str) -> Option<Value> {
    let stripped = strip_code_fences(text);

    if let Ok(value) = serde_json::from_str::<Value>(stripped) {
        if value.is_object() {
            return Some(value);
        }
    }

    let start = stripped.find('{')?;
    if let Some(span) = balanced_span(&stripped[start..]) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            if value.is_object() {
                return Some(value);
            }
        }
    }

    let end = stripped.rfind('}')?;
    if start < end {
        let candidate = &stripped[start..=end];
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            if value.is_object() {
                return Some(value);
            }
        }
        if let Some(repaired) = repair_truncated_json(candidate) {
            if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
                if value.is_object() {
                    return Some(value);
                }
            }
        }
    }

    None
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// Span from the leading `{` to its matching `}`, tracking string literals
/// and escapes so braces inside string values do not miscount.
fn balanced_span(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Attempt to repair truncated JSON by closing open brackets. Handles the
/// common case where the model's reply is cut off mid-object.
fn repair_truncated_json(text: &str) -> Option<String> {
    let mut s = text.to_string();

    // Drop any trailing partial element (everything after the last complete '}')
    let last_brace = s.rfind('}')?;
    s.truncate(last_brace + 1);

    let mut open_braces = 0i32;
    let mut open_brackets = 0i32;
    for ch in s.chars() {
        match ch {
            '{' => open_braces += 1,
            '}' => open_braces -= 1,
            '[' => open_brackets += 1,
            ']' => open_brackets -= 1,
            _ => {}
        }
    }

    for _ in 0..open_braces {
        s.push('}');
    }
    for _ in 0..open_brackets {
        s.push(']');
    }

    if open_braces > 0 || open_brackets > 0 {
        Some(s)
    } else {
        None
    }
}

fn coerce_finding(value: Option<&Value>) -> Finding {
    let value = value.filter(|v| v.is_object());
    Finding {
        is_vulnerable: coerce_bool(value.and_then(|v| v.get("isVulnerable")), false),
        description: coerce_string(value.and_then(|v| v.get("description")), NO_ASSESSMENT),
        confidence: coerce_confidence(
            value.and_then(|v| v.get("confidence")),
            VULN_DEFAULT_CONFIDENCE,
        ),
    }
}

fn coerce_risk(value: Option<&Value>) -> RiskLevel {
    match value {
        Some(Value::String(s)) => RiskLevel::parse_or_default(s),
        _ => RiskLevel::default(),
    }
}

/// Truthiness coercion, with the string forms of falsehood ("false", "no",
/// "0") honored: a model that writes `"phishing_detected": "false"` means
/// false.
fn coerce_bool(value: Option<&Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(default),
        Some(Value::String(s)) => {
            let s = s.trim();
            !(s.is_empty()
                || s.eq_ignore_ascii_case("false")
                || s.eq_ignore_ascii_case("no")
                || s == "0")
        }
        _ => default,
    }
}

fn coerce_string(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => default.to_string(),
    }
}

/// Numeric coercion with clamping into [0, 100]. Non-numeric input takes the
/// default.
fn coerce_confidence(value: Option<&Value>, default: u8) -> u8 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => v.round().clamp(0.0, 100.0) as u8,
        _ => default,
    }
}

/// Case-insensitive probe for a boolean assertion near a field name.
fn bool_probe(raw: &str, field: &str) -> Option<bool> {
    let pattern = format!(r#"(?i)"?{}"?[\s\S]{{0,60}}?\b(true|false|yes|no)\b"#, field);
    let re = Regex::new(&pattern).ok()?;
    let word = re.captures(raw)?.get(1)?.as_str().to_ascii_lowercase();
    Some(word == "true" || word == "yes")
}

/// Probe for a "confidence: <digits>" assertion, clamped like every other
/// confidence.
fn confidence_probe(raw: &str) -> Option<u8> {
    let re = Regex::new(r"(?i)confidence[^0-9-]{0,12}(-?\d{1,4})").ok()?;
    let value = re.captures(raw)?.get(1)?.as_str().parse::<f64>().ok()?;
    Some(value.clamp(0.0, 100.0) as u8)
}

fn risk_probe(raw: &str) -> Option<RiskLevel> {
    let re = Regex::new(r"(?i)overall[\s_]*risk[\s\S]{0,20}?(low|medium|high|critical)").ok()?;
    let level = re.captures(raw)?.get(1)?.as_str();
    Some(RiskLevel::parse_or_default(level))
}

fn probe_finding(raw: &str, field: &str, confidence: u8) -> Finding {
    Finding {
        is_vulnerable: bool_probe(raw, field).unwrap_or(false),
        description: NO_ASSESSMENT.to_string(),
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_json_embedded_in_prose_round_trips() {
        let raw = "Sure! Here is my analysis of the image:\n\
                   {\"contains_qr\": true, \"phishing_detected\": false, \"confidence\": 42}\n\
                   Let me know if you need more detail.";
        let result = normalize_image(raw);
        assert_eq!(
            result,
            ImageAnalysis { contains_qr: true, phishing_detected: false, confidence: 42 }
        );
    }

    #[test]
    fn test_confidence_clamped_low_and_high() {
        let low = normalize_image("{\"contains_qr\": false, \"phishing_detected\": false, \"confidence\": -50}");
        assert_eq!(low.confidence, 0);

        let high = normalize_image("{\"contains_qr\": false, \"phishing_detected\": false, \"confidence\": 500}");
        assert_eq!(high.confidence, 100);
    }

    #[test]
    fn test_confidence_non_numeric_takes_default() {
        let result = normalize_image("{\"contains_qr\": true, \"confidence\": \"abc\"}");
        assert_eq!(result.confidence, IMAGE_DEFAULT_CONFIDENCE);
        assert!(result.contains_qr);
    }

    #[test]
    fn test_confidence_missing_takes_default() {
        let url = normalize_url("{\"summary\": \"looks fine\"}");
        assert_eq!(url.confidence, URL_DEFAULT_CONFIDENCE);

        let image = normalize_image("{\"contains_qr\": false}");
        assert_eq!(image.confidence, IMAGE_DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_confidence_string_number_coerces() {
        let result = normalize_url("{\"summary\": \"ok\", \"confidence\": \"88\"}");
        assert_eq!(result.confidence, 88);
    }

    #[test]
    fn test_overall_risk_invalid_degrades_to_medium() {
        let raw = "{\"ssl\": {\"isVulnerable\": false}, \"overallRisk\": \"extreme\"}";
        let report = normalize_vulnerabilities(raw);
        assert_eq!(report.overall_risk, RiskLevel::Medium);

        let missing = normalize_vulnerabilities("{\"ssl\": {\"isVulnerable\": false}}");
        assert_eq!(missing.overall_risk, RiskLevel::Medium);
    }

    #[test]
    fn test_vulnerability_full_payload() {
        let raw = r#"Here is the assessment you asked for:
        {
          "ssl": {"isVulnerable": true, "description": "expired certificate", "confidence": 90},
          "openPorts": {"isVulnerable": false, "description": "only 443 visible", "confidence": 85},
          "dbInteraction": {"isVulnerable": true, "description": "verbose SQL errors", "confidence": 65},
          "general": {"isVulnerable": false, "description": "headers look sane", "confidence": 75},
          "overallRisk": "high"
        }"#;
        let report = normalize_vulnerabilities(raw);
        assert!(report.ssl.is_vulnerable);
        assert_eq!(report.ssl.confidence, 90);
        assert_eq!(report.open_ports.description, "only 443 visible");
        assert!(report.db_interaction.is_vulnerable);
        assert_eq!(report.overall_risk, RiskLevel::High);
    }

    #[test]
    fn test_vulnerability_missing_sections_take_defaults() {
        let raw = "{\"ssl\": {\"isVulnerable\": true, \"confidence\": 95}}";
        let report = normalize_vulnerabilities(raw);
        assert!(report.ssl.is_vulnerable);
        assert!(!report.open_ports.is_vulnerable);
        assert_eq!(report.open_ports.confidence, VULN_DEFAULT_CONFIDENCE);
        assert_eq!(report.general.description, NO_ASSESSMENT);
    }

    #[test]
    fn test_no_json_at_all_activates_regex_fallback() {
        let raw = "I could not produce structured output, sorry.";
        let report = normalize_vulnerabilities(raw);
        assert!(!report.ssl.is_vulnerable);
        assert_eq!(report.overall_risk, RiskLevel::Medium);
        assert_eq!(report.ssl.confidence, VULN_DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_regex_fallback_reads_boolean_assertions() {
        let raw = "Analysis: contains_qr: true. phishing_detected is false. Confidence: 63.";
        let result = normalize_image(raw);
        assert!(result.contains_qr);
        assert!(!result.phishing_detected);
        assert_eq!(result.confidence, 63);
    }

    #[test]
    fn test_regex_fallback_reads_risk_level() {
        let raw = "The ssl setup is vulnerable: true. Overall risk: critical. Confidence: 80";
        let report = normalize_vulnerabilities(raw);
        assert!(report.ssl.is_vulnerable);
        assert_eq!(report.overall_risk, RiskLevel::Critical);
        assert_eq!(report.ssl.confidence, 80);
    }

    #[test]
    fn test_url_fallback_keeps_prose_as_summary() {
        let raw = "This URL imitates a well-known bank login page. Confidence: 88";
        let result = normalize_url(raw);
        assert_eq!(result.summary, raw);
        assert_eq!(result.confidence, 88);
    }

    #[test]
    fn test_url_empty_reply_takes_placeholder() {
        let result = normalize_url("   ");
        assert_eq!(result.summary, NO_SUMMARY);
        assert_eq!(result.confidence, URL_DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_braces_inside_string_values_bound_correctly() {
        let raw = "Result: {\"summary\": \"uses template {placeholders} in path\", \"confidence\": 30} done";
        let result = normalize_url(raw);
        assert_eq!(result.summary, "uses template {placeholders} in path");
        assert_eq!(result.confidence, 30);
    }

    #[test]
    fn test_markdown_fenced_json_parses() {
        let raw = "```json\n{\"summary\": \"clean\", \"confidence\": 97}\n```";
        let result = normalize_url(raw);
        assert_eq!(result.summary, "clean");
        assert_eq!(result.confidence, 97);
    }

    #[test]
    fn test_truncated_json_repaired() {
        let raw = "{\"ssl\": {\"isVulnerable\": true, \"description\": \"weak\", \"confidence\": 80}, \"openPorts\": {\"isVul";
        let report = normalize_vulnerabilities(raw);
        assert!(report.ssl.is_vulnerable);
        assert_eq!(report.ssl.confidence, 80);
        // The truncated tail degrades to defaults rather than erroring.
        assert!(!report.open_ports.is_vulnerable);
    }

    #[test]
    fn test_boolean_truthiness_coercion() {
        let result = normalize_image("{\"contains_qr\": 1, \"phishing_detected\": \"false\", \"confidence\": 50}");
        assert!(result.contains_qr);
        assert!(!result.phishing_detected);
    }

    #[test]
    fn test_chat_kind_is_identity() {
        let raw = "Use a password manager and enable MFA.";
        match normalize(AnalysisKind::Chat, raw) {
            AnalysisOutcome::Chat(reply) => assert_eq!(reply.response, raw),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_bare_number_is_not_an_object() {
        // A reply of just "42" must not be treated as structured output.
        let result = normalize_url("42");
        assert_eq!(result.summary, "42");
        assert_eq!(result.confidence, URL_DEFAULT_CONFIDENCE);
    }
}
