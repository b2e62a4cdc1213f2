use data_encoding::{BASE64, BASE64_NOPAD};
use crate::errors::GuardianError;
use crate::llm::InlineData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Url,
    Image,
    Vulnerabilities,
    Chat,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Url => "url",
            AnalysisKind::Image => "image",
            AnalysisKind::Vulnerabilities => "vulnerabilities",
            AnalysisKind::Chat => "chat",
        }
    }
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One analysis invocation. Created per user interaction, consumed once.
#[derive(Debug, Clone)]
pub enum AnalysisRequest {
    Url { url: String },
    Image { image_base64: String },
    Vulnerabilities { url: String },
    Chat { question: String },
}

impl AnalysisRequest {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisRequest::Url { .. } => AnalysisKind::Url,
            AnalysisRequest::Image { .. } => AnalysisKind::Image,
            AnalysisRequest::Vulnerabilities { .. } => AnalysisKind::Vulnerabilities,
            AnalysisRequest::Chat { .. } => AnalysisKind::Chat,
        }
    }

    /// Reject empty or undecodable subjects before anything touches the
    /// network.
    pub fn validate(&self) -> Result<(), GuardianError> {
        let subject = match self {
            AnalysisRequest::Url { url } | AnalysisRequest::Vulnerabilities { url } => url,
            AnalysisRequest::Image { image_base64 } => image_base64,
            AnalysisRequest::Chat { question } => question,
        };
        if subject.trim().is_empty() {
            return Err(GuardianError::InvalidRequest(format!(
                "{} analysis requires a non-empty subject",
                self.kind()
            )));
        }
        if let AnalysisRequest::Image { image_base64 } = self {
            image_payload(image_base64)?;
        }
        Ok(())
    }

    /// Inline attachment for image requests, `None` for every other kind.
    pub fn inline_data(&self) -> Result<Option<InlineData>, GuardianError> {
        match self {
            AnalysisRequest::Image { image_base64 } => Ok(Some(image_payload(image_base64)?)),
            _ => Ok(None),
        }
    }
}

/// Split an image subject into MIME type and raw base64. Accepts both a bare
/// base64 string (PNG implied) and a `data:<mime>;base64,<body>` URL.
fn image_payload(subject: &str) -> Result<InlineData, GuardianError> {
    let subject = subject.trim();
    let (mime_type, body) = match subject.strip_prefix("data:") {
        Some(rest) => {
            let (header, body) = rest.split_once(',').ok_or_else(|| {
                GuardianError::InvalidRequest("Malformed data URL in image payload".into())
            })?;
            let mime = header
                .strip_suffix(";base64")
                .ok_or_else(|| {
                    GuardianError::InvalidRequest("Image data URL must be base64-encoded".into())
                })?;
            (mime.to_string(), body)
        }
        None => ("image/png".to_string(), subject),
    };

    let body = body.trim();
    if decode_base64(body).is_none() {
        return Err(GuardianError::InvalidRequest(
            "Image payload is not valid base64".into(),
        ));
    }

    Ok(InlineData { mime_type, data: body.to_string() })
}

/// Models and browsers are inconsistent about padding, so accept both forms.
fn decode_base64(body: &str) -> Option<Vec<u8>> {
    BASE64
        .decode(body.as_bytes())
        .or_else(|_| BASE64_NOPAD.decode(body.as_bytes()))
        .ok()
}
