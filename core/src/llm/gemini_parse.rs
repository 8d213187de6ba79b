//! Gemini response parsing
//!
//! Public functions for parsing `generateContent` JSON responses.

use serde_json::Value as JsonValue;

use crate::llm::AdapterError;

/// Parse a `generateContent` response into its text
///
/// Text parts of the first candidate are concatenated. A blocked prompt, an
/// error object, or a candidate without text is reported as an error.
pub fn parse_generate_content(response: &str) -> Result<String, AdapterError> {
    let json: JsonValue = serde_json::from_str(response)?;

    if let Some(error) = json.get("error") {
        let code = error
            .get("status")
            .and_then(|s| s.as_str())
            .map(str::to_string)
            .or_else(|| error.get("code").map(|c| c.to_string()))
            .unwrap_or_else(|| "UNKNOWN".to_string());
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("no message")
            .to_string();
        return Err(AdapterError::Provider { code, message });
    }

    if let Some(reason) = json
        .get("promptFeedback")
        .and_then(|p| p.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        return Err(AdapterError::Blocked(reason.to_string()));
    }

    let candidate = json["candidates"]
        .get(0)
        .ok_or_else(|| AdapterError::InvalidResponse("Missing candidates[0]".to_string()))?;

    let text: String = candidate["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return match candidate.get("finishReason").and_then(|r| r.as_str()) {
            Some(reason) if reason != "STOP" => Err(AdapterError::Blocked(reason.to_string())),
            _ => Err(AdapterError::InvalidResponse(
                "Candidate contained no text".to_string(),
            )),
        };
    }

    Ok(text)
}
