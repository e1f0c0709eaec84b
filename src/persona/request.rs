//! JSON bodies exchanged with the Gemini `generateContent` endpoint.

use crate::{
    foundation::error::{DiscoError, DiscoResult},
    persona::model::{Persona, ShapeDescription},
};

pub fn prompt_for(description: ShapeDescription) -> String {
    format!(
        "This user just drew a shape for a dance party. It looks like a {}. \
         Give it a fun dancer name and a short \"catchphrase\" describing its dance move.",
        description.phrase()
    )
}

/// Request body: the prompt plus a response schema requiring three string fields.
pub fn build_request(description: ShapeDescription) -> serde_json::Value {
    serde_json::json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt_for(description) }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "catchphrase": { "type": "STRING" },
                    "vibe": { "type": "STRING" }
                },
                "required": ["name", "catchphrase", "vibe"]
            }
        }
    })
}

#[derive(Debug, serde::Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, serde::Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, serde::Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, serde::Deserialize)]
struct Part {
    text: Option<String>,
}

/// Extract the persona from a response body. The model's answer is itself a JSON document
/// carried as text inside the first candidate.
pub fn parse_response(body: &[u8]) -> DiscoResult<Persona> {
    let resp: GenerateResponse = serde_json::from_slice(body)
        .map_err(|e| DiscoError::serde(format!("malformed generateContent response: {e}")))?;
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(DiscoError::persona("response carried no candidate text"));
    }
    serde_json::from_str(text.trim())
        .map_err(|e| DiscoError::serde(format!("candidate text is not a persona: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/persona/request.rs"]
mod tests;
