// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// Appended to every prompt that expects an array back.
pub const JSON_ARRAY_INSTRUCTION: &str = "Respond with the JSON array only. \
    Do NOT wrap it in markdown code fences. \
    Do NOT add explanations before or after the array.";

/// Audience constraint shared by quiz and career prompts.
pub const AUDIENCE_INSTRUCTION: &str = "The reader is a high school student. \
    Keep wording clear, age-appropriate, and free of jargon.";
