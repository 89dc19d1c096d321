// Shared system instructions sent alongside every prompt.
// Task-specific prompt text lives next to the service that uses it (report::prompts).

/// System instruction for full report generation.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured financial analyst. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Every numeric field MUST be a plain JSON number, never a string, range or placeholder. \
    Do NOT include explanations or apologies.";

/// System instruction for short classification prompts that return a list of names.
pub const NAME_LIST_SYSTEM: &str = "You are a concise industry classifier. \
    You MUST respond with a single JSON object holding one array of short strings. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";
