/// Strips a surrounding markdown code fence (```json ... ```) from model output.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // drop the language tag line
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Falls back to JPEG when the upload carries no usable content type.
pub fn image_mime_type(content_type: Option<&str>) -> &str {
    match content_type {
        Some(ct) if ct.starts_with("image/") => ct,
        _ => "image/jpeg",
    }
}
