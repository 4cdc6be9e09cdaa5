//! Navigation target resolution.
//!
//! Widgets link out by logical page name ("LeadDetails") plus optional
//! query parameters; the shell owns actual routing. This is purely an
//! opaque path-string producer.

/// "LeadDetails" / "Lead Details" → "lead-details".
fn kebab(page: &str) -> String {
    let mut out = String::with_capacity(page.len() + 4);
    let mut prev_lower = false;
    for c in page.chars() {
        if c.is_whitespace() || c == '_' {
            if !out.ends_with('-') {
                out.push('-');
            }
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_numeric();
        }
    }
    out.trim_matches('-').to_string()
}

/// Build the path for a logical page, percent-encoding query parameters.
pub fn page_url(page: &str, params: &[(&str, &str)]) -> String {
    let path = format!("/{}", kebab(page));
    if params.is_empty() {
        return path;
    }
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().copied())
        .finish();
    format!("{}?{}", path, query)
}
