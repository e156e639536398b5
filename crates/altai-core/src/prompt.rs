//! Prompt template for alt text generation.

/// Marker replaced by the context section.
pub const CONTEXT_MARKER: &str = "{{CONTEXT}}";

/// Marker replaced by the code section.
pub const CODE_MARKER: &str = "{{CODE}}";

/// Fixed instruction sent with every image.
pub const ALT_TEXT_PROMPT: &str = "You are an accessibility specialist.

Create alternative text descriptions for the image provided.

Rules:
- Screen reader must understand the alternative text.
- Keep alternative text to ONE sentence, ideally <= 150 characters unless truly necessary.
- If image is decorative, output exactly: alt=\"\" and add a short decorative_reason.
- If image is functional (icon/button/link), alt must describe the ACTION (e.g., \"Search\", \"Open settings\").
- If image is complex (chart/infographic/map/diagram), include long_description as 3-8 bullets summarizing key data/trends/labels.
- Do not repeat adjacent visible text verbatim, when provided you can use the Code section for additional source code context.
- Include level of confidence: low, medium, high.
- If you can not confidently determine the purpose, return alt describing what is visible, and set confidence: low.

Return ONLY valid JSON with keys:
- alt (string)
- decorative_reason (string, optional)
- long_description (array of strings, optional)
- confidence (string, optional)

{{CONTEXT}}

{{CODE}}";

/// Fill `template` with the optional context and code sections.
///
/// Blank or missing values substitute an empty string. Both markers are
/// located in the template before anything is spliced in, so a context that
/// happens to contain `{{CODE}}` is left alone.
pub fn build_prompt(template: &str, context: Option<&str>, code: Option<&str>) -> String {
    let context = section("Context", context);
    let code = section("Code", code);

    let mut slots: Vec<(usize, &str, &str)> = [
        (template.find(CONTEXT_MARKER), CONTEXT_MARKER, context.as_str()),
        (template.find(CODE_MARKER), CODE_MARKER, code.as_str()),
    ]
    .into_iter()
    .filter_map(|(pos, marker, value)| pos.map(|p| (p, marker, value)))
    .collect();
    slots.sort_by_key(|(pos, _, _)| *pos);

    let mut prompt = String::with_capacity(template.len() + context.len() + code.len());
    let mut cursor = 0;
    for (pos, marker, value) in slots {
        prompt.push_str(&template[cursor..pos]);
        prompt.push_str(value);
        cursor = pos + marker.len();
    }
    prompt.push_str(&template[cursor..]);
    prompt
}

/// The alt text prompt with the given context and code.
pub fn alt_text_prompt(context: Option<&str>, code: Option<&str>) -> String {
    build_prompt(ALT_TEXT_PROMPT, context, code)
}

fn section(label: &str, value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => format!("{label}:\n  {v}"),
        _ => String::new(),
    }
}
