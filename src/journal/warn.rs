fn sanitize_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_ascii_whitespace() {
            if !out.is_empty() && !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else if ch.is_ascii_graphic() {
            out.push(ch);
            prev_sep = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "na".to_string()
    } else {
        trimmed.to_string()
    }
}

/// One structured stderr line for a fail-soft recovery. These never carry
/// user-visible errors; they exist so a reset data file leaves a trace.
pub fn emit(code: &str, path: &str, reason: &str) {
    eprintln!(
        "DAYBOOK_WARN code={} path={} reason={}",
        sanitize_value(code),
        sanitize_value(path),
        sanitize_value(reason),
    );
}
