use ammonia;

/// Sanitizes HTML produced by the generative provider before it is cached
/// on a user record or returned to a client.
///
/// Provider output is untrusted: it is fed straight into a browser by the
/// frontend, so anything beyond a whitelist of formatting/table tags
/// (scripts, iframes, event-handler attributes) is stripped here rather
/// than trusted downstream.
pub fn sanitize_generated_html(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_but_keeps_tables() {
        let dirty = "<table><tr><td>Rust Book</td></tr></table><script>alert(1)</script>";
        let clean = sanitize_generated_html(dirty);
        assert!(clean.contains("<table>"));
        assert!(clean.contains("Rust Book"));
        assert!(!clean.contains("script"));
    }
}
