use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_MAX_INPUT_LEN: usize = 500;
pub const EMAIL_MAX_LEN: usize = 254;

static ANGLE_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[<>]").expect("valid angle bracket regex"));
static JS_PROTOCOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)javascript:").expect("valid protocol regex"));
static EVENT_HANDLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)on[0-9a-z_]+=").expect("valid event handler regex")
});

/// Strips a small denylist from free-text input and truncates it.
///
/// Trims, removes `<` and `>`, removes `javascript:` and `on<word>=`
/// (case-insensitive), then keeps at most `max_len` characters. This is a
/// cosmetic filter; output must still be escaped where it is rendered.
pub fn sanitize_input(input: &str, max_len: usize) -> String {
    let stripped = ANGLE_BRACKETS.replace_all(input.trim(), "");
    let stripped = JS_PROTOCOL.replace_all(&stripped, "");
    let stripped = EVENT_HANDLER.replace_all(&stripped, "");
    stripped.chars().take(max_len).collect()
}

pub fn sanitize_email(email: &str) -> String {
    sanitize_input(email, EMAIL_MAX_LEN).to_lowercase()
}

/// Keeps digits, `+`, `-`, whitespace and parentheses.
pub fn sanitize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| {
            c.is_ascii_digit()
                || matches!(c, '+' | '-' | '(' | ')')
                || c.is_whitespace()
        })
        .collect()
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub fn unescape_html(html: &str) -> String {
    html.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_denylist() {
        assert_eq!(
            sanitize_input("  <script>alert(1)</script>  ", DEFAULT_MAX_INPUT_LEN),
            "scriptalert(1)/script"
        );
        assert_eq!(
            sanitize_input("JavaScript:run()", DEFAULT_MAX_INPUT_LEN),
            "run()"
        );
        assert_eq!(
            sanitize_input("img OnError=boom", DEFAULT_MAX_INPUT_LEN),
            "img boom"
        );
    }

    #[test]
    fn truncates_by_characters() {
        assert_eq!(sanitize_input("héllo wörld", 5), "héllo");
        assert_eq!(sanitize_input(&"x".repeat(600), DEFAULT_MAX_INPUT_LEN).len(), 500);
    }

    #[test]
    fn email_and_phone() {
        assert_eq!(sanitize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
        assert_eq!(sanitize_phone("+1 (555) 010-9999 ext.7"), "+1 (555) 010-9999 7");
    }

    #[test]
    fn html_escaping_round_trips() {
        let raw = r#"<a href="x">Tom & 'Jerry'</a>"#;
        let escaped = escape_html(raw);
        assert_eq!(
            escaped,
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(unescape_html(&escaped), raw);
        assert_eq!(unescape_html("&amp;lt;"), "&lt;");
    }
}
