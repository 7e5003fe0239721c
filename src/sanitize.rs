//! Markup stripping for learner-entered text
//!
//! Tags are removed until none are left, then whatever angle brackets remain
//! are stored as entities. Running the result through again returns it
//! unchanged.

use std::sync::OnceLock;

use regex::Regex;

/// Elements whose content is dropped along with the tags
const DROPPED_ELEMENTS: [&str; 5] = ["script", "style", "textarea", "option", "noscript"];

struct Patterns {
    dropped: Vec<Regex>,
    comment: Regex,
    tag: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        dropped: DROPPED_ELEMENTS
            .iter()
            .map(|name| {
                // An unclosed element swallows the rest of the text
                Regex::new(&format!(r"(?is)<{name}\b[^>]*>.*?(?:</{name}\s*>|$)")).unwrap()
            })
            .collect(),
        comment: Regex::new(r"(?s)<!--.*?(?:-->|$)").unwrap(),
        tag: Regex::new(r#"</?[A-Za-z!?](?:"[^"]*"|'[^']*'|[^"'>])*>"#).unwrap(),
    })
}

fn strip_once(text: &str, patterns: &Patterns) -> String {
    let mut result = text.to_string();
    for re in &patterns.dropped {
        result = re.replace_all(&result, "").into_owned();
    }
    result = patterns.comment.replace_all(&result, "").into_owned();
    patterns.tag.replace_all(&result, "").into_owned()
}

/// Remove every HTML tag from `text`, keeping the text between tags.
///
/// Script-like elements lose their content as well. Stray `<`, `>` and `&`
/// left over are entity-encoded.
pub fn strip_markup(text: &str) -> String {
    let patterns = patterns();

    // Removing one tag can join its neighbours into a new one
    let mut result = text.to_string();
    loop {
        let next = strip_once(&result, patterns);
        if next == result {
            break;
        }
        result = next;
    }

    let decoded = html_escape::decode_html_entities(&result);
    html_escape::encode_text(&decoded).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_removed_with_content() {
        assert_eq!(strip_markup("<script>alert(1)</script>hello"), "hello");
        assert_eq!(
            strip_markup("<SCRIPT type=\"text/javascript\">\nx()\n</SCRIPT >hola"),
            "hola"
        );
    }

    #[test]
    fn test_tags_stripped_text_kept() {
        assert_eq!(
            strip_markup("<p>el <b>gato</b> negro</p><br/>"),
            "el gato negro"
        );
        assert_eq!(
            strip_markup("<a href=\"http://x\" onclick=\"evil()\">ver</a>"),
            "ver"
        );
    }

    #[test]
    fn test_unclosed_script_drops_rest() {
        assert_eq!(strip_markup("antes<script>alert(1)"), "antes");
    }

    #[test]
    fn test_comments_and_styles() {
        assert_eq!(strip_markup("a<!-- note -->b"), "ab");
        assert_eq!(strip_markup("<style>p{}</style>texto"), "texto");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip_markup("ser vs. estar"), "ser vs. estar");
        assert_eq!(strip_markup("niño, año"), "niño, año");
        assert_eq!(strip_markup(""), "");
    }

    #[test]
    fn test_split_tags_do_not_reassemble() {
        assert_eq!(strip_markup("<<b>script>alert(1)<</b>/script>hello"), "hello");
        assert_eq!(strip_markup("<<<i>b>>x"), "&lt;&gt;x");
    }

    #[test]
    fn test_quoted_attribute_with_bracket() {
        assert_eq!(strip_markup("<a title=\"x>y\">ver</a>"), "ver");
        assert_eq!(strip_markup("<img alt='a>b' src=x>foto"), "foto");
    }

    #[test]
    fn test_stray_brackets_encoded() {
        assert_eq!(strip_markup("1 < 2 y 3 > 2"), "1 &lt; 2 y 3 &gt; 2");
        assert_eq!(strip_markup("ser & estar"), "ser &amp; estar");
        assert_eq!(strip_markup("&lt;script&gt;x"), "&lt;script&gt;x");
    }

    #[test]
    fn test_idempotent() {
        for input in ["1 < 2", "a & b", "<b>gato</b> &amp; perro", "<<b>p>hola"] {
            let once = strip_markup(input);
            assert_eq!(strip_markup(&once), once);
        }
    }
}
