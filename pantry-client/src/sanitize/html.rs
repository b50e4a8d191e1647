//! Allow-list HTML cleaner.
//!
//! Hand-rolled scanner: disallowed tags are stripped with their text content
//! preserved, active content vectors are removed together with their
//! contents, and retained tags are re-emitted in a normalized form so that
//! cleaning is idempotent.

use super::Policy;

const BASIC_TAGS: &[&str] = &["b", "i", "em", "strong", "u", "br"];
const RICH_TAGS: &[&str] = &["p", "ul", "ol", "li", "a", "img"];

/// Removed as a unit — tag and contents — under every policy.
const DROP_WITH_CONTENT: &[&str] = &["script", "style", "iframe", "object", "embed"];

const BLOCKED_SCHEMES: &[&str] = &["javascript", "data", "vbscript"];

const VOID_TAGS: &[&str] = &["br", "img"];

pub(super) fn allows(policy: Policy, tag: &str) -> bool {
    match policy {
        Policy::Strict => false,
        Policy::Basic => BASIC_TAGS.contains(&tag),
        Policy::Rich => BASIC_TAGS.contains(&tag) || RICH_TAGS.contains(&tag),
    }
}

struct ParsedTag {
    /// Lowercased element name.
    name: String,
    closing: bool,
    /// Lowercased attribute names with raw values, in source order.
    attrs: Vec<(String, String)>,
}

enum Token {
    Tag(ParsedTag),
    /// Comment, doctype or processing instruction — always dropped.
    Markup,
}

pub(super) fn clean(input: &str, policy: Policy) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let tail = &rest[lt..];

        match parse_token(tail) {
            None => {
                // Not a tag: a stray '<' must not survive as markup.
                out.push_str("&lt;");
                rest = &tail[1..];
            }
            Some((Token::Markup, consumed)) => {
                rest = &tail[consumed..];
            }
            Some((Token::Tag(tag), consumed)) => {
                rest = &tail[consumed..];
                if DROP_WITH_CONTENT.contains(&tag.name.as_str()) {
                    if !tag.closing {
                        rest = skip_element(rest, &tag.name);
                    }
                } else if allows(policy, &tag.name) {
                    emit_tag(&mut out, &tag);
                }
                // Disallowed inert tags are stripped; their contents stay.
            }
        }
    }

    out.push_str(rest);
    out
}

fn parse_token(tail: &str) -> Option<(Token, usize)> {
    if tail.starts_with("<!--") {
        let consumed = tail.find("-->").map(|i| i + 3).unwrap_or(tail.len());
        return Some((Token::Markup, consumed));
    }
    if tail.starts_with("<!") || tail.starts_with("<?") {
        let consumed = tail.find('>').map(|i| i + 1).unwrap_or(tail.len());
        return Some((Token::Markup, consumed));
    }

    let bytes = tail.as_bytes();
    let (closing, mut i) = if bytes.get(1) == Some(&b'/') {
        (true, 2)
    } else {
        (false, 1)
    };

    if !bytes.get(i).is_some_and(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let name_start = i;
    while bytes.get(i).is_some_and(|b| b.is_ascii_alphanumeric()) {
        i += 1;
    }
    let name = tail[name_start..i].to_ascii_lowercase();

    let mut attrs = Vec::new();
    loop {
        while bytes
            .get(i)
            .is_some_and(|b| b.is_ascii_whitespace() || *b == b'/')
        {
            i += 1;
        }
        let Some(&b) = bytes.get(i) else {
            // Ran off the end without '>': treat the '<' as text.
            return None;
        };
        if b == b'>' {
            i += 1;
            break;
        }

        let attr_start = i;
        while bytes.get(i).is_some_and(|b| {
            !b.is_ascii_whitespace() && *b != b'=' && *b != b'>' && *b != b'/'
        }) {
            i += 1;
        }
        if i == attr_start {
            return None;
        }
        let attr_name = tail[attr_start..i].to_ascii_lowercase();

        while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
            i += 1;
        }

        let mut value = String::new();
        if bytes.get(i) == Some(&b'=') {
            i += 1;
            while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
                i += 1;
            }
            if bytes.get(i).is_some_and(|b| *b == b'"' || *b == b'\'') {
                let quote = bytes[i];
                i += 1;
                let value_start = i;
                while bytes.get(i).is_some_and(|b| *b != quote) {
                    i += 1;
                }
                if i >= bytes.len() {
                    return None;
                }
                value = tail[value_start..i].to_string();
                i += 1;
            } else {
                let value_start = i;
                while bytes
                    .get(i)
                    .is_some_and(|b| !b.is_ascii_whitespace() && *b != b'>')
                {
                    i += 1;
                }
                value = tail[value_start..i].to_string();
            }
        }
        attrs.push((attr_name, value));
    }

    Some((
        Token::Tag(ParsedTag {
            name,
            closing,
            attrs,
        }),
        i,
    ))
}

/// Skip past the matching closing tag, or to the end of input when none
/// exists. Used for elements whose contents must not survive.
fn skip_element<'a>(rest: &'a str, name: &str) -> &'a str {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i + 2 + name.len() <= bytes.len() {
        if bytes[i] == b'<' && bytes[i + 1] == b'/' {
            let matches_name = rest
                .get(i + 2..i + 2 + name.len())
                .is_some_and(|s| s.eq_ignore_ascii_case(name));
            let boundary = bytes
                .get(i + 2 + name.len())
                .map_or(true, |b| !b.is_ascii_alphanumeric());
            if matches_name && boundary {
                return match rest[i + 2 + name.len()..].find('>') {
                    Some(gt) => &rest[i + 2 + name.len() + gt + 1..],
                    None => "",
                };
            }
        }
        i += 1;
    }
    ""
}

fn emit_tag(out: &mut String, tag: &ParsedTag) {
    if tag.closing {
        if !VOID_TAGS.contains(&tag.name.as_str()) {
            out.push_str("</");
            out.push_str(&tag.name);
            out.push('>');
        }
        return;
    }

    let mut kept: Vec<(&str, String)> = Vec::new();
    let mut href_external = false;

    for (attr_name, value) in &tag.attrs {
        if attr_name.starts_with("on") {
            continue;
        }
        if !allowed_attr(&tag.name, attr_name) {
            continue;
        }
        if kept.iter().any(|(n, _)| *n == attr_name.as_str()) {
            continue;
        }
        if attr_name == "href" || attr_name == "src" {
            let Some(url) = clean_url(value) else {
                continue;
            };
            if attr_name == "href" && is_external(&url) {
                href_external = true;
            }
            kept.push((attr_name, url));
        } else {
            kept.push((attr_name, value.clone()));
        }
    }

    if tag.name == "a" && href_external {
        // External links must not hand the opened page a reference back to
        // this one.
        kept.push(("target", "_blank".to_string()));
        kept.push(("rel", "noopener noreferrer".to_string()));
    }

    out.push('<');
    out.push_str(&tag.name);
    for (attr_name, value) in &kept {
        out.push(' ');
        out.push_str(attr_name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');
}

fn allowed_attr(tag: &str, attr: &str) -> bool {
    matches!((tag, attr), ("a", "href") | ("img", "src") | ("img", "alt"))
}

/// Strip characters that can hide a scheme, then reject active schemes.
fn clean_url(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control() && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(colon) = cleaned.find(':') {
        let pre = &cleaned[..colon];
        if !pre.contains('/') && !pre.contains('?') && !pre.contains('#') {
            let scheme = pre.to_ascii_lowercase();
            if BLOCKED_SCHEMES.contains(&scheme.as_str()) {
                return None;
            }
        }
    }

    Some(cleaned)
}

fn is_external(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}

fn escape_attr(value: &str) -> String {
    value.replace('"', "&quot;").replace('<', "&lt;")
}
