//! Small XML helpers shared by the sitemap and feed writers.

use quick_xml::Reader;
use quick_xml::events::Event;
use std::borrow::Cow;
use tracing::warn;

/// C0 control characters other than tab, LF and CR are not legal XML 1.0.
pub fn is_forbidden_xml_char(c: char) -> bool {
    c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')
}

/// Escape the five XML special characters and drop characters XML 1.0
/// cannot carry.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(|c: char| matches!(c, '&' | '<' | '>' | '"' | '\'') || is_forbidden_xml_char(c)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_forbidden_xml_char(c) => {}
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Wrap `s` in a CDATA section, splitting any embedded `]]>`. Characters
/// XML 1.0 cannot carry are dropped.
pub fn cdata(s: &str) -> String {
    let clean: Cow<'_, str> = if s.contains(is_forbidden_xml_char) {
        Cow::Owned(s.chars().filter(|c| !is_forbidden_xml_char(*c)).collect())
    } else {
        Cow::Borrowed(s)
    };
    format!("<![CDATA[{}]]>", clean.replace("]]>", "]]]]><![CDATA[>"))
}

/// True when the body begins with an XML declaration.
pub fn has_xml_declaration(body: &str) -> bool {
    body.trim_start_matches('\u{feff}')
        .trim_start()
        .starts_with("<?xml")
}

/// Count `<loc>` values that contain `needle`.
///
/// Entity references inside a `<loc>` are resolved before matching.
/// Reading stops at the first parse error; the count so far is returned.
pub fn count_locs_containing(body: &str, needle: &str) -> usize {
    let mut reader = Reader::from_str(body);

    let mut loc: Option<String> = None;
    let mut count = 0;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"loc" => loc = Some(String::new()),
            Ok(Event::Text(t)) => {
                if let Some(text) = loc.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::GeneralRef(r)) => {
                if let Some(text) = loc.as_mut() {
                    match resolve_entity(&String::from_utf8_lossy(&r)) {
                        Some(c) => text.push(c),
                        None => {
                            text.push('&');
                            text.push_str(&String::from_utf8_lossy(&r));
                            text.push(';');
                        }
                    }
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"loc" => {
                if loc.take().is_some_and(|text| text.trim().contains(needle)) {
                    count += 1;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(
                    position = reader.buffer_position(),
                    error = %e,
                    "sitemap body is not well-formed XML"
                );
                break;
            }
        }
    }
    count
}

/// Predefined entities and numeric character references.
fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}
