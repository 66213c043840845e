//! Compile-and-run responses relayed from the remote backend
//!
//! The relay forwards whatever the backend produced. Two payload formats are
//! understood: an XML document rooted at `<response>` with `compilation` and
//! `runtime` sections, and a JSON object with the same two sections. The XML
//! document may be preceded by transport noise (status line, headers), so it
//! is located by its `<?xml ` prolog.

use serde::{Deserialize, Deserializer, Serialize};

/// Output of one stage (compilation or execution)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    /// Exit status; `None` when the backend sent nothing parseable
    #[serde(default, deserialize_with = "lenient_int")]
    pub status: Option<i64>,
    #[serde(default)]
    pub err: String,
    /// Duration in milliseconds
    #[serde(default, deserialize_with = "lenient_int")]
    pub time: Option<i64>,
}

impl Stage {
    /// A missing status counts as success
    pub fn failed(&self) -> bool {
        self.status.unwrap_or(0) != 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResponse {
    #[serde(default)]
    pub compilation: Stage,
    #[serde(default)]
    pub runtime: Stage,
}

impl RunResponse {
    /// A payload carrying neither section is a backend error, not an empty run
    fn from_sections(compilation: Option<Stage>, runtime: Option<Stage>) -> Option<Self> {
        if compilation.is_none() && runtime.is_none() {
            return None;
        }
        Some(Self {
            compilation: compilation.unwrap_or_default(),
            runtime: runtime.unwrap_or_default(),
        })
    }
}

/// JSON payload as sent, with both sections optional
#[derive(Deserialize)]
struct JsonPayload {
    #[serde(default)]
    compilation: Option<Stage>,
    #[serde(default)]
    runtime: Option<Stage>,
}

/// Extract a response from the raw body, or `None` when no well-formed
/// payload is present
pub fn parse_payload(body: &str) -> Option<RunResponse> {
    if let Some(pos) = body.find("<?xml ") {
        return parse_xml(&body[pos..]);
    }

    let trimmed = body.trim();
    if trimmed.starts_with('{') {
        return match serde_json::from_str::<JsonPayload>(trimmed) {
            Ok(payload) => {
                let response = RunResponse::from_sections(payload.compilation, payload.runtime);
                if response.is_none() {
                    tracing::warn!("JSON run response has no compilation or runtime section");
                }
                response
            }
            Err(e) => {
                tracing::warn!(error = %e, "malformed JSON run response");
                None
            }
        };
    }

    None
}

fn parse_xml(doc: &str) -> Option<RunResponse> {
    let response = element(doc, "response")?;
    RunResponse::from_sections(
        element(response, "compilation").map(parse_stage),
        element(response, "runtime").map(parse_stage),
    )
}

fn parse_stage(section: &str) -> Stage {
    let text = |tag: &str| element(section, tag).map(decode_text).unwrap_or_default();
    Stage {
        stdout: text("stdout"),
        stderr: text("stderr"),
        status: element(section, "status").and_then(|s| parse_int_prefix(&decode_text(s))),
        err: text("err"),
        time: element(section, "time").and_then(|s| parse_int_prefix(&decode_text(s))),
    }
}

/// Inner content of the first `<tag>` element in `text`. A self-closing
/// element yields an empty string.
fn element<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);

    let mut pos = 0;
    while let Some(start) = text[pos..].find(&open) {
        let after_name = pos + start + open.len();
        let rest = &text[after_name..];

        // `<stdout>` but not `<stdoutx>`
        match rest.chars().next() {
            Some('>') | Some('/') => {}
            Some(c) if c.is_whitespace() => {}
            _ => {
                pos = after_name;
                continue;
            }
        }

        let tag_end = after_name + rest.find('>')?;
        if text[..tag_end].ends_with('/') {
            return Some("");
        }

        let content_start = tag_end + 1;
        let content_end = content_start + text[content_start..].find(&close)?;
        return Some(&text[content_start..content_end]);
    }
    None
}

/// Unwrap CDATA sections and decode the predefined and numeric entities
fn decode_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while !rest.is_empty() {
        if let Some(inner) = rest.strip_prefix("<![CDATA[") {
            let end = inner.find("]]>").unwrap_or(inner.len());
            out.push_str(&inner[..end]);
            rest = inner.get(end + 3..).unwrap_or("");
            continue;
        }

        let next = rest.find(|c: char| c == '&' || c == '<').unwrap_or(rest.len());
        if next > 0 {
            out.push_str(&rest[..next]);
            rest = &rest[next..];
            continue;
        }

        if rest.starts_with('&') {
            if let Some(semi) = rest.find(';') {
                if let Some(c) = decode_entity(&rest[1..semi]) {
                    out.push(c);
                    rest = &rest[semi + 1..];
                    continue;
                }
            }
        }

        // Lone `&` or `<` that does not start anything we decode
        let c = rest.chars().next().unwrap_or('&');
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// Leading integer of a string, ignoring surrounding whitespace and any
/// trailing garbage (`"12ms"` is 12)
fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim();
    let digits_end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..digits_end].parse().ok()
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(serde_json::Value::String(s)) => parse_int_prefix(&s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML_OK: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/xml\r\n\r\n\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<response>\n\
  <compilation>\n\
    <stdout></stdout>\n\
    <status>0</status>\n\
    <err/>\n\
    <time>312</time>\n\
  </compilation>\n\
  <runtime>\n\
    <stdout>a &lt; b &amp;&amp; c\n</stdout>\n\
    <stderr><![CDATA[warn: <x>]]></stderr>\n\
    <status>1</status>\n\
    <err>Exited with code 1</err>\n\
    <time>4ms</time>\n\
  </runtime>\n\
</response>\r\n\r\n";

    #[test]
    fn test_parses_xml_after_transport_noise() {
        let response = parse_payload(XML_OK).unwrap();
        assert_eq!(response.compilation.status, Some(0));
        assert_eq!(response.compilation.time, Some(312));
        assert_eq!(response.compilation.err, "");
        assert_eq!(response.runtime.stdout, "a < b && c\n");
        assert_eq!(response.runtime.stderr, "warn: <x>");
        assert_eq!(response.runtime.status, Some(1));
        assert_eq!(response.runtime.time, Some(4));
        assert!(response.runtime.failed());
        assert!(!response.compilation.failed());
    }

    #[test]
    fn test_xml_without_response_root_is_rejected() {
        assert_eq!(parse_payload("<?xml version=\"1.0\"?><error/>"), None);
    }

    #[test]
    fn test_missing_sections_default() {
        let response =
            parse_payload("<?xml version=\"1.0\"?><response><runtime><stdout>hi</stdout></runtime></response>")
                .unwrap();
        assert_eq!(response.compilation, Stage::default());
        assert_eq!(response.runtime.stdout, "hi");
        assert_eq!(response.runtime.status, None);
        assert!(!response.runtime.failed());
    }

    #[test]
    fn test_element_does_not_match_longer_tag_names() {
        let doc = "<stdoutx>no</stdoutx><stdout attr=\"1\">yes</stdout>";
        assert_eq!(element(doc, "stdout"), Some("yes"));
    }

    #[test]
    fn test_parses_json() {
        let body = r#"{
            "compilation": {"stdout": "", "status": 0, "err": ""},
            "runtime": {"stdout": "hello\n", "stderr": "", "status": "0", "time": 12}
        }"#;
        let response = parse_payload(body).unwrap();
        assert_eq!(response.runtime.stdout, "hello\n");
        assert_eq!(response.runtime.status, Some(0));
        assert_eq!(response.runtime.time, Some(12));
    }

    #[test]
    fn test_unparseable_bodies() {
        assert_eq!(parse_payload(""), None);
        assert_eq!(parse_payload("502 Bad Gateway"), None);
        assert_eq!(parse_payload("{not json"), None);
    }

    #[test]
    fn test_payload_without_sections_is_rejected() {
        assert_eq!(parse_payload(r#"{"error":"backend overloaded"}"#), None);
        assert_eq!(parse_payload("{}"), None);
        assert_eq!(parse_payload("<?xml version=\"1.0\"?><response></response>"), None);
        assert_eq!(
            parse_payload("<?xml version=\"1.0\"?><response><error>busy</error></response>"),
            None
        );

        // one section is enough
        let response = parse_payload(r#"{"compilation": {"status": 1, "err": "failed"}}"#).unwrap();
        assert!(response.compilation.failed());
        assert_eq!(response.runtime, Stage::default());
    }

    #[test]
    fn test_decode_text() {
        assert_eq!(decode_text("&#65;&#x42;&quot;&apos;"), "AB\"'");
        assert_eq!(decode_text("fish & chips"), "fish & chips");
        assert_eq!(decode_text("&unknown;"), "&unknown;");
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix(" 42 "), Some(42));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("7ms"), Some(7));
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("NaN"), None);
    }
}
