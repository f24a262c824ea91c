// Timezone label localizer, (c) 2022-2024 Georg Brandl.
// Licensed under the GNU AGPL, version 3 or later.

//! Client for the web translation page.

use anyhow::{Context, Result};
use ureq::Agent;
use crate::config::Settings;
use crate::util::html_unescape;

/// Something that can translate a phrase between two languages.
pub trait Translate {
    /// Translate `phrase` from language `from` to language `to`.  An empty
    /// string means that no translation was found.
    fn translate(&self, phrase: &str, from: &str, to: &str) -> Result<String>;
}

/// Scrapes translations from the HTML result page of the translation site.
pub struct WebTranslator {
    agent: Agent,
    endpoint: String,
    user_agent: String,
    accept_language: String,
}

impl WebTranslator {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            agent: settings.make_agent().context("creating HTTP agent")?,
            endpoint: settings.endpoint.clone(),
            user_agent: settings.user_agent.clone(),
            accept_language: settings.accept_language.clone(),
        })
    }
}

impl Translate for WebTranslator {
    fn translate(&self, phrase: &str, from: &str, to: &str) -> Result<String> {
        log::debug!("translating {:?} from {} to {}", phrase, from, to);
        let html = self.agent.get(self.endpoint.as_str())
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept-Language", self.accept_language.as_str())
            .query("q", phrase)
            .query("sl", from)
            .query("tl", to)
            .call()
            .with_context(|| format!("requesting translation {} -> {}", from, to))?
            .body_mut()
            .read_to_string()
            .context("reading translation page")?;
        let result = extract_translation(&html, phrase);
        log::trace!("got {:?}", result);
        Ok(result)
    }
}


/// A parsed start or end tag.
struct Tag {
    name: String,
    closing: bool,
    attrs: Vec<(String, String)>,
}

impl Tag {
    /// Parse the text between `<` and `>`.
    fn parse(src: &str) -> Self {
        let src = src.trim().trim_end_matches('/');
        let (closing, src) = match src.strip_prefix('/') {
            Some(src) => (true, src),
            None => (false, src),
        };
        let name_end = src.find(char::is_whitespace).unwrap_or(src.len());
        let name = src[..name_end].to_ascii_lowercase();

        let mut attrs = Vec::new();
        let mut rest = src[name_end..].trim_start();
        while !rest.is_empty() {
            let key_end = rest.find(|c: char| c == '=' || c.is_whitespace()).unwrap_or(rest.len());
            let key = rest[..key_end].to_ascii_lowercase();
            rest = rest[key_end..].trim_start();
            let mut value = String::new();
            if let Some(after) = rest.strip_prefix('=') {
                let after = after.trim_start();
                let (raw, remaining) = match after.chars().next() {
                    Some(quote @ ('"' | '\'')) => {
                        let body = &after[1..];
                        let end = body.find(quote).unwrap_or(body.len());
                        (&body[..end], body.get(end+1..).unwrap_or(""))
                    }
                    _ => {
                        let end = after.find(char::is_whitespace).unwrap_or(after.len());
                        (&after[..end], &after[end..])
                    }
                };
                value = html_unescape(raw);
                rest = remaining.trim_start();
            }
            if !key.is_empty() {
                attrs.push((key, value));
            }
        }
        Self { name, closing, attrs }
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Find the `>` closing a tag, ignoring any inside quoted attribute values.
fn tag_end(markup: &str) -> Option<usize> {
    let mut quote = None;
    for (i, ch) in markup.char_indices() {
        match (quote, ch) {
            (None, '"' | '\'') => quote = Some(ch),
            (Some(q), c) if c == q => quote = None,
            (None, '>') => return Some(i),
            _ => ()
        }
    }
    None
}

/// Extract the translation of `phrase` from the result page.
///
/// The translated text is the first text following a `<span>` whose
/// `title` is the original phrase.  Any other start tag in between (except
/// another attributed span) cancels the match.
pub fn extract_translation(html: &str, phrase: &str) -> String {
    let mut capture = false;
    let mut rest = html;
    loop {
        let (text, markup) = match rest.find('<') {
            Some(pos) => (&rest[..pos], Some(&rest[pos..])),
            None => (rest, None),
        };
        if capture && !text.trim().is_empty() {
            return html_unescape(text.trim());
        }
        let Some(markup) = markup else { break };

        if let Some(body) = markup.strip_prefix("<!--") {
            rest = body.find("-->").map_or("", |end| &body[end+3..]);
            continue;
        }
        let Some(end) = tag_end(markup) else { break };
        let tag = Tag::parse(&markup[1..end]);
        rest = &markup[end+1..];
        if tag.closing {
            continue;
        }

        if tag.name == "script" || tag.name == "style" {
            // raw content, skip to the end tag
            let close = format!("</{}", tag.name);
            rest = rest.to_ascii_lowercase().find(&close).map_or("", |pos| &rest[pos..]);
            capture = false;
        } else if tag.name == "span" && !tag.attrs.is_empty() {
            if tag.attr("title") == Some(phrase) {
                capture = true;
            }
        } else {
            capture = false;
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html><html><head>
<script>var x = "<span title='Vou a Recife'>wrong</span>";</script>
<style>span { color: red }</style></head>
<body><div id=gt-res-content><span id=result_box class="short_text" lang="fr">
<!-- <span title="Vou a Recife">commented</span> -->
<span title="Vou a Recife" onmouseover="this.style.backgroundColor='#ebeff9'">Je vais &#224; Recife</span>
</span></div></body></html>"#;

    #[test]
    fn test_extract() {
        assert_eq!(extract_translation(PAGE, "Vou a Recife"), "Je vais \u{e0} Recife");
    }

    #[test]
    fn test_extract_missing() {
        assert_eq!(extract_translation(PAGE, "Recife"), "");
        assert_eq!(extract_translation("", "Recife"), "");
        assert_eq!(extract_translation("<span title=\"Recife\"", "Recife"), "");
    }

    #[test]
    fn test_extract_interrupted() {
        let html = r#"<span title="Recife"><b>bold</b></span>"#;
        assert_eq!(extract_translation(html, "Recife"), "");
        let html = r#"<span title="Recife"><span class="x">Récife</span></span>"#;
        assert_eq!(extract_translation(html, "Recife"), "Récife");
    }

    #[test]
    fn test_tag_parse() {
        let tag = Tag::parse(r#"SPAN Title="a &amp; b > c" data-x=1 hidden"#);
        assert_eq!(tag.name, "span");
        assert!(!tag.closing);
        assert_eq!(tag.attr("title"), Some("a & b > c"));
        assert_eq!(tag.attr("data-x"), Some("1"));
        assert_eq!(tag.attr("hidden"), Some(""));
        assert!(Tag::parse("/span").closing);
        assert_eq!(tag_end(r#"span title="x>y">z"#), Some(16));
    }

    fn url_decode(s: &str) -> String {
        let s = s.replace('+', " ");
        let mut bytes = Vec::new();
        let mut iter = s.bytes();
        while let Some(b) = iter.next() {
            if b == b'%' {
                let hex: String = iter.by_ref().take(2).map(char::from).collect();
                bytes.push(u8::from_str_radix(&hex, 16).unwrap());
            } else {
                bytes.push(b);
            }
        }
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_web_request() {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = conn.read(&mut buf).unwrap();
                assert!(n > 0);
                request.extend_from_slice(&buf[..n]);
            }
            let body = "<html><body><span title=\"Vou a Recife &amp; Olinda\">\
                        Je vais \u{e0} Recife et Olinda</span></body></html>";
            write!(conn, "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\n\
                          Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                   body.len(), body).unwrap();
            String::from_utf8(request).unwrap()
        });

        let settings: Settings = serde_json::from_str(
            &format!(r#"{{"endpoint": "http://{}/translate_t"}}"#, addr)).unwrap();
        let tr = WebTranslator::new(&settings).unwrap();
        let result = tr.translate("Vou a Recife & Olinda", "pt", "fr").unwrap();
        assert_eq!(result, "Je vais \u{e0} Recife et Olinda");

        let request = server.join().unwrap();
        let mut lines = request.lines();
        let target = lines.next().unwrap()
            .strip_prefix("GET ").unwrap()
            .strip_suffix(" HTTP/1.1").unwrap();
        let (path, query) = target.split_once('?').unwrap();
        assert_eq!(path, "/translate_t");
        let params: Vec<_> = query.split('&')
            .map(|kv| kv.split_once('=').unwrap())
            .map(|(k, v)| (k.to_string(), url_decode(v)))
            .collect();
        assert_eq!(params, [("q".to_string(), "Vou a Recife & Olinda".to_string()),
                            ("sl".to_string(), "pt".to_string()),
                            ("tl".to_string(), "fr".to_string())]);

        let headers: Vec<_> = lines.filter_map(|l| l.split_once(": "))
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
            .collect();
        let header = |name: &str| headers.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str());
        assert_eq!(header("user-agent"), Some("Mozilla/5.001 (windows; U; NT4.0; en-us) Gecko/25250101"));
        assert_eq!(header("accept-language"), Some("en-us,en;q=0.5"));
    }
}
