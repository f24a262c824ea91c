// Timezone label localizer, (c) 2022-2024 Georg Brandl.
// Licensed under the GNU AGPL, version 3 or later.

//! Various utilities.

use once_cell::sync::Lazy;

/// Time format used for log output.
pub static TIME_FMT: Lazy<Vec<time::format_description::FormatItem>> = Lazy::new(|| {
    time::format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]").unwrap()
});


/// Helpers for inspecting XML resource trees.
pub trait ElementExt {
    fn def_attr<'a>(&'a self, attr: &'a str, def: &'a str) -> &'a str;
    fn find_named(&self, tag: &str, name: &str) -> Option<&elementtree::Element>;
}

impl ElementExt for elementtree::Element {
    fn def_attr<'a>(&'a self, attr: &'a str, def: &'a str) -> &'a str {
        self.get_attr(attr).unwrap_or(def)
    }

    fn find_named(&self, tag: &str, name: &str) -> Option<&elementtree::Element> {
        self.children().find(|el| el.tag().name() == tag && el.def_attr("name", "") == name)
    }
}


/// Escape text for use as XML character data.
pub fn xml_escape(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => res.push_str("&amp;"),
            '<' => res.push_str("&lt;"),
            '>' => res.push_str("&gt;"),
            _ => res.push(ch),
        }
    }
    res
}

/// Entity names for U+00A0 to U+00FF.
const LATIN1_NAMES: [&str; 96] = [
    "nbsp", "iexcl", "cent", "pound", "curren", "yen", "brvbar", "sect",
    "uml", "copy", "ordf", "laquo", "not", "shy", "reg", "macr",
    "deg", "plusmn", "sup2", "sup3", "acute", "micro", "para", "middot",
    "cedil", "sup1", "ordm", "raquo", "frac14", "frac12", "frac34", "iquest",
    "Agrave", "Aacute", "Acirc", "Atilde", "Auml", "Aring", "AElig", "Ccedil",
    "Egrave", "Eacute", "Ecirc", "Euml", "Igrave", "Iacute", "Icirc", "Iuml",
    "ETH", "Ntilde", "Ograve", "Oacute", "Ocirc", "Otilde", "Ouml", "times",
    "Oslash", "Ugrave", "Uacute", "Ucirc", "Uuml", "Yacute", "THORN", "szlig",
    "agrave", "aacute", "acirc", "atilde", "auml", "aring", "aelig", "ccedil",
    "egrave", "eacute", "ecirc", "euml", "igrave", "iacute", "icirc", "iuml",
    "eth", "ntilde", "ograve", "oacute", "ocirc", "otilde", "ouml", "divide",
    "oslash", "ugrave", "uacute", "ucirc", "uuml", "yacute", "thorn", "yuml",
];

/// Decode HTML character references: numeric ones, the XML five and the
/// Latin-1 names.  Unknown references are kept verbatim.
pub fn html_unescape(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        res.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let decoded = rest.find(';').filter(|&end| end <= 10).and_then(|end| {
            let ch = match &rest[1..end] {
                "amp" => '&',
                "lt" => '<',
                "gt" => '>',
                "quot" => '"',
                "apos" => '\'',
                num if num.starts_with("#x") || num.starts_with("#X") =>
                    char::from_u32(u32::from_str_radix(&num[2..], 16).ok()?)?,
                num if num.starts_with('#') =>
                    char::from_u32(num[1..].parse().ok()?)?,
                name => {
                    let idx = LATIN1_NAMES.iter().position(|&n| n == name)?;
                    char::from_u32(0xa0 + idx as u32)?
                }
            };
            Some((ch, end))
        });
        match decoded {
            Some((ch, end)) => {
                res.push(ch);
                rest = &rest[end+1..];
            }
            None => {
                res.push('&');
                rest = &rest[1..];
            }
        }
    }
    res.push_str(rest);
    res
}

#[test]
fn test_html_unescape() {
    assert_eq!(html_unescape("Je vais &agrave; Recife"), "Je vais \u{e0} Recife");
    assert_eq!(html_unescape("&Ntilde;&nbsp;&yuml;&szlig;"), "\u{d1}\u{a0}\u{ff}\u{df}");
    assert_eq!(html_unescape("&hellip; &bogus;"), "&hellip; &bogus;");
    assert_eq!(html_unescape("I&#39;m going to Recife"), "I'm going to Recife");
    assert_eq!(html_unescape("a &amp; b &lt;c&gt; &#x263A;"), "a & b <c> \u{263a}");
    assert_eq!(html_unescape("fish & chips"), "fish & chips");
    assert_eq!(html_unescape("trailing &"), "trailing &");
}

#[test]
fn test_xml_escape() {
    assert_eq!(xml_escape("Récife"), "Récife");
    assert_eq!(xml_escape("R&D <x>"), "R&amp;D &lt;x&gt;");
}
