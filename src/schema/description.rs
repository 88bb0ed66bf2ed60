//! Rich-text description assembly.
//!
//! The rendering is a compatibility contract with the target model's
//! description viewer: `info`, then `see` as a link, then `exp`, then
//! `unit`, each introduced by a `<br>`.

/// Optional annotations appended after the free-text `info`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Annotations<'a> {
    pub see: &'a str,
    pub exp: Option<&'a str>,
    pub unit: Option<&'a str>,
}

/// Build the description of an element from its `info` and annotations.
pub fn render_description(info: &str, annotations: Annotations<'_>) -> String {
    let mut description = String::from(info);
    if !annotations.see.is_empty() {
        let see = escape_html(annotations.see);
        description.push_str(&format!("<br><b>see: </b><a href='{see}'>{see}</a>"));
    }
    if let Some(exp) = annotations.exp {
        description.push_str(&format!("<br><b>exp: </b>{exp}"));
    }
    if let Some(unit) = annotations.unit {
        description.push_str(&format!("<br><b>unit: </b>{unit}"));
    }
    description
}

/// Escape the five HTML-significant characters, quotes included.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
