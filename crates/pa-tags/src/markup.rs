//! HTML fragments emitted by the attachment tags
//!
//! Attribute values are written as given; only [`escape_html`] escapes.

/// Escape text for use inside HTML
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// ` key="value"` pairs in order
pub fn html_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    attrs
        .into_iter()
        .map(|(key, value)| format!(r#" {}="{}""#, key, value))
        .collect()
}

pub fn img<'a>(src: &str, attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    format!(r#"<img src="{}"{} />"#, src, html_attributes(attrs))
}

pub fn anchor<'a>(
    href: &str,
    attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
    text: &str,
) -> String {
    format!(r#"<a href="{}"{}>{}</a>"#, href, html_attributes(attrs), text)
}
