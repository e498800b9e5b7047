//! HTML views
//!
//! Every interpolated value goes through `html_escape`.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::provider::ProfileBody;

/// Render the `index` view
///
/// With `None`, renders the signed-out page. Otherwise shows whatever the
/// profile API returned: known fields when the body is a JSON object, and
/// the raw body in every case.
pub fn render_index(profile: Option<&ProfileBody>) -> String {
    let content = match profile {
        None => r#"<p>You are not signed in.</p>
    <a href="/linkedin">Sign in with LinkedIn</a>"#
            .to_string(),
        Some(body) => render_profile(body),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>LinkedIn Profile</title></head>
<body>
    <h1>LinkedIn Profile</h1>
    {content}
</body>
</html>
"#
    )
}

fn render_profile(body: &ProfileBody) -> String {
    let mut html = String::new();

    let raw = match body {
        ProfileBody::Json(value) => {
            if let Some(fields) = value.as_object() {
                html.push_str("<dl class=\"profile\">");
                if let Some(id) = fields.get("id") {
                    push_field(&mut html, "ID", &display_value(id));
                }
                if let Some(connections) = fields.get("numConnections") {
                    push_field(&mut html, "Connections", &display_value(connections));
                }
                html.push_str("</dl>");

                if let Some(picture) = fields.get("pictureUrl").and_then(|v| v.as_str()) {
                    if picture.starts_with("https://") || picture.starts_with("http://") {
                        html.push_str(&format!(
                            "<img class=\"avatar\" src=\"{}\" alt=\"Profile picture\">",
                            encode_double_quoted_attribute(picture)
                        ));
                    }
                }
            }
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        ProfileBody::Text(text) => text.clone(),
    };

    html.push_str(&format!("<pre class=\"raw\">{}</pre>", encode_text(&raw)));
    html
}

fn push_field(html: &mut String, label: &str, value: &str) {
    html.push_str(&format!(
        "<dt>{}</dt><dd>{}</dd>",
        encode_text(label),
        encode_text(value)
    ));
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
