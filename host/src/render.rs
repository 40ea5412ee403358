//! HTML for the plugin listing row.

use wvguard_license::RowMeta;

/// Escapes text for HTML element content and double-quoted attributes.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Everything the listing page shows beyond the row itself.
#[derive(Debug)]
pub(crate) enum RowExtra {
    None,
    ActivationForm { plugin_slug: String, nonce: String },
    Redirect { location: String },
}

pub(crate) fn listing_page(plugin_id: &str, version: &str, meta: &[RowMeta], extra: &RowExtra) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html><head><title>Plugins</title></head><body>\n");
    html.push_str("<table class=\"wp-list-table plugins\">\n");

    html.push_str(&format!(
        "<tr class=\"active\" data-plugin=\"{id}\"><td class=\"plugin-title\">{id}</td>\
         <td class=\"column-description\"><div class=\"plugin-version-author-uri\">Version {version}",
        id = escape_html(plugin_id),
        version = escape_html(version),
    ));
    for entry in meta {
        html.push_str(" | ");
        match entry {
            RowMeta::Link { label, href } => {
                html.push_str(&format!("<a href=\"{}\">{}</a>", escape_html(href), escape_html(label)));
            }
            RowMeta::Text { text } => html.push_str(&escape_html(text)),
        }
    }
    html.push_str("</div></td></tr>\n");

    match extra {
        RowExtra::None => {}
        RowExtra::ActivationForm { plugin_slug, nonce } => {
            html.push_str(&activation_form(plugin_slug, nonce));
        }
        RowExtra::Redirect { location } => {
            html.push_str(&format!(
                "<script>window.location = {};</script>\n",
                serde_json::Value::String(location.clone())
            ));
        }
    }

    html.push_str("</table>\n</body></html>\n");
    html
}

fn activation_form(plugin_slug: &str, nonce: &str) -> String {
    let slug = escape_html(plugin_slug);
    format!(
        "<tr class=\"plugin-update-tr active\"><td colspan=\"5\" class=\"plugin-update column-description desc\">\
         <div class=\"notice inline notice-alt\">\
         <div class=\"wrap-license\" data-plugin_slug=\"{slug}\" data-nonce=\"{nonce}\">\
         <b class=\"license-message hidden\"></b>\
         <p><input class=\"regular-text license\" type=\"password\" id=\"license_key_{slug}\">\
         <input type=\"button\" value=\"Activate\" class=\"button-primary activate-license\" /></p>\
         </div></div></td></tr>\n",
        nonce = escape_html(nonce),
    )
}
