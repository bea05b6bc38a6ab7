// Markup helpers shared by both family extractors.
//
// Extraction is CSS-selector driven. Selectors are compile-time literals,
// so `selector()` treats a parse failure as a programming error.

use scraper::{ElementRef, Html, Selector};

use crate::error::Error;
use crate::records::PortIndex;

/// Bodies shorter than this are never a real admin page.
const MIN_DOCUMENT_LEN: usize = 10;

/// Substrings that only appear on (or in redirects to) the login page.
const LOGIN_MARKERS: [&str; 3] = ["/login.cgi", "/wmi/login", "/redirect.html"];

/// Returns `true` if the switch answered with its login page instead of the
/// requested document. Checked before any extraction is attempted.
pub fn requires_login(body: &str) -> bool {
    body.len() < MIN_DOCUMENT_LEN || LOGIN_MARKERS.iter().any(|m| body.contains(m))
}

/// Compile a static CSS selector.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector `{css}`: {e:?}"))
}

/// `value` attribute of the first element under `scope` matching `css`.
pub(crate) fn input_value(scope: ElementRef<'_>, css: &'static str) -> Option<String> {
    scope
        .select(&selector(css))
        .next()
        .and_then(|el| el.value().attr("value"))
        .map(str::to_owned)
}

/// Trimmed text of the first element under `scope` matching `css`.
pub(crate) fn text(scope: ElementRef<'_>, css: &'static str) -> String {
    scope
        .select(&selector(css))
        .next()
        .map(|el| el.text().collect::<String>().trim().to_owned())
        .unwrap_or_default()
}

/// Trimmed text of every element under `scope` matching `css`.
pub(crate) fn texts(scope: ElementRef<'_>, css: &'static str) -> Vec<String> {
    scope
        .select(&selector(css))
        .map(|el| el.text().collect::<String>().trim().to_owned())
        .collect()
}

/// `value` attribute of the first document element matching `css`.
pub(crate) fn document_value(doc: &Html, css: &'static str) -> Option<String> {
    input_value(doc.root_element(), css)
}

/// Parse a port index as served in a hidden input.
pub(crate) fn port_index(raw: &str) -> Result<PortIndex, Error> {
    raw.trim()
        .parse()
        .map_err(|_| Error::extraction("port index", format!("not a port number: {raw:?}")))
}

/// Split a `"3 - Camera"` label into index and name.
///
/// Non-breaking spaces are normalised first. The separator may have lost
/// its trailing space to trimming when the name is empty. A label without
/// the separator is treated as a bare index with an empty name.
pub(crate) fn port_label(raw: &str) -> Result<(PortIndex, String), Error> {
    let label = raw.replace('\u{a0}', " ");
    match label.split_once('-') {
        Some((index, name)) => Ok((port_index(index)?, name.trim().to_owned())),
        None => Ok((port_index(&label)?, String::new())),
    }
}

/// Power class from an i18n token such as `"ml003@2@"`.
pub(crate) fn power_class(token: &str) -> String {
    token.split('@').nth(1).unwrap_or_default().to_owned()
}

/// Parse a telemetry integer, treating garbage as zero.
pub(crate) fn telemetry_u32(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::debug!(value = raw, "unparseable telemetry value");
        0
    })
}

/// Parse a telemetry decimal, treating garbage as zero.
pub(crate) fn telemetry_f32(raw: &str) -> f32 {
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::debug!(value = raw, "unparseable telemetry value");
        0.0
    })
}

// ── Login documents ─────────────────────────────────────────────────

/// Seed served on the login page in `#rand`.
pub fn login_seed(body: &str) -> Option<String> {
    let doc = Html::parse_document(body);
    document_value(&doc, "#rand")
}

/// `Gambit` session token from the hidden input of a `Gs316` login response.
pub fn gambit_token(body: &str) -> Option<String> {
    let doc = Html::parse_document(body);
    document_value(&doc, "form input[name=Gambit]").filter(|t| !t.is_empty())
}
