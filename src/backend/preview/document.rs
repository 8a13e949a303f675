/**
 * Share Preview Document
 *
 * Builds the small HTML page crawlers read when a card link is shared:
 * Open Graph and Twitter Card meta tags, a canonical link and a visible
 * placeholder line. Every interpolated value is HTML-escaped.
 */

use crate::shared::card::{CardRecord, Profile};

pub const SITE_NAME: &str = "Dev Card";
pub const FALLBACK_HANDLE: &str = "developer";
pub const FALLBACK_DESCRIPTION: &str = "Check out this developer's dev card";
pub const DESCRIPTION_SEPARATOR: &str = " · ";
pub const IMAGE_WIDTH: u32 = 1200;
pub const IMAGE_HEIGHT: u32 = 630;

/// Display text for a model identifier
///
/// `composer-1` becomes `Composer 1`.
pub fn format_model_name(raw: &str) -> String {
    raw.split('-')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Description line built from the profile
///
/// Model, plan and max mode, in that order, skipping whatever is absent.
pub fn describe(profile: &Profile) -> String {
    let model = profile
        .primary_model
        .as_deref()
        .map(format_model_name)
        .unwrap_or_default();
    let plan = profile
        .plan_tier
        .as_deref()
        .map(|p| p.trim().to_uppercase())
        .unwrap_or_default();
    let max = if profile.is_max_mode { "MAX".to_string() } else { String::new() };

    let parts: Vec<String> = [model, plan, max]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        FALLBACK_DESCRIPTION.to_string()
    } else {
        parts.join(DESCRIPTION_SEPARATOR)
    }
}

/// Escape text for use in element content and double-quoted attributes
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// A synthesized share preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    pub handle: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub canonical_url: String,
}

impl PreviewDocument {
    /// Build the preview for `card`
    ///
    /// `origin` is `{scheme}://{host}` without a trailing slash and
    /// `og_image_path` starts with `/`.
    pub fn for_card(card: &CardRecord, origin: &str, og_image_path: &str) -> Self {
        let handle = card.primary_handle().unwrap_or(FALLBACK_HANDLE).to_string();
        Self {
            title: format!("@{}'s dev card", handle),
            description: describe(&card.profile),
            image_url: format!("{}{}/{}", origin, og_image_path, card.slug),
            canonical_url: format!("{}/c/{}", origin, card.slug),
            handle,
        }
    }

    /// Render the HTML page
    pub fn render(&self) -> String {
        let title = escape_html(&self.title);
        let description = escape_html(&self.description);
        let image = escape_html(&self.image_url);
        let url = escape_html(&self.canonical_url);
        let site = escape_html(SITE_NAME);

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<meta name="description" content="{description}">
<meta property="og:type" content="profile">
<meta property="og:site_name" content="{site}">
<meta property="og:title" content="{title}">
<meta property="og:description" content="{description}">
<meta property="og:image" content="{image}">
<meta property="og:image:width" content="{width}">
<meta property="og:image:height" content="{height}">
<meta property="og:url" content="{url}">
<meta name="twitter:card" content="summary_large_image">
<meta name="twitter:title" content="{title}">
<meta name="twitter:description" content="{description}">
<meta name="twitter:image" content="{image}">
<link rel="canonical" href="{url}">
</head>
<body>
<p>Loading dev card…</p>
</body>
</html>
"#,
            width = IMAGE_WIDTH,
            height = IMAGE_HEIGHT,
        )
    }
}
