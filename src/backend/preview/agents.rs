//! User agents that get a synthesized share preview instead of the app shell.

/// Link-unfurling crawlers, matched case-insensitively as substrings
pub const PREVIEW_AGENTS: &[&str] = &[
    "facebookexternalhit",
    "Facebot",
    "Twitterbot",
    "LinkedInBot",
    "Slackbot",
    "Discordbot",
    "TelegramBot",
    "WhatsApp",
    "Pinterest",
    "redditbot",
    "Embedly",
    "Applebot",
    "SkypeUriPreview",
    "vkShare",
    "Iframely",
    "Google-InspectionTool",
    "Mastodon",
    "Bluesky",
];

/// Whether `user_agent` belongs to a preview consumer
pub fn is_preview_agent(user_agent: Option<&str>) -> bool {
    let Some(agent) = user_agent else {
        return false;
    };
    let agent = agent.to_ascii_lowercase();
    PREVIEW_AGENTS
        .iter()
        .any(|known| agent.contains(&known.to_ascii_lowercase()))
}
