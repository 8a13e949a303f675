//! Card fixtures

use devcard::shared::{CardRecord, HandleEntry, Profile};
use uuid::Uuid;

/// Profile with one handle and the given display fields
pub fn profile(handle: &str, model: Option<&str>, plan: Option<&str>, max: bool) -> Profile {
    Profile {
        handles: vec![HandleEntry {
            platform: Some("x".to_string()),
            handle: handle.to_string(),
        }],
        primary_model: model.map(str::to_string),
        plan_tier: plan.map(str::to_string),
        is_max_mode: max,
        ..Profile::default()
    }
}

/// Card that qualifies for the community feed
pub fn public_card(owner: Uuid, handle: &str) -> CardRecord {
    CardRecord::new(handle, owner, profile(handle, None, None, false)).with_image(format!(
        "https://cdn.example/storage/v1/object/public/polaroids/{}/{}.png",
        owner, handle
    ))
}

/// Card with no image
pub fn draft_card(owner: Uuid, slug: &str) -> CardRecord {
    CardRecord::new(slug, owner, profile(slug, None, None, false))
}

/// Same card, created `minutes` ago
pub fn aged(mut card: CardRecord, minutes: i64) -> CardRecord {
    let at = chrono::Utc::now() - chrono::Duration::minutes(minutes);
    card.created_at = at;
    card.updated_at = at;
    card
}
