//! Card Services
//!
//! Public lookup and listing of dev cards, and owner-only deletion.
//!
//! - **`handlers`** - HTTP handlers for the `/api` card endpoints
//! - **`feed`** - Community feed selection

pub mod feed;
pub mod handlers;

pub use handlers::{delete_card, get_card_by_slug, get_cards, get_cards_query};
