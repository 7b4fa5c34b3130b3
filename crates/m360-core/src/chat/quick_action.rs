//! Follow-up actions offered under bot messages.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::message::{ChatMessage, MessageType};
use crate::knowledge::{Guide, KnowledgeBase};
use crate::routes::Route;

const HOTEL_SEARCH_URL: &str = "https://www.booking.com/searchresults.html?ss=";

/// Prompts offered before the visitor has typed anything.
pub const QUICK_START_PROMPTS: [&str; 4] = [
    "Where is Rumtek Monastery?",
    "Show me virtual tour",
    "Hotels near Tawang?",
    "Connect me with a guide",
];

/// A button rendered under a bot message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuickAction {
    /// Switch the client to another page.
    Navigate { label: String, route: Route },
    /// Open an external URL in a new tab.
    OpenUrl { label: String, url: String },
    /// Start a phone call.
    Call { label: String, uri: String },
}

impl QuickAction {
    pub fn label(&self) -> &str {
        match self {
            QuickAction::Navigate { label, .. }
            | QuickAction::OpenUrl { label, .. }
            | QuickAction::Call { label, .. } => label,
        }
    }
}

/// Builds the hotel search URL for a location.
pub fn hotel_search_url(location: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(location.as_bytes()).collect();
    format!("{HOTEL_SEARCH_URL}{encoded}")
}

/// Derives the quick actions for a message. User messages and messages
/// without metadata get none.
pub fn quick_actions(message: &ChatMessage) -> Vec<QuickAction> {
    if !message.is_bot() || message.metadata.is_empty() {
        return Vec::new();
    }

    match message.kind {
        MessageType::Location => vec![QuickAction::Navigate {
            label: "View on Map".to_string(),
            route: Route::Map,
        }],
        MessageType::Hotel => {
            let location = message
                .metadata_str("monastery")
                .and_then(|id| KnowledgeBase::global().monastery(id))
                .map(|m| m.name.as_str())
                .unwrap_or("monastery");
            vec![QuickAction::OpenUrl {
                label: "Book Hotels".to_string(),
                url: hotel_search_url(location),
            }]
        }
        MessageType::VirtualTour => vec![QuickAction::Navigate {
            label: "Start Tour".to_string(),
            route: Route::VirtualTour,
        }],
        MessageType::GuideContact => message
            .metadata
            .get("guides")
            .cloned()
            .and_then(|v| serde_json::from_value::<Vec<Guide>>(v).ok())
            .unwrap_or_default()
            .iter()
            .map(|guide| QuickAction::Call {
                label: format!("Call {}", guide.first_name()),
                uri: format!("tel:{}", guide.phone),
            })
            .collect(),
        _ => Vec::new(),
    }
}
