//! Deterministic rule engine.
//!
//! Produces a reply for every input, so it doubles as the fallback whenever
//! the generative backend is unavailable.

use serde_json::{Value, json};
use tracing::debug;

use super::context::ConversationContext;
use super::intent::{Intent, detect_intent};
use super::message::{BotReply, ChatMessage, MessageType, ReplySource};
use crate::knowledge::{KnowledgeBase, MonasteryKnowledge};

/// Phrase the location replies end with; an affirmative answer to it
/// navigates to the map.
pub const MAP_OFFER: &str = "show you on the map";

pub const ACTION_NAVIGATE_TO_MAP: &str = "navigate_to_map";
pub const ACTION_NAVIGATE_TO_TOUR: &str = "navigate_to_tour";

/// Answers chat messages from the static knowledge base.
#[derive(Debug, Clone, Copy)]
pub struct RuleEngine {
    knowledge: &'static KnowledgeBase,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(KnowledgeBase::global())
    }
}

impl RuleEngine {
    pub fn new(knowledge: &'static KnowledgeBase) -> Self {
        Self { knowledge }
    }

    /// Computes the reply for `message` given the prior `history`.
    pub fn respond(&self, message: &str, history: &[ChatMessage]) -> BotReply {
        let context = ConversationContext::analyze(history, message);
        let intent = detect_intent(message, Some(&context));
        debug!(%intent, "rule engine matched intent");

        self.reply_for(intent, message, &context)
            .with_source(ReplySource::Rules)
    }

    fn reply_for(&self, intent: Intent, message: &str, context: &ConversationContext) -> BotReply {
        let mentioned = self.knowledge.mentioned_in(message);
        match intent {
            Intent::Affirmative => affirmative_reply(&context.last_bot_response),
            Intent::Location => match mentioned {
                Some(m) => location_reply(m),
                None => BotReply::text(
                    "📍 I can help you find monastery locations! Which monastery are you interested in?\n\n\
                     🏛️ **Available Options:**\n• Rumtek Monastery (Sikkim)\n• Tawang Monastery (Arunachal Pradesh)\n\n\
                     Just ask about any specific monastery!",
                ),
            },
            Intent::Hotel => match mentioned {
                Some(m) => hotel_reply(m),
                None => BotReply::text(
                    "🏨 I can help you find accommodation near monasteries! Which monastery are you planning to visit?\n\n\
                     🏛️ **Options:**\n• Rumtek Monastery area\n• Tawang Monastery area\n\n\
                     Let me know your preference!",
                ),
            },
            Intent::VirtualTour => BotReply::new(
                MessageType::VirtualTour,
                "🎥 **Virtual Tour Experience**\n\nExplore our immersive 360° monastery tours!\n\n\
                 🌟 **Available Tours:**\n• Interior Monastery Experience\n• Tawang Monastery Journey\n• 360° Outside Views\n\n\
                 🎮 **Features:**\n• Interactive 360° videos\n• Mouse drag navigation\n• Full HD quality\n\n\
                 🚀 Would you like me to take you to the virtual tour page?",
            )
            .with("action", ACTION_NAVIGATE_TO_TOUR),
            Intent::Guide => match mentioned {
                Some(m) => guide_reply(m),
                None => BotReply::text(
                    "👨‍🏫 I can connect you with experienced local guides!\n\n\
                     🏛️ **Which monastery:**\n• Rumtek Monastery guides\n• Tawang Monastery guides\n\n\
                     Our guides offer:\n✅ Cultural insights\n✅ Historical knowledge\n✅ Language assistance\n✅ Photography tips",
                ),
            },
            Intent::VisitingInfo => self.visiting_info_reply(),
            Intent::Etiquette => self.etiquette_reply(),
            Intent::Itinerary => BotReply::new(
                MessageType::Itinerary,
                "🗓️ **Suggested 2-Day Itinerary**\n\n\
                 Day 1: Rumtek Monastery\n• Morning prayers and tour\n• Lunch nearby\n• Evening meditation session\n\n\
                 Day 2: Tawang Insights (Virtual/Planning)\n• History and culture briefing\n• 360° virtual exploration\n• Plan logistics for future visit\n\n\
                 Would you like me to create a custom plan based on your dates?",
            )
            .with("days", 2)
            .with("includes", json!(["rumtek", "virtual_tawang"])),
            Intent::RumtekInfo | Intent::TawangInfo => {
                let id = if intent == Intent::RumtekInfo { "rumtek" } else { "tawang" };
                match self.knowledge.monastery(id) {
                    Some(m) => overview_reply(m),
                    None => capabilities_reply(),
                }
            }
            Intent::General => capabilities_reply(),
        }
    }

    fn visiting_info_reply(&self) -> BotReply {
        let sections: Vec<String> = self
            .knowledge
            .monasteries
            .iter()
            .map(|m| {
                format!(
                    "📅 **{}:**\n🕒 Hours: {}\n💰 Entry: {}\n🌤️ Best time: {}",
                    m.name, m.visiting_hours, m.entry_fee, m.best_time
                )
            })
            .collect();
        BotReply::new(
            MessageType::VisitingInfo,
            format!("⏰ **Visiting Information**\n\n{}", sections.join("\n\n")),
        )
    }

    fn etiquette_reply(&self) -> BotReply {
        let rules = &self.knowledge.visiting_etiquette;
        let split = rules.len().min(3);
        let practices_end = self.knowledge.best_practices.len().min(3);
        BotReply::new(
            MessageType::Etiquette,
            format!(
                "🙏 **Monastery Visiting Etiquette**\n\n👔 **Dress Code:**\n{}\n\n🧘 **Behavioral Guidelines:**\n{}\n\n💡 **Best Practices:**\n{}",
                bullets(&rules[..split]),
                bullets(&rules[split..]),
                bullets(&self.knowledge.best_practices[..practices_end]),
            ),
        )
    }
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("• {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn affirmative_reply(last_bot_response: &str) -> BotReply {
    if last_bot_response.contains(MAP_OFFER) {
        BotReply::new(
            MessageType::Location,
            "🗺️ **Perfect!** I'm taking you to our interactive map where you can explore monastery locations, \
             get directions, and discover nearby attractions.\n\n\
             🎯 **Map Features:**\n• Detailed monastery locations\n• Turn-by-turn directions\n• Nearby amenities\n• Cultural points of interest\n\n\
             Click the \"View on Map\" button or navigate to our Map page!",
        )
        .with("action", ACTION_NAVIGATE_TO_MAP)
    } else if last_bot_response.contains("virtual tour") {
        BotReply::new(
            MessageType::VirtualTour,
            "🎥 **Excellent choice!** Let me guide you to our immersive 360° virtual tour experience.\n\n\
             ✨ **What awaits you:**\n• Interactive 360° monastery exploration\n• High-definition video quality\n• Mouse/touch navigation\n• Multiple viewing angles\n\n\
             Ready to begin your virtual journey?",
        )
        .with("action", ACTION_NAVIGATE_TO_TOUR)
    } else {
        BotReply::text(
            "👍 **Great!** How else can I assist you with your monastery exploration today?\n\n\
             🔍 **I can help with:**\n• Finding specific locations\n• Booking accommodations\n• Connecting with local guides\n• Planning your visit",
        )
    }
}

fn location_reply(m: &MonasteryKnowledge) -> BotReply {
    BotReply::new(
        MessageType::Location,
        format!(
            "📍 **{} Location**\n\n{}\n\n📧 **Address:** {}\n🕒 **Hours:** {}\n\n🗺️ Would you like me to {MAP_OFFER}?",
            m.name, m.description, m.location, m.visiting_hours
        ),
    )
    .with("monastery", m.id.as_str())
    .with("coordinates", json!(m.coordinates))
}

fn hotel_reply(m: &MonasteryKnowledge) -> BotReply {
    BotReply::new(
        MessageType::Hotel,
        format!(
            "🏨 **Hotels near {}**\n\n{}\n\n💡 **Best time to visit:** {}\n\n🎯 Would you like help with booking or more details about any hotel?",
            m.name,
            bullets(&m.nearby_hotels),
            m.best_time
        ),
    )
    .with("monastery", m.id.as_str())
    .with("hotels", json!(m.nearby_hotels))
}

fn guide_reply(m: &MonasteryKnowledge) -> BotReply {
    let guides = m
        .guides
        .iter()
        .map(|g| {
            format!(
                "• **{}**\n  📞 {}\n  📊 Experience: {}",
                g.name, g.phone, g.experience
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    BotReply::new(
        MessageType::GuideContact,
        format!(
            "👨‍🏫 **Local Guides - {}**\n\n{guides}\n\n💬 Would you like me to help you contact a guide?",
            m.name
        ),
    )
    .with("monastery", m.id.as_str())
    .with("guides", json!(m.guides))
}

fn overview_reply(m: &MonasteryKnowledge) -> BotReply {
    BotReply::text(format!(
        "🏛️ **{}**\n\n{}\n\n📍 **Location:** {}\n🕒 **Hours:** {}\n💰 **Entry:** {}\n🌤️ **Best Time:** {}\n\n\
         🎯 **What would you like to know more about?**\n• 🗺️ Location & directions\n• 🏨 Nearby hotels\n• 👨‍🏫 Local guides\n• 🎥 Virtual tour",
        m.name, m.description, m.location, m.visiting_hours, m.entry_fee, m.best_time
    ))
}

fn capabilities_reply() -> BotReply {
    BotReply::text(
        "🤔 I'd love to help you with monastery-related questions! Here's what I can assist with:\n\n\
         🗺️ **Find Locations** - \"Where is Rumtek Monastery?\"\n\
         🏨 **Hotel Recommendations** - \"Hotels near Tawang?\"\n\
         🎥 **Virtual Tours** - \"Show me virtual tour\"\n\
         👨‍🏫 **Local Guides** - \"Connect me with a guide\"\n\
         📅 **Visit Planning** - \"Best time to visit?\"\n\
         🙏 **Etiquette Guide** - \"Monastery rules?\"\n\n\
         ✨ Just ask me anything about monasteries!",
    )
}

/// Extracts `metadata.hotels` as plain strings.
pub fn hotels_of(reply: &BotReply) -> Vec<String> {
    reply
        .metadata
        .get("hotels")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
