//! Regex-based intent detection.
//!
//! Pattern groups are tested in a fixed order and the first match wins.
//! Several groups overlap (e.g. "find a guide" hits `location` before
//! `guide`); the order is part of the observable behaviour.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use strum::Display;

use super::context::ConversationContext;
use super::message::MessageType;

/// The purpose inferred from a visitor's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    /// "yes"/"sure" in reply to a pending offer.
    Affirmative,
    Location,
    Hotel,
    VirtualTour,
    Guide,
    VisitingInfo,
    Etiquette,
    Itinerary,
    RumtekInfo,
    TawangInfo,
    General,
}

impl Intent {
    /// The reply type a pattern-group intent declares.
    ///
    /// The actual reply may still be `Text` when the question lacks the
    /// detail needed for a structured answer (e.g. "hotels?" without a
    /// monastery).
    pub fn declared_type(self) -> MessageType {
        match self {
            Intent::Location => MessageType::Location,
            Intent::Hotel => MessageType::Hotel,
            Intent::VirtualTour => MessageType::VirtualTour,
            Intent::Guide => MessageType::GuideContact,
            Intent::VisitingInfo => MessageType::VisitingInfo,
            Intent::Etiquette => MessageType::Etiquette,
            Intent::Itinerary => MessageType::Itinerary,
            Intent::Affirmative | Intent::RumtekInfo | Intent::TawangInfo | Intent::General => {
                MessageType::Text
            }
        }
    }
}

fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

static AFFIRMATIVE: Lazy<Regex> = Lazy::new(|| ci("yes|sure|okay|please|go ahead"));
static RUMTEK: Lazy<Regex> = Lazy::new(|| ci("rumtek"));
static TAWANG: Lazy<Regex> = Lazy::new(|| ci("tawang"));

/// Ordered pattern groups. Do not reorder.
static PATTERN_GROUPS: Lazy<Vec<(Intent, Vec<Regex>)>> = Lazy::new(|| {
    let group = |intent: Intent, patterns: &[&str]| {
        (intent, patterns.iter().map(|p| ci(p)).collect::<Vec<_>>())
    };
    vec![
        group(
            Intent::Location,
            &[
                "where is|location of|find|directions to",
                "how to reach|how to get to",
                "address|coordinates",
            ],
        ),
        group(
            Intent::Hotel,
            &[
                "hotel|accommodation|stay|lodge|guest house",
                "where to stay|place to stay",
                "booking|reservation",
            ],
        ),
        group(
            Intent::VirtualTour,
            &[
                "virtual tour|360|video tour|online tour",
                "watch|view|see online",
                "virtual visit|virtual experience",
            ],
        ),
        group(
            Intent::Guide,
            &[
                "guide|local guide|tour guide",
                "contact guide|speak to guide",
                "guide number|guide contact",
            ],
        ),
        group(
            Intent::VisitingInfo,
            &[
                "visiting hours|opening hours|timings",
                "entry fee|ticket price|cost",
                "best time to visit|when to visit",
            ],
        ),
        group(
            Intent::Etiquette,
            &[
                "etiquette|rules|guidelines",
                "what to wear|dress code",
                "do and don't|dos and don'ts",
            ],
        ),
        group(
            Intent::Itinerary,
            &[
                "plan|itinerary|schedule|day plan|trip plan",
                "2 day|3 day|two day|three day",
            ],
        ),
    ]
});

/// Detects the intent of `message`, taking the conversation context into
/// account for affirmative answers.
pub fn detect_intent(message: &str, context: Option<&ConversationContext>) -> Intent {
    let lower = message.to_lowercase();

    if context.is_some_and(ConversationContext::awaits_confirmation) && AFFIRMATIVE.is_match(&lower)
    {
        return Intent::Affirmative;
    }

    if let Some((intent, _)) = PATTERN_GROUPS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| p.is_match(&lower)))
    {
        return *intent;
    }

    if RUMTEK.is_match(&lower) {
        Intent::RumtekInfo
    } else if TAWANG.is_match(&lower) {
        Intent::TawangInfo
    } else {
        Intent::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::ChatMessage;

    #[test]
    fn test_each_group_detected() {
        let cases = [
            ("Where is Rumtek Monastery?", Intent::Location),
            ("Hotels near Tawang?", Intent::Hotel),
            ("Show me virtual tour", Intent::VirtualTour),
            ("Connect me with a guide", Intent::Guide),
            ("What are the opening hours?", Intent::VisitingInfo),
            ("Any dress code?", Intent::Etiquette),
            ("Make me a 3 day itinerary", Intent::Itinerary),
            ("Tell me about rumtek", Intent::RumtekInfo),
            ("tawang!", Intent::TawangInfo),
            ("hello there", Intent::General),
        ];
        for (input, expected) in cases {
            assert_eq!(detect_intent(input, None), expected, "input: {input}");
        }
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        // "find" is a location pattern and is tested before "guide".
        assert_eq!(detect_intent("find a guide", None), Intent::Location);
        // "stay" (hotel) precedes "plan" (itinerary).
        assert_eq!(detect_intent("plan my stay", None), Intent::Hotel);
        // "360" (virtual tour) precedes "guide".
        assert_eq!(detect_intent("360 guide", None), Intent::VirtualTour);
    }

    #[test]
    fn test_affirmative_requires_context() {
        assert_eq!(detect_intent("yes", None), Intent::General);

        let history = vec![ChatMessage::bot_text(
            "Would you like me to show you on the map?",
        )];
        let ctx = ConversationContext::analyze(&history, "yes");
        assert_eq!(detect_intent("yes", Some(&ctx)), Intent::Affirmative);

        let quiet = ConversationContext::analyze(&[ChatMessage::bot_text("ok")], "yes");
        assert_eq!(detect_intent("yes", Some(&quiet)), Intent::General);
    }

    #[test]
    fn test_bot_offer_opens_affirmative_without_monastery_topic() {
        // Hotel topic only: no monastery in the window, but the bot asked.
        let offered = vec![
            ChatMessage::user("any hotels?"),
            ChatMessage::bot_text("Would you like me to share booking links?"),
        ];
        let ctx = ConversationContext::analyze(&offered, "sure");
        assert!(!ctx.mentions_monastery());
        assert_eq!(detect_intent("sure", Some(&ctx)), Intent::Affirmative);

        // Monastery topic without an offer still opens the gate.
        let topic = vec![ChatMessage::user("tell me about tawang"), ChatMessage::bot_text("Tawang is old.")];
        let ctx = ConversationContext::analyze(&topic, "yes");
        assert!(!ctx.offers_follow_up());
        assert_eq!(detect_intent("yes", Some(&ctx)), Intent::Affirmative);

        // A later bot message without the question closes it again.
        let superseded = vec![
            ChatMessage::bot_text("Would you like a map?"),
            ChatMessage::user("hotels?"),
            ChatMessage::bot_text("Here are some hotels."),
        ];
        let ctx = ConversationContext::analyze(&superseded, "yes please");
        assert_eq!(detect_intent("yes please", Some(&ctx)), Intent::General);
    }

    #[test]
    fn test_declared_types() {
        assert_eq!(Intent::Guide.declared_type(), MessageType::GuideContact);
        assert_eq!(Intent::General.declared_type(), MessageType::Text);
    }
}
