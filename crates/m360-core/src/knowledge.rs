//! Static monastery knowledge base.
//!
//! The chatbot answers from this table, and the mock API serves the
//! directory records. Everything here is read-only and built once.

use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A local guide who can be contacted by phone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guide {
    pub name: String,
    pub phone: String,
    pub experience: String,
}

impl Guide {
    fn new(name: &str, phone: &str, experience: &str) -> Self {
        Self {
            name: name.to_string(),
            phone: phone.to_string(),
            experience: experience.to_string(),
        }
    }

    /// First word of the guide's name, used for button labels.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Visitor-facing facts about one monastery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonasteryKnowledge {
    pub id: String,
    pub name: String,
    pub location: String,
    pub description: String,
    pub coordinates: Coordinates,
    pub visiting_hours: String,
    pub entry_fee: String,
    pub best_time: String,
    pub nearby_hotels: Vec<String>,
    pub guides: Vec<Guide>,
}

/// The whole knowledge table plus the general visiting advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub monasteries: Vec<MonasteryKnowledge>,
    pub visiting_etiquette: Vec<String>,
    pub best_practices: Vec<String>,
}

impl KnowledgeBase {
    /// Returns the shared, lazily built knowledge base.
    pub fn global() -> &'static KnowledgeBase {
        &KNOWLEDGE
    }

    /// Looks a monastery up by id (`rumtek`, `tawang`).
    pub fn monastery(&self, id: &str) -> Option<&MonasteryKnowledge> {
        self.monasteries.iter().find(|m| m.id == id)
    }

    /// Finds the first monastery whose id appears in `text` (lowercased).
    pub fn mentioned_in(&self, text: &str) -> Option<&MonasteryKnowledge> {
        let lower = text.to_lowercase();
        self.monasteries.iter().find(|m| lower.contains(&m.id))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

static KNOWLEDGE: Lazy<KnowledgeBase> = Lazy::new(|| KnowledgeBase {
    monasteries: vec![
        MonasteryKnowledge {
            id: "rumtek".to_string(),
            name: "Rumtek Monastery".to_string(),
            location: "Sikkim, India".to_string(),
            description: "The largest monastery in Sikkim, also known as Dharmachakra Centre"
                .to_string(),
            coordinates: Coordinates {
                lat: 27.2837,
                lng: 88.5635,
            },
            visiting_hours: "6:00 AM - 6:00 PM".to_string(),
            entry_fee: "Free".to_string(),
            best_time: "March to May, September to November".to_string(),
            nearby_hotels: strings(&[
                "Hotel Sikkim Continental - 2km",
                "Summit Norling Resort - 5km",
                "Hotel Golden Heights - 3km",
            ]),
            guides: vec![
                Guide::new("Tenzin Norbu", "+91-9876543210", "10 years"),
                Guide::new("Karma Lama", "+91-9876543211", "8 years"),
            ],
        },
        MonasteryKnowledge {
            id: "tawang".to_string(),
            name: "Tawang Monastery".to_string(),
            location: "Arunachal Pradesh, India".to_string(),
            description: "The largest monastery in India and second largest in the world"
                .to_string(),
            coordinates: Coordinates {
                lat: 27.5862,
                lng: 91.8674,
            },
            visiting_hours: "5:00 AM - 8:00 PM".to_string(),
            entry_fee: "Free".to_string(),
            best_time: "April to October".to_string(),
            nearby_hotels: strings(&[
                "Hotel Tawang Heights - 1km",
                "Dragon Hotel - 2km",
                "Hotel Mon Paradise - 3km",
            ]),
            guides: vec![
                Guide::new("Lobsang Tenzin", "+91-9876543212", "12 years"),
                Guide::new("Sonam Dorjee", "+91-9876543213", "15 years"),
            ],
        },
    ],
    visiting_etiquette: strings(&[
        "Dress modestly and respectfully",
        "Remove shoes before entering prayer halls",
        "Maintain silence in meditation areas",
        "Don't point feet towards Buddha statues",
        "Photography may be restricted in certain areas",
        "Show respect to monks and practitioners",
    ]),
    best_practices: strings(&[
        "Visit early morning for peaceful experience",
        "Bring offerings like khada (white scarf) if appropriate",
        "Learn basic Buddhist greetings",
        "Respect ongoing prayer sessions",
        "Follow guide instructions carefully",
    ]),
});

// ============================================================================
// Directory records served by the mock API
// ============================================================================

/// A monastery entry as returned by `GET /api/monasteries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonasteryRecord {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub coordinates: Coordinates,
    pub description: String,
    pub images: Vec<String>,
    pub established: u16,
}

/// A cultural event as returned by `GET /api/events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: u32,
    pub title: String,
    pub monastery: String,
    pub date: NaiveDate,
    pub description: String,
}

/// The fixed development directory.
pub fn monastery_directory() -> Vec<MonasteryRecord> {
    vec![
        MonasteryRecord {
            id: 1,
            name: "Rumtek Monastery".to_string(),
            location: "Gangtok".to_string(),
            coordinates: Coordinates {
                lat: 27.3023,
                lng: 88.5638,
            },
            description: "One of the largest and most significant monasteries in Sikkim"
                .to_string(),
            images: strings(&["rumtek1.jpg", "rumtek2.jpg"]),
            established: 1740,
        },
        MonasteryRecord {
            id: 2,
            name: "Pemayangtse Monastery".to_string(),
            location: "Pelling".to_string(),
            coordinates: Coordinates {
                lat: 27.3042,
                lng: 88.2521,
            },
            description: "Ancient premier monastery of the Nyingma order".to_string(),
            images: strings(&["pemayangtse1.jpg", "pemayangtse2.jpg"]),
            established: 1705,
        },
    ]
}

/// Upcoming events, dated relative to `today`.
pub fn upcoming_events(today: NaiveDate) -> Vec<EventRecord> {
    let after = |days: u64| today.checked_add_days(Days::new(days)).unwrap_or(today);
    vec![
        EventRecord {
            id: 1,
            title: "Losoong Festival".to_string(),
            monastery: "Rumtek Monastery".to_string(),
            date: after(14),
            description: "Harvest festival with Cham dance".to_string(),
        },
        EventRecord {
            id: 2,
            title: "Buddha Purnima".to_string(),
            monastery: "Enchey Monastery".to_string(),
            date: after(30),
            description: "Celebration of Buddha's birth".to_string(),
        },
    ]
}
