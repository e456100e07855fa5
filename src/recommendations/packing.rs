//! Rule-based packing list for a recommended destination.
//!
//! Items come from fixed rules over the destination's climate and
//! category keywords. Checked items are tracked locally and never stored.

use std::collections::HashSet;

use tripsync_client::types::Destination;

pub const DOCUMENTS: &str = "Documents";
pub const CLOTHING: &str = "Clothing";
pub const HEALTH: &str = "Health & Hygiene";
pub const ELECTRONICS: &str = "Electronics";
pub const ACTIVITY_GEAR: &str = "Activity Gear";
pub const MISCELLANEOUS: &str = "Miscellaneous";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackingItem {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub essential: bool,
}

const fn item(id: &'static str, name: &'static str, category: &'static str, essential: bool) -> PackingItem {
    PackingItem {
        id,
        name,
        category,
        essential,
    }
}

const DOCUMENT_ITEMS: &[PackingItem] = &[
    item("passport", "Passport", DOCUMENTS, true),
    item("visa", "Visa (if required)", DOCUMENTS, true),
    item("tickets", "Flight/Train Tickets", DOCUMENTS, true),
    item("insurance", "Travel Insurance", DOCUMENTS, true),
    item("hotel", "Hotel Confirmations", DOCUMENTS, false),
    item("id", "Photo ID", DOCUMENTS, true),
];

const COLD_CLOTHING: &[PackingItem] = &[
    item("jacket", "Winter Jacket", CLOTHING, true),
    item("sweater", "Sweaters/Hoodies", CLOTHING, true),
    item("thermals", "Thermal Underwear", CLOTHING, true),
    item("gloves", "Gloves", CLOTHING, false),
    item("scarf", "Scarf", CLOTHING, false),
];

const HOT_CLOTHING: &[PackingItem] = &[
    item("shorts", "Shorts", CLOTHING, true),
    item("tshirts", "Light T-shirts", CLOTHING, true),
    item("swimwear", "Swimwear", CLOTHING, true),
    item("sunhat", "Sun Hat", CLOTHING, true),
    item("sandals", "Sandals/Flip-flops", CLOTHING, false),
];

const MILD_CLOTHING: &[PackingItem] = &[
    item("jeans", "Jeans/Pants", CLOTHING, true),
    item("shirts", "Casual Shirts", CLOTHING, true),
    item("jacket-light", "Light Jacket", CLOTHING, true),
];

const BASICS: &[PackingItem] = &[
    item("underwear", "Underwear", CLOTHING, true),
    item("socks", "Socks", CLOTHING, true),
    item("shoes", "Comfortable Walking Shoes", CLOTHING, true),
    item("sleepwear", "Sleepwear", CLOTHING, true),
    item("toothbrush", "Toothbrush & Toothpaste", HEALTH, true),
    item("medications", "Prescription Medications", HEALTH, true),
    item("firstaid", "First Aid Kit", HEALTH, true),
    item("sunscreen", "Sunscreen", HEALTH, true),
    item("sanitizer", "Hand Sanitizer", HEALTH, true),
    item("toiletries", "Toiletries", HEALTH, true),
    item("phone", "Phone & Charger", ELECTRONICS, true),
    item("adapter", "Universal Power Adapter", ELECTRONICS, true),
    item("powerbank", "Power Bank", ELECTRONICS, false),
    item("camera", "Camera", ELECTRONICS, false),
    item("headphones", "Headphones", ELECTRONICS, false),
];

const OUTDOOR_GEAR: &[PackingItem] = &[
    item("backpack", "Hiking Backpack", ACTIVITY_GEAR, true),
    item("waterbottle", "Reusable Water Bottle", ACTIVITY_GEAR, true),
    item("flashlight", "Flashlight/Headlamp", ACTIVITY_GEAR, false),
];

const BEACH_GEAR: &[PackingItem] = &[
    item("snorkel", "Snorkeling Gear", ACTIVITY_GEAR, false),
    item("beachtowel", "Beach Towel", ACTIVITY_GEAR, true),
    item("sunglasses", "Sunglasses", ACTIVITY_GEAR, true),
];

const MISC_ITEMS: &[PackingItem] = &[
    item("money", "Cash & Credit Cards", MISCELLANEOUS, true),
    item("guidebook", "Travel Guidebook/Maps", MISCELLANEOUS, false),
    item("notebook", "Notebook & Pen", MISCELLANEOUS, false),
    item("bags", "Reusable Shopping Bags", MISCELLANEOUS, false),
];

fn mentions(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|w| haystack.contains(w))
}

/// Items to pack for a climate description and destination category.
pub fn packing_items(climate: &str, category: &str) -> Vec<PackingItem> {
    let climate = climate.to_lowercase();
    let category = category.to_lowercase();

    let clothing = if mentions(&climate, &["cold", "winter", "snow"]) {
        COLD_CLOTHING
    } else if mentions(&climate, &["hot", "tropical", "beach"]) {
        HOT_CLOTHING
    } else {
        MILD_CLOTHING
    };

    let mut items: Vec<PackingItem> = Vec::new();
    items.extend_from_slice(DOCUMENT_ITEMS);
    items.extend_from_slice(clothing);
    items.extend_from_slice(BASICS);
    if mentions(&category, &["adventure", "nature"]) {
        items.extend_from_slice(OUTDOOR_GEAR);
    }
    if category.contains("beach") || climate.contains("tropical") {
        items.extend_from_slice(BEACH_GEAR);
    }
    items.extend_from_slice(MISC_ITEMS);
    items
}

/// A generated list plus what has been packed so far.
#[derive(Debug, Clone)]
pub struct PackingList {
    pub destination: String,
    items: Vec<PackingItem>,
    checked: HashSet<&'static str>,
}

impl PackingList {
    pub fn for_destination(destination: &Destination) -> Self {
        Self {
            destination: destination.name.clone(),
            items: packing_items(&destination.weather.climate, &destination.category),
            checked: HashSet::new(),
        }
    }

    pub fn items(&self) -> &[PackingItem] {
        &self.items
    }

    /// Flip an item's packed state. Returns the new state; unknown ids are
    /// ignored and report `false`.
    pub fn toggle(&mut self, id: &str) -> bool {
        let Some(item) = self.items.iter().find(|i| i.id == id) else {
            return false;
        };
        if self.checked.remove(item.id) {
            false
        } else {
            self.checked.insert(item.id);
            true
        }
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.checked.contains(id)
    }

    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    /// Packed share as a whole percentage.
    pub fn progress(&self) -> u32 {
        if self.items.is_empty() {
            return 0;
        }
        (self.checked.len() as f64 / self.items.len() as f64 * 100.0).round() as u32
    }

    pub fn is_complete(&self) -> bool {
        !self.items.is_empty() && self.checked.len() == self.items.len()
    }

    /// Categories in first-seen order.
    pub fn categories(&self) -> Vec<&'static str> {
        let mut seen = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.category) {
                seen.push(item.category);
            }
        }
        seen
    }

    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a PackingItem> {
        self.items.iter().filter(move |i| i.category == category)
    }

    pub fn essential_count(&self, category: &str) -> usize {
        self.in_category(category).filter(|i| i.essential).count()
    }

    /// Plain-text export, one block per category.
    pub fn to_text(&self) -> String {
        self.categories()
            .into_iter()
            .map(|category| {
                let lines: Vec<String> = self
                    .in_category(category)
                    .map(|i| format!("- {}", i.name))
                    .collect();
                format!("{category}:\n{}", lines.join("\n"))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn file_name(&self) -> String {
        format!("{}-packing-list.txt", self.destination)
    }
}
