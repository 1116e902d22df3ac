//! Reservation line items.

use common::Money;
use serde::{Deserialize, Serialize};

/// Fixed id of the synthetic base price item.
pub const BASE_ITEM_ID: &str = "base";

/// Category of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// The camp's base price. Exactly one exists, always.
    Base,
    Diet,
    Accommodation,
    /// Optional extras. The only category allowed to hold several items.
    Addon,
    Protection,
    Promotion,
    Transport,
    /// Where the customer heard about the camp.
    Source,
    Other,
}

impl ItemType {
    /// All categories, in display order.
    pub const ALL: [ItemType; 9] = [
        ItemType::Base,
        ItemType::Diet,
        ItemType::Accommodation,
        ItemType::Addon,
        ItemType::Protection,
        ItemType::Promotion,
        ItemType::Transport,
        ItemType::Source,
        ItemType::Other,
    ];

    /// Returns true if at most one item of this category may exist at a time.
    ///
    /// Adding a second item of a single-slot category replaces the first.
    pub fn is_single_slot(&self) -> bool {
        !matches!(self, ItemType::Base | ItemType::Addon)
    }

    /// Returns the wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Base => "base",
            ItemType::Diet => "diet",
            ItemType::Accommodation => "accommodation",
            ItemType::Addon => "addon",
            ItemType::Protection => "protection",
            ItemType::Promotion => "promotion",
            ItemType::Transport => "transport",
            ItemType::Source => "source",
            ItemType::Other => "other",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Extra information carried by promotion items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMetadata {
    /// Reference price before the discount, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,

    /// The promotion is informational and does not lower the price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub does_not_reduce_price: Option<bool>,
}

impl ItemMetadata {
    /// Metadata recording the price before a discount.
    pub fn with_original_price(original_price: Money) -> Self {
        Self {
            original_price: Some(original_price),
            does_not_reduce_price: None,
        }
    }

    /// Returns true if the item is flagged as not reducing the price.
    pub fn does_not_reduce_price(&self) -> bool {
        self.does_not_reduce_price.unwrap_or(false)
    }
}

/// One priced component of a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationItem {
    pub id: String,
    pub name: String,

    /// Signed amount added to the total.
    pub price: Money,

    #[serde(rename = "type")]
    pub item_type: ItemType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ItemMetadata>,
}

impl ReservationItem {
    /// Creates the base price item.
    pub fn base(price: Money) -> Self {
        Self {
            id: BASE_ITEM_ID.to_string(),
            name: "Cena podstawowa".to_string(),
            price,
            item_type: ItemType::Base,
            metadata: None,
        }
    }

    /// Builds an item from its id-less form.
    pub fn from_new(id: impl Into<String>, item: NewItem) -> Self {
        Self {
            id: id.into(),
            name: item.name,
            price: item.price,
            item_type: item.item_type,
            metadata: item.metadata,
        }
    }

    pub fn is_base(&self) -> bool {
        self.item_type == ItemType::Base
    }

    /// Applies a shallow patch. Returns true if anything changed.
    pub fn apply(&mut self, patch: ItemPatch) -> bool {
        let before = self.clone();
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(metadata) = patch.metadata {
            self.metadata = metadata;
        }
        *self != before
    }
}

/// A line item before the store assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub price: Money,
    pub item_type: ItemType,
    pub metadata: Option<ItemMetadata>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, price: Money, item_type: ItemType) -> Self {
        Self {
            name: name.into(),
            price,
            item_type,
            metadata: None,
        }
    }

    /// A promotion lowering the total by `discount`, remembering the price it was applied to.
    pub fn promotion(name: impl Into<String>, discount: Money, original_price: Money) -> Self {
        Self::new(name, -discount, ItemType::Promotion)
            .with_metadata(ItemMetadata::with_original_price(original_price))
    }

    pub fn with_metadata(mut self, metadata: ItemMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Returns the id the store derives for this item when the caller gives none.
    ///
    /// Single-slot categories use the category name; addons use a slug of their name.
    pub(crate) fn derived_id(&self) -> String {
        match self.item_type {
            ItemType::Base => BASE_ITEM_ID.to_string(),
            ItemType::Addon => format!("addon-{}", slugify(&self.name)),
            other => other.as_str().to_string(),
        }
    }
}

/// Partial update for an existing item.
///
/// The id and category of an item are its identity and can't be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub price: Option<Money>,
    /// `Some(None)` clears the metadata.
    pub metadata: Option<Option<ItemMetadata>>,
}

impl ItemPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    pub fn metadata(mut self, metadata: ItemMetadata) -> Self {
        self.metadata = Some(Some(metadata));
        self
    }

    pub fn clear_metadata(mut self) -> Self {
        self.metadata = Some(None);
        self
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("item");
    }
    slug
}
