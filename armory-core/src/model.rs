//! Catalog and inventory record types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest upgrade tier an armor can reach (0 = base, 1-4 = starred).
pub const MAX_LEVEL: u8 = 4;

/// The game's fixed dye palette. `Base` is the undyed state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DyeColor {
    Base,
    Blue,
    Red,
    Yellow,
    White,
    Black,
    Purple,
    Green,
    #[serde(rename = "Light Blue")]
    LightBlue,
    Navy,
    Orange,
    Peach,
    Crimson,
    #[serde(rename = "Light Yellow")]
    LightYellow,
    Brown,
    Gray,
}

impl DyeColor {
    pub const ALL: [DyeColor; 16] = [
        DyeColor::Base,
        DyeColor::Blue,
        DyeColor::Red,
        DyeColor::Yellow,
        DyeColor::White,
        DyeColor::Black,
        DyeColor::Purple,
        DyeColor::Green,
        DyeColor::LightBlue,
        DyeColor::Navy,
        DyeColor::Orange,
        DyeColor::Peach,
        DyeColor::Crimson,
        DyeColor::LightYellow,
        DyeColor::Brown,
        DyeColor::Gray,
    ];

    /// Canonical display name. Also used verbatim in icon file names
    /// (`{actorName}_{color}.avif`), spaces included.
    pub fn name(self) -> &'static str {
        match self {
            DyeColor::Base => "Base",
            DyeColor::Blue => "Blue",
            DyeColor::Red => "Red",
            DyeColor::Yellow => "Yellow",
            DyeColor::White => "White",
            DyeColor::Black => "Black",
            DyeColor::Purple => "Purple",
            DyeColor::Green => "Green",
            DyeColor::LightBlue => "Light Blue",
            DyeColor::Navy => "Navy",
            DyeColor::Orange => "Orange",
            DyeColor::Peach => "Peach",
            DyeColor::Crimson => "Crimson",
            DyeColor::LightYellow => "Light Yellow",
            DyeColor::Brown => "Brown",
            DyeColor::Gray => "Gray",
        }
    }
}

impl fmt::Display for DyeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DyeColor {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DyeColor::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// Body slot an armor occupies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Head,
    Upper,
    Lower,
    All,
}

impl Slot {
    pub fn name(self) -> &'static str {
        match self {
            Slot::Head => "head",
            Slot::Upper => "upper",
            Slot::Lower => "lower",
            Slot::All => "all",
        }
    }
}

impl FromStr for Slot {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "head" => Ok(Slot::Head),
            "upper" => Ok(Slot::Upper),
            "lower" => Ok(Slot::Lower),
            "all" => Ok(Slot::All),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}

/// Failed lookup of an enumerated name (dye color, slot).
#[derive(Debug, Clone, Error)]
#[error("unknown name: {0}")]
pub struct UnknownName(pub String);

/// One (material, quantity) entry of an upgrade recipe tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeIngredient {
    pub material: String,
    pub quantity: u32,
}

/// Sort keys precomputed by the extractor so clients sort without
/// re-deriving collation rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorSortKeys {
    pub name: String,
    pub body_part: String,
    pub set: String,
}

/// A single armor piece from the static catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Armor {
    pub actor_name: String,
    pub belonging_set: Option<String>,
    pub buy_price_poes: Option<u32>,
    pub buy_price_rupees: Option<u32>,
    pub colors: Vec<DyeColor>,
    /// Defense per upgrade tier, index 0 = base. Length 1-5.
    pub defenses: Vec<u32>,
    pub en_name: String,
    pub has_upgrades: bool,
    pub icon_urls: BTreeMap<DyeColor, String>,
    /// Selling price per upgrade tier, index 0 = base. Length 1-5.
    pub selling_prices: Vec<u32>,
    pub set_en_name: Option<String>,
    pub slot: Slot,
    pub sort_keys: ArmorSortKeys,
    /// One ingredient list per star tier (index 0 = tier 1). Up to 4
    /// tiers; trailing tiers may be absent when the source data stops
    /// early. `None` when the armor cannot be upgraded.
    pub upgrades: Option<Vec<Vec<UpgradeIngredient>>>,
}

impl Armor {
    /// Upgrade recipes, empty when the armor has none.
    pub fn upgrade_recipes(&self) -> &[Vec<UpgradeIngredient>] {
        self.upgrades.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialSortKeys {
    #[serde(rename = "type")]
    pub type_key: String,
    pub name: String,
}

/// A crafting material from the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub actor_name: String,
    pub icon_url: String,
    pub name: String,
    pub sort_keys: MaterialSortKeys,
}

/// Per-user record of one owned armor: current upgrade level and dye.
///
/// This is the only mutable state in the system. It is always *written*
/// in this structured form; see [`ArmorFieldValue`] for what readers must
/// accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorField {
    pub level: u8,
    pub dye: DyeColor,
}

impl ArmorField {
    /// Parse a stored field value, accepting both encodings.
    pub fn parse(raw: &str) -> Result<ArmorField, FieldError> {
        let value: ArmorFieldValue = serde_json::from_str(raw)?;
        let field = value.into_field();
        field.validate()?;
        Ok(field)
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        if self.level > MAX_LEVEL {
            return Err(FieldError::LevelOutOfRange(self.level));
        }
        Ok(())
    }
}

/// The two historical encodings of an [`ArmorField`].
///
/// Early versions of the store persisted a bare integer (the upgrade
/// level); later versions persist the structured object. Readers try the
/// structured form first and fall back to the legacy one, which implies
/// the base dye.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArmorFieldValue {
    Field(ArmorField),
    Legacy(u8),
}

impl ArmorFieldValue {
    pub fn into_field(self) -> ArmorField {
        match self {
            ArmorFieldValue::Field(field) => field,
            ArmorFieldValue::Legacy(level) => ArmorField {
                level,
                dye: DyeColor::Base,
            },
        }
    }
}

/// Errors decoding or validating an inventory field.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("malformed armor field: {0}")]
    Json(#[from] serde_json::Error),

    #[error("upgrade level {0} out of range (0-{MAX_LEVEL})")]
    LevelOutOfRange(u8),
}
