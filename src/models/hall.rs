//! Office, hall, session master and entity models

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::HallCategory;
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// Legal entity that offices belong to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    pub entity_code: String,
    pub entity_name: String,
    #[serde(default)]
    pub location: String,
}

// ---------------------------------------------------------------------------
// Office
// ---------------------------------------------------------------------------

/// A physical office
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Office {
    pub id: i64,
    pub office_code: String,
    pub office_name: String,
    #[serde(default)]
    pub office_tag: String,
    #[serde(default)]
    pub office_street: String,
    #[serde(default)]
    pub office_area: String,
    #[serde(default)]
    pub office_city: String,
    #[serde(default)]
    pub office_state: String,
    #[serde(default)]
    pub office_country: String,
    #[serde(default)]
    pub office_pin_code: String,
    /// Admin code of the office contact
    pub office_spoc: Option<String>,
    #[serde(default)]
    pub entities: Vec<i64>,
}

/// Create office request
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct CreateOffice {
    #[validate(length(min = 1, message = "Office code is required"))]
    pub office_code: String,
    #[validate(length(min = 1, message = "Office name is required"))]
    pub office_name: String,
    pub office_tag: String,
    pub office_street: String,
    pub office_area: String,
    pub office_city: String,
    pub office_state: String,
    pub office_country: String,
    pub office_pin_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_spoc: Option<String>,
    pub entities: Vec<i64>,
}

/// Partial office update
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateOffice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_spoc: Option<String>,
}

// ---------------------------------------------------------------------------
// Hall
// ---------------------------------------------------------------------------

/// Amenity flags carried by a hall
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HallAmenities {
    pub wifi: bool,
    pub tv: bool,
    pub whiteboard: bool,
    pub speaker: bool,
    pub mic: bool,
    pub extension_power_box: bool,
    pub stationaries: bool,
    pub chairs_tables: bool,
}

impl HallAmenities {
    /// Wire names, in backend field order
    pub const NAMES: [&'static str; 8] = [
        "wifi",
        "tv",
        "whiteboard",
        "speaker",
        "mic",
        "extension_power_box",
        "stationaries",
        "chairs_tables",
    ];

    /// Flags from wire names such as `wifi` or `chairs_tables`
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> AppResult<Self> {
        let mut amenities = Self::default();
        for name in names {
            let flag = match name.trim().to_ascii_lowercase().as_str() {
                "wifi" => &mut amenities.wifi,
                "tv" => &mut amenities.tv,
                "whiteboard" => &mut amenities.whiteboard,
                "speaker" => &mut amenities.speaker,
                "mic" => &mut amenities.mic,
                "extension_power_box" => &mut amenities.extension_power_box,
                "stationaries" => &mut amenities.stationaries,
                "chairs_tables" => &mut amenities.chairs_tables,
                _ => {
                    return Err(AppError::Validation(format!(
                        "Unknown amenity '{}', expected one of {}",
                        name.trim(),
                        Self::NAMES.join(", ")
                    )))
                }
            };
            *flag = true;
        }
        Ok(amenities)
    }

    /// Names of the amenities that are present
    pub fn present(&self) -> Vec<&'static str> {
        [
            (self.wifi, "WiFi"),
            (self.tv, "TV"),
            (self.whiteboard, "Whiteboard"),
            (self.speaker, "Speaker"),
            (self.mic, "Mic"),
            (self.extension_power_box, "Extension power box"),
            (self.stationaries, "Stationaries"),
            (self.chairs_tables, "Chairs & tables"),
        ]
        .into_iter()
        .filter_map(|(has, name)| has.then_some(name))
        .collect()
    }
}

/// A bookable hall
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hall {
    pub id: i64,
    /// Owning office ID
    pub office: Option<i64>,
    pub office_name: Option<String>,
    pub hall_code: String,
    pub hall_name: String,
    pub about: Option<String>,
    /// Image URL, displayed only
    pub image: Option<String>,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub category: HallCategory,
    /// Frozen halls are hidden from booking
    #[serde(default)]
    pub is_freeze: bool,
    #[serde(flatten)]
    pub amenities: HallAmenities,
}

/// Create hall request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateHall {
    pub office: i64,
    #[validate(length(min = 1, message = "Hall code is required"))]
    pub hall_code: String,
    #[validate(length(min = 1, message = "Hall name is required"))]
    pub hall_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: u32,
    pub category: HallCategory,
    #[serde(flatten)]
    pub amenities: HallAmenities,
}

/// Partial hall update
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateHall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hall_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<HallCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_freeze: Option<bool>,
}

/// One entry of `/hall-categories/`, sent either as a bare value or as a
/// `[value, label]` pair
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CategoryChoice {
    Pair(String, String),
    Value(String),
}

impl CategoryChoice {
    pub fn value(&self) -> &str {
        match self {
            CategoryChoice::Pair(value, _) | CategoryChoice::Value(value) => value,
        }
    }

    /// Display label; bare values fall back to the known category name
    pub fn label(&self) -> String {
        match self {
            CategoryChoice::Pair(_, label) => label.clone(),
            CategoryChoice::Value(value) => value
                .parse::<HallCategory>()
                .map(|category| category.to_string())
                .unwrap_or_else(|_| value.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionMaster
// ---------------------------------------------------------------------------

/// Meeting session type, with up to three preferred halls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMaster {
    pub id: i64,
    pub session_code: String,
    pub session_type: String,
    pub hall: Option<i64>,
    pub preferred_hall_1: Option<i64>,
    pub preferred_hall_2: Option<i64>,
    pub preferred_hall_3: Option<i64>,
}

impl SessionMaster {
    pub fn preferred_halls(&self) -> [Option<i64>; 3] {
        [self.preferred_hall_1, self.preferred_hall_2, self.preferred_hall_3]
    }
}

/// Create session master request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateSessionMaster {
    #[validate(length(min = 1, message = "Session code is required"))]
    pub session_code: String,
    #[validate(length(min = 1, message = "Session type is required"))]
    pub session_type: String,
}

/// Partial session master update.
///
/// Preferred halls are written as explicit `null` when cleared, so they are
/// nested options: `None` leaves the field alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateSessionMaster {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_hall_1: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_hall_2: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_hall_3: Option<Option<i64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hall_decodes_flattened_amenities() {
        let json = r#"{
            "id": 7, "office": 2, "office_name": "Chennai", "hall_code": "H7",
            "hall_name": "Board Room", "about": null, "image": null,
            "capacity": 12, "category": "ROOM", "is_freeze": false,
            "wifi": true, "tv": true, "whiteboard": false, "speaker": false,
            "mic": false, "extension_power_box": false, "stationaries": false,
            "chairs_tables": true, "day_spoc": null
        }"#;
        let hall: Hall = serde_json::from_str(json).unwrap();
        assert_eq!(hall.category, HallCategory::Room);
        assert_eq!(hall.amenities.present(), vec!["WiFi", "TV", "Chairs & tables"]);
    }

    #[test]
    fn test_amenities_from_names() {
        let amenities = HallAmenities::from_names(["wifi", " Chairs_Tables"]).unwrap();
        assert!(amenities.wifi && amenities.chairs_tables);
        assert!(!amenities.tv);
        assert!(HallAmenities::from_names(["jacuzzi"]).is_err());
        assert_eq!(HallAmenities::from_names([]).unwrap(), HallAmenities::default());
    }

    #[test]
    fn test_clearing_preferred_hall_sends_null() {
        let update = UpdateSessionMaster {
            preferred_hall_2: Some(None),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"preferred_hall_2":null}"#);
    }

    #[test]
    fn test_category_choice_pairs() {
        let choices: Vec<CategoryChoice> =
            serde_json::from_str(r#"[["CABIN","Cabin"],["CSUITE","CSuite"]]"#).unwrap();
        assert_eq!(choices[1].value(), "CSUITE");
        assert_eq!(choices[1].label(), "CSuite");

        let bare: Vec<CategoryChoice> = serde_json::from_str(r#"["ROOM","LOUNGE"]"#).unwrap();
        assert_eq!(bare[0].label(), "Room");
        assert_eq!(bare[1].label(), "LOUNGE");
    }
}
