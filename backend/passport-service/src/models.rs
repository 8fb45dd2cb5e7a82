use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The section of the passport document this service reasons about.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralInformation {
    pub battery_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

/// Passport document payload.
///
/// Only `generalInformation` is typed; the remaining sections (materials,
/// carbon footprint, compliance, ...) pass through untouched. Schema
/// validation of those sections is owned by the document pipeline, not by
/// this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportData {
    pub general_information: GeneralInformation,
    #[serde(flatten)]
    pub sections: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryPassport {
    pub id: Uuid,
    pub data: PassportData,
    pub created_by: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BatteryPassport {
    pub fn new(data: PassportData, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            data,
            created_by,
            updated_by: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn battery_identifier(&self) -> &str {
        &self.data.general_information.battery_identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_sections_pass_through() {
        let data: PassportData = serde_json::from_value(json!({
            "generalInformation": {
                "batteryIdentifier": "BATT-001",
                "batteryCategory": "EV",
            },
            "materials": {"cathode": "NMC811"},
        }))
        .unwrap();

        assert_eq!(data.general_information.battery_identifier, "BATT-001");
        assert_eq!(data.sections["materials"]["cathode"], "NMC811");

        let round = serde_json::to_value(&data).unwrap();
        assert_eq!(round["materials"]["cathode"], "NMC811");
        assert_eq!(round["generalInformation"]["batteryCategory"], "EV");
    }
}
