//! Region-code schemes used to place rows on a map.

use serde::Serialize;

/// Two-letter USA state codes plus the District of Columbia.
const USA_STATE_CODES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM",
    "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

/// How location values are matched against map regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LocationMode {
    #[serde(rename = "USA-states")]
    UsaStates,
}

impl LocationMode {
    pub fn recognizes(self, code: &str) -> bool {
        match self {
            LocationMode::UsaStates => USA_STATE_CODES.contains(&code),
        }
    }
}

/// Geographic extent drawn behind the regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoScope {
    Usa,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usa_state_codes() {
        assert!(LocationMode::UsaStates.recognizes("ID"));
        assert!(LocationMode::UsaStates.recognizes("DC"));
        assert!(!LocationMode::UsaStates.recognizes("id"));
        assert!(!LocationMode::UsaStates.recognizes("OT"));
        assert_eq!(
            serde_json::to_value(LocationMode::UsaStates).unwrap(),
            "USA-states"
        );
        assert_eq!(serde_json::to_value(GeoScope::Usa).unwrap(), "usa");
    }
}
