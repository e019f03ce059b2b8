//! Column names and enumerated domains of the bee survey dataset.

use polars::prelude::DataType;

pub const STATE: &str = "State";
pub const ANSI: &str = "ANSI";
pub const YEAR: &str = "Year";
pub const STATE_CODE: &str = "state_code";
pub const AFFECTED_BY: &str = "Affected by";
pub const PERIOD: &str = "Period";
pub const PCT_IMPACTED: &str = "Pct of Colonies Impacted";

/// Columns every dataset must carry, with the type they are coerced to.
pub const REQUIRED: [(&str, DataType); 7] = [
    (STATE, DataType::String),
    (ANSI, DataType::Int64),
    (YEAR, DataType::Int64),
    (STATE_CODE, DataType::String),
    (AFFECTED_BY, DataType::String),
    (PERIOD, DataType::String),
    (PCT_IMPACTED, DataType::Float64),
];

/// Cause of colony loss, spelled as in the survey data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stressor {
    Disease,
    Other,
    Pesticides,
    PestsExclVarroa,
    Unknown,
    VarroaMites,
}

impl Stressor {
    pub const ALL: [Stressor; 6] = [
        Stressor::Disease,
        Stressor::Other,
        Stressor::Pesticides,
        Stressor::PestsExclVarroa,
        Stressor::Unknown,
        Stressor::VarroaMites,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stressor::Disease => "Disease",
            Stressor::Other => "Other",
            Stressor::Pesticides => "Pesticides",
            Stressor::PestsExclVarroa => "Pests_excl_Varroa",
            Stressor::Unknown => "Unknown",
            Stressor::VarroaMites => "Varroa_mites",
        }
    }
}

/// Calendar-quarter bucket of a survey observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    JanMar,
    AprJun,
    JulSep,
    OctDec,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::JanMar, Period::AprJun, Period::JulSep, Period::OctDec];

    /// Value as stored in the `Period` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Period::JanMar => "JAN THRU MAR",
            Period::AprJun => "APR THRU JUN",
            Period::JulSep => "JUL THRU SEP",
            Period::OctDec => "OCT THRU DEC",
        }
    }

    /// Short label shown in selectors.
    pub fn label(self) -> &'static str {
        match self {
            Period::JanMar => "Jan-Mar",
            Period::AprJun => "Apr-Jun",
            Period::JulSep => "Jul-Sep",
            Period::OctDec => "Oct-Dec",
        }
    }
}
