use serde::Serialize;
use std::fmt;

/// Region slugs understood by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Na,
    Euw,
    Eune,
    Kr,
    Jp,
    Br,
    Lan,
    Las,
    Oce,
    Ru,
    Tr,
    Sg,
    Ph,
    Tw,
    Vn,
    Th,
}

impl Region {
    pub const ALL: [Region; 16] = [
        Region::Na,
        Region::Euw,
        Region::Eune,
        Region::Kr,
        Region::Jp,
        Region::Br,
        Region::Lan,
        Region::Las,
        Region::Oce,
        Region::Ru,
        Region::Tr,
        Region::Sg,
        Region::Ph,
        Region::Tw,
        Region::Vn,
        Region::Th,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Region::Na => "na",
            Region::Euw => "euw",
            Region::Eune => "eune",
            Region::Kr => "kr",
            Region::Jp => "jp",
            Region::Br => "br",
            Region::Lan => "lan",
            Region::Las => "las",
            Region::Oce => "oce",
            Region::Ru => "ru",
            Region::Tr => "tr",
            Region::Sg => "sg",
            Region::Ph => "ph",
            Region::Tw => "tw",
            Region::Vn => "vn",
            Region::Th => "th",
        }
    }

    /// Maps a slug, Riot platform id (`euw1`, `la2`, ...) or LCU web region
    /// onto the closed slug set. Unknown input falls back to `na`.
    pub fn normalize(input: &str) -> Region {
        let lowered = input.trim().to_lowercase();
        if let Some(region) = Region::ALL.iter().find(|r| r.slug() == lowered) {
            return *region;
        }

        match lowered.as_str() {
            "na1" => Region::Na,
            "euw1" => Region::Euw,
            "eun1" => Region::Eune,
            "jp1" => Region::Jp,
            "br1" => Region::Br,
            "la1" => Region::Lan,
            "la2" => Region::Las,
            "oc1" => Region::Oce,
            "tr1" => Region::Tr,
            "sg2" => Region::Sg,
            "ph2" => Region::Ph,
            "tw2" => Region::Tw,
            "vn2" => Region::Vn,
            "th2" => Region::Th,
            _ => Region::Na,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}
