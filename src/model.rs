use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sentinel used when a source link carries no `protocolo` parameter.
pub const PROTOCOL_NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    UrbanInfrastructure,
    EnvironmentAndSanitation,
    MobilityAndTransit,
    PublicServices,
    PublicSafety,
    CommunitySpaces,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::UrbanInfrastructure,
        Category::EnvironmentAndSanitation,
        Category::MobilityAndTransit,
        Category::PublicServices,
        Category::PublicSafety,
        Category::CommunitySpaces,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::UrbanInfrastructure => "UrbanInfrastructure",
            Category::EnvironmentAndSanitation => "EnvironmentAndSanitation",
            Category::MobilityAndTransit => "MobilityAndTransit",
            Category::PublicServices => "PublicServices",
            Category::PublicSafety => "PublicSafety",
            Category::CommunitySpaces => "CommunitySpaces",
        }
    }

    /// Display label used by the listing table.
    pub fn label(self) -> &'static str {
        match self {
            Category::UrbanInfrastructure => "Infraestrutura Urbana",
            Category::EnvironmentAndSanitation => "Meio Ambiente e Saneamento",
            Category::MobilityAndTransit => "Mobilidade e Trânsito",
            Category::PublicServices => "Serviços Públicos",
            Category::PublicSafety => "Segurança Pública",
            Category::CommunitySpaces => "Espaços Comunitários",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.name().to_lowercase() == wanted || c.label().to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown category: {}", s.trim()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegislativeMatter {
    pub id: String,
    pub summary: String,
    pub author: String,
    pub presentation_date: String,
    pub category: Category,
    pub location: Location,
    pub status: String,
    pub protocol: String,
    pub pdf_link: String,
}

/// Parsed form of a display id such as `"IND 123/2025"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatterId {
    pub kind: String,
    pub sequence: u32,
    pub year: i32,
}

impl MatterId {
    pub fn parse(id: &str) -> Option<MatterId> {
        let (kind, number) = id.trim().rsplit_once(' ')?;
        let (sequence, year) = number.split_once('/')?;
        let kind = kind.trim();
        if kind.is_empty() {
            return None;
        }
        Some(MatterId {
            kind: kind.to_string(),
            sequence: sequence.trim().parse().ok()?,
            year: year.trim().parse().ok()?,
        })
    }

    /// `(year, sequence)`; compare descending for newest-first order.
    pub fn sort_key(&self) -> (i32, u32) {
        (self.year, self.sequence)
    }
}

impl LegislativeMatter {
    /// Composite ordering key. `None` for ids that do not parse.
    pub fn id_key(&self) -> Option<(i32, u32)> {
        MatterId::parse(&self.id).map(|id| id.sort_key())
    }
}

// ── Tests ──
