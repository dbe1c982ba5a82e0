use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketType {
    Dnb,
    Totals,
    Btts,
    DoubleChance,
}

impl MarketType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dnb => "DNB",
            Self::Totals => "TOTALS",
            Self::Btts => "BTTS",
            Self::DoubleChance => "DOUBLE_CHANCE",
        }
    }
}

/// A single market side. Every totals line is its own market variant, so
/// two different totals outcomes never contradict each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "DNB_HOME")]
    DnbHome,
    #[serde(rename = "DNB_AWAY")]
    DnbAway,
    #[serde(rename = "TOTALS_UNDER_3_5")]
    Under35,
    #[serde(rename = "TOTALS_UNDER_4_5")]
    Under45,
    #[serde(rename = "TOTALS_OVER_2_5")]
    Over25,
    #[serde(rename = "BTTS_YES")]
    BttsYes,
    #[serde(rename = "BTTS_NO")]
    BttsNo,
    #[serde(rename = "DC_1X")]
    HomeOrDraw,
    #[serde(rename = "DC_X2")]
    DrawOrAway,
}

impl Outcome {
    pub const ALL: [Outcome; 9] = [
        Self::DnbHome,
        Self::DnbAway,
        Self::Under35,
        Self::Under45,
        Self::Over25,
        Self::BttsYes,
        Self::BttsNo,
        Self::HomeOrDraw,
        Self::DrawOrAway,
    ];

    pub fn market_type(self) -> MarketType {
        match self {
            Self::DnbHome | Self::DnbAway => MarketType::Dnb,
            Self::Under35 | Self::Under45 | Self::Over25 => MarketType::Totals,
            Self::BttsYes | Self::BttsNo => MarketType::Btts,
            Self::HomeOrDraw | Self::DrawOrAway => MarketType::DoubleChance,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::DnbHome => "DNB_HOME",
            Self::DnbAway => "DNB_AWAY",
            Self::Under35 => "TOTALS_UNDER_3_5",
            Self::Under45 => "TOTALS_UNDER_4_5",
            Self::Over25 => "TOTALS_OVER_2_5",
            Self::BttsYes => "BTTS_YES",
            Self::BttsNo => "BTTS_NO",
            Self::HomeOrDraw => "DC_1X",
            Self::DrawOrAway => "DC_X2",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|outcome| outcome.code() == code)
    }

    /// Two outcomes exclude each other when they are different sides of the
    /// same market variant.
    pub fn excludes(self, other: Outcome) -> bool {
        if self == other {
            return false;
        }
        match (self.market_type(), other.market_type()) {
            (MarketType::Totals, MarketType::Totals) => false,
            (left, right) => left == right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DnbMarket {
    pub home: f64,
    pub away: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalsMarket {
    #[serde(default)]
    pub under_3_5: Option<f64>,
    #[serde(default)]
    pub under_4_5: Option<f64>,
    #[serde(default)]
    pub over_2_5: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BttsMarket {
    pub yes: f64,
    pub no: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoubleChanceMarket {
    pub home_or_draw: f64,
    pub draw_or_away: f64,
}

/// Independent market probabilities for one fixture. Any family may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketBundle {
    #[serde(default)]
    pub dnb: Option<DnbMarket>,
    #[serde(default)]
    pub totals: Option<TotalsMarket>,
    #[serde(default)]
    pub btts: Option<BttsMarket>,
    #[serde(default)]
    pub double_chance: Option<DoubleChanceMarket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    #[serde(with = "time::serde::rfc3339")]
    pub kickoff: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchSnapshot {
    pub summary: MatchSummary,
    pub markets: MarketBundle,
}

impl MatchSnapshot {
    pub fn new(summary: MatchSummary, markets: MarketBundle) -> Self {
        Self { summary, markets }
    }
}
