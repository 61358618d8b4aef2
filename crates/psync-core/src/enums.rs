//! Metrics, goal slots, progress bands, trends, snapshot origins, and team
//! variants.
//!
//! Team variants and slots use `snake_case` serialization. Metrics keep the
//! camelCase wire names used by the report files and the platform's action
//! identifiers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

/// A goal metric tracked by the incentive program.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    /// Share of the portfolio with activity in the cycle.
    Atividade,
    /// Revenue per active customer.
    ReaisPorAtivo,
    /// Revenue against target.
    Faturamento,
    /// Multi-brand purchases per active customer.
    MultimarcasPorAtivo,
    /// Converted opportunities.
    Conversoes,
    /// Units per service.
    Upa,
}

impl Metric {
    pub const ALL: [Self; 6] = [
        Self::Atividade,
        Self::ReaisPorAtivo,
        Self::Faturamento,
        Self::MultimarcasPorAtivo,
        Self::Conversoes,
        Self::Upa,
    ];

    /// Wire name used in report files, stored snapshots, and action identifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Atividade => "atividade",
            Self::ReaisPorAtivo => "reaisPorAtivo",
            Self::Faturamento => "faturamento",
            Self::MultimarcasPorAtivo => "multimarcasPorAtivo",
            Self::Conversoes => "conversoes",
            Self::Upa => "upa",
        }
    }

    /// Look up a metric by its wire name.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|metric| metric.as_str() == name)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MetricSlot
// ---------------------------------------------------------------------------

/// Position of a goal within a team's goal set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetricSlot {
    Primary,
    #[serde(rename = "secondary1")]
    Secondary1,
    #[serde(rename = "secondary2")]
    Secondary2,
}

impl MetricSlot {
    pub const ALL: [Self; 3] = [Self::Primary, Self::Secondary1, Self::Secondary2];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary1 => "secondary1",
            Self::Secondary2 => "secondary2",
        }
    }
}

impl fmt::Display for MetricSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProgressBand
// ---------------------------------------------------------------------------

/// Color band a goal percentage falls into.
///
/// ```text
/// [0, 50]   → low   (red)
/// (50, 100) → mid   (yellow)
/// [100, ∞)  → high  (green)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBand {
    Low,
    Mid,
    High,
}

impl ProgressBand {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
        }
    }

    /// Whether the goal is considered met.
    #[must_use]
    pub const fn is_met(self) -> bool {
        matches!(self, Self::High)
    }
}

impl fmt::Display for ProgressBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

/// Direction of performance across completed cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl Trend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SnapshotOrigin
// ---------------------------------------------------------------------------

/// What wrote a stored snapshot.
///
/// `Retry` snapshots extend the previous snapshot with metrics that only went
/// through on a later retry. They are not uploads of their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotOrigin {
    #[default]
    Upload,
    Retry,
}

impl SnapshotOrigin {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Retry => "retry",
        }
    }
}

impl fmt::Display for SnapshotOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TeamVariant
// ---------------------------------------------------------------------------

/// Team a player belongs to. Selects the goal set and challenge mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TeamVariant {
    CarteiraI,
    CarteiraIi,
    CarteiraIii,
    CarteiraIv,
    Er,
    Cs,
}

impl TeamVariant {
    pub const ALL: [Self; 6] = [
        Self::CarteiraI,
        Self::CarteiraIi,
        Self::CarteiraIii,
        Self::CarteiraIv,
        Self::Er,
        Self::Cs,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CarteiraI => "carteira_i",
            Self::CarteiraIi => "carteira_ii",
            Self::CarteiraIii => "carteira_iii",
            Self::CarteiraIv => "carteira_iv",
            Self::Er => "er",
            Self::Cs => "cs",
        }
    }
}

impl fmt::Display for TeamVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
