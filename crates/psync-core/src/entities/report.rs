use chrono::{DateTime, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Metric, TeamVariant};

/// One player's externally supplied metric values for one upload.
///
/// Field names follow the report file format (camelCase, metric fields named
/// after their wire names). A metric field that is absent means the report did
/// not carry that metric, which is different from an explicit zero.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    pub player_id: String,
    pub team: TeamVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atividade: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reais_por_ativo: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faturamento: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multimarcas_por_ativo: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversoes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upa: Option<f64>,
    pub cycle_day: u32,
    pub total_cycle_days: u32,
    /// ISO-8601 date (`2025-03-14`) or date-time (`2025-03-14T08:00:00Z`).
    pub report_date: String,
}

impl ReportRecord {
    /// Create a record with no metric values.
    #[must_use]
    pub fn new(
        player_id: impl Into<String>,
        team: TeamVariant,
        cycle_day: u32,
        total_cycle_days: u32,
        report_date: impl Into<String>,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            team,
            atividade: None,
            reais_por_ativo: None,
            faturamento: None,
            multimarcas_por_ativo: None,
            conversoes: None,
            upa: None,
            cycle_day,
            total_cycle_days,
            report_date: report_date.into(),
        }
    }

    /// Builder-style setter for one metric value.
    #[must_use]
    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        *self.slot_mut(metric) = Some(value);
        self
    }

    /// Value the report carries for `metric`, if any.
    #[must_use]
    pub const fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Atividade => self.atividade,
            Metric::ReaisPorAtivo => self.reais_por_ativo,
            Metric::Faturamento => self.faturamento,
            Metric::MultimarcasPorAtivo => self.multimarcas_por_ativo,
            Metric::Conversoes => self.conversoes,
            Metric::Upa => self.upa,
        }
    }

    /// Metrics present in this record, in [`Metric::ALL`] order.
    #[must_use]
    pub fn present_metrics(&self) -> Vec<(Metric, f64)> {
        Metric::ALL
            .into_iter()
            .filter_map(|metric| self.value(metric).map(|value| (metric, value)))
            .collect()
    }

    /// Calendar day of the report. See [`parse_report_day`].
    #[must_use]
    pub fn report_day(&self) -> Option<NaiveDate> {
        parse_report_day(&self.report_date)
    }

    fn slot_mut(&mut self, metric: Metric) -> &mut Option<f64> {
        match metric {
            Metric::Atividade => &mut self.atividade,
            Metric::ReaisPorAtivo => &mut self.reais_por_ativo,
            Metric::Faturamento => &mut self.faturamento,
            Metric::MultimarcasPorAtivo => &mut self.multimarcas_por_ativo,
            Metric::Conversoes => &mut self.conversoes,
            Metric::Upa => &mut self.upa,
        }
    }
}

/// Parse a report date: a plain date or an RFC 3339 date-time.
#[must_use]
pub fn parse_report_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
