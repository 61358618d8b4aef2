//! Pure cycle computations: calendar bounds, roll-ups, trend, comparison.

use chrono::{Days, NaiveDate};
use psync_core::entities::{
    CycleComparison, CycleHistoryData, CycleInfo, CycleSummaryStats, GoalPercentages,
    StoredSnapshot,
};
use psync_core::enums::Trend;

/// Mean difference (recent half − older half) beyond which a trend is not stable.
pub const TREND_THRESHOLD: f64 = 5.0;

/// Calendar bounds of a cycle from one of its snapshots.
///
/// `None` when the snapshot's report date cannot be parsed.
#[must_use]
pub fn cycle_info(snapshot: &StoredSnapshot, today: NaiveDate) -> Option<CycleInfo> {
    let report_day = snapshot.report_day()?;
    let start_date =
        report_day.checked_sub_days(Days::new(u64::from(snapshot.cycle_day.saturating_sub(1))))?;
    let end_date = start_date
        .checked_add_days(Days::new(u64::from(snapshot.total_cycle_days.saturating_sub(1))))?;
    Some(CycleInfo {
        cycle_number: snapshot.cycle_number,
        start_date,
        end_date,
        total_days: snapshot.total_cycle_days,
        is_completed: end_date < today,
    })
}

/// Averages, best/worst cycle, and trend over completed cycles in any order.
#[must_use]
pub fn summary_stats(cycles: &[CycleHistoryData]) -> CycleSummaryStats {
    let mut chronological: Vec<&CycleHistoryData> = cycles.iter().collect();
    chronological.sort_by_key(|data| data.cycle.cycle_number);

    let average = average_goals(chronological.iter().map(|data| &data.final_goals));
    let ranked = |better: fn(f64, f64) -> bool| {
        chronological
            .iter()
            .fold(None::<(u32, f64)>, |best, data| {
                let mean = data.final_goals.mean();
                match best {
                    Some((_, current)) if !better(mean, current) => best,
                    _ => Some((data.cycle.cycle_number, mean)),
                }
            })
            .map(|(cycle, _)| cycle)
    };

    CycleSummaryStats {
        total_cycles: chronological.len(),
        average,
        average_overall: average.mean(),
        best_cycle: ranked(|mean, best| mean > best),
        worst_cycle: ranked(|mean, worst| mean < worst),
        trend: trend(
            &chronological
                .iter()
                .map(|data| data.final_goals.mean())
                .collect::<Vec<_>>(),
        ),
    }
}

fn average_goals<'a>(goals: impl Iterator<Item = &'a GoalPercentages>) -> GoalPercentages {
    let (sum, count) = goals.fold((GoalPercentages::default(), 0_u32), |(acc, n), g| {
        (
            GoalPercentages {
                primary: acc.primary + g.primary,
                secondary1: acc.secondary1 + g.secondary1,
                secondary2: acc.secondary2 + g.secondary2,
            },
            n + 1,
        )
    });
    if count == 0 {
        return GoalPercentages::default();
    }
    let n = f64::from(count);
    GoalPercentages {
        primary: sum.primary / n,
        secondary1: sum.secondary1 / n,
        secondary2: sum.secondary2 / n,
    }
}

/// Trend over per-cycle means, oldest first.
///
/// Compares the mean of the most recent `n / 2` cycles to the mean of the
/// oldest `n / 2`; the middle cycle of an odd count is in neither half.
#[must_use]
pub fn trend(means: &[f64]) -> Trend {
    let half = means.len() / 2;
    if half == 0 {
        return Trend::Stable;
    }
    let older = mean(&means[..half]);
    let recent = mean(&means[means.len() - half..]);
    let change = recent - older;
    if change > TREND_THRESHOLD {
        Trend::Improving
    } else if change < -TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Per-goal and overall deltas from `a` to `b`.
#[must_use]
pub fn compare(a: &CycleHistoryData, b: &CycleHistoryData) -> CycleComparison {
    let deltas = GoalPercentages {
        primary: b.final_goals.primary - a.final_goals.primary,
        secondary1: b.final_goals.secondary1 - a.final_goals.secondary1,
        secondary2: b.final_goals.secondary2 - a.final_goals.secondary2,
    };
    let total_improvement = deltas.mean();
    CycleComparison {
        cycle_a: a.cycle.cycle_number,
        cycle_b: b.cycle.cycle_number,
        deltas,
        total_improvement,
        summary: improvement_summary(total_improvement).to_string(),
    }
}

/// Qualitative label for a mean goal delta.
#[must_use]
pub fn improvement_summary(total_improvement: f64) -> &'static str {
    if total_improvement >= 20.0 {
        "excellent improvement"
    } else if total_improvement >= 10.0 {
        "good improvement"
    } else if total_improvement > 0.0 {
        "slight improvement"
    } else if total_improvement == 0.0 {
        "no change"
    } else if total_improvement > -10.0 {
        "slight decline"
    } else {
        "significant decline"
    }
}
