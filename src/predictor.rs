use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::Cycle;

// Luteal phase is assumed fixed at 14 days; an unrecorded flow end defaults
// to a 5-day episode. These are domain constants, not tunables.
const LUTEAL_DAYS: i64 = 14;
const EPISODE_DAYS: i64 = 5;
const PMS_LEAD_DAYS: i64 = 7;

/// Phase of a single calendar day relative to one user's cycle history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodPhase {
    Menstruation,
    Pms,
    Ovulation,
    Fertile,
    Safe,
    Unknown,
}

/// Predicted landmarks for the upcoming cycle, recomputed on every read.
///
/// All fields are `None` when fewer than two usable records exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleData {
    pub average_cycle_length: Option<i64>,
    pub next_period_date: Option<NaiveDate>,
    pub ovulation_date: Option<NaiveDate>,
    pub pms_start_date: Option<NaiveDate>,
    pub pms_end_date: Option<NaiveDate>,
    pub fertile_window_start: Option<NaiveDate>,
    pub fertile_window_end: Option<NaiveDate>,
}

/// Classification of one day plus the display metadata the dashboard renders.
#[derive(Debug, Clone, Serialize)]
pub struct DayInfo {
    pub date: NaiveDate,
    pub phase: PeriodPhase,
    pub label: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub bg_color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TodaySummary {
    pub day_info: DayInfo,
    pub cycle_data: CycleData,
    pub days_until_next_period: Option<i64>,
}

/// Average cycle length in days over the three most recent records.
///
/// Gaps outside the open range (0, 60) days are discarded as data-entry
/// noise. Returns `None` with fewer than two records or when every gap
/// was discarded.
pub fn average_cycle_length(cycles: &[Cycle]) -> Option<i64> {
    if cycles.len() < 2 {
        return None;
    }

    let mut sorted: Vec<&Cycle> = cycles.iter().collect();
    sorted.sort_by(|a, b| b.start_date.cmp(&a.start_date));

    let recent = &sorted[..sorted.len().min(3)];
    let gaps: Vec<i64> = recent
        .windows(2)
        .map(|pair| (pair[0].start_date - pair[1].start_date).num_days())
        .filter(|gap| *gap > 0 && *gap < 60)
        .collect();

    if gaps.is_empty() {
        return None;
    }

    let sum: i64 = gaps.iter().sum();
    Some((sum as f64 / gaps.len() as f64).round() as i64)
}

/// Derive next-period, ovulation, PMS and fertile-window dates from the
/// latest recorded start. All fields come back `None` when the average
/// cannot be estimated.
pub fn calculate_cycle_data(cycles: &[Cycle]) -> CycleData {
    let average = average_cycle_length(cycles);
    let last_start = cycles.iter().map(|c| c.start_date).max();

    let (Some(average), Some(last_start)) = (average, last_start) else {
        return CycleData::default();
    };

    let next_period = last_start + Duration::days(average);
    let ovulation = next_period - Duration::days(LUTEAL_DAYS);

    CycleData {
        average_cycle_length: Some(average),
        next_period_date: Some(next_period),
        ovulation_date: Some(ovulation),
        pms_start_date: Some(next_period - Duration::days(PMS_LEAD_DAYS)),
        pms_end_date: Some(next_period - Duration::days(1)),
        fertile_window_start: Some(ovulation - Duration::days(3)),
        fertile_window_end: Some(ovulation + Duration::days(1)),
    }
}

// Inclusive day range covered by one recorded episode. A missing end date
// defaults to EPISODE_DAYS after the start; an end date before the start
// is treated as the normalized range [end, start].
fn episode_range(cycle: &Cycle) -> (NaiveDate, NaiveDate) {
    let start = cycle.start_date;
    let end = cycle
        .end_date
        .unwrap_or(start + Duration::days(EPISODE_DAYS));
    if end < start {
        (end, start)
    } else {
        (start, end)
    }
}

/// Classify one day. Recorded episodes win over every prediction, then
/// predicted menstruation, ovulation, fertile window and PMS are checked
/// in that order.
pub fn phase_for_date(date: NaiveDate, cycles: &[Cycle], data: &CycleData) -> PeriodPhase {
    let observed = cycles.iter().any(|c| {
        let (start, end) = episode_range(c);
        date >= start && date <= end
    });
    if observed {
        return PeriodPhase::Menstruation;
    }

    let Some(next_period) = data.next_period_date else {
        return PeriodPhase::Unknown;
    };

    if date >= next_period && date <= next_period + Duration::days(EPISODE_DAYS) {
        return PeriodPhase::Menstruation;
    }

    if data.ovulation_date == Some(date) {
        return PeriodPhase::Ovulation;
    }

    if let (Some(from), Some(to)) = (data.fertile_window_start, data.fertile_window_end) {
        if date >= from && date <= to {
            return PeriodPhase::Fertile;
        }
    }

    if let (Some(from), Some(to)) = (data.pms_start_date, data.pms_end_date) {
        if date >= from && date <= to {
            return PeriodPhase::Pms;
        }
    }

    PeriodPhase::Safe
}

fn phase_display(phase: PeriodPhase) -> (&'static str, &'static str, &'static str, &'static str) {
    match phase {
        PeriodPhase::Menstruation => (
            "Period",
            "Menstruation in progress",
            "#dc2626",
            "#fee2e2",
        ),
        PeriodPhase::Pms => ("PMS", "Premenstrual window", "#ca8a04", "#fef9c3"),
        PeriodPhase::Ovulation => ("Ovulation", "Estimated ovulation day", "#9333ea", "#f3e8ff"),
        PeriodPhase::Fertile => ("Fertile", "High chance of conception", "#db2777", "#fce7f3"),
        PeriodPhase::Safe => ("Low risk", "Relatively safe window", "#16a34a", "#f0fdf4"),
        PeriodPhase::Unknown => (
            "Not enough data",
            "Log more cycles to unlock predictions",
            "#6b7280",
            "#f9fafb",
        ),
    }
}

/// Full per-day view: phase plus label/color metadata for rendering.
pub fn day_info(date: NaiveDate, cycles: &[Cycle], data: &CycleData) -> DayInfo {
    let phase = phase_for_date(date, cycles, data);
    let (label, description, color, bg_color) = phase_display(phase);
    DayInfo {
        date,
        phase,
        label,
        description,
        color,
        bg_color,
    }
}

/// Dashboard summary for `today`: today's classification, the landmark
/// snapshot, and a signed countdown to the predicted next period (zero or
/// negative once the predicted date has arrived).
pub fn today_summary(cycles: &[Cycle], today: NaiveDate) -> TodaySummary {
    let cycle_data = calculate_cycle_data(cycles);
    let info = day_info(today, cycles, &cycle_data);
    let days_until_next_period = cycle_data
        .next_period_date
        .map(|next| (next - today).num_days());

    TodaySummary {
        day_info: info,
        cycle_data,
        days_until_next_period,
    }
}
