//! Hours-of-Service duty-cycle simulator.
//!
//! Partitions a trip's driving time into driving, on-duty and sleeper
//! blocks and buckets every block under the calendar day it starts on.
//! This is a simplified approximation of the FMCSA property-carrying rules,
//! not a certified implementation.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// Regulatory parameters used by the simulator (all values in hours).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HosRules {
    /// Maximum driving per block before a mandatory rest.
    pub driving_limit: f64,
    /// Elapsed on-duty window. Carried for reporting, not enforced.
    pub duty_window: f64,
    /// Off-duty rest that follows every block.
    pub rest_required: f64,
    /// Non-driving work (fueling, inspection) after each block.
    pub on_duty_hours: f64,
    /// Rolling 8-day cycle budget.
    pub cycle_limit: f64,
}

impl Default for HosRules {
    fn default() -> Self {
        Self {
            driving_limit: 11.0,
            duty_window: 14.0,
            rest_required: 10.0,
            on_duty_hours: 2.5,
            cycle_limit: 70.0,
        }
    }
}

/// Activity kind of a duty segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyKind {
    Driving,
    OnDuty,
    Sleeper,
}

/// Time span covered by a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Display value: driving is rounded to 2 decimals, other kinds are exact.
    pub hours: f64,
}

impl Span {
    /// Exact length of the span in hours, independent of the display value.
    pub fn duration_hours(&self) -> f64 {
        let micros = (self.end - self.start).num_microseconds().unwrap_or(i64::MAX);
        micros as f64 / MICROS_PER_HOUR
    }
}

/// One contiguous period of a single activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DutySegment {
    Driving(Span),
    OnDuty(Span),
    Sleeper(Span),
}

impl DutySegment {
    pub fn kind(&self) -> DutyKind {
        match self {
            DutySegment::Driving(_) => DutyKind::Driving,
            DutySegment::OnDuty(_) => DutyKind::OnDuty,
            DutySegment::Sleeper(_) => DutyKind::Sleeper,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            DutySegment::Driving(span) | DutySegment::OnDuty(span) | DutySegment::Sleeper(span) => span,
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.span().start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.span().end
    }

    pub fn hours(&self) -> f64 {
        self.span().hours
    }
}

/// Segments that start on one calendar day, in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyLog {
    segments: Vec<DutySegment>,
}

impl DailyLog {
    pub fn segments(&self) -> &[DutySegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Exact hours spent in `kind` across the segments starting this day.
    ///
    /// A segment that runs past midnight counts fully toward its start day.
    pub fn total_hours(&self, kind: DutyKind) -> f64 {
        self.segments
            .iter()
            .filter(|segment| segment.kind() == kind)
            .map(|segment| segment.span().duration_hours())
            .sum()
    }

    fn push(&mut self, segment: DutySegment) {
        self.segments.push(segment);
    }
}

/// Output of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub remaining_cycle_hours: f64,
    pub logs: BTreeMap<NaiveDate, DailyLog>,
}

impl SimulationResult {
    /// All segments in chronological order.
    pub fn segments(&self) -> impl Iterator<Item = &DutySegment> + '_ {
        self.logs.values().flat_map(|log| log.segments().iter())
    }

    pub fn total_hours(&self, kind: DutyKind) -> f64 {
        self.logs.values().map(|log| log.total_hours(kind)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid input: {field} is out of range, got {value}")]
    InvalidInput { field: &'static str, value: f64 },
    #[error("schedule starting at {start} runs past the supported date range")]
    OutOfRange { start: NaiveDateTime },
}

/// Simulates a trip under the default rules.
pub fn simulate(
    duration_hours: f64,
    current_cycle_hours: f64,
    start_time: NaiveDateTime,
) -> Result<SimulationResult, SimulationError> {
    simulate_with(&HosRules::default(), duration_hours, current_cycle_hours, start_time)
}

/// Simulates a trip of `duration_hours` of driving starting at `start_time`.
///
/// Every driving block of at most `driving_limit` hours is followed by an
/// on-duty block and a sleeper block, including the last one. Remaining
/// time is decremented by the unrounded block length.
pub fn simulate_with(
    rules: &HosRules,
    duration_hours: f64,
    current_cycle_hours: f64,
    start_time: NaiveDateTime,
) -> Result<SimulationResult, SimulationError> {
    non_negative("duration_hours", duration_hours)?;
    non_negative("current_cycle_hours", current_cycle_hours)?;
    validate_rules(rules)?;

    // Whole schedule must fit chrono's range before any block is built.
    let blocks = (duration_hours / rules.driving_limit).ceil();
    let total_hours = duration_hours + blocks * (rules.on_duty_hours + rules.rest_required);
    if start_time.checked_add_signed(hours_to_duration(total_hours)).is_none() {
        return Err(SimulationError::OutOfRange { start: start_time });
    }

    let remaining_cycle_hours = round2((rules.cycle_limit - current_cycle_hours).max(0.0));

    let mut logs: BTreeMap<NaiveDate, DailyLog> = BTreeMap::new();
    let mut clock = start_time;
    let mut hours_remaining = duration_hours;

    while hours_remaining > 0.0 {
        let drive = rules.driving_limit.min(hours_remaining);

        let (segment, next) = block(clock, drive, round2(drive))?;
        logs.entry(clock.date()).or_default().push(DutySegment::Driving(segment));
        clock = next;

        let (segment, next) = block(clock, rules.on_duty_hours, rules.on_duty_hours)?;
        logs.entry(clock.date()).or_default().push(DutySegment::OnDuty(segment));
        clock = next;

        let (segment, next) = block(clock, rules.rest_required, rules.rest_required)?;
        logs.entry(clock.date()).or_default().push(DutySegment::Sleeper(segment));
        clock = next;

        hours_remaining -= drive;
    }

    Ok(SimulationResult {
        remaining_cycle_hours,
        logs,
    })
}

/// 06:00 on the calendar day of `now`, the default start of a driving day.
pub fn default_start_time(now: NaiveDateTime) -> NaiveDateTime {
    now.date().and_time(NaiveTime::MIN) + Duration::hours(6)
}

/// Round to 2 decimals for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn block(start: NaiveDateTime, hours: f64, display_hours: f64) -> Result<(Span, NaiveDateTime), SimulationError> {
    let end = start
        .checked_add_signed(hours_to_duration(hours))
        .ok_or(SimulationError::OutOfRange { start })?;
    Ok((
        Span {
            start,
            end,
            hours: display_hours,
        },
        end,
    ))
}

/// Any positive span lasts at least one microsecond.
fn hours_to_duration(hours: f64) -> Duration {
    let micros = (hours * MICROS_PER_HOUR).round() as i64;
    if hours > 0.0 {
        Duration::microseconds(micros.max(1))
    } else {
        Duration::microseconds(micros)
    }
}

fn validate_rules(rules: &HosRules) -> Result<(), SimulationError> {
    positive("driving_limit", rules.driving_limit)?;
    positive("on_duty_hours", rules.on_duty_hours)?;
    positive("rest_required", rules.rest_required)?;
    non_negative("duty_window", rules.duty_window)?;
    non_negative("cycle_limit", rules.cycle_limit)
}

fn non_negative(field: &'static str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidInput { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidInput { field, value })
    }
}
