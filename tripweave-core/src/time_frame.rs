//! Weekly opening hours.
//!
//! A [`TimeFrame`] holds one [`DaySchedule`] per weekday. The same type
//! describes a venue's opening hours and the user's own planning window, so
//! the overlap test in [`TimeFrame::overlaps`] works on both.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{ClockTime, SECONDS_PER_DAY, WeekInstant, Weekday};

/// Errors raised while decoding a [`TimeFrame`] from its period list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFrameError {
    /// The day index was not in `0..=6`.
    #[error("day index {day} is outside 0..=6")]
    InvalidDay {
        /// Offending index.
        day: u8,
    },
    /// A timed period had no closing time.
    #[error("period for day {day} has no closing time")]
    MissingClose {
        /// Day index in the wire convention (`0` is Sunday).
        day: u8,
    },
    /// More than one period was given for the same day.
    #[error("day {day} has more than one period")]
    DuplicateDay {
        /// Day index in the wire convention (`0` is Sunday).
        day: u8,
    },
}

/// Opening interval on a single day.
///
/// When `close <= open` the interval runs past midnight into the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    /// Opening time.
    pub open: ClockTime,
    /// Closing time.
    pub close: ClockTime,
}

impl Interval {
    /// Create an interval.
    #[must_use]
    pub const fn new(open: ClockTime, close: ClockTime) -> Self {
        Self { open, close }
    }

    /// Whether the interval continues into the following day.
    #[must_use]
    pub const fn crosses_midnight(self) -> bool {
        self.close.seconds() <= self.open.seconds()
    }

    /// Half-open `[start, end)` segment on the opening day, in seconds.
    const fn own_segment(self) -> (u32, u32) {
        if self.crosses_midnight() {
            (self.open.seconds(), SECONDS_PER_DAY)
        } else {
            (self.open.seconds(), self.close.seconds())
        }
    }

    /// Segment spilling into the following day, if any.
    const fn spill_segment(self) -> Option<(u32, u32)> {
        if self.crosses_midnight() && self.close.seconds() > 0 {
            Some((0, self.close.seconds()))
        } else {
            None
        }
    }
}

/// What a single day looks like.
///
/// The derived ordering is `Closed < Timed < NonStop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DaySchedule {
    /// Not open at all.
    #[default]
    Closed,
    /// Open during the interval.
    Timed(Interval),
    /// Open all day.
    NonStop,
}

impl DaySchedule {
    /// Coarse classification used for ordering.
    #[must_use]
    pub const fn openness(self) -> Openness {
        match self {
            Self::Closed => Openness::Closed,
            Self::Timed(_) => Openness::Timed,
            Self::NonStop => Openness::NonStop,
        }
    }
}

/// Summary of how available a schedule is, ordered `Closed < Timed < NonStop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Openness {
    /// Closed every day.
    Closed,
    /// Open on some days or only for part of the day.
    Timed,
    /// Open all day, every day.
    NonStop,
}

/// Weekly opening schedule.
///
/// # Examples
/// ```
/// use tripweave_core::{ClockTime, Interval, TimeFrame, WeekInstant, Weekday};
///
/// let nine = ClockTime::from_hm(9, 0).unwrap();
/// let five = ClockTime::from_hm(17, 0).unwrap();
/// let frame = TimeFrame::closed().with_timed(Weekday::Monday, Interval::new(nine, five));
///
/// assert!(frame.can_visit(WeekInstant::new(Weekday::Monday, ClockTime::from_hm(12, 0).unwrap())));
/// assert!(!frame.can_visit(WeekInstant::new(Weekday::Tuesday, ClockTime::from_hm(12, 0).unwrap())));
/// assert_eq!(frame.first_open_day(), Some(Weekday::Monday));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<OpeningPeriod>", into = "Vec<OpeningPeriod>")]
pub struct TimeFrame {
    days: [DaySchedule; 7],
}

impl Default for TimeFrame {
    fn default() -> Self {
        Self::non_stop()
    }
}

impl TimeFrame {
    /// Open all day, every day.
    #[must_use]
    pub const fn non_stop() -> Self {
        Self {
            days: [DaySchedule::NonStop; 7],
        }
    }

    /// Closed every day.
    #[must_use]
    pub const fn closed() -> Self {
        Self {
            days: [DaySchedule::Closed; 7],
        }
    }

    /// Build from explicit per-day schedules, Monday first.
    #[must_use]
    pub const fn from_days(days: [DaySchedule; 7]) -> Self {
        Self { days }
    }

    /// Replace the schedule for one day.
    #[expect(clippy::indexing_slicing, reason = "weekday indices are below seven")]
    #[must_use]
    pub const fn with_day(mut self, day: Weekday, schedule: DaySchedule) -> Self {
        self.days[day.index()] = schedule;
        self
    }

    /// Open during `interval` on `day`.
    #[must_use]
    pub const fn with_timed(self, day: Weekday, interval: Interval) -> Self {
        self.with_day(day, DaySchedule::Timed(interval))
    }

    /// Schedule for `day`.
    #[expect(clippy::indexing_slicing, reason = "weekday indices are below seven")]
    #[must_use]
    pub const fn schedule(&self, day: Weekday) -> DaySchedule {
        self.days[day.index()]
    }

    /// True when every day is open all day.
    #[must_use]
    pub fn is_non_stop(&self) -> bool {
        self.days.iter().all(|d| matches!(d, DaySchedule::NonStop))
    }

    /// True when `day` has no opening at all.
    #[expect(clippy::indexing_slicing, reason = "weekday indices are below seven")]
    #[must_use]
    pub const fn is_closed(&self, day: Weekday) -> bool {
        matches!(self.days[day.index()], DaySchedule::Closed)
    }

    /// True when `day` has a bounded opening interval.
    #[expect(clippy::indexing_slicing, reason = "weekday indices are below seven")]
    #[must_use]
    pub const fn is_timed(&self, day: Weekday) -> bool {
        matches!(self.days[day.index()], DaySchedule::Timed(_))
    }

    /// Coarse availability, the tie-break key for visiting order.
    #[must_use]
    pub fn openness(&self) -> Openness {
        if self.is_non_stop() {
            Openness::NonStop
        } else if self.days.iter().all(|d| matches!(d, DaySchedule::Closed)) {
            Openness::Closed
        } else {
            Openness::Timed
        }
    }

    /// First day, Monday first, that is not closed.
    #[must_use]
    pub fn first_open_day(&self) -> Option<Weekday> {
        Weekday::ALL.into_iter().find(|day| !self.is_closed(*day))
    }

    /// Half-open open segments on `day` in seconds since midnight, including
    /// any interval spilling over from the previous day.
    pub fn segments_on(&self, day: Weekday) -> impl Iterator<Item = (u32, u32)> + '_ {
        let own = match self.schedule(day) {
            DaySchedule::Closed => None,
            DaySchedule::Timed(interval) => Some(interval.own_segment()),
            DaySchedule::NonStop => Some((0, SECONDS_PER_DAY)),
        };
        let spill = match self.schedule(day.previous()) {
            DaySchedule::Timed(interval) => interval.spill_segment(),
            DaySchedule::Closed | DaySchedule::NonStop => None,
        };
        own.into_iter().chain(spill)
    }

    /// Whether the schedule is open at `instant`.
    #[must_use]
    pub fn can_visit(&self, instant: WeekInstant) -> bool {
        if self.is_non_stop() {
            return true;
        }
        let at = instant.clock().seconds();
        self.segments_on(instant.weekday())
            .any(|(start, end)| start <= at && at < end)
    }

    /// Whether the two schedules share any open time on a common day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        Weekday::ALL.into_iter().any(|day| {
            self.segments_on(day).any(|(a_start, a_end)| {
                other
                    .segments_on(day)
                    .any(|(b_start, b_end)| a_start < b_end && b_start < a_end)
            })
        })
    }

    /// Open window starting on `day`, as week instants. Intervals running
    /// past midnight end on the following day.
    #[must_use]
    pub fn window_on(&self, day: Weekday) -> Option<(WeekInstant, WeekInstant)> {
        match self.schedule(day) {
            DaySchedule::Closed => None,
            DaySchedule::NonStop => Some((
                WeekInstant::new(day, ClockTime::MIDNIGHT),
                WeekInstant::new(day, ClockTime::END_OF_DAY),
            )),
            DaySchedule::Timed(interval) => {
                let start = WeekInstant::new(day, interval.open);
                let mut end = WeekInstant::new(day, interval.close);
                if interval.crosses_midnight() {
                    end = end.plus_seconds(SECONDS_PER_DAY);
                }
                Some((start, end))
            }
        }
    }
}

/// Wire form of one day's opening hours.
///
/// `day` follows the venue-data convention where `0` is Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningPeriod {
    /// Day index, `0` is Sunday.
    pub day: u8,
    /// Opening time. `"0000"` marks the whole frame as non-stop.
    pub open: ClockTime,
    /// Closing time; optional only for the non-stop marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<ClockTime>,
}

impl TryFrom<Vec<OpeningPeriod>> for TimeFrame {
    type Error = TimeFrameError;

    fn try_from(periods: Vec<OpeningPeriod>) -> Result<Self, Self::Error> {
        if periods.iter().any(|p| p.open == ClockTime::MIDNIGHT) {
            return Ok(Self::non_stop());
        }
        let mut frame = Self::closed();
        for period in periods {
            let day = Weekday::from_sunday_based(period.day)
                .ok_or(TimeFrameError::InvalidDay { day: period.day })?;
            if !frame.is_closed(day) {
                return Err(TimeFrameError::DuplicateDay { day: period.day });
            }
            let close = period
                .close
                .ok_or(TimeFrameError::MissingClose { day: period.day })?;
            frame = frame.with_timed(day, Interval::new(period.open, close));
        }
        Ok(frame)
    }
}

impl From<TimeFrame> for Vec<OpeningPeriod> {
    fn from(frame: TimeFrame) -> Self {
        if frame.is_non_stop() {
            return vec![OpeningPeriod {
                day: Weekday::Sunday.sunday_based(),
                open: ClockTime::MIDNIGHT,
                close: None,
            }];
        }
        Weekday::ALL
            .into_iter()
            .filter_map(|day| match frame.schedule(day) {
                DaySchedule::Closed => None,
                DaySchedule::NonStop => Some(OpeningPeriod {
                    day: day.sunday_based(),
                    open: ClockTime::MIDNIGHT,
                    close: Some(ClockTime::END_OF_DAY),
                }),
                DaySchedule::Timed(interval) => Some(OpeningPeriod {
                    day: day.sunday_based(),
                    open: interval.open,
                    close: Some(interval.close),
                }),
            })
            .collect()
    }
}

/// The user's planning window for one search: the first open day of the
/// requested [`TimeFrame`] and its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanningWindow {
    /// Day the plan runs on.
    pub day: Weekday,
    /// Earliest planned instant.
    pub start: WeekInstant,
    /// Latest planned instant.
    pub end: WeekInstant,
}

impl PlanningWindow {
    /// Window for the first open day of `frame`, or `None` when the frame is
    /// closed all week.
    #[must_use]
    pub fn from_frame(frame: &TimeFrame) -> Option<Self> {
        let day = frame.first_open_day()?;
        let (start, end) = frame.window_on(day)?;
        Some(Self { day, start, end })
    }

    /// Whether `instant` lies within the window, bounds included.
    #[must_use]
    pub fn contains(&self, instant: WeekInstant) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// The instant at wall-clock `time` inside the window, if it falls
    /// within it. Times before the window's opening are looked up on the
    /// following day for windows running past midnight.
    #[must_use]
    pub fn instant_at(&self, time: ClockTime) -> Option<WeekInstant> {
        let same_day = WeekInstant::new(self.day, time);
        if self.contains(same_day) {
            return Some(same_day);
        }
        let next_day = same_day.plus_seconds(SECONDS_PER_DAY);
        self.contains(next_day).then_some(next_day)
    }

    /// Seconds between the window's start and end.
    #[must_use]
    pub const fn length_seconds(&self) -> u32 {
        self.end.seconds_since(self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn hm(h: u32, m: u32) -> ClockTime {
        ClockTime::from_hm(h, m).expect("valid clock time")
    }

    fn at(day: Weekday, h: u32, m: u32) -> WeekInstant {
        WeekInstant::new(day, hm(h, m))
    }

    #[fixture]
    #[expect(clippy::indexing_slicing, reason = "the week has five weekdays")]
    fn office_hours() -> TimeFrame {
        let interval = Interval::new(hm(9, 0), hm(17, 0));
        Weekday::ALL[..5]
            .iter()
            .fold(TimeFrame::closed(), |frame, day| frame.with_timed(*day, interval))
    }

    #[rstest]
    #[case(at(Weekday::Monday, 9, 0), true)]
    #[case(at(Weekday::Friday, 16, 59), true)]
    #[case(at(Weekday::Friday, 17, 0), false)]
    #[case(at(Weekday::Saturday, 12, 0), false)]
    fn timed_frame_answers_visits(
        office_hours: TimeFrame,
        #[case] instant: WeekInstant,
        #[case] expected: bool,
    ) {
        assert_eq!(office_hours.can_visit(instant), expected);
    }

    #[rstest]
    fn overnight_interval_spills_into_next_day() {
        let bar = TimeFrame::closed().with_timed(Weekday::Friday, Interval::new(hm(20, 0), hm(2, 0)));
        assert!(bar.can_visit(at(Weekday::Friday, 23, 30)));
        assert!(bar.can_visit(at(Weekday::Saturday, 1, 30)));
        assert!(!bar.can_visit(at(Weekday::Saturday, 2, 30)));
        assert!(!bar.can_visit(at(Weekday::Friday, 1, 0)));
    }

    #[rstest]
    fn non_stop_is_open_always_and_never_closed() {
        let frame = TimeFrame::non_stop();
        assert!(frame.is_non_stop());
        for day in Weekday::ALL {
            assert!(!frame.is_closed(day));
            assert!(!frame.is_timed(day));
            assert!(frame.can_visit(at(day, 3, 0)));
        }
    }

    #[rstest]
    fn openness_orders_closed_timed_non_stop(office_hours: TimeFrame) {
        assert!(TimeFrame::closed().openness() < office_hours.openness());
        assert!(office_hours.openness() < TimeFrame::non_stop().openness());
        assert!(DaySchedule::Closed < DaySchedule::Timed(Interval::new(hm(1, 0), hm(2, 0))));
        assert!(DaySchedule::Timed(Interval::new(hm(1, 0), hm(2, 0))) < DaySchedule::NonStop);
    }

    #[rstest]
    fn overlap_requires_a_shared_open_segment(office_hours: TimeFrame) {
        let evening = TimeFrame::closed().with_timed(Weekday::Monday, Interval::new(hm(18, 0), hm(22, 0)));
        let afternoon = TimeFrame::closed().with_timed(Weekday::Monday, Interval::new(hm(16, 0), hm(18, 0)));
        let weekend = TimeFrame::closed().with_day(Weekday::Sunday, DaySchedule::NonStop);
        assert!(!office_hours.overlaps(&evening));
        assert!(office_hours.overlaps(&afternoon));
        assert!(!office_hours.overlaps(&weekend));
        assert!(TimeFrame::non_stop().overlaps(&office_hours));
        assert!(!TimeFrame::closed().overlaps(&TimeFrame::non_stop()));
    }

    #[rstest]
    fn decodes_wire_periods() {
        let json = r#"[
            {"day": 1, "open": "0900", "close": "1700"},
            {"day": 0, "open": "1000", "close": "1400"}
        ]"#;
        let frame: TimeFrame = serde_json::from_str(json).expect("valid frame");
        assert!(frame.is_timed(Weekday::Monday));
        assert!(frame.is_timed(Weekday::Sunday));
        assert!(frame.is_closed(Weekday::Tuesday));
        assert_eq!(frame.first_open_day(), Some(Weekday::Monday));
    }

    #[rstest]
    fn midnight_opening_anywhere_means_non_stop() {
        let json = r#"[
            {"day": 3, "open": "1000", "close": "1200"},
            {"day": 4, "open": "0000"}
        ]"#;
        let frame: TimeFrame = serde_json::from_str(json).expect("valid frame");
        assert!(frame.is_non_stop());
        let encoded = serde_json::to_string(&frame).expect("serialise");
        assert_eq!(encoded, r#"[{"day":0,"open":"0000"}]"#);
    }

    #[rstest]
    #[case(r#"[{"day": 7, "open": "0900", "close": "1000"}]"#, TimeFrameError::InvalidDay { day: 7 })]
    #[case(r#"[{"day": 2, "open": "0900"}]"#, TimeFrameError::MissingClose { day: 2 })]
    #[case(
        r#"[{"day": 2, "open": "0900", "close": "1000"}, {"day": 2, "open": "1100", "close": "1200"}]"#,
        TimeFrameError::DuplicateDay { day: 2 }
    )]
    fn rejects_bad_periods(#[case] json: &str, #[case] expected: TimeFrameError) {
        let periods: Vec<OpeningPeriod> = serde_json::from_str(json).expect("periods parse");
        assert_eq!(TimeFrame::try_from(periods), Err(expected));
    }

    #[rstest]
    fn planning_window_uses_first_open_day() {
        let frame = TimeFrame::closed()
            .with_timed(Weekday::Wednesday, Interval::new(hm(10, 0), hm(18, 0)))
            .with_timed(Weekday::Friday, Interval::new(hm(8, 0), hm(12, 0)));
        let window = PlanningWindow::from_frame(&frame).expect("open day");
        assert_eq!(window.day, Weekday::Wednesday);
        assert_eq!(window.start, at(Weekday::Wednesday, 10, 0));
        assert_eq!(window.end, at(Weekday::Wednesday, 18, 0));
        assert_eq!(window.instant_at(hm(13, 0)), Some(at(Weekday::Wednesday, 13, 0)));
        assert_eq!(window.instant_at(hm(19, 0)), None);
        assert_eq!(window.length_seconds(), 8 * 3_600);
    }

    #[rstest]
    fn overnight_window_resolves_early_hours_to_next_day() {
        let frame = TimeFrame::closed().with_timed(Weekday::Saturday, Interval::new(hm(18, 0), hm(1, 0)));
        let window = PlanningWindow::from_frame(&frame).expect("open day");
        assert_eq!(window.instant_at(hm(0, 30)), Some(at(Weekday::Sunday, 0, 30)));
        assert_eq!(PlanningWindow::from_frame(&TimeFrame::closed()), None);
    }
}
