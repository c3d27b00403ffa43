//! Month grid construction.
//!
//! A grid always starts on the first day of the week containing the 1st of the
//! reference month and ends on the last day of the week containing the month's last
//! day, so every row is a full week.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::date_input::last_day_of_month;

pub const DAYS_PER_WEEK: usize = 7;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    pub fn day_names(self) -> [&'static str; DAYS_PER_WEEK] {
        match self {
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
}

impl GridDay {
    /// The `YYYY-MM-DD` key events are matched against.
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

pub type Week = [GridDay; DAYS_PER_WEEK];

#[derive(Clone, Debug)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Week>,
}

#[cfg(test)]
impl MonthGrid {
    pub fn days(&self) -> impl Iterator<Item = &GridDay> {
        self.weeks.iter().flat_map(|week| week.iter())
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.weeks.first().map(|week| week[0].date)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.weeks.last().map(|week| week[DAYS_PER_WEEK - 1].date)
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let last = last_day_of_month(date.year(), date.month());
    date.with_day(last).unwrap_or(date)
}

pub fn start_of_week(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let current = date.weekday().num_days_from_sunday() as i64;
    let first = week_start.weekday().num_days_from_sunday() as i64;
    date - Duration::days((current - first).rem_euclid(7))
}

pub fn end_of_week(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    start_of_week(date, week_start) + Duration::days(DAYS_PER_WEEK as i64 - 1)
}

/// Builds the weeks displayed for the month containing `reference`.
pub fn month_grid(reference: NaiveDate, today: NaiveDate, week_start: WeekStart) -> MonthGrid {
    let start = start_of_week(first_of_month(reference), week_start);
    // Exclusive: the day after the last displayed Saturday (or Sunday).
    let boundary = end_of_week(last_of_month(reference), week_start) + Duration::days(1);

    let mut weeks = Vec::new();
    let mut day = start;
    while day < boundary {
        let week: Week = std::array::from_fn(|i| {
            let date = day + Duration::days(i as i64);
            GridDay {
                date,
                in_month: date.year() == reference.year() && date.month() == reference.month(),
                is_today: date == today,
            }
        });
        weeks.push(week);
        day += Duration::days(DAYS_PER_WEEK as i64);
    }

    MonthGrid {
        year: reference.year(),
        month: reference.month(),
        weeks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn march_2024_spans_six_weeks() {
        let grid = month_grid(ymd(2024, 3, 15), ymd(2024, 3, 10), WeekStart::Sunday);
        assert_eq!(grid.weeks.len(), 6);
        assert_eq!(grid.days().count(), 42);
        assert_eq!(grid.first_day(), Some(ymd(2024, 2, 25)));
        assert_eq!(grid.last_day(), Some(ymd(2024, 4, 6)));
        assert_eq!(grid.first_day().unwrap().weekday(), Weekday::Sun);
        assert_eq!(grid.last_day().unwrap().weekday(), Weekday::Sat);
    }

    #[test]
    fn month_ending_on_saturday_keeps_final_week() {
        // August 2024 ends on Saturday the 31st.
        let grid = month_grid(ymd(2024, 8, 1), ymd(2000, 1, 1), WeekStart::Sunday);
        assert_eq!(grid.weeks.len(), 5);
        assert_eq!(grid.first_day(), Some(ymd(2024, 7, 28)));
        assert_eq!(grid.last_day(), Some(ymd(2024, 8, 31)));
    }

    #[test]
    fn aligned_february_fits_in_four_weeks() {
        let grid = month_grid(ymd(2015, 2, 14), ymd(2015, 2, 14), WeekStart::Sunday);
        assert_eq!(grid.weeks.len(), 4);
        assert!(grid.days().all(|d| d.in_month));
    }

    #[test]
    fn monday_start_shifts_boundaries() {
        let grid = month_grid(ymd(2024, 3, 1), ymd(2024, 3, 1), WeekStart::Monday);
        assert_eq!(grid.first_day(), Some(ymd(2024, 2, 26)));
        assert_eq!(grid.last_day(), Some(ymd(2024, 3, 31)));
        assert_eq!(grid.weeks.len(), 5);
    }

    #[test]
    fn every_month_is_bounded_by_full_weeks() {
        let today = ymd(2024, 6, 1);
        for year in [2023, 2024, 2025] {
            for month in 1..=12 {
                for week_start in [WeekStart::Sunday, WeekStart::Monday] {
                    let reference = ymd(year, month, 1);
                    let grid = month_grid(reference, today, week_start);
                    let first = grid.first_day().unwrap();
                    let last = grid.last_day().unwrap();

                    assert_eq!(grid.days().count() % DAYS_PER_WEEK, 0);
                    assert!((4..=6).contains(&grid.weeks.len()));
                    assert_eq!(first.weekday(), week_start.weekday());
                    assert!(first <= reference && (reference - first).num_days() < 7);
                    let month_end = last_of_month(reference);
                    assert!(last >= month_end && (last - month_end).num_days() < 7);

                    let days: Vec<_> = grid.days().collect();
                    for pair in days.windows(2) {
                        assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
                    }
                    for day in days {
                        let same_month =
                            day.date.year() == year && day.date.month() == month;
                        assert_eq!(day.in_month, same_month);
                    }
                }
            }
        }
    }

    #[test]
    fn only_the_current_date_is_today() {
        let today = ymd(2024, 3, 12);
        let grid = month_grid(ymd(2024, 3, 1), today, WeekStart::Sunday);
        let todays: Vec<_> = grid.days().filter(|d| d.is_today).collect();
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].date, today);
        assert_eq!(todays[0].iso(), "2024-03-12");

        let elsewhere = month_grid(ymd(2024, 5, 1), today, WeekStart::Sunday);
        assert!(elsewhere.days().all(|d| !d.is_today));
    }
}
