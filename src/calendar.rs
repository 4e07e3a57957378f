use chrono::{Datelike, Local, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

/// Everything the page needs to lay a month out on a Monday-first grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub days_in_month: u32,
    pub first_weekday_offset: u32,
}

impl MonthGrid {
    pub fn for_month(ym: YearMonth) -> Self {
        Self {
            year: ym.year,
            month: ym.month,
            month_name: ym
                .first_day()
                .map(|first| first.format("%B").to_string())
                .unwrap_or_default(),
            days_in_month: days_in_month(ym),
            first_weekday_offset: first_weekday_offset(ym),
        }
    }
}

/// Length of the month, 0 for a month chrono cannot represent.
pub fn days_in_month(ym: YearMonth) -> u32 {
    (28..=31)
        .rev()
        .find(|&day| NaiveDate::from_ymd_opt(ym.year, ym.month, day).is_some())
        .unwrap_or(0)
}

/// Weekday of the 1st, Monday = 0 through Sunday = 6.
pub fn first_weekday_offset(ym: YearMonth) -> u32 {
    ym.first_day()
        .map_or(0, |first| first.weekday().num_days_from_monday())
}

/// Source of "today". Pinned in tests and through `CHALLENGE_TODAY`.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }

    pub fn current_month(&self) -> YearMonth {
        YearMonth::of(self.today())
    }
}
