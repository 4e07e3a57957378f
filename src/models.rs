use serde::Deserialize;

/// One calendar day of the challenge and whether it has been done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
    pub id: i64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewDayRecord {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub completed: bool,
}

impl NewDayRecord {
    pub fn pending(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            completed: false,
        }
    }
}

/// Query string accepted by `POST /toggle/{day}`.
#[derive(Debug, Default, Deserialize)]
pub struct ToggleQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}
