use crate::calendar::{days_in_month, YearMonth};
use crate::models::{DayRecord, NewDayRecord};
use crate::storage::{Session, StoreResult};
use tracing::info;

/// Creates an incomplete record for every day of `ym` that has none yet.
/// Slots already taken are skipped, so a racing request loses nothing.
pub fn seed_month(session: &Session<'_>, ym: YearMonth) -> StoreResult<usize> {
    let mut inserted = 0;
    for day in 1..=days_in_month(ym) {
        if session.insert_if_absent(NewDayRecord::pending(ym.year, ym.month, day))? {
            inserted += 1;
        }
    }
    Ok(inserted)
}

/// Records for `ym`, seeding the month first if it is empty.
pub fn ensure_month(session: &Session<'_>, ym: YearMonth) -> StoreResult<Vec<DayRecord>> {
    let days = session.list_month(ym)?;
    if !days.is_empty() {
        return Ok(days);
    }

    let inserted = seed_month(session, ym)?;
    info!(year = ym.year, month = ym.month, inserted, "seeded month");
    session.list_month(ym)
}
