use crate::calendar::{MonthGrid, YearMonth};
use crate::errors::AppError;
use crate::models::ToggleQuery;
use crate::seed::ensure_month;
use crate::state::AppState;
use crate::ui::{cell_id, render_day, render_index};
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::{Html, IntoResponse},
};
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let ym = state.clock.current_month();
    let days = state
        .store
        .with_session(|session| ensure_month(session, ym))
        .await?;

    Ok(Html(render_index(&MonthGrid::for_month(ym), &days)))
}

pub async fn toggle(
    State(state): State<AppState>,
    day: Result<Path<u32>, PathRejection>,
    query: Result<Query<ToggleQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(day) = day?;
    let Query(query) = query?;
    let ym = resolve_month(&state, &query)?;
    let record = state
        .store
        .with_session(|session| session.toggle(ym, day))
        .await?;

    let Some(record) = record else {
        return Err(AppError::not_found(format!(
            "no record for {}-{:02}-{:02}",
            ym.year, ym.month, day
        )));
    };

    info!(
        year = record.year,
        month = record.month,
        day = record.day,
        completed = record.completed,
        "day toggled"
    );

    let headers = [
        ("HX-Retarget", format!("#{}", cell_id(day))),
        ("HX-Reswap", "outerHTML".to_string()),
    ];
    Ok((headers, Html(render_day(&record))))
}

fn resolve_month(state: &AppState, query: &ToggleQuery) -> Result<YearMonth, AppError> {
    let current = state.clock.current_month();
    let year = query.year.unwrap_or(current.year);
    let month = query.month.unwrap_or(current.month);
    YearMonth::new(year, month)
        .ok_or_else(|| AppError::bad_request(format!("invalid month {year}-{month}")))
}
