use crate::calendar::MonthGrid;
use crate::models::DayRecord;
use std::collections::BTreeMap;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn render_index(grid: &MonthGrid, days: &[DayRecord]) -> String {
    let by_day: BTreeMap<u32, &DayRecord> = days
        .iter()
        .filter(|day| (1..=grid.days_in_month).contains(&day.day))
        .map(|day| (day.day, day))
        .collect();

    let done = by_day.values().filter(|day| day.completed).count();

    let mut cells = String::new();
    for name in WEEKDAYS {
        cells.push_str(&format!("      <div class=\"weekday\">{name}</div>\n"));
    }
    for _ in 0..grid.first_weekday_offset {
        cells.push_str("      <div class=\"day blank\"></div>\n");
    }
    // A day without a record keeps its slot so later days stay in their column.
    for n in 1..=grid.days_in_month {
        match by_day.get(&n) {
            Some(day) => {
                cells.push_str("      ");
                cells.push_str(&render_day(day));
                cells.push('\n');
            }
            None => cells.push_str("      <div class=\"day missing\"></div>\n"),
        }
    }

    INDEX_HTML
        .replace("{{MONTH}}", &grid.month_name)
        .replace("{{YEAR}}", &grid.year.to_string())
        .replace("{{DONE}}", &done.to_string())
        .replace("{{TOTAL}}", &grid.days_in_month.to_string())
        .replace("{{CELLS}}", &cells)
}

/// Markup for one day cell. The page and the toggle response share it, so a
/// swapped-in fragment is identical to the cell it replaces.
pub fn render_day(day: &DayRecord) -> String {
    let (class, pressed) = if day.completed {
        ("done", "true")
    } else {
        ("todo", "false")
    };
    format!(
        "<button id=\"{id}\" class=\"day {class}\" type=\"button\" \
         hx-post=\"/toggle/{n}?year={year}&amp;month={month}\" hx-target=\"this\" \
         hx-swap=\"outerHTML\" aria-pressed=\"{pressed}\">{n}</button>",
        id = cell_id(day.day),
        n = day.day,
        year = day.year,
        month = day.month,
    )
}

pub fn cell_id(day: u32) -> String {
    format!("day-{day}")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Challenge Calendar</title>
  <script src="https://unpkg.com/htmx.org@1.9.12"></script>
  <style>
    body {
      margin: 0;
      min-height: 100vh;
      display: grid;
      place-items: center;
      padding: 24px 12px;
      background: #fbf6ee;
      color: #2b2a28;
      font-family: system-ui, sans-serif;
    }

    .calendar {
      width: min(560px, 100%);
      display: grid;
      gap: 20px;
      padding: 28px;
      border-radius: 20px;
      background: white;
      box-shadow: 0 16px 40px rgba(47, 72, 88, 0.14);
    }

    h1 {
      margin: 0;
      font-size: 2rem;
    }

    .progress {
      margin: 4px 0 0;
      color: #6f6a65;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 6px;
    }

    .weekday {
      text-align: center;
      font-size: 0.75rem;
      text-transform: uppercase;
      color: #8b857d;
    }

    .day {
      aspect-ratio: 1;
      border-radius: 10px;
      border: 1px solid #e4ddd2;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
    }

    .day.blank,
    .day.missing {
      border-style: dashed;
      background: transparent;
      cursor: default;
    }

    .day.blank {
      border: none;
    }

    .day.todo {
      background: white;
      color: #2f4858;
    }

    .day.done {
      background: #ff6b4a;
      border-color: #ff6b4a;
      color: white;
    }
  </style>
</head>
<body>
  <main class="calendar">
    <header>
      <h1>{{MONTH}} {{YEAR}}</h1>
      <p class="progress"><span id="progress">{{DONE}}</span> of {{TOTAL}} days done.</p>
    </header>

    <section class="grid">
{{CELLS}}    </section>
  </main>
</body>
</html>
"#;
