//! Text rendering of the calendar, the selected day and its advice

use std::fmt::Write;

use chrono::{Datelike, NaiveDate};

use crate::advice::Advice;
use crate::calendar::CalendarData;
use crate::month::TargetMonth;
use crate::scoring::Badge;
use crate::todo::Todo;

const WEEK_DAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const CELL_WIDTH: usize = 9;

/// Whether the user is offered a control to delete this todo.
/// Plan items never are
pub fn can_delete(todo: &Todo) -> bool {
    !todo.is_ai_generated()
}

fn badge_mark(badge: Option<Badge>) -> &'static str {
    match badge {
        Some(Badge::Great) => "**",
        Some(Badge::Good) => "*",
        None => "",
    }
}

/// The month as a Sunday-first grid.
///
/// Each cell shows the day number, its completion badge (`**` for great, `*` for good) and how many todos are done, e.g. `12** 3/3`.
/// The selected day is bracketed.
pub fn month_grid(month: &TargetMonth, calendar: &CalendarData, selected: Option<NaiveDate>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", month);
    let _ = writeln!(out, "Legend: ** Great (90%+)  * Good (60%+)");

    let header: Vec<String> = WEEK_DAYS.iter().map(|d| format!("{:<width$}", d, width = CELL_WIDTH)).collect();
    let _ = writeln!(out, "{}", header.join(" ").trim_end());

    let mut cells: Vec<String> = (0..month.leading_blanks()).map(|_| String::new()).collect();
    for date in month.days() {
        let todos = calendar.todos(date);
        let mut cell = format!("{}{}", date.day(), badge_mark(calendar.badge(date)));
        if !todos.is_empty() {
            let done = todos.iter().filter(|t| t.completed()).count();
            let _ = write!(cell, " {}/{}", done, todos.len());
        }
        if Some(date) == selected {
            cell = format!("[{}]", cell);
        }
        cells.push(cell);
    }

    for week in cells.chunks(7) {
        let line: Vec<String> = week.iter().map(|c| format!("{:<width$}", c, width = CELL_WIDTH)).collect();
        let _ = writeln!(out, "{}", line.join(" ").trim_end());
    }
    out
}

/// The todo list of a day.
///
/// Plan items are tagged `(plan)`. User items end with their ID, which is what the delete command expects
pub fn day_detail(date: NaiveDate, todos: &[Todo]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", date.format("%A, %B %-d"));
    if todos.is_empty() {
        let _ = writeln!(out, "  Nothing to do");
        return out;
    }
    for todo in todos {
        let check = if todo.completed() { "x" } else { " " };
        let _ = write!(out, "  [{}] {}", check, todo.text());
        if todo.is_ai_generated() {
            let _ = write!(out, " (plan)");
        }
        let _ = write!(out, "  <{}>", todo.id());
        if can_delete(todo) == false {
            let _ = write!(out, " locked");
        }
        let _ = writeln!(out);
    }
    out
}

/// The strategist's panel: a loading message, the advice, or nothing
pub fn advice_panel(advice: Option<&Advice>, is_loading: bool) -> String {
    if is_loading {
        return "Consulting the strategist...\n".to_string();
    }
    match advice {
        None => String::new(),
        Some(advice) => format!(
            "Today's move:    {}\nBeware:          {}\nEncouragement:   \"{}\"\n",
            advice.todo, advice.caution, advice.motivation
        ),
    }
}
