//! Static HTML print view.
//!
//! Produces a self-contained HTML document suited to the browser's print
//! dialog. No scripts, no external assets; identical input produces
//! byte-identical output.

use chrono::NaiveDate;
use std::fmt::Write;

use crate::config::{TemplateRegistry, CUSTOM_CODE, DAY_OFF_CODE};
use crate::grid::{GridCell, ScheduleGrid};

/// Which view the print renderer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// The full week, one column per day.
    Weekly,
    /// A single day with shift times spelled out.
    Daily(NaiveDate),
}

/// Renders the schedule as a printable HTML document.
///
/// Totals are taken from the grid as-is; the renderer never recomputes
/// hours or costs.
pub fn render_print_view(
    grid: &ScheduleGrid,
    templates: &TemplateRegistry,
    mode: PrintMode,
) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<style>\n");
    html.push_str("body { font-family: sans-serif; font-size: 12px; }\n");
    html.push_str("table { border-collapse: collapse; width: 100%; }\n");
    html.push_str("th, td { border: 1px solid #999; padding: 4px 6px; text-align: center; }\n");
    html.push_str("th { background: #eee; }\n");
    html.push_str(".dept { background: #ddd; text-align: left; font-weight: bold; }\n");
    html.push_str(".name { text-align: left; }\n");
    html.push_str(".off { color: #999; }\n");
    html.push_str(".totals { font-weight: bold; background: #f5f5f5; }\n");
    html.push_str(".legend { margin-top: 12px; font-size: 11px; }\n");
    html.push_str("</style>\n</head>\n<body>\n");

    match mode {
        PrintMode::Weekly => render_weekly(&mut html, grid),
        PrintMode::Daily(date) => render_daily(&mut html, grid, date),
    }

    render_legend(&mut html, templates);
    html.push_str("</body>\n</html>\n");
    html
}

fn render_weekly(html: &mut String, grid: &ScheduleGrid) {
    let _ = writeln!(
        html,
        "<h1>Weekly schedule — week of {}</h1>",
        grid.week_start
    );
    html.push_str("<table>\n<tr><th class=\"name\">Employee</th>");
    for date in &grid.dates {
        let _ = write!(html, "<th>{}</th>", date.format("%a %d/%m"));
    }
    html.push_str("<th>Hours</th></tr>\n");

    for group in &grid.groups {
        let _ = writeln!(
            html,
            "<tr><td class=\"dept\" colspan=\"{}\">{}</td></tr>",
            grid.dates.len() + 2,
            escape(&group.label)
        );
        for row in &group.rows {
            let _ = write!(
                html,
                "<tr><td class=\"name\">{}</td>",
                escape(&row.employee.full_name)
            );
            for date in &grid.dates {
                let cell = &row.cells[date];
                let _ = write!(html, "<td>{}</td>", cell_code(cell));
            }
            let _ = writeln!(html, "<td>{}</td></tr>", row.total_hours);
        }
    }

    html.push_str("<tr class=\"totals\"><td class=\"name\">Staff / hours</td>");
    for date in &grid.dates {
        let total = &grid.daily_totals[date];
        let _ = write!(html, "<td>{} / {}</td>", total.staff, total.hours);
    }
    let _ = writeln!(html, "<td>{}</td></tr>", grid.grand_total.hours);
    html.push_str("</table>\n");

    let _ = writeln!(
        html,
        "<p>Total: {}h across {} employees.</p>",
        grid.grand_total.hours, grid.grand_total.employees
    );
}

fn render_daily(html: &mut String, grid: &ScheduleGrid, date: NaiveDate) {
    let _ = writeln!(html, "<h1>Daily schedule — {}</h1>", date.format("%A %d/%m/%Y"));
    html.push_str("<table>\n<tr><th class=\"name\">Employee</th><th>Shift</th><th>Times</th><th>Hours</th></tr>\n");

    for group in &grid.groups {
        let working: Vec<_> = group
            .rows
            .iter()
            .filter_map(|row| {
                row.cells
                    .get(&date)
                    .filter(|c| c.is_working())
                    .map(|c| (row, c))
            })
            .collect();
        if working.is_empty() {
            continue;
        }

        let _ = writeln!(
            html,
            "<tr><td class=\"dept\" colspan=\"4\">{}</td></tr>",
            escape(&group.label)
        );
        for (row, cell) in working {
            let shift = cell.shift.as_ref();
            let times = shift.map(shift_times).unwrap_or_default();
            let hours = shift
                .map(|s| s.worked_hours().to_string())
                .unwrap_or_default();
            let _ = writeln!(
                html,
                "<tr><td class=\"name\">{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&row.employee.full_name),
                cell_code(cell),
                times,
                hours
            );
        }
    }

    if let Some(total) = grid.daily_totals.get(&date) {
        let _ = writeln!(
            html,
            "<tr class=\"totals\"><td class=\"name\">Total</td><td></td><td>{} staff</td><td>{}</td></tr>",
            total.staff, total.hours
        );
    }
    html.push_str("</table>\n");
}

fn render_legend(html: &mut String, templates: &TemplateRegistry) {
    html.push_str("<div class=\"legend\"><strong>Legend:</strong> ");
    let mut parts: Vec<String> = templates
        .templates
        .iter()
        .map(|(code, tpl)| {
            if *code == DAY_OFF_CODE {
                format!("{code} = {}", escape(&tpl.label))
            } else {
                format!(
                    "{code} = {} ({}–{})",
                    escape(&tpl.label),
                    tpl.start.format("%H:%M"),
                    tpl.end.format("%H:%M")
                )
            }
        })
        .collect();
    parts.push(format!("{CUSTOM_CODE} = Custom times"));
    html.push_str(&parts.join(", "));
    html.push_str("</div>\n");
}

fn cell_code(cell: &GridCell) -> String {
    match cell.cell_type {
        Some(code) if code == DAY_OFF_CODE => format!("<span class=\"off\">{code}</span>"),
        Some(code) => code.to_string(),
        None if cell.is_on_leave => "<span class=\"off\">L</span>".to_string(),
        None => String::new(),
    }
}

fn shift_times(shift: &crate::models::Shift) -> String {
    let mut times = format!(
        "{}–{}",
        shift.start_time.format("%H:%M"),
        shift.end_time.format("%H:%M")
    );
    if let (Some(start), Some(end)) = (shift.second_start_time, shift.second_end_time) {
        let _ = write!(times, " / {}–{}", start.format("%H:%M"), end.format("%H:%M"));
    }
    times
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
