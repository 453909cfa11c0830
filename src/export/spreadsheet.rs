//! XLSX workbook renderer.

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};

use crate::config::{TemplateRegistry, CUSTOM_CODE, DAY_OFF_CODE};
use crate::error::EngineResult;
use crate::grid::ScheduleGrid;

// Fill colors assigned to template codes in registry order.
const CODE_FILLS: [u32; 6] = [
    0xDDEBF7, 0xFCE4D6, 0xE2EFDA, 0xFFF2CC, 0xD9E1F2, 0xEDEDED,
];

/// Writes the schedule as an XLSX workbook and returns its bytes.
///
/// Layout: title row, day header, department bands with one row per
/// employee, a totals row, and a legend. Cells carry the template code with
/// a per-code fill; totals come from the grid unchanged.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::ExportError`] when workbook
/// generation fails; no partial output is produced.
pub fn write_spreadsheet(grid: &ScheduleGrid, templates: &TemplateRegistry) -> EngineResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Schedule")?;

    let title_format = Format::new().set_bold().set_font_size(14);
    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_background_color(Color::RGB(0xD9D9D9))
        .set_border(FormatBorder::Thin);
    let dept_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xBFBFBF))
        .set_border(FormatBorder::Thin);
    let name_format = Format::new().set_border(FormatBorder::Thin);
    let plain_cell = Format::new()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    let totals_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_background_color(Color::RGB(0xF2F2F2))
        .set_border(FormatBorder::Thin);

    let code_formats: Vec<(char, Format)> = templates
        .templates
        .keys()
        .enumerate()
        .map(|(i, code)| {
            let fill = CODE_FILLS[i % CODE_FILLS.len()];
            (
                *code,
                Format::new()
                    .set_align(FormatAlign::Center)
                    .set_background_color(Color::RGB(fill))
                    .set_border(FormatBorder::Thin),
            )
        })
        .collect();
    let format_for = |code: char| {
        code_formats
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, f)| f)
            .unwrap_or(&plain_cell)
    };

    let day_count = grid.dates.len() as u16;
    sheet.set_column_width(0, 24)?;
    for col in 1..=day_count {
        sheet.set_column_width(col, 10)?;
    }

    sheet.merge_range(
        0,
        0,
        0,
        day_count + 1,
        &format!("Weekly schedule — week of {}", grid.week_start),
        &title_format,
    )?;

    let mut row: u32 = 2;
    sheet.write_string_with_format(row, 0, "Employee", &header_format)?;
    for (i, date) in grid.dates.iter().enumerate() {
        sheet.write_string_with_format(
            row,
            i as u16 + 1,
            &date.format("%a %d/%m").to_string(),
            &header_format,
        )?;
    }
    sheet.write_string_with_format(row, day_count + 1, "Hours", &header_format)?;
    row += 1;

    for group in &grid.groups {
        sheet.merge_range(row, 0, row, day_count + 1, &group.label, &dept_format)?;
        row += 1;

        for grid_row in &group.rows {
            sheet.write_string_with_format(row, 0, &grid_row.employee.full_name, &name_format)?;
            for (i, date) in grid.dates.iter().enumerate() {
                let cell = &grid_row.cells[date];
                let col = i as u16 + 1;
                match cell.cell_type {
                    Some(code) => sheet.write_string_with_format(
                        row,
                        col,
                        &code.to_string(),
                        format_for(code),
                    )?,
                    None => sheet.write_blank(row, col, &plain_cell)?,
                };
            }
            sheet.write_number_with_format(
                row,
                day_count + 1,
                grid_row.total_hours.to_f64().unwrap_or(0.0),
                &plain_cell,
            )?;
            row += 1;
        }
    }

    sheet.write_string_with_format(row, 0, "Staff / hours", &totals_format)?;
    for (i, date) in grid.dates.iter().enumerate() {
        let total = &grid.daily_totals[date];
        sheet.write_string_with_format(
            row,
            i as u16 + 1,
            &format!("{} / {}", total.staff, total.hours),
            &totals_format,
        )?;
    }
    sheet.write_number_with_format(
        row,
        day_count + 1,
        grid.grand_total.hours.to_f64().unwrap_or(0.0),
        &totals_format,
    )?;
    row += 2;

    sheet.write_string_with_format(row, 0, "Legend", &Format::new().set_bold())?;
    row += 1;
    for (code, tpl) in &templates.templates {
        sheet.write_string_with_format(row, 0, &code.to_string(), format_for(*code))?;
        let description = if *code == DAY_OFF_CODE {
            tpl.label.clone()
        } else {
            format!(
                "{} ({}–{})",
                tpl.label,
                tpl.start.format("%H:%M"),
                tpl.end.format("%H:%M")
            )
        };
        sheet.write_string(row, 1, &description)?;
        row += 1;
    }
    sheet.write_string_with_format(row, 0, &CUSTOM_CODE.to_string(), &plain_cell)?;
    sheet.write_string(row, 1, "Custom times")?;

    Ok(workbook.save_to_buffer()?)
}
