//! Paginated PDF renderer.
//!
//! A4 landscape, one table row per employee, with a new page started before
//! a row would overflow the bottom margin. Built on `printpdf` with the
//! builtin Helvetica font so the output has no external dependencies.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::config::{TemplateRegistry, CUSTOM_CODE, DAY_OFF_CODE};
use crate::error::{EngineError, EngineResult};
use crate::grid::ScheduleGrid;

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 14.0;
const ROW_HEIGHT: f32 = 7.0;
const NAME_COL_WIDTH: f32 = 52.0;
const TITLE_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 9.0;

struct Page {
    layer: PdfLayerReference,
    cursor: f32,
    number: u32,
}

/// Writes the schedule as a paginated A4-landscape PDF and returns its
/// bytes.
///
/// # Errors
///
/// Returns [`EngineError::ExportError`] when document generation fails; no
/// partial output is produced.
pub fn write_document(grid: &ScheduleGrid, templates: &TemplateRegistry) -> EngineResult<Vec<u8>> {
    let title = format!("Weekly schedule — week of {}", grid.week_start);
    let (doc, page_idx, layer_idx) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "grid");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(export_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(export_err)?;

    let day_width = (PAGE_WIDTH - 2.0 * MARGIN - NAME_COL_WIDTH - 18.0) / grid.dates.len() as f32;
    let hours_x = MARGIN + NAME_COL_WIDTH + day_width * grid.dates.len() as f32;

    let mut page = Page {
        layer: doc.get_page(page_idx).get_layer(layer_idx),
        cursor: PAGE_HEIGHT - MARGIN,
        number: 1,
    };

    page.layer
        .use_text(&title, TITLE_SIZE, Mm(MARGIN), Mm(page.cursor), &bold);
    page.cursor -= ROW_HEIGHT * 1.5;

    let write_day_header = |page: &Page| {
        page.layer.use_text(
            "Employee",
            BODY_SIZE,
            Mm(MARGIN),
            Mm(page.cursor),
            &bold,
        );
        for (i, date) in grid.dates.iter().enumerate() {
            page.layer.use_text(
                date.format("%a %d/%m").to_string(),
                BODY_SIZE,
                Mm(MARGIN + NAME_COL_WIDTH + day_width * i as f32),
                Mm(page.cursor),
                &bold,
            );
        }
        page.layer
            .use_text("Hours", BODY_SIZE, Mm(hours_x), Mm(page.cursor), &bold);
    };

    write_day_header(&page);
    page.cursor -= ROW_HEIGHT;

    for group in &grid.groups {
        break_page_if_needed(&doc, &mut page, &font, 2.0 * ROW_HEIGHT, &write_day_header);
        page.layer
            .use_text(&group.label, BODY_SIZE, Mm(MARGIN), Mm(page.cursor), &bold);
        page.cursor -= ROW_HEIGHT;

        for row in &group.rows {
            break_page_if_needed(&doc, &mut page, &font, ROW_HEIGHT, &write_day_header);
            page.layer.use_text(
                &row.employee.full_name,
                BODY_SIZE,
                Mm(MARGIN + 2.0),
                Mm(page.cursor),
                &font,
            );
            for (i, date) in grid.dates.iter().enumerate() {
                let cell = &row.cells[date];
                let text = match cell.cell_type {
                    Some(code) => code.to_string(),
                    None if cell.is_on_leave => "L".to_string(),
                    None => String::new(),
                };
                if !text.is_empty() {
                    page.layer.use_text(
                        text,
                        BODY_SIZE,
                        Mm(MARGIN + NAME_COL_WIDTH + day_width * i as f32),
                        Mm(page.cursor),
                        &font,
                    );
                }
            }
            page.layer.use_text(
                row.total_hours.to_string(),
                BODY_SIZE,
                Mm(hours_x),
                Mm(page.cursor),
                &font,
            );
            page.cursor -= ROW_HEIGHT;
        }
    }

    break_page_if_needed(&doc, &mut page, &font, 2.0 * ROW_HEIGHT, &write_day_header);
    page.layer.use_text(
        "Staff / hours",
        BODY_SIZE,
        Mm(MARGIN),
        Mm(page.cursor),
        &bold,
    );
    for (i, date) in grid.dates.iter().enumerate() {
        let total = &grid.daily_totals[date];
        page.layer.use_text(
            format!("{}/{}", total.staff, total.hours),
            BODY_SIZE,
            Mm(MARGIN + NAME_COL_WIDTH + day_width * i as f32),
            Mm(page.cursor),
            &bold,
        );
    }
    page.layer.use_text(
        grid.grand_total.hours.to_string(),
        BODY_SIZE,
        Mm(hours_x),
        Mm(page.cursor),
        &bold,
    );
    page.cursor -= ROW_HEIGHT * 2.0;

    break_page_if_needed(
        &doc,
        &mut page,
        &font,
        ROW_HEIGHT * (templates.templates.len() as f32 + 2.0),
        &write_day_header,
    );
    page.layer
        .use_text("Legend", BODY_SIZE, Mm(MARGIN), Mm(page.cursor), &bold);
    page.cursor -= ROW_HEIGHT;
    for (code, tpl) in &templates.templates {
        let line = if *code == DAY_OFF_CODE {
            format!("{code} = {}", tpl.label)
        } else {
            format!(
                "{code} = {} ({}–{})",
                tpl.label,
                tpl.start.format("%H:%M"),
                tpl.end.format("%H:%M")
            )
        };
        page.layer
            .use_text(line, BODY_SIZE, Mm(MARGIN), Mm(page.cursor), &font);
        page.cursor -= ROW_HEIGHT;
    }
    page.layer.use_text(
        format!("{CUSTOM_CODE} = Custom times"),
        BODY_SIZE,
        Mm(MARGIN),
        Mm(page.cursor),
        &font,
    );

    write_footer(&page, &font);

    doc.save_to_bytes().map_err(export_err)
}

fn break_page_if_needed(
    doc: &printpdf::PdfDocumentReference,
    page: &mut Page,
    font: &IndirectFontRef,
    needed: f32,
    write_header: &impl Fn(&Page),
) {
    if page.cursor - needed > MARGIN {
        return;
    }
    write_footer(page, font);
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "grid");
    page.layer = doc.get_page(page_idx).get_layer(layer_idx);
    page.cursor = PAGE_HEIGHT - MARGIN;
    page.number += 1;
    write_header(page);
    page.cursor -= ROW_HEIGHT;
}

fn write_footer(page: &Page, font: &IndirectFontRef) {
    page.layer.use_text(
        format!("Page {}", page.number),
        8.0,
        Mm(PAGE_WIDTH - MARGIN - 12.0),
        Mm(MARGIN / 2.0),
        font,
    );
}

fn export_err(e: impl std::fmt::Display) -> EngineError {
    EngineError::ExportError {
        message: e.to_string(),
    }
}
