//! Fixed-grid drawing of DTR documents.
//!
//! One page per document. Each page draws the same document twice at the
//! configured block origins; the printed form is signed in duplicate. The
//! period total is drawn only on the right-hand copy.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};
use thiserror::Error;

use dtr_service::DtrDocument;

use crate::layout::PageGeometry;

const PT_TO_MM: f64 = 0.352_778;
/// Rough Helvetica advance width per glyph, in em, used for centering.
const GLYPH_WIDTH_EM: f64 = 0.5;

const CAPTION_FONT_SIZE: f64 = 5.0;

/// Errors producing or saving the PDF artifact.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No documents to render")]
    EmptyBatch,

    #[error("PDF drawing error: {0}")]
    Pdf(String),

    #[error("File I/O error: {0}")]
    FileIO(#[from] std::io::Error),
}

impl From<RenderError> for error::AppError {
    fn from(err: RenderError) -> Self {
        error::AppError::Render(err.to_string())
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Render the documents into a complete PDF, one page per document.
pub fn render(
    documents: &[DtrDocument],
    geometry: &PageGeometry,
    official_hours: &str,
) -> Result<Vec<u8>, RenderError> {
    if documents.is_empty() {
        return Err(RenderError::EmptyBatch);
    }

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Daily Time Records",
        Mm(geometry.page_width),
        Mm(geometry.page_height),
        "Layer 1",
    );
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
    };

    for (index, document) in documents.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(
                Mm(geometry.page_width),
                Mm(geometry.page_height),
                "Layer 1",
            )
        };
        let layer = doc.get_page(page).get_layer(layer);
        layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        layer.set_outline_thickness(0.4);

        draw_block(
            &layer,
            document,
            geometry,
            &fonts,
            geometry.block_x[0],
            official_hours,
            false,
        );
        draw_block(
            &layer,
            document,
            geometry,
            &fonts,
            geometry.block_x[1],
            official_hours,
            true,
        );
    }

    doc.save_to_bytes().map_err(|e| RenderError::Pdf(e.to_string()))
}

/// Draw one DTR block with its left edge at `origin_x`.
fn draw_block(
    layer: &PdfLayerReference,
    document: &DtrDocument,
    geometry: &PageGeometry,
    fonts: &Fonts,
    origin_x: f64,
    official_hours: &str,
    show_total: bool,
) {
    let width = geometry.block_width();
    let center = origin_x + width / 2.0;
    let mut y = geometry.page_height - geometry.block_top;

    text_centered(
        layer,
        "DAILY TIME RECORD",
        &fonts.bold,
        geometry.title_font_size,
        center,
        y,
    );
    y -= 9.0;

    text_centered(layer, &document.employee_name, &fonts.bold, 8.0, center, y);
    hline(layer, origin_x + 8.0, origin_x + width - 8.0, y - 1.2);
    y -= 4.0;
    text_centered(layer, "(Name)", &fonts.regular, CAPTION_FONT_SIZE, center, y);
    y -= 7.0;

    layer.use_text(
        format!(
            "For the month of: {} {}",
            document.month_name, document.year
        ),
        geometry.body_font_size,
        Mm(origin_x),
        Mm(y),
        &fonts.regular,
    );
    y -= 4.5;
    layer.use_text(
        format!("Official hours for arrival and departure: {}", official_hours),
        geometry.body_font_size,
        Mm(origin_x),
        Mm(y),
        &fonts.regular,
    );
    y -= 6.0;

    y = draw_table(layer, document, geometry, fonts, origin_x, y, show_total);

    y -= 6.0;
    layer.use_text(
        "I certify on my honor that the above is a true and",
        geometry.body_font_size,
        Mm(origin_x),
        Mm(y),
        &fonts.regular,
    );
    y -= 3.5;
    layer.use_text(
        "correct report of the hours of work performed.",
        geometry.body_font_size,
        Mm(origin_x),
        Mm(y),
        &fonts.regular,
    );
    y -= 9.0;
    hline(layer, origin_x + 8.0, origin_x + width - 8.0, y);
    y -= 3.5;
    text_centered(layer, "Signature", &fonts.regular, CAPTION_FONT_SIZE, center, y);
    y -= 9.0;
    hline(layer, origin_x + 8.0, origin_x + width - 8.0, y);
    y -= 3.5;
    text_centered(layer, "In-Charge", &fonts.regular, CAPTION_FONT_SIZE, center, y);
}

/// Draw the record table starting at `top_y`; returns the table bottom.
fn draw_table(
    layer: &PdfLayerReference,
    document: &DtrDocument,
    geometry: &PageGeometry,
    fonts: &Fonts,
    origin_x: f64,
    top_y: f64,
    show_total: bool,
) -> f64 {
    let width = geometry.block_width();
    let row = geometry.row_height;
    let header_height = row * 2.0;
    let day_rows = document.daily_records.len();
    let bottom_y = top_y - header_height - (day_rows as f64 + 1.0) * row;

    // horizontal rules: table top, header split, header bottom and every row
    hline(layer, origin_x, origin_x + width, top_y);
    hline(
        layer,
        origin_x + geometry.column_offset(1),
        origin_x + width,
        top_y - row,
    );
    for index in 0..=(day_rows + 1) {
        let y = top_y - header_height - index as f64 * row;
        hline(layer, origin_x, origin_x + width, y);
    }

    // vertical rules: group boundaries run the full height, sub-column
    // boundaries start below the group caption row
    for column in [0, 1, 3, 5, 7] {
        let x = origin_x + geometry.column_offset(column);
        vline(layer, x, top_y, bottom_y);
    }
    for column in [2, 4, 6] {
        let x = origin_x + geometry.column_offset(column);
        vline(layer, x, top_y - row, bottom_y);
    }

    // header captions
    let group_baseline = top_y - row * 0.7;
    let sub_baseline = top_y - row - row * 0.7;
    span_text(layer, "Day", &fonts.bold, CAPTION_FONT_SIZE, geometry, origin_x, 0, 1, top_y - header_height * 0.6);
    span_text(layer, "A.M.", &fonts.bold, CAPTION_FONT_SIZE, geometry, origin_x, 1, 3, group_baseline);
    span_text(layer, "P.M.", &fonts.bold, CAPTION_FONT_SIZE, geometry, origin_x, 3, 5, group_baseline);
    span_text(layer, "Undertime", &fonts.bold, CAPTION_FONT_SIZE, geometry, origin_x, 5, 7, group_baseline);
    for (column, caption) in [
        (1, "Arrival"),
        (2, "Departure"),
        (3, "Arrival"),
        (4, "Departure"),
        (5, "Hours"),
        (6, "Minutes"),
    ] {
        span_text(
            layer,
            caption,
            &fonts.regular,
            CAPTION_FONT_SIZE,
            geometry,
            origin_x,
            column,
            column + 1,
            sub_baseline,
        );
    }

    // one row per daily record, ascending
    for (index, record) in document.daily_records.iter().enumerate() {
        let baseline = top_y - header_height - index as f64 * row - row * 0.7;
        let cells = [
            record.day.to_string(),
            record.am_arrival.clone().unwrap_or_default(),
            record.am_departure.clone().unwrap_or_default(),
            record.pm_arrival.clone().unwrap_or_default(),
            record.pm_departure.clone().unwrap_or_default(),
            record.undertime_hours_display(),
            record.undertime_minutes_display(),
        ];
        for (column, cell) in cells.iter().enumerate() {
            span_text(
                layer,
                cell,
                &fonts.regular,
                geometry.cell_font_size,
                geometry,
                origin_x,
                column,
                column + 1,
                baseline,
            );
        }
    }

    // total row; the value is drawn on the right-hand copy only
    let total_baseline = top_y - header_height - day_rows as f64 * row - row * 0.7;
    span_text(layer, "TOTAL", &fonts.bold, geometry.cell_font_size, geometry, origin_x, 0, 5, total_baseline);
    if show_total {
        span_text(
            layer,
            &document.totals.total_undertime(),
            &fonts.bold,
            geometry.cell_font_size,
            geometry,
            origin_x,
            5,
            7,
            total_baseline,
        );
    }

    bottom_y
}

/// Draw text centered over the columns `[first, last)`.
#[allow(clippy::too_many_arguments)]
fn span_text(
    layer: &PdfLayerReference,
    text: &str,
    font: &IndirectFontRef,
    font_size: f64,
    geometry: &PageGeometry,
    origin_x: f64,
    first: usize,
    last: usize,
    baseline_y: f64,
) {
    if text.is_empty() {
        return;
    }
    let left = origin_x + geometry.column_offset(first);
    let span = geometry.column_offset(last) - geometry.column_offset(first);
    let x = left + (span - text_width_mm(text, font_size)) / 2.0;
    layer.use_text(text, font_size, Mm(x), Mm(baseline_y), font);
}

fn text_centered(
    layer: &PdfLayerReference,
    text: &str,
    font: &IndirectFontRef,
    font_size: f64,
    center_x: f64,
    baseline_y: f64,
) {
    let x = center_x - text_width_mm(text, font_size) / 2.0;
    layer.use_text(text, font_size, Mm(x), Mm(baseline_y), font);
}

fn text_width_mm(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * GLYPH_WIDTH_EM * PT_TO_MM
}

fn hline(layer: &PdfLayerReference, x1: f64, x2: f64, y: f64) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
}

fn vline(layer: &PdfLayerReference, x: f64, y1: f64, y2: f64) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x), Mm(y1)), false),
            (Point::new(Mm(x), Mm(y2)), false),
        ],
        is_closed: false,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtr_service::{build_daily_records, CutoffPeriod, DtrDocument, DtrTotals};

    fn sample_document() -> DtrDocument {
        let period = CutoffPeriod::parse("Oct 1 - 15, 2025").unwrap();
        let daily_records = build_daily_records(&[], &period);
        let totals = DtrTotals::from_records(&daily_records);
        DtrDocument {
            employee_id: "EMP001".to_string(),
            employee_name: "Juan L. Dela Cruz".to_string(),
            department: "Accounting".to_string(),
            cutoff_label: period.label(),
            month_name: period.month_name().to_string(),
            year: period.year,
            daily_records,
            totals,
        }
    }

    #[test]
    fn test_render_empty_batch_is_an_error() {
        let result = render(&[], &PageGeometry::default(), "8:00 AM - 5:00 PM");
        assert!(matches!(result, Err(RenderError::EmptyBatch)));
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render(
            &[sample_document()],
            &PageGeometry::default(),
            "8:00 AM - 5:00 PM",
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_render_one_page_per_document() {
        let one = render(
            &[sample_document()],
            &PageGeometry::default(),
            "8:00 AM - 5:00 PM",
        )
        .unwrap();
        let three = render(
            &[sample_document(), sample_document(), sample_document()],
            &PageGeometry::default(),
            "8:00 AM - 5:00 PM",
        )
        .unwrap();

        let count_pages = |bytes: &[u8]| {
            let haystack = String::from_utf8_lossy(bytes).into_owned();
            haystack.matches("/Type /Page").count() - haystack.matches("/Type /Pages").count()
        };
        assert_eq!(count_pages(&one), 1);
        assert_eq!(count_pages(&three), 3);
    }
}
