use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::error;

use crate::core::{money, AppError, Result};
use crate::modules::reports::models::{OrderRecord, ReportArtifact};
use crate::modules::reports::services::pdf_layout::{
    self, LaidRow, BODY_FONT_SIZE, COLUMN_RIGHT_ALIGNED, COLUMN_TITLES, HEADER_FONT_SIZE,
    LINE_HEIGHT_MM, MARGIN_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, ROW_PADDING_MM,
};

/// Report output format. A closed set dispatched by enum, one renderer per
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Structured data, no layout applied
    Json,
    /// Flat tabular sheet
    Csv,
    /// Paginated document with fixed column layout
    Pdf,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Csv => write!(f, "csv"),
            ReportFormat::Pdf => write!(f, "pdf"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            "pdf" => Ok(ReportFormat::Pdf),
            other => Err(AppError::unsupported_format(other)),
        }
    }
}

impl ReportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Json => "application/json",
            ReportFormat::Csv => "text/csv",
            ReportFormat::Pdf => "application/pdf",
        }
    }

    /// Suggested download filename, stamped with the generation date
    pub fn filename(&self, generated_at: DateTime<Utc>) -> String {
        format!("revenue-report-{}.{}", generated_at.format("%Y-%m-%d"), self)
    }
}

/// Serialized body of the structured-data format
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    total_revenue: Decimal,
    orders: &'a [OrderRecord],
}

/// Render an immutable snapshot of order rows into one artifact.
///
/// The whole operation assembles a single byte buffer; there are no
/// partial or streamed results.
pub fn render(
    format: ReportFormat,
    rows: &[OrderRecord],
    total_revenue: Decimal,
    generated_at: DateTime<Utc>,
) -> Result<ReportArtifact> {
    let data = match format {
        ReportFormat::Json => render_json(rows, total_revenue)?,
        ReportFormat::Csv => render_csv(rows, total_revenue)?,
        ReportFormat::Pdf => render_pdf(rows, total_revenue)?,
    };

    Ok(ReportArtifact {
        data,
        content_type: format.content_type(),
        filename: format.filename(generated_at),
    })
}

/// Flatten a record into the four display columns. Missing text fields
/// render as "N/A"; a missing price renders as zero so the monetary column
/// always carries two decimal places.
fn display_row(record: &OrderRecord) -> [String; 4] {
    [
        record
            .course_name
            .clone()
            .unwrap_or_else(|| "N/A".to_string()),
        record
            .student_name
            .clone()
            .unwrap_or_else(|| "N/A".to_string()),
        money::format_usd(record.price_usd.unwrap_or(Decimal::ZERO)),
        record
            .created_at
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    ]
}

fn render_json(rows: &[OrderRecord], total_revenue: Decimal) -> Result<Vec<u8>> {
    let report = JsonReport {
        total_revenue: money::round_usd(total_revenue),
        orders: rows,
    };

    serde_json::to_vec(&report).map_err(|e| {
        error!("JSON report serialization failed: {}", e);
        AppError::report_generation("failed to serialize report data")
    })
}

fn render_csv(rows: &[OrderRecord], total_revenue: Decimal) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let write_err = |e: csv::Error| {
        error!("CSV report assembly failed: {}", e);
        AppError::report_generation("failed to assemble spreadsheet report")
    };

    writer
        .write_record(["Course Name", "Student Name", "Price (USD)", "Date"])
        .map_err(write_err)?;

    for record in rows {
        writer.write_record(&display_row(record)).map_err(write_err)?;
    }

    writer
        .write_record([
            "Total Revenue".to_string(),
            String::new(),
            money::format_usd(total_revenue),
            String::new(),
        ])
        .map_err(write_err)?;

    writer.into_inner().map_err(|e| {
        error!("CSV report flush failed: {}", e);
        AppError::report_generation("failed to assemble spreadsheet report")
    })
}

fn render_pdf(rows: &[OrderRecord], total_revenue: Decimal) -> Result<Vec<u8>> {
    let display_rows: Vec<[String; 4]> = rows.iter().map(display_row).collect();
    let pages = pdf_layout::paginate(&display_rows);

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Revenue Report",
        Mm(PAGE_WIDTH_MM as f32),
        Mm(PAGE_HEIGHT_MM as f32),
        "Layer 1",
    );

    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(|e| {
        error!("PDF font setup failed: {}", e);
        AppError::report_generation("failed to assemble document report")
    })?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| {
            error!("PDF font setup failed: {}", e);
            AppError::report_generation("failed to assemble document report")
        })?;

    let last_index = pages.len() - 1;
    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(
                Mm(PAGE_WIDTH_MM as f32),
                Mm(PAGE_HEIGHT_MM as f32),
                format!("Page {} Layer", index + 1),
            )
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        let mut y = draw_header(&layer, &bold);

        for row in &page.rows {
            y = draw_row(&layer, &font, row, y);
        }

        if index == last_index {
            y -= LINE_HEIGHT_MM;
            layer.use_text(
                format!("Total Revenue: {}", money::format_usd(total_revenue)),
                HEADER_FONT_SIZE as f32,
                Mm(MARGIN_MM as f32),
                Mm(y as f32),
                &bold,
            );
        }
    }

    doc.save_to_bytes().map_err(|e| {
        error!("PDF report assembly failed: {}", e);
        AppError::report_generation("failed to assemble document report")
    })
}

/// Draw the column header block; returns the y position below it
fn draw_header(layer: &PdfLayerReference, bold: &IndirectFontRef) -> f64 {
    let y = PAGE_HEIGHT_MM - MARGIN_MM - LINE_HEIGHT_MM;

    for (column, title) in COLUMN_TITLES.iter().enumerate() {
        let x = cell_x(column, title, HEADER_FONT_SIZE);
        layer.use_text(*title, HEADER_FONT_SIZE as f32, Mm(x as f32), Mm(y as f32), bold);
    }

    let rule_y = y - ROW_PADDING_MM;
    draw_rule(layer, rule_y);
    rule_y - ROW_PADDING_MM
}

/// Draw one wrapped row starting at `top`; returns the y position below
/// its separator rule
fn draw_row(layer: &PdfLayerReference, font: &IndirectFontRef, row: &LaidRow, top: f64) -> f64 {
    for (column, lines) in row.cells.iter().enumerate() {
        for (line_index, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let x = cell_x(column, line, BODY_FONT_SIZE);
            let y = top - LINE_HEIGHT_MM * (line_index + 1) as f64;
            layer.use_text(line.as_str(), BODY_FONT_SIZE as f32, Mm(x as f32), Mm(y as f32), font);
        }
    }

    let bottom = top - row.height_mm;
    draw_rule(layer, bottom);
    bottom - ROW_PADDING_MM
}

/// Left text origin for a cell, honoring the column's alignment
fn cell_x(column: usize, text: &str, font_size: f64) -> f64 {
    let left = pdf_layout::column_x_mm(column);
    if COLUMN_RIGHT_ALIGNED[column] {
        let right = left + pdf_layout::column_width_mm(column);
        (right - pdf_layout::text_width_mm(text, font_size)).max(left)
    } else {
        left
    }
}

fn draw_rule(layer: &PdfLayerReference, y: f64) {
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN_MM as f32), Mm(y as f32)), false),
            (Point::new(Mm((PAGE_WIDTH_MM - MARGIN_MM) as f32), Mm(y as f32)), false),
        ],
        is_closed: false,
    });
}
