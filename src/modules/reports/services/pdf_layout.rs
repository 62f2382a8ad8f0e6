// Pure layout step for the paginated document renderer.
//
// Everything here is deterministic arithmetic over strings: wrapping text
// into column widths, measuring row heights, and splitting rows across
// pages. The drawing code consumes the resulting pages; keeping layout
// separate means the pagination invariants are testable without decoding
// PDF output.

/// A4 portrait, millimetres
pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;
pub const MARGIN_MM: f64 = 15.0;

pub const BODY_FONT_SIZE: f64 = 10.0;
pub const HEADER_FONT_SIZE: f64 = 11.0;

/// Vertical advance per wrapped text line
pub const LINE_HEIGHT_MM: f64 = 5.0;
/// Breathing room under each row, above its separator rule
pub const ROW_PADDING_MM: f64 = 2.0;
/// Column header line plus its separator rule and padding
pub const HEADER_BLOCK_MM: f64 = 9.0;
/// Bold total line emitted after the last data row
pub const TRAILER_BLOCK_MM: f64 = 10.0;

/// Column order and widths are fixed: course takes the widest slot, the
/// two numeric-ish columns are narrow and right-aligned.
pub const COLUMN_TITLES: [&str; 4] = ["Course", "Student", "Price (USD)", "Date"];
pub const COLUMN_FRACTIONS: [f64; 4] = [0.42, 0.27, 0.13, 0.13];
pub const COLUMN_RIGHT_ALIGNED: [bool; 4] = [false, false, true, true];

/// Average Helvetica glyph advance as a fraction of the font size
const GLYPH_ADVANCE: f64 = 0.52;
const PT_PER_MM: f64 = 2.834_646;

/// Printable width between the margins
pub fn printable_width_mm() -> f64 {
    PAGE_WIDTH_MM - 2.0 * MARGIN_MM
}

/// Width of one column in millimetres
pub fn column_width_mm(column: usize) -> f64 {
    printable_width_mm() * COLUMN_FRACTIONS[column]
}

/// Left edge of one column in millimetres from the page's left side
pub fn column_x_mm(column: usize) -> f64 {
    let offset: f64 = COLUMN_FRACTIONS[..column].iter().sum::<f64>();
    MARGIN_MM + printable_width_mm() * offset
}

/// Estimated rendered width of a string at the given font size
pub fn text_width_mm(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * GLYPH_ADVANCE / PT_PER_MM
}

/// Characters that fit into `width_mm` at the given font size
pub fn max_chars(width_mm: f64, font_size: f64) -> usize {
    let per_char_mm = font_size * GLYPH_ADVANCE / PT_PER_MM;
    ((width_mm / per_char_mm).floor() as usize).max(1)
}

/// Greedy word wrap into lines of at most `limit` characters; words longer
/// than a full line are hard-split.
pub fn wrap_text(text: &str, limit: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > limit {
            // flush whatever is pending, then split the oversized word
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split_at = word
                .char_indices()
                .nth(limit)
                .map(|(idx, _)| idx)
                .unwrap_or(word.len());
            lines.push(word[..split_at].to_string());
            word = &word[split_at..];
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > limit && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// One data row after wrapping: per-column lines plus the measured height
#[derive(Debug, Clone)]
pub struct LaidRow {
    pub cells: [Vec<String>; 4],
    pub height_mm: f64,
}

/// Wrap a raw row's cells into their columns and measure the row height
pub fn lay_out_row(cells: &[String; 4]) -> LaidRow {
    let wrapped: [Vec<String>; 4] = std::array::from_fn(|column| {
        wrap_text(
            &cells[column],
            max_chars(column_width_mm(column), BODY_FONT_SIZE),
        )
    });

    let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(1);
    LaidRow {
        cells: wrapped,
        height_mm: line_count as f64 * LINE_HEIGHT_MM + ROW_PADDING_MM,
    }
}

/// One rendered page worth of rows. Every page re-emits the column header
/// above its first row; that space is reserved here, drawn later.
#[derive(Debug, Clone)]
pub struct Page {
    pub rows: Vec<LaidRow>,
}

/// Split rows across pages.
///
/// A row moves to a fresh page whenever it would overflow the printable
/// area below the header block. The trailer (total line) needs room after
/// the final row; when the last page cannot hold it, an extra page is
/// appended for it. Always returns at least one page.
pub fn paginate(rows: &[[String; 4]]) -> Vec<Page> {
    let usable_mm = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM - HEADER_BLOCK_MM;

    let mut pages: Vec<Page> = Vec::new();
    let mut current = Page { rows: Vec::new() };
    let mut used_mm = 0.0;

    for cells in rows {
        let row = lay_out_row(cells);
        if used_mm + row.height_mm > usable_mm && !current.rows.is_empty() {
            pages.push(std::mem::replace(&mut current, Page { rows: Vec::new() }));
            used_mm = 0.0;
        }
        used_mm += row.height_mm;
        current.rows.push(row);
    }

    if used_mm + TRAILER_BLOCK_MM > usable_mm && !current.rows.is_empty() {
        pages.push(current);
        current = Page { rows: Vec::new() };
    }
    pages.push(current);

    pages
}
