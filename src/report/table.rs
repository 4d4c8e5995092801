//! Diagnostic table rendering using comfy-table.

use std::io::{self, Write};

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, ContentArrangement, Table};

use crate::check::DomainVerdict;

/// Column headers, in display order.
pub const TABLE_HEADERS: [&str; 5] = [
    "Domain",
    "Cert issued for",
    "Valid until",
    "Issued by",
    "Problems",
];

/// Renders every verdict as one table row, in the order given.
///
/// With `color` set, the header is bold and rows with problems are red.
pub fn render_table(verdicts: &[DomainVerdict], color: bool) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if !color {
        table.force_no_tty();
    }

    let header_cells: Vec<Cell> = TABLE_HEADERS
        .iter()
        .map(|h| {
            let cell = Cell::new(h);
            if color {
                cell.add_attribute(Attribute::Bold).fg(Color::Cyan)
            } else {
                cell
            }
        })
        .collect();
    table.set_header(header_cells);

    for verdict in verdicts {
        let cells: Vec<Cell> = table_row(verdict)
            .into_iter()
            .map(|text| {
                let cell = Cell::new(text);
                if color && verdict.has_problems() {
                    cell.fg(Color::Red)
                } else {
                    cell
                }
            })
            .collect();
        table.add_row(cells);
    }

    table.to_string()
}

/// Writes the table followed by a newline.
pub fn write_table<W: Write>(out: &mut W, verdicts: &[DomainVerdict], color: bool) -> io::Result<()> {
    writeln!(out, "{}", render_table(verdicts, color))
}

/// Cell texts for one verdict, aligned with [`TABLE_HEADERS`].
pub fn table_row(verdict: &DomainVerdict) -> [String; 5] {
    let problems = verdict
        .problems()
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    [
        verdict.domain().to_string(),
        verdict.issued_for(),
        verdict.valid_until(),
        verdict.issued_by().to_string(),
        problems,
    ]
}
