//! Bordered table presenter

use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL,
};

use crate::scan::SizeRecord;
use crate::units::format_size;

use super::config::OutputConfig;

/// Build the results table. Styling is emitted only when `use_color` is set,
/// whatever the output stream is.
pub fn create_results_table(records: &[SizeRecord], config: &OutputConfig) -> Table {
    let mut table = Table::new();
    if config.use_color {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }

    let mut header = vec![header_cell("Location")];
    if config.show_size {
        header.push(header_cell("Size"));
    }

    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for record in records {
        let location = Cell::new(record.path.display());
        if config.show_size {
            table.add_row(vec![location, Cell::new(format_size(record.size_bytes))]);
        } else {
            table.add_row(vec![location]);
        }
    }

    if config.show_size {
        if let Some(column) = table.column_mut(1) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    table
}

fn header_cell(title: &str) -> Cell {
    Cell::new(title)
        .fg(Color::Magenta)
        .add_attribute(Attribute::Bold)
}
