use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabsift_cli::types::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("Source: {}", result.source_dir.display());
    println!("Output: {}", result.output_dir.display());
    if let Some(combined) = &result.combined {
        println!("Combined: {}", combined.path.display());
    }
    println!("{}", run_table(result));
    if let Some(table) = label_table(result) {
        println!();
        println!("Classification:");
        println!("{table}");
    }
    if !result.errors.is_empty() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

fn run_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Step"), header_cell("Result")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    table.add_row(vec![Cell::new("Files processed"), Cell::new(result.processed_count())]);
    table.add_row(vec![
        Cell::new("Files failed"),
        count_cell(result.failed_count(), Color::Red),
    ]);
    match &result.combined {
        Some(combined) => {
            table.add_row(vec![Cell::new("Combined rows"), Cell::new(combined.rows)]);
            table.add_row(vec![
                Cell::new("Target column"),
                Cell::new(&combined.target_column).fg(Color::Blue),
            ]);
        }
        None => {
            table.add_row(vec![Cell::new("Combined rows"), dim_cell("-")]);
            table.add_row(vec![Cell::new("Target column"), dim_cell("-")]);
        }
    }
    let distinct = match &result.classification {
        Some(classification) => Cell::new(classification.distinct_values),
        None => dim_cell("-"),
    };
    table.add_row(vec![Cell::new("Distinct values"), distinct]);
    table
}

fn label_table(result: &RunResult) -> Option<Table> {
    let classification = result.classification.as_ref()?;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Classification"), header_cell("Values")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, count) in &classification.label_counts {
        table.add_row(vec![label_cell(label), Cell::new(count)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(classification.distinct_values).add_attribute(Attribute::Bold),
    ]);
    Some(table)
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn label_cell(label: &str) -> Cell {
    if label == tabsift_model::OTHER_CLASSIFICATION {
        dim_cell(label)
    } else {
        Cell::new(label).fg(Color::Green)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
