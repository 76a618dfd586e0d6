use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use fviz_model::{
    Dimensions, HemisphereInfo, TaskSummary, TimeSeriesSummary, ValueRange, ViewerMetadata,
};

/// Print the viewer state overview followed by the auxiliary data tables.
pub fn print_summary(metadata: &ViewerMetadata, cached: Option<(&str, &Path)>) {
    if let Some((key, path)) = cached {
        println!("Cache key: {key}");
        println!("Snapshot: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Property"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![label_cell("Modality"), Cell::new(metadata.modality)]);
    table.add_row(vec![label_cell("Timepoints"), Cell::new(metadata.timepoints)]);
    match &metadata.dimensions {
        Dimensions::Volumetric { x, y, z } => {
            table.add_row(vec![label_cell("Dimensions"), Cell::new(format!("{x} × {y} × {z}"))]);
            table.add_row(vec![label_cell("Anatomical"), presence_cell(metadata.anat_input)]);
            table.add_row(vec![label_cell("Brain mask"), presence_cell(metadata.mask_input)]);
        }
        Dimensions::Surface { left, right } => {
            table.add_row(vec![label_cell("Left hemisphere"), hemisphere_cell(left.as_ref())]);
            table.add_row(vec![label_cell("Right hemisphere"), hemisphere_cell(right.as_ref())]);
        }
    }
    table.add_row(vec![label_cell("Value range"), range_cell(metadata.global_range)]);
    println!("{table}");

    print_time_series_table(&metadata.time_series);
    if let Some(task) = &metadata.task {
        print_task_table(task);
    }
}

fn print_time_series_table(series: &[TimeSeriesSummary]) {
    if series.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Time series"),
        header_cell("Length"),
        header_cell("Min"),
        header_cell("Max"),
    ]);
    apply_detail_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for entry in series {
        let (min, max) = range_bounds(entry.range);
        table.add_row(vec![
            Cell::new(&entry.label).fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(entry.length),
            min,
            max,
        ]);
    }
    println!();
    println!("{table}");
}

fn print_task_table(task: &TaskSummary) {
    println!();
    println!(
        "Task design: TR {} s, slice-time reference {}, {} frames",
        task.tr,
        task.slicetime_ref,
        task.frame_times.len()
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Condition"),
        header_cell("Active frames"),
        header_cell("Peak response"),
    ]);
    apply_detail_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for condition in &task.conditions {
        let active = condition.block.iter().filter(|value| **value > 0.0).count();
        let peak = condition.hrf.iter().copied().fold(None, |acc: Option<f64>, value| {
            Some(acc.map_or(value, |current| current.max(value)))
        });
        table.add_row(vec![
            Cell::new(&condition.label).fg(Color::Blue).add_attribute(Attribute::Bold),
            count_cell(active),
            peak.map_or_else(|| dim_cell("-"), |value| Cell::new(format_value(value))),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_detail_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
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
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn presence_cell(present: bool) -> Cell {
    if present {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn hemisphere_cell(info: Option<&HemisphereInfo>) -> Cell {
    match info {
        Some(info) => Cell::new(format!("{} vertices, {} faces", info.vertices, info.faces)),
        None => dim_cell("-"),
    }
}

fn range_cell(range: Option<ValueRange>) -> Cell {
    match range {
        Some(range) => Cell::new(format!(
            "{} … {}",
            format_value(range.min),
            format_value(range.max)
        )),
        None => dim_cell("-"),
    }
}

fn range_bounds(range: Option<ValueRange>) -> (Cell, Cell) {
    match range {
        Some(range) => (
            Cell::new(format_value(range.min)),
            Cell::new(format_value(range.max)),
        ),
        None => (dim_cell("-"), dim_cell("-")),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
