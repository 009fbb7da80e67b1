use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pipeline_model::{DefectSide, Schema};
use pipeline_stats::{Grade, GradeTube, Label, PropertyCounter, TubeProperty, Totals};

use crate::commands::TubeRow;

pub fn render_tubes(rows: &[TubeRow]) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("No"),
        header_cell("Start"),
        header_cell("Length"),
        header_cell("Thick"),
        header_cell("Category"),
        header_cell("Diameter"),
        header_cell("Seam"),
        header_cell("Defects"),
        header_cell("Features"),
    ]);
    apply_summary_table_style(&mut table);
    for index in [1, 2, 3, 5, 7] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut total_length = 0;
    let mut total_defects = 0;
    for row in rows {
        total_length += row.length.unwrap_or(0);
        total_defects += row.defects;
        table.add_row(vec![
            Cell::new(&row.number),
            Cell::new(row.start),
            optional_cell(row.length),
            changed_cell(row.thickness, row.thickness_change),
            changed_cell(row.category.as_deref(), row.category_change),
            changed_cell(row.diameter, row.diameter_change),
            Cell::new(&row.seam),
            count_cell(row.defects, Color::Red),
            Cell::new(&row.features),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_length).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        count_cell(total_defects, Color::Red).add_attribute(Attribute::Bold),
        Cell::new(format!("{} tubes", rows.len())),
    ]);
    table.to_string()
}

pub fn render_stats(totals: &Totals, schema: &Schema, warnings: usize) -> String {
    let mut sections = Vec::new();

    let mut overview = Table::new();
    overview.set_header(vec![header_cell("Pipeline"), header_cell("Value")]);
    apply_table_style(&mut overview);
    align_column(&mut overview, 1, CellAlignment::Right);
    overview.add_row(vec![Cell::new("Start"), optional_cell(totals.start)]);
    overview.add_row(vec![Cell::new("Length"), Cell::new(totals.length)]);
    overview.add_row(vec![Cell::new("Tubes"), Cell::new(totals.pipes.number)]);
    overview.add_row(vec![Cell::new("Defects"), Cell::new(totals.defects.number)]);
    overview.add_row(vec![Cell::new("Line objects"), Cell::new(totals.liners.number)]);
    overview.add_row(vec![Cell::new("Markers"), Cell::new(totals.markers.len())]);
    overview.add_row(vec![
        Cell::new("Warnings"),
        count_cell(warnings, Color::Yellow),
    ]);
    sections.push(overview.to_string());

    let mut pipes = Table::new();
    pipes.set_header(vec![
        header_cell("Property"),
        header_cell("Value"),
        header_cell("Tubes"),
        header_cell("Length"),
    ]);
    apply_table_style(&mut pipes);
    align_column(&mut pipes, 2, CellAlignment::Right);
    align_column(&mut pipes, 3, CellAlignment::Right);
    add_property_rows(&mut pipes, "thickness", &totals.pipes.thickness);
    add_property_rows(&mut pipes, "category", &totals.pipes.category);
    add_property_rows(&mut pipes, "seam", &totals.pipes.seam_types);
    sections.push(pipes.to_string());

    let defects = &totals.defects;
    if defects.number > 0 {
        let mut types = counter_table("Defect");
        add_counter_rows(&mut types, &defects.types, |code| {
            schema.defect_name(code).unwrap_or("-").to_string()
        });
        sections.push(types.to_string());

        let mut sides = counter_table("Wall side");
        add_counter_rows(&mut sides, &defects.wallside, |code| {
            side_name(DefectSide::from_code(code)).to_string()
        });
        sections.push(sides.to_string());

        let mut depth = grade_table("Depth %");
        add_grade_rows(&mut depth, &defects.depth.grades);
        depth.add_row(vec![
            dim_cell("max"),
            Cell::new(defects.depth.max_percent),
            dim_cell("-"),
        ]);
        sections.push(depth.to_string());

        let mut dents = grade_table("Dent %");
        add_grade_rows(&mut dents, &defects.dents.grades);
        sections.push(dents.to_string());

        if !defects.valves.names.is_empty() {
            let mut valves = counter_table("Up to");
            let grades = &defects.valves.grades;
            for (grade, count) in grades.iter() {
                valves.add_row(vec![
                    Cell::new(grade_label(grade)),
                    optional_cell(defects.valves.name(grade)),
                    count_cell(count, Color::Red),
                    Cell::new(grades.pipes_with_grade(grade)),
                ]);
            }
            sections.push(valves.to_string());
        }
        sections.push(format!("Hours: {}", defects.angles));
    }

    if !totals.markers.is_empty() {
        let mut markers = Table::new();
        markers.set_header(vec![
            header_cell("Dist"),
            header_cell("Code"),
            header_cell("Name"),
            header_cell("Type"),
        ]);
        apply_table_style(&mut markers);
        align_column(&mut markers, 0, CellAlignment::Right);
        for marker in &totals.markers {
            markers.add_row(vec![
                Cell::new(marker.dist),
                Cell::new(marker.code),
                Cell::new(&marker.name),
                Cell::new(&marker.type_name),
            ]);
        }
        sections.push(markers.to_string());
    }

    sections.join("\n")
}

fn counter_table(title: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(title),
        header_cell("Name"),
        header_cell("Count"),
        header_cell("Tubes"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    table
}

fn grade_table(title: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(title),
        header_cell("Count"),
        header_cell("Tubes"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table
}

fn add_property_rows<K: Ord + Label>(table: &mut Table, name: &str, property: &TubeProperty<K>) {
    for (index, (key, counter)) in property.iter().enumerate() {
        let name_cell = if index == 0 {
            Cell::new(name).add_attribute(Attribute::Bold)
        } else {
            dim_cell("")
        };
        table.add_row(vec![
            name_cell,
            Cell::new(key.label()),
            Cell::new(counter.number),
            Cell::new(counter.length),
        ]);
    }
}

fn add_counter_rows(
    table: &mut Table,
    counter: &PropertyCounter<i64>,
    name: impl Fn(i64) -> String,
) {
    for code in counter.keys() {
        table.add_row(vec![
            Cell::new(code),
            Cell::new(name(*code)),
            Cell::new(counter.count(code)),
            Cell::new(counter.tubes_with(code)),
        ]);
    }
}

fn add_grade_rows(table: &mut Table, grades: &GradeTube) {
    for (grade, count) in grades.iter() {
        table.add_row(vec![
            Cell::new(grade_label(grade)),
            count_cell(count, Color::Red),
            Cell::new(grades.pipes_with_grade(grade)),
        ]);
    }
}

fn grade_label(grade: Grade) -> String {
    match grade {
        Grade::Below(threshold) => format!("< {threshold}"),
        Grade::OverMax => "over".to_string(),
    }
}

fn side_name(side: DefectSide) -> &'static str {
    match side {
        DefectSide::Unknown => "unknown",
        DefectSide::Outside => "outside",
        DefectSide::Inside => "inside",
        DefectSide::InWall => "in wall",
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(165);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value)
        .fg(Color::DarkGrey)
        .add_attribute(Attribute::Dim)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell<T: ToString>(value: Option<T>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

/// Values that changed at this tube are highlighted.
fn changed_cell<T: ToString>(value: Option<T>, changed: bool) -> Cell {
    match value {
        Some(value) if changed => Cell::new(value)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold),
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}
