//! Terminal tables for command reports.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use insight_model::{Role, RoleOrigin};
use insight_stats::{
    ContingencyTable, CorrelationMatrix, GroupSummary, Insufficient, Significance, UMethod,
};

use crate::commands::{CorrelationReport, ProfileReport, RolesReport, TestReport, TestResult};

pub fn print_profile(report: &ProfileReport) {
    println!("Dataset: {}", report.dataset.display());
    println!("Rows: {}", report.rows);
    println!("{}", profile_table(report));
    if !report.numeric.is_empty() {
        println!();
        println!("Numeric summary:");
        println!("{}", numeric_table(report));
    }
    if !report.categorical.is_empty() {
        println!();
        println!("Categorical levels:");
        println!("{}", levels_table(report));
    }
}

pub fn print_roles(report: &RolesReport) {
    println!("Dataset: {}", report.dataset.display());
    println!("{}", roles_table(report));
    if let Some(path) = &report.saved_to {
        println!("Saved: {}", path.display());
    }
}

pub fn print_correlation(report: &CorrelationReport) {
    println!("Dataset: {}", report.dataset.display());
    if report.matrix.columns.is_empty() {
        println!("No numeric columns.");
        return;
    }
    println!("{}", correlation_table(&report.matrix));
}

pub fn print_test(report: &TestReport) {
    println!("Dataset: {}", report.dataset.display());
    if let Some(reason) = report.result.insufficient() {
        eprintln!("warning: {}", insufficient_message(report.test, reason));
        return;
    }
    println!("{}", result_table(report));
    match &report.result {
        TestResult::WelchT(Ok(res)) => println!("{}", group_table(&res.groups)),
        TestResult::MannWhitney(Ok(res)) => println!("{}", group_table(&res.groups)),
        TestResult::Anova(Ok(res)) => {
            println!("{}", group_table(&res.groups));
            if !res.dropped.is_empty() {
                println!("Dropped (fewer than 2 values): {}", res.dropped.join(", "));
            }
        }
        TestResult::ChiSquare(Ok(res)) => {
            println!("Observed:");
            println!("{}", contingency_table(&res.table, false));
            println!("Expected:");
            println!("{}", contingency_table(&res.table, true));
        }
        _ => {}
    }
}

pub fn profile_table(report: &ProfileReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Present"),
        header_cell("Missing"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for column in &report.columns {
        table.add_row(vec![
            Cell::new(&column.name).add_attribute(Attribute::Bold),
            Cell::new(column.kind),
            Cell::new(column.present),
            count_cell(column.missing, Color::Yellow),
        ]);
    }
    table
}

pub fn numeric_table(report: &ProfileReport) -> Table {
    let mut table = Table::new();
    table.set_header(
        ["Column", "Count", "Mean", "Std", "Min", "25%", "50%", "75%", "Max"]
            .into_iter()
            .map(header_cell)
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for index in 1..9 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for summary in &report.numeric {
        table.add_row(vec![
            Cell::new(&summary.column).add_attribute(Attribute::Bold),
            Cell::new(summary.count),
            Cell::new(format_number(summary.mean)),
            summary
                .std
                .map_or_else(|| dim_cell("-"), |v| Cell::new(format_number(v))),
            Cell::new(format_number(summary.min)),
            Cell::new(format_number(summary.q25)),
            Cell::new(format_number(summary.median)),
            Cell::new(format_number(summary.q75)),
            Cell::new(format_number(summary.max)),
        ]);
    }
    table
}

pub fn levels_table(report: &ProfileReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Levels")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for entry in &report.categorical {
        table.add_row(vec![
            Cell::new(&entry.column).add_attribute(Attribute::Bold),
            Cell::new(entry.levels),
        ]);
    }
    table
}

pub fn roles_table(report: &RolesReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Role"),
        header_cell("Column"),
        header_cell("Origin"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for role in Role::ALL {
        let (column, origin) = match report.roles.binding(role) {
            Some(binding) => (
                Cell::new(&binding.column).fg(Color::Green),
                origin_cell(binding.origin),
            ),
            None => (dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![
            Cell::new(role).add_attribute(Attribute::Bold),
            column,
            origin,
            Cell::new(role.description()),
        ]);
    }
    table
}

pub fn correlation_table(matrix: &CorrelationMatrix) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("")];
    header.extend(matrix.columns.iter().map(|c| header_cell(c)));
    table.set_header(header);
    apply_grid_style(&mut table);
    for index in 1..=matrix.columns.len() {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (name, row) in matrix.columns.iter().zip(&matrix.values) {
        let mut cells = vec![header_cell(name)];
        cells.extend(row.iter().map(|r| match r {
            Some(r) => Cell::new(format!("{r:.3}")).fg(correlation_color(*r)),
            None => dim_cell("-"),
        }));
        table.add_row(cells);
    }
    table
}

/// Statistic, p-value and decision rows for a test that produced a result.
pub fn result_table(report: &TestReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Measure"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    let mut rows: Vec<(&str, String)> = Vec::new();
    match &report.result {
        TestResult::Pearson(Ok(res)) => {
            rows.push(("r", format_number(res.r)));
            rows.push(("n", res.n.to_string()));
        }
        TestResult::ConfidenceInterval(Ok(res)) => {
            rows.push(("n", res.n.to_string()));
            rows.push(("mean", format_number(res.mean)));
            rows.push(("std", format_number(res.std)));
            rows.push(("confidence", format!("{:.0}%", res.confidence * 100.0)));
            rows.push(("lower", format_number(res.lower)));
            rows.push(("upper", format_number(res.upper)));
        }
        TestResult::OneSampleT(Ok(res)) => {
            rows.push(("n", res.n.to_string()));
            rows.push(("mean", format_number(res.mean)));
            rows.push(("mu", format_number(res.mu)));
            rows.push(("t", format_number(res.t)));
            rows.push(("df", format_number(res.df)));
        }
        TestResult::WelchT(Ok(res)) => {
            rows.push(("t", format_number(res.t)));
            rows.push(("df", format_number(res.df)));
        }
        TestResult::MannWhitney(Ok(res)) => {
            rows.push(("U", format_number(res.u)));
            rows.push((
                "method",
                match res.method {
                    UMethod::Exact => "exact".to_string(),
                    UMethod::Asymptotic => "normal approximation".to_string(),
                },
            ));
        }
        TestResult::Anova(Ok(res)) => {
            rows.push(("F", format_number(res.f)));
            rows.push(("df between", res.df_between.to_string()));
            rows.push(("df within", res.df_within.to_string()));
        }
        TestResult::ChiSquare(Ok(res)) => {
            rows.push(("chi2", format_number(res.chi2)));
            rows.push(("df", res.dof.to_string()));
            if res.yates {
                rows.push(("correction", "Yates".to_string()));
            }
        }
        TestResult::Trend(Ok(res)) => {
            rows.push(("slope", format_number(res.slope)));
            rows.push(("intercept", format_number(res.intercept)));
            rows.push(("n", res.n.to_string()));
        }
        _ => {}
    }
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    if let Some(p) = report.result.p_value() {
        table.add_row(vec![Cell::new("p-value"), Cell::new(format_p_value(p))]);
        table.add_row(vec![Cell::new("alpha"), Cell::new(report.alpha)]);
    }
    if let Some(decision) = report.decision {
        table.add_row(vec![Cell::new("decision"), decision_cell(decision)]);
    }
    table
}

pub fn group_table(groups: &[GroupSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(
        ["Group", "n", "Mean", "Std", "Median"]
            .into_iter()
            .map(header_cell)
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for index in 1..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for group in groups {
        table.add_row(vec![
            Cell::new(&group.label).add_attribute(Attribute::Bold),
            Cell::new(group.n),
            Cell::new(format_number(group.mean)),
            group
                .std
                .map_or_else(|| dim_cell("-"), |v| Cell::new(format_number(v))),
            Cell::new(format_number(group.median)),
        ]);
    }
    table
}

pub fn contingency_table(contingency: &ContingencyTable, expected: bool) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("")];
    header.extend(contingency.column_labels.iter().map(|c| header_cell(c)));
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 1..=contingency.column_labels.len() {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (i, label) in contingency.row_labels.iter().enumerate() {
        let mut cells = vec![header_cell(label)];
        if expected {
            cells.extend(
                contingency.expected[i]
                    .iter()
                    .map(|v| Cell::new(format!("{v:.2}"))),
            );
        } else {
            cells.extend(contingency.observed[i].iter().map(Cell::new));
        }
        table.add_row(cells);
    }
    table
}

/// Message printed for an insufficient outcome.
pub fn insufficient_message(test: &str, reason: &Insufficient) -> String {
    format!("{test}: insufficient data: {reason}")
}

pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e12 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}

pub fn format_p_value(p: f64) -> String {
    if p < 1e-4 {
        format!("{p:.2e}")
    } else {
        format!("{p:.4}")
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// Style for wide tables such as the correlation matrix.
pub fn apply_grid_style(table: &mut Table) {
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
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn origin_cell(origin: RoleOrigin) -> Cell {
    match origin {
        RoleOrigin::Pinned => Cell::new("pinned")
            .fg(Color::Magenta)
            .add_attribute(Attribute::Bold),
        RoleOrigin::Auto => Cell::new("auto"),
    }
}

fn decision_cell(decision: Significance) -> Cell {
    if decision.is_significant() {
        Cell::new(decision)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(decision).fg(Color::Yellow)
    }
}

fn correlation_color(r: f64) -> Color {
    if r.abs() >= 0.7 {
        Color::Green
    } else if r.abs() >= 0.3 {
        Color::Yellow
    } else {
        Color::DarkGrey
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
