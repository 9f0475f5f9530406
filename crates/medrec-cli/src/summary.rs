use std::collections::{BTreeMap, BTreeSet};

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use medrec_core::{PipelineOutput, ProcessingMetrics};
use medrec_model::ClusterLabel;

use crate::types::{EvaluationResult, PatternListing, ProcessResult};

pub fn print_summary(result: &ProcessResult) {
    println!("Input: {}", result.input.display());
    println!("SHA-256: {}", result.input_sha256);
    println!(
        "Embeddings: {} ({} header patterns)",
        result.embedder.describe(),
        result.pattern_count
    );
    match &result.output_csv {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: dry run, nothing written"),
    }
    if let Some(path) = &result.report {
        println!("Run report: {}", path.display());
    }
    print_cluster_table(&result.output);
    print_metrics_table(&result.output.metrics);
}

pub fn print_pattern_listing(listing: &PatternListing) {
    println!("Pattern store: {}", listing.path.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Pattern"),
        header_cell("Header label"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, pattern) in listing.patterns.iter().enumerate() {
        table.add_row(vec![
            dim_cell(index),
            Cell::new(&pattern.regex),
            Cell::new(&pattern.label),
        ]);
    }
    println!("{table}");
}

pub fn print_evaluation(result: &EvaluationResult) {
    let evaluation = &result.evaluation;
    println!("Records: {}", result.csv.display());
    println!(
        "Rows: {} ({} with unmapped headers)",
        evaluation.total_rows, evaluation.unmapped_headers
    );
    println!(
        "Accuracy: {} ({}/{} rows)",
        percent(evaluation.accuracy()),
        evaluation.agreed_rows,
        evaluation.total_rows
    );
    if evaluation.per_category.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Header labels"),
        header_cell("Rows"),
        header_cell("Predicted"),
        header_cell("Agreed"),
        header_cell("Recall"),
        header_cell("Precision"),
    ]);
    apply_table_style(&mut table);
    for index in [0, 2, 3, 4, 5, 6] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (category, agreement) in &evaluation.per_category {
        let labels = result
            .labels
            .get(category)
            .map_or_else(|| "-".to_string(), |labels| labels.join(", "));
        table.add_row(vec![
            Cell::new(category),
            Cell::new(labels),
            Cell::new(agreement.support),
            Cell::new(agreement.predicted),
            Cell::new(agreement.agreed),
            Cell::new(percent(agreement.recall())),
            Cell::new(percent(agreement.precision())),
        ]);
    }
    println!("{table}");
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |value| format!("{:.2}%", value * 100.0))
}

fn print_cluster_table(output: &PipelineOutput) {
    let mut clusters: BTreeMap<ClusterLabel, Vec<u32>> = BTreeMap::new();
    for (page, label) in output.pages.iter().zip(&output.labels) {
        clusters.entry(*label).or_default().push(page.page_num());
    }
    let mut headers: BTreeMap<u32, BTreeSet<&str>> = BTreeMap::new();
    for row in &output.rows {
        headers
            .entry(row.page_num)
            .or_default()
            .insert(row.header_label.as_str());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Cluster"),
        header_cell("Pages"),
        header_cell("Count"),
        header_cell("Header labels"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (label, pages) in &clusters {
        let labels: BTreeSet<&str> = pages
            .iter()
            .filter_map(|page| headers.get(page))
            .flatten()
            .copied()
            .collect();
        table.add_row(vec![
            Cell::new(label),
            Cell::new(page_ranges(pages)),
            Cell::new(pages.len()),
            Cell::new(labels.into_iter().collect::<Vec<_>>().join(", ")),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(output.pages.len()).add_attribute(Attribute::Bold),
        Cell::new(format!("{} rows", output.rows.len())).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn print_metrics_table(metrics: &ProcessingMetrics) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows: Vec<(&str, String)> = vec![
        ("Pages", metrics.total_pages.to_string()),
        ("Clusters", metrics.total_clusters.to_string()),
        ("Avg cluster size", format!("{:.2}", metrics.avg_cluster_size)),
        ("Pages with DOS", metrics.extraction.dos_extracted.to_string()),
        (
            "Pages with provider",
            metrics.extraction.provider_found.to_string(),
        ),
        (
            "Pages with patient info",
            metrics.extraction.patient_info_found.to_string(),
        ),
        (
            "Multi-page clusters",
            metrics.consistency.comparable_clusters.to_string(),
        ),
        (
            "Consistent DOS",
            metrics.consistency.dos_consistent.to_string(),
        ),
        (
            "Consistent provider",
            metrics.consistency.provider_consistent.to_string(),
        ),
    ];
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    println!("{table}");
}

/// Collapses sorted page numbers into runs such as `1-3, 7`.
fn page_ranges(pages: &[u32]) -> String {
    let mut runs: Vec<(u32, u32)> = Vec::new();
    for &page in pages {
        match runs.last_mut() {
            Some((_, end)) if end.checked_add(1) == Some(page) => *end = page,
            _ => runs.push((page, page)),
        }
    }
    runs.into_iter()
        .map(|(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn apply_table_style(table: &mut Table) {
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
        .set_width(140);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
