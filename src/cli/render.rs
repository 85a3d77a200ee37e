//! Plain-text rendering of catalog and quota output

use crate::models::{Item, Quota};
use crate::quota::{self, ResourceUsage};

const COLUMN_GAP: &str = "   ";

/// Left-aligned columns; the last column is never padded
fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: Vec<&str>| {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        format!("{}\n", line.trim_end())
    };

    let mut out = format_row(headers.to_vec());
    for row in rows {
        out.push_str(&format_row(row.iter().map(String::as_str).collect()));
    }
    out
}

fn or_dash(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or("-")
        .to_string()
}

/// Catalog tiles as a table
pub fn render_catalog_table(items: &[&Item]) -> String {
    if items.is_empty() {
        return "No catalog items found.\n".to_string();
    }

    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            vec![
                item.tile_name.clone(),
                item.kind.to_string(),
                or_dash(item.tile_provider.as_deref()),
                or_dash(Some(item.tags.join(", ").as_str())),
            ]
        })
        .collect();

    format_table(&["NAME", "KIND", "PROVIDER", "TAGS"], &rows)
}

/// Whole percentages print without decimals
pub fn format_percent(percent: f64) -> String {
    if percent.fract() == 0.0 {
        format!("{:.0}%", percent)
    } else {
        format!("{:.1}%", percent)
    }
}

fn usage_row(resource_type: String, usage: &ResourceUsage) -> Vec<String> {
    vec![
        resource_type,
        or_dash(usage.used.as_deref()),
        or_dash(usage.max.as_deref()),
        format_percent(usage.percent),
        usage.bucket().to_string(),
    ]
}

/// Quota summary: scopes, compute gauges and per-resource usage
pub fn render_quota(quota: &Quota) -> String {
    let mut out = format!(
        "Name: {}\nType: {}\n",
        quota.metadata.name,
        quota::quota_type(quota)
    );
    if let Some(namespace) = quota.metadata.namespace.as_deref().filter(|ns| !ns.is_empty()) {
        out.push_str(&format!("Namespace: {}\n", namespace));
    }

    let scopes = quota::quota_scopes(quota);
    if !scopes.is_empty() {
        out.push_str("Scopes:\n");
        for scope in &scopes {
            match scope.description() {
                Some(description) => {
                    out.push_str(&format!("  {}: {}\n", scope.label(), description))
                }
                None => out.push_str(&format!("  {}\n", scope.label())),
            }
        }
    }

    let resource_types = quota::quota_resource_types(quota);
    if quota::has_compute_resources(&resource_types) {
        out.push_str("Gauges:\n");
        for gauge in quota::quota_gauges(quota) {
            out.push_str(&format!("  {}: {}\n", gauge.title, gauge.caption()));
        }
    }

    out.push('\n');
    if resource_types.is_empty() {
        out.push_str("No resource limits set.\n");
        return out;
    }

    let rows: Vec<Vec<String>> = quota::quota_usage_rows(quota)
        .into_iter()
        .map(|(resource_type, usage)| usage_row(resource_type, &usage))
        .collect();
    out.push_str(&format_table(
        &["RESOURCE", "USED", "MAX", "PERCENT", "STATUS"],
        &rows,
    ));
    out
}
