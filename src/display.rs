use crate::cli::OutputFormat;
use crate::config::OutputRules;
use crate::filter::{FilterSet, FilterSetResult, Token, to_filter_expr, to_filter_set_expr};
use crate::selection::SelectionEntry;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use serde_json::json;
use std::fmt::Write;

pub fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(h)));
    table
}

pub fn render_tokens(tokens: &[Token], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let items: Vec<_> = tokens
                .iter()
                .map(|token| {
                    json!({
                        "kind": format!("{:?}", token.kind),
                        "position": token.position,
                        "text": token.text,
                    })
                })
                .collect();
            to_pretty_json(&json!(items))
        }
        OutputFormat::Text => {
            let mut table = create_styled_table(&["Pos", "Kind", "Text"]);
            for token in tokens {
                table.add_row(vec![
                    Cell::new(token.position),
                    Cell::new(format!("{:?}", token.kind)),
                    Cell::new(token.text.as_deref().unwrap_or("")),
                ]);
            }
            format!("{table}\n")
        }
    }
}

pub fn render_filter_set(set: &FilterSet, show_tree: bool, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let rules: Vec<_> = set
                .rules()
                .iter()
                .map(|rule| {
                    json!({
                        "type": rule.rule_type,
                        "expression": to_filter_expr(&rule.filter),
                    })
                })
                .collect();
            let mut value = json!({
                "expression": to_filter_set_expr(set),
                "rules": rules,
            });
            if show_tree {
                value["tree"] = json!(format!("{set:#?}"));
            }
            to_pretty_json(&value)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(out, "{}", to_filter_set_expr(set));
            if show_tree {
                let _ = writeln!(out, "{set:#?}");
            }
            out
        }
    }
}

pub fn render_selection(
    entries: &[SelectionEntry],
    rules: &OutputRules,
    show_all: bool,
    format: OutputFormat,
) -> String {
    let show_unselected = show_all || rules.show_unselected;
    let shown: Vec<&SelectionEntry> = entries
        .iter()
        .filter(|entry| entry.selected || show_unselected)
        .collect();

    match format {
        OutputFormat::Json => {
            let selected = entries.iter().filter(|e| e.selected).count();
            to_pretty_json(&json!({
                "total": entries.len(),
                "selected": selected,
                "tests": shown,
            }))
        }
        OutputFormat::Text => {
            let mut headers = vec!["Selected", "Test", "Decision"];
            if rules.show_ids {
                headers.insert(1, "Id");
            }
            let mut table = create_styled_table(&headers);
            for entry in &shown {
                let mut row = vec![
                    Cell::new(selected_marker(entry.selected)),
                    Cell::new(format!("{}{}", "  ".repeat(entry.depth), leaf_name(&entry.path))),
                    Cell::new(decision_label(entry.decision)),
                ];
                if rules.show_ids {
                    row.insert(1, Cell::new(entry.id.as_deref().unwrap_or("-")));
                }
                table.add_row(row);
            }

            let selected = entries.iter().filter(|e| e.selected).count();
            let mut out = String::new();
            if !shown.is_empty() {
                let _ = writeln!(out, "{table}");
            }
            let _ = writeln!(
                out,
                "{} of {} tests selected",
                selected.to_string().green().bold(),
                entries.len()
            );
            out
        }
    }
}

fn leaf_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn selected_marker(selected: bool) -> String {
    if selected {
        "yes".green().to_string()
    } else {
        "no".dimmed().to_string()
    }
}

fn decision_label(decision: FilterSetResult) -> String {
    match decision {
        FilterSetResult::Include => "include".green().to_string(),
        FilterSetResult::Exclude => "exclude".red().to_string(),
        FilterSetResult::Unmatched => "inherited".normal().to_string(),
    }
}

fn to_pretty_json(value: &serde_json::Value) -> String {
    // a Value built from json! always serializes
    let mut out = serde_json::to_string_pretty(value).unwrap_or_default();
    out.push('\n');
    out
}
