use comfy_table::Color;

use crate::scratch::{CleanupReport, SystemCheck, cleanup::CleanupOutcome};

use super::format::{create_styled_table, format_gb, header_cell, styled_cell};

fn outcome_cell(outcome: CleanupOutcome, use_color: bool) -> comfy_table::Cell {
    let (text, color) = match outcome {
        CleanupOutcome::Deleted => ("deleted", Color::Green),
        CleanupOutcome::Locked => ("locked", Color::Yellow),
        CleanupOutcome::DeleteFailed => ("delete failed", Color::Red),
    };
    styled_cell(text, use_color.then_some(color), false)
}

pub(crate) fn print_cleanup_table(report: &CleanupReport, use_color: bool) {
    if report.entries.is_empty() {
        println!("No stale scratch folders found.");
        return;
    }

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Folder", use_color),
        header_cell("Result", use_color),
    ]);
    for entry in &report.entries {
        table.add_row(vec![
            styled_cell(&entry.path.display().to_string(), None, false),
            outcome_cell(entry.outcome, use_color),
        ]);
    }
    println!("{table}");
    println!(
        "\n  {} deleted, {} locked, {} failed\n",
        report.deleted(),
        report.locked(),
        report.failed()
    );
}

pub(crate) fn print_system_check(check: &SystemCheck, use_color: bool) {
    let env = &check.environment;
    let show = |p: &Option<std::path::PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Setting", use_color),
        header_cell("Value", use_color),
    ]);
    table.add_row(vec![
        styled_cell("Session", None, true),
        styled_cell(&format!("{:?}", check.origin).to_lowercase(), None, false),
    ]);
    table.add_row(vec![
        styled_cell("Workspace", None, true),
        styled_cell(&show(&env.workspace), None, false),
    ]);
    table.add_row(vec![
        styled_cell("Scratch workspace", None, true),
        styled_cell(&show(&env.scratch_workspace), None, false),
    ]);
    table.add_row(vec![
        styled_cell("Scratch folder", None, true),
        styled_cell(&show(&env.scratch_folder), None, false),
    ]);
    let space_color = (use_color && check.low_disk_space).then_some(Color::Red);
    table.add_row(vec![
        styled_cell("Free space", None, true),
        styled_cell(
            &check.free_space_gb.map(format_gb).unwrap_or_else(|| "-".to_string()),
            space_color,
            false,
        ),
    ]);
    println!("{table}");

    if let Some(report) = &check.cleanup
        && !report.entries.is_empty()
    {
        println!(
            "\n  Stale scratch folders: {} deleted, {} locked, {} failed\n",
            report.deleted(),
            report.locked(),
            report.failed()
        );
    }
}
