//! Display and formatting utilities for craftplan.
//!
//! This module provides functions for formatting calculation results and
//! printing them to the user in a readable format.

use std::io;

use crate::aggregate::{Calculation, Totals};
use crate::models::ExpansionNode;

/// Formats a duration in hours to a human-readable string.
///
/// # Arguments
///
/// * `hours` - Duration in hours
///
/// # Returns
///
/// `"instant"` for zero, otherwise the non-zero parts of hours and rounded
/// minutes, like "2h 30m", "2h" or "45 min".
///
/// # Example
///
/// ```
/// use craftplan::display::format_duration;
///
/// assert_eq!(format_duration(0.0), "instant");
/// assert_eq!(format_duration(1.5), "1h 30m");
/// assert_eq!(format_duration(2.0), "2h");
/// assert_eq!(format_duration(0.25), "15 min");
/// ```
pub fn format_duration(hours: f64) -> String {
    if hours.is_nan() || hours <= 0.0 {
        return "instant".to_string();
    }

    let mut whole_hours = hours.floor() as u64;
    let mut minutes = ((hours - hours.floor()) * 60.0).round() as u64;
    if minutes == 60 {
        whole_hours += 1;
        minutes = 0;
    }

    if whole_hours == 0 {
        format!("{} min", minutes)
    } else if minutes == 0 {
        format!("{}h", whole_hours)
    } else {
        format!("{}h {}m", whole_hours, minutes)
    }
}

/// Renders the breakdown tree as indented text, one line per node.
///
/// Base materials show only quantity and name; crafted items add the craft
/// count, the variant used, any excess and their own crafting time.
pub fn format_tree(node: &ExpansionNode) -> String {
    let mut output = String::new();
    write_node(node, 0, &mut output);
    output
}

fn write_node(node: &ExpansionNode, indent: usize, output: &mut String) {
    output.push_str(&"  ".repeat(indent));
    output.push_str(&format!("{} x {}", node.actual_qty, node.name));

    if let Some(variant) = &node.selected_variant_name {
        let crafts = if node.crafts_performed == 1 { "craft" } else { "crafts" };
        output.push_str(&format!(" ({} {}, {}", node.crafts_performed, crafts, variant));
        if node.excess() > 0 {
            output.push_str(&format!(", +{} excess", node.excess()));
        }
        if node.crafting_time_total > 0.0 {
            output.push_str(&format!(", {}", format_duration(node.crafting_time_total)));
        }
        output.push(')');
    }
    output.push('\n');

    for child in &node.children {
        write_node(child, indent + 1, output);
    }
}

/// Displays a calculation to stdout.
///
/// This function prints:
/// - The base materials required
/// - The total crafting time, when any recipe has one
/// - Optionally, the full breakdown tree
///
/// # Arguments
///
/// * `calculation` - The finished calculation
/// * `show_tree` - Whether to print the breakdown
pub fn display_calculation(calculation: &Calculation, show_tree: bool) {
    let root = &calculation.tree;

    println!();
    println!("+================================================================+");
    println!("|                  CRAFTING REQUIREMENTS                         |");
    println!("+================================================================+");
    println!();
    println!(
        "  Target:   {} x {} (requested {})",
        root.actual_qty, root.name, root.requested_qty
    );
    if root.excess() > 0 {
        println!("  Excess:   {}", root.excess());
    }

    println!();
    println!("[TOTALS]");
    println!("----------------------------------------------------------------");
    for (name, qty) in &calculation.totals {
        println!("  {} x {}", qty, name);
    }

    if calculation.total_crafting_time > 0.0 {
        println!();
        println!("[CRAFTING TIME]");
        println!("----------------------------------------------------------------");
        println!("  {}", format_duration(calculation.total_crafting_time));
    }

    if show_tree {
        println!();
        println!("[BREAKDOWN]");
        println!("----------------------------------------------------------------");
        for line in format_tree(root).lines() {
            println!("  {}", line);
        }
    }

    println!();
}

/// Writes base-material totals as `item,quantity` CSV rows with a header.
pub fn write_totals_csv<W: io::Write>(totals: &Totals, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["item", "quantity"])?;
    for (name, qty) in totals {
        let qty = qty.to_string();
        wtr.write_record([name.as_str(), qty.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}
