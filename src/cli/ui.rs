use crate::core::format::{NOT_AVAILABLE, format_price_change};
use crate::core::models::FlowDirection;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned cell for an already formatted figure; `N/A` is greyed out.
pub fn value_cell(text: String) -> Cell {
    let cell = Cell::new(&text).set_alignment(CellAlignment::Right);
    if text == NOT_AVAILABLE {
        cell.fg(Color::DarkGrey)
    } else {
        cell
    }
}

/// Percentage change, green when non-negative and red otherwise.
pub fn change_cell(change: Option<f64>) -> Cell {
    let Some(change) = change else {
        return na_cell();
    };
    let color = if change >= 0.0 { Color::Green } else { Color::Red };
    Cell::new(format_price_change(Some(change)))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

pub fn flow_cell(direction: FlowDirection) -> Cell {
    match direction {
        FlowDirection::In => Cell::new("유입 ▲").fg(Color::Green),
        FlowDirection::Out => Cell::new("유출 ▼").fg(Color::Red),
    }
}

/// Creates a greyed, right-aligned "N/A" cell.
pub fn na_cell() -> Cell {
    Cell::new(NOT_AVAILABLE)
        .fg(Color::DarkGrey)
        .set_alignment(CellAlignment::Right)
}

pub fn new_progress_bar(len: u64, with_message: bool) -> ProgressBar {
    let template = if with_message {
        "{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}"
    } else {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}"
    };

    let pb = ProgressBar::new(len);
    let bar_style = ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(bar_style);
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}

/// Prints a panel heading followed by an optional dimmed caption.
pub fn print_heading(title: &str, caption: Option<&str>) {
    println!("\n{}", style_text(title, StyleType::Title));
    if let Some(caption) = caption {
        println!("{}", style_text(caption, StyleType::Subtle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_cell_formats_sign() {
        let table_text = {
            let mut table = new_styled_table();
            table.add_row(vec![change_cell(Some(1.5)), change_cell(Some(-2.25)), change_cell(None)]);
            table.to_string()
        };
        assert!(table_text.contains("+1.50%"));
        assert!(table_text.contains("-2.25%"));
        assert!(table_text.contains("N/A"));
    }
}
