//! Table output formatting for the sweep report
//!
//! Renders one row per candidate folder using comfy-table, with color-coded
//! status cells when the terminal supports them.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};

use crate::domain::models::{DeletionOutcome, FolderOutcome, FolderStatus, SweepReport};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None when stdout is not a terminal)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter sized to the terminal on stdout
    pub fn new() -> Self {
        let width = console::Term::stdout().size_checked().map(|(_, cols)| cols);
        Self::with_config(console::colors_enabled(), width)
    }

    /// Create a new table formatter with custom settings
    pub fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format the per-folder outcomes of a sweep
    pub fn format_folders(&self, report: &SweepReport) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Folder").add_attribute(Attribute::Bold),
            Cell::new("Age (days)").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Detail").add_attribute(Attribute::Bold),
        ]);

        for folder in &report.folders {
            let age = folder
                .age_days()
                .map_or_else(|| "-".to_string(), |days| days.to_string());

            let label = status_label(folder.status);
            let status_cell = if self.use_colors {
                Cell::new(label).fg(status_color(folder.status))
            } else {
                Cell::new(label)
            };

            table.add_row(vec![
                Cell::new(&folder.folder),
                Cell::new(age),
                status_cell,
                Cell::new(detail(folder)),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn status_label(status: FolderStatus) -> &'static str {
    match status {
        FolderStatus::Keep => "KEEP",
        FolderStatus::Eligible => "ELIGIBLE",
        FolderStatus::Deleted => "DELETED",
        FolderStatus::DeleteFailed => "DELETE FAILED",
        FolderStatus::ListFailed => "LIST FAILED",
    }
}

fn status_color(status: FolderStatus) -> Color {
    match status {
        FolderStatus::Keep => Color::Green,
        FolderStatus::Eligible => Color::Yellow,
        FolderStatus::Deleted => Color::Cyan,
        FolderStatus::DeleteFailed => Color::Red,
        FolderStatus::ListFailed => Color::DarkGrey,
    }
}

fn detail(folder: &FolderOutcome) -> String {
    if let Some(ref error) = folder.listing_error {
        return error.clone();
    }
    match folder.deletion {
        Some(DeletionOutcome::Failed { ref message, .. }) => message.clone(),
        Some(DeletionOutcome::Deleted) => folder.prefix.to_string(),
        None => folder
            .decision
            .as_ref()
            .filter(|d| d.entries_skipped > 0)
            .map(|d| format!("{} entr(ies) skipped", d.entries_skipped))
            .unwrap_or_default(),
    }
}
