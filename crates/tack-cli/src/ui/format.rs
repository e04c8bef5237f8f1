//! Formatting for sizes and build reports.

use std::path::Path;

use owo_colors::OwoColorize;
use tack_build::BuildReport;

/// Format a byte count with the largest fitting unit.
///
/// ```
/// use tack_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit])
    }
}

/// List every written file with its size, relative to the output directory.
pub fn print_build_report(report: &BuildReport) {
    let colors = super::colors_enabled();
    let header = "Output";
    if colors {
        eprintln!("\n{} {}", header.bold().underline(), report.output_dir.display().dimmed());
    } else {
        eprintln!("\n{} {}", header, report.output_dir.display());
    }

    let mut total = 0;
    for path in report.files() {
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        total += size;
        let name = relative_name(path, &report.output_dir);
        eprintln!("  {:<40} {:>10}", name, format_size(size));
    }

    eprintln!("  {:<40} {:>10}", "total", format_size(total));
    if !report.plugins_run.is_empty() {
        eprintln!("  plugins: {}", report.plugins_run.join(", "));
    }
}

fn relative_name(path: &Path, dir: &Path) -> String {
    path.strip_prefix(dir)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
