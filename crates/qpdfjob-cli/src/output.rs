use std::io::Write;

use owo_colors::OwoColorize;
use qpdfjob_core::{JobStatus, PathSource};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the one-line result of a dispatched job.
pub fn print_status(
    w: &mut dyn Write,
    job_name: &str,
    status: JobStatus,
    color: ColorMode,
) -> std::io::Result<()> {
    let label = match status.name() {
        Some("success") => "OK",
        Some("warning") => "WARNING",
        Some(_) => "ERROR",
        None => "UNKNOWN",
    };

    let label = if !color.enabled() {
        label.to_string()
    } else if status.is_success() {
        label.green().bold().to_string()
    } else if status.is_warning() {
        label.yellow().bold().to_string()
    } else {
        label.red().bold().to_string()
    };
    writeln!(w, "{} {} (exit code {})", label, job_name, status)
}

/// Print the result of a validate-only run.
pub fn print_valid(
    w: &mut dyn Write,
    job_name: &str,
    bytes: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "{} {} ({} bytes of JSON)",
            "VALID".green().bold(),
            job_name,
            bytes
        )
    } else {
        writeln!(w, "VALID {} ({} bytes of JSON)", job_name, bytes)
    }
}

/// Print the table of named engine exit codes.
pub fn print_codes(w: &mut dyn Write, color: ColorMode) -> std::io::Result<()> {
    for (name, status, meaning) in JobStatus::TABLE {
        if color.enabled() {
            writeln!(w, "{:<18} {:>2}  {}", name.bold(), status.code(), meaning.dimmed())?;
        } else {
            writeln!(w, "{:<18} {:>2}  {}", name, status.code(), meaning)?;
        }
    }
    Ok(())
}

/// Print the resolved library path and where it came from.
pub fn print_library(
    w: &mut dyn Write,
    resolved: Option<(&std::path::Path, PathSource)>,
    config_path: Option<&std::path::Path>,
    color: ColorMode,
) -> std::io::Result<()> {
    match resolved {
        Some((path, source)) => writeln!(w, "library: {} (from {})", path.display(), source)?,
        None if color.enabled() => writeln!(w, "library: {}", "not configured".red())?,
        None => writeln!(w, "library: not configured")?,
    }
    if let Some(path) = config_path {
        writeln!(w, "config file: {}", path.display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn status_line_without_color() {
        let out = render(|w| print_status(w, "job.json", JobStatus::SUCCESS, ColorMode(false)));
        assert_eq!(out, "OK job.json (exit code 0 (success))\n");

        let out = render(|w| print_status(w, "job.json", JobStatus::WARNING, ColorMode(false)));
        assert!(out.starts_with("WARNING "));

        let out = render(|w| print_status(w, "job.json", JobStatus::from(9), ColorMode(false)));
        assert!(out.starts_with("UNKNOWN "));
    }

    #[test]
    fn codes_table_lists_aliases() {
        let out = render(|w| print_codes(w, ColorMode(false)));
        assert_eq!(out.lines().count(), 5);
        assert!(out.contains("IS_NOT_ENCRYPTED"));
        assert!(out.contains("CORRECT_PASSWORD"));
    }

    #[test]
    fn unconfigured_library() {
        let out = render(|w| print_library(w, None, None, ColorMode(false)));
        assert_eq!(out, "library: not configured\n");
    }
}
