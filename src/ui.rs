use colored::Colorize;
use objectives::{Reporter, Severity};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Objective Reports
// ============================================================================

/// Reporter that prints objective diagnostics to the terminal
///
/// Errors and warnings are always shown. Info messages are printed when
/// `verbose` is set and logged otherwise; debug messages only go to the log.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    verbose: bool,
    errors: usize,
    warnings: usize,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => {
                self.errors += 1;
                error(message);
            }
            Severity::Warn => {
                self.warnings += 1;
                warn(&format!("  {message}"));
            }
            Severity::Info if self.verbose => info(message),
            Severity::Info => log::info!("{message}"),
            Severity::Debug => log::debug!("{message}"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
