//! Output formatting for CLI responses.

use toolbox_types::DiagnosticError;

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

/// Prints the cause and fix of a diagnosable error, when it has them.
pub fn print_diagnostic(err: &dyn DiagnosticError) {
    if let Some(hint) = err.hint() {
        eprintln!("\n  Cause: {hint}");
    }
    if let Some(fix) = err.fix() {
        eprintln!("  Fix:   {fix}\n");
    }
}

/// Left-pads tool names so descriptions line up.
pub fn tool_row(name: &str, description: &str, width: usize) -> String {
    format!("  {name:<width$}  {description}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_row_aligns_descriptions() {
        assert_eq!(tool_row("echo", "Echoes.", 6), "  echo    Echoes.");
        assert_eq!(tool_row("random", "Rolls.", 6), "  random  Rolls.");
    }
}
