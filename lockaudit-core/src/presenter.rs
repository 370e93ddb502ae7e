//! Report-mode output and exit code.

use crate::error::AuditError;
use crate::ports::Printer;
use lockaudit_types::audit::{AuditResult, Severity, SeverityCounts};

/// Print the full report and derive the report-mode exit code.
pub fn present(
    result: &AuditResult,
    printer: &dyn Printer,
    level: Severity,
) -> Result<u8, AuditError> {
    printer.print_full_report(result)?;
    Ok(exit_code_for(&result.metadata.vulnerabilities, level))
}

/// 1 when any vulnerability at or above `level` was found, else 0.
pub fn exit_code_for(counts: &SeverityCounts, level: Severity) -> u8 {
    if counts.count_at_or_above(level) > 0 { 1 } else { 0 }
}
