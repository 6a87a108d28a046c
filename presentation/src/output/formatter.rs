//! Output formatter trait

use council_application::RunSessionOutput;
use council_domain::OutputFormat;

/// Trait for formatting session results
pub trait OutputFormatter {
    /// Format the complete transcript plus decision artifacts
    fn format_full(&self, output: &RunSessionOutput) -> String;

    /// Format the outcome, decision artifacts and summary only
    fn format_summary(&self, output: &RunSessionOutput) -> String;

    /// Format as JSON
    fn format_json(&self, output: &RunSessionOutput) -> String;

    /// Dispatch on the configured output format
    fn format(&self, output: &RunSessionOutput, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format_full(output),
            OutputFormat::Summary => self.format_summary(output),
            OutputFormat::Json => self.format_json(output),
        }
    }
}
