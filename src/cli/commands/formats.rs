//! Formats command implementation
//!
//! Lists every supported format tag with its layout, target table and merge keys.

use super::shared::ProcessingStats;
use crate::app::models::FormatTag;
use crate::app::services::load_target::LoadTarget;
use crate::cli::args::{FormatsArgs, OutputFormat};
use crate::Result;
use colored::Colorize;
use serde::Serialize;

/// One row of the format listing
#[derive(Debug, Clone, Serialize)]
pub struct FormatEntry {
    pub tag: &'static str,
    pub layout: &'static str,
    pub minimum_length: usize,
    pub table: &'static str,
    pub merge_keys: &'static [&'static str],
}

/// Listing for every supported tag, in display order
pub fn format_entries() -> Vec<FormatEntry> {
    FormatTag::ALL
        .iter()
        .map(|tag| {
            let layout = tag.layout();
            let target = LoadTarget::for_layout(layout);
            FormatEntry {
                tag: tag.as_str(),
                layout: layout.name(),
                minimum_length: layout.minimum_length(),
                table: target.table,
                merge_keys: target.merge_keys,
            }
        })
        .collect()
}

/// Formats command runner
pub async fn run_formats(args: FormatsArgs) -> Result<ProcessingStats> {
    let entries = format_entries();

    match args.output_format {
        OutputFormat::Human => {
            println!("{}", "Supported JRDB formats".bold());
            println!(
                "  {:<5} {:<22} {:>7}  {:<15} {}",
                "TAG", "LAYOUT", "MIN LEN", "TABLE", "MERGE KEYS"
            );
            for entry in &entries {
                println!(
                    "  {:<5} {:<22} {:>7}  {:<15} {}",
                    entry.tag.cyan(),
                    entry.layout,
                    entry.minimum_length,
                    entry.table,
                    entry.merge_keys.join(", ")
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Csv => {
            println!("tag,layout,minimum_length,table,merge_keys");
            for entry in &entries {
                println!(
                    "{},{},{},{},{}",
                    entry.tag,
                    entry.layout,
                    entry.minimum_length,
                    entry.table,
                    entry.merge_keys.join("|")
                );
            }
        }
    }

    Ok(ProcessingStats::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tag_is_listed() {
        let entries = format_entries();
        assert_eq!(entries.len(), FormatTag::ALL.len());

        let kka = entries.iter().find(|entry| entry.tag == "KKA").unwrap();
        assert_eq!(kka.table, "horse_stats");
        assert_eq!(kka.merge_keys, &["race_id", "horse_number"]);

        let results: Vec<&str> = entries
            .iter()
            .filter(|entry| entry.table == "horse_results")
            .map(|entry| entry.tag)
            .collect();
        assert_eq!(results, vec!["KYF", "KYG", "KYH", "SEC", "SED"]);
    }
}
