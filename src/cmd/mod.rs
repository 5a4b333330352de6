pub mod check;
pub mod nit;
pub mod payroll;
pub mod reconcile;
pub mod schema;

use crate::fiscal::{FiscalConstants, FiscalYear};
use crate::records::ImportIssue;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Open an input file, or stdin with "-".
pub fn open_input(path: &Path) -> anyhow::Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        let file = File::open(path)
            .map_err(|e| anyhow::anyhow!("cannot open {}: {}", path.display(), e))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Resolve fiscal constants: an explicit constants file wins, otherwise the
/// built-in table for the requested year.
pub fn load_constants(year: i32, constants_file: Option<&Path>) -> anyhow::Result<FiscalConstants> {
    match constants_file {
        Some(path) => {
            let reader = open_input(path)?;
            FiscalConstants::from_json(reader)
                .map_err(|e| anyhow::anyhow!("invalid constants file {}: {}", path.display(), e))
        }
        None => {
            let constants = FiscalConstants::for_year(FiscalYear(year))?;
            constants.validate()?;
            Ok(constants)
        }
    }
}

/// Print excluded rows the way the source file numbered them.
pub fn print_issues(label: &str, issues: &[ImportIssue]) {
    if issues.is_empty() {
        return;
    }
    eprintln!("\u{26A0} {} row(s) excluded from {}:", issues.len(), label);
    for issue in issues {
        eprintln!("  {}", issue);
    }
}
