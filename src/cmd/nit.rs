//! Nit command - compute NIT check digits

use crate::fiscal::TaxId;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct NitCommand {
    /// NIT bodies (digits only, without the check digit)
    #[arg(required = true)]
    identifiers: Vec<String>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct NitOutput {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    check_digit: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl NitCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let outputs: Vec<NitOutput> = self
            .identifiers
            .iter()
            .map(|raw| match TaxId::parse(raw) {
                Ok(id) => NitOutput {
                    input: raw.clone(),
                    check_digit: Some(id.check_digit()),
                    error: None,
                },
                Err(e) => NitOutput {
                    input: raw.clone(),
                    check_digit: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outputs)?);
        } else {
            for output in &outputs {
                match output.check_digit {
                    Some(dv) => println!("{}-{}", output.input, dv),
                    None => println!(
                        "{}: {}",
                        output.input,
                        output.error.as_deref().unwrap_or("invalid")
                    ),
                }
            }
        }

        if outputs.iter().any(|o| o.error.is_some()) {
            std::process::exit(1);
        }
        Ok(())
    }
}
