use clap::{Parser, Subcommand};

mod cmd;
mod engine;
mod fiscal;
mod records;

#[derive(Parser, Debug)]
#[command(
    name = "fiscol",
    version,
    about = "Colombian fiscal compliance checks and bank/book ledger reconciliation"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Audit an expense export against cash and withholding thresholds
    Check(cmd::check::CheckCommand),
    /// Apply the 40% non-salary cap and project employer cost
    Payroll(cmd::payroll::PayrollCommand),
    /// Match a bank extract against book entries
    Reconcile(cmd::reconcile::ReconcileCommand),
    /// Compute NIT check digits
    Nit(cmd::nit::NitCommand),
    /// Print expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Check(cmd) => cmd.exec(),
        Command::Payroll(cmd) => cmd.exec(),
        Command::Reconcile(cmd) => cmd.exec(),
        Command::Nit(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
