use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod common;
pub mod products;
pub mod register;
pub use common::*;
pub use products::*;
pub use register::*;

#[derive(Parser, Debug)]
#[command(
    name = "vitrine",
    version,
    about = "Product catalog tools with GTIN validation and GS1 Brasil registration"
)]
pub struct Cli {
    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Catalog file
    #[arg(long, global = true, env = "VITRINE_STORE", default_value = "products.json")]
    pub store: PathBuf,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate GTIN check digits
    Check(CheckArgs),
    /// Append the check digit to an identifier body
    CheckDigit(CheckDigitArgs),
    /// Register a product with GS1 Brasil
    Register(RegisterArgs),
    /// Look up an identifier in the registry
    Verify(VerifyArgs),
    /// Manage catalog records
    Products(ProductsArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Identifiers to validate (separators are ignored)
    #[arg(required = true)]
    pub identifiers: Vec<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CheckDigitArgs {
    /// 7, 11, 12 or 13 digit body
    pub body: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Identifier to look up
    pub identifier: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "vitrine",
            "check",
            "7891234567895",
            "--format",
            "json",
            "--store",
            "/tmp/p.json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.store, PathBuf::from("/tmp/p.json"));
        assert!(matches!(cli.cmd, Command::Check(ref a) if a.identifiers.len() == 1));
    }

    #[test]
    fn test_check_requires_identifier() {
        assert!(Cli::try_parse_from(["vitrine", "check"]).is_err());
    }

    #[test]
    fn test_register_record_conflicts_with_description() {
        let result = Cli::try_parse_from([
            "vitrine",
            "register",
            "--record",
            "6f1c1b1e-0000-4000-8000-000000000001",
            "--description",
            "Caneca",
        ]);
        assert!(result.is_err());
    }
}
