use super::args::*;

pub mod check;
pub mod check_digit;
pub mod products;
pub mod register;
pub mod verify;

use crate::exit_codes::SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let out = Output { format: cli.format };
    match cli.cmd {
        Command::Check(args) => Ok(check::run(&args, out)),
        Command::CheckDigit(args) => check_digit::run(&args, out),
        Command::Register(args) => register::run(&args, &cli.store, out).await,
        Command::Verify(args) => verify::run(&args, out).await,
        Command::Products(args) => products::run(args.cmd, &cli.store, out),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}

/// Where command results go.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub format: OutputFormat,
}

impl Output {
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn json<T: serde::Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
