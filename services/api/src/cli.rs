use crate::demo::{run_demo, DemoArgs};
use crate::report::{run_evaluate, run_validate, EvaluateArgs, ValidateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tender_scoring::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tender Scoring",
    about = "Rank tender bids with weighted multi-criteria scoring and surface decision risks",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score an evaluation bundle and print the decision summary
    Evaluate(EvaluateArgs),
    /// Check the scoring configuration of an evaluation bundle
    Validate(ValidateArgs),
    /// Score a built-in three-bidder tender against the default template
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Validate(args) => run_validate(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn evaluate_collects_repeated_weight_overrides() {
        let cli = Cli::try_parse_from([
            "tender-scoring",
            "evaluate",
            "--input",
            "bundle.json",
            "--weight",
            "schedule=20",
            "--weight",
            "total_price=35.5",
            "--category-weight",
            "economic=60",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Evaluate(args)) => {
                assert_eq!(
                    args.weights,
                    vec![
                        ("schedule".to_string(), 20.0),
                        ("total_price".to_string(), 35.5)
                    ]
                );
                assert_eq!(args.category_weights, vec![("economic".to_string(), 60.0)]);
                assert!(args.json);
                assert!(args.offers.is_none());
            }
            other => panic!("expected evaluate command, got {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["tender-scoring"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
