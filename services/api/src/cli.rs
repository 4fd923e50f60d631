use crate::generate::{run_fields, run_generate, GenerateArgs};
use crate::profile::{run_profile_set, run_profile_show, ProfileSetArgs, ProfileShowArgs};
use crate::server;
use autocv::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "autocv",
    about = "Fill cover letter templates from an applicant profile and serve them over HTTP",
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
    /// Fill the cover letter template and optionally print it to PDF
    Generate(GenerateArgs),
    /// List the template markers in the order they are filled
    Fields,
    /// Inspect or edit the stored applicant profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    /// Print the parsed applicant profile
    Show(ProfileShowArgs),
    /// Create the applicant profile or update some of its fields
    Set(ProfileSetArgs),
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
        Command::Generate(args) => run_generate(args),
        Command::Fields => run_fields(),
        Command::Profile {
            command: ProfileCommand::Show(args),
        } => run_profile_show(args),
        Command::Profile {
            command: ProfileCommand::Set(args),
        } => run_profile_set(args),
    }
}
