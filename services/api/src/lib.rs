mod cli;
mod generate;
mod infra;
mod profile;
mod routes;
mod server;

use autocv::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
