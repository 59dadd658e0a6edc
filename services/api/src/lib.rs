mod cli;
mod demo;
mod infra;
mod routes;
mod scoring;
mod server;

use kapital_admin::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
