use lambda_http::{run, service_fn, tracing, Error};

mod config;
mod error;
mod http_handler;
mod record;
mod repository;
mod store;
mod user;
mod validators;

use config::Config;
use http_handler::function_handler;
use repository::UserRepository;
use store::DynamoUserStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env();
    tracing::info!(table = %config.table_name, "starting users function");

    let sdk_config = config.sdk_config().await;
    let client = aws_sdk_dynamodb::Client::new(&sdk_config);
    let users = UserRepository::new(DynamoUserStore::new(client, config.table_name));

    run(service_fn(|event| function_handler(&users, event))).await
}
