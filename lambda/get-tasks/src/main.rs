use lambda_http::{run, service_fn, tracing, Error};
use tasks_core::DynamoStore;
mod http_handler;
use http_handler::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let client = aws_sdk_dynamodb::Client::new(&config);
    let table_name = std::env::var("TABLE_NAME").map_err(|_| Error::from("TABLE_NAME not set"))?;
    let store = DynamoStore::new(client, table_name);

    run(service_fn(|event| function_handler(&store, event))).await
}
