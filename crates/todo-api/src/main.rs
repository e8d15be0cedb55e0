use infrastructure::{DynamoDbClient, DynamoTodoRepository, S3AttachmentStorage};
use lambda_http::{run, service_fn, Error, Request};
use shared::{init_tracing, Config};
use std::sync::Arc;
use todo_api::{AppState, TodoService};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing()?;

    let config = Config::from_env()?;
    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    let repository = DynamoTodoRepository::new(DynamoDbClient::new(&sdk_config, &config));
    let storage = S3AttachmentStorage::new(&sdk_config, &config);

    let state = AppState {
        service: TodoService::new(
            Arc::new(repository),
            Arc::new(storage),
            config.attachments_bucket.clone(),
        ),
        include_error_details: !config.is_production(),
    };

    info!(
        environment = %config.environment,
        table = %config.todos_table,
        bucket = %config.attachments_bucket,
        "Todo API starting"
    );

    run(service_fn(move |req: Request| {
        let state = state.clone();
        async move { todo_api::route(req, &state).await }
    }))
    .await
}
