use aws_config::SdkConfig;
use aws_sdk_dynamodb::Client;
use shared::Config;

/// DynamoDB client bound to the todos table and its user-id index
#[derive(Clone)]
pub struct DynamoDbClient {
    client: Client,
    table_name: String,
    user_id_index: String,
}

impl DynamoDbClient {
    pub fn new(sdk_config: &SdkConfig, config: &Config) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);
        if let Some(endpoint) = &config.dynamodb_endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Self::from_client(
            Client::from_conf(builder.build()),
            config.todos_table.clone(),
            config.user_id_index.clone(),
        )
    }

    pub fn from_client(client: Client, table_name: String, user_id_index: String) -> Self {
        Self {
            client,
            table_name,
            user_id_index,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn user_id_index(&self) -> &str {
        &self.user_id_index
    }
}
