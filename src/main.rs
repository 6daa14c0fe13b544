use std::net::TcpListener;
use std::sync::Arc;

use token_gateway::auth::{HttpCredentialCheck, SessionAuthenticator, SystemClock};
use token_gateway::configuration::get_configuration;
use token_gateway::startup::run;
use token_gateway::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_subscriber(get_subscriber("info", std::io::stdout))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let credentials = HttpCredentialCheck::new(
        configuration.credentials.user_exist_endpoint.clone(),
        configuration.credentials.timeout(),
    )
    .map_err(|e| {
        tracing::error!("Failed to build credential service client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, "HTTP client error")
    })?;
    tracing::info!(endpoint = %credentials.endpoint(), "Credential service configured");

    let authenticator =
        SessionAuthenticator::new(&configuration.auth, Arc::new(SystemClock), credentials)
            .map_err(|e| {
                tracing::error!("Invalid authentication settings: {}", e);
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "Configuration error")
            })?;

    let address = configuration.application.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(listener, authenticator)?;
    server.await
}
