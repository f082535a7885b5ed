use tracing_subscriber::EnvFilter;
use yadirect::{Config, CredentialValidator, DirectError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("yadirect=info")),
        )
        .init();

    let config = Config::from_env()?;
    let validator: CredentialValidator = config.client_builder().build_credential_validator()?;

    match validator.validate(config.credentials()).await {
        Ok(()) => println!("credentials accepted"),
        Err(DirectError::InvalidCredentials { detail, code }) => {
            println!("credentials rejected (code {code:?}): {detail}");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
