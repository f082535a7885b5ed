use tracing_subscriber::EnvFilter;
use yadirect::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("yadirect=info")),
        )
        .init();

    let config = Config::from_env()?;
    let client = config.client_builder().build_account_info_client()?;
    let standing = client.standing(config.credentials()).await?;

    println!("API units left: {}", standing.quota_units_remaining);
    match standing.balance {
        Some(balance) => println!("balance: {balance}"),
        None => println!("balance: not reported"),
    }

    Ok(())
}
