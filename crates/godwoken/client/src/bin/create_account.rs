use clap::Parser;
use godwoken_client::{
    run_create_account, CreateAccountArgs, GodwokenClient, TransactionOrchestrator,
};
use godwoken_lib::{setup_tracing, L2Signer};
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = CreateAccountArgs::parse();
    setup_tracing(args.log_format)?;

    let config = args.client_config()?;
    let client = GodwokenClient::builder(config.rpc_url.clone())
        .request_timeout(config.request_timeout())
        .build()?;
    info!(rpc_url = %client.url(), poll = ?config.poll_config(), "Connecting to node");
    let orchestrator = TransactionOrchestrator::connect(client, config.poll_config()).await?;

    let target_eth_address = args
        .target_eth_address
        .unwrap_or_else(|| L2Signer::random().eth_address());

    let report = run_create_account(
        &orchestrator,
        &args.private_key,
        target_eth_address,
        config.fee(),
        config.block_producer_id,
        !args.skip_fee_check,
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
