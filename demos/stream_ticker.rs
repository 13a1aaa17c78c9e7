//! Stream public market data for btc_usd and print every decoded event.
//!
//! ```bash
//! cargo run --example stream_ticker
//! ```

use okcoin_ws::kernel::TungsteniteWs;
use okcoin_ws::{OkcoinConfig, OkcoinWsClient, Region};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let region = Region::International;
    let config = OkcoinConfig::read_only()
        .region(region)
        .enabled_pairs(vec!["btc_usd".to_string()]);

    let transport = TungsteniteWs::new(region.websocket_url().to_string(), "okcoin".to_string());
    let (mut client, mut events) = OkcoinWsClient::new(config, transport);

    let handle = client.handle();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        handle.shutdown();
    });

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            println!("{}: {:?}", event.channel(), event);
        }
    });

    client.run().await?;
    drop(client);
    printer.await?;
    Ok(())
}
