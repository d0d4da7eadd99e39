//! Basic client usage.
//!
//! Reads `ERPNEXT_URL`, `ERPNEXT_API_KEY` and `ERPNEXT_API_SECRET` from the
//! environment, discovers doctypes, lists a few customers and runs a report.
//!
//! Run with: cargo run --example basic_usage

use erpnext_client::{DocListQuery, ErpNextApi, ErpNextClient, ErpNextResult};
use serde_json::{json, Map, Value};

#[tokio::main]
async fn main() -> ErpNextResult<()> {
    tracing_subscriber::fmt::init();

    let client = ErpNextClient::from_env()?;
    println!("Connected to {}", client.base_url());
    if !client.is_authenticated() {
        println!("No API credentials configured; most calls will be rejected");
    }

    // Never fails: falls back to a built-in list
    let doctypes = client.get_all_doctypes().await;
    println!("\n{} doctypes available", doctypes.len());
    for name in doctypes.iter().take(10) {
        println!("  {}", name);
    }

    println!("\nListing customers...");
    let query = DocListQuery::new()
        .fields(["name", "customer_name", "customer_group"])
        .filters(Map::from_iter([("disabled".to_string(), json!(0))]))
        .limit(5);
    let customers = client.get_doc_list("Customer", &query).await?;
    for customer in &customers {
        println!(
            "  {} ({})",
            customer["name"].as_str().unwrap_or_default(),
            customer["customer_group"].as_str().unwrap_or("-")
        );
    }

    if let Some(Value::String(name)) = customers.first().map(|c| c["name"].clone()) {
        let doc = client.get_document("Customer", &name).await?;
        println!("\nFirst customer has {} fields", doc.as_object().map_or(0, |o| o.len()));
    }

    println!("\nRunning report...");
    match client.run_report("Accounts Receivable", None).await {
        Ok(result) => println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default()),
        Err(e) => println!("Report failed: {}", e),
    }

    Ok(())
}
