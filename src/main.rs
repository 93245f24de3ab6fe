use std::time::Duration;

use gossip_cluster::node::config::GossipConfig;
use gossip_cluster::sim::driver::run_simulation;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut num_nodes: usize = 8;
    let mut run_secs: u64 = 30;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--nodes" => {
                num_nodes = args[i + 1].parse()?;
                i += 2;
            }
            "--run-secs" => {
                run_secs = args[i + 1].parse()?;
                i += 2;
            }
            "--help" | "-h" => {
                eprintln!("Usage: {} [--nodes <n>] [--run-secs <s>]", args[0]);
                eprintln!("Example: {} --nodes 8 --run-secs 30", args[0]);
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    tracing::info!("Starting gossip cluster: {} nodes for {}s", num_nodes, run_secs);

    let config = GossipConfig::new(num_nodes);
    let tables = run_simulation(config, Duration::from_secs(run_secs)).await?;

    for table in &tables {
        let mut counters: Vec<_> = table
            .members()
            .map(|record| (record.id, record.counter))
            .collect();
        counters.sort();
        let view: Vec<String> = counters
            .iter()
            .map(|(id, counter)| format!("{}:{}", id, counter))
            .collect();
        tracing::info!("node {} final view: [{}]", table.own_id(), view.join(", "));
    }

    Ok(())
}
