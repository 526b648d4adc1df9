use std::path::PathBuf;

use anyhow::Context;

use fireline_core::FdcConfig;
use fireline_fdc_node::FdcNode;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fireline_core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let config = match parse_config_path(&args)? {
        Some(path) => FdcConfig::from_file(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => {
            tracing::info!("no --config given, using defaults");
            FdcConfig::default_config()
        }
    };

    let (node, _handle) = FdcNode::bind(config).await?;
    node.run().await;
    Ok(())
}

fn parse_config_path(args: &[String]) -> anyhow::Result<Option<PathBuf>> {
    let mut args_iter = args.iter();
    while let Some(arg) = args_iter.next() {
        if arg == "--config" {
            return match args_iter.next() {
                Some(path) => Ok(Some(PathBuf::from(path))),
                None => Err(anyhow::anyhow!("--config was provided without a path")),
            };
        }
    }
    Ok(None)
}
