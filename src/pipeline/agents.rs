//! Agent count: page through the asset inventory and count computer agents

use tracing::info;

use super::failures::FailureSink;
use super::pagination::collect_offset_pages;
use crate::api::AssetApi;
use crate::types::AssetRecord;

const ASSETS_RESOURCE: &str = "assets";

/// Every fetched asset plus the number flagged `IsComputerAgent`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentCount {
    pub assets: Vec<AssetRecord>,
    pub computer_agents: usize,
}

/// Page through the asset list with `$skip`/`$top`
pub async fn fetch_asset_list<A>(
    api: &A,
    top: u64,
    failures: &mut dyn FailureSink,
) -> Vec<AssetRecord>
where
    A: AssetApi + ?Sized,
{
    collect_offset_pages(
        ASSETS_RESOURCE,
        top,
        |skip, top| api.list_assets(skip, top),
        failures,
    )
    .await
}

pub fn count_computer_agents(assets: &[AssetRecord]) -> usize {
    assets.iter().filter(|asset| asset.is_computer_agent()).count()
}

/// Fetch the full inventory and aggregate it
pub async fn run_agent_count<A>(api: &A, top: u64, failures: &mut dyn FailureSink) -> AgentCount
where
    A: AssetApi + ?Sized,
{
    let assets = fetch_asset_list(api, top, failures).await;
    let computer_agents = count_computer_agents(&assets);
    info!(
        "Fetched {} assets, {} computer agents",
        assets.len(),
        computer_agents
    );
    AgentCount {
        assets,
        computer_agents,
    }
}
