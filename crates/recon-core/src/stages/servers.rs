use super::{Stage, StageContext, StageOutput};
use crate::error::Result;
use crate::report::{Fragment, Server, StageKind};
use async_trait::async_trait;

/// One server per A record, tagged with the geolocation country and org
pub struct ServerStage;

#[async_trait]
impl Stage for ServerStage {
    fn kind(&self) -> StageKind {
        StageKind::Servers
    }

    fn dependencies(&self) -> &'static [StageKind] {
        &[StageKind::Dns, StageKind::Geolocation]
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput> {
        let dns = &ctx.report.dns.data;
        let geo = &ctx.report.geolocation.data;

        let servers = dns
            .a
            .iter()
            .map(|ip| Server {
                ip: ip.clone(),
                country: geo.country.clone(),
                org: geo.org.clone(),
                role: if *ip == geo.ip { "primary" } else { "web" }.to_string(),
            })
            .collect();

        Ok(StageOutput::derived(Fragment::Servers(servers)))
    }
}
