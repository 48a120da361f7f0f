use super::{Stage, StageContext, StageOutput};
use crate::error::Result;
use crate::report::{Fragment, Port, StageKind};
use async_trait::async_trait;

/// Services implied by the DNS records; no port is actually scanned
pub struct PortStage;

fn port(port: u16, protocol: &str, service: &str, evidence: &str) -> Port {
    Port {
        port,
        protocol: protocol.to_string(),
        service: service.to_string(),
        evidence: evidence.to_string(),
    }
}

#[async_trait]
impl Stage for PortStage {
    fn kind(&self) -> StageKind {
        StageKind::Ports
    }

    fn dependencies(&self) -> &'static [StageKind] {
        &[StageKind::Dns]
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput> {
        let dns = &ctx.report.dns.data;
        let mut ports = Vec::new();

        if !dns.a.is_empty() {
            ports.push(port(80, "tcp", "http", "A record"));
            ports.push(port(443, "tcp", "https", "A record"));
        }

        if !dns.mx.is_empty() {
            ports.push(port(25, "tcp", "smtp", "MX record"));
            ports.push(port(587, "tcp", "submission", "MX record"));
            ports.push(port(993, "tcp", "imaps", "MX record"));
        }

        // An in-zone nameserver answers on the domain's own hosts
        let suffix = format!(".{}", ctx.domain);
        if dns
            .ns
            .iter()
            .any(|ns| ns.trim_end_matches('.').ends_with(&suffix))
        {
            ports.push(port(53, "udp", "dns", "in-zone NS record"));
        }

        Ok(StageOutput::derived(Fragment::Ports(ports)))
    }
}
