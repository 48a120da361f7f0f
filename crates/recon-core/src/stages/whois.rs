use super::{PLACEHOLDER_UNKNOWN, Stage, StageContext, StageOutput};
use crate::error::Result;
use crate::report::{Fragment, StageKind, Whois};
use async_trait::async_trait;

/// Registration record built from the DNS section
///
/// No WHOIS source is queried; nameservers are copied from the NS records
/// and every other field is a placeholder.
pub struct WhoisStage;

#[async_trait]
impl Stage for WhoisStage {
    fn kind(&self) -> StageKind {
        StageKind::Whois
    }

    fn dependencies(&self) -> &'static [StageKind] {
        &[StageKind::Dns]
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput> {
        let nameservers = ctx
            .report
            .dns
            .data
            .ns
            .iter()
            .map(|ns| ns.trim_end_matches('.').to_ascii_lowercase())
            .collect();

        Ok(StageOutput::placeholder(Fragment::Whois(Whois {
            registrar: PLACEHOLDER_UNKNOWN.to_string(),
            registrant: PLACEHOLDER_UNKNOWN.to_string(),
            created: PLACEHOLDER_UNKNOWN.to_string(),
            expires: PLACEHOLDER_UNKNOWN.to_string(),
            nameservers,
            statuses: Vec::new(),
        })))
    }
}
