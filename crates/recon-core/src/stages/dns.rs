use super::{Stage, StageContext, StageOutput};
use crate::chain::ChainOutcome;
use crate::error::Result;
use crate::report::{DnsRecords, Fragment, StageKind};
use crate::traits::DnsRecordType;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Resolves A, MX, NS and TXT for the domain
///
/// MX/NS/TXT are only queried once the A lookup produced at least one
/// address; otherwise they stay empty and `dependent_lookups_skipped` is set.
/// The section's provenance is that of the A lookup; MX/NS/TXT lookups
/// that exhausted the chain are listed in `defaulted_lookups`.
pub struct DnsStage;

impl DnsStage {
    async fn lookup(ctx: &StageContext, record_type: DnsRecordType) -> ChainOutcome<Vec<String>> {
        let name = ctx.domain.as_str();
        ctx.providers
            .dns
            .resolve(
                |resolver| async move { resolver.resolve(name, record_type).await },
                Vec::new,
            )
            .await
    }
}

#[async_trait]
impl Stage for DnsStage {
    fn kind(&self) -> StageKind {
        StageKind::Dns
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput> {
        let (a, status) = Self::lookup(ctx, DnsRecordType::A).await.into_parts();

        if a.is_empty() {
            debug!("dns: no A record for {}, skipping MX/NS/TXT", ctx.domain);
            let records = DnsRecords {
                dependent_lookups_skipped: true,
                ..DnsRecords::default()
            };
            return Ok(StageOutput {
                fragment: Fragment::Dns(records),
                status,
            });
        }

        let (mx, ns, txt) = tokio::join!(
            Self::lookup(ctx, DnsRecordType::Mx),
            Self::lookup(ctx, DnsRecordType::Ns),
            Self::lookup(ctx, DnsRecordType::Txt),
        );

        let mut defaulted_lookups = Vec::new();
        let mut take = |record_type: DnsRecordType, outcome: ChainOutcome<Vec<String>>| {
            if outcome.is_defaulted() {
                warn!("dns: {} lookup for {} defaulted", record_type, ctx.domain);
                defaulted_lookups.push(record_type);
            }
            outcome.into_value()
        };

        let mx = take(DnsRecordType::Mx, mx);
        let ns = take(DnsRecordType::Ns, ns);
        let txt = take(DnsRecordType::Txt, txt);

        let records = DnsRecords {
            a,
            mx,
            ns,
            txt,
            dependent_lookups_skipped: false,
            defaulted_lookups,
        };

        Ok(StageOutput {
            fragment: Fragment::Dns(records),
            status,
        })
    }
}
