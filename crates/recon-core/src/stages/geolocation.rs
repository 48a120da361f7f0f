use super::{Stage, StageContext, StageOutput};
use crate::error::Result;
use crate::report::{Fragment, Geolocation, StageKind};
use async_trait::async_trait;

/// Locates the domain through the geolocation chain
///
/// Providers are tried in configured order; when all of them fail the
/// section carries [`Geolocation::fallback`] tagged `Defaulted`.
pub struct GeolocationStage;

#[async_trait]
impl Stage for GeolocationStage {
    fn kind(&self) -> StageKind {
        StageKind::Geolocation
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput> {
        let host = ctx.domain.as_str();
        let outcome = ctx
            .providers
            .geolocation
            .resolve(
                |provider| async move { provider.locate(host).await },
                Geolocation::fallback,
            )
            .await;

        Ok(StageOutput::from_outcome(outcome, Fragment::Geolocation))
    }
}
