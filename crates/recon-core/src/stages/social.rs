use super::{Stage, StageContext, StageOutput};
use crate::error::Result;
use crate::report::{Fragment, SocialProfile, StageKind};
use async_trait::async_trait;

/// (platform, profile URL template); `{handle}` is replaced
pub const SOCIAL_PLATFORMS: &[(&str, &str)] = &[
    ("twitter", "https://twitter.com/{handle}"),
    ("facebook", "https://www.facebook.com/{handle}"),
    ("instagram", "https://www.instagram.com/{handle}"),
    ("linkedin", "https://www.linkedin.com/company/{handle}"),
    ("github", "https://github.com/{handle}"),
    ("youtube", "https://www.youtube.com/@{handle}"),
];

/// Candidate profiles named after the domain's first label
///
/// Nothing is fetched: every profile is reported with `verified: false`.
pub struct SocialStage;

#[async_trait]
impl Stage for SocialStage {
    fn kind(&self) -> StageKind {
        StageKind::Social
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput> {
        let handle = ctx.domain.first_label();
        let profiles = SOCIAL_PLATFORMS
            .iter()
            .map(|(platform, template)| SocialProfile {
                platform: platform.to_string(),
                handle: handle.to_string(),
                url: template.replace("{handle}", handle),
                verified: false,
            })
            .collect();

        Ok(StageOutput::derived(Fragment::Social(profiles)))
    }
}
