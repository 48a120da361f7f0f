use super::{PLACEHOLDER_UNKNOWN, Stage, StageContext, StageOutput};
use crate::error::Result;
use crate::report::{Fragment, History, HistorySnapshot, StageKind};
use async_trait::async_trait;

/// Archive history placeholder
///
/// Without an archive source the only observation is the current run.
pub struct HistoryStage;

#[async_trait]
impl Stage for HistoryStage {
    fn kind(&self) -> StageKind {
        StageKind::History
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput> {
        let snapshot = HistorySnapshot {
            date: ctx.report.generated_at.format("%Y-%m-%d").to_string(),
            note: "Observed by this run; no archive source configured".to_string(),
        };

        Ok(StageOutput::placeholder(Fragment::History(History {
            first_seen: PLACEHOLDER_UNKNOWN.to_string(),
            snapshots: vec![snapshot],
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::empty_context;
    use super::*;

    #[tokio::test]
    async fn records_the_current_run_only() {
        let ctx = empty_context("acme.io");
        let output = HistoryStage.run(&ctx).await.unwrap();
        let Fragment::History(history) = output.fragment else {
            panic!("expected history fragment");
        };
        assert_eq!(history.first_seen, PLACEHOLDER_UNKNOWN);
        assert_eq!(history.snapshots.len(), 1);
        assert_eq!(
            history.snapshots[0].date,
            ctx.report.generated_at.format("%Y-%m-%d").to_string()
        );
    }
}
