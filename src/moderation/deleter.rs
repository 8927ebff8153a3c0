//! Best-effort bulk deletion of one actor's messages in a channel.
//!
//! The routine chunks the actor's filtered history into fixed-size batches
//! and picks a deletion path per batch: one bulk call for batches young
//! enough for the platform's bulk-delete age ceiling, one call per message
//! otherwise. Batches run strictly in order so a partial failure has a
//! predictable boundary; deletes within an individual batch run concurrently.
//!
//! Known limitation: concurrent invocations against the same channel by the
//! same actor are not guarded against each other.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::{
    config::ModerationConfig,
    models::{ChannelId, ChannelMessage, MessageId, UserId},
    moderation::range::DeletionRange,
    providers::traits::{DeleteCapability, HistoryError, HistoryProvider},
};

/// A single message that could not be deleted.
#[derive(Debug)]
pub struct DeleteFailure {
    /// The message that failed to delete.
    pub message: MessageId,
    /// The platform's reason.
    pub reason: String,
}

/// The outcome of one deletion run.
///
/// The operation is best-effort complete: individual failures are recorded
/// here rather than aborting the remaining batches.
#[derive(Debug, Default)]
pub struct DeletionReport {
    /// How many messages were successfully deleted.
    pub deleted: usize,
    /// Messages that could not be deleted, with reasons.
    pub failures: Vec<DeleteFailure>,
}

/// Errors that abort a deletion run before any batch is processed.
#[derive(Debug, Error)]
pub enum DeletionError {
    /// The channel history could not be retrieved.
    #[error("failed to fetch channel history: {0}")]
    History(#[from] HistoryError),
}

/// Deletes an actor's messages from a channel in ordered batches.
pub struct BulkMessageDeleter<H: HistoryProvider + ?Sized, D: DeleteCapability + ?Sized> {
    /// The channel history capability.
    history: Arc<H>,
    /// The message deletion capability.
    deleter: Arc<D>,
    /// How many messages form one batch.
    batch_size: usize,
    /// Age above which the platform rejects bulk deletion.
    bulk_age_ceiling: Duration,
}

impl<H, D> BulkMessageDeleter<H, D>
where
    H: HistoryProvider + ?Sized,
    D: DeleteCapability + ?Sized,
{
    /// Creates a new `BulkMessageDeleter` from the moderation settings.
    pub fn new(history: Arc<H>, deleter: Arc<D>, config: &ModerationConfig) -> Self {
        Self {
            history,
            deleter,
            batch_size: config.batch_size,
            bulk_age_ceiling: Duration::days(config.bulk_age_ceiling_days),
        }
    }

    /// Deletes the actor's messages in the channel within the given range.
    ///
    /// Fetches the channel history bounded by the range, keeps only the
    /// actor's messages, and processes them in arrival order in batches of
    /// the configured size. Returns the count of deleted messages together
    /// with any per-message failures.
    pub async fn delete(
        &self,
        actor: UserId,
        channel: ChannelId,
        range: DeletionRange,
        invoked_at: DateTime<Utc>,
    ) -> Result<DeletionReport, DeletionError> {
        let since = range.since(invoked_at);
        let history = self.history.fetch(channel, since).await?;
        let targets: Vec<ChannelMessage> = history
            .into_iter()
            .filter(|message| message.author_id == actor)
            .collect();

        tracing::debug!(
            actor = %actor,
            channel = %channel,
            candidates = targets.len(),
            "Starting deletion run."
        );

        let cutoff = invoked_at - self.bulk_age_ceiling;
        let mut report = DeletionReport::default();

        for batch in targets.chunks(self.batch_size) {
            if requires_individual_deletes(batch, cutoff) {
                self.delete_individually(channel, batch, &mut report).await;
            } else {
                self.delete_in_bulk(channel, batch, &mut report).await;
            }
        }

        tracing::info!(
            actor = %actor,
            channel = %channel,
            deleted = report.deleted,
            failed = report.failures.len(),
            "Deletion run finished."
        );
        Ok(report)
    }

    /// Deletes a batch one message at a time; the calls run concurrently and
    /// all settle before the next batch starts.
    async fn delete_individually(
        &self,
        channel: ChannelId,
        batch: &[ChannelMessage],
        report: &mut DeletionReport,
    ) {
        let deletes = batch.iter().map(|message| {
            let id = message.id;
            async move { (id, self.deleter.delete_one(channel, id).await) }
        });

        for (id, result) in futures::future::join_all(deletes).await {
            match result {
                Ok(()) => report.deleted += 1,
                Err(e) => report.failures.push(DeleteFailure {
                    message: id,
                    reason: e.to_string(),
                }),
            }
        }
    }

    /// Deletes a whole batch in a single platform call.
    async fn delete_in_bulk(
        &self,
        channel: ChannelId,
        batch: &[ChannelMessage],
        report: &mut DeletionReport,
    ) {
        let ids: Vec<MessageId> = batch.iter().map(|message| message.id).collect();
        match self.deleter.delete_bulk(channel, &ids).await {
            Ok(()) => report.deleted += ids.len(),
            Err(e) => {
                let reason = e.to_string();
                report.failures.extend(ids.into_iter().map(|id| DeleteFailure {
                    message: id,
                    reason: reason.clone(),
                }));
            }
        }
    }
}

/// Whether a batch must fall back to one-by-one deletion.
///
/// Only the boundary messages of the batch are inspected, preserving the
/// routine's long-standing behavior. A batch whose interior straddles the
/// ceiling non-monotonically can be misrouted to the bulk path.
fn requires_individual_deletes(batch: &[ChannelMessage], cutoff: DateTime<Utc>) -> bool {
    match (batch.first(), batch.last()) {
        (Some(first), Some(last)) => first.created_at <= cutoff || last.created_at <= cutoff,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use mockall::Sequence;

    use super::*;
    use crate::{
        providers::traits::{DeleteError, MockDeleteCapability, MockHistoryProvider},
        test_helpers::MessageBuilder,
    };

    const ACTOR: UserId = UserId(7);
    const CHANNEL: ChannelId = ChannelId(99);

    fn invoked_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    /// `count` recent messages by the actor, ids counting up from 1.
    fn recent_messages(count: u64) -> Vec<ChannelMessage> {
        (1..=count)
            .map(|i| {
                MessageBuilder::new()
                    .id(i)
                    .author(ACTOR.0)
                    .created_at(invoked_at() - Duration::minutes(count as i64 - i as i64))
                    .build()
            })
            .collect()
    }

    fn deleter(
        history: MockHistoryProvider,
        deletes: MockDeleteCapability,
        config: &ModerationConfig,
    ) -> BulkMessageDeleter<MockHistoryProvider, MockDeleteCapability> {
        BulkMessageDeleter::new(Arc::new(history), Arc::new(deletes), config)
    }

    #[tokio::test]
    async fn test_250_messages_form_three_ordered_bulk_batches() {
        let mut history = MockHistoryProvider::new();
        history
            .expect_fetch()
            .withf(|channel, since| *channel == CHANNEL && since.is_none())
            .returning(|_, _| Ok(recent_messages(250)));

        let mut deletes = MockDeleteCapability::new();
        let mut seq = Sequence::new();
        for (expected_len, expected_first) in [(100, 1), (100, 101), (50, 201)] {
            deletes
                .expect_delete_bulk()
                .times(1)
                .in_sequence(&mut seq)
                .withf(move |_, ids| {
                    ids.len() == expected_len && ids[0] == MessageId(expected_first)
                })
                .returning(|_, _| Ok(()));
        }

        let deleter = deleter(history, deletes, &ModerationConfig::default());
        let report = deleter
            .delete(ACTOR, CHANNEL, DeletionRange::All, invoked_at())
            .await
            .unwrap();

        assert_eq!(report.deleted, 250);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_old_boundary_message_routes_batch_to_individual_deletes() {
        let mut messages = recent_messages(10);
        // The first message of the batch is past the 14-day ceiling.
        messages[0].created_at = invoked_at() - Duration::days(15);

        let mut history = MockHistoryProvider::new();
        history.expect_fetch().returning(move |_, _| Ok(messages.clone()));

        let mut deletes = MockDeleteCapability::new();
        deletes.expect_delete_bulk().times(0);
        deletes
            .expect_delete_one()
            .times(10)
            .returning(|_, _| Ok(()));

        let deleter = deleter(history, deletes, &ModerationConfig::default());
        let report = deleter
            .delete(ACTOR, CHANNEL, DeletionRange::All, invoked_at())
            .await
            .unwrap();

        assert_eq!(report.deleted, 10);
    }

    #[tokio::test]
    async fn test_batch_within_ceiling_uses_a_single_bulk_call() {
        let mut history = MockHistoryProvider::new();
        history.expect_fetch().returning(|_, _| Ok(recent_messages(10)));

        let mut deletes = MockDeleteCapability::new();
        deletes.expect_delete_one().times(0);
        deletes
            .expect_delete_bulk()
            .times(1)
            .withf(|_, ids| ids.len() == 10)
            .returning(|_, _| Ok(()));

        let deleter = deleter(history, deletes, &ModerationConfig::default());
        let report = deleter
            .delete(ACTOR, CHANNEL, DeletionRange::All, invoked_at())
            .await
            .unwrap();

        assert_eq!(report.deleted, 10);
    }

    #[tokio::test]
    async fn test_other_authors_are_left_alone() {
        let mut messages = recent_messages(3);
        messages.push(
            MessageBuilder::new()
                .id(1000)
                .author(12345)
                .created_at(invoked_at() - Duration::minutes(1))
                .build(),
        );

        let mut history = MockHistoryProvider::new();
        history.expect_fetch().returning(move |_, _| Ok(messages.clone()));

        let mut deletes = MockDeleteCapability::new();
        deletes
            .expect_delete_bulk()
            .times(1)
            .withf(|_, ids| ids.len() == 3 && !ids.contains(&MessageId(1000)))
            .returning(|_, _| Ok(()));

        let deleter = deleter(history, deletes, &ModerationConfig::default());
        let report = deleter
            .delete(ACTOR, CHANNEL, DeletionRange::All, invoked_at())
            .await
            .unwrap();

        assert_eq!(report.deleted, 3);
    }

    #[tokio::test]
    async fn test_bounded_range_is_passed_to_the_history_provider() {
        let expected_since = invoked_at() - Duration::minutes(150);

        let mut history = MockHistoryProvider::new();
        history
            .expect_fetch()
            .withf(move |_, since| *since == Some(expected_since))
            .returning(|_, _| Ok(vec![]));

        let deletes = MockDeleteCapability::new();
        let deleter = deleter(history, deletes, &ModerationConfig::default());
        let report = deleter
            .delete(
                ACTOR,
                CHANNEL,
                DeletionRange::parse("2.5").unwrap(),
                invoked_at(),
            )
            .await
            .unwrap();

        assert_eq!(report.deleted, 0);
    }

    #[tokio::test]
    async fn test_individual_failures_are_recorded_and_later_batches_continue() {
        let mut messages = recent_messages(3);
        for message in &mut messages {
            message.created_at = invoked_at() - Duration::days(20);
        }

        let mut history = MockHistoryProvider::new();
        history.expect_fetch().returning(move |_, _| Ok(messages.clone()));

        let mut deletes = MockDeleteCapability::new();
        deletes.expect_delete_one().returning(|_, id| {
            if id == MessageId(2) {
                Err(DeleteError::Failed("gone already".to_string()))
            } else {
                Ok(())
            }
        });

        // batch_size 2 forces a second batch after the failing one.
        let config = ModerationConfig {
            batch_size: 2,
            ..ModerationConfig::default()
        };
        let deleter = deleter(history, deletes, &config);
        let report = deleter
            .delete(ACTOR, CHANNEL, DeletionRange::All, invoked_at())
            .await
            .unwrap();

        assert_eq!(report.deleted, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].message, MessageId(2));
        assert!(report.failures[0].reason.contains("gone already"));
    }

    #[tokio::test]
    async fn test_failed_bulk_call_records_every_message_in_the_batch() {
        let mut history = MockHistoryProvider::new();
        history.expect_fetch().returning(|_, _| Ok(recent_messages(5)));

        let mut deletes = MockDeleteCapability::new();
        deletes
            .expect_delete_bulk()
            .times(1)
            .returning(|_, _| Err(DeleteError::Failed("rate limited".to_string())));

        let deleter = deleter(history, deletes, &ModerationConfig::default());
        let report = deleter
            .delete(ACTOR, CHANNEL, DeletionRange::All, invoked_at())
            .await
            .unwrap();

        assert_eq!(report.deleted, 0);
        assert_eq!(report.failures.len(), 5);
    }

    #[tokio::test]
    async fn test_history_failure_aborts_the_run() {
        let mut history = MockHistoryProvider::new();
        history
            .expect_fetch()
            .returning(|_, _| Err(HistoryError::Fetch("channel unavailable".to_string())));

        let mut deletes = MockDeleteCapability::new();
        deletes.expect_delete_one().times(0);
        deletes.expect_delete_bulk().times(0);

        let deleter = deleter(history, deletes, &ModerationConfig::default());
        let result = deleter
            .delete(ACTOR, CHANNEL, DeletionRange::All, invoked_at())
            .await;

        assert!(matches!(result, Err(DeletionError::History(_))));
    }
}
