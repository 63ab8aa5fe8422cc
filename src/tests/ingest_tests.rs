//! tests/ingest_tests.rs - Watermark ledger, replay planning and event decode

#[cfg(test)]
mod tests {
    use crate::chain::events::{
        corrected_index, decode_events, test_support, CampaignCreated, CampaignEvent,
    };
    use crate::db;
    use crate::models::CampaignStatus;
    use crate::sync::funds::should_delete;
    use crate::sync::ingest::plan_replay;
    use solana_sdk::pubkey::Pubkey;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    async fn setup() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");
        sqlx::raw_sql(db::INIT_SCHEMA).execute(&pool).await.expect("Failed to apply schema");
        pool
    }

    fn sigs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn replay_reverses_and_trims_the_newest() {
        // Input arrives newest-first; replay must be chronological with the
        // most recent signature held back for the next pass.
        let planned = plan_replay(sigs(&["d", "c", "b", "a"]), 1);
        assert_eq!(planned, sigs(&["a", "b", "c"]));
    }

    #[test]
    fn replay_keeps_a_batch_no_larger_than_the_window() {
        // A lone signature must not be starved by the trim margin.
        assert_eq!(plan_replay(sigs(&["a"]), 1), sigs(&["a"]));
        assert_eq!(plan_replay(sigs(&["b", "a"]), 2), sigs(&["a", "b"]));
    }

    #[test]
    fn replay_with_zero_window_keeps_everything() {
        let planned = plan_replay(sigs(&["c", "b", "a"]), 0);
        assert_eq!(planned, sigs(&["a", "b", "c"]));
    }

    #[tokio::test]
    async fn ledger_records_are_idempotent() {
        let pool = setup().await;
        let mut conn = pool.acquire().await.unwrap();

        assert!(!db::transaction::exists(&mut conn, "sig1").await.unwrap());
        db::transaction::record(&mut conn, "sig1", 100, 1_700_000_000).await.unwrap();
        assert!(db::transaction::exists(&mut conn, "sig1").await.unwrap());

        // Re-recording the same signature is a no-op, not an error
        db::transaction::record(&mut conn, "sig1", 999, 1_700_000_999).await.unwrap();
        assert_eq!(db::transaction::count(&mut conn).await.unwrap(), 1);

        let row = db::transaction::watermark(&mut conn).await.unwrap().unwrap();
        assert_eq!(row.block_slot, 100);
    }

    #[tokio::test]
    async fn watermark_is_the_highest_slot() {
        let pool = setup().await;
        let mut conn = pool.acquire().await.unwrap();

        assert!(db::transaction::watermark(&mut conn).await.unwrap().is_none());
        db::transaction::record(&mut conn, "sig1", 100, 1).await.unwrap();
        db::transaction::record(&mut conn, "sig3", 300, 3).await.unwrap();
        db::transaction::record(&mut conn, "sig2", 200, 2).await.unwrap();

        let row = db::transaction::watermark(&mut conn).await.unwrap().unwrap();
        assert_eq!(row.signature, "sig3");
        assert_eq!(row.block_slot, 300);
    }

    #[tokio::test]
    async fn watermark_breaks_slot_ties_toward_the_newest_record() {
        // Two ingested transactions in the same slot: the watermark must be
        // the one recorded last, otherwise the next pagination pass would
        // rediscover only its already-ingested sibling, record nothing, and
        // never advance.
        let pool = setup().await;
        let mut conn = pool.acquire().await.unwrap();

        db::transaction::record(&mut conn, "sigA", 100, 1).await.unwrap();
        db::transaction::record(&mut conn, "sigB", 100, 1).await.unwrap();

        let row = db::transaction::watermark(&mut conn).await.unwrap().unwrap();
        assert_eq!(row.signature, "sigB");
        assert_eq!(row.block_slot, 100);
    }

    #[test]
    fn decodes_events_from_program_data_lines() {
        let creator = Pubkey::new_unique();
        let created = CampaignCreated {
            creator,
            campaign_index: 1,
            name: "Test Campaign".to_string(),
            symbol: "TEST".to_string(),
            uri: "https://example.com/meta.json".to_string(),
            donation_goal: 1_000_000_000,
            deposit_deadline: 1_700_003_600,
            trade_deadline: 1_700_090_000,
            timestamp: 1_700_000_000,
        };

        let logs = vec![
            "Program GwAWdhc8NuRVCRn4guyXz7UGaQHCwnnVppBKMtZmxVM2 invoke [1]".to_string(),
            test_support::created_campaign_log(&created),
            "Program log: Instruction: Donate".to_string(),
            test_support::donated_fund_log(&creator, 1, 250_000_000, 1_700_000_100),
        ];

        let events = decode_events(&logs);
        assert_eq!(events.len(), 2);

        match &events[0] {
            CampaignEvent::Created(ev) => {
                assert_eq!(ev.creator, creator);
                assert_eq!(ev.campaign_index, 1);
                assert_eq!(ev.name, "Test Campaign");
                assert_eq!(ev.symbol, "TEST");
                assert_eq!(ev.donation_goal, 1_000_000_000);
                assert_eq!(ev.deposit_deadline, 1_700_003_600);
            }
            other => panic!("expected Created, got {}", other.name()),
        }
        match &events[1] {
            CampaignEvent::FundDonated(ev) => {
                assert_eq!(ev.donated_amount, 250_000_000);
                assert_eq!(ev.timestamp, 1_700_000_100);
            }
            other => panic!("expected FundDonated, got {}", other.name()),
        }
    }

    #[test]
    fn foreign_and_malformed_lines_are_ignored() {
        let creator = Pubkey::new_unique();
        let logs = vec![
            // Valid base64, unknown discriminator
            "Program data: AAAAAAAAAAA=".to_string(),
            // Not base64 at all
            "Program data: !!!not-base64!!!".to_string(),
            // Known discriminator, truncated payload
            test_support::log_line("DonatedFundEvent", &creator.to_bytes()[..16]),
            // Plain log line
            "Program log: hello".to_string(),
        ];
        assert!(decode_events(&logs).is_empty());
    }

    #[test]
    fn event_ordinals_are_corrected_to_storage_indexes() {
        assert_eq!(corrected_index(1), 0);
        assert_eq!(corrected_index(42), 41);
        // Saturates rather than wrapping on a malformed zero ordinal
        assert_eq!(corrected_index(0), 0);
    }

    #[test]
    fn deletion_guard_protects_completed_and_minted() {
        // Only an existing, drained, non-terminal, mint-less campaign goes
        assert!(should_delete(0, Some(CampaignStatus::Failed), None, true));
        assert!(should_delete(0, None, None, true));

        assert!(!should_delete(0, Some(CampaignStatus::Completed), None, true));
        assert!(!should_delete(0, Some(CampaignStatus::Failed), Some("mint"), true));
        assert!(!should_delete(500, Some(CampaignStatus::Failed), None, true));
        assert!(!should_delete(0, Some(CampaignStatus::Failed), None, false));
    }
}
