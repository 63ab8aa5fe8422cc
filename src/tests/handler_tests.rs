//! tests/handler_tests.rs - Event handlers against an in-memory database

#[cfg(test)]
mod tests {
    use crate::chain::events::{
        CampaignTokenCreated, CampaignTokenSold, FundClaimed, FundDonated, TokenClaimed,
    };
    use crate::db;
    use crate::error::SyncError;
    use crate::models::{Campaign, CampaignStatus};
    use crate::sync::handlers;
    use solana_sdk::pubkey::Pubkey;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    const NOW: i64 = 1_700_000_000;

    async fn setup() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");
        sqlx::raw_sql(db::INIT_SCHEMA).execute(&pool).await.expect("Failed to apply schema");
        pool
    }

    /// Campaign stored at index 0; the matching event ordinal is 1.
    async fn seed_campaign(pool: &SqlitePool, creator: &Pubkey, donation_goal: f64) -> Campaign {
        let campaign = Campaign {
            creator: creator.to_string(),
            campaign_index: 0,
            name: "Test Campaign".to_string(),
            symbol: "TEST".to_string(),
            metadata_uri: "https://example.com/meta.json".to_string(),
            donation_goal,
            deposit_deadline: NOW + 3_600,
            trade_deadline: NOW + 90_000,
            created_at: NOW - 3_600,
            total_fund_raised: 0,
            mint: None,
            last_donation_timestamp: None,
        };
        let mut conn = pool.acquire().await.unwrap();
        db::campaign::insert(&mut conn, &campaign).await.unwrap();
        campaign
    }

    #[tokio::test]
    async fn donation_accumulates_and_flips_status() {
        let pool = setup().await;
        let creator = Pubkey::new_unique();
        seed_campaign(&pool, &creator, 1.0).await;

        let mut conn = pool.acquire().await.unwrap();
        let ev = FundDonated {
            creator,
            campaign_index: 1,
            donated_amount: 400_000_000,
            timestamp: NOW,
        };
        handlers::handle_fund_donated(&mut conn, &ev, NOW).await.unwrap();

        let stored = db::campaign::find(&mut conn, &creator.to_string(), 0).await.unwrap().unwrap();
        assert_eq!(stored.total_fund_raised, 400_000_000);
        assert_eq!(stored.last_donation_timestamp, Some(NOW));
        let status = db::process_status::find(&mut conn, &creator.to_string(), 0)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(status.status, CampaignStatus::Raising);

        // Second donation crosses the 1.0-unit goal within the same scope
        let ev = FundDonated {
            creator,
            campaign_index: 1,
            donated_amount: 600_000_000,
            timestamp: NOW + 10,
        };
        handlers::handle_fund_donated(&mut conn, &ev, NOW).await.unwrap();

        let stored = db::campaign::find(&mut conn, &creator.to_string(), 0).await.unwrap().unwrap();
        assert_eq!(stored.total_fund_raised, 1_000_000_000);
        let status = db::process_status::find(&mut conn, &creator.to_string(), 0)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(status.status, CampaignStatus::Pending);
    }

    #[tokio::test]
    async fn donation_for_unknown_campaign_is_skipped() {
        let pool = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        let ev = FundDonated {
            creator: Pubkey::new_unique(),
            campaign_index: 1,
            donated_amount: 100,
            timestamp: NOW,
        };
        handlers::handle_fund_donated(&mut conn, &ev, NOW).await.unwrap();
        assert!(db::campaign::all(&mut conn).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fund_claim_resets_the_raised_total() {
        let pool = setup().await;
        let creator = Pubkey::new_unique();
        seed_campaign(&pool, &creator, 1.0).await;

        let mut conn = pool.acquire().await.unwrap();
        db::campaign::set_total_fund_raised(&mut conn, &creator.to_string(), 0, 5_000_000_000)
            .await
            .unwrap();

        let ev = FundClaimed { creator, campaign_index: 1, amount: 5_000_000_000 };
        handlers::handle_fund_claimed(&mut conn, &ev).await.unwrap();

        let stored = db::campaign::find(&mut conn, &creator.to_string(), 0).await.unwrap().unwrap();
        assert_eq!(stored.total_fund_raised, 0);
    }

    #[tokio::test]
    async fn token_creation_completes_the_campaign() {
        let pool = setup().await;
        let creator = Pubkey::new_unique();
        let campaign = seed_campaign(&pool, &creator, 1.0).await;
        let mint = Pubkey::new_unique();

        let mut conn = pool.acquire().await.unwrap();
        let ev = CampaignTokenCreated { creator, campaign_index: 1, mint };
        handlers::handle_token_created(&mut conn, &ev, NOW).await.unwrap();

        let status = db::process_status::find(&mut conn, &creator.to_string(), 0)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(status.status, CampaignStatus::Completed);
        assert_eq!(status.mint.as_deref(), Some(mint.to_string().as_str()));

        let stored = db::campaign::find(&mut conn, &creator.to_string(), 0).await.unwrap().unwrap();
        assert_eq!(stored.mint.as_deref(), Some(mint.to_string().as_str()));

        // COMPLETED must survive a later status reconciliation
        let failed_looking = Campaign {
            total_fund_raised: 0,
            deposit_deadline: NOW - 3_600,
            ..campaign
        };
        let status =
            crate::sync::status::reconcile_campaign_status(&mut conn, &failed_looking, NOW)
                .await
                .unwrap();
        assert_eq!(status, CampaignStatus::Completed);
    }

    #[tokio::test]
    async fn token_creation_for_unknown_campaign_is_skipped() {
        let pool = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        let ev = CampaignTokenCreated {
            creator: Pubkey::new_unique(),
            campaign_index: 1,
            mint: Pubkey::new_unique(),
        };
        handlers::handle_token_created(&mut conn, &ev, NOW).await.unwrap();
        let creator = ev.creator.to_string();
        assert!(db::process_status::find(&mut conn, &creator, 0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn token_sellout_removes_every_trace() {
        let pool = setup().await;
        let creator = Pubkey::new_unique();
        seed_campaign(&pool, &creator, 1.0).await;

        let mut conn = pool.acquire().await.unwrap();
        let key = creator.to_string();
        db::process_status::upsert_status(&mut conn, &key, 0, CampaignStatus::Pending, NOW)
            .await
            .unwrap();
        db::sell_progress::upsert(&mut conn, &key, 0, "mint", 1.5, 600_000.0).await.unwrap();

        let ev = CampaignTokenSold { creator, campaign_index: 1 };
        handlers::handle_token_sold(&mut conn, &ev).await.unwrap();

        assert!(db::campaign::find(&mut conn, &key, 0).await.unwrap().is_none());
        assert!(db::process_status::find(&mut conn, &key, 0).await.unwrap().is_none());
        assert!(db::sell_progress::find(&mut conn, &key, 0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn token_claim_updates_tracked_progress() {
        let pool = setup().await;
        let creator = Pubkey::new_unique();
        seed_campaign(&pool, &creator, 1.0).await;

        let mut conn = pool.acquire().await.unwrap();
        let key = creator.to_string();
        db::sell_progress::upsert(&mut conn, &key, 0, "mint", 10.0, 600_000.0).await.unwrap();

        let ev = TokenClaimed { creator, campaign_index: 1, amount: 2_500_000_000 };
        handlers::handle_token_claimed(&mut conn, &ev).await.unwrap();

        let progress = db::sell_progress::find(&mut conn, &key, 0).await.unwrap().unwrap();
        assert_eq!(progress.claimable_amount, 2.5);
    }

    #[tokio::test]
    async fn token_claim_without_tracked_progress_is_an_error() {
        let pool = setup().await;
        let creator = Pubkey::new_unique();
        seed_campaign(&pool, &creator, 1.0).await;

        let mut conn = pool.acquire().await.unwrap();
        let ev = TokenClaimed { creator, campaign_index: 1, amount: 100 };
        let err = handlers::handle_token_claimed(&mut conn, &ev).await.unwrap_err();
        assert!(matches!(err, SyncError::UntrackedSellProgress { .. }));
    }
}
