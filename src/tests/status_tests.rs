//! tests/status_tests.rs - Status derivation and issuance eligibility

#[cfg(test)]
mod tests {
    use crate::models::{Campaign, CampaignStatus};
    use crate::sync::status::{derive_status, is_eligible_for_issuance, lamports_to_units};

    const CREATOR: &str = "9ii1FEiWSgDzXAbwj2oTmJXzkfCw78mnHwPQv9WQ5iTn";
    const NOW: i64 = 1_700_000_000;

    fn campaign(total_fund_raised: i64, donation_goal: f64, deposit_deadline: i64) -> Campaign {
        Campaign {
            creator: CREATOR.to_string(),
            campaign_index: 0,
            name: "Test Campaign".to_string(),
            symbol: "TEST".to_string(),
            metadata_uri: "https://example.com/meta.json".to_string(),
            donation_goal,
            deposit_deadline,
            trade_deadline: deposit_deadline + 86_400,
            created_at: NOW - 3_600,
            total_fund_raised,
            mint: None,
            last_donation_timestamp: None,
        }
    }

    #[test]
    fn lamports_convert_to_whole_units() {
        assert_eq!(lamports_to_units(1_000_000_000), 1.0);
        assert_eq!(lamports_to_units(500_000_000), 0.5);
        assert_eq!(lamports_to_units(0), 0.0);
    }

    #[test]
    fn goal_met_before_deadline_is_pending() {
        let c = campaign(1_000_000_000, 1.0, NOW + 3_600);
        assert_eq!(derive_status(&c, None, NOW), CampaignStatus::Pending);
    }

    #[test]
    fn goal_missed_after_deadline_is_failed() {
        let c = campaign(100_000_000, 1.0, NOW - 3_600);
        assert_eq!(derive_status(&c, None, NOW), CampaignStatus::Failed);
    }

    #[test]
    fn goal_not_met_before_deadline_is_raising() {
        let c = campaign(100_000_000, 1.0, NOW + 3_600);
        assert_eq!(derive_status(&c, None, NOW), CampaignStatus::Raising);
    }

    #[test]
    fn funded_campaign_past_deadline_stays_raising() {
        // Goal met but deadline passed: neither PENDING nor FAILED applies,
        // the issuance pipeline decides the outcome.
        let c = campaign(2_000_000_000, 1.0, NOW - 3_600);
        assert_eq!(derive_status(&c, None, NOW), CampaignStatus::Raising);
    }

    #[test]
    fn recorded_mint_completes() {
        let mut c = campaign(100_000_000, 1.0, NOW + 3_600);
        c.mint = Some("AhAkbf3cGD6HkFod2rBEE8mie8ks9p7vuss6WGkUFAM9".to_string());
        assert_eq!(derive_status(&c, None, NOW), CampaignStatus::Completed);
    }

    #[test]
    fn completed_is_sticky_for_any_input() {
        // A prior COMPLETED wins regardless of funds, goal or deadline.
        let prior = Some(CampaignStatus::Completed);
        let vectors = [
            campaign(0, 1.0, NOW - 3_600),
            campaign(1_000_000_000, 1.0, NOW + 3_600),
            campaign(100_000_000, 1.0, NOW + 3_600),
        ];
        for c in &vectors {
            assert_eq!(derive_status(c, prior, NOW), CampaignStatus::Completed);
        }
    }

    #[test]
    fn non_terminal_prior_does_not_pin_the_status() {
        let c = campaign(1_000_000_000, 1.0, NOW + 3_600);
        assert_eq!(
            derive_status(&c, Some(CampaignStatus::Failed), NOW),
            CampaignStatus::Pending
        );
    }

    #[test]
    fn eligibility_requires_pending_and_no_mint() {
        let pending = campaign(1_000_000_000, 1.0, NOW + 3_600);
        assert!(is_eligible_for_issuance(&pending, NOW));

        let raising = campaign(100_000_000, 1.0, NOW + 3_600);
        assert!(!is_eligible_for_issuance(&raising, NOW));

        let failed = campaign(100_000_000, 1.0, NOW - 3_600);
        assert!(!is_eligible_for_issuance(&failed, NOW));

        let mut minted = campaign(1_000_000_000, 1.0, NOW + 3_600);
        minted.mint = Some("AhAkbf3cGD6HkFod2rBEE8mie8ks9p7vuss6WGkUFAM9".to_string());
        assert!(!is_eligible_for_issuance(&minted, NOW));
    }

    #[test]
    fn exact_goal_counts_as_met() {
        let c = campaign(1_000_000_000, 1.0, NOW + 1);
        assert_eq!(derive_status(&c, None, NOW), CampaignStatus::Pending);
    }
}
