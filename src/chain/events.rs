// Decodes the fundraising program's anchor events from transaction log
// lines. Event payloads are emitted as `Program data: <base64>` entries,
// headed by an 8-byte discriminator over the event name.

use crate::chain::ByteReader;
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine as _;
use solana_sdk::hash::hash;
use solana_sdk::pubkey::Pubkey;
use std::sync::LazyLock;
use tracing::warn;

const PROGRAM_DATA_PREFIX: &str = "Program data: ";

#[derive(Debug, Clone)]
pub struct CampaignCreated {
    pub creator: Pubkey,
    pub campaign_index: u64,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub donation_goal: u64,
    pub deposit_deadline: i64,
    pub trade_deadline: i64,
    pub timestamp: i64,
}

#[derive(Debug, Clone)]
pub struct CampaignTokenCreated {
    pub creator: Pubkey,
    pub campaign_index: u64,
    pub mint: Pubkey,
}

#[derive(Debug, Clone)]
pub struct CampaignTokenSold {
    pub creator: Pubkey,
    pub campaign_index: u64,
}

#[derive(Debug, Clone)]
pub struct ClaimableAmountUpdated {
    pub creator: Pubkey,
    pub campaign_index: u64,
    pub mint: Pubkey,
    pub claimable_amount: u64,
}

#[derive(Debug, Clone)]
pub struct TokenClaimed {
    pub creator: Pubkey,
    pub campaign_index: u64,
    pub amount: u64,
}

#[derive(Debug, Clone)]
pub struct FundClaimed {
    pub creator: Pubkey,
    pub campaign_index: u64,
    pub amount: u64,
}

#[derive(Debug, Clone)]
pub struct FundDonated {
    pub creator: Pubkey,
    pub campaign_index: u64,
    pub donated_amount: u64,
    pub timestamp: i64,
}

#[derive(Debug, Clone)]
pub enum CampaignEvent {
    Created(CampaignCreated),
    TokenCreated(CampaignTokenCreated),
    TokenSold(CampaignTokenSold),
    ClaimableAmountUpdated(ClaimableAmountUpdated),
    TokenClaimed(TokenClaimed),
    FundClaimed(FundClaimed),
    FundDonated(FundDonated),
}

impl CampaignEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CampaignEvent::Created(_) => "CreatedCampaignEvent",
            CampaignEvent::TokenCreated(_) => "CreatedCampaignTokenEvent",
            CampaignEvent::TokenSold(_) => "SoldCampaignTokenEvent",
            CampaignEvent::ClaimableAmountUpdated(_) => "ClaimableAmountUpdatedEvent",
            CampaignEvent::TokenClaimed(_) => "ClaimedTokenEvent",
            CampaignEvent::FundClaimed(_) => "ClaimedFundEvent",
            CampaignEvent::FundDonated(_) => "DonatedFundEvent",
        }
    }
}

/// Anchor event discriminator: sha256("event:<Name>")[..8].
fn event_discriminator(name: &str) -> [u8; 8] {
    let digest = hash(format!("event:{name}").as_bytes()).to_bytes();
    digest[..8].try_into().unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Created,
    TokenCreated,
    TokenSold,
    ClaimableAmountUpdated,
    TokenClaimed,
    FundClaimed,
    FundDonated,
}

static DISCRIMINATORS: LazyLock<[([u8; 8], EventKind); 7]> = LazyLock::new(|| {
    [
        (event_discriminator("CreatedCampaignEvent"), EventKind::Created),
        (event_discriminator("CreatedCampaignTokenEvent"), EventKind::TokenCreated),
        (event_discriminator("SoldCampaignTokenEvent"), EventKind::TokenSold),
        (event_discriminator("ClaimableAmountUpdatedEvent"), EventKind::ClaimableAmountUpdated),
        (event_discriminator("ClaimedTokenEvent"), EventKind::TokenClaimed),
        (event_discriminator("ClaimedFundEvent"), EventKind::FundClaimed),
        (event_discriminator("DonatedFundEvent"), EventKind::FundDonated),
    ]
});

/// Decode all recognized campaign events from a transaction's log lines.
/// Foreign program data and malformed payloads are skipped with a warning,
/// never an error: a truncated event field is a data-integrity problem for
/// that event alone.
pub fn decode_events(log_messages: &[String]) -> Vec<CampaignEvent> {
    let mut events = Vec::new();
    for line in log_messages {
        let Some(encoded) = line.strip_prefix(PROGRAM_DATA_PREFIX) else {
            continue;
        };
        let Ok(bytes) = BASE64_ENGINE.decode(encoded.trim()) else {
            continue;
        };
        if bytes.len() < 8 {
            continue;
        }
        let Some(kind) = DISCRIMINATORS
            .iter()
            .find(|(disc, _)| *disc == bytes[..8])
            .map(|(_, kind)| *kind)
        else {
            continue;
        };
        match parse_payload(kind, &bytes[8..]) {
            Some(event) => events.push(event),
            None => warn!("Skipping {:?} event with malformed payload", kind),
        }
    }
    events
}

fn parse_payload(kind: EventKind, payload: &[u8]) -> Option<CampaignEvent> {
    let mut reader = ByteReader::new(payload);
    let event = match kind {
        EventKind::Created => CampaignEvent::Created(CampaignCreated {
            creator: reader.read_pubkey()?,
            campaign_index: reader.read_u64()?,
            name: reader.read_string()?,
            symbol: reader.read_string()?,
            uri: reader.read_string()?,
            donation_goal: reader.read_u64()?,
            deposit_deadline: reader.read_i64()?,
            trade_deadline: reader.read_i64()?,
            timestamp: reader.read_i64()?,
        }),
        EventKind::TokenCreated => CampaignEvent::TokenCreated(CampaignTokenCreated {
            creator: reader.read_pubkey()?,
            campaign_index: reader.read_u64()?,
            mint: reader.read_pubkey()?,
        }),
        EventKind::TokenSold => CampaignEvent::TokenSold(CampaignTokenSold {
            creator: reader.read_pubkey()?,
            campaign_index: reader.read_u64()?,
        }),
        EventKind::ClaimableAmountUpdated => {
            CampaignEvent::ClaimableAmountUpdated(ClaimableAmountUpdated {
                creator: reader.read_pubkey()?,
                campaign_index: reader.read_u64()?,
                mint: reader.read_pubkey()?,
                claimable_amount: reader.read_u64()?,
            })
        }
        EventKind::TokenClaimed => CampaignEvent::TokenClaimed(TokenClaimed {
            creator: reader.read_pubkey()?,
            campaign_index: reader.read_u64()?,
            amount: reader.read_u64()?,
        }),
        EventKind::FundClaimed => CampaignEvent::FundClaimed(FundClaimed {
            creator: reader.read_pubkey()?,
            campaign_index: reader.read_u64()?,
            amount: reader.read_u64()?,
        }),
        EventKind::FundDonated => CampaignEvent::FundDonated(FundDonated {
            creator: reader.read_pubkey()?,
            campaign_index: reader.read_u64()?,
            donated_amount: reader.read_u64()?,
            timestamp: reader.read_i64()?,
        }),
    };
    Some(event)
}

/// The program emits 1-based campaign ordinals; storage and PDA seeds are
/// 0-based. Applied identically by every handler.
pub fn corrected_index(event_index: u64) -> i64 {
    event_index.saturating_sub(1) as i64
}

#[cfg(test)]
pub mod test_support {
    //! Encoders used by tests to build realistic log lines.

    use super::*;

    fn encode_string(out: &mut Vec<u8>, s: &str) {
        out.extend_from_slice(&(s.len() as u32).to_le_bytes());
        out.extend_from_slice(s.as_bytes());
    }

    pub fn log_line(name: &str, payload: &[u8]) -> String {
        let mut bytes = event_discriminator(name).to_vec();
        bytes.extend_from_slice(payload);
        format!("{PROGRAM_DATA_PREFIX}{}", BASE64_ENGINE.encode(bytes))
    }

    pub fn donated_fund_log(
        creator: &Pubkey,
        campaign_index: u64,
        donated_amount: u64,
        timestamp: i64,
    ) -> String {
        let mut payload = creator.to_bytes().to_vec();
        payload.extend_from_slice(&campaign_index.to_le_bytes());
        payload.extend_from_slice(&donated_amount.to_le_bytes());
        payload.extend_from_slice(&timestamp.to_le_bytes());
        log_line("DonatedFundEvent", &payload)
    }

    pub fn created_campaign_log(ev: &CampaignCreated) -> String {
        let mut payload = ev.creator.to_bytes().to_vec();
        payload.extend_from_slice(&ev.campaign_index.to_le_bytes());
        encode_string(&mut payload, &ev.name);
        encode_string(&mut payload, &ev.symbol);
        encode_string(&mut payload, &ev.uri);
        payload.extend_from_slice(&ev.donation_goal.to_le_bytes());
        payload.extend_from_slice(&ev.deposit_deadline.to_le_bytes());
        payload.extend_from_slice(&ev.trade_deadline.to_le_bytes());
        payload.extend_from_slice(&ev.timestamp.to_le_bytes());
        log_line("CreatedCampaignEvent", &payload)
    }
}
