pub mod accounts;
pub mod client;
pub mod curve;
pub mod events;
pub mod instructions;
pub mod pda;

// Re-exports for convenience
pub use client::SolanaClient;

use solana_sdk::pubkey::Pubkey;

/// Little-endian cursor over borsh-shaped account data and event payloads.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let slice = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    pub fn skip(&mut self, len: usize) -> Option<()> {
        self.take(len).map(|_| ())
    }

    pub fn read_u64(&mut self) -> Option<u64> {
        self.take(8).map(|b| u64::from_le_bytes(b.try_into().unwrap()))
    }

    pub fn read_i64(&mut self) -> Option<i64> {
        self.take(8).map(|b| i64::from_le_bytes(b.try_into().unwrap()))
    }

    pub fn read_pubkey(&mut self) -> Option<Pubkey> {
        self.take(32).map(|b| Pubkey::new_from_array(b.try_into().unwrap()))
    }

    /// Borsh string: u32 length prefix followed by utf8 bytes.
    pub fn read_string(&mut self) -> Option<String> {
        let len = self.take(4).map(|b| u32::from_le_bytes(b.try_into().unwrap()))?;
        let bytes = self.take(len as usize)?;
        String::from_utf8(bytes.to_vec()).ok()
    }

    /// Borsh Option<Pubkey>: single-byte tag then the key when present.
    pub fn read_option_pubkey(&mut self) -> Option<Option<Pubkey>> {
        match self.take(1)? {
            [0] => Some(None),
            [1] => self.read_pubkey().map(Some),
            _ => None,
        }
    }
}
