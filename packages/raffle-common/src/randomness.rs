use cosmwasm_std::{StdError, StdResult, Uint256};
use sha2::{Digest, Sha256};

/// Expand a 32-byte seed into `num_words` independent 256-bit words.
///
/// `word_i = sha256(seed || i_be_u32)`
pub fn expand_random_words(seed: &[u8; 32], num_words: u32) -> Vec<Uint256> {
    (0..num_words)
        .map(|i| {
            let mut hasher = Sha256::new();
            hasher.update(seed);
            hasher.update(i.to_be_bytes());
            let digest: [u8; 32] = hasher.finalize().into();
            Uint256::from_be_bytes(digest)
        })
        .collect()
}

/// Seed used by the mock fulfillment path: `sha256("mock-vrf" || request_id_be)`.
pub fn mock_seed(request_id: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"mock-vrf");
    hasher.update(request_id.to_be_bytes());
    hasher.finalize().into()
}

/// Pick a slot in `[0, count)` as `word mod count`.
///
/// Carries the usual modulo bias for counts that do not divide 2^256; with
/// realistic player counts the bias is below 2^-200.
pub fn winner_index(word: Uint256, count: u32) -> StdResult<u32> {
    if count == 0 {
        return Err(StdError::generic_err("cannot pick a winner from zero players"));
    }
    let index = word % Uint256::from(count);
    // index < count <= u32::MAX, so the low 4 bytes hold the whole value
    let bytes = index.to_be_bytes();
    let mut low = [0u8; 4];
    low.copy_from_slice(&bytes[28..32]);
    Ok(u32::from_be_bytes(low))
}
