use drand_verify::Pubkey;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// drand quicknet public key (G2, 96 bytes), scheme bls-unchained-g1-rfc9380.
pub const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";
pub const QUICKNET_GENESIS_TIME: u64 = 1692803367;
pub const QUICKNET_PERIOD_SECONDS: u64 = 3;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VerifyError {
    #[error("pubkey must be 96 bytes")]
    PubkeyLength,
    #[error("pubkey is not a valid G2 point")]
    Pubkey,
    #[error("verifier error: {0}")]
    Verifier(String),
    #[error("signature does not match round")]
    BadSignature,
}

/// Check a quicknet beacon and return its 32-byte randomness, `sha256(signature)`.
///
/// Quicknet is unchained, so the previous signature is always empty.
pub fn verify_quicknet_beacon(
    pubkey_bytes: &[u8],
    round: u64,
    signature: &[u8],
) -> Result<[u8; 32], VerifyError> {
    let fixed: [u8; 96] = pubkey_bytes
        .try_into()
        .map_err(|_| VerifyError::PubkeyLength)?;
    let pubkey = drand_verify::G2PubkeyRfc::from_fixed(fixed).map_err(|_| VerifyError::Pubkey)?;

    let valid = pubkey
        .verify(round, &[], signature)
        .map_err(|e| VerifyError::Verifier(format!("{:?}", e)))?;
    if !valid {
        return Err(VerifyError::BadSignature);
    }

    Ok(Sha256::digest(signature).into())
}
