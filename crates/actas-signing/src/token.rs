//! Signature token generation.

use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes per token; 32 bytes gives 256 bits of entropy,
/// rendered as 64 hex characters.
const TOKEN_BYTES: usize = 32;

/// Generate an unpredictable signing token from the OS CSPRNG.
///
/// One token authorizes one outstanding signing action for one attendee.
/// Re-issuing overwrites the stored token, which is what invalidates the
/// previous one; tokens carry no expiry of their own.
pub fn generate_signature_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
