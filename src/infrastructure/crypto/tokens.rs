//! Opaque random tokens (password reset)

use rand::RngCore;

pub const RESET_TOKEN_BYTES: usize = 32;

/// 32 random bytes, hex encoded.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
