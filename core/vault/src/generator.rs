//! Random password generation.

use rand::Rng;

use passvault_common::{Error, Result};

/// Characters drawn from when generating a password.
pub const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()";

/// Length used when none is configured.
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

/// Generate a password of `length` characters, each drawn uniformly from
/// [`PASSWORD_CHARSET`] with the thread-local CSPRNG.
///
/// # Errors
/// - `Validation` if `length` is zero
pub fn generate_password(length: usize) -> Result<String> {
    if length == 0 {
        return Err(Error::Validation(
            "Password length must be at least 1".to_string(),
        ));
    }

    let mut rng = rand::thread_rng();
    Ok((0..length)
        .map(|_| PASSWORD_CHARSET[rng.gen_range(0..PASSWORD_CHARSET.len())] as char)
        .collect())
}
