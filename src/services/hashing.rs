use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a one-time verification code.
pub const OTP_DIGITS: usize = 6;

const OTP_RANGE: u32 = 1_000_000;

// m=8MB, t=2 iterations, p=1 parallelism
fn argon2() -> Result<Argon2<'static>, argon2::Error> {
    let params = Params::new(8192, 2, 1, None)?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Salted, slow password hash in PHC string form. Two calls with the same
/// input never produce the same output.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2()?.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks `password` against a stored hash. A malformed hash verifies as
/// `false` instead of erroring.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    match argon2() {
        Ok(argon2) => argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "invalid argon2 parameters");
            false
        }
    }
}

/// Hex-encoded SHA-256 of a raw token, used only as a lookup key.
pub fn hash_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

/// Six-digit, zero-padded verification code.
pub fn generate_otp() -> String {
    let n: u32 = rand::rng().random_range(0..OTP_RANGE);
    format!("{n:0width$}", width = OTP_DIGITS)
}
