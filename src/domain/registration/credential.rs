//! One-time password generation for provisioned accounts.

use rand::seq::SliceRandom;
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};

pub const CREDENTIAL_LENGTH: usize = 12;

pub const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &[u8] = b"0123456789";
pub const SYMBOLS: &[u8] = b"!@#$%^&*";

const REQUIRED_CLASSES: [&[u8]; 4] = [LOWERCASE, UPPERCASE, DIGITS, SYMBOLS];

/// Password handed to the caller exactly once.
///
/// Deliberately not `Clone`: the value moves into the response and is never
/// stored.
#[derive(Debug)]
pub struct GeneratedCredential {
    password: SecretString,
}

impl GeneratedCredential {
    pub fn expose(&self) -> &str {
        self.password.expose_secret()
    }

    /// Copy for the directory payload.
    pub fn to_secret(&self) -> SecretString {
        SecretString::new(self.password.expose_secret().clone())
    }
}

/// Generates a credential with the thread-local CSPRNG.
pub fn generate_credential() -> GeneratedCredential {
    generate_credential_with(&mut rand::thread_rng())
}

/// Generates a credential from `rng`.
///
/// One character from each required class, the rest drawn uniformly from
/// their union, then a Fisher-Yates shuffle over all positions so no class
/// is tied to a position.
pub fn generate_credential_with<R: Rng + ?Sized>(rng: &mut R) -> GeneratedCredential {
    let union: Vec<u8> = REQUIRED_CLASSES.concat();
    let mut bytes = Vec::with_capacity(CREDENTIAL_LENGTH);

    for class in REQUIRED_CLASSES {
        bytes.push(class[rng.gen_range(0..class.len())]);
    }
    while bytes.len() < CREDENTIAL_LENGTH {
        bytes.push(union[rng.gen_range(0..union.len())]);
    }
    bytes.shuffle(rng);

    let password: String = bytes.into_iter().map(char::from).collect();
    GeneratedCredential {
        password: SecretString::new(password),
    }
}
