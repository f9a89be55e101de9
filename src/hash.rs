//! Credential hashing for the `userPassword` attribute.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use sha1::{Digest, Sha1};

/// Hash a plaintext credential into the `{SHA}<base64 digest>` form that
/// directory servers accept verbatim in `userPassword`.
///
/// Deterministic and unsalted, so re-running a conversion over the same
/// input produces byte-identical output.
pub fn sha_password(plaintext: &str) -> String {
    let digest = Sha1::digest(plaintext.as_bytes());
    format!("{{SHA}}{}", BASE64.encode(digest))
}
