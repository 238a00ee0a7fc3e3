use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::core::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex HMAC-SHA256 of the raw webhook body
pub const SIGNATURE_HEADER: &str = "X-Saleor-Signature";

/// Compute the hex signature for a payload
pub fn sign_payload(secret: &str, body: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::internal(format!("Invalid webhook secret: {}", e)))?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a hex signature in constant time
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> Result<()> {
    let expected = hex::decode(signature.trim())
        .map_err(|_| AppError::unauthorized("Webhook signature is not valid hex"))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::internal(format!("Invalid webhook secret: {}", e)))?;
    mac.update(body);

    mac.verify_slice(&expected)
        .map_err(|_| AppError::unauthorized("Webhook signature mismatch"))
}
