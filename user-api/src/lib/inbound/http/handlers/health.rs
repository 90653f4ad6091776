/// Liveness probe. Touches neither the store nor the signer.
pub async fn health_check() -> &'static str {
    "OK"
}
