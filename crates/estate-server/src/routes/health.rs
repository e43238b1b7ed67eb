/// GET /api/health
pub async fn health() -> &'static str {
    "ok"
}
