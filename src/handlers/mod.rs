pub mod auth;
pub mod brands;
pub mod octanes;
pub mod refills;

/// GET / -> liveness probe.
pub async fn root() -> &'static str {
    "The server is running."
}
