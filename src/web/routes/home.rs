pub const HOME_MESSAGE: &str = "Coffee & Rhythms Backend is Running! ☕";

/// Liveness text for humans and uptime checkers.
pub async fn home() -> &'static str {
    HOME_MESSAGE
}
