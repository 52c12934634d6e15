use crate::auth::jwt::issue_token;
use crate::config::Config;
use crate::model::role::Role;
use crate::models::TokenType;
use actix_web::test::TestRequest;

pub const SECRET: &str = "test-secret";
pub const PEER: &str = "127.0.0.1:40000";

pub fn test_config() -> Config {
    Config {
        database_url: "mysql://unused@localhost/hrm".to_string(),
        jwt_secret: SECRET.to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        db_max_connections: 1,
        run_migrations: false,
        rate_protected_per_min: 1000,
        api_prefix: "/api".to_string(),
        log_dir: "logs".to_string(),
        log_level: tracing::Level::DEBUG,
    }
}

pub fn token_for(user_id: u64, username: &str, role: Role) -> String {
    issue_token(user_id, username, role as u8, TokenType::Access, SECRET, 900)
}

/// Adds the bearer header and the peer address the rate limiter keys on.
pub fn authed(req: TestRequest, token: &str) -> TestRequest {
    req.peer_addr(PEER.parse().unwrap())
        .insert_header(("Authorization", format!("Bearer {token}")))
}

/// Builds the full app around an in-memory store.
macro_rules! init_app {
    ($store:expr) => {{
        let config = $crate::test_support::test_config();
        let store: std::sync::Arc<dyn $crate::store::CorrectionStore> = $store;
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(config.clone()))
                .app_data(actix_web::web::Data::from(store))
                .configure(|cfg| $crate::routes::configure(cfg, config.clone())),
        )
        .await
    }};
}

pub(crate) use init_app;
