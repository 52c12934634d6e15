use crate::{
    api::attendance_correction,
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        // only fails for a zero period or burst, both clamped above
        .expect("valid rate limiter config");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/attendance")
                    // /attendance/corrections
                    .service(
                        web::resource("/corrections")
                            .app_data(
                                web::JsonConfig::default()
                                    .error_handler(attendance_correction::submit_json_error),
                            )
                            .route(web::post().to(attendance_correction::submit_correction))
                            .route(web::get().to(attendance_correction::list_corrections)),
                    )
                    // /attendance/corrections/{id}
                    .service(
                        web::resource("/corrections/{id}")
                            .app_data(
                                web::JsonConfig::default()
                                    .error_handler(attendance_correction::resolve_json_error),
                            )
                            .route(web::get().to(attendance_correction::get_correction))
                            .route(web::put().to(attendance_correction::resolve_correction)),
                    )
                    // /attendance/time-entries
                    .service(
                        web::resource("/time-entries")
                            .route(web::get().to(attendance_correction::list_time_entries)),
                    ),
            ),
    );
}
