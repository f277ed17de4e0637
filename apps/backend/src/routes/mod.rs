use actix_web::web;

use crate::middleware::JwtExtract;

pub mod games;
pub mod health;

/// Register every route. `main.rs` and the route tests share this so the
/// auth wrapper is always in place.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(
        web::scope("/api/games")
            .wrap(JwtExtract)
            .configure(games::configure_routes),
    );
}
