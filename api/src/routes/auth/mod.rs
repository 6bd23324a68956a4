//! Authentication route handlers
//!
//! Registration, login and refresh are public. Profile, password change
//! and logout sit behind the JWT middleware.

pub mod login;
pub mod logout;
pub mod profile;
pub mod refresh;
pub mod register;

use actix_web::web;

use crate::middleware::JwtAuth;

pub fn configure(cfg: &mut web::ServiceConfig, jwt: JwtAuth) {
    cfg.route("/register", web::post().to(register::register))
        .route("/login", web::post().to(login::login))
        .route("/refresh", web::post().to(refresh::refresh))
        .service(
            web::resource("/profile")
                .wrap(jwt.clone())
                .route(web::get().to(profile::get_profile))
                .route(web::put().to(profile::update_profile)),
        )
        .service(
            web::resource("/change-password")
                .wrap(jwt.clone())
                .route(web::put().to(profile::change_password)),
        )
        .service(
            web::resource("/logout")
                .wrap(jwt)
                .route(web::post().to(logout::logout)),
        );
}
