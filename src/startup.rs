use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;

use crate::auth::{CredentialCheck, SessionAuthenticator};
use crate::logger::LoggerMiddleware;
use crate::middleware::BearerAuth;
use crate::routes::{current_user, health_check, login, refresh};

pub fn run<C>(
    listener: TcpListener,
    authenticator: SessionAuthenticator<C>,
) -> Result<Server, std::io::Error>
where
    C: CredentialCheck + Send + Sync + 'static,
{
    let authenticator = web::Data::new(authenticator);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(LoggerMiddleware)
            .app_data(authenticator.clone())
            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/login", web::post().to(login::<C>))
            .route("/refresh", web::post().to(refresh::<C>))
            // Protected routes (require a valid access token)
            .service(
                web::scope("/api")
                    .wrap(BearerAuth::new(authenticator.clone()))
                    .route("/me", web::get().to(current_user)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
