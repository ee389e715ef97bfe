pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use crate::auth::AuthMiddleware;
use actix_web::web;

/// Registers every route. Only the `/tasks` scope requires a bearer token.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::root)
        .service(health::health)
        .service(web::scope("/auth").service(auth::login))
        .service(
            web::scope("/users")
                .service(users::create_user)
                .service(users::get_user),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::list_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}
