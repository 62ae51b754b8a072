#[macro_use]
extern crate diesel;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate rocket;
#[macro_use]
extern crate serde_derive;

use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;

pub mod conf;
pub mod db_util;
pub mod forms;
pub mod models;
pub mod partition;
pub mod routes;
pub mod schema;
pub mod timestamp;

use self::conf::CONF;

#[rocket_sync_db_pools::database("fyyur")]
pub struct DbConn(diesel::SqliteConnection);

async fn init_schema(rocket: Rocket<Build>) -> Result<Rocket<Build>, Rocket<Build>> {
    let conn = match DbConn::get_one(&rocket).await {
        Some(conn) => conn,
        None => {
            error!("No database connection available to initialize the schema");
            return Err(rocket);
        }
    };

    match conn.run(|conn| db_util::apply_schema(conn)).await {
        Ok(()) => {
            info!("Database schema is ready");
            Ok(rocket)
        }
        Err(err) => {
            error!("Failed to initialize database schema: {:?}", err);
            Err(rocket)
        }
    }
}

pub fn build_rocket(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .mount("/", routes::all_routes())
        .register("/", routes::all_catchers())
        .attach(DbConn::fairing())
        .attach(AdHoc::try_on_ignite("Database Schema", init_schema))
        .attach(Template::custom(|engines| {
            timestamp::register_filters(&mut engines.tera);
        }))
}

#[rocket::main]
pub async fn main() {
    if let Err(err) = build_rocket(CONF.figment()).launch().await {
        error!("Error launching Rocket: {}", err);
        std::process::exit(1);
    }
    info!("Rocket exited cleanly");
}
