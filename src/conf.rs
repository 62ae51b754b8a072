use std::env;

use rocket::figment::Figment;

pub struct Conf {
    pub database_url: String,
    pub database_pool_size: u32,
    pub template_dir: String,
}

impl Conf {
    pub fn build_from_env() -> Self {
        // A missing `.env` is fine; everything has a default.
        dotenv::dotenv().ok();

        let database_pool_size = match env::var("DATABASE_POOL_SIZE") {
            Ok(raw) => raw.parse().unwrap_or_else(|err| {
                warn!(
                    "Ignoring invalid `DATABASE_POOL_SIZE` {:?}: {}; using the default",
                    raw, err
                );
                8
            }),
            Err(_) => 8,
        };

        Conf {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "fyyur.sqlite3".into()),
            database_pool_size,
            template_dir: env::var("TEMPLATE_DIR").unwrap_or_else(|_| "templates".into()),
        }
    }

    /// Rocket's default figment with the database pool and template directory taken from this
    /// config.  `ROCKET_*` variables and `Rocket.toml` still apply to everything else.
    pub fn figment(&self) -> Figment {
        rocket::Config::figment()
            .merge(("databases.fyyur.url", self.database_url.clone()))
            .merge(("databases.fyyur.pool_size", self.database_pool_size))
            .merge(("template_dir", self.template_dir.clone()))
    }
}

lazy_static! {
    pub static ref CONF: Conf = Conf::build_from_env();
}
