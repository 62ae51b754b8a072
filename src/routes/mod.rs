use std::fmt::Display;

use chrono::{NaiveDateTime, Utc};
use rocket::form;
use rocket::http::Status;
use rocket::request::FlashMessage;
use rocket::{Catcher, Request, Route};
use rocket_dyn_templates::{context, Template};

pub mod artists;
pub mod shows;
pub mod venues;


/// A flash message as handed to templates.  `kind` is `success` or `error`.
#[derive(Serialize, Debug)]
pub struct FlashView {
    pub kind: String,
    pub message: String,
}

impl FlashView {
    pub fn from_flash(flash: Option<FlashMessage<'_>>) -> Option<Self> {
        flash.map(|flash| {
            let (kind, message) = flash.into_inner();
            FlashView { kind, message }
        })
    }
}

/// The reference instant against which shows are split into past and upcoming.  Taken once per
/// request.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Logs a failed read and maps it to the status that renders the 500 page.
pub fn read_failed<E: Display>(action: &str, err: E) -> Status {
    error!("Error {}: {}", action, err);
    Status::InternalServerError
}

/// Renders every validation error of a rejected submission into one user-facing sentence.
pub fn describe_errors(context: &form::Context<'_>) -> String {
    let descriptions: Vec<String> = context
        .errors()
        .map(|err| match err.name.as_ref() {
            Some(name) => format!("{}: {}", name, err),
            None => err.to_string(),
        })
        .collect();

    if descriptions.is_empty() {
        "the submission was invalid".into()
    } else {
        descriptions.join(", ")
    }
}

#[get("/")]
pub fn index(flash: Option<FlashMessage<'_>>) -> Template {
    Template::render(
        "pages/home",
        context! { flash: FlashView::from_flash(flash) },
    )
}

#[catch(404)]
pub fn not_found(req: &Request<'_>) -> Template {
    Template::render("errors/404", context! { path: req.uri().path().as_str() })
}

#[catch(500)]
pub fn internal_error() -> Template {
    Template::render("errors/500", context! {})
}

pub fn all_routes() -> Vec<Route> {
    routes![
        index,
        venues::list_venues,
        venues::search_venues,
        venues::show_venue,
        venues::create_venue_form,
        venues::create_venue,
        venues::edit_venue_form,
        venues::edit_venue,
        venues::delete_venue,
        artists::list_artists,
        artists::search_artists,
        artists::show_artist,
        artists::create_artist_form,
        artists::create_artist,
        artists::edit_artist_form,
        artists::edit_artist,
        artists::delete_artist,
        shows::list_shows,
        shows::create_show_form,
        shows::create_show,
    ]
}

pub fn all_catchers() -> Vec<Catcher> {
    catchers![not_found, internal_error]
}
