use rocket::form::{Contextual, Form};
use rocket::http::Status;
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket_dyn_templates::{context, Template};

use super::{describe_errors, now, read_failed, FlashView};
use crate::db_util::{self, StoreError};
use crate::forms::{self, SearchForm, VenueForm};
use crate::models::NewVenue;
use crate::DbConn;

fn render_form(
    action: String,
    title: &str,
    venue: NewVenue,
    genres: Vec<String>,
    flash: Option<FlashView>,
) -> Template {
    let genre_choices = forms::genre_choices(&genres);
    let state_choices = forms::state_choices(&venue.state);
    Template::render(
        "forms/venue",
        context! {
            action,
            title,
            venue,
            genres,
            genre_choices,
            state_choices,
            flash,
        },
    )
}

#[get("/venues")]
pub async fn list_venues(
    conn: DbConn,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Status> {
    let flash = FlashView::from_flash(flash);
    let reference = now();
    let areas = conn
        .run(move |conn| db_util::venue_directory(conn, reference))
        .await
        .map_err(|err| read_failed("loading the venue directory", err))?;

    Ok(Template::render("pages/venues", context! { areas, flash }))
}

#[post("/venues/search", data = "<form>")]
pub async fn search_venues(conn: DbConn, form: Form<SearchForm>) -> Result<Template, Status> {
    let search_term = form.term().to_owned();
    let term = search_term.clone();
    let reference = now();
    let results = conn
        .run(move |conn| db_util::search_venues(conn, &term, reference))
        .await
        .map_err(|err| read_failed("searching venues", err))?;

    Ok(Template::render(
        "pages/search_venues",
        context! { results, search_term },
    ))
}

#[get("/venues/<venue_id>")]
pub async fn show_venue(
    conn: DbConn,
    venue_id: i32,
    flash: Option<FlashMessage<'_>>,
) -> Result<Option<Template>, Status> {
    let flash = FlashView::from_flash(flash);
    let reference = now();
    let venue = match conn
        .run(move |conn| db_util::venue_detail(conn, venue_id, reference))
        .await
        .map_err(|err| read_failed(&format!("loading venue {}", venue_id), err))?
    {
        Some(venue) => venue,
        None => return Ok(None),
    };

    Ok(Some(Template::render(
        "pages/show_venue",
        context! { venue, flash },
    )))
}

#[get("/venues/create")]
pub fn create_venue_form(flash: Option<FlashMessage<'_>>) -> Template {
    render_form(
        "/venues/create".into(),
        "List a new venue",
        NewVenue::default(),
        Vec::new(),
        FlashView::from_flash(flash),
    )
}

#[post("/venues/create", data = "<form>")]
pub async fn create_venue(conn: DbConn, form: Form<Contextual<'_, VenueForm>>) -> Flash<Redirect> {
    let Contextual { value, context } = form.into_inner();
    let (new_venue, genres) = match value {
        Some(venue_form) => venue_form.into_parts(),
        None => {
            let reason = describe_errors(&context);
            warn!("Rejected venue submission: {}", reason);
            return Flash::error(
                Redirect::to("/venues/create"),
                format!("Venue could not be listed: {}.", reason),
            );
        }
    };

    let name = new_venue.name.clone();
    match conn
        .run(move |conn| db_util::create_venue(conn, &new_venue, &genres))
        .await
    {
        Ok(venue_id) => {
            info!("Created venue {} ({:?})", venue_id, name);
            Flash::success(
                Redirect::to("/"),
                format!("Venue {} was successfully listed!", name),
            )
        }
        Err(err) => {
            error!("Error creating venue {:?}: {}", name, err);
            Flash::error(
                Redirect::to("/"),
                format!("An error occurred. Venue {} could not be listed.", name),
            )
        }
    }
}

#[get("/venues/<venue_id>/edit")]
pub async fn edit_venue_form(
    conn: DbConn,
    venue_id: i32,
    flash: Option<FlashMessage<'_>>,
) -> Result<Option<Template>, Status> {
    let flash = FlashView::from_flash(flash);
    let (venue, genres) = match conn
        .run(move |conn| db_util::get_venue(conn, venue_id))
        .await
        .map_err(|err| read_failed(&format!("loading venue {}", venue_id), err))?
    {
        Some(res) => res,
        None => return Ok(None),
    };

    Ok(Some(render_form(
        format!("/venues/{}/edit", venue_id),
        "Edit venue",
        NewVenue::from(venue),
        genres,
        flash,
    )))
}

#[post("/venues/<venue_id>/edit", data = "<form>")]
pub async fn edit_venue(
    conn: DbConn,
    venue_id: i32,
    form: Form<Contextual<'_, VenueForm>>,
) -> Option<Flash<Redirect>> {
    let Contextual { value, context } = form.into_inner();
    let (changes, genres) = match value {
        Some(venue_form) => venue_form.into_parts(),
        None => {
            let reason = describe_errors(&context);
            warn!("Rejected edit of venue {}: {}", venue_id, reason);
            return Some(Flash::error(
                Redirect::to(format!("/venues/{}/edit", venue_id)),
                format!("Venue could not be updated: {}.", reason),
            ));
        }
    };

    let name = changes.name.clone();
    match conn
        .run(move |conn| db_util::update_venue(conn, venue_id, &changes, &genres))
        .await
    {
        Ok(()) => {
            info!("Updated venue {}", venue_id);
            Some(Flash::success(
                Redirect::to(format!("/venues/{}", venue_id)),
                format!("Venue {} was successfully updated!", name),
            ))
        }
        Err(StoreError::NotFound { .. }) => None,
        Err(err) => {
            error!("Error updating venue {}: {}", venue_id, err);
            Some(Flash::error(
                Redirect::to(format!("/venues/{}", venue_id)),
                format!("An error occurred. Venue {} could not be updated.", name),
            ))
        }
    }
}

#[delete("/venues/<venue_id>")]
pub async fn delete_venue(conn: DbConn, venue_id: i32) -> Option<Flash<Redirect>> {
    match conn
        .run(move |conn| db_util::delete_venue(conn, venue_id))
        .await
    {
        Ok(()) => {
            info!("Deleted venue {}", venue_id);
            Some(Flash::success(
                Redirect::to("/"),
                format!("Venue {} was successfully removed!", venue_id),
            ))
        }
        Err(StoreError::NotFound { .. }) => None,
        Err(err) => {
            error!("Error deleting venue {}: {}", venue_id, err);
            Some(Flash::error(
                Redirect::to(format!("/venues/{}", venue_id)),
                format!("An error occurred. Venue {} could not be removed.", venue_id),
            ))
        }
    }
}
