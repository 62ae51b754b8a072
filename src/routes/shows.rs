use rocket::form::{Contextual, Form};
use rocket::http::Status;
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket_dyn_templates::{context, Template};

use super::{describe_errors, read_failed, FlashView};
use crate::db_util::{self, StoreError};
use crate::forms::ShowForm;
use crate::models::NewShow;
use crate::timestamp;
use crate::DbConn;

/// An option of the artist or venue selector on the show form.
#[derive(Serialize, Debug)]
pub struct Choice {
    pub id: i32,
    pub name: String,
}

#[get("/shows")]
pub async fn list_shows(
    conn: DbConn,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Status> {
    let flash = FlashView::from_flash(flash);
    let shows = conn
        .run(|conn| db_util::list_shows(conn))
        .await
        .map_err(|err| read_failed("listing shows", err))?;

    Ok(Template::render("pages/shows", context! { shows, flash }))
}

#[get("/shows/create")]
pub async fn create_show_form(
    conn: DbConn,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Status> {
    let flash = FlashView::from_flash(flash);
    let (artists, venues) = conn
        .run(|conn| -> Result<_, StoreError> {
            let artists = db_util::list_artist_choices(conn)?;
            let venues = db_util::list_venue_choices(conn)?;
            Ok((artists, venues))
        })
        .await
        .map_err(|err| read_failed("loading show form choices", err))?;

    let artists: Vec<Choice> = artists
        .into_iter()
        .map(|(id, name)| Choice { id, name })
        .collect();
    let venues: Vec<Choice> = venues
        .into_iter()
        .map(|(id, name)| Choice { id, name })
        .collect();

    Ok(Template::render(
        "forms/new_show",
        context! { artists, venues, flash },
    ))
}

#[post("/shows/create", data = "<form>")]
pub async fn create_show(conn: DbConn, form: Form<Contextual<'_, ShowForm>>) -> Flash<Redirect> {
    let Contextual { value, context } = form.into_inner();
    let new_show: NewShow = match value {
        Some(show_form) => show_form.into(),
        None => {
            let reason = describe_errors(&context);
            warn!("Rejected show submission: {}", reason);
            return Flash::error(
                Redirect::to("/shows/create"),
                format!("Show could not be listed: {}.", reason),
            );
        }
    };

    match conn
        .run(move |conn| db_util::create_show(conn, &new_show))
        .await
    {
        Ok(show) => {
            info!(
                "Created show {} of artist {} at venue {} starting {}",
                show.id,
                show.artist_id,
                show.venue_id,
                timestamp::format(&show.start_time)
            );
            Flash::success(Redirect::to("/"), "Show was successfully listed!")
        }
        Err(err @ StoreError::NotFound { .. }) => {
            warn!("Rejected show: {}", err);
            Flash::error(
                Redirect::to("/"),
                format!("An error occurred. Show could not be listed: {}.", err),
            )
        }
        Err(err) => {
            error!("Error creating show: {}", err);
            Flash::error(
                Redirect::to("/"),
                "An error occurred. Show could not be listed.",
            )
        }
    }
}
