use rocket::form::{Contextual, Form};
use rocket::http::Status;
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket_dyn_templates::{context, Template};

use super::{describe_errors, now, read_failed, FlashView};
use crate::db_util::{self, StoreError};
use crate::forms::{self, ArtistForm, SearchForm};
use crate::models::NewArtist;
use crate::DbConn;

fn render_form(
    action: String,
    title: &str,
    artist: NewArtist,
    genres: Vec<String>,
    flash: Option<FlashView>,
) -> Template {
    let genre_choices = forms::genre_choices(&genres);
    let state_choices = forms::state_choices(&artist.state);
    Template::render(
        "forms/artist",
        context! {
            action,
            title,
            artist,
            genres,
            genre_choices,
            state_choices,
            flash,
        },
    )
}

#[get("/artists")]
pub async fn list_artists(
    conn: DbConn,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Status> {
    let flash = FlashView::from_flash(flash);
    let reference = now();
    let artists = conn
        .run(move |conn| db_util::list_artists(conn, reference))
        .await
        .map_err(|err| read_failed("listing artists", err))?;

    Ok(Template::render("pages/artists", context! { artists, flash }))
}

#[post("/artists/search", data = "<form>")]
pub async fn search_artists(conn: DbConn, form: Form<SearchForm>) -> Result<Template, Status> {
    let search_term = form.term().to_owned();
    let term = search_term.clone();
    let reference = now();
    let results = conn
        .run(move |conn| db_util::search_artists(conn, &term, reference))
        .await
        .map_err(|err| read_failed("searching artists", err))?;

    Ok(Template::render(
        "pages/search_artists",
        context! { results, search_term },
    ))
}

#[get("/artists/<artist_id>")]
pub async fn show_artist(
    conn: DbConn,
    artist_id: i32,
    flash: Option<FlashMessage<'_>>,
) -> Result<Option<Template>, Status> {
    let flash = FlashView::from_flash(flash);
    let reference = now();
    let artist = match conn
        .run(move |conn| db_util::artist_detail(conn, artist_id, reference))
        .await
        .map_err(|err| read_failed(&format!("loading artist {}", artist_id), err))?
    {
        Some(artist) => artist,
        None => return Ok(None),
    };

    Ok(Some(Template::render(
        "pages/show_artist",
        context! { artist, flash },
    )))
}

#[get("/artists/create")]
pub fn create_artist_form(flash: Option<FlashMessage<'_>>) -> Template {
    render_form(
        "/artists/create".into(),
        "List a new artist",
        NewArtist::default(),
        Vec::new(),
        FlashView::from_flash(flash),
    )
}

#[post("/artists/create", data = "<form>")]
pub async fn create_artist(conn: DbConn, form: Form<Contextual<'_, ArtistForm>>) -> Flash<Redirect> {
    let Contextual { value, context } = form.into_inner();
    let (new_artist, genres) = match value {
        Some(artist_form) => artist_form.into_parts(),
        None => {
            let reason = describe_errors(&context);
            warn!("Rejected artist submission: {}", reason);
            return Flash::error(
                Redirect::to("/artists/create"),
                format!("Artist could not be listed: {}.", reason),
            );
        }
    };

    let name = new_artist.name.clone();
    match conn
        .run(move |conn| db_util::create_artist(conn, &new_artist, &genres))
        .await
    {
        Ok(artist_id) => {
            info!("Created artist {} ({:?})", artist_id, name);
            Flash::success(
                Redirect::to("/"),
                format!("Artist {} was successfully listed!", name),
            )
        }
        Err(err) => {
            error!("Error creating artist {:?}: {}", name, err);
            Flash::error(
                Redirect::to("/"),
                format!("An error occurred. Artist {} could not be listed.", name),
            )
        }
    }
}

#[get("/artists/<artist_id>/edit")]
pub async fn edit_artist_form(
    conn: DbConn,
    artist_id: i32,
    flash: Option<FlashMessage<'_>>,
) -> Result<Option<Template>, Status> {
    let flash = FlashView::from_flash(flash);
    let (artist, genres) = match conn
        .run(move |conn| db_util::get_artist(conn, artist_id))
        .await
        .map_err(|err| read_failed(&format!("loading artist {}", artist_id), err))?
    {
        Some(res) => res,
        None => return Ok(None),
    };

    Ok(Some(render_form(
        format!("/artists/{}/edit", artist_id),
        "Edit artist",
        NewArtist::from(artist),
        genres,
        flash,
    )))
}

#[post("/artists/<artist_id>/edit", data = "<form>")]
pub async fn edit_artist(
    conn: DbConn,
    artist_id: i32,
    form: Form<Contextual<'_, ArtistForm>>,
) -> Option<Flash<Redirect>> {
    let Contextual { value, context } = form.into_inner();
    let (changes, genres) = match value {
        Some(artist_form) => artist_form.into_parts(),
        None => {
            let reason = describe_errors(&context);
            warn!("Rejected edit of artist {}: {}", artist_id, reason);
            return Some(Flash::error(
                Redirect::to(format!("/artists/{}/edit", artist_id)),
                format!("Artist could not be updated: {}.", reason),
            ));
        }
    };

    let name = changes.name.clone();
    match conn
        .run(move |conn| db_util::update_artist(conn, artist_id, &changes, &genres))
        .await
    {
        Ok(()) => {
            info!("Updated artist {}", artist_id);
            Some(Flash::success(
                Redirect::to(format!("/artists/{}", artist_id)),
                format!("Artist {} was successfully updated!", name),
            ))
        }
        Err(StoreError::NotFound { .. }) => None,
        Err(err) => {
            error!("Error updating artist {}: {}", artist_id, err);
            Some(Flash::error(
                Redirect::to(format!("/artists/{}", artist_id)),
                format!("An error occurred. Artist {} could not be updated.", name),
            ))
        }
    }
}

#[delete("/artists/<artist_id>")]
pub async fn delete_artist(conn: DbConn, artist_id: i32) -> Option<Flash<Redirect>> {
    match conn
        .run(move |conn| db_util::delete_artist(conn, artist_id))
        .await
    {
        Ok(()) => {
            info!("Deleted artist {}", artist_id);
            Some(Flash::success(
                Redirect::to("/"),
                format!("Artist {} was successfully removed!", artist_id),
            ))
        }
        Err(StoreError::NotFound { .. }) => None,
        Err(err) => {
            error!("Error deleting artist {}: {}", artist_id, err);
            Some(Flash::error(
                Redirect::to(format!("/artists/{}", artist_id)),
                format!("An error occurred. Artist {} could not be removed.", artist_id),
            ))
        }
    }
}
