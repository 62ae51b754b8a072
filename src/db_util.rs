use chrono::NaiveDateTime;
use diesel::{connection::SimpleConnection, prelude::*, sqlite::SqliteConnection};
use fnv::FnvHashMap as HashMap;
use thiserror::Error;

use crate::models::{
    Area, Artist, ArtistDetail, ListingSummary, NewArtist, NewArtistGenre, NewShow, NewVenue,
    NewVenueGenre, SearchResults, Show, ShowListing, ShowSummary, Venue, VenueDetail,
};
use crate::partition::{self, PartitionedShows};
use crate::schema::{artists, artists_genres, shows, venues, venues_genres, SCHEMA_SQL};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: i32 },
    #[error("Error querying database: {0}")]
    Query(#[from] diesel::result::Error),
}

/// The venue or artist whose shows are being looked at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShowOwner {
    Venue(i32),
    Artist(i32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnerKind {
    Venue,
    Artist,
}

pub fn apply_schema(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(SCHEMA_SQL)
}

/// Case-insensitive substring match over the full Unicode range.  SQLite's `LIKE` only folds ASCII,
/// so names are filtered here instead of in the query.
fn name_matches(name: &str, lowercase_term: &str) -> bool {
    name.to_lowercase().contains(lowercase_term)
}

fn filter_by_name(rows: Vec<(i32, String)>, term: &str) -> Vec<(i32, String)> {
    let term = term.to_lowercase();
    rows.into_iter()
        .filter(|(_, name)| name_matches(name, &term))
        .collect()
}

fn summarize(rows: Vec<(i32, String)>, upcoming_counts: &HashMap<i32, usize>) -> Vec<ListingSummary> {
    rows.into_iter()
        .map(|(id, name)| ListingSummary {
            id,
            name,
            upcoming_count: upcoming_counts.get(&id).copied().unwrap_or(0),
        })
        .collect()
}

// Shows

/// Loads every show attached to `owner`, joined against the entity on the other side for display
/// fields, and splits them around `reference`.
pub fn show_partition(
    conn: &mut SqliteConnection,
    owner: ShowOwner,
    reference: NaiveDateTime,
) -> QueryResult<PartitionedShows> {
    let shows = match owner {
        ShowOwner::Venue(venue_id) => shows::table
            .inner_join(artists::table)
            .filter(shows::venue_id.eq(venue_id))
            .select((
                artists::id,
                artists::name,
                artists::image_link,
                shows::start_time,
            ))
            .load::<ShowSummary>(conn)?,
        ShowOwner::Artist(artist_id) => shows::table
            .inner_join(venues::table)
            .filter(shows::artist_id.eq(artist_id))
            .select((venues::id, venues::name, venues::image_link, shows::start_time))
            .load::<ShowSummary>(conn)?,
    };

    Ok(partition::partition_shows(shows, reference))
}

/// Returns the number of upcoming shows of every venue or every artist.  Owners with no upcoming
/// shows are absent from the map.
///
/// The show table is read without an owner id filter so the query binds no parameters however many
/// owners are being listed.
pub fn upcoming_counts(
    conn: &mut SqliteConnection,
    kind: OwnerKind,
    reference: NaiveDateTime,
) -> QueryResult<HashMap<i32, usize>> {
    let show_times: Vec<(i32, NaiveDateTime)> = match kind {
        OwnerKind::Venue => shows::table
            .select((shows::venue_id, shows::start_time))
            .load(conn)?,
        OwnerKind::Artist => shows::table
            .select((shows::artist_id, shows::start_time))
            .load(conn)?,
    };

    Ok(partition::count_upcoming(show_times, reference))
}

/// Inserts a show after checking that both sides of it exist.  Nothing is written if either is
/// missing.
pub fn create_show(conn: &mut SqliteConnection, new_show: &NewShow) -> Result<Show, StoreError> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let artist_exists: bool =
            diesel::select(diesel::dsl::exists(artists::table.find(new_show.artist_id)))
                .get_result(conn)?;
        if !artist_exists {
            return Err(StoreError::NotFound {
                entity: "Artist",
                id: new_show.artist_id,
            });
        }

        let venue_exists: bool =
            diesel::select(diesel::dsl::exists(venues::table.find(new_show.venue_id)))
                .get_result(conn)?;
        if !venue_exists {
            return Err(StoreError::NotFound {
                entity: "Venue",
                id: new_show.venue_id,
            });
        }

        let show = diesel::insert_into(shows::table)
            .values(new_show)
            .returning(Show::as_returning())
            .get_result(conn)?;
        Ok(show)
    })
}

/// All shows with venue and artist display fields, earliest first.
pub fn list_shows(conn: &mut SqliteConnection) -> QueryResult<Vec<ShowListing>> {
    shows::table
        .inner_join(artists::table)
        .inner_join(venues::table)
        .order((shows::start_time.asc(), shows::id.asc()))
        .select((
            shows::id,
            venues::id,
            venues::name,
            artists::id,
            artists::name,
            artists::image_link,
            shows::start_time,
        ))
        .load::<ShowListing>(conn)
}

// Venues

fn venue_genres(conn: &mut SqliteConnection, venue_id: i32) -> QueryResult<Vec<String>> {
    venues_genres::table
        .filter(venues_genres::venue_id.eq(venue_id))
        .order(venues_genres::id.asc())
        .select(venues_genres::genre)
        .load(conn)
}

fn insert_venue_genres(
    conn: &mut SqliteConnection,
    venue_id: i32,
    genres: &[String],
) -> QueryResult<()> {
    if genres.is_empty() {
        return Ok(());
    }

    let rows: Vec<NewVenueGenre> = genres
        .iter()
        .map(|genre| NewVenueGenre {
            venue_id,
            genre: genre.as_str(),
        })
        .collect();
    diesel::insert_into(venues_genres::table)
        .values(&rows)
        .execute(conn)
        .map(|_| ())
}

pub fn create_venue(
    conn: &mut SqliteConnection,
    new_venue: &NewVenue,
    genres: &[String],
) -> Result<i32, StoreError> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let venue_id = diesel::insert_into(venues::table)
            .values(new_venue)
            .returning(venues::id)
            .get_result::<i32>(conn)?;
        insert_venue_genres(conn, venue_id, genres)?;
        Ok(venue_id)
    })
}

/// Overwrites every editable field and the genre set of an existing venue.
pub fn update_venue(
    conn: &mut SqliteConnection,
    venue_id: i32,
    changes: &NewVenue,
    genres: &[String],
) -> Result<(), StoreError> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let updated = diesel::update(venues::table.find(venue_id))
            .set(changes)
            .execute(conn)?;
        if updated == 0 {
            return Err(StoreError::NotFound {
                entity: "Venue",
                id: venue_id,
            });
        }

        diesel::delete(venues_genres::table.filter(venues_genres::venue_id.eq(venue_id)))
            .execute(conn)?;
        insert_venue_genres(conn, venue_id, genres)?;
        Ok(())
    })
}

/// Deletes a venue along with every show held there and its genre tags.
pub fn delete_venue(conn: &mut SqliteConnection, venue_id: i32) -> Result<(), StoreError> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let removed_shows =
            diesel::delete(shows::table.filter(shows::venue_id.eq(venue_id))).execute(conn)?;
        diesel::delete(venues_genres::table.filter(venues_genres::venue_id.eq(venue_id)))
            .execute(conn)?;
        let deleted = diesel::delete(venues::table.find(venue_id)).execute(conn)?;
        if deleted == 0 {
            return Err(StoreError::NotFound {
                entity: "Venue",
                id: venue_id,
            });
        }

        debug!(
            "Deleted venue {} along with {} show(s)",
            venue_id, removed_shows
        );
        Ok(())
    })
}

pub fn get_venue(
    conn: &mut SqliteConnection,
    venue_id: i32,
) -> Result<Option<(Venue, Vec<String>)>, StoreError> {
    let venue = match venues::table
        .find(venue_id)
        .select(Venue::as_select())
        .first(conn)
        .optional()?
    {
        Some(venue) => venue,
        None => return Ok(None),
    };
    let genres = venue_genres(conn, venue_id)?;

    Ok(Some((venue, genres)))
}

pub fn venue_detail(
    conn: &mut SqliteConnection,
    venue_id: i32,
    reference: NaiveDateTime,
) -> Result<Option<VenueDetail>, StoreError> {
    let (venue, genres) = match get_venue(conn, venue_id)? {
        Some(res) => res,
        None => return Ok(None),
    };
    let shows = show_partition(conn, ShowOwner::Venue(venue_id), reference)?;

    Ok(Some(VenueDetail {
        venue,
        genres,
        shows,
    }))
}

pub fn search_venues(
    conn: &mut SqliteConnection,
    term: &str,
    reference: NaiveDateTime,
) -> QueryResult<SearchResults> {
    let rows: Vec<(i32, String)> = venues::table
        .order(venues::id.asc())
        .select((venues::id, venues::name))
        .load(conn)?;
    let matches = filter_by_name(rows, term);
    if matches.is_empty() {
        return Ok(SearchResults::default());
    }
    let counts = upcoming_counts(conn, OwnerKind::Venue, reference)?;

    let data = summarize(matches, &counts);
    Ok(SearchResults {
        count: data.len(),
        data,
    })
}

/// Every venue, grouped by `(city, state)` and annotated with its upcoming show count.
pub fn venue_directory(
    conn: &mut SqliteConnection,
    reference: NaiveDateTime,
) -> QueryResult<Vec<Area>> {
    let rows: Vec<(i32, String, String, String)> = venues::table
        .select((venues::id, venues::name, venues::city, venues::state))
        .load(conn)?;
    let counts = upcoming_counts(conn, OwnerKind::Venue, reference)?;

    Ok(partition::group_by_location(rows.into_iter().map(
        |(id, name, city, state)| {
            let upcoming_count = counts.get(&id).copied().unwrap_or(0);
            (
                city,
                state,
                ListingSummary {
                    id,
                    name,
                    upcoming_count,
                },
            )
        },
    )))
}

/// `(id, name)` of every venue, for the venue selector of the show form.
pub fn list_venue_choices(conn: &mut SqliteConnection) -> QueryResult<Vec<(i32, String)>> {
    venues::table
        .order((venues::name.asc(), venues::id.asc()))
        .select((venues::id, venues::name))
        .load(conn)
}

// Artists

fn artist_genres(conn: &mut SqliteConnection, artist_id: i32) -> QueryResult<Vec<String>> {
    artists_genres::table
        .filter(artists_genres::artist_id.eq(artist_id))
        .order(artists_genres::id.asc())
        .select(artists_genres::genre)
        .load(conn)
}

fn insert_artist_genres(
    conn: &mut SqliteConnection,
    artist_id: i32,
    genres: &[String],
) -> QueryResult<()> {
    if genres.is_empty() {
        return Ok(());
    }

    let rows: Vec<NewArtistGenre> = genres
        .iter()
        .map(|genre| NewArtistGenre {
            artist_id,
            genre: genre.as_str(),
        })
        .collect();
    diesel::insert_into(artists_genres::table)
        .values(&rows)
        .execute(conn)
        .map(|_| ())
}

pub fn create_artist(
    conn: &mut SqliteConnection,
    new_artist: &NewArtist,
    genres: &[String],
) -> Result<i32, StoreError> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let artist_id = diesel::insert_into(artists::table)
            .values(new_artist)
            .returning(artists::id)
            .get_result::<i32>(conn)?;
        insert_artist_genres(conn, artist_id, genres)?;
        Ok(artist_id)
    })
}

/// Overwrites every editable field and the genre set of an existing artist.
pub fn update_artist(
    conn: &mut SqliteConnection,
    artist_id: i32,
    changes: &NewArtist,
    genres: &[String],
) -> Result<(), StoreError> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let updated = diesel::update(artists::table.find(artist_id))
            .set(changes)
            .execute(conn)?;
        if updated == 0 {
            return Err(StoreError::NotFound {
                entity: "Artist",
                id: artist_id,
            });
        }

        diesel::delete(artists_genres::table.filter(artists_genres::artist_id.eq(artist_id)))
            .execute(conn)?;
        insert_artist_genres(conn, artist_id, genres)?;
        Ok(())
    })
}

/// Deletes an artist along with every show they play and their genre tags.
pub fn delete_artist(conn: &mut SqliteConnection, artist_id: i32) -> Result<(), StoreError> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let removed_shows =
            diesel::delete(shows::table.filter(shows::artist_id.eq(artist_id))).execute(conn)?;
        diesel::delete(artists_genres::table.filter(artists_genres::artist_id.eq(artist_id)))
            .execute(conn)?;
        let deleted = diesel::delete(artists::table.find(artist_id)).execute(conn)?;
        if deleted == 0 {
            return Err(StoreError::NotFound {
                entity: "Artist",
                id: artist_id,
            });
        }

        debug!(
            "Deleted artist {} along with {} show(s)",
            artist_id, removed_shows
        );
        Ok(())
    })
}

pub fn get_artist(
    conn: &mut SqliteConnection,
    artist_id: i32,
) -> Result<Option<(Artist, Vec<String>)>, StoreError> {
    let artist = match artists::table
        .find(artist_id)
        .select(Artist::as_select())
        .first(conn)
        .optional()?
    {
        Some(artist) => artist,
        None => return Ok(None),
    };
    let genres = artist_genres(conn, artist_id)?;

    Ok(Some((artist, genres)))
}

pub fn artist_detail(
    conn: &mut SqliteConnection,
    artist_id: i32,
    reference: NaiveDateTime,
) -> Result<Option<ArtistDetail>, StoreError> {
    let (artist, genres) = match get_artist(conn, artist_id)? {
        Some(res) => res,
        None => return Ok(None),
    };
    let shows = show_partition(conn, ShowOwner::Artist(artist_id), reference)?;

    Ok(Some(ArtistDetail {
        artist,
        genres,
        shows,
    }))
}

pub fn search_artists(
    conn: &mut SqliteConnection,
    term: &str,
    reference: NaiveDateTime,
) -> QueryResult<SearchResults> {
    let rows: Vec<(i32, String)> = artists::table
        .order(artists::id.asc())
        .select((artists::id, artists::name))
        .load(conn)?;
    let matches = filter_by_name(rows, term);
    if matches.is_empty() {
        return Ok(SearchResults::default());
    }
    let counts = upcoming_counts(conn, OwnerKind::Artist, reference)?;

    let data = summarize(matches, &counts);
    Ok(SearchResults {
        count: data.len(),
        data,
    })
}

/// Every artist in id order, annotated with their upcoming show count.
pub fn list_artists(
    conn: &mut SqliteConnection,
    reference: NaiveDateTime,
) -> QueryResult<Vec<ListingSummary>> {
    let rows: Vec<(i32, String)> = artists::table
        .order(artists::id.asc())
        .select((artists::id, artists::name))
        .load(conn)?;
    let counts = upcoming_counts(conn, OwnerKind::Artist, reference)?;

    Ok(summarize(rows, &counts))
}

/// `(id, name)` of every artist, for the artist selector of the show form.
pub fn list_artist_choices(conn: &mut SqliteConnection) -> QueryResult<Vec<(i32, String)>> {
    artists::table
        .order((artists::name.asc(), artists::id.asc()))
        .select((artists::id, artists::name))
        .load(conn)
}
