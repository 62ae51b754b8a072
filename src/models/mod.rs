use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::partition::PartitionedShows;
use crate::schema::{artists, artists_genres, shows, venues, venues_genres};

#[derive(Serialize, Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(table_name = venues)]
pub struct Venue {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
}

/// Every editable venue column.  Used both for inserts and for the full-record overwrite performed
/// by the edit form.
#[derive(Serialize, Insertable, AsChangeset, Clone, Debug, Default, PartialEq)]
#[diesel(table_name = venues)]
pub struct NewVenue {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
}

impl From<Venue> for NewVenue {
    fn from(venue: Venue) -> Self {
        NewVenue {
            name: venue.name,
            city: venue.city,
            state: venue.state,
            address: venue.address,
            phone: venue.phone,
            image_link: venue.image_link,
            facebook_link: venue.facebook_link,
            website: venue.website,
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = venues_genres)]
pub struct NewVenueGenre<'a> {
    pub venue_id: i32,
    pub genre: &'a str,
}

#[derive(Serialize, Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(table_name = artists)]
pub struct Artist {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

#[derive(Serialize, Insertable, AsChangeset, Clone, Debug, Default, PartialEq)]
#[diesel(table_name = artists)]
pub struct NewArtist {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

impl From<Artist> for NewArtist {
    fn from(artist: Artist) -> Self {
        NewArtist {
            name: artist.name,
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            image_link: artist.image_link,
            facebook_link: artist.facebook_link,
            website: artist.website,
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = artists_genres)]
pub struct NewArtistGenre<'a> {
    pub artist_id: i32,
    pub genre: &'a str,
}

#[derive(Queryable, Selectable, Clone, Debug, PartialEq)]
#[diesel(table_name = shows)]
pub struct Show {
    pub id: i32,
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_time: NaiveDateTime,
}

#[derive(Insertable, Clone, Debug, PartialEq)]
#[diesel(table_name = shows)]
pub struct NewShow {
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_time: NaiveDateTime,
}

/// One show as seen from the venue or artist it belongs to: the display fields of the entity on the
/// other side of the show plus its start time.
#[derive(Serialize, Queryable, Clone, Debug, PartialEq)]
pub struct ShowSummary {
    pub counterpart_id: i32,
    pub counterpart_name: String,
    pub counterpart_image_link: String,
    #[serde(serialize_with = "crate::timestamp::serialize")]
    pub start_time: NaiveDateTime,
}

/// A row of the `/shows` page with both sides of the show denormalized.
#[derive(Serialize, Queryable, Clone, Debug, PartialEq)]
pub struct ShowListing {
    pub show_id: i32,
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: String,
    #[serde(serialize_with = "crate::timestamp::serialize")]
    pub start_time: NaiveDateTime,
}

/// A venue or artist reduced to what list pages show about it.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ListingSummary {
    pub id: i32,
    pub name: String,
    pub upcoming_count: usize,
}

/// All venues sharing one `(city, state)` location in the venue directory.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<ListingSummary>,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<ListingSummary>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    pub genres: Vec<String>,
    #[serde(flatten)]
    pub shows: PartitionedShows,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    pub genres: Vec<String>,
    #[serde(flatten)]
    pub shows: PartitionedShows,
}
