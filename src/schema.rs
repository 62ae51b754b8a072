table! {
    artists (id) {
        id -> Integer,
        name -> Text,
        city -> Text,
        state -> Text,
        phone -> Text,
        image_link -> Text,
        facebook_link -> Text,
        website -> Text,
        seeking_venue -> Bool,
        seeking_description -> Text,
    }
}

table! {
    artists_genres (id) {
        id -> Integer,
        artist_id -> Integer,
        genre -> Text,
    }
}

table! {
    shows (id) {
        id -> Integer,
        artist_id -> Integer,
        venue_id -> Integer,
        start_time -> Timestamp,
    }
}

table! {
    venues (id) {
        id -> Integer,
        name -> Text,
        city -> Text,
        state -> Text,
        address -> Text,
        phone -> Text,
        image_link -> Text,
        facebook_link -> Text,
        website -> Text,
        seeking_talent -> Bool,
        seeking_description -> Text,
    }
}

table! {
    venues_genres (id) {
        id -> Integer,
        venue_id -> Integer,
        genre -> Text,
    }
}

joinable!(artists_genres -> artists (artist_id));
joinable!(shows -> artists (artist_id));
joinable!(shows -> venues (venue_id));
joinable!(venues_genres -> venues (venue_id));

allow_tables_to_appear_in_same_query!(artists, artists_genres, shows, venues, venues_genres,);

/// DDL for every table above.  Applied when the server ignites so a fresh database file is usable
/// without running the diesel CLI first.
pub const SCHEMA_SQL: &str =
    include_str!("../migrations/2026-10-16-000000_create_listings/up.sql");
