use chrono::NaiveDateTime;
use rocket::form::{self, FromFormField, ValueField};

use crate::models::{NewArtist, NewShow, NewVenue};
use crate::timestamp;

pub const GENRES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

pub const STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR",
    "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

/// The genre options of the venue and artist forms: `GENRES` followed by any stored genre outside
/// it, so saving an edit form keeps every tag the record already has.
pub fn genre_choices(stored: &[String]) -> Vec<String> {
    let mut choices: Vec<String> = GENRES.iter().map(|genre| genre.to_string()).collect();
    for genre in stored {
        if !choices.contains(genre) {
            choices.push(genre.clone());
        }
    }
    choices
}

/// The state options of the venue and artist forms, with a stored state outside `STATES` appended.
pub fn state_choices(stored: &str) -> Vec<String> {
    let mut choices: Vec<String> = STATES.iter().map(|state| state.to_string()).collect();
    if !stored.is_empty() && !STATES.contains(&stored) {
        choices.push(stored.to_owned());
    }
    choices
}

fn non_blank<'v>(value: &str) -> form::Result<'v, ()> {
    if value.trim().is_empty() {
        return Err(form::Error::validation("must not be blank").into());
    }

    Ok(())
}

/// Trims every tag, drops empty ones and keeps only the first occurrence of duplicates.
fn normalize_genres(genres: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(genres.len());
    for genre in genres {
        let genre = genre.trim();
        if genre.is_empty() || normalized.iter().any(|existing| existing == genre) {
            continue;
        }
        normalized.push(genre.to_owned());
    }
    normalized
}

#[derive(FromForm, Debug)]
pub struct VenueForm {
    #[field(validate = non_blank())]
    pub name: String,
    #[field(validate = non_blank())]
    pub city: String,
    #[field(validate = non_blank())]
    pub state: String,
    #[field(validate = non_blank())]
    pub address: String,
    #[field(default = String::new())]
    pub phone: String,
    pub genres: Vec<String>,
    #[field(default = String::new())]
    pub image_link: String,
    #[field(default = String::new())]
    pub facebook_link: String,
    #[field(default = String::new())]
    pub website: String,
    pub seeking_talent: bool,
    #[field(default = String::new())]
    pub seeking_description: String,
}

impl VenueForm {
    pub fn into_parts(self) -> (NewVenue, Vec<String>) {
        let venue = NewVenue {
            name: self.name.trim().to_owned(),
            city: self.city.trim().to_owned(),
            state: self.state.trim().to_owned(),
            address: self.address.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            image_link: self.image_link.trim().to_owned(),
            facebook_link: self.facebook_link.trim().to_owned(),
            website: self.website.trim().to_owned(),
            seeking_talent: self.seeking_talent,
            seeking_description: self.seeking_description,
        };
        (venue, normalize_genres(self.genres))
    }
}

#[derive(FromForm, Debug)]
pub struct ArtistForm {
    #[field(validate = non_blank())]
    pub name: String,
    #[field(validate = non_blank())]
    pub city: String,
    #[field(validate = non_blank())]
    pub state: String,
    #[field(default = String::new())]
    pub phone: String,
    pub genres: Vec<String>,
    #[field(default = String::new())]
    pub image_link: String,
    #[field(default = String::new())]
    pub facebook_link: String,
    #[field(default = String::new())]
    pub website: String,
    pub seeking_venue: bool,
    #[field(default = String::new())]
    pub seeking_description: String,
}

impl ArtistForm {
    pub fn into_parts(self) -> (NewArtist, Vec<String>) {
        let artist = NewArtist {
            name: self.name.trim().to_owned(),
            city: self.city.trim().to_owned(),
            state: self.state.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            image_link: self.image_link.trim().to_owned(),
            facebook_link: self.facebook_link.trim().to_owned(),
            website: self.website.trim().to_owned(),
            seeking_venue: self.seeking_venue,
            seeking_description: self.seeking_description,
        };
        (artist, normalize_genres(self.genres))
    }
}

/// A show start time submitted through a form, in `timestamp::FORMAT` or `datetime-local` form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormTimestamp(pub NaiveDateTime);

#[rocket::async_trait]
impl<'v> FromFormField<'v> for FormTimestamp {
    fn from_value(field: ValueField<'v>) -> form::Result<'v, Self> {
        timestamp::parse(field.value).map(FormTimestamp).map_err(|err| {
            form::Error::validation(format!("invalid timestamp ({})", err)).into()
        })
    }
}

#[derive(FromForm, Debug)]
pub struct ShowForm {
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_time: FormTimestamp,
}

impl From<ShowForm> for NewShow {
    fn from(form: ShowForm) -> Self {
        NewShow {
            artist_id: form.artist_id,
            venue_id: form.venue_id,
            start_time: form.start_time.0,
        }
    }
}

#[derive(FromForm, Debug)]
pub struct SearchForm {
    pub search_term: Option<String>,
}

impl SearchForm {
    pub fn term(&self) -> &str {
        self.search_term.as_deref().map(str::trim).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rocket::form::{Form, FromForm};
    use rocket::http::RawStr;

    use super::*;

    /// Parses a urlencoded body the way a submitted HTML form arrives.
    fn parse<T: for<'a> FromForm<'a> + 'static>(body: &str) -> form::Result<'static, T> {
        Form::<T>::parse_encoded(RawStr::new(body))
    }

    const FILLMORE_BODY: &str = "name=The+Fillmore&city=San+Francisco&state=CA&\
                                 address=1805+Geary+Blvd&phone=415-555-0100&genres=Rock&\
                                 image_link=&facebook_link=&website=&seeking_description=";

    #[test]
    fn venue_form_fills_every_column() {
        let (venue, genres) = parse::<VenueForm>(FILLMORE_BODY)
            .unwrap()
            .into_parts();

        assert_eq!(
            venue,
            NewVenue {
                name: "The Fillmore".into(),
                city: "San Francisco".into(),
                state: "CA".into(),
                address: "1805 Geary Blvd".into(),
                phone: "415-555-0100".into(),
                seeking_talent: false,
                ..NewVenue::default()
            }
        );
        assert_eq!(genres, vec!["Rock".to_string()]);
    }

    #[test]
    fn checkbox_and_repeated_genres() {
        let body = format!(
            "{}&seeking_talent=on&genres=Jazz&genres=Rock&genres=+",
            FILLMORE_BODY
        );
        let (venue, genres) = parse::<VenueForm>(&body).unwrap().into_parts();

        assert!(venue.seeking_talent);
        assert_eq!(genres, vec!["Rock".to_string(), "Jazz".to_string()]);
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        assert!(parse::<VenueForm>("name=+++&city=Boston&state=MA&address=1+Main").is_err());
        assert!(parse::<VenueForm>("name=Roxy&city=Boston&state=MA").is_err());
        assert!(parse::<ArtistForm>("city=Boston&state=MA").is_err());
    }

    #[test]
    fn artist_form_defaults_optional_fields() {
        let (artist, genres) = parse::<ArtistForm>("name=Guns+N+Petals&city=SF&state=CA")
            .unwrap()
            .into_parts();

        assert_eq!(artist.name, "Guns N Petals");
        assert!(!artist.seeking_venue);
        assert_eq!(artist.website, "");
        assert!(genres.is_empty());
    }

    #[test]
    fn show_form_accepts_both_timestamp_shapes() {
        let expected = NaiveDate::from_ymd_opt(2035, 4, 1)
            .and_then(|date| date.and_hms_opt(20, 0, 0))
            .unwrap();

        for raw in ["2035-04-01+20%3A00%3A00", "2035-04-01T20%3A00"] {
            let body = format!("artist_id=4&venue_id=1&start_time={}", raw);
            let show: NewShow = parse::<ShowForm>(&body).unwrap().into();
            assert_eq!(
                show,
                NewShow {
                    artist_id: 4,
                    venue_id: 1,
                    start_time: expected,
                }
            );
        }
    }

    #[test]
    fn show_form_rejects_malformed_input() {
        assert!(parse::<ShowForm>("artist_id=4&venue_id=1&start_time=tomorrow").is_err());
        assert!(parse::<ShowForm>("artist_id=x&venue_id=1&start_time=2035-04-01T20%3A00")
            .is_err());
        assert!(parse::<ShowForm>("venue_id=1&start_time=2035-04-01T20%3A00").is_err());
    }

    #[test]
    fn choices_keep_stored_values_outside_the_fixed_lists() {
        let genres = genre_choices(&["Jazz".to_string(), "Rock".to_string()]);
        assert_eq!(genres.len(), GENRES.len() + 1);
        assert_eq!(genres.iter().filter(|genre| *genre == "Jazz").count(), 1);
        assert_eq!(genres.last().map(String::as_str), Some("Rock"));

        assert_eq!(state_choices("CA").len(), STATES.len());
        assert_eq!(state_choices("").len(), STATES.len());
        let states = state_choices("Calif");
        assert_eq!(states.last().map(String::as_str), Some("Calif"));
    }

    #[test]
    fn search_term_is_trimmed_and_optional() {
        let form = parse::<SearchForm>("search_term=+fill+").unwrap();
        assert_eq!(form.term(), "fill");

        let empty = parse::<SearchForm>("").unwrap();
        assert_eq!(empty.term(), "");
    }
}
