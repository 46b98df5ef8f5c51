//! Map, directions, and social share links for a restaurant.

use crate::{Location, Restaurant};

/// Percent-encode a query component, leaving `!'()*` as they are the way
/// browsers' `encodeURIComponent` does.
pub fn encode_component(s: &str) -> String {
    urlencoding::encode(s)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

/// Google Maps search link pointing at the given coordinates.
pub fn map_search_url(location: Location) -> String {
    format!("https://www.google.com/maps/search/?api=1&query={location}")
}

/// Google Maps directions from `origin` to the restaurant.
pub fn directions_url(origin: Location, restaurant: &Restaurant) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={origin}&destination={}",
        restaurant.location
    )
}

pub fn email_subject(restaurant: &Restaurant) -> String {
    format!("Check out {}!", restaurant.name)
}

pub fn email_body(restaurant: &Restaurant) -> String {
    format!(
        "Check out this restaurant: {}\n\nAddress: {}\nRating: {} \u{2b50}\n\nDescription: {}\n\nFind it on the map: {}",
        restaurant.name,
        restaurant.address,
        restaurant.rating,
        restaurant.description,
        map_search_url(restaurant.location),
    )
}

/// `mailto:` link for any mail client.
pub fn mailto_url(restaurant: &Restaurant) -> String {
    format!(
        "mailto:?subject={}&body={}",
        encode_component(&email_subject(restaurant)),
        encode_component(&email_body(restaurant))
    )
}

/// Gmail app deep link; callers fall back to [`mailto_url`] when it cannot
/// be opened.
pub fn gmail_url(restaurant: &Restaurant) -> String {
    format!(
        "googlegmail://co?subject={}&body={}",
        encode_component(&email_subject(restaurant)),
        encode_component(&email_body(restaurant))
    )
}

pub fn twitter_url(restaurant: &Restaurant) -> String {
    let text = format!(
        "Check out this restaurant: {} \u{2b50}\n{}\nDescription: {}\nFind it here: {}",
        restaurant.name,
        restaurant.address,
        restaurant.description,
        map_search_url(restaurant.location),
    );
    format!("https://twitter.com/intent/tweet?text={}", encode_component(&text))
}

pub fn facebook_url(restaurant: &Restaurant) -> String {
    format!(
        "https://www.facebook.com/sharer/sharer.php?u={}",
        encode_component(&map_search_url(restaurant.location))
    )
}

/// Every link the detail view offers, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareLinks {
    pub map: String,
    pub directions: Option<String>,
    pub gmail: String,
    pub mailto: String,
    pub twitter: String,
    pub facebook: String,
}

impl ShareLinks {
    pub fn for_restaurant(restaurant: &Restaurant, origin: Option<Location>) -> Self {
        Self {
            map: map_search_url(restaurant.location),
            directions: origin.map(|o| directions_url(o, restaurant)),
            gmail: gmail_url(restaurant),
            mailto: mailto_url(restaurant),
            twitter: twitter_url(restaurant),
            facebook: facebook_url(restaurant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RestaurantId;

    fn sample() -> Restaurant {
        Restaurant {
            id: RestaurantId::new("a1").unwrap(),
            name: "Cafe & Bar".into(),
            address: "1 Main St".into(),
            phones: vec!["555-0100".into()],
            description: "Cozy".into(),
            tags: vec![],
            rating: 4.5,
            location: Location::new(59.9, 10.75),
        }
    }

    #[test]
    fn map_and_directions_links() {
        let r = sample();
        assert_eq!(
            map_search_url(r.location),
            "https://www.google.com/maps/search/?api=1&query=59.9,10.75"
        );
        assert_eq!(
            directions_url(Location::new(1.5, -2.0), &r),
            "https://www.google.com/maps/dir/?api=1&origin=1.5,-2&destination=59.9,10.75"
        );
    }

    #[test]
    fn mail_links_encode_subject_and_body() {
        let r = sample();
        let url = mailto_url(&r);
        assert!(url.starts_with("mailto:?subject=Check%20out%20Cafe%20%26%20Bar!&body="));
        assert!(!url.contains('\n'));
        assert!(gmail_url(&r).starts_with("googlegmail://co?subject="));
        assert!(email_body(&r).contains("Address: 1 Main St\nRating: 4.5"));
    }

    #[test]
    fn component_encoding_keeps_unreserved_marks() {
        assert_eq!(encode_component("it's (fun)*!"), "it's%20(fun)*!");
        assert_eq!(encode_component("a&b=c/d?"), "a%26b%3Dc%2Fd%3F");
        assert_eq!(encode_component("caf\u{e9}"), "caf%C3%A9");
    }

    #[test]
    fn social_links_point_at_map() {
        let r = sample();
        assert!(facebook_url(&r).starts_with(
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fwww.google.com%2Fmaps"
        ));
        assert!(twitter_url(&r).contains("Cafe%20%26%20Bar"));
    }

    #[test]
    fn directions_only_with_origin() {
        let r = sample();
        assert!(ShareLinks::for_restaurant(&r, None).directions.is_none());
        let links = ShareLinks::for_restaurant(&r, Some(Location::new(0.0, 0.0)));
        assert!(links.directions.unwrap().contains("origin=0,0"));
    }
}
