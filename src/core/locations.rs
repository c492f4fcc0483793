//! Built-in location directory
//!
//! Common Guwahati places answered locally before any provider call, plus
//! a small precomputed distance table for the default pickup points.

use crate::core::types::PlaceSuggestion;

/// A place known without asking the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalLocation {
    pub name: &'static str,
    pub full_address: &'static str,
    /// Category such as `area`, `transport` or `hospital`
    pub kind: &'static str,
}

impl LocalLocation {
    const fn new(name: &'static str, full_address: &'static str, kind: &'static str) -> Self {
        Self {
            name,
            full_address,
            kind,
        }
    }

    /// Convert into a suggestion
    pub fn to_suggestion(&self) -> PlaceSuggestion {
        PlaceSuggestion {
            name: self.name.to_string(),
            full_address: self.full_address.to_string(),
            place_id: None,
            kind: self.kind.to_string(),
        }
    }
}

/// Every built-in location
pub const LOCATIONS: &[LocalLocation] = &[
    LocalLocation::new("Ulubari", "Ulubari, Guwahati, Assam, India", "area"),
    LocalLocation::new("Panbazar", "Panbazar, Guwahati, Assam, India", "area"),
    LocalLocation::new("Ganeshguri", "Ganeshguri, Guwahati, Assam, India", "area"),
    LocalLocation::new("Beltola", "Beltola, Guwahati, Assam, India", "area"),
    LocalLocation::new("Jalukbari", "Jalukbari, Guwahati, Assam, India", "area"),
    LocalLocation::new("Six Mile", "Six Mile, Guwahati, Assam, India", "area"),
    LocalLocation::new("Zoo Road", "Zoo Road, Guwahati, Assam, India", "area"),
    LocalLocation::new("Chandmari", "Chandmari, Guwahati, Assam, India", "area"),
    LocalLocation::new("Maligaon", "Maligaon, Guwahati, Assam, India", "area"),
    LocalLocation::new("Dispur", "Dispur, Guwahati, Assam, India", "area"),
    LocalLocation::new("Bhangagarh", "Bhangagarh, Guwahati, Assam, India", "area"),
    LocalLocation::new("Khanapara", "Khanapara, Guwahati, Assam, India", "area"),
    LocalLocation::new("Hatigaon", "Hatigaon, Guwahati, Assam, India", "area"),
    LocalLocation::new("Kahilipara", "Kahilipara, Guwahati, Assam, India", "area"),
    LocalLocation::new("Basistha", "Basistha, Guwahati, Assam, India", "area"),
    LocalLocation::new("Bhetapara", "Bhetapara, Guwahati, Assam, India", "area"),
    LocalLocation::new("Narengi", "Narengi, Guwahati, Assam, India", "area"),
    LocalLocation::new("Noonmati", "Noonmati, Guwahati, Assam, India", "area"),
    LocalLocation::new("Rehabari", "Rehabari, Guwahati, Assam, India", "area"),
    LocalLocation::new("Silpukhuri", "Silpukhuri, Guwahati, Assam, India", "area"),
    LocalLocation::new("Uzanbazar", "Uzanbazar, Guwahati, Assam, India", "area"),
    LocalLocation::new("Lakhtokia", "Lakhtokia, Guwahati, Assam, India", "area"),
    LocalLocation::new("Athgaon", "Athgaon, Guwahati, Assam, India", "area"),
    LocalLocation::new("Paltan Bazar", "Paltan Bazar, Guwahati, Assam, India", "area"),
    LocalLocation::new("Fancy Bazar", "Fancy Bazar, Guwahati, Assam, India", "area"),
    LocalLocation::new("Ambari", "Ambari, Guwahati, Assam, India", "area"),
    LocalLocation::new("Lachit Nagar", "Lachit Nagar, Guwahati, Assam, India", "area"),
    LocalLocation::new("Christian Basti", "Christian Basti, Guwahati, Assam, India", "area"),
    LocalLocation::new("Satgaon", "Satgaon, Guwahati, Assam, India", "area"),
    LocalLocation::new("Lokhra", "Lokhra, Guwahati, Assam, India", "area"),
    LocalLocation::new("Garchuk", "Garchuk, Guwahati, Assam, India", "area"),
    LocalLocation::new("VIP Road", "VIP Road, Guwahati, Assam, India", "area"),
    LocalLocation::new("GS Road", "GS Road, Guwahati, Assam, India", "area"),
    LocalLocation::new("RGB Road", "RGB Road, Guwahati, Assam, India", "area"),
    LocalLocation::new("AT Road", "AT Road, Guwahati, Assam, India", "area"),
    LocalLocation::new(
        "Guwahati Railway Station",
        "Guwahati Railway Station, Paltan Bazar, Guwahati, Assam",
        "transport",
    ),
    LocalLocation::new(
        "Kamakhya Railway Station",
        "Kamakhya Railway Station, Guwahati, Assam",
        "transport",
    ),
    LocalLocation::new(
        "LGBI Airport",
        "Lokpriya Gopinath Bordoloi International Airport, Borjhar, Guwahati",
        "transport",
    ),
    LocalLocation::new(
        "Guwahati Airport",
        "Lokpriya Gopinath Bordoloi International Airport, Borjhar, Guwahati",
        "transport",
    ),
    LocalLocation::new("ISBT Guwahati", "ISBT, Betkuchi, Guwahati, Assam", "transport"),
    LocalLocation::new(
        "Adabari Bus Stand",
        "Adabari Bus Stand, Guwahati, Assam",
        "transport",
    ),
    LocalLocation::new(
        "Paltan Bazar Bus Stand",
        "Paltan Bazar Bus Stand, Guwahati, Assam",
        "transport",
    ),
    LocalLocation::new(
        "Kamakhya Temple",
        "Kamakhya Temple, Nilachal Hill, Guwahati, Assam",
        "landmark",
    ),
    LocalLocation::new(
        "Umananda Temple",
        "Umananda Temple, Peacock Island, Guwahati, Assam",
        "landmark",
    ),
    LocalLocation::new(
        "Navagraha Temple",
        "Navagraha Temple, Chitrachal Hill, Guwahati, Assam",
        "landmark",
    ),
    LocalLocation::new(
        "Assam State Zoo",
        "Assam State Zoo, RG Baruah Road, Guwahati, Assam",
        "landmark",
    ),
    LocalLocation::new(
        "Guwahati Planetarium",
        "Guwahati Planetarium, Uzanbazar, Guwahati, Assam",
        "landmark",
    ),
    LocalLocation::new(
        "Srimanta Sankardev Kalakshetra",
        "Srimanta Sankardev Kalakshetra, Panjabari, Guwahati, Assam",
        "landmark",
    ),
    LocalLocation::new(
        "City Centre Mall",
        "City Centre Mall, Christian Basti, Guwahati, Assam",
        "shopping",
    ),
    LocalLocation::new(
        "Vishal Mega Mart Six Mile",
        "Vishal Mega Mart, Six Mile, Guwahati, Assam",
        "shopping",
    ),
    LocalLocation::new(
        "Big Bazaar Guwahati",
        "Big Bazaar, GS Road, Guwahati, Assam",
        "shopping",
    ),
    LocalLocation::new("Hub Mall", "Hub Mall, Khanapara, Guwahati, Assam", "shopping"),
    LocalLocation::new(
        "GMCH",
        "Gauhati Medical College and Hospital, Bhangagarh, Guwahati, Assam",
        "hospital",
    ),
    LocalLocation::new(
        "Gauhati Medical College",
        "Gauhati Medical College and Hospital, Bhangagarh, Guwahati, Assam",
        "hospital",
    ),
    LocalLocation::new(
        "Nemcare Hospital",
        "Nemcare Hospital, Bhangagarh, Guwahati, Assam",
        "hospital",
    ),
    LocalLocation::new(
        "Down Town Hospital",
        "Down Town Hospital, Dispur, Guwahati, Assam",
        "hospital",
    ),
    LocalLocation::new(
        "GNRC Hospital",
        "GNRC Hospital, Six Mile, Guwahati, Assam",
        "hospital",
    ),
    LocalLocation::new(
        "Hayat Hospital",
        "Hayat Hospital, Dispur, Guwahati, Assam",
        "hospital",
    ),
    LocalLocation::new(
        "Excelcare Hospital",
        "Excelcare Hospital, Hatigaon, Guwahati, Assam",
        "hospital",
    ),
    LocalLocation::new(
        "Gauhati University",
        "Gauhati University, Jalukbari, Guwahati, Assam",
        "education",
    ),
    LocalLocation::new(
        "IIT Guwahati",
        "Indian Institute of Technology Guwahati, North Guwahati, Assam",
        "education",
    ),
    LocalLocation::new(
        "Cotton University",
        "Cotton University, Panbazar, Guwahati, Assam",
        "education",
    ),
    LocalLocation::new(
        "Handique Girls College",
        "Handique Girls College, Panbazar, Guwahati, Assam",
        "education",
    ),
    LocalLocation::new(
        "Don Bosco University",
        "Assam Don Bosco University, Azara, Guwahati, Assam",
        "education",
    ),
    LocalLocation::new(
        "Vivanta Guwahati",
        "Vivanta Guwahati, GS Road, Guwahati, Assam",
        "hotel",
    ),
    LocalLocation::new(
        "Radisson Blu Guwahati",
        "Radisson Blu, Basistha, Guwahati, Assam",
        "hotel",
    ),
    LocalLocation::new(
        "Novotel Guwahati",
        "Novotel Guwahati, GS Road, Guwahati, Assam",
        "hotel",
    ),
];

/// Pickup points offered before the operator types anything
pub const DEFAULT_LOCATIONS: [&str; 6] = [
    "Ulubari",
    "Panbazar",
    "Ganeshguri",
    "Beltola",
    "Jalukbari",
    "Six Mile",
];

/// Road distance in km between default locations, each pair listed once
const OD_DISTANCES: &[(&str, &str, f64)] = &[
    ("Ulubari", "Panbazar", 2.0),
    ("Ulubari", "Ganeshguri", 5.0),
    ("Ulubari", "Beltola", 8.0),
    ("Ulubari", "Jalukbari", 8.0),
    ("Ulubari", "Six Mile", 6.0),
    ("Panbazar", "Ganeshguri", 6.0),
    ("Panbazar", "Beltola", 10.0),
    ("Panbazar", "Jalukbari", 7.0),
    ("Panbazar", "Six Mile", 9.0),
    ("Ganeshguri", "Beltola", 4.0),
    ("Ganeshguri", "Jalukbari", 10.0),
    ("Ganeshguri", "Six Mile", 3.0),
    ("Beltola", "Jalukbari", 13.0),
    ("Beltola", "Six Mile", 5.0),
    ("Jalukbari", "Six Mile", 12.0),
];

const MIN_QUERY_CHARS: usize = 2;
const MIN_WORD_CHARS: usize = 3;

fn score(location: &LocalLocation, query: &str, words: &[&str]) -> u32 {
    let name = location.name.to_lowercase();
    let address = location.full_address.to_lowercase();

    let mut score = if name == query {
        100
    } else if name.starts_with(query) {
        80
    } else if name.contains(query) {
        60
    } else if address.contains(query) {
        40
    } else {
        0
    };

    for word in words.iter().filter(|w| w.chars().count() >= MIN_WORD_CHARS) {
        if name.contains(word) {
            score += 10;
        }
        if address.contains(word) {
            score += 5;
        }
    }

    score
}

/// Best-scoring local matches for `query`, highest score first
///
/// Ties keep directory order. Queries shorter than two characters after
/// trimming match nothing.
pub fn search(query: &str, max_results: usize) -> Vec<PlaceSuggestion> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }
    let words: Vec<&str> = query.split_whitespace().collect();

    let mut scored: Vec<(u32, &LocalLocation)> = LOCATIONS
        .iter()
        .map(|location| (score(location, &query, &words), location))
        .filter(|(score, _)| *score > 0)
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(max_results)
        .map(|(_, location)| location.to_suggestion())
        .collect()
}

/// Precomputed distance between two default locations
///
/// Symmetric; `0.0` for the same place or an unknown pair.
pub fn od_distance(from: &str, to: &str) -> f64 {
    if from == to {
        return 0.0;
    }
    OD_DISTANCES
        .iter()
        .find(|(a, b, _)| (*a == from && *b == to) || (*a == to && *b == from))
        .map(|(_, _, km)| *km)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_name_ranks_first() {
        let results = search("Beltola", 5);
        assert_eq!(results[0].name, "Beltola");
        assert_eq!(results[0].kind, "area");
        assert!(results[0].place_id.is_none());
    }

    #[test]
    fn test_prefix_beats_substring() {
        let results = search("paltan", 5);
        let names: Vec<&str> = results.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names[0], "Paltan Bazar");
        assert_eq!(names[1], "Paltan Bazar Bus Stand");
        assert!(names.contains(&"Guwahati Railway Station"));
    }

    #[test]
    fn test_address_match() {
        let results = search("borjhar", 5);
        let names: Vec<&str> = results.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["LGBI Airport", "Guwahati Airport"]);
    }

    #[test]
    fn test_word_bonus_without_phrase_match() {
        let results = search("hospital dispur", 5);
        assert!(!results.is_empty());
        assert!(results.iter().take(2).all(|s| s.kind == "hospital"));
    }

    #[test]
    fn test_short_query() {
        assert!(search("b", 5).is_empty());
        assert!(search("  ", 5).is_empty());
    }

    #[test]
    fn test_truncates_to_max() {
        assert_eq!(search("guwahati", 3).len(), 3);
        assert!(search("zzzz", 5).is_empty());
    }

    #[test]
    fn test_od_distance_is_symmetric() {
        assert_eq!(od_distance("Ulubari", "Beltola"), 8.0);
        assert_eq!(od_distance("Beltola", "Ulubari"), 8.0);
        assert_eq!(od_distance("Six Mile", "Jalukbari"), 12.0);
    }

    #[test]
    fn test_od_distance_defaults_to_zero() {
        assert_eq!(od_distance("Ulubari", "Ulubari"), 0.0);
        assert_eq!(od_distance("Ulubari", "Mars"), 0.0);
    }

    #[test]
    fn test_default_locations_all_in_matrix() {
        for from in DEFAULT_LOCATIONS {
            for to in DEFAULT_LOCATIONS {
                if from != to {
                    assert!(od_distance(from, to) > 0.0, "{} -> {}", from, to);
                }
            }
        }
    }
}
