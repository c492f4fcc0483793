//! Provider response bodies in the Google Maps web service format

use serde_json::{Value, json};

/// A single-route, single-leg directions response
pub fn directions(distance_m: u64, duration_s: u64, in_traffic_s: Option<u64>) -> Value {
    let mut leg = json!({
        "distance": { "text": format!("{} m", distance_m), "value": distance_m },
        "duration": { "text": format!("{} s", duration_s), "value": duration_s },
    });
    if let Some(in_traffic) = in_traffic_s {
        leg["duration_in_traffic"] = json!({ "text": format!("{} s", in_traffic), "value": in_traffic });
    }

    json!({
        "status": "OK",
        "routes": [{ "summary": "GS Road", "legs": [leg] }],
    })
}

/// A 1x1 distance matrix response
pub fn distance_matrix(distance_m: u64, duration_s: u64) -> Value {
    json!({
        "status": "OK",
        "origin_addresses": ["Ulubari, Guwahati, Assam, India"],
        "destination_addresses": ["Beltola, Guwahati, Assam, India"],
        "rows": [{
            "elements": [{
                "status": "OK",
                "distance": { "text": "", "value": distance_m },
                "duration": { "text": "", "value": duration_s },
            }]
        }],
    })
}

/// An autocomplete response with one prediction per name
pub fn autocomplete(names: &[&str]) -> Value {
    let predictions: Vec<Value> = names
        .iter()
        .map(|name| {
            json!({
                "description": format!("{}, Guwahati, Assam, India", name),
                "place_id": format!("place-{}", name.to_lowercase().replace(' ', "-")),
                "structured_formatting": { "main_text": name },
            })
        })
        .collect();

    json!({ "status": "OK", "predictions": predictions })
}

/// A response carrying only a provider status
pub fn status(status: &str, message: Option<&str>) -> Value {
    match message {
        Some(message) => json!({ "status": status, "error_message": message }),
        None => json!({ "status": status }),
    }
}
