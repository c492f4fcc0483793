//! Google Maps Platform web service provider

mod client;
mod models;


pub use client::GoogleMapsProvider;
