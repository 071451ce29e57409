pub mod charts;
pub mod geolocation;
pub mod open_meteo;
pub mod prediction;
pub mod risk;
