pub mod coin;
pub mod currency;
pub mod dashboard;
pub mod portfolio;
pub mod price;
pub mod settings;
