pub mod recent;
pub mod theme;
pub mod weather;

pub use recent::RecentSearches;
pub use theme::{ThemeState, ThemeStore};
pub use weather::{LookupOutcome, StoreState, WeatherStore};
