//! Client-side restaurant finder: locate the user, fetch nearby
//! restaurants, then filter and page through them.

pub mod controller;
pub mod geolocation;
pub mod pagination;
pub mod remote;
pub mod retry;
pub mod session;
pub mod state;
pub mod view;

pub use controller::{FinderController, LocateTicket, PageView};
pub use geolocation::{FixedGeolocator, GeolocationError, Geolocator, PositionOptions, locate};
pub use pagination::Paginator;
pub use remote::RemoteRestaurantSource;
pub use retry::{FetchRequest, RetryPolicy};
pub use session::FinderSession;
pub use state::{DistanceFilter, FinderState, LocationSource, Phase};
