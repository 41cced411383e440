pub mod alpha_vantage;
pub mod external_api;
pub mod util;
