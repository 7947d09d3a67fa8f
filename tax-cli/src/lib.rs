pub mod csv_loader;
pub mod form;
pub mod logging;
pub mod report;
pub mod utils;
