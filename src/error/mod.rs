mod swatch;

pub use swatch::SwatchError;
pub use swatchbook_schema::{ApiErrorBody, ApiErrorObject};
