pub mod form;
pub mod sheets;

use crate::config::types::{Config, Destination};
use crate::error::Result;
use crate::ports::listing_sink::ListingSink;

use form::FormSubmitter;
use sheets::SheetsSubmitter;

/// Builds the sink for a profile's destination, or `None` when the profile
/// only scrapes.
pub fn build_sink(destination: &Destination, config: &Config) -> Result<Option<Box<dyn ListingSink>>> {
    let sink: Box<dyn ListingSink> = match destination {
        Destination::Form(form) => Box::new(FormSubmitter::new(form.clone(), &config.scraper)?),
        Destination::Sheet(sheet) => Box::new(SheetsSubmitter::from_env(
            &config.sheets,
            sheet,
            &config.scraper,
        )?),
        Destination::None => return Ok(None),
    };
    Ok(Some(sink))
}
