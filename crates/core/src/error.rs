use thiserror::Error;

use crate::filter::ParseFilterError;
use crate::model::{FormError, ParseIdError, SettingsError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Filter(#[from] ParseFilterError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
}
