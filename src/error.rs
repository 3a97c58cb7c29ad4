use crate::{helios::DataError, plot::PlotError, shocks::ShockError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `helios` module")]
    Data(#[from] DataError),
    #[error("Error in the `shocks` module")]
    Shock(#[from] ShockError),
    #[error("Error in the `plot` module")]
    Plot(#[from] PlotError),
}
