mod export;
mod plot;

pub use export::*;
pub use plot::PlotScript;
