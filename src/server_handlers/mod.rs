pub mod comisiones;
pub mod comparar;
pub mod docs;
pub mod upload;

pub use comisiones::*;
pub use comparar::*;
pub use docs::*;
