//! Commands module - service layer for role copy operations

mod copy;
pub(crate) mod service;

pub use copy::CopyStage;
pub use service::RoleCopyService;
