mod action;
mod attachment;
mod policy;
mod principal;
mod resource;
mod statement;

pub use action::*;
pub use attachment::*;
pub use policy::*;
pub use principal::*;
pub use resource::*;
pub use statement::*;
