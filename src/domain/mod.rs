pub mod entities;
pub mod ledger;
pub mod value_objects;
