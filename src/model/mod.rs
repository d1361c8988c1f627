//! Record metadata model

mod builder;
mod definition;
mod field;
mod foreign_key;
mod registry;

pub use builder::ModelBuilder;
pub use definition::ModelDefinition;
pub use field::FieldDefinition;
pub use foreign_key::{ForeignKeyConstraint, ModelHandle, ReferentialAction};
pub use registry::{model_for, registered_model, Record};
