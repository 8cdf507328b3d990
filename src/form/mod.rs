pub mod config;
pub mod derive;
pub mod field;
pub mod model;

pub use config::FormConfig;
pub use derive::{derive_fields, field_type_for, label_for, DEFAULT_FOREIGN_KEY_FIELDS};
pub use field::{FieldChanges, FieldOption, FieldType, FormField};
pub use model::FormSession;
