pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod nit;
pub mod parser;
pub mod schema;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands, FormArgs, FormsCommand};
pub use error::FormError;
pub use form::{FormConfig, FormField, FormSession};
pub use ui::{FormPreview, PreviewApp};
