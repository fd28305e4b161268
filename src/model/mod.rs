//! Data model: backend records, projections, construction input and locals

pub mod projection;
pub mod record;
pub mod value;

pub use projection::{ProjectedRecord, RecordShape, project, project_all};
pub use record::{BackendRecord, JsonRecord};
pub use value::{FieldInput, Local, Locals, Params, ViewData};
