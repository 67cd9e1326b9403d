pub mod fields;
pub mod mapping;
pub mod phone;
pub mod record;
pub mod value;

pub use fields::{
    is_structural_field, normalize_field_name, ADDRESS_FIELD, BEGIN_FIELD, EMAIL_FIELD,
    END_FIELD, NAME_FIELD, PHONE_FIELD, STRUCTURAL_FIELDS, VERSION_FIELD,
};
pub use mapping::FieldMapping;
pub use phone::normalize_phone;
pub use record::{Record, RecordSet};
pub use value::{Entry, EntryValue, FieldValue, Param};
