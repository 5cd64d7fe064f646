use rbind_core::{
    binder::{BindField, BoundObject, FromParams},
    error::BindingError,
    field::FieldSpec,
};

/// Object populated by the model attribute handlers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HelloData {
    pub username: String,
    pub age: i32,
}

/// Both fields are optional, absent ones keep their zero value.
impl FromParams for HelloData {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::string("username").optional(),
        FieldSpec::integer("age").optional(),
    ];

    fn from_bound(mut object: BoundObject) -> Result<Self, BindingError> {
        Ok(Self {
            username: String::from_value("username", object.take("username"))?,
            age: i32::from_value("age", object.take("age"))?,
        })
    }
}
