use indexmap::IndexMap;
use log::debug;
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::{
    error::BindingError,
    field::{FieldSpec, FieldType, Value},
    source::ParameterSource,
};

/// Successful bind result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    /// Single-field spec lists bind straight to the value.
    Scalar(Value),
    Object(BoundObject),
}

/// Ordered collection of resolved fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BoundObject {
    fields: Vec<(&'static str, Value)>,
}

impl BoundObject {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| value)
    }

    /// Removes field from the object, missing field gives `Value::Null`.
    pub fn take(&mut self, name: &str) -> Value {
        match self.fields.iter().position(|(n, _)| *n == name) {
            Some(index) => self.fields.remove(index).1,
            None => Value::Null,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }
}

impl Serialize for BoundObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Binds every spec against the source. One spec gives `Bound::Scalar`,
/// anything else gives `Bound::Object` with fields in spec order.
///
/// ```rust
/// use rbind_core::binder::{bind, Bound};
/// use rbind_core::field::{FieldSpec, Value};
/// use rbind_core::source::ParameterSource;
///
/// let source = ParameterSource::parse("username=").unwrap();
/// let bound = bind(&source, &[FieldSpec::string("username").with_default("guest")]).unwrap();
/// assert_eq!(bound, Bound::Scalar(Value::Str("guest".into())));
/// ```
pub fn bind(source: &ParameterSource, specs: &[FieldSpec]) -> Result<Bound, BindingError> {
    match specs {
        [spec] => spec.resolve(source).map(Bound::Scalar).map_err(log_failure),
        _ => bind_object(source, specs).map(Bound::Object),
    }
}

/// Same as `bind` but never collapses to a scalar.
pub fn bind_object(
    source: &ParameterSource,
    specs: &[FieldSpec],
) -> Result<BoundObject, BindingError> {
    let mut object = BoundObject::default();

    for spec in specs {
        let value = spec.resolve(source).map_err(log_failure)?;
        object.fields.push((spec.name, value));
    }
    Ok(object)
}

/// Whole source as a plain map, first value per name, in arrival order.
/// Nothing is validated.
pub fn bind_map(source: &ParameterSource) -> IndexMap<String, String> {
    source
        .iter()
        .filter_map(|(name, values)| Some((name.to_string(), values.first()?.clone())))
        .collect()
}

/// Whole source as a map keeping every value per name.
pub fn bind_multi_map(source: &ParameterSource) -> IndexMap<String, Vec<String>> {
    source
        .iter()
        .map(|(name, values)| (name.to_string(), values.to_vec()))
        .collect()
}

fn log_failure(e: BindingError) -> BindingError {
    debug!("binding failed: {}", e);
    e
}

/// Implemented by types that can be populated from request parameters.
///
/// Usually derived with `#[derive(BindParams)]`, hand-written
/// implementations keep the table and the builder next to each other:
///
/// ```rust
/// use rbind_core::binder::{BindField, BoundObject, FromParams};
/// use rbind_core::error::BindingError;
/// use rbind_core::field::FieldSpec;
///
/// struct Paging {
///     page: u32,
/// }
///
/// impl FromParams for Paging {
///     const FIELDS: &'static [FieldSpec] = &[FieldSpec::integer("page").with_default("1")];
///
///     fn from_bound(mut object: BoundObject) -> Result<Self, BindingError> {
///         Ok(Self {
///             page: u32::from_value("page", object.take("page"))?,
///         })
///     }
/// }
/// ```
pub trait FromParams: Sized {
    /// Field table, one entry per populated field.
    const FIELDS: &'static [FieldSpec];

    /// Builds Self from an object bound against `FIELDS`.
    fn from_bound(object: BoundObject) -> Result<Self, BindingError>;

    fn bind_from(source: &ParameterSource) -> Result<Self, BindingError> {
        Self::from_bound(bind_object(source, Self::FIELDS)?)
    }
}

/// Conversion of a bound `Value` into a struct field.
pub trait BindField: Sized {
    /// Type the raw parameter is converted to before `from_value` runs.
    const KIND: FieldType;

    /// Whether absence is an error when no default is given.
    const REQUIRED: bool = true;

    fn from_value(field: &str, value: Value) -> Result<Self, BindingError>;
}

impl BindField for String {
    const KIND: FieldType = FieldType::String;

    fn from_value(_field: &str, value: Value) -> Result<Self, BindingError> {
        Ok(match value {
            Value::Null => String::new(),
            Value::Str(s) => s,
            Value::Int(n) => n.to_string(),
        })
    }
}

impl<T> BindField for Option<T>
where
    T: BindField,
{
    const KIND: FieldType = T::KIND;
    const REQUIRED: bool = false;

    fn from_value(field: &str, value: Value) -> Result<Self, BindingError> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(field, value).map(Some),
        }
    }
}

macro_rules! bind_integer {
    ($($ty:ty),*) => {
        $(
            impl BindField for $ty {
                const KIND: FieldType = FieldType::Integer;

                fn from_value(field: &str, value: Value) -> Result<Self, BindingError> {
                    let conversion_error = |raw: String| BindingError::TypeConversion {
                        field: field.to_string(),
                        raw,
                        expected: FieldType::Integer,
                    };

                    match value {
                        Value::Null => Ok(0),
                        Value::Int(n) => <$ty>::try_from(n).map_err(|_| conversion_error(n.to_string())),
                        Value::Str(s) => s.parse().map_err(|_| conversion_error(s)),
                    }
                }
            }
        )*
    };
}

bind_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
