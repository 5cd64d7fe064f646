//! Binding of raw request parameters to typed values and objects.
//!
//! ```rust
//! use rbind_core::binder::{bind, Bound};
//! use rbind_core::field::{FieldSpec, Value};
//! use rbind_core::source::ParameterSource;
//!
//! const SPECS: &[FieldSpec] = &[FieldSpec::string("username"), FieldSpec::integer("age")];
//!
//! let source = ParameterSource::parse("username=hello&age=20").unwrap();
//! match bind(&source, SPECS).unwrap() {
//!     Bound::Object(object) => assert_eq!(object.get("age"), Some(&Value::Int(20))),
//!     Bound::Scalar(_) => unreachable!(),
//! }
//! ```

pub mod binder;
pub mod error;
pub mod field;
pub mod request;
pub mod response;
pub mod source;

pub use rbind_macros::BindParams;
