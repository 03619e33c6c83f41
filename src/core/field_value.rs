//! Field values for structured context
//!
//! [`FieldValue`] is the closed set of shapes a context field may take:
//! scalars, lists and string-keyed maps built from those. Values of any
//! `Serialize` type are converted through a validating serializer that
//! rejects everything outside that set instead of coercing it.

use super::error::{LoggerError, Result};
use serde::ser::{self, Impossible, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Ordered string-keyed map of field values
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Key reported when the attached value itself is not a map
pub(crate) const FIELDS_KEY: &str = "<fields>";

/// Key reported by [`FieldValue::from_serialize`]
const VALUE_KEY: &str = "<value>";

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FieldValue>),
    Map(FieldMap),
}

impl FieldValue {
    /// Convert any serializable value, rejecting shapes outside the field set.
    ///
    /// ```
    /// use rust_ctxlog::FieldValue;
    /// use std::collections::HashMap;
    ///
    /// let ok = FieldValue::from_serialize(&vec![1, 2, 3]).unwrap();
    /// assert_eq!(ok, FieldValue::List(vec![1.into(), 2.into(), 3.into()]));
    ///
    /// let bad = HashMap::from([(1, "x")]);
    /// assert!(FieldValue::from_serialize(&bad).is_err());
    /// ```
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        value
            .serialize(ValueSerializer::nested())
            .map_err(|e| e.into_logger_error(VALUE_KEY))
    }

    /// Short name of the variant, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::String(_) => "string",
            FieldValue::List(_) => "list",
            FieldValue::Map(_) => "map",
        }
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::List(items) => {
                serde_json::Value::Array(items.iter().map(FieldValue::to_json_value).collect())
            }
            FieldValue::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
        }
    }
}

impl FieldValue {
    /// Apply the non-finite float rule of `From<f64>` throughout the value
    pub(crate) fn into_finite(self) -> Self {
        match self {
            FieldValue::Float(f) => FieldValue::from(f),
            FieldValue::List(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::into_finite).collect())
            }
            FieldValue::Map(map) => FieldValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, v.into_finite()))
                    .collect(),
            ),
            other => other,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::List(_) | FieldValue::Map(_) => write!(f, "{}", self.to_json_value()),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<char> for FieldValue {
    fn from(c: char) -> Self {
        FieldValue::String(c.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u16> for FieldValue {
    fn from(i: u16) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u8> for FieldValue {
    fn from(i: u8) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

/// Finite floats stay floats. NaN and the infinities have no JSON number
/// form, so they become the strings `"NaN"`, `"inf"` and `"-inf"`.
///
/// ```
/// use rust_ctxlog::FieldValue;
///
/// assert_eq!(FieldValue::from(0.5), FieldValue::Float(0.5));
/// assert_eq!(FieldValue::from(f64::NAN), FieldValue::String("NaN".into()));
/// assert_eq!(FieldValue::from(f64::NEG_INFINITY), FieldValue::String("-inf".into()));
/// ```
impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        if f.is_finite() {
            FieldValue::Float(f)
        } else {
            FieldValue::String(f.to_string())
        }
    }
}

impl From<f32> for FieldValue {
    fn from(f: f32) -> Self {
        FieldValue::from(f64::from(f))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<()> for FieldValue {
    fn from(_: ()) -> Self {
        FieldValue::Null
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<BTreeMap<String, T>> for FieldValue {
    fn from(map: BTreeMap<String, T>) -> Self {
        FieldValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<FieldValue>> From<HashMap<String, T>> for FieldValue {
    fn from(map: HashMap<String, T>) -> Self {
        FieldValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => n
                    .as_f64()
                    .map(FieldValue::from)
                    .unwrap_or_else(|| FieldValue::String(n.to_string())),
            },
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(map) => FieldValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Serialize a set of fields into a validated map.
///
/// `fields` must serialize as a map or struct. The first invalid value aborts
/// the whole conversion and is reported under its top-level key.
pub(crate) fn collect_fields<T: Serialize + ?Sized>(fields: &T) -> Result<FieldMap> {
    match fields.serialize(ValueSerializer::top_level()) {
        Ok(FieldValue::Map(map)) => Ok(map),
        Ok(other) => Err(LoggerError::unserializable(
            FIELDS_KEY,
            format!("context fields must serialize as a map, found {}", other.kind()),
        )),
        Err(e) => Err(e.into_logger_error(FIELDS_KEY)),
    }
}

/// Shape violation raised while serializing a field value
#[derive(Debug)]
pub(crate) struct ShapeError {
    key: Option<String>,
    reason: String,
}

impl ShapeError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            key: None,
            reason: reason.into(),
        }
    }

    fn non_string_key(found: &str) -> Self {
        Self::new(format!("map keys must be strings, found {}", found))
    }

    fn into_logger_error(self, default_key: &str) -> LoggerError {
        LoggerError::unserializable(
            self.key.unwrap_or_else(|| default_key.to_string()),
            self.reason,
        )
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for ShapeError {}

impl ser::Error for ShapeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ShapeError::new(msg.to_string())
    }
}

type ShapeResult<T> = std::result::Result<T, ShapeError>;

/// Serializer producing a [`FieldValue`]
#[derive(Clone, Copy)]
pub(crate) struct ValueSerializer {
    top_level: bool,
}

impl ValueSerializer {
    fn top_level() -> Self {
        Self { top_level: true }
    }

    fn nested() -> Self {
        Self { top_level: false }
    }
}

fn int_from<T>(value: T) -> ShapeResult<FieldValue>
where
    T: Copy + fmt::Display + TryInto<i64>,
{
    value
        .try_into()
        .map(FieldValue::Int)
        .map_err(|_| ShapeError::new(format!("integer {} exceeds the signed 64-bit range", value)))
}

impl Serializer for ValueSerializer {
    type Ok = FieldValue;
    type Error = ShapeError;
    type SerializeSeq = SeqCollector;
    type SerializeTuple = SeqCollector;
    type SerializeTupleStruct = SeqCollector;
    type SerializeTupleVariant = VariantSeqCollector;
    type SerializeMap = MapCollector;
    type SerializeStruct = MapCollector;
    type SerializeStructVariant = VariantMapCollector;

    fn serialize_bool(self, v: bool) -> ShapeResult<FieldValue> {
        Ok(FieldValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> ShapeResult<FieldValue> {
        Ok(FieldValue::Int(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> ShapeResult<FieldValue> {
        Ok(FieldValue::Int(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> ShapeResult<FieldValue> {
        Ok(FieldValue::Int(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> ShapeResult<FieldValue> {
        Ok(FieldValue::Int(v))
    }

    fn serialize_i128(self, v: i128) -> ShapeResult<FieldValue> {
        int_from(v)
    }

    fn serialize_u8(self, v: u8) -> ShapeResult<FieldValue> {
        Ok(FieldValue::Int(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> ShapeResult<FieldValue> {
        Ok(FieldValue::Int(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> ShapeResult<FieldValue> {
        Ok(FieldValue::Int(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> ShapeResult<FieldValue> {
        int_from(v)
    }

    fn serialize_u128(self, v: u128) -> ShapeResult<FieldValue> {
        int_from(v)
    }

    fn serialize_f32(self, v: f32) -> ShapeResult<FieldValue> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> ShapeResult<FieldValue> {
        if !v.is_finite() {
            return Err(ShapeError::new(format!("float must be finite, got {}", v)));
        }
        Ok(FieldValue::Float(v))
    }

    fn serialize_char(self, v: char) -> ShapeResult<FieldValue> {
        Ok(FieldValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> ShapeResult<FieldValue> {
        Ok(FieldValue::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> ShapeResult<FieldValue> {
        Ok(FieldValue::List(
            v.iter().map(|b| FieldValue::Int(i64::from(*b))).collect(),
        ))
    }

    fn serialize_none(self) -> ShapeResult<FieldValue> {
        Ok(FieldValue::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> ShapeResult<FieldValue> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> ShapeResult<FieldValue> {
        Ok(FieldValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> ShapeResult<FieldValue> {
        Ok(FieldValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> ShapeResult<FieldValue> {
        Ok(FieldValue::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> ShapeResult<FieldValue> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> ShapeResult<FieldValue> {
        let inner = value.serialize(ValueSerializer::nested())?;
        Ok(FieldValue::Map(FieldMap::from([(variant.to_string(), inner)])))
    }

    fn serialize_seq(self, len: Option<usize>) -> ShapeResult<SeqCollector> {
        Ok(SeqCollector {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> ShapeResult<SeqCollector> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> ShapeResult<SeqCollector> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> ShapeResult<VariantSeqCollector> {
        Ok(VariantSeqCollector {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> ShapeResult<MapCollector> {
        Ok(MapCollector {
            top_level: self.top_level,
            map: FieldMap::new(),
            pending_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> ShapeResult<MapCollector> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> ShapeResult<VariantMapCollector> {
        Ok(VariantMapCollector {
            variant,
            map: FieldMap::new(),
        })
    }
}

pub(crate) struct SeqCollector {
    items: Vec<FieldValue>,
}

impl ser::SerializeSeq for SeqCollector {
    type Ok = FieldValue;
    type Error = ShapeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> ShapeResult<()> {
        self.items.push(value.serialize(ValueSerializer::nested())?);
        Ok(())
    }

    fn end(self) -> ShapeResult<FieldValue> {
        Ok(FieldValue::List(self.items))
    }
}

impl ser::SerializeTuple for SeqCollector {
    type Ok = FieldValue;
    type Error = ShapeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> ShapeResult<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> ShapeResult<FieldValue> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqCollector {
    type Ok = FieldValue;
    type Error = ShapeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> ShapeResult<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> ShapeResult<FieldValue> {
        ser::SerializeSeq::end(self)
    }
}

pub(crate) struct VariantSeqCollector {
    variant: &'static str,
    items: Vec<FieldValue>,
}

impl ser::SerializeTupleVariant for VariantSeqCollector {
    type Ok = FieldValue;
    type Error = ShapeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> ShapeResult<()> {
        self.items.push(value.serialize(ValueSerializer::nested())?);
        Ok(())
    }

    fn end(self) -> ShapeResult<FieldValue> {
        Ok(FieldValue::Map(FieldMap::from([(
            self.variant.to_string(),
            FieldValue::List(self.items),
        )])))
    }
}

pub(crate) struct MapCollector {
    top_level: bool,
    map: FieldMap,
    pending_key: Option<String>,
}

impl MapCollector {
    fn insert<T: Serialize + ?Sized>(&mut self, key: String, value: &T) -> ShapeResult<()> {
        match value.serialize(ValueSerializer::nested()) {
            Ok(value) => {
                self.map.insert(key, value);
                Ok(())
            }
            Err(mut e) => {
                if self.top_level && e.key.is_none() {
                    e.key = Some(key);
                }
                Err(e)
            }
        }
    }
}

impl ser::SerializeMap for MapCollector {
    type Ok = FieldValue;
    type Error = ShapeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> ShapeResult<()> {
        self.pending_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> ShapeResult<()> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| ShapeError::new("map value serialized before its key"))?;
        self.insert(key, value)
    }

    fn end(self) -> ShapeResult<FieldValue> {
        Ok(FieldValue::Map(self.map))
    }
}

impl ser::SerializeStruct for MapCollector {
    type Ok = FieldValue;
    type Error = ShapeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> ShapeResult<()> {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> ShapeResult<FieldValue> {
        Ok(FieldValue::Map(self.map))
    }
}

pub(crate) struct VariantMapCollector {
    variant: &'static str,
    map: FieldMap,
}

impl ser::SerializeStructVariant for VariantMapCollector {
    type Ok = FieldValue;
    type Error = ShapeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> ShapeResult<()> {
        self.map
            .insert(key.to_string(), value.serialize(ValueSerializer::nested())?);
        Ok(())
    }

    fn end(self) -> ShapeResult<FieldValue> {
        Ok(FieldValue::Map(FieldMap::from([(
            self.variant.to_string(),
            FieldValue::Map(self.map),
        )])))
    }
}

/// Accepts string-like map keys only
struct KeySerializer;

impl Serializer for KeySerializer {
    type Ok = String;
    type Error = ShapeError;
    type SerializeSeq = Impossible<String, ShapeError>;
    type SerializeTuple = Impossible<String, ShapeError>;
    type SerializeTupleStruct = Impossible<String, ShapeError>;
    type SerializeTupleVariant = Impossible<String, ShapeError>;
    type SerializeMap = Impossible<String, ShapeError>;
    type SerializeStruct = Impossible<String, ShapeError>;
    type SerializeStructVariant = Impossible<String, ShapeError>;

    fn serialize_str(self, v: &str) -> ShapeResult<String> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> ShapeResult<String> {
        Ok(v.to_string())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> ShapeResult<String> {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> ShapeResult<String> {
        Err(ShapeError::non_string_key("bool"))
    }

    fn serialize_i8(self, _v: i8) -> ShapeResult<String> {
        Err(ShapeError::non_string_key("i8"))
    }

    fn serialize_i16(self, _v: i16) -> ShapeResult<String> {
        Err(ShapeError::non_string_key("i16"))
    }

    fn serialize_i32(self, _v: i32) -> ShapeResult<String> {
        Err(ShapeError::non_string_key("i32"))
    }

    fn serialize_i64(self, _v: i64) -> ShapeResult<String> {
        Err(ShapeError::non_string_key("i64"))
    }

    fn serialize_u8(self, _v: u8) -> ShapeResult<String> {
        Err(ShapeError::non_string_key("u8"))
    }

    fn serialize_u16(self, _v: u16) -> ShapeResult<String> {
        Err(ShapeError::non_string_key("u16"))
    }

    fn serialize_u32(self, _v: u32) -> ShapeResult<String> {
        Err(ShapeError::non_string_key("u32"))
    }

    fn serialize_u64(self, _v: u64) -> ShapeResult<String> {
        Err(ShapeError::non_string_key("u64"))
    }

    fn serialize_f32(self, _v: f32) -> ShapeResult<String> {
        Err(ShapeError::non_string_key("f32"))
    }

    fn serialize_f64(self, _v: f64) -> ShapeResult<String> {
        Err(ShapeError::non_string_key("f64"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> ShapeResult<String> {
        Err(ShapeError::non_string_key("bytes"))
    }

    fn serialize_none(self) -> ShapeResult<String> {
        Err(ShapeError::non_string_key("none"))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> ShapeResult<String> {
        Err(ShapeError::non_string_key("option"))
    }

    fn serialize_unit(self) -> ShapeResult<String> {
        Err(ShapeError::non_string_key("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> ShapeResult<String> {
        Err(ShapeError::non_string_key(name))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> ShapeResult<String> {
        Err(ShapeError::non_string_key(name))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> ShapeResult<String> {
        Err(ShapeError::non_string_key(name))
    }

    fn serialize_seq(self, _len: Option<usize>) -> ShapeResult<Self::SerializeSeq> {
        Err(ShapeError::non_string_key("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> ShapeResult<Self::SerializeTuple> {
        Err(ShapeError::non_string_key("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> ShapeResult<Self::SerializeTupleStruct> {
        Err(ShapeError::non_string_key(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> ShapeResult<Self::SerializeTupleVariant> {
        Err(ShapeError::non_string_key(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> ShapeResult<Self::SerializeMap> {
        Err(ShapeError::non_string_key("map"))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> ShapeResult<Self::SerializeStruct> {
        Err(ShapeError::non_string_key(name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> ShapeResult<Self::SerializeStructVariant> {
        Err(ShapeError::non_string_key(name))
    }
}
