use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Field name reserved for the caller's logging switch. Never compared.
pub const RESERVED_VERBOSE: &str = "Verbose";

/// Returns `true` for field names the comparator always skips.
pub fn is_reserved_key(key: &str) -> bool {
    key.eq_ignore_ascii_case(RESERVED_VERBOSE)
}

/// Kind tag carried by every [`FieldValue`]. Comparison rules are chosen from
/// this tag only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Null,
    String,
    Int16,
    Int32,
    Array,
    Unsupported,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::String => "string",
            ValueKind::Int16 => "int16",
            ValueKind::Int32 => "int32",
            ValueKind::Array => "array",
            ValueKind::Unsupported => "unsupported",
        }
    }
}

/// A comparable array element. Ordered so arrays can be counted as multisets.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArrayElement {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for ArrayElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayElement::Str(s) => write!(f, "{s}"),
            ArrayElement::Int(n) => write!(f, "{n}"),
            ArrayElement::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ArrayElement {
    fn from(s: &str) -> Self {
        ArrayElement::Str(s.to_string())
    }
}

impl From<String> for ArrayElement {
    fn from(s: String) -> Self {
        ArrayElement::Str(s)
    }
}

impl From<i64> for ArrayElement {
    fn from(n: i64) -> Self {
        ArrayElement::Int(n)
    }
}

impl From<i32> for ArrayElement {
    fn from(n: i32) -> Self {
        ArrayElement::Int(i64::from(n))
    }
}

impl From<bool> for ArrayElement {
    fn from(b: bool) -> Self {
        ArrayElement::Bool(b)
    }
}

/// A configuration value with an explicit kind tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    String(String),
    Int16(i16),
    Int32(i32),
    Array(Vec<ArrayElement>),
    /// Anything the comparator has no rule for (booleans, floats, nested
    /// objects, ...). `rendered` is kept for diagnostics only.
    Unsupported { type_name: String, rendered: String },
}

impl FieldValue {
    pub fn string(s: impl Into<String>) -> Self {
        FieldValue::String(s.into())
    }

    pub fn array<I, E>(items: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ArrayElement>,
    {
        FieldValue::Array(items.into_iter().map(Into::into).collect())
    }

    pub fn unsupported(type_name: impl Into<String>, rendered: impl Into<String>) -> Self {
        FieldValue::Unsupported {
            type_name: type_name.into(),
            rendered: rendered.into(),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Null => ValueKind::Null,
            FieldValue::String(_) => ValueKind::String,
            FieldValue::Int16(_) => ValueKind::Int16,
            FieldValue::Int32(_) => ValueKind::Int32,
            FieldValue::Array(_) => ValueKind::Array,
            FieldValue::Unsupported { .. } => ValueKind::Unsupported,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn is_null_or_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Numeric value of either integer kind, widened.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Int16(n) => Some(i64::from(*n)),
            FieldValue::Int32(n) => Some(i64::from(*n)),
            _ => None,
        }
    }

    /// Text form of scalar values (strings and integers).
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::String(s) => Some(Cow::Borrowed(s.as_str())),
            FieldValue::Int16(n) => Some(Cow::Owned(n.to_string())),
            FieldValue::Int32(n) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }

    /// Elements for array comparison. A scalar string or integer counts as a
    /// one-element array; null and unsupported values have no elements.
    pub fn elements(&self) -> Option<Cow<'_, [ArrayElement]>> {
        match self {
            FieldValue::Array(items) => Some(Cow::Borrowed(items.as_slice())),
            FieldValue::String(s) => Some(Cow::Owned(vec![ArrayElement::Str(s.clone())])),
            FieldValue::Int16(_) | FieldValue::Int32(_) => self
                .as_integer()
                .map(|n| Cow::Owned(vec![ArrayElement::Int(n)])),
            FieldValue::Null | FieldValue::Unsupported { .. } => None,
        }
    }

    /// Type name reported in unsupported-type diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            FieldValue::Unsupported { type_name, .. } => type_name,
            other => other.kind().as_str(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "<null>"),
            FieldValue::String(s) => write!(f, "'{s}'"),
            FieldValue::Int16(n) => write!(f, "{n}"),
            FieldValue::Int32(n) => write!(f, "{n}"),
            FieldValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            FieldValue::Unsupported {
                type_name,
                rendered,
            } => write!(f, "{rendered} ({type_name})"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<i16> for FieldValue {
    fn from(n: i16) -> Self {
        FieldValue::Int16(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Int32(n)
    }
}

impl From<Vec<ArrayElement>> for FieldValue {
    fn from(items: Vec<ArrayElement>) -> Self {
        FieldValue::Array(items)
    }
}

/// Ordered field map. Used for observed snapshots and for map-shaped declared
/// configuration.
pub type ConfigMap = BTreeMap<String, FieldValue>;

/// Which side of an array comparison an unmatched element came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementSide {
    ObservedOnly,
    DeclaredOnly,
}

/// One unmatched array element.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementDifference {
    pub element: ArrayElement,
    pub side: ElementSide,
}

/// Why a field was judged non-compliant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MismatchReason {
    /// Declared an array, observed nothing.
    MissingArray,
    ArrayElement {
        element: ArrayElement,
        side: ElementSide,
    },
    ValueMismatch,
    UnsupportedType { type_name: String },
}

/// Evidence for a single mismatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub field: String,
    /// `Null` when the observed snapshot lacks the field.
    pub observed: FieldValue,
    pub declared: FieldValue,
    #[serde(flatten)]
    pub reason: MismatchReason,
}

impl Diagnostic {
    pub fn new(
        field: impl Into<String>,
        observed: &FieldValue,
        declared: &FieldValue,
        reason: MismatchReason,
    ) -> Self {
        Self {
            field: field.into(),
            observed: observed.clone(),
            declared: declared.clone(),
            reason,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            MismatchReason::MissingArray => write!(
                f,
                "{}: declared array {} but observed value is missing",
                self.field, self.declared
            ),
            MismatchReason::ArrayElement { element, side } => {
                let where_ = match side {
                    ElementSide::ObservedOnly => "only in observed",
                    ElementSide::DeclaredOnly => "only in declared",
                };
                write!(f, "{}: element '{}' {}", self.field, element, where_)
            }
            MismatchReason::ValueMismatch => write!(
                f,
                "{}: observed {} does not match declared {}",
                self.field, self.observed, self.declared
            ),
            MismatchReason::UnsupportedType { type_name } => write!(
                f,
                "{}: declared type '{}' cannot be compared",
                self.field, type_name
            ),
        }
    }
}

/// Full result of one comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub compliant: bool,
    /// Keys that were evaluated, in evaluation order (reserved keys excluded).
    pub checked_keys: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ComplianceReport {
    pub fn empty() -> Self {
        Self {
            compliant: true,
            checked_keys: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_compliant(&self) -> bool {
        self.compliant
    }

    /// Diagnostics recorded for a single field.
    pub fn diagnostics_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.field == field)
    }
}
