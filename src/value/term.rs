use std::fmt;
use std::rc::Rc;

use crate::error::{HostError, HostResult};

use super::Value;

/// In-memory program value.
///
/// Records are unions with tag 0. Functions take exactly one argument; a
/// multi-argument function is a function returning a function.
#[derive(Clone)]
pub enum Term {
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Union { tag: usize, fields: Rc<[Term]> },
    List(Rc<[Term]>),
    Func(Rc<dyn Fn(Term) -> Term>),
}

impl Term {
    pub fn effect(tag: usize, fields: Vec<Term>) -> Self {
        Term::Union {
            tag,
            fields: fields.into(),
        }
    }

    pub fn func(f: impl Fn(Term) -> Term + 'static) -> Self {
        Term::Func(Rc::new(f))
    }

    fn kind(&self) -> &'static str {
        match self {
            Term::Int(_) => "int",
            Term::Float(_) => "float",
            Term::Str(_) => "string",
            Term::Union { .. } => "union",
            Term::List(_) => "list",
            Term::Func(_) => "function",
        }
    }

    fn fields(&self) -> HostResult<&[Term]> {
        match self {
            Term::Union { fields, .. } => Ok(fields),
            Term::List(items) => Ok(items),
            other => Err(HostError::shape("union, record or list", other.kind())),
        }
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Int(v) => write!(f, "{v}"),
            Term::Float(v) => write!(f, "{v:?}"),
            Term::Str(s) => write!(f, "{s:?}"),
            Term::Union { tag, fields } if fields.is_empty() => write!(f, "#{tag}"),
            Term::Union { tag, fields } => {
                write!(f, "#{tag}")?;
                f.debug_list().entries(fields.iter()).finish()
            }
            Term::List(items) => f.debug_list().entries(items.iter()).finish(),
            Term::Func(_) => f.write_str("<fn>"),
        }
    }
}

impl Value for Term {
    fn discriminant(&self) -> HostResult<usize> {
        match self {
            Term::Union { tag, .. } => Ok(*tag),
            other => Err(HostError::shape("tagged union", other.kind())),
        }
    }

    fn arity(&self) -> HostResult<usize> {
        self.fields().map(<[Term]>::len)
    }

    fn field(&self, index: usize) -> HostResult<Term> {
        let fields = self.fields()?;
        fields.get(index).cloned().ok_or(HostError::MissingField {
            index,
            arity: fields.len(),
        })
    }

    fn apply(&self, arg: Term) -> HostResult<Term> {
        match self {
            Term::Func(f) => Ok(f(arg)),
            other => Err(HostError::shape("function", other.kind())),
        }
    }

    fn as_string(&self) -> HostResult<String> {
        match self {
            Term::Str(s) => Ok(s.to_string()),
            other => Err(HostError::shape("string", other.kind())),
        }
    }

    fn as_int(&self) -> HostResult<i64> {
        match self {
            Term::Int(v) => Ok(*v),
            other => Err(HostError::shape("int", other.kind())),
        }
    }

    fn as_float(&self) -> HostResult<f64> {
        match self {
            Term::Float(v) => Ok(*v),
            other => Err(HostError::shape("float", other.kind())),
        }
    }

    fn int(value: i64) -> Self {
        Term::Int(value)
    }

    fn float(value: f64) -> Self {
        Term::Float(value)
    }

    fn string(value: &str) -> Self {
        Term::Str(value.into())
    }

    fn record(fields: Vec<Self>) -> Self {
        Term::effect(0, fields)
    }

    fn list(items: Vec<Self>) -> Self {
        Term::List(items.into())
    }

    fn union(tag: usize) -> Self {
        Term::effect(tag, Vec::new())
    }
}
